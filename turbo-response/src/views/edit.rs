//! Create and update views over a [`Store`]

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    extract::Path,
    routing::{get, MethodRouter},
    Form,
};

use super::form::FormCore;
use super::ViewConfig;
use crate::error::TurboError;
use crate::forms::{validate, ModelForm, OBJECT_KEY};
use crate::response::ViewResponse;
use crate::store::{Model, Store};
use crate::template::TemplateRenderer;

/// Creates an entity from a submitted [`ModelForm`]
pub struct CreateView<M: Model, F: ModelForm<M>> {
    core: FormCore,
    store: Arc<dyn Store<M>>,
    _form: PhantomData<fn() -> F>,
}

impl<M: Model, F: ModelForm<M>> CreateView<M, F> {
    /// Build from `config` (template, success URL and target required)
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if any of them is missing.
    pub fn new(
        config: ViewConfig,
        store: Arc<dyn Store<M>>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Result<Self, TurboError> {
        Ok(Self {
            core: FormCore::from_config(config, renderer, "CreateView")?,
            store,
            _form: PhantomData,
        })
    }

    /// Render the empty form
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn get(&self) -> Result<ViewResponse, TurboError> {
        self.core.render_full(self.core.context(&F::default())?)
    }

    /// Validate, then save a new entity and redirect
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or saving fails.
    pub async fn post(&self, form: F) -> Result<ViewResponse, TurboError> {
        if let Err(errors) = validate(&form) {
            return self
                .core
                .render_invalid(self.core.context(&form)?, &errors, &());
        }
        let created = self.store.save(form.save_into(None)).await?;
        if let Some(key) = created.pk() {
            tracing::info!(model = M::NAME, key = %key, "created");
        }
        Ok(self.core.redirect())
    }

    /// GET and POST handlers
    pub fn as_view(self) -> MethodRouter {
        let view = Arc::new(self);
        let get_view = Arc::clone(&view);
        get(move || async move { get_view.get() })
            .post(move |Form(form): Form<F>| async move { view.post(form).await })
    }
}

impl<M: Model, F: ModelForm<M>> fmt::Debug for CreateView<M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateView")
            .field("model", &M::NAME)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

/// Edits the entity named by the path's primary key
///
/// The target may be a resolver over the loaded entity, so an invalid POST
/// can aim at e.g. that entity's row.
pub struct UpdateView<M: Model, F: ModelForm<M>> {
    core: FormCore<M>,
    store: Arc<dyn Store<M>>,
    _form: PhantomData<fn() -> F>,
}

impl<M: Model, F: ModelForm<M>> UpdateView<M, F> {
    /// Build from `config` (template, success URL and target required)
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if any of them is missing.
    pub fn new(
        config: ViewConfig<M>,
        store: Arc<dyn Store<M>>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Result<Self, TurboError> {
        Ok(Self {
            core: FormCore::from_config(config, renderer, "UpdateView")?,
            store,
            _form: PhantomData,
        })
    }

    /// Render the form filled from the stored entity
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::NotFound`] if there is no entity under `pk`.
    pub async fn get(&self, pk: &M::Key) -> Result<ViewResponse, TurboError> {
        let object = self.store.get(pk).await?;
        let mut context = self.core.context(&F::from_instance(&object))?;
        context.insert(OBJECT_KEY, &object)?;
        self.core.render_full(context)
    }

    /// Validate, then apply the form to the stored entity, save it and redirect
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::NotFound`] if there is no entity under `pk`, or
    /// an error if rendering or saving fails.
    pub async fn post(&self, pk: &M::Key, form: F) -> Result<ViewResponse, TurboError> {
        let object = self.store.get(pk).await?;
        if let Err(errors) = validate(&form) {
            let mut context = self.core.context(&form)?;
            context.insert(OBJECT_KEY, &object)?;
            return self.core.render_invalid(context, &errors, &object);
        }
        self.store.save(form.save_into(Some(object))).await?;
        tracing::info!(model = M::NAME, key = %pk, "updated");
        Ok(self.core.redirect())
    }

    /// GET and POST handlers taking the primary key from the path
    pub fn as_view(self) -> MethodRouter {
        let view = Arc::new(self);
        let get_view = Arc::clone(&view);
        get(move |Path(pk): Path<M::Key>| async move { get_view.get(&pk).await }).post(
            move |Path(pk): Path<M::Key>, Form(form): Form<F>| async move {
                view.post(&pk, form).await
            },
        )
    }
}

impl<M: Model, F: ModelForm<M>> fmt::Debug for UpdateView<M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateView")
            .field("model", &M::NAME)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}
