//! Delete view
//!
//! The `remove` fragment needs the entity's identifier, which is gone once
//! the entity is. [`DeleteView::resolve`] therefore loads the entity and
//! prepares the response first, yielding a [`PendingDelete`]; only
//! [`PendingDelete::commit`] deletes.

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::Path,
    routing::{on, MethodFilter, MethodRouter},
};

use super::ViewConfig;
use crate::error::TurboError;
use crate::forms::OBJECT_KEY;
use crate::fragment::{Action, Fragment};
use crate::response::{Body, RenderContext, Rendered, ViewResponse};
use crate::shaper::{RenderMode, ResponseShaper, Target};
use crate::store::{Model, Store};
use crate::template::TemplateRenderer;

/// An entity whose `remove` response is ready but which is still stored
#[must_use = "nothing is deleted until the pending delete is committed"]
pub struct PendingDelete<M: Model> {
    object: M,
    target: String,
    response: ViewResponse,
}

impl<M: Model> PendingDelete<M> {
    /// The entity about to be deleted
    pub const fn object(&self) -> &M {
        &self.object
    }

    /// Identifier the `remove` fragment is aimed at
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The prepared response
    pub const fn response(&self) -> &ViewResponse {
        &self.response
    }

    /// Delete the entity and release the prepared response
    ///
    /// # Errors
    ///
    /// Returns the store's error if the delete fails; the prepared response
    /// is dropped.
    pub async fn commit(self, store: &dyn Store<M>) -> Result<ViewResponse, TurboError> {
        let Self {
            object,
            target,
            response,
        } = self;
        match store.delete(object).await {
            Ok(()) => {
                tracing::info!(model = M::NAME, target = %target, "deleted");
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(
                    model = M::NAME,
                    target = %target,
                    error = %err,
                    "delete failed, discarding prepared response"
                );
                Err(err)
            }
        }
    }
}

impl<M: Model> fmt::Debug for PendingDelete<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDelete")
            .field("model", &M::NAME)
            .field("target", &self.target)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

/// Deletes an entity and answers with a `remove` fragment
///
/// The action is always `remove`. The fragment aims at [`Model::dom_id`]
/// unless a [`Target::resolver`] is configured. With a template, GET renders it in full as a
/// confirmation page with `object` in context.
pub struct DeleteView<M: Model> {
    template_name: Option<String>,
    shaper: ResponseShaper<M>,
    store: Arc<dyn Store<M>>,
    renderer: Arc<dyn TemplateRenderer>,
    extra_context: RenderContext,
}

impl<M: Model> DeleteView<M> {
    /// Build from `config`; template and target are optional
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if a success URL is configured,
    /// since the response is always the fragment, or if the target is a fixed
    /// string: every entity must be removed under its own identifier.
    pub fn new(
        config: ViewConfig<M>,
        store: Arc<dyn Store<M>>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Result<Self, TurboError> {
        if config.success_url.is_some() {
            return Err(TurboError::configuration(
                "DeleteView responds with a remove fragment and takes no success URL",
            ));
        }
        if matches!(config.target, Some(Target::Fixed(_))) {
            return Err(TurboError::configuration(
                "DeleteView targets each entity and takes a resolver, not a fixed target",
            ));
        }
        let mut shaper = config.shaper().with_action(Action::Remove);
        if !shaper.has_target() {
            shaper = shaper.with_target(Target::resolver(default_target::<M>));
        }
        Ok(Self {
            template_name: config.template_name,
            shaper,
            store,
            renderer,
            extra_context: config.extra_context,
        })
    }

    /// Load the entity and prepare its `remove` response without deleting it
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::NotFound`] if there is no entity under `pk`.
    pub async fn resolve(&self, pk: &M::Key) -> Result<PendingDelete<M>, TurboError> {
        let object = self.store.get(pk).await?;
        let target = self.shaper.resolve_target(&object)?;

        let mut context = self.extra_context.clone();
        context.insert(OBJECT_KEY, &object)?;
        self.shaper
            .prepare_context(&mut context, RenderMode::Fragment, &target);

        let mut rendered = Rendered::new(Body::Stream(Fragment::remove(target.as_str())?));
        rendered.context = context;

        Ok(PendingDelete {
            object,
            target,
            response: rendered.into(),
        })
    }

    /// Resolve, then commit
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::NotFound`] if there is no entity under `pk`, or
    /// the store's error if the delete fails.
    pub async fn delete(&self, pk: &M::Key) -> Result<ViewResponse, TurboError> {
        self.resolve(pk).await?.commit(self.store.as_ref()).await
    }

    /// Render the confirmation page
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if no template is configured,
    /// [`TurboError::NotFound`] if there is no entity under `pk`.
    pub async fn confirm(&self, pk: &M::Key) -> Result<ViewResponse, TurboError> {
        let template_name = self
            .template_name
            .as_deref()
            .ok_or_else(|| TurboError::configuration("DeleteView has no confirmation template"))?;
        let object = self.store.get(pk).await?;

        let mut context = self.extra_context.clone();
        context.insert(OBJECT_KEY, &object)?;
        let html = self.renderer.render(template_name, &context)?;
        Ok(Rendered::new(Body::Full(html))
            .with_template(template_name, context)
            .into())
    }

    /// POST and DELETE handlers, plus GET when a confirmation template is set
    pub fn as_view(self) -> MethodRouter {
        let view = Arc::new(self);
        let delete_view = Arc::clone(&view);
        let router = on(
            MethodFilter::POST.or(MethodFilter::DELETE),
            move |Path(pk): Path<M::Key>| async move { delete_view.delete(&pk).await },
        );
        if view.template_name.is_none() {
            return router;
        }
        router.get(move |Path(pk): Path<M::Key>| async move { view.confirm(&pk).await })
    }
}

impl<M: Model> fmt::Debug for DeleteView<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeleteView")
            .field("model", &M::NAME)
            .field("template_name", &self.template_name)
            .field("shaper", &self.shaper)
            .finish_non_exhaustive()
    }
}

fn default_target<M: Model>(object: &M) -> String {
    object.dom_id().unwrap_or_else(|| M::NAME.to_owned())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::response::IS_FRAGMENT_RESPONSE;
    use crate::store::MemoryStore;
    use crate::testing::{assert_fragment, assert_full, fixtures::{renderer, Todo}};

    async fn seeded() -> Arc<MemoryStore<Todo>> {
        let store = Arc::new(MemoryStore::<Todo>::new());
        store
            .save(Todo {
                id: Some(5),
                description: "milk".into(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_delete_targets_dom_id_then_removes() {
        let store = seeded().await;
        let view = DeleteView::<Todo>::new(ViewConfig::new(), store.clone(), renderer()).unwrap();

        let response = view.delete(&5).await.unwrap();
        assert_fragment(&response, Action::Remove, "todo-5");
        assert!(response.body().contains(r#"target="todo-5""#));
        assert!(response.context().unwrap().contains_key(IS_FRAGMENT_RESPONSE));
        assert!(store.get(&5).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_does_not_delete() {
        let store = seeded().await;
        let view = DeleteView::<Todo>::new(ViewConfig::new(), store.clone(), renderer()).unwrap();

        let pending = view.resolve(&5).await.unwrap();
        assert_eq!(pending.target(), "todo-5");
        assert_eq!(pending.object().description, "milk");
        assert!(store.contains(&5));

        pending.commit(store.as_ref()).await.unwrap();
        assert!(!store.contains(&5));
    }

    #[tokio::test]
    async fn test_configured_action_is_overridden() {
        let store = seeded().await;
        let config = ViewConfig::new().action(Action::Append);
        let view = DeleteView::<Todo>::new(config, store, renderer()).unwrap();

        assert_fragment(&view.delete(&5).await.unwrap(), Action::Remove, "todo-5");
    }

    #[tokio::test]
    async fn test_fixed_target_rejected() {
        let store = seeded().await;
        let config = ViewConfig::new().target("item");
        assert!(matches!(
            DeleteView::<Todo>::new(config, store.clone(), renderer()),
            Err(TurboError::Configuration(_))
        ));
        assert!(store.contains(&5));
    }

    #[tokio::test]
    async fn test_resolver_target_aims_at_entity() {
        let store = seeded().await;
        let config = ViewConfig::new().target(Target::resolver(|todo: &Todo| {
            format!("row-{}", todo.id.unwrap_or_default())
        }));
        let view = DeleteView::<Todo>::new(config, store.clone(), renderer()).unwrap();

        let response = view.delete(&5).await.unwrap();
        assert_fragment(&response, Action::Remove, "row-5");
        assert!(response.body().contains(r#"target="row-5""#));
        assert!(!store.contains(&5));
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_found() {
        let view = DeleteView::<Todo>::new(ViewConfig::new(), seeded().await, renderer()).unwrap();
        assert!(view.delete(&6).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_confirm_renders_full_page() {
        let config = ViewConfig::new().template_name("confirm_delete.html");
        let view = DeleteView::<Todo>::new(config, seeded().await, renderer()).unwrap();

        let response = view.confirm(&5).await.unwrap();
        assert_full(&response, "confirm_delete.html");
        assert_eq!(response.body(), "<p>Delete milk?</p>");
    }

    #[tokio::test]
    async fn test_confirm_without_template_is_configuration_error() {
        let view = DeleteView::<Todo>::new(ViewConfig::new(), seeded().await, renderer()).unwrap();
        assert!(matches!(
            view.confirm(&5).await,
            Err(TurboError::Configuration(_))
        ));
    }

    #[test]
    fn test_success_url_rejected() {
        let config = ViewConfig::<Todo>::new().success_url("/todos/");
        let store = Arc::new(MemoryStore::<Todo>::new());
        assert!(DeleteView::new(config, store, renderer()).is_err());
    }

    struct FailingStore(MemoryStore<Todo>);

    #[async_trait]
    impl Store<Todo> for FailingStore {
        async fn get(&self, key: &i64) -> Result<Todo, TurboError> {
            self.0.get(key).await
        }

        async fn save(&self, model: Todo) -> Result<Todo, TurboError> {
            self.0.save(model).await
        }

        async fn delete(&self, _model: Todo) -> Result<(), TurboError> {
            Err(TurboError::Store("disk full".into()))
        }
    }

    #[tokio::test]
    async fn test_failed_delete_drops_response() {
        let inner = MemoryStore::<Todo>::new();
        inner.save(Todo::new("milk")).await.unwrap();
        let store = Arc::new(FailingStore(inner));
        let view = DeleteView::<Todo>::new(ViewConfig::new(), store.clone(), renderer()).unwrap();

        let err = view.delete(&1).await.unwrap_err();
        assert!(matches!(err, TurboError::Store(_)));
        assert!(store.0.contains(&1));
    }
}
