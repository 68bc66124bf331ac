//! Form view and the rendering shared by the edit views

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    routing::{get, MethodRouter},
    Form,
};
use serde::Serialize;

use super::ViewConfig;
use crate::error::TurboError;
use crate::forms::{validate, FormData, ValidationErrors, ERRORS_KEY, FORM_KEY};
use crate::fragment::Fragment;
use crate::response::{Body, RenderContext, Rendered, ViewResponse};
use crate::shaper::{Outcome, RenderMode, ResponseShaper};
use crate::template::TemplateRenderer;

/// Template, redirect and shaping common to every form-handling view
pub(crate) struct FormCore<E = ()> {
    template_name: String,
    success_url: String,
    shaper: ResponseShaper<E>,
    renderer: Arc<dyn TemplateRenderer>,
    extra_context: RenderContext,
}

impl<E> FormCore<E> {
    /// Template, success URL and target are all required
    pub(crate) fn from_config(
        config: ViewConfig<E>,
        renderer: Arc<dyn TemplateRenderer>,
        view: &str,
    ) -> Result<Self, TurboError> {
        let template_name = config.require_template(view)?;
        let success_url = config.require_success_url(view)?;
        let shaper = config.shaper();
        shaper.require_target(view)?;
        Ok(Self {
            template_name,
            success_url,
            shaper,
            renderer,
            extra_context: config.extra_context,
        })
    }

    /// Extra context plus the form values under `form`
    pub(crate) fn context<F: Serialize>(&self, form: &F) -> Result<RenderContext, TurboError> {
        let mut context = self.extra_context.clone();
        context.insert(FORM_KEY, form)?;
        Ok(context)
    }

    /// Whole page from the base template
    pub(crate) fn render_full(&self, context: RenderContext) -> Result<ViewResponse, TurboError> {
        let template_name =
            self.shaper
                .template_name(&self.template_name, RenderMode::Full, Outcome::Success);
        let html = self.renderer.render(&template_name, &context)?;
        Ok(Rendered::new(Body::Full(html))
            .with_template(template_name, context)
            .into())
    }

    /// Partial template with errors, wrapped as a fragment aimed at the target for `entity`
    pub(crate) fn render_invalid(
        &self,
        mut context: RenderContext,
        errors: &ValidationErrors,
        entity: &E,
    ) -> Result<ViewResponse, TurboError> {
        context.insert(ERRORS_KEY, errors)?;
        let target = self.shaper.resolve_target(entity)?;
        self.shaper
            .prepare_context(&mut context, RenderMode::Fragment, &target);

        let template_name =
            self.shaper
                .template_name(&self.template_name, RenderMode::Fragment, Outcome::Invalid);
        tracing::debug!(
            template = %template_name,
            fields = ?errors.fields().collect::<Vec<_>>(),
            "form invalid"
        );
        let html = self.renderer.render(&template_name, &context)?;
        let fragment = Fragment::new(self.shaper.action(), target, html)?;

        Ok(Rendered::new(Body::Stream(fragment))
            .with_template(template_name, context)
            .into())
    }

    pub(crate) fn redirect(&self) -> ViewResponse {
        ViewResponse::redirect(self.success_url.as_str())
    }
}

impl<E> fmt::Debug for FormCore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormCore")
            .field("template_name", &self.template_name)
            .field("success_url", &self.success_url)
            .field("shaper", &self.shaper)
            .finish_non_exhaustive()
    }
}

/// Callback run with a valid submission before redirecting
type OnValidFn<F> = Arc<dyn Fn(F) -> Result<(), TurboError> + Send + Sync>;

/// Displays a form and handles its submission
///
/// GET renders the base template in full. An invalid POST re-renders the
/// partial template inside a fragment so the client can swap the form in
/// place. A valid POST redirects to the success URL.
pub struct FormView<F: FormData> {
    core: FormCore,
    on_valid: Option<OnValidFn<F>>,
    _form: PhantomData<fn() -> F>,
}

impl<F: FormData> FormView<F> {
    /// Build from `config` (template, success URL and target required)
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if any of them is missing.
    pub fn new(config: ViewConfig, renderer: Arc<dyn TemplateRenderer>) -> Result<Self, TurboError> {
        Ok(Self {
            core: FormCore::from_config(config, renderer, "FormView")?,
            on_valid: None,
            _form: PhantomData,
        })
    }

    /// Run `f` with every valid submission; its error aborts the redirect
    #[must_use]
    pub fn with_on_valid(
        mut self,
        f: impl Fn(F) -> Result<(), TurboError> + Send + Sync + 'static,
    ) -> Self {
        self.on_valid = Some(Arc::new(f));
        self
    }

    /// Render the empty form
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn get(&self) -> Result<ViewResponse, TurboError> {
        self.core.render_full(self.core.context(&F::default())?)
    }

    /// Handle a submission
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the on-valid callback fails.
    /// Validation failure is not an error.
    pub fn post(&self, form: F) -> Result<ViewResponse, TurboError> {
        if let Err(errors) = validate(&form) {
            return self
                .core
                .render_invalid(self.core.context(&form)?, &errors, &());
        }
        if let Some(on_valid) = &self.on_valid {
            on_valid(form)?;
        }
        Ok(self.core.redirect())
    }

    /// GET and POST handlers
    pub fn as_view(self) -> MethodRouter {
        let view = Arc::new(self);
        let get_view = Arc::clone(&view);
        get(move || async move { get_view.get() })
            .post(move |Form(form): Form<F>| async move { view.post(form) })
    }
}

impl<F: FormData> fmt::Debug for FormView<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormView")
            .field("core", &self.core)
            .field("on_valid", &self.on_valid.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::fragment::Action;
    use crate::response::{FRAGMENT_STREAM_CONTENT_TYPE, IS_FRAGMENT_RESPONSE};
    use crate::testing::{
        assert_fragment, assert_full, assert_redirect, body_string, content_type, form_request,
        fixtures::{renderer, TodoForm, FORM_TEMPLATE},
    };
    use axum::{
        http::{header, Method, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    fn config() -> ViewConfig {
        ViewConfig::new()
            .template_name(FORM_TEMPLATE)
            .target("todo-form")
            .success_url("/todos/")
    }

    fn view() -> FormView<TodoForm> {
        FormView::new(config(), renderer()).unwrap()
    }

    #[test]
    fn test_get_renders_full_page() {
        let response = view().get().unwrap();
        assert_full(&response, "form.html");
        assert!(response.context().unwrap().contains_key(FORM_KEY));
        assert!(!response.context().unwrap().contains_key(ERRORS_KEY));
    }

    #[test]
    fn test_invalid_post_renders_partial_fragment() {
        let response = view().post(TodoForm::default()).unwrap();

        assert_fragment(&response, Action::Replace, "todo-form");
        assert_eq!(response.template_name(), Some("_form.html"));
        let context = response.context().unwrap();
        assert!(context.contains_key(IS_FRAGMENT_RESPONSE));
        assert_eq!(context.fragment_action(), Some(Action::Replace));
        assert_eq!(context.fragment_target(), Some("todo-form"));
        assert!(response
            .body()
            .contains(r#"<p class="error">description: This field is required.</p>"#));
    }

    #[test]
    fn test_invalid_post_uses_configured_action() {
        let view = FormView::<TodoForm>::new(config().action(Action::Update), renderer()).unwrap();
        let response = view.post(TodoForm::default()).unwrap();
        assert_fragment(&response, Action::Update, "todo-form");
    }

    #[test]
    fn test_valid_post_redirects() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let view = view().with_on_valid(move |form: TodoForm| {
            assert_eq!(form.description, "milk");
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let response = view
            .post(TodoForm {
                description: "milk".into(),
            })
            .unwrap();
        assert_redirect(&response, "/todos/");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_on_valid_error_propagates() {
        let view = view().with_on_valid(|_| Err(TurboError::Store("down".into())));
        let err = view
            .post(TodoForm {
                description: "milk".into(),
            })
            .unwrap_err();
        assert!(matches!(err, TurboError::Store(_)));
    }

    #[test]
    fn test_requires_success_url() {
        let config = ViewConfig::new().template_name("form.html").target("t");
        let err = FormView::<TodoForm>::new(config, renderer()).unwrap_err();
        assert!(err.to_string().contains("success URL"));
    }

    #[test]
    fn test_requires_target() {
        let config = ViewConfig::new()
            .template_name("form.html")
            .success_url("/");
        assert!(FormView::<TodoForm>::new(config, renderer()).is_err());
    }

    #[tokio::test]
    async fn test_as_view_round_trip() {
        let app = Router::new().route("/todos/new", view().as_view());

        let response = app
            .clone()
            .oneshot(form_request(Method::POST, "/todos/new", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), Some(FRAGMENT_STREAM_CONTENT_TYPE));
        assert!(body_string(response)
            .await
            .starts_with(r#"<fragment-stream action="replace" target="todo-form"><template>"#));

        let response = app
            .oneshot(form_request(Method::POST, "/todos/new", "description=milk"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/todos/");
    }
}
