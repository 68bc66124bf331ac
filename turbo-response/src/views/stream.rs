//! Fragment-stream views

use std::fmt;
use std::sync::Arc;

use axum::routing::{any, MethodRouter};

use super::{path_context, PathParams, ViewConfig};
use crate::error::TurboError;
use crate::fragment::Fragment;
use crate::response::{Body, RenderContext, Rendered, ViewResponse};
use crate::shaper::{Outcome, RenderMode, ResponseShaper};
use crate::template::TemplateRenderer;

/// Produces a view's body on each request
pub type ContentFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Answers every method with one fragment of generated content
pub struct StreamView {
    shaper: ResponseShaper,
    content: ContentFn,
}

impl StreamView {
    /// Build from `config` (target required) and a content generator
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if no target is configured.
    pub fn new(
        config: ViewConfig,
        content: impl Fn() -> String + Send + Sync + 'static,
    ) -> Result<Self, TurboError> {
        let shaper = config.shaper();
        shaper.require_target("StreamView")?;
        Ok(Self {
            shaper,
            content: Arc::new(content),
        })
    }

    /// Render the fragment
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::InvalidFragment`] if the content is empty and the
    /// action is not `remove`.
    pub fn render(&self) -> Result<ViewResponse, TurboError> {
        let target = self.shaper.resolve_target(&())?;
        let fragment = Fragment::new(self.shaper.action(), target, (self.content)())?;
        Ok(ViewResponse::stream(fragment))
    }

    /// Route handler for any method
    pub fn as_view(self) -> MethodRouter {
        let view = Arc::new(self);
        any(move || async move { view.render() })
    }
}

impl fmt::Debug for StreamView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamView")
            .field("shaper", &self.shaper)
            .finish_non_exhaustive()
    }
}

/// Renders a template inside a fragment-stream
///
/// The template name is used as configured; the fragment keys are always in
/// the context.
pub struct StreamTemplateView {
    template_name: String,
    shaper: ResponseShaper,
    renderer: Arc<dyn TemplateRenderer>,
    extra_context: RenderContext,
}

impl StreamTemplateView {
    /// Build from `config` (template and target required)
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if the template or target is missing.
    pub fn new(config: ViewConfig, renderer: Arc<dyn TemplateRenderer>) -> Result<Self, TurboError> {
        let template_name = config.require_template("StreamTemplateView")?;
        let shaper = config.shaper();
        shaper.require_target("StreamTemplateView")?;
        Ok(Self {
            template_name,
            shaper,
            renderer,
            extra_context: config.extra_context,
        })
    }

    /// Render with `context` merged over the configured extra context
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or produces an invalid fragment.
    pub fn render(&self, context: &RenderContext) -> Result<ViewResponse, TurboError> {
        let mut context = {
            let mut merged = self.extra_context.clone();
            merged.extend(context);
            merged
        };
        let target = self.shaper.resolve_target(&())?;
        self.shaper
            .prepare_context(&mut context, RenderMode::Fragment, &target);

        let template_name =
            self.shaper
                .template_name(&self.template_name, RenderMode::Fragment, Outcome::Success);
        let html = self.renderer.render(&template_name, &context)?;
        let fragment = Fragment::new(self.shaper.action(), target, html)?;

        Ok(Rendered::new(Body::Stream(fragment))
            .with_template(template_name, context)
            .into())
    }

    /// Route handler for any method; route parameters are in the context
    pub fn as_view(self) -> MethodRouter {
        let view = Arc::new(self);
        any(move |params: PathParams| async move { view.render(&path_context(params)) })
    }
}

impl fmt::Debug for StreamTemplateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamTemplateView")
            .field("template_name", &self.template_name)
            .field("shaper", &self.shaper)
            .finish_non_exhaustive()
    }
}
