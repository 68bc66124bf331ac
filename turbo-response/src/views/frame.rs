//! Frame views

use std::fmt;
use std::sync::Arc;

use axum::routing::{any, MethodRouter};
use serde_json::Value;

use super::{path_context, ContentFn, PathParams, ViewConfig};
use crate::error::TurboError;
use crate::fragment::Frame;
use crate::response::{Body, RenderContext, Rendered, ViewResponse, FRAME_TARGET};
use crate::shaper::ResponseShaper;
use crate::template::TemplateRenderer;

/// Wraps generated content in a frame
pub struct FrameView {
    shaper: ResponseShaper,
    content: ContentFn,
}

impl FrameView {
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
        shaper.require_target("FrameView")?;
        Ok(Self {
            shaper,
            content: Arc::new(content),
        })
    }

    /// Render the frame
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if the target cannot be resolved.
    pub fn render(&self) -> Result<ViewResponse, TurboError> {
        let target = self.shaper.resolve_target(&())?;
        Ok(ViewResponse::frame(Frame::new(target, (self.content)())?))
    }

    /// Route handler for any method
    pub fn as_view(self) -> MethodRouter {
        let view = Arc::new(self);
        any(move || async move { view.render() })
    }
}

impl fmt::Debug for FrameView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameView")
            .field("shaper", &self.shaper)
            .finish_non_exhaustive()
    }
}

/// Renders a template inside a frame, with `frame_target` in the context
pub struct FrameTemplateView {
    template_name: String,
    shaper: ResponseShaper,
    renderer: Arc<dyn TemplateRenderer>,
    extra_context: RenderContext,
}

impl FrameTemplateView {
    /// Build from `config` (template and target required)
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if the template or target is missing.
    pub fn new(config: ViewConfig, renderer: Arc<dyn TemplateRenderer>) -> Result<Self, TurboError> {
        let template_name = config.require_template("FrameTemplateView")?;
        let shaper = config.shaper();
        shaper.require_target("FrameTemplateView")?;
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
    /// Returns an error if the template fails to render.
    pub fn render(&self, context: &RenderContext) -> Result<ViewResponse, TurboError> {
        let target = self.shaper.resolve_target(&())?;
        let mut merged = self.extra_context.clone();
        merged.extend(context);
        merged.insert_value(FRAME_TARGET, Value::from(target.as_str()));

        let html = self.renderer.render(&self.template_name, &merged)?;
        let frame = Frame::new(target, html)?;
        Ok(Rendered::new(Body::Frame(frame))
            .with_template(self.template_name.clone(), merged)
            .into())
    }

    /// Route handler for any method; route parameters are in the context
    pub fn as_view(self) -> MethodRouter {
        let view = Arc::new(self);
        any(move |params: PathParams| async move { view.render(&path_context(params)) })
    }
}

impl fmt::Debug for FrameTemplateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameTemplateView")
            .field("template_name", &self.template_name)
            .field("shaper", &self.shaper)
            .finish_non_exhaustive()
    }
}
