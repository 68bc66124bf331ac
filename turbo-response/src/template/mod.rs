//! Template rendering
//!
//! Views only need "render this template name with this context". The
//! [`TemplateRenderer`] trait is that seam; [`TeraRenderer`] backs it with
//! Tera.

use tera::{Context, Tera};

use crate::config::TurboConfig;
use crate::error::TurboError;
use crate::response::RenderContext;

/// Renders a named template with a context into HTML
pub trait TemplateRenderer: Send + Sync + 'static {
    /// Render `template_name` with `context`
    ///
    /// # Errors
    ///
    /// Returns an error if the template is missing or fails to render.
    fn render(&self, template_name: &str, context: &RenderContext) -> Result<String, TurboError>;
}

/// [`TemplateRenderer`] backed by a [`Tera`] instance
#[derive(Debug, Clone)]
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    /// Load every template matching `glob`
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Template`] if a template fails to parse.
    pub fn new(glob: &str) -> Result<Self, TurboError> {
        let tera = Tera::new(glob)?;
        tracing::info!(
            glob,
            templates = tera.get_template_names().count(),
            "loaded templates"
        );
        Ok(Self { tera })
    }

    /// Load templates from the configured glob
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Template`] if a template fails to parse.
    pub fn from_config(config: &TurboConfig) -> Result<Self, TurboError> {
        Self::new(&config.template_glob)
    }

    /// Build from in-memory `(name, source)` pairs
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Template`] if a template fails to parse.
    pub fn from_raw<'a>(
        templates: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, TurboError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)?;
        Ok(Self { tera })
    }

    /// Wrap an existing Tera instance
    #[must_use]
    pub const fn from_tera(tera: Tera) -> Self {
        Self { tera }
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(&self, template_name: &str, context: &RenderContext) -> Result<String, TurboError> {
        let context = Context::from_serialize(context)?;
        Ok(self.tera.render(template_name, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> TeraRenderer {
        TeraRenderer::from_raw([
            ("hello.html", "<p>Hello {{ name }}</p>"),
            ("list/_row.html", "<li>{{ item }}</li>"),
        ])
        .unwrap()
    }

    #[test]
    fn test_render_with_context() {
        let context = RenderContext::new().with("name", "world");
        assert_eq!(renderer().render("hello.html", &context).unwrap(), "<p>Hello world</p>");
    }

    #[test]
    fn test_render_autoescapes_html_templates() {
        let context = RenderContext::new().with("item", "<script>");
        assert_eq!(
            renderer().render("list/_row.html", &context).unwrap(),
            "<li>&lt;script&gt;</li>"
        );
    }

    #[test]
    fn test_missing_template_is_template_error() {
        let err = renderer()
            .render("missing.html", &RenderContext::new())
            .unwrap_err();
        assert!(matches!(err, TurboError::Template(_)));
    }
}
