//! Views
//!
//! Each view is a plain struct built from a [`ViewConfig`] and composed with
//! a [`ResponseShaper`]. `as_view()` turns it into an axum
//! [`MethodRouter`](axum::routing::MethodRouter).
//!
//! | view                   | body                                      |
//! |------------------------|-------------------------------------------|
//! | [`StreamView`]         | fragment of generated content             |
//! | [`StreamTemplateView`] | fragment of a rendered template           |
//! | [`FrameView`]          | frame of generated content                |
//! | [`FrameTemplateView`]  | frame of a rendered template              |
//! | [`FormView`]           | form page; invalid POST re-renders as a fragment |
//! | [`CreateView`]         | as `FormView`, saving a new entity        |
//! | [`UpdateView`]         | as `FormView`, editing a loaded entity    |
//! | [`DeleteView`]         | `remove` fragment for a deleted entity    |
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use turbo_response::prelude::*;
//! use turbo_response::testing::fixtures::{renderer, Todo, TodoForm};
//!
//! # fn example() -> Result<(), TurboError> {
//! let store = Arc::new(MemoryStore::<Todo>::new());
//!
//! let create = CreateView::<Todo, TodoForm>::new(
//!     ViewConfig::new()
//!         .template_name("form.html")
//!         .target("todo-form")
//!         .success_url("/todos/"),
//!     store.clone(),
//!     renderer(),
//! )?;
//! let delete = DeleteView::<Todo>::new(ViewConfig::new(), store, renderer())?;
//!
//! let app: Router = Router::new()
//!     .route("/todos/new", create.as_view())
//!     .route("/todos/:pk/delete", delete.as_view());
//! # Ok(())
//! # }
//! ```

mod delete;
mod edit;
mod form;
mod frame;
mod stream;

use std::collections::HashMap;
use std::fmt;

use axum::extract::Path;
use serde_json::Value;

pub use delete::{DeleteView, PendingDelete};
pub use edit::{CreateView, UpdateView};
pub use form::FormView;
pub use frame::{FrameView, FrameTemplateView};
pub use stream::{ContentFn, StreamTemplateView, StreamView};

use crate::config::TurboConfig;
use crate::error::TurboError;
use crate::fragment::Action;
use crate::response::RenderContext;
use crate::shaper::{ResponseShaper, Target, DEFAULT_PARTIAL_PREFIX};

/// Per-view configuration
///
/// Which fields are required depends on the view; constructors fail with
/// [`TurboError::Configuration`] when one is missing.
pub struct ViewConfig<E = ()> {
    /// Base template
    pub template_name: Option<String>,
    /// Where a successful submission redirects
    pub success_url: Option<String>,
    /// Fragment or frame target
    pub target: Option<Target<E>>,
    /// Fragment action
    pub action: Action,
    /// Prefix marking partial templates
    pub partial_prefix: String,
    /// Values added to every render context
    pub extra_context: RenderContext,
}

impl<E> ViewConfig<E> {
    /// Empty configuration with the default action
    #[must_use]
    pub fn new() -> Self {
        Self {
            template_name: None,
            success_url: None,
            target: None,
            action: Action::default(),
            partial_prefix: DEFAULT_PARTIAL_PREFIX.to_owned(),
            extra_context: RenderContext::new(),
        }
    }

    /// Empty configuration taking the partial prefix from settings
    #[must_use]
    pub fn from_settings(settings: &TurboConfig) -> Self {
        Self::new().partial_prefix(settings.partial_prefix.clone())
    }

    /// Set the base template
    #[must_use]
    pub fn template_name(mut self, template_name: impl Into<String>) -> Self {
        self.template_name = Some(template_name.into());
        self
    }

    /// Set the success URL
    #[must_use]
    pub fn success_url(mut self, url: impl Into<String>) -> Self {
        self.success_url = Some(url.into());
        self
    }

    /// Set the target: a string, or a [`Target::resolver`]
    #[must_use]
    pub fn target(mut self, target: impl Into<Target<E>>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the action
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Set the partial template prefix
    #[must_use]
    pub fn partial_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.partial_prefix = prefix.into();
        self
    }

    /// Set values added to every render context
    #[must_use]
    pub fn extra_context(mut self, context: RenderContext) -> Self {
        self.extra_context = context;
        self
    }

    pub(crate) fn shaper(&self) -> ResponseShaper<E> {
        ResponseShaper::new()
            .with_optional_target(self.target.clone())
            .with_action(self.action)
            .with_partial_prefix(self.partial_prefix.clone())
    }

    pub(crate) fn require_template(&self, view: &str) -> Result<String, TurboError> {
        require(self.template_name.clone(), view, "a template name")
    }

    pub(crate) fn require_success_url(&self, view: &str) -> Result<String, TurboError> {
        require(self.success_url.clone(), view, "a success URL")
    }
}

impl<E> Default for ViewConfig<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ViewConfig<E> {
    fn clone(&self) -> Self {
        Self {
            template_name: self.template_name.clone(),
            success_url: self.success_url.clone(),
            target: self.target.clone(),
            action: self.action,
            partial_prefix: self.partial_prefix.clone(),
            extra_context: self.extra_context.clone(),
        }
    }
}

impl<E> fmt::Debug for ViewConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewConfig")
            .field("template_name", &self.template_name)
            .field("success_url", &self.success_url)
            .field("target", &self.target)
            .field("action", &self.action)
            .field("partial_prefix", &self.partial_prefix)
            .finish_non_exhaustive()
    }
}

fn require<T>(value: Option<T>, view: &str, what: &str) -> Result<T, TurboError> {
    value.ok_or_else(|| TurboError::configuration(format!("{view} requires {what}")))
}

/// Route parameters captured by a template view's handler
pub(crate) type PathParams = Option<Path<HashMap<String, String>>>;

/// Route parameters as string values in a fresh context
pub(crate) fn path_context(params: PathParams) -> RenderContext {
    let mut context = RenderContext::new();
    for (key, value) in params.map(|Path(params)| params).unwrap_or_default() {
        context.insert_value(key, Value::from(value));
    }
    context
}
