//! Response shaping
//!
//! Each view owns a [`ResponseShaper`] and asks it, per request, which
//! content type and template to use and which fragment keys to put in the
//! render context.
//!
//! | mode       | outcome   | content type                                 | template     |
//! |------------|-----------|----------------------------------------------|--------------|
//! | `Full`     | any       | `text/html; charset=utf-8`                   | `form.html`  |
//! | `Fragment` | `Success` | `text/html; fragment-stream; charset=utf-8`  | `form.html`  |
//! | `Fragment` | `Invalid` | `text/html; fragment-stream; charset=utf-8`  | `_form.html` |

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::TurboError;
use crate::fragment::Action;
use crate::response::{
    RenderContext, FRAGMENT_ACTION, FRAGMENT_STREAM_CONTENT_TYPE, FRAGMENT_TARGET,
    HTML_CONTENT_TYPE, IS_FRAGMENT_RESPONSE,
};

/// Default prefix marking a partial template
pub const DEFAULT_PARTIAL_PREFIX: &str = "_";

/// Whether the response is a whole page or a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Whole page, plain HTML
    Full,
    /// Fragment-wrapped output
    Fragment,
}

/// Result of processing the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Processed without validation errors
    Success,
    /// Submitted data failed validation
    Invalid,
}

/// Resolver computing a target from the entity a view works on
pub type TargetFn<E> = Arc<dyn Fn(&E) -> String + Send + Sync>;

/// Where a fragment is applied
pub enum Target<E = ()> {
    /// Fixed identifier
    Fixed(String),
    /// Identifier derived from the entity
    Resolve(TargetFn<E>),
}

impl<E> Target<E> {
    /// Target computed by `f`
    pub fn resolver(f: impl Fn(&E) -> String + Send + Sync + 'static) -> Self {
        Self::Resolve(Arc::new(f))
    }

    /// Compute the identifier for `entity`
    #[must_use]
    pub fn resolve(&self, entity: &E) -> String {
        match self {
            Self::Fixed(target) => target.clone(),
            Self::Resolve(f) => f(entity),
        }
    }
}

impl<E> Clone for Target<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(target) => Self::Fixed(target.clone()),
            Self::Resolve(f) => Self::Resolve(Arc::clone(f)),
        }
    }
}

impl<E> fmt::Debug for Target<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(target) => f.debug_tuple("Fixed").field(target).finish(),
            Self::Resolve(_) => f.write_str("Resolve(<fn>)"),
        }
    }
}

impl<E> From<&str> for Target<E> {
    fn from(target: &str) -> Self {
        Self::Fixed(target.to_owned())
    }
}

impl<E> From<String> for Target<E> {
    fn from(target: String) -> Self {
        Self::Fixed(target)
    }
}

/// Picks content type, template and fragment keys for a view
pub struct ResponseShaper<E = ()> {
    target: Option<Target<E>>,
    action: Action,
    partial_prefix: String,
}

impl<E> ResponseShaper<E> {
    /// Shaper with no target and the default action
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: None,
            action: Action::default(),
            partial_prefix: DEFAULT_PARTIAL_PREFIX.to_owned(),
        }
    }

    /// Set the target
    #[must_use]
    pub fn with_target(mut self, target: impl Into<Target<E>>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the target if one is given
    #[must_use]
    pub fn with_optional_target(mut self, target: Option<Target<E>>) -> Self {
        if target.is_some() {
            self.target = target;
        }
        self
    }

    /// Set the action
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Set the prefix that turns a template name into its partial
    #[must_use]
    pub fn with_partial_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.partial_prefix = prefix.into();
        self
    }

    /// Configured action
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Whether a target has been configured
    #[must_use]
    pub const fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Fail unless a target is configured
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] naming `view` when no target is set.
    pub fn require_target(&self, view: &str) -> Result<(), TurboError> {
        if self.has_target() {
            return Ok(());
        }
        Err(TurboError::configuration(format!(
            "{view} requires a fragment target"
        )))
    }

    /// Content type for a render mode
    #[must_use]
    pub const fn content_type(mode: RenderMode) -> &'static str {
        match mode {
            RenderMode::Full => HTML_CONTENT_TYPE,
            RenderMode::Fragment => FRAGMENT_STREAM_CONTENT_TYPE,
        }
    }

    /// Template to render for `base`, given mode and outcome
    #[must_use]
    pub fn template_name(&self, base: &str, mode: RenderMode, outcome: Outcome) -> String {
        match (mode, outcome) {
            (RenderMode::Fragment, Outcome::Invalid) => self.partial_template_name(base),
            _ => base.to_owned(),
        }
    }

    /// Partial variant of `base`: the prefix goes on the file name, not the directory
    #[must_use]
    pub fn partial_template_name(&self, base: &str) -> String {
        match base.rsplit_once('/') {
            Some((dir, file)) => format!("{dir}/{}{file}", self.partial_prefix),
            None => format!("{}{base}", self.partial_prefix),
        }
    }

    /// Identifier the fragment is applied to
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Configuration`] if no target is configured.
    pub fn resolve_target(&self, entity: &E) -> Result<String, TurboError> {
        self.target
            .as_ref()
            .map(|target| target.resolve(entity))
            .ok_or_else(|| TurboError::configuration("no fragment target configured"))
    }

    /// Put the fragment keys into `context`
    pub fn inject(&self, context: &mut RenderContext, target: &str) {
        context
            .insert_value(IS_FRAGMENT_RESPONSE, Value::Bool(true))
            .insert_value(FRAGMENT_ACTION, Value::from(self.action.as_str()))
            .insert_value(FRAGMENT_TARGET, Value::from(target));
    }

    /// Inject fragment keys when `mode` asks for them, leave `context` untouched otherwise
    pub fn prepare_context(&self, context: &mut RenderContext, mode: RenderMode, target: &str) {
        if mode == RenderMode::Fragment {
            tracing::debug!(action = %self.action, fragment_target = target, "fragment mode");
            self.inject(context, target);
        }
    }
}

impl<E> Default for ResponseShaper<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for ResponseShaper<E> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            action: self.action,
            partial_prefix: self.partial_prefix.clone(),
        }
    }
}

impl<E> fmt::Debug for ResponseShaper<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseShaper")
            .field("target", &self.target)
            .field("action", &self.action)
            .field("partial_prefix", &self.partial_prefix)
            .finish()
    }
}
