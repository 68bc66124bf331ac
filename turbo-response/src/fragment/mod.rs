//! Fragment markup
//!
//! Wraps rendered HTML in the tags the client library patches the DOM with:
//!
//! ```text
//! <fragment-stream action="ACTION" target="TARGET"><template>BODY</template></fragment-stream>
//! <fragment-frame target="TARGET">BODY</fragment-frame>
//! ```
//!
//! `ACTION` and `TARGET` are attribute-escaped. `BODY` is inserted verbatim;
//! callers hand in already-rendered, already-safe HTML.
//!
//! # Example
//!
//! ```rust
//! use turbo_response::fragment::{render_stream, Action};
//!
//! assert_eq!(
//!     render_stream(Action::Replace, "test", "hello"),
//!     r#"<fragment-stream action="replace" target="test"><template>hello</template></fragment-stream>"#,
//! );
//! ```

mod action;

use std::borrow::Cow;
use std::fmt;

pub use action::Action;

use crate::error::TurboError;

/// Tag name of a fragment stream
pub const STREAM_TAG: &str = "fragment-stream";

/// Tag name of a frame
pub const FRAME_TAG: &str = "fragment-frame";

/// Wrap `body` in a fragment-stream tag
#[must_use]
pub fn render_stream(action: Action, target: &str, body: &str) -> String {
    format!(
        r#"<{STREAM_TAG} action="{}" target="{}"><template>{body}</template></{STREAM_TAG}>"#,
        escape_attr(action.as_str()),
        escape_attr(target),
    )
}

/// Wrap `body` in a frame tag addressed by `target`
#[must_use]
pub fn render_frame(target: &str, body: &str) -> String {
    format!(
        r#"<{FRAME_TAG} target="{}">{body}</{FRAME_TAG}>"#,
        escape_attr(target)
    )
}

/// Escape a value for use inside a double-quoted HTML attribute
#[must_use]
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn require_target(target: &str) -> Result<(), TurboError> {
    if target.is_empty() {
        return Err(TurboError::InvalidFragment("target must not be empty".into()));
    }
    Ok(())
}

/// A fragment-stream envelope: action, target and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    action: Action,
    target: String,
    body: String,
}

impl Fragment {
    /// Create a fragment, checking the envelope invariants
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::InvalidFragment`] if `target` is empty, or if
    /// `body` is empty for any action other than [`Action::Remove`].
    pub fn new(
        action: Action,
        target: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, TurboError> {
        let target = target.into();
        let body = body.into();
        require_target(&target)?;
        if body.is_empty() && !action.allows_empty_body() {
            return Err(TurboError::InvalidFragment(format!(
                "`{action}` fragment for `{target}` has an empty body"
            )));
        }
        Ok(Self {
            action,
            target,
            body,
        })
    }

    /// Fragment that removes `target`
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::InvalidFragment`] if `target` is empty.
    pub fn remove(target: impl Into<String>) -> Result<Self, TurboError> {
        Self::new(Action::Remove, target, String::new())
    }

    /// The fragment action
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// The fragment target
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The unwrapped body
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Render the wrapped markup
    #[must_use]
    pub fn render(&self) -> String {
        render_stream(self.action, &self.target, &self.body)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A frame: body addressed by target only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    target: String,
    body: String,
}

impl Frame {
    /// Create a frame
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::InvalidFragment`] if `target` is empty.
    pub fn new(target: impl Into<String>, body: impl Into<String>) -> Result<Self, TurboError> {
        let target = target.into();
        require_target(&target)?;
        Ok(Self {
            target,
            body: body.into(),
        })
    }

    /// The frame target
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The unwrapped body
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Render the wrapped markup
    #[must_use]
    pub fn render(&self) -> String {
        render_frame(&self.target, &self.body)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Several fragments sent in one response, applied in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamBatch(Vec<Fragment>);

impl StreamBatch {
    /// Create an empty batch
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a fragment to the end of the batch
    #[must_use]
    pub fn with(mut self, fragment: Fragment) -> Self {
        self.0.push(fragment);
        self
    }

    /// Add a fragment to the end of the batch
    pub fn push(&mut self, fragment: Fragment) {
        self.0.push(fragment);
    }

    /// Number of fragments
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the batch holds no fragments
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the fragments in order
    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.0.iter()
    }

    /// Render every fragment back to back
    #[must_use]
    pub fn render(&self) -> String {
        self.0.iter().map(Fragment::render).collect()
    }
}

impl FromIterator<Fragment> for StreamBatch {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StreamBatch {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
