//! Fragment actions
//!
//! How a fragment mutates its target on the client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TurboError;

/// How a fragment-stream mutates its target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Append the body to the target's children
    Append,
    /// Prepend the body to the target's children
    Prepend,
    /// Replace the target element itself
    #[default]
    Replace,
    /// Replace the target's children
    Update,
    /// Remove the target element; the body is ignored
    Remove,
    /// Insert the body before the target element
    Before,
    /// Insert the body after the target element
    After,
}

impl Action {
    /// All actions, in wire order
    pub const ALL: [Self; 7] = [
        Self::Append,
        Self::Prepend,
        Self::Replace,
        Self::Update,
        Self::Remove,
        Self::Before,
        Self::After,
    ];

    /// Wire form used in the `action` attribute
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Prepend => "prepend",
            Self::Replace => "replace",
            Self::Update => "update",
            Self::Remove => "remove",
            Self::Before => "before",
            Self::After => "after",
        }
    }

    /// Whether a fragment with this action may carry an empty body
    #[must_use]
    pub const fn allows_empty_body(self) -> bool {
        matches!(self, Self::Remove)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = TurboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| TurboError::configuration(format!("unknown fragment action `{s}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_replace() {
        assert_eq!(Action::default(), Action::Replace);
    }

    #[test]
    fn test_parse_and_display_agree() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_parse_unknown_is_configuration_error() {
        let err = "explode".parse::<Action>().unwrap_err();
        assert!(matches!(err, TurboError::Configuration(_)));
    }

    #[test]
    fn test_serde_uses_wire_form() {
        assert_eq!(serde_json::to_string(&Action::Prepend).unwrap(), r#""prepend""#);
        let action: Action = serde_json::from_str(r#""remove""#).unwrap();
        assert_eq!(action, Action::Remove);
    }

    #[test]
    fn test_only_remove_allows_empty_body() {
        let empty_ok: Vec<_> = Action::ALL
            .into_iter()
            .filter(|a| a.allows_empty_body())
            .collect();
        assert_eq!(empty_ok, vec![Action::Remove]);
    }
}
