//! Request-scoped render context

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::TurboError;
use crate::fragment::Action;

/// Key set to `true` when the response is fragment-wrapped
pub const IS_FRAGMENT_RESPONSE: &str = "is_fragment_response";

/// Key holding the fragment action
pub const FRAGMENT_ACTION: &str = "fragment_action";

/// Key holding the fragment target
pub const FRAGMENT_TARGET: &str = "fragment_target";

/// Key holding a frame's target
pub const FRAME_TARGET: &str = "frame_target";

/// Values handed to the template renderer
///
/// Fragment mode is signalled by the *presence* of
/// [`IS_FRAGMENT_RESPONSE`], never by its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderContext(Map<String, Value>);

impl RenderContext {
    /// Empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `value` and store it under `key`
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Serialization`] if `value` cannot be turned into JSON.
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<&mut Self, TurboError> {
        self.0.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Store an already-built JSON value under `key`
    pub fn insert_value(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Builder-style [`insert_value`](Self::insert_value)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether `key` is present
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove `key`, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Copy every entry of `other` into this context, overwriting on conflict
    pub fn extend(&mut self, other: &Self) {
        self.0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the context is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the fragment keys were injected
    #[must_use]
    pub fn is_fragment_response(&self) -> bool {
        self.contains_key(IS_FRAGMENT_RESPONSE)
    }

    /// The injected fragment action, if any
    #[must_use]
    pub fn fragment_action(&self) -> Option<Action> {
        self.get(FRAGMENT_ACTION)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// The injected fragment target, if any
    #[must_use]
    pub fn fragment_target(&self) -> Option<&str> {
        self.get(FRAGMENT_TARGET).and_then(Value::as_str)
    }

    /// Borrow the underlying map
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for RenderContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fragment_mode_is_key_presence() {
        let mut context = RenderContext::new();
        assert!(!context.is_fragment_response());

        // a falsy value still means fragment mode
        context.insert_value(IS_FRAGMENT_RESPONSE, json!(false));
        assert!(context.is_fragment_response());
    }

    #[test]
    fn test_fragment_accessors() {
        let context = RenderContext::new()
            .with(IS_FRAGMENT_RESPONSE, true)
            .with(FRAGMENT_ACTION, "append")
            .with(FRAGMENT_TARGET, "list");

        assert_eq!(context.fragment_action(), Some(Action::Append));
        assert_eq!(context.fragment_target(), Some("list"));
    }

    #[test]
    fn test_insert_serializes() {
        #[derive(Serialize)]
        struct Item {
            name: &'static str,
        }

        let mut context = RenderContext::new();
        context.insert("item", &Item { name: "milk" }).unwrap();
        assert_eq!(context.get("item"), Some(&json!({"name": "milk"})));
    }

    #[test]
    fn test_extend_overwrites() {
        let mut base = RenderContext::new().with("a", 1).with("b", 2);
        base.extend(&RenderContext::new().with("b", 3));
        assert_eq!(base.get("b"), Some(&json!(3)));
        assert_eq!(base.len(), 2);
    }
}
