//! Error types and HTTP mapping
//!
//! Validation failures are not errors: they travel through the
//! [`Outcome::Invalid`](crate::shaper::Outcome) path and are rendered as a
//! partial template. Everything here surfaces as a distinct HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::Model;

/// Framework error type
#[derive(Debug, Error)]
pub enum TurboError {
    /// Entity lookup by key failed
    #[error("{model} matching key {key} does not exist")]
    NotFound {
        /// Model name of the missing entity
        model: &'static str,
        /// Key that was looked up, as displayed
        key: String,
    },

    /// A view was built without something it needs (target, template, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A fragment envelope broke its invariants
    #[error("Invalid fragment: {0}")]
    InvalidFragment(String),

    /// Template lookup or rendering failed
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// A context value could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store failed
    #[error("Store error: {0}")]
    Store(String),

    /// Settings could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),
}

impl TurboError {
    /// Not-found error for a model key
    #[must_use]
    pub fn not_found<M: Model>(key: &M::Key) -> Self {
        Self::NotFound {
            model: M::NAME,
            key: key.to_string(),
        }
    }

    /// Configuration error with a message
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this is a [`TurboError::NotFound`]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP status this error maps to
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TurboError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "view failed");
            return (status, "An internal error occurred.").into_response();
        }

        tracing::debug!(error = %self, "view returned client error");
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::Todo;

    #[test]
    fn test_not_found_names_model_and_key() {
        let err = TurboError::not_found::<Todo>(&5);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "todo matching key 5 does not exist");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_configuration_is_server_error() {
        let err = TurboError::configuration("missing target");
        assert!(!err.is_not_found());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Configuration error: missing target");
    }

    #[test]
    fn test_into_response_hides_server_error_details() {
        let response = TurboError::Store("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = TurboError::not_found::<Todo>(&1).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
