//! Settings
//!
//! Loaded from an optional TOML file, then overridden from `TURBO__*`
//! environment variables (`TURBO__PARTIAL_PREFIX=partial_`).

use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::TurboError;
use crate::shaper::DEFAULT_PARTIAL_PREFIX;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TURBO";

/// Crate settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TurboConfig {
    /// Glob the template renderer loads from
    pub template_glob: String,
    /// Prefix turning `form.html` into its partial `_form.html`
    pub partial_prefix: String,
    /// Address a server built on these views binds to
    pub bind_addr: String,
}

impl Default for TurboConfig {
    fn default() -> Self {
        Self {
            template_glob: "templates/**/*.html".into(),
            partial_prefix: DEFAULT_PARTIAL_PREFIX.into(),
            bind_addr: "127.0.0.1:8000".into(),
        }
    }
}

impl TurboConfig {
    /// Load from `path` (if it exists) and the environment
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Config`] if a source is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, TurboError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Parse from a TOML string, ignoring the environment
    ///
    /// # Errors
    ///
    /// Returns [`TurboError::Config`] if `toml` is malformed.
    pub fn from_toml(toml: &str) -> Result<Self, TurboError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TurboConfig::default();
        assert_eq!(config.partial_prefix, "_");
        assert_eq!(config.template_glob, "templates/**/*.html");
    }

    #[test]
    fn test_from_toml_overrides_some_keys() {
        let config = TurboConfig::from_toml(
            r#"
            partial_prefix = "partial_"
            bind_addr = "0.0.0.0:3000"
            "#,
        )
        .unwrap();

        assert_eq!(config.partial_prefix, "partial_");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.template_glob, TurboConfig::default().template_glob);
    }

    #[test]
    fn test_from_toml_rejects_malformed() {
        let err = TurboConfig::from_toml("partial_prefix = [").unwrap_err();
        assert!(matches!(err, TurboError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let config = TurboConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap();
        assert_eq!(config.template_glob, TurboConfig::default().template_glob);
    }
}
