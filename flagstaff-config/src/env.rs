// Environment variable loading

use crate::{ConfigError, ConfigLoader, FeaturesDocument, Result};
use std::env;
use tracing::debug;

/// Default prefix for Flagstaff environment variables
pub const ENV_PREFIX: &str = "FLAGSTAFF";

/// Environment used when none is configured
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Environment variable loader
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.full_key(key)).map_err(ConfigError::EnvError)
    }

    /// Load a variable, `None` when unset or empty
    pub fn load_opt(&self, key: &str) -> Option<String> {
        self.load_var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    fn full_key(&self, key: &str) -> String {
        match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(Some(ENV_PREFIX.to_string()))
    }
}

/// Startup settings for the feature subsystem.
///
/// - `FLAGSTAFF_CONFIG` - path of the features file (`.json` or `.toml`)
/// - `FLAGSTAFF_ENVIRONMENT` - deployment environment name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeaturesSettings {
    pub config_path: Option<String>,
    pub environment: Option<String>,
}

impl FeaturesSettings {
    /// Read settings from `FLAGSTAFF_*` environment variables
    pub fn from_env() -> Self {
        Self::from_loader(&EnvLoader::default())
    }

    /// Load a `.env` file first, then read the environment.
    ///
    /// A missing default `.env` file is ignored; an explicit path must exist.
    pub fn from_dotenv(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        } else {
            dotenvy::dotenv().ok();
        }
        Ok(Self::from_env())
    }

    pub fn from_loader(loader: &EnvLoader) -> Self {
        let settings = Self {
            config_path: loader.load_opt("CONFIG"),
            environment: loader.load_opt("ENVIRONMENT"),
        };
        debug!(?settings, "Loaded feature settings");
        settings
    }

    /// Read the features document named by `config_path`
    pub fn load_document(&self) -> Result<FeaturesDocument> {
        let path = self
            .config_path
            .as_deref()
            .ok_or_else(|| ConfigError::KeyNotFound(format!("{}_CONFIG", ENV_PREFIX)))?;

        ConfigLoader::auto(path)?.load_file(path)
    }

    /// Environment name: explicit setting, then the document's, then the default
    pub fn environment_for(&self, document: &FeaturesDocument) -> String {
        self.environment
            .clone()
            .or_else(|| document.environment.clone())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: std::env::set_var is unsafe in edition 2024; these tests rely on
    // variables that are guaranteed not to exist.

    #[test]
    fn test_env_loader_with_default() {
        let loader = EnvLoader::new(None);
        let value = loader.load_var_or("NONEXISTENT_VAR_12345", "default");

        assert_eq!(value, "default");
    }

    #[test]
    fn test_env_loader_missing_var() {
        let loader = EnvLoader::new(Some("FLAGSTAFF_TEST".to_string()));

        assert!(loader.load_var("MISSING_VAR_67890").is_err());
        assert_eq!(loader.load_opt("MISSING_VAR_67890"), None);
    }

    #[test]
    fn test_prefixed_key() {
        let loader = EnvLoader::default();
        assert_eq!(loader.full_key("config"), "FLAGSTAFF_CONFIG");
        assert_eq!(EnvLoader::new(None).full_key("path"), "PATH");
    }

    #[test]
    fn test_environment_precedence() {
        let document = FeaturesDocument {
            environment: Some("staging".to_string()),
            features: Vec::new(),
        };

        let explicit = FeaturesSettings {
            config_path: None,
            environment: Some("qa".to_string()),
        };
        assert_eq!(explicit.environment_for(&document), "qa");
        assert_eq!(FeaturesSettings::default().environment_for(&document), "staging");
        assert_eq!(
            FeaturesSettings::default().environment_for(&FeaturesDocument::default()),
            DEFAULT_ENVIRONMENT
        );
    }

    #[test]
    fn test_load_document_requires_path() {
        let result = FeaturesSettings::default().load_document();
        assert!(matches!(result, Err(ConfigError::KeyNotFound(_))));
    }
}
