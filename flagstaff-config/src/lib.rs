// Feature configuration loading for Flagstaff

pub mod document;
pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use document::{ActivatorDefinition, FeatureDefinition, FeaturesDocument};
pub use env::{EnvLoader, FeaturesSettings, DEFAULT_ENVIRONMENT, ENV_PREFIX};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, DocumentValidator, Validate};
