//! Error types for feature evaluation and storage.

use thiserror::Error;

/// Result type for feature operations.
pub type FeatureResult<T> = Result<T, FeatureError>;

/// Feature-specific errors.
///
/// Unknown features, unknown parameters and missing headers are not errors;
/// they resolve to `None` or to an inactive decision.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// A caller broke an input contract (e.g. zero partitions)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Feature names must be non-empty
    #[error("Invalid feature name: {0:?}")]
    InvalidFeatureName(String),

    /// A stored value could not be coerced to the declared parameter kind
    #[error("Cannot convert parameter '{parameter}' value {value} to {expected}")]
    Conversion {
        /// Parameter name
        parameter: String,
        /// Declared kind
        expected: &'static str,
        /// Raw stored value
        value: String,
    },

    /// Two descriptors share an identity but disagree on kind or optionality
    #[error("Conflicting descriptor '{parameter}' for activator {activator}")]
    DescriptorConflict {
        /// Owning activator short name
        activator: String,
        /// Parameter name
        parameter: String,
    },

    /// An activator with the same short name is already registered
    #[error("Activator already registered: {0}")]
    DuplicateActivator(String),

    /// Backing store failure
    #[error("Feature store error: {0}")]
    Store(String),
}

impl FeatureError {
    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(msg: S) -> Self {
        Self::Store(msg.into())
    }

    /// Create a conversion error for a raw value
    pub fn conversion(
        parameter: impl Into<String>,
        expected: &'static str,
        value: &serde_json::Value,
    ) -> Self {
        Self::Conversion {
            parameter: parameter.into(),
            expected,
            value: value.to_string(),
        }
    }

    /// Check if this error is a type coercion failure
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }
}
