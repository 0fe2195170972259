//! Feature storage backends
//!
//! - **Memory**: process-wide in-memory snapshot (default)
//!
//! The trait is asynchronous so that a remote-backed store can be substituted
//! without changing activator or service call sites.

mod memory;

pub use memory::InMemoryFeaturesStore;

use crate::error::FeatureResult;
use crate::feature::{Feature, FeatureConfigurer, FeatureParameter};
use async_trait::async_trait;

/// Trait for feature storage backends
#[async_trait]
pub trait FeaturesStore: Send + Sync {
    /// Find a feature by its exact name.
    ///
    /// Returns `Ok(None)` for unknown names.
    async fn find_feature(&self, name: &str) -> FeatureResult<Option<Feature>>;

    /// Find a parameter by `(parameter_name, feature_name, activator_type)`.
    ///
    /// `activator_type` is matched exactly against the identity used at
    /// persist time (the activator's short name). A fully-qualified type path
    /// does not match.
    async fn find_parameter(
        &self,
        parameter_name: &str,
        feature_name: &str,
        activator_type: &str,
    ) -> FeatureResult<Option<FeatureParameter>>;

    /// Replace the visible feature set with the features built from `configurers`.
    async fn persist_configuration(&self, configurers: Vec<FeatureConfigurer>)
        -> FeatureResult<()>;

    /// Names of all visible features.
    async fn feature_names(&self) -> FeatureResult<Vec<String>>;

    /// Get store type name for debugging
    fn store_type(&self) -> &'static str;
}
