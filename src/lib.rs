// Flagstaff - Feature toggles for Rust services
//
// This library decides whether a named feature is active for a request by
// consulting pluggable activators parameterized by stored configuration.

pub mod logging;

// Re-export core functionality
pub use flagstaff_features::*;

// Re-export async_trait for implementing FeatureActivator and FeaturesStore
pub use async_trait::async_trait;

// Re-export optional crates
#[cfg(feature = "config")]
pub use flagstaff_config;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ActivatorParameters,
        ActivatorRegistry,
        EvaluationContext,
        FeatureActivator,
        FeatureConfigurer,
        FeatureError,
        FeatureEvaluation,
        FeaturesService,
        FeaturesStore,
        InMemoryFeaturesStore,
        RequestContext,
        // Built-in activators
        EnvironmentActivator,
        FromToActivator,
        HeaderValueActivator,
        HostNameActivator,
        RolloutHeaderValueActivator,
        RolloutUsernameActivator,
        UserActivator,
        UtcActivator,
    };

    #[cfg(feature = "config")]
    pub use crate::flagstaff_config::{ConfigLoader, FeaturesDocument, FeaturesSettings};
}
