//! Feature Toggles for Flagstaff
//!
//! Decides whether a named feature is active for a request by consulting
//! pluggable activators, each parameterized by values held in a feature store.
//!
//! # Features
//!
//! - 🎲 **Sticky Rollout** - Deterministic percentage rollout per header or user
//! - 🎯 **Activators** - User lists, headers, release dates, environments, hosts
//! - 🗄️ **Feature Store** - Typed parameter resolution with atomic configuration swaps
//! - 🔌 **Pluggable** - Register your own [`FeatureActivator`] implementations
//!
//! # Quick Start
//!
//! ```
//! use flagstaff_features::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> FeatureResult<()> {
//! let store: Arc<dyn FeaturesStore> = Arc::new(InMemoryFeaturesStore::new());
//!
//! store
//!     .persist_configuration(vec![
//!         FeatureConfigurer::new("new-checkout").with_activator::<RolloutHeaderValueActivator, _>(
//!             |params| {
//!                 params.add("header-name", "X-User").add("percentage", 25);
//!             },
//!         ),
//!     ])
//!     .await?;
//!
//! let registry = ActivatorRegistry::with_defaults(store.clone(), "production")?;
//! let service = FeaturesService::new(store, registry);
//!
//! let context = EvaluationContext::new().with_header("X-User", "user-123");
//! if service.is_feature_active("new-checkout", &context).await {
//!     // Serve the new checkout
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Sticky Partitioning
//!
//! ```
//! use flagstaff_features::JenkinsPartitioner;
//!
//! let partition = JenkinsPartitioner::resolve_to_logical_partition("user-123", 10).unwrap();
//! assert!(partition < 10);
//! ```
//!
//! # Parameter Identity
//!
//! Parameters are indexed by `(feature, activator short name, parameter)`.
//! The short name is the activator type's unqualified name, see
//! [`activator_name`].

pub mod activators;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod feature;
pub mod parameters;
pub mod partitioner;
pub mod service;
pub mod store;

pub use activators::{
    ActivatorRegistry, EnvironmentActivator, FeatureActivator, FromToActivator,
    HeaderValueActivator, HostNameActivator, RolloutHeaderValueActivator,
    RolloutUsernameActivator, UserActivator, UtcActivator, ROLLOUT_PARTITIONS, within_rollout,
};
pub use context::{AuthenticatedUser, EvaluationContext, RequestContext};
pub use descriptor::{activator_name, ActivatorParameterDescriptor, ParameterKind};
pub use error::{FeatureError, FeatureResult};
pub use feature::{ActivatorBinding, ActivatorParameters, Feature, FeatureConfigurer, FeatureParameter};
pub use parameters::{coerce, ParameterResolver};
pub use partitioner::JenkinsPartitioner;
pub use service::{FeatureEvaluation, FeaturesService};
pub use store::{FeaturesStore, InMemoryFeaturesStore};
