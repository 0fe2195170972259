//! Feature activators
//!
//! An activator is a strategy that decides whether a feature is active for a
//! request. Each activator declares the parameters it reads, resolves them
//! from the store through a [`ParameterResolver`], and never fails for
//! "not configured" situations: it logs a warning and reports inactive.
//!
//! Built-in activators:
//!
//! - [`RolloutHeaderValueActivator`] - sticky percentage rollout keyed by a header
//! - [`RolloutUsernameActivator`] - sticky percentage rollout keyed by the user
//! - [`UserActivator`] - explicit user allow-list
//! - [`HeaderValueActivator`] - exact header match
//! - [`UtcActivator`] / [`FromToActivator`] - release date and time window
//! - [`EnvironmentActivator`] / [`HostNameActivator`] - deployment environment and host

mod environment;
mod header_value;
mod rollout_header;
mod rollout_username;
mod time;
mod user;

pub use environment::{EnvironmentActivator, HostNameActivator};
pub use header_value::HeaderValueActivator;
pub use rollout_header::RolloutHeaderValueActivator;
pub use rollout_username::RolloutUsernameActivator;
pub use time::{FromToActivator, UtcActivator};
pub use user::UserActivator;

use crate::context::RequestContext;
use crate::descriptor::ActivatorParameterDescriptor;
use crate::error::{FeatureError, FeatureResult};
use crate::parameters::ParameterResolver;
use crate::partitioner::JenkinsPartitioner;
use crate::store::FeaturesStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// Rollout granularity: percentages are honored to the nearest 10%.
pub const ROLLOUT_PARTITIONS: NonZeroU32 = NonZeroU32::new(10).unwrap();

/// Whether `value` falls inside a `percentage` rollout.
///
/// Admits partitions `<= 10 * percentage / 100`, so `0%` still admits
/// partition 0 and `100%` admits every partition.
pub fn within_rollout(value: &str, percentage: f64) -> bool {
    let partition = JenkinsPartitioner::partition(value, ROLLOUT_PARTITIONS);
    f64::from(partition) <= (f64::from(ROLLOUT_PARTITIONS.get()) * percentage) / 100.0
}

/// Trait for feature activation strategies
#[async_trait]
pub trait FeatureActivator: Send + Sync {
    /// Short identity the store indexes this activator's parameters by
    fn name(&self) -> &str;

    /// Parameters this activator reads, in declaration order
    fn descriptors(&self) -> &[ActivatorParameterDescriptor];

    /// Decide whether `feature_name` is active for `context`
    async fn is_active(&self, feature_name: &str, context: &dyn RequestContext) -> bool;
}

/// Activators keyed by short name.
#[derive(Clone, Default)]
pub struct ActivatorRegistry {
    activators: BTreeMap<String, Arc<dyn FeatureActivator>>,
}

impl ActivatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in activator sharing one resolver.
    ///
    /// `environment` is the deployment environment name used by
    /// [`EnvironmentActivator`].
    pub fn with_defaults(
        store: Arc<dyn FeaturesStore>,
        environment: impl Into<String>,
    ) -> FeatureResult<Self> {
        let resolver = ParameterResolver::new(store);
        let mut registry = Self::new();

        registry.register(Arc::new(RolloutHeaderValueActivator::new(resolver.clone())))?;
        registry.register(Arc::new(RolloutUsernameActivator::new(resolver.clone())))?;
        registry.register(Arc::new(UserActivator::new(resolver.clone())))?;
        registry.register(Arc::new(HeaderValueActivator::new(resolver.clone())))?;
        registry.register(Arc::new(UtcActivator::new(resolver.clone())))?;
        registry.register(Arc::new(FromToActivator::new(resolver.clone())))?;
        registry.register(Arc::new(EnvironmentActivator::new(
            resolver.clone(),
            environment,
        )))?;
        registry.register(Arc::new(HostNameActivator::new(resolver)))?;

        Ok(registry)
    }

    /// Register an activator.
    ///
    /// # Errors
    ///
    /// [`FeatureError::DuplicateActivator`] when the name is taken, or
    /// [`FeatureError::DescriptorConflict`] when one of its descriptors
    /// disagrees with a registered descriptor of the same identity.
    pub fn register(&mut self, activator: Arc<dyn FeatureActivator>) -> FeatureResult<()> {
        let name = activator.name().to_string();
        if self.activators.contains_key(&name) {
            return Err(FeatureError::DuplicateActivator(name));
        }

        let declared = activator.descriptors();
        for (i, descriptor) in declared.iter().enumerate() {
            let conflict = declared[..i]
                .iter()
                .chain(self.descriptors())
                .any(|existing| existing.conflicts_with(descriptor));

            if conflict {
                return Err(FeatureError::DescriptorConflict {
                    activator: descriptor.activator_name.clone(),
                    parameter: descriptor.name.clone(),
                });
            }
        }

        debug!(activator = %name, parameters = declared.len(), "Registered activator");
        self.activators.insert(name, activator);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FeatureActivator>> {
        self.activators.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.activators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.activators.keys().map(String::as_str)
    }

    /// Every registered descriptor.
    pub fn descriptors(&self) -> impl Iterator<Item = &ActivatorParameterDescriptor> {
        self.activators.values().flat_map(|a| a.descriptors().iter())
    }

    /// Descriptors of one activator.
    pub fn descriptors_of(&self, name: &str) -> Option<&[ActivatorParameterDescriptor]> {
        self.activators.get(name).map(|a| a.descriptors())
    }

    pub fn len(&self) -> usize {
        self.activators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activators.is_empty()
    }
}
