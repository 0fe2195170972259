//! Percentage rollout keyed by the authenticated user.

use super::{FeatureActivator, within_rollout};
use crate::context::RequestContext;
use crate::descriptor::{activator_name, ActivatorParameterDescriptor, ParameterKind};
use crate::parameters::ParameterResolver;
use async_trait::async_trait;
use tracing::trace;

/// Activates a feature for a sticky percentage of authenticated users.
///
/// Anonymous requests are never admitted.
pub struct RolloutUsernameActivator {
    resolver: ParameterResolver,
    descriptors: Vec<ActivatorParameterDescriptor>,
}

impl RolloutUsernameActivator {
    pub fn new(resolver: ParameterResolver) -> Self {
        Self {
            resolver,
            descriptors: vec![ActivatorParameterDescriptor::required(
                activator_name::<Self>(),
                "percentage",
                ParameterKind::Double,
            )],
        }
    }
}

#[async_trait]
impl FeatureActivator for RolloutUsernameActivator {
    fn name(&self) -> &str {
        activator_name::<Self>()
    }

    fn descriptors(&self) -> &[ActivatorParameterDescriptor] {
        &self.descriptors
    }

    async fn is_active(&self, feature_name: &str, context: &dyn RequestContext) -> bool {
        let Some(percentage) = self
            .resolver
            .resolve_or_warn::<f64>(feature_name, &self.descriptors[0])
            .await
        else {
            return false;
        };

        match context.user_name() {
            Some(user) => within_rollout(user, percentage),
            None => {
                trace!(feature = %feature_name, "Anonymous request excluded from user rollout");
                false
            }
        }
    }
}
