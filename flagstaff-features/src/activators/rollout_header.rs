//! Percentage rollout keyed by a request header.

use super::{FeatureActivator, within_rollout};
use crate::context::RequestContext;
use crate::descriptor::{activator_name, ActivatorParameterDescriptor, ParameterKind};
use crate::parameters::ParameterResolver;
use async_trait::async_trait;
use tracing::trace;

/// Partition key used when the configured header is absent from the request.
pub const DEFAULT_HEADER_VALUE: &str = "default header value";

const HEADER_NAME: usize = 0;
const PERCENTAGE: usize = 1;

/// Activates a feature for a sticky percentage of requests.
///
/// Reads `header-name` (String) and `percentage` (Double). The first value of
/// the named header is partitioned; requests without the header all share the
/// partition of [`DEFAULT_HEADER_VALUE`].
pub struct RolloutHeaderValueActivator {
    resolver: ParameterResolver,
    descriptors: Vec<ActivatorParameterDescriptor>,
}

impl RolloutHeaderValueActivator {
    pub fn new(resolver: ParameterResolver) -> Self {
        let name = activator_name::<Self>();
        Self {
            resolver,
            descriptors: vec![
                ActivatorParameterDescriptor::required(name, "header-name", ParameterKind::String),
                ActivatorParameterDescriptor::required(name, "percentage", ParameterKind::Double),
            ],
        }
    }
}

#[async_trait]
impl FeatureActivator for RolloutHeaderValueActivator {
    fn name(&self) -> &str {
        activator_name::<Self>()
    }

    fn descriptors(&self) -> &[ActivatorParameterDescriptor] {
        &self.descriptors
    }

    async fn is_active(&self, feature_name: &str, context: &dyn RequestContext) -> bool {
        let Some(header_name) = self
            .resolver
            .resolve_or_warn::<String>(feature_name, &self.descriptors[HEADER_NAME])
            .await
        else {
            return false;
        };

        let Some(percentage) = self
            .resolver
            .resolve_or_warn::<f64>(feature_name, &self.descriptors[PERCENTAGE])
            .await
        else {
            return false;
        };

        let values = context.header_values(&header_name);
        let value = values.first().copied().unwrap_or(DEFAULT_HEADER_VALUE);

        let active = within_rollout(value, percentage);
        trace!(feature = %feature_name, header = %header_name, percentage, active, "Rollout by header");
        active
    }
}
