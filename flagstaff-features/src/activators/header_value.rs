//! Exact header match.

use super::FeatureActivator;
use crate::context::RequestContext;
use crate::descriptor::{activator_name, ActivatorParameterDescriptor, ParameterKind};
use crate::parameters::ParameterResolver;
use async_trait::async_trait;

const HEADER_NAME: usize = 0;
const HEADER_VALUE: usize = 1;

/// Activates a feature when any value of `header-name` equals `header-value`
/// (case-insensitive).
pub struct HeaderValueActivator {
    resolver: ParameterResolver,
    descriptors: Vec<ActivatorParameterDescriptor>,
}

impl HeaderValueActivator {
    pub fn new(resolver: ParameterResolver) -> Self {
        let name = activator_name::<Self>();
        Self {
            resolver,
            descriptors: vec![
                ActivatorParameterDescriptor::required(name, "header-name", ParameterKind::String),
                ActivatorParameterDescriptor::required(name, "header-value", ParameterKind::String),
            ],
        }
    }
}

#[async_trait]
impl FeatureActivator for HeaderValueActivator {
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

        let Some(expected) = self
            .resolver
            .resolve_or_warn::<String>(feature_name, &self.descriptors[HEADER_VALUE])
            .await
        else {
            return false;
        };

        context
            .header_values(&header_name)
            .iter()
            .any(|value| value.eq_ignore_ascii_case(&expected))
    }
}
