//! Release date and time window activators.

use super::FeatureActivator;
use crate::context::RequestContext;
use crate::descriptor::{activator_name, ActivatorParameterDescriptor, ParameterKind};
use crate::parameters::ParameterResolver;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Activates a feature once `release-date` (UTC) has passed.
pub struct UtcActivator {
    resolver: ParameterResolver,
    descriptors: Vec<ActivatorParameterDescriptor>,
}

impl UtcActivator {
    pub fn new(resolver: ParameterResolver) -> Self {
        Self {
            resolver,
            descriptors: vec![ActivatorParameterDescriptor::required(
                activator_name::<Self>(),
                "release-date",
                ParameterKind::DateTime,
            )],
        }
    }
}

#[async_trait]
impl FeatureActivator for UtcActivator {
    fn name(&self) -> &str {
        activator_name::<Self>()
    }

    fn descriptors(&self) -> &[ActivatorParameterDescriptor] {
        &self.descriptors
    }

    async fn is_active(&self, feature_name: &str, _context: &dyn RequestContext) -> bool {
        self.resolver
            .resolve_or_warn::<DateTime<Utc>>(feature_name, &self.descriptors[0])
            .await
            .is_some_and(|release| Utc::now() >= release)
    }
}

/// Activates a feature between `release-from-date` and `release-to-date`
/// (inclusive, UTC).
pub struct FromToActivator {
    resolver: ParameterResolver,
    descriptors: Vec<ActivatorParameterDescriptor>,
}

impl FromToActivator {
    pub fn new(resolver: ParameterResolver) -> Self {
        let name = activator_name::<Self>();
        Self {
            resolver,
            descriptors: vec![
                ActivatorParameterDescriptor::required(
                    name,
                    "release-from-date",
                    ParameterKind::DateTime,
                ),
                ActivatorParameterDescriptor::required(
                    name,
                    "release-to-date",
                    ParameterKind::DateTime,
                ),
            ],
        }
    }
}

#[async_trait]
impl FeatureActivator for FromToActivator {
    fn name(&self) -> &str {
        activator_name::<Self>()
    }

    fn descriptors(&self) -> &[ActivatorParameterDescriptor] {
        &self.descriptors
    }

    async fn is_active(&self, feature_name: &str, _context: &dyn RequestContext) -> bool {
        let Some(from) = self
            .resolver
            .resolve_or_warn::<DateTime<Utc>>(feature_name, &self.descriptors[0])
            .await
        else {
            return false;
        };

        let Some(to) = self
            .resolver
            .resolve_or_warn::<DateTime<Utc>>(feature_name, &self.descriptors[1])
            .await
        else {
            return false;
        };

        let now = Utc::now();
        from <= now && now <= to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activators::test_support::{resolver, FEATURE};
    use crate::context::EvaluationContext;
    use crate::feature::ActivatorParameters;
    use serde_json::json;

    const PAST: &str = "2000-01-01T00:00:00Z";
    const FUTURE: &str = "2999-01-01T00:00:00+02:00";

    fn utc(release: &str) -> UtcActivator {
        let params: ActivatorParameters = [("release-date", json!(release))].into_iter().collect();
        UtcActivator::new(resolver("UtcActivator", params))
    }

    fn from_to(from: &str, to: &str) -> FromToActivator {
        let params: ActivatorParameters = [
            ("release-from-date", json!(from)),
            ("release-to-date", json!(to)),
        ]
        .into_iter()
        .collect();

        FromToActivator::new(resolver("FromToActivator", params))
    }

    #[tokio::test]
    async fn test_release_date() {
        let context = EvaluationContext::new();

        assert!(utc(PAST).is_active(FEATURE, &context).await);
        assert!(!utc(FUTURE).is_active(FEATURE, &context).await);
        assert!(!utc("next week").is_active(FEATURE, &context).await);
    }

    #[tokio::test]
    async fn test_time_window() {
        let context = EvaluationContext::new();

        assert!(from_to(PAST, FUTURE).is_active(FEATURE, &context).await);
        assert!(!from_to(FUTURE, FUTURE).is_active(FEATURE, &context).await);
        assert!(!from_to(PAST, PAST).is_active(FEATURE, &context).await);
    }

    #[tokio::test]
    async fn test_incomplete_window_is_inactive() {
        let params: ActivatorParameters = [("release-from-date", json!(PAST))].into_iter().collect();
        let activator = FromToActivator::new(resolver("FromToActivator", params));

        assert!(!activator.is_active(FEATURE, &EvaluationContext::new()).await);
    }
}
