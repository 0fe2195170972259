//! Deployment environment and host activators.

use super::FeatureActivator;
use crate::context::RequestContext;
use crate::descriptor::{activator_name, ActivatorParameterDescriptor, ParameterKind};
use crate::parameters::ParameterResolver;
use async_trait::async_trait;

/// Activates a feature when the running environment is listed in
/// `environments` (case-insensitive).
pub struct EnvironmentActivator {
    resolver: ParameterResolver,
    environment: String,
    descriptors: Vec<ActivatorParameterDescriptor>,
}

impl EnvironmentActivator {
    pub fn new(resolver: ParameterResolver, environment: impl Into<String>) -> Self {
        Self {
            resolver,
            environment: environment.into(),
            descriptors: vec![ActivatorParameterDescriptor::required(
                activator_name::<Self>(),
                "environments",
                ParameterKind::StringList,
            )],
        }
    }

    /// Environment this activator compares against.
    pub fn environment(&self) -> &str {
        &self.environment
    }
}

#[async_trait]
impl FeatureActivator for EnvironmentActivator {
    fn name(&self) -> &str {
        activator_name::<Self>()
    }

    fn descriptors(&self) -> &[ActivatorParameterDescriptor] {
        &self.descriptors
    }

    async fn is_active(&self, feature_name: &str, _context: &dyn RequestContext) -> bool {
        self.resolver
            .resolve_or_warn::<Vec<String>>(feature_name, &self.descriptors[0])
            .await
            .is_some_and(|environments| {
                environments
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(&self.environment))
            })
    }
}

/// Activates a feature when the request host is listed in `host-name`
/// (case-insensitive, port ignored).
pub struct HostNameActivator {
    resolver: ParameterResolver,
    descriptors: Vec<ActivatorParameterDescriptor>,
}

impl HostNameActivator {
    pub fn new(resolver: ParameterResolver) -> Self {
        Self {
            resolver,
            descriptors: vec![ActivatorParameterDescriptor::required(
                activator_name::<Self>(),
                "host-name",
                ParameterKind::StringList,
            )],
        }
    }
}

/// Strip a trailing `:port` from a host, keeping bracketed IPv6 literals intact.
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}

#[async_trait]
impl FeatureActivator for HostNameActivator {
    fn name(&self) -> &str {
        activator_name::<Self>()
    }

    fn descriptors(&self) -> &[ActivatorParameterDescriptor] {
        &self.descriptors
    }

    async fn is_active(&self, feature_name: &str, context: &dyn RequestContext) -> bool {
        let Some(hosts) = self
            .resolver
            .resolve_or_warn::<Vec<String>>(feature_name, &self.descriptors[0])
            .await
        else {
            return false;
        };

        context.host().map(strip_port).is_some_and(|current| {
            hosts.iter().any(|h| h.eq_ignore_ascii_case(current))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activators::test_support::{resolver, FEATURE};
    use crate::context::EvaluationContext;
    use crate::feature::ActivatorParameters;
    use serde_json::json;

    #[tokio::test]
    async fn test_environment_listed() {
        let params: ActivatorParameters =
            [("environments", json!("staging, Development"))].into_iter().collect();
        let resolver = resolver("EnvironmentActivator", params);
        let context = EvaluationContext::new();

        let activator = EnvironmentActivator::new(resolver.clone(), "development");
        assert!(activator.is_active(FEATURE, &context).await);

        let activator = EnvironmentActivator::new(resolver, "production");
        assert_eq!(activator.environment(), "production");
        assert!(!activator.is_active(FEATURE, &context).await);
    }

    #[tokio::test]
    async fn test_host_name() {
        let params: ActivatorParameters =
            [("host-name", json!(["beta.example.com", "localhost"]))].into_iter().collect();
        let activator = HostNameActivator::new(resolver("HostNameActivator", params));

        let context = EvaluationContext::new().with_host("Beta.Example.com:8443");
        assert!(activator.is_active(FEATURE, &context).await);

        let context = EvaluationContext::new().with_host("www.example.com");
        assert!(!activator.is_active(FEATURE, &context).await);

        assert!(!activator.is_active(FEATURE, &EvaluationContext::new()).await);
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com:8080"), "example.com");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "::1");
        assert_eq!(strip_port("::1"), "::1");
    }
}
