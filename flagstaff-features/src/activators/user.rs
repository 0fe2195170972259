//! Explicit user allow-list.

use super::FeatureActivator;
use crate::context::RequestContext;
use crate::descriptor::{activator_name, ActivatorParameterDescriptor, ParameterKind};
use crate::parameters::ParameterResolver;
use async_trait::async_trait;

/// Activates a feature for the users listed in `user` (case-insensitive).
pub struct UserActivator {
    resolver: ParameterResolver,
    descriptors: Vec<ActivatorParameterDescriptor>,
}

impl UserActivator {
    pub fn new(resolver: ParameterResolver) -> Self {
        Self {
            resolver,
            descriptors: vec![ActivatorParameterDescriptor::required(
                activator_name::<Self>(),
                "user",
                ParameterKind::StringList,
            )],
        }
    }
}

#[async_trait]
impl FeatureActivator for UserActivator {
    fn name(&self) -> &str {
        activator_name::<Self>()
    }

    fn descriptors(&self) -> &[ActivatorParameterDescriptor] {
        &self.descriptors
    }

    async fn is_active(&self, feature_name: &str, context: &dyn RequestContext) -> bool {
        let Some(users) = self
            .resolver
            .resolve_or_warn::<Vec<String>>(feature_name, &self.descriptors[0])
            .await
        else {
            return false;
        };

        context
            .user_name()
            .is_some_and(|current| users.iter().any(|u| u.eq_ignore_ascii_case(current)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activators::test_support::{resolver, FEATURE};
    use crate::context::EvaluationContext;
    use crate::feature::ActivatorParameters;
    use serde_json::json;

    fn activator(users: serde_json::Value) -> UserActivator {
        let params: ActivatorParameters = [("user", users)].into_iter().collect();
        UserActivator::new(resolver("UserActivator", params))
    }

    #[tokio::test]
    async fn test_listed_user_is_active() {
        let activator = activator(json!("uzorrilla, alice"));

        assert!(activator.is_active(FEATURE, &EvaluationContext::new().with_user("Alice")).await);
        assert!(activator.is_active(FEATURE, &EvaluationContext::new().with_user("uzorrilla")).await);
        assert!(!activator.is_active(FEATURE, &EvaluationContext::new().with_user("bob")).await);
    }

    #[tokio::test]
    async fn test_anonymous_is_inactive() {
        let activator = activator(json!(["alice"]));
        assert!(!activator.is_active(FEATURE, &EvaluationContext::new()).await);
    }

    #[tokio::test]
    async fn test_missing_list_is_inactive() {
        let activator = UserActivator::new(resolver("UserActivator", ActivatorParameters::default()));
        assert!(!activator.is_active(FEATURE, &EvaluationContext::new().with_user("alice")).await);
    }
}
