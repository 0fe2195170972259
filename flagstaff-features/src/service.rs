//! Feature evaluation service
//!
//! Looks up a feature and combines its activators' decisions with a logical
//! OR: a feature bound to activators A and B is active when A *or* B admits
//! the request. Evaluation stops at the first activator that votes active.

use crate::activators::ActivatorRegistry;
use crate::context::RequestContext;
use crate::store::FeaturesStore;
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

/// Outcome of evaluating one feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEvaluation {
    /// Evaluated feature name
    pub feature: String,

    /// Whether the feature is active
    pub active: bool,

    /// Activator that admitted the request, if any
    pub activated_by: Option<String>,
}

impl FeatureEvaluation {
    fn inactive(feature: &str) -> Self {
        Self {
            feature: feature.to_string(),
            active: false,
            activated_by: None,
        }
    }
}

/// Evaluates features against the store and registered activators.
#[derive(Clone)]
pub struct FeaturesService {
    store: Arc<dyn FeaturesStore>,
    registry: Arc<ActivatorRegistry>,
}

impl FeaturesService {
    pub fn new(store: Arc<dyn FeaturesStore>, registry: ActivatorRegistry) -> Self {
        debug!(
            store = store.store_type(),
            activators = registry.len(),
            "Creating features service"
        );
        Self {
            store,
            registry: Arc::new(registry),
        }
    }

    pub fn store(&self) -> &Arc<dyn FeaturesStore> {
        &self.store
    }

    pub fn registry(&self) -> &ActivatorRegistry {
        &self.registry
    }

    /// Whether `feature_name` is active for `context`.
    ///
    /// Unknown features are inactive. Store failures are logged and treated
    /// as inactive.
    pub async fn is_feature_active(&self, feature_name: &str, context: &dyn RequestContext) -> bool {
        self.evaluate(feature_name, context).await.active
    }

    /// Evaluate `feature_name`, reporting which activator admitted it.
    pub async fn evaluate(
        &self,
        feature_name: &str,
        context: &dyn RequestContext,
    ) -> FeatureEvaluation {
        let feature = match self.store.find_feature(feature_name).await {
            Ok(Some(feature)) => feature,
            Ok(None) => {
                trace!(feature = %feature_name, "Unknown feature evaluated as inactive");
                return FeatureEvaluation::inactive(feature_name);
            }
            Err(e) => {
                error!(feature = %feature_name, error = %e, "Failed to load feature");
                return FeatureEvaluation::inactive(feature_name);
            }
        };

        for name in feature.activator_names() {
            let Some(activator) = self.registry.get(name) else {
                warn!(feature = %feature_name, activator = %name, "Feature bound to unregistered activator");
                continue;
            };

            if activator.is_active(feature_name, context).await {
                trace!(feature = %feature_name, activator = %name, "Feature active");
                return FeatureEvaluation {
                    feature: feature.name.clone(),
                    active: true,
                    activated_by: Some(name.to_string()),
                };
            }
        }

        trace!(feature = %feature_name, "No activator admitted the request");
        FeatureEvaluation::inactive(feature_name)
    }
}
