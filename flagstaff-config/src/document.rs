// Feature configuration documents

use crate::Result;
use flagstaff_features::{ActivatorParameters, FeatureConfigurer, FeaturesStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

/// Root of a features file.
///
/// ```toml
/// environment = "staging"
///
/// [[features]]
/// name = "new-checkout"
///
/// [[features.activators]]
/// type = "RolloutHeaderValueActivator"
/// parameters = { header-name = "X-User", percentage = 25 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturesDocument {
    /// Deployment environment name
    #[serde(default)]
    pub environment: Option<String>,

    #[serde(default)]
    pub features: Vec<FeatureDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    pub name: String,

    #[serde(default)]
    pub activators: Vec<ActivatorDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivatorDefinition {
    /// Activator short name
    #[serde(rename = "type")]
    pub activator_type: String,

    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
}

impl FeaturesDocument {
    /// Convert into configurers, one per feature definition.
    pub fn into_configurers(self) -> Vec<FeatureConfigurer> {
        self.features
            .into_iter()
            .map(|feature| {
                feature
                    .activators
                    .into_iter()
                    .fold(FeatureConfigurer::new(feature.name), |configurer, activator| {
                        let params: ActivatorParameters = activator.parameters.into_iter().collect();
                        configurer.with_parameters(activator.activator_type, params)
                    })
            })
            .collect()
    }

    /// Replace the store's configuration with this document.
    pub async fn persist(self, store: &dyn FeaturesStore) -> Result<()> {
        let count = self.features.len();
        store.persist_configuration(self.into_configurers()).await?;
        info!(features = count, "Loaded feature document into store");
        Ok(())
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.name.as_str())
    }
}
