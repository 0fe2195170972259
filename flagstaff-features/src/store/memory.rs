//! In-memory feature store
//!
//! Holds an immutable snapshot behind an `Arc`. Persisting builds a complete
//! new snapshot and swaps the pointer, so concurrent readers observe either
//! the previous configuration or the new one, never a mix.

use crate::error::FeatureResult;
use crate::feature::{Feature, FeatureConfigurer, FeatureParameter};
use crate::store::FeaturesStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Composite parameter key: `(feature_name, activator_type, parameter_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ParameterKey {
    feature: String,
    activator: String,
    name: String,
}

impl ParameterKey {
    fn of(parameter: &FeatureParameter) -> Self {
        Self {
            feature: parameter.feature_name.clone(),
            activator: parameter.activator_type.clone(),
            name: parameter.name.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Snapshot {
    features: HashMap<String, Feature>,
    parameters: HashMap<ParameterKey, FeatureParameter>,
}

impl Snapshot {
    fn insert(&mut self, feature: Feature, parameters: Vec<FeatureParameter>) {
        if self.features.contains_key(&feature.name) {
            self.remove(&feature.name.clone());
        }

        for parameter in parameters {
            self.parameters.insert(ParameterKey::of(&parameter), parameter);
        }
        self.features.insert(feature.name.clone(), feature);
    }

    fn remove(&mut self, name: &str) {
        self.features.remove(name);
        self.parameters.retain(|key, _| key.feature != name);
    }
}

type BuiltFeature = (Feature, Vec<FeatureParameter>);

/// Build the features of a batch, rejecting the whole batch on any error.
fn build_all(configurers: Vec<FeatureConfigurer>) -> FeatureResult<Vec<BuiltFeature>> {
    let mut built: Vec<BuiltFeature> = Vec::with_capacity(configurers.len());

    for configurer in configurers {
        let (feature, parameters) = configurer.build()?;

        if let Some(index) = built.iter().position(|(f, _)| f.name == feature.name) {
            warn!(feature = %feature.name, "Feature configured more than once, last configuration wins");
            built.remove(index);
        }
        built.push((feature, parameters));
    }

    Ok(built)
}

/// In-memory feature store
pub struct InMemoryFeaturesStore {
    snapshot: RwLock<Arc<Snapshot>>,
}

impl InMemoryFeaturesStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        debug!("Creating new in-memory feature store");
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    /// Create a store seeded with `configurers`.
    pub fn with_configuration(configurers: Vec<FeatureConfigurer>) -> FeatureResult<Self> {
        let store = Self::new();
        store.replace(configurers)?;
        Ok(store)
    }

    /// Merge `configurers` into the visible set.
    ///
    /// Features named in the batch are replaced whole; all others are kept.
    pub async fn merge_configuration(&self, configurers: Vec<FeatureConfigurer>) -> FeatureResult<()> {
        let built = build_all(configurers)?;
        let count = built.len();

        let mut guard = self.snapshot.write();
        let mut next = Snapshot {
            features: guard.features.clone(),
            parameters: guard.parameters.clone(),
        };
        for (feature, parameters) in built {
            next.insert(feature, parameters);
        }
        *guard = Arc::new(next);

        info!(merged = count, "Merged feature configuration");
        Ok(())
    }

    /// Number of visible features.
    pub fn feature_count(&self) -> usize {
        self.load().features.len()
    }

    /// Number of visible parameters.
    pub fn parameter_count(&self) -> usize {
        self.load().parameters.len()
    }

    #[inline]
    fn load(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    fn replace(&self, configurers: Vec<FeatureConfigurer>) -> FeatureResult<()> {
        let built = build_all(configurers)?;

        let mut next = Snapshot::default();
        for (feature, parameters) in built {
            next.insert(feature, parameters);
        }

        let features = next.features.len();
        let parameters = next.parameters.len();
        *self.snapshot.write() = Arc::new(next);

        info!(features, parameters, "Persisted feature configuration");
        Ok(())
    }
}

impl Default for InMemoryFeaturesStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeaturesStore for InMemoryFeaturesStore {
    async fn find_feature(&self, name: &str) -> FeatureResult<Option<Feature>> {
        trace!(feature = %name, "Finding feature");
        Ok(self.load().features.get(name).cloned())
    }

    async fn find_parameter(
        &self,
        parameter_name: &str,
        feature_name: &str,
        activator_type: &str,
    ) -> FeatureResult<Option<FeatureParameter>> {
        trace!(
            parameter = %parameter_name,
            feature = %feature_name,
            activator = %activator_type,
            "Finding parameter"
        );

        let key = ParameterKey {
            feature: feature_name.to_string(),
            activator: activator_type.to_string(),
            name: parameter_name.to_string(),
        };

        Ok(self.load().parameters.get(&key).cloned())
    }

    async fn persist_configuration(
        &self,
        configurers: Vec<FeatureConfigurer>,
    ) -> FeatureResult<()> {
        self.replace(configurers)
    }

    async fn feature_names(&self) -> FeatureResult<Vec<String>> {
        let mut names: Vec<String> = self.load().features.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}
