//! Feature data model
//!
//! Defines features, their activator bindings, stored parameters and the
//! configurer used to build them.

use crate::descriptor::activator_name;
use crate::error::{FeatureError, FeatureResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A named toggle with zero or more bound activators.
///
/// A feature with no activators is never active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Unique, case-sensitive feature name
    pub name: String,

    /// Activator bindings, in configuration order
    pub activators: Vec<ActivatorBinding>,
}

impl Feature {
    /// Short names of the bound activators, in order.
    pub fn activator_names(&self) -> impl Iterator<Item = &str> {
        self.activators.iter().map(|b| b.activator.as_str())
    }

    /// Whether any activator is bound.
    pub fn has_activators(&self) -> bool {
        !self.activators.is_empty()
    }
}

/// An activator bound to a feature together with its raw parameter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivatorBinding {
    /// Short activator name
    pub activator: String,

    /// Raw parameter values keyed by parameter name
    pub parameters: BTreeMap<String, Value>,
}

/// A stored parameter value, unique per `(feature_name, activator_type, name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureParameter {
    /// Parameter name
    pub name: String,

    /// Owning feature
    pub feature_name: String,

    /// Short activator name
    pub activator_type: String,

    /// Untyped value, coerced to the descriptor kind on read
    pub value: Value,
}

/// Raw parameter values supplied for one activator binding.
#[derive(Debug, Clone, Default)]
pub struct ActivatorParameters {
    values: BTreeMap<String, Value>,
}

impl ActivatorParameters {
    /// Add (or overwrite) a parameter value
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ActivatorParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::default();
        for (name, value) in iter {
            params.add(name, value);
        }
        params
    }
}

/// Builder associating a feature name with activator bindings.
///
/// # Examples
///
/// ```
/// use flagstaff_features::{FeatureConfigurer, UserActivator};
///
/// let configurer = FeatureConfigurer::new("sample_feature")
///     .with_activator::<UserActivator, _>(|params| {
///         params.add("user", "uzorrilla");
///     });
///
/// assert_eq!(configurer.name(), "sample_feature");
/// ```
#[derive(Debug, Clone)]
pub struct FeatureConfigurer {
    name: String,
    bindings: Vec<(String, ActivatorParameters)>,
}

impl FeatureConfigurer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind the activator type `A`, identified by its short type name.
    pub fn with_activator<A, F>(self, configure: F) -> Self
    where
        A: ?Sized,
        F: FnOnce(&mut ActivatorParameters),
    {
        self.with_activator_named(activator_name::<A>(), configure)
    }

    /// Bind an activator by its short name.
    ///
    /// Binding the same activator twice merges the parameters; later values win.
    pub fn with_activator_named<F>(mut self, activator: impl Into<String>, configure: F) -> Self
    where
        F: FnOnce(&mut ActivatorParameters),
    {
        let activator = activator.into();
        let mut params = ActivatorParameters::default();
        configure(&mut params);

        match self.bindings.iter_mut().find(|(name, _)| *name == activator) {
            Some((_, existing)) => existing.values.extend(params.values),
            None => self.bindings.push((activator, params)),
        }

        self
    }

    /// Bind an activator with a prepared parameter set.
    pub fn with_parameters(self, activator: impl Into<String>, params: ActivatorParameters) -> Self {
        self.with_activator_named(activator, |p| p.values.extend(params.values))
    }

    /// Build the feature and one parameter per `(activator, name, value)` triple.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::InvalidFeatureName`] for an empty name.
    pub fn build(self) -> FeatureResult<(Feature, Vec<FeatureParameter>)> {
        if self.name.is_empty() {
            return Err(FeatureError::InvalidFeatureName(self.name));
        }

        let mut parameters = Vec::new();
        let mut activators = Vec::with_capacity(self.bindings.len());

        for (activator, params) in self.bindings {
            for (name, value) in &params.values {
                parameters.push(FeatureParameter {
                    name: name.clone(),
                    feature_name: self.name.clone(),
                    activator_type: activator.clone(),
                    value: value.clone(),
                });
            }

            activators.push(ActivatorBinding {
                activator,
                parameters: params.values,
            });
        }

        Ok((
            Feature {
                name: self.name,
                activators,
            },
            parameters,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct UserActivator;

    #[test]
    fn test_build_feature_and_parameters() {
        let (feature, parameters) = FeatureConfigurer::new("sample_feature")
            .with_activator::<UserActivator, _>(|params| {
                params.add("USER", "uzorrilla");
            })
            .build()
            .unwrap();

        assert_eq!(feature.name, "sample_feature");
        assert_eq!(feature.activator_names().collect::<Vec<_>>(), vec!["UserActivator"]);

        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name, "USER");
        assert_eq!(parameters[0].feature_name, "sample_feature");
        assert_eq!(parameters[0].activator_type, "UserActivator");
        assert_eq!(parameters[0].value, json!("uzorrilla"));
    }

    #[test]
    fn test_rebinding_merges_parameters() {
        let (feature, parameters) = FeatureConfigurer::new("f")
            .with_activator_named("A", |p| {
                p.add("x", 1).add("y", 2);
            })
            .with_activator_named("A", |p| {
                p.add("y", 3);
            })
            .build()
            .unwrap();

        assert_eq!(feature.activators.len(), 1);
        assert_eq!(feature.activators[0].parameters["y"], json!(3));
        assert_eq!(parameters.len(), 2);
    }

    #[test]
    fn test_binding_order_preserved() {
        let (feature, _) = FeatureConfigurer::new("f")
            .with_activator_named("B", |_| {})
            .with_activator_named("A", |_| {})
            .build()
            .unwrap();

        assert_eq!(feature.activator_names().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn test_no_activators_is_valid() {
        let (feature, parameters) = FeatureConfigurer::new("f").build().unwrap();
        assert!(!feature.has_activators());
        assert!(parameters.is_empty());
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = FeatureConfigurer::new("").build();
        assert!(matches!(result, Err(FeatureError::InvalidFeatureName(_))));
    }

    #[test]
    fn test_parameters_from_iter() {
        let params: ActivatorParameters = [("header-name", json!("X-User")), ("percentage", json!(50))]
            .into_iter()
            .collect();

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("percentage"), Some(&json!(50)));
    }
}
