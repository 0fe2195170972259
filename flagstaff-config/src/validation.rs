// Feature document validation

use crate::{ConfigError, FeaturesDocument, Result};
use flagstaff_features::{coerce, ActivatorRegistry, ParameterKind};
use std::collections::HashSet;
use std::fmt::Display;

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Configuration validator with rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a number is within range
    pub fn in_range<T: PartialOrd + Display>(value: T, min: T, max: T, field: &str) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {}, got {}",
                field, min, max, value
            )));
        }
        Ok(())
    }
}

fn collect(problems: Vec<String>) -> Result<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(problems.join("; ")))
    }
}

/// Structural checks that need no activator knowledge.
fn structural_problems(document: &FeaturesDocument) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for (i, feature) in document.features.iter().enumerate() {
        if let Err(e) = ConfigValidator::not_empty(&feature.name, &format!("features[{}].name", i)) {
            problems.push(e.to_string());
        } else if !seen.insert(feature.name.as_str()) {
            problems.push(format!("feature '{}' is defined more than once", feature.name));
        }

        for (j, activator) in feature.activators.iter().enumerate() {
            let field = format!("features[{}].activators[{}].type", i, j);
            if let Err(e) = ConfigValidator::not_empty(&activator.activator_type, &field) {
                problems.push(e.to_string());
            }
        }
    }

    problems
}

impl Validate for FeaturesDocument {
    fn validate(&self) -> Result<()> {
        collect(structural_problems(self))
    }
}

/// Validates documents against the descriptors of registered activators.
pub struct DocumentValidator<'a> {
    registry: &'a ActivatorRegistry,
}

impl<'a> DocumentValidator<'a> {
    pub fn new(registry: &'a ActivatorRegistry) -> Self {
        Self { registry }
    }

    /// Report every problem in `document` at once.
    ///
    /// Checks names, activator types, required and undeclared parameters, and
    /// that each value converts to its declared kind.
    pub fn validate(&self, document: &FeaturesDocument) -> Result<()> {
        let mut problems = structural_problems(document);

        for feature in &document.features {
            for activator in &feature.activators {
                let Some(descriptors) = self.registry.descriptors_of(&activator.activator_type)
                else {
                    problems.push(format!(
                        "feature '{}' uses unknown activator '{}'",
                        feature.name, activator.activator_type
                    ));
                    continue;
                };

                for descriptor in descriptors {
                    match activator.parameters.get(&descriptor.name) {
                        Some(value) => match coerce(descriptor, value) {
                            Err(e) => problems.push(format!("feature '{}': {}", feature.name, e)),
                            Ok(coerced)
                                if descriptor.kind == ParameterKind::Double
                                    && descriptor.name == "percentage" =>
                            {
                                if let Some(percentage) = coerced.as_f64()
                                    && let Err(e) =
                                        ConfigValidator::in_range(percentage, 0.0, 100.0, "percentage")
                                {
                                    problems.push(format!("feature '{}': {}", feature.name, e));
                                }
                            }
                            Ok(_) => {}
                        },
                        None if !descriptor.is_optional => problems.push(format!(
                            "feature '{}': activator '{}' requires parameter '{}'",
                            feature.name, activator.activator_type, descriptor.name
                        )),
                        None => {}
                    }
                }

                for name in activator.parameters.keys() {
                    if !descriptors.iter().any(|d| &d.name == name) {
                        problems.push(format!(
                            "feature '{}': activator '{}' does not declare parameter '{}'",
                            feature.name, activator.activator_type, name
                        ));
                    }
                }
            }
        }

        collect(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flagstaff_features::InMemoryFeaturesStore;
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> ActivatorRegistry {
        ActivatorRegistry::with_defaults(Arc::new(InMemoryFeaturesStore::new()), "test").unwrap()
    }

    fn document(value: serde_json::Value) -> FeaturesDocument {
        serde_json::from_value(value).unwrap()
    }

    fn problems(result: Result<()>) -> String {
        match result {
            Err(ConfigError::ValidationError(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_empty_validation() {
        assert!(ConfigValidator::not_empty("value", "field").is_ok());
        assert!(ConfigValidator::not_empty("  ", "field").is_err());
    }

    #[test]
    fn test_range_validation() {
        assert!(ConfigValidator::in_range(5, 1, 10, "field").is_ok());
        assert!(ConfigValidator::in_range(0, 1, 10, "field").is_err());
        assert!(ConfigValidator::in_range(11, 1, 10, "field").is_err());

        let error = ConfigValidator::in_range(11, 1, 10, "retries").unwrap_err();
        assert_eq!(error.to_string(), "Validation error: retries must be between 1 and 10, got 11");
    }

    #[test]
    fn test_structural_validation() {
        let document = document(json!({
            "features": [
                { "name": "" },
                { "name": "a" },
                { "name": "a", "activators": [{ "type": "" }] }
            ]
        }));

        let message = problems(document.validate());
        assert!(message.contains("features[0].name cannot be empty"));
        assert!(message.contains("'a' is defined more than once"));
        assert!(message.contains("features[2].activators[0].type cannot be empty"));
    }

    #[test]
    fn test_valid_document() {
        let document = document(json!({
            "features": [{
                "name": "rollout",
                "activators": [
                    { "type": "RolloutHeaderValueActivator",
                      "parameters": { "header-name": "X-User", "percentage": "40" } },
                    { "type": "UserActivator", "parameters": { "user": "alice,bob" } }
                ]
            }]
        }));

        assert!(document.validate().is_ok());
        assert!(DocumentValidator::new(&registry()).validate(&document).is_ok());
    }

    #[test]
    fn test_registry_validation() {
        let document = document(json!({
            "features": [{
                "name": "broken",
                "activators": [
                    { "type": "RolloutHeaderValueActivator",
                      "parameters": { "percentage": "lots", "header": "X-User" } },
                    { "type": "MagicActivator" },
                    { "type": "RolloutUsernameActivator", "parameters": { "percentage": 150 } }
                ]
            }]
        }));

        let message = problems(DocumentValidator::new(&registry()).validate(&document));
        assert!(message.contains("requires parameter 'header-name'"));
        assert!(message.contains("Cannot convert parameter 'percentage'"));
        assert!(message.contains("does not declare parameter 'header'"));
        assert!(message.contains("unknown activator 'MagicActivator'"));
        assert!(message.contains("percentage must be between 0 and 100, got 150"));
    }
}
