//! Typed parameter resolution
//!
//! Values are stored untyped and coerced to the descriptor's declared kind
//! when an activator reads them.

use crate::descriptor::{ActivatorParameterDescriptor, ParameterKind};
use crate::error::{FeatureError, FeatureResult};
use crate::store::FeaturesStore;
use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Coerce a raw stored value to the canonical JSON shape of `kind`.
///
/// Numbers and booleans are accepted from their string forms, lists from
/// comma-separated strings, and date-times from RFC 3339 strings.
pub fn coerce(
    descriptor: &ActivatorParameterDescriptor,
    value: &Value,
) -> FeatureResult<Value> {
    let fail = || FeatureError::conversion(&descriptor.name, descriptor.kind.as_str(), value);

    let coerced = match (descriptor.kind, value) {
        (ParameterKind::String, Value::String(_)) => value.clone(),
        (ParameterKind::String, Value::Number(n)) => Value::String(n.to_string()),
        (ParameterKind::String, Value::Bool(b)) => Value::String(b.to_string()),

        (ParameterKind::Double, Value::Number(n)) => {
            n.as_f64().map(Value::from).ok_or_else(fail)?
        }
        (ParameterKind::Double, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::from)
            .ok_or_else(fail)?,

        (ParameterKind::Int, Value::Number(n)) => n.as_i64().map(Value::from).ok_or_else(fail)?,
        (ParameterKind::Int, Value::String(s)) => {
            s.trim().parse::<i64>().map(Value::from).map_err(|_| fail())?
        }

        (ParameterKind::Boolean, Value::Bool(_)) => value.clone(),
        (ParameterKind::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(fail()),
        },

        (ParameterKind::DateTime, Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| Value::String(dt.to_rfc3339()))
            .map_err(|_| fail())?,

        (ParameterKind::StringList, Value::String(s)) => Value::Array(
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        ),
        (ParameterKind::StringList, Value::Array(items)) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => list.push(Value::String(s.trim().to_string())),
                    Value::Number(n) => list.push(Value::String(n.to_string())),
                    _ => return Err(fail()),
                }
            }
            Value::Array(list)
        }

        _ => return Err(fail()),
    };

    Ok(coerced)
}

/// Resolves activator parameters from the store.
#[derive(Clone)]
pub struct ParameterResolver {
    store: Arc<dyn FeaturesStore>,
}

impl ParameterResolver {
    pub fn new(store: Arc<dyn FeaturesStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn FeaturesStore> {
        &self.store
    }

    /// Resolve the value declared by `descriptor` for `feature_name`.
    ///
    /// Returns `Ok(None)` when no value is stored.
    ///
    /// # Errors
    ///
    /// [`FeatureError::Conversion`] when the stored value does not fit the
    /// declared kind, or a store error.
    pub async fn resolve<T: DeserializeOwned>(
        &self,
        feature_name: &str,
        descriptor: &ActivatorParameterDescriptor,
    ) -> FeatureResult<Option<T>> {
        let Some(parameter) = self
            .store
            .find_parameter(&descriptor.name, feature_name, &descriptor.activator_name)
            .await?
        else {
            return Ok(None);
        };

        let coerced = coerce(descriptor, &parameter.value)?;
        serde_json::from_value(coerced)
            .map(Some)
            .map_err(|_| FeatureError::conversion(&descriptor.name, descriptor.kind.as_str(), &parameter.value))
    }

    /// Resolve a value, treating absence and errors alike.
    ///
    /// Both are logged as warnings; the caller falls back to inactive.
    pub async fn resolve_or_warn<T: DeserializeOwned>(
        &self,
        feature_name: &str,
        descriptor: &ActivatorParameterDescriptor,
    ) -> Option<T> {
        match self.resolve(feature_name, descriptor).await {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                warn!(
                    feature = %feature_name,
                    activator = %descriptor.activator_name,
                    parameter = %descriptor.name,
                    "Activator parameter is not configured"
                );
                None
            }
            Err(e) => {
                warn!(
                    feature = %feature_name,
                    activator = %descriptor.activator_name,
                    parameter = %descriptor.name,
                    error = %e,
                    "Activator parameter could not be read"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureConfigurer;
    use crate::store::InMemoryFeaturesStore;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn descriptor(kind: ParameterKind) -> ActivatorParameterDescriptor {
        ActivatorParameterDescriptor::required("TestActivator", "p", kind)
    }

    #[test]
    fn test_coerce_numbers_from_strings() {
        assert_eq!(coerce(&descriptor(ParameterKind::Double), &json!("50")).unwrap(), json!(50.0));
        assert_eq!(coerce(&descriptor(ParameterKind::Double), &json!(12)).unwrap(), json!(12.0));
        assert_eq!(coerce(&descriptor(ParameterKind::Int), &json!(" 7 ")).unwrap(), json!(7));
    }

    #[test]
    fn test_coerce_rejects_mismatches() {
        assert!(coerce(&descriptor(ParameterKind::Double), &json!("fifty")).unwrap_err().is_conversion());
        assert!(coerce(&descriptor(ParameterKind::Double), &json!("NaN")).is_err());
        assert!(coerce(&descriptor(ParameterKind::Int), &json!(1.5)).is_err());
        assert!(coerce(&descriptor(ParameterKind::Boolean), &json!("yes")).is_err());
        assert!(coerce(&descriptor(ParameterKind::DateTime), &json!("tomorrow")).is_err());
        assert!(coerce(&descriptor(ParameterKind::String), &json!(null)).is_err());
    }

    #[test]
    fn test_coerce_string_forms() {
        assert_eq!(coerce(&descriptor(ParameterKind::String), &json!(42)).unwrap(), json!("42"));
        assert_eq!(coerce(&descriptor(ParameterKind::Boolean), &json!("TRUE")).unwrap(), json!(true));
    }

    #[test]
    fn test_coerce_lists() {
        assert_eq!(
            coerce(&descriptor(ParameterKind::StringList), &json!("alice, bob,,carol")).unwrap(),
            json!(["alice", "bob", "carol"])
        );
        assert_eq!(
            coerce(&descriptor(ParameterKind::StringList), &json!(["alice", 7])).unwrap(),
            json!(["alice", "7"])
        );
        assert!(coerce(&descriptor(ParameterKind::StringList), &json!([true])).is_err());
    }

    fn resolver(key: &str, value: Value) -> ParameterResolver {
        let store = InMemoryFeaturesStore::with_configuration(vec![
            FeatureConfigurer::new("feature").with_activator_named("TestActivator", |params| {
                params.add(key, value);
            }),
        ])
        .unwrap();

        ParameterResolver::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_resolve_typed_values() {
        let resolver = resolver("p", json!("2030-01-01T00:00:00Z"));

        let release: Option<DateTime<Utc>> = resolver
            .resolve("feature", &descriptor(ParameterKind::DateTime))
            .await
            .unwrap();
        assert_eq!(release, Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()));
    }

    #[tokio::test]
    async fn test_resolve_missing_is_none() {
        let resolver = resolver("other", json!("x"));

        let value: Option<String> = resolver
            .resolve("feature", &descriptor(ParameterKind::String))
            .await
            .unwrap();
        assert!(value.is_none());

        let value: Option<String> = resolver
            .resolve("unknown", &descriptor(ParameterKind::String))
            .await
            .unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_resolve_conversion_error_and_warn_fallback() {
        let resolver = resolver("p", json!("not a number"));
        let descriptor = descriptor(ParameterKind::Double);

        let result: FeatureResult<Option<f64>> = resolver.resolve("feature", &descriptor).await;
        assert!(result.unwrap_err().is_conversion());

        let value: Option<f64> = resolver.resolve_or_warn("feature", &descriptor).await;
        assert!(value.is_none());
    }
}
