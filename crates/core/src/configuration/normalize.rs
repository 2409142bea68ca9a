//! Configuration normalization
//!
//! Accepts either naming convention (`snake_case` or `camelCase`) and either shape (a structured
//! `*_config` object or flattened top-level fields). Absent data becomes empty; data that is
//! present but malformed is rejected.

use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use super::{
    BundleConfiguration, ComponentSelection, Configuration, ParameterMap, ParametricConfiguration,
};

/// Errors raised while normalizing a raw configuration payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// An identifier field did not hold a well-formed UUID.
    #[error("invalid configuration: `{field}` is not a well-formed identifier")]
    MalformedIdentifier {
        /// Offending field.
        field: String,
    },

    /// A field held a value of the wrong JSON type.
    #[error("invalid configuration: `{field}` must be {expected}")]
    UnexpectedShape {
        /// Offending field.
        field: String,

        /// Description of the accepted shape.
        expected: &'static str,
    },

    /// A component quantity was zero, negative or not an integer.
    #[error("invalid configuration: `{field}` must be a positive integer")]
    InvalidQuantity {
        /// Offending field.
        field: String,
    },
}

impl Configuration {
    /// Normalizes a raw, client-supplied configuration payload.
    ///
    /// Returns `Ok(None)` for `null` and for objects with no recognized configuration fields.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::MalformedIdentifier`]: a component identifier is not a UUID.
    /// - [`ConfigurationError::UnexpectedShape`]: a field holds the wrong JSON type.
    /// - [`ConfigurationError::InvalidQuantity`]: a component quantity is not a positive integer.
    pub fn normalize(raw: &Value) -> Result<Option<Self>, ConfigurationError> {
        let map = match raw {
            Value::Null => return Ok(None),
            Value::Object(map) => map,
            _ => return Err(unexpected("configuration", "an object")),
        };

        if let Some(structured) = field(map, "parametric_config", "parametricConfig") {
            let structured = as_object(structured, "parametric_config")?;

            return Ok(Some(Self::Parametric(parametric_from(structured)?)));
        }

        if let Some(structured) = field(map, "bundle_config", "bundleConfig") {
            return Ok(Some(Self::Bundle(bundle_from(structured)?)));
        }

        if let Some(components) = map.get("components").filter(|value| !value.is_null()) {
            return Ok(Some(Self::Bundle(BundleConfiguration {
                components: components_from(components)?,
            })));
        }

        if has_value(map, "parameters") || has_value(map, "selections") {
            return Ok(Some(Self::Parametric(parametric_from(map)?)));
        }

        Ok(None)
    }
}

fn parametric_from(map: &Map<String, Value>) -> Result<ParametricConfiguration, ConfigurationError> {
    Ok(ParametricConfiguration {
        parameters: parameter_map(map.get("parameters"), "parameters")?,
        selections: parameter_map(map.get("selections"), "selections")?,
    })
}

/// A structured bundle is either `{ "components": [...] }` or the component list itself.
fn bundle_from(value: &Value) -> Result<BundleConfiguration, ConfigurationError> {
    let components = match value {
        Value::Array(_) => components_from(value)?,
        Value::Object(map) => match field(map, "components", "bundleComponents") {
            Some(components) => components_from(components)?,
            None => Vec::new(),
        },
        _ => return Err(unexpected("bundle_config", "an object or a list")),
    };

    Ok(BundleConfiguration { components })
}

fn components_from(value: &Value) -> Result<Vec<ComponentSelection>, ConfigurationError> {
    let Value::Array(entries) = value else {
        return Err(unexpected("components", "a list"));
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = as_object(entry, &format!("components[{index}]"))?;

            component_from(entry, index)
        })
        .collect()
}

fn component_from(
    map: &Map<String, Value>,
    index: usize,
) -> Result<ComponentSelection, ConfigurationError> {
    let path = |name: &str| format!("components[{index}].{name}");

    Ok(ComponentSelection {
        component_id: uuid_field(
            field(map, "component_id", "componentId"),
            &path("component_id"),
        )?,
        product_id: uuid_field(field(map, "product_id", "productId"), &path("product_id"))?,
        variant_id: uuid_field(field(map, "variant_id", "variantId"), &path("variant_id"))?,
        quantity: quantity_field(map.get("quantity"), &path("quantity"))?,
        parameters: parameter_map(map.get("parameters"), &path("parameters"))?,
        selections: parameter_map(map.get("selections"), &path("selections"))?,
    })
}

fn uuid_field(value: Option<&Value>, name: &str) -> Result<Option<Uuid>, ConfigurationError> {
    match value {
        None => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(Value::String(raw)) => Uuid::parse_str(raw.trim()).map(Some).map_err(|_source| {
            ConfigurationError::MalformedIdentifier {
                field: name.to_string(),
            }
        }),
        Some(_) => Err(ConfigurationError::MalformedIdentifier {
            field: name.to_string(),
        }),
    }
}

fn quantity_field(value: Option<&Value>, name: &str) -> Result<u32, ConfigurationError> {
    let Some(value) = value.filter(|value| !value.is_null()) else {
        return Ok(1);
    };

    value
        .as_u64()
        .filter(|quantity| *quantity >= 1)
        .and_then(|quantity| u32::try_from(quantity).ok())
        .ok_or_else(|| ConfigurationError::InvalidQuantity {
            field: name.to_string(),
        })
}

fn parameter_map(value: Option<&Value>, name: &str) -> Result<ParameterMap, ConfigurationError> {
    match value {
        None | Some(Value::Null) => Ok(ParameterMap::new()),
        Some(Value::Object(map)) => Ok(map
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()),
        Some(_) => Err(unexpected(name, "an object")),
    }
}

/// Looks a field up under either naming convention, treating `null` as absent.
fn field<'a>(map: &'a Map<String, Value>, snake: &str, camel: &str) -> Option<&'a Value> {
    map.get(snake)
        .or_else(|| map.get(camel))
        .filter(|value| !value.is_null())
}

fn has_value(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).is_some_and(|value| !value.is_null())
}

fn as_object<'a>(
    value: &'a Value,
    name: &str,
) -> Result<&'a Map<String, Value>, ConfigurationError> {
    value.as_object().ok_or_else(|| unexpected(name, "an object"))
}

fn unexpected(field: &str, expected: &'static str) -> ConfigurationError {
    ConfigurationError::UnexpectedShape {
        field: field.to_string(),
        expected,
    }
}
