//! Item Configurations
//!
//! Bundle and parametric products carry a configuration describing which components or options
//! the customer picked. Clients send configurations in several shapes; [`Configuration::normalize`]
//! folds them into the canonical [`Configuration`] union, and [`Fingerprint`] hashes the canonical
//! form so equivalent configurations deduplicate to the same cart line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

mod fingerprint;
mod normalize;

pub use fingerprint::Fingerprint;
pub use normalize::ConfigurationError;

/// Free-form key/value data attached to a configuration.
pub type ParameterMap = BTreeMap<String, Value>;

/// Canonical configuration of a cart or order item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Configuration {
    /// Component selections of a bundle product.
    Bundle(BundleConfiguration),

    /// Parameters and option selections of a parametric product.
    Parametric(ParametricConfiguration),
}

/// Ordered component selections of a bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleConfiguration {
    /// Selected components, in the order the client sent them.
    pub components: Vec<ComponentSelection>,
}

/// A single bundle component selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSelection {
    /// Bundle component identifier.
    pub component_id: Option<Uuid>,

    /// Product chosen for the component.
    pub product_id: Option<Uuid>,

    /// Variant chosen for the component.
    pub variant_id: Option<Uuid>,

    /// Number of units of the component.
    pub quantity: u32,

    /// Nested parameters of a parametric component.
    #[serde(default)]
    pub parameters: ParameterMap,

    /// Nested selections of a parametric component.
    #[serde(default)]
    pub selections: ParameterMap,
}

/// Parameters and option selections of a parametric product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParametricConfiguration {
    /// Free-form parameters, e.g. dimensions.
    #[serde(default)]
    pub parameters: ParameterMap,

    /// Option selections keyed by option name.
    #[serde(default)]
    pub selections: ParameterMap,
}

impl Configuration {
    /// Canonical JSON form with sorted object keys at every level.
    ///
    /// Two configurations are equivalent exactly when their canonical forms are equal.
    pub fn canonical_json(&self) -> String {
        let value = match self {
            Self::Bundle(bundle) => {
                let components = bundle
                    .components
                    .iter()
                    .map(ComponentSelection::canonical_value)
                    .collect();

                object([
                    ("kind", Value::from("bundle")),
                    ("components", Value::Array(components)),
                ])
            }
            Self::Parametric(parametric) => object([
                ("kind", Value::from("parametric")),
                ("parameters", canonical_map(&parametric.parameters)),
                ("selections", canonical_map(&parametric.selections)),
            ]),
        };

        value.to_string()
    }

    /// Bundle components, if this is a bundle configuration.
    pub fn as_bundle(&self) -> Option<&BundleConfiguration> {
        match self {
            Self::Bundle(bundle) => Some(bundle),
            Self::Parametric(_) => None,
        }
    }

    /// Parametric data, if this is a parametric configuration.
    pub fn as_parametric(&self) -> Option<&ParametricConfiguration> {
        match self {
            Self::Parametric(parametric) => Some(parametric),
            Self::Bundle(_) => None,
        }
    }
}

impl ComponentSelection {
    fn canonical_value(&self) -> Value {
        object([
            ("component_id", optional_uuid(self.component_id)),
            ("product_id", optional_uuid(self.product_id)),
            ("variant_id", optional_uuid(self.variant_id)),
            ("quantity", Value::from(self.quantity)),
            ("parameters", canonical_map(&self.parameters)),
            ("selections", canonical_map(&self.selections)),
        ])
    }
}

fn optional_uuid(uuid: Option<Uuid>) -> Value {
    uuid.map_or(Value::Null, |uuid| Value::String(uuid.to_string()))
}

fn canonical_map(map: &ParameterMap) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), canonical_value(value)))
            .collect(),
    )
}

/// Rebuilds objects with keys inserted in sorted order, so the output is stable even when
/// `serde_json` preserves insertion order.
fn canonical_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();

            Value::Object(
                sorted
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonical_value(value)))
                    .collect(),
            )
        }
        Value::Array(values) => Value::Array(values.iter().map(canonical_value).collect()),
        other => other.clone(),
    }
}

fn object<const N: usize>(entries: [(&str, Value); N]) -> Value {
    let sorted: BTreeMap<&str, Value> = entries.into_iter().collect();

    Value::Object(
        sorted
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<Map<String, Value>>(),
    )
}
