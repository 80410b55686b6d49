//! Template - TSL Property Schema Types
//!
//! The TSL (thing specification language) template declares a device's
//! properties: identifier, access mode and data type. The `identifier` is the
//! join key between the template, the live snapshot and the editable value map.

use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property access mode as declared on the wire ("r", "w" or "rw")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessMode(pub String);

impl AccessMode {
    pub fn writable(&self) -> bool {
        self.0.contains('w')
    }
}

/// Declared data type of a property.
///
/// For enum kinds `specs` maps enum key to display label; iteration order is
/// the JSON insertion order, which drives picker option ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataType {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub specs: LinkedHashMap<String, Value>,
}

/// One option of an enum property picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumOption {
    /// Enum key, the value stored and transmitted
    pub key: String,
    /// Display label
    pub label: String,
}

/// One property declaration from the TSL template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertySpec {
    /// Unique within the template
    pub identifier: String,
    /// Human-readable name
    pub name: String,
    pub access_mode: AccessMode,
    pub data_type: DataType,
}

impl PropertySpec {
    /// Picker options for an enum property, in spec insertion order.
    ///
    /// Confirming a selection stores the *key*, never the label.
    pub fn enum_options(&self) -> Vec<EnumOption> {
        self.data_type
            .specs
            .iter()
            .map(|(key, label)| EnumOption {
                key: key.clone(),
                label: match label {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
            .collect()
    }

    /// Whether the property renders as a boolean toggle
    pub fn is_bool(&self) -> bool {
        self.data_type.kind == "bool"
    }

    /// Whether the property renders as an enum picker
    pub fn is_enum(&self) -> bool {
        self.data_type.kind == "enum"
    }
}

/// The full TSL template; unknown top-level fields are carried through
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyTemplate {
    pub properties: Vec<PropertySpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PropertyTemplate {
    /// Parse a decoded template payload.
    ///
    /// Absent or malformed templates collapse to an empty property list
    /// rather than an error.
    pub fn from_payload(payload: Value) -> Self {
        serde_json::from_value(payload).unwrap_or_default()
    }

    /// Look up a property by identifier
    pub fn property(&self, identifier: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|p| p.identifier == identifier)
    }
}
