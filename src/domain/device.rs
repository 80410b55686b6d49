//! Device - Identity, Status and Roster Types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Connection status reported by the cloud platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    /// Device has never come online
    #[default]
    Unactivated,
    /// Device is online
    Online,
    /// Device is offline
    Offline,
    /// Device has been disabled on the platform
    Disabled,
}

impl DeviceStatus {
    /// Wire code as reported by the platform (0/1/3/8)
    pub fn code(&self) -> i64 {
        match self {
            DeviceStatus::Unactivated => 0,
            DeviceStatus::Online => 1,
            DeviceStatus::Offline => 3,
            DeviceStatus::Disabled => 8,
        }
    }

    /// Display label for the status
    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Unactivated => "Unactivated",
            DeviceStatus::Online => "Online",
            DeviceStatus::Offline => "Offline",
            DeviceStatus::Disabled => "Disabled",
        }
    }
}

impl From<i64> for DeviceStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => DeviceStatus::Online,
            3 => DeviceStatus::Offline,
            8 => DeviceStatus::Disabled,
            _ => DeviceStatus::Unactivated,
        }
    }
}

/// Identity of the device this session manages.
///
/// Supplied by configuration, never derived from device data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub product_key: String,
    pub device_name: String,
}

/// Last fetched device info, replaced wholesale on each fetch
#[derive(Debug, Clone, Default)]
pub struct DeviceSnapshot {
    /// Connection status
    pub status: DeviceStatus,
    /// Raw attributes as returned by the platform
    pub raw: Map<String, Value>,
}

impl DeviceSnapshot {
    /// Build a snapshot from a decoded info payload.
    ///
    /// Non-object payloads yield an empty snapshot rather than an error.
    pub fn from_payload(payload: Value) -> Self {
        let raw = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let status = raw
            .get("status")
            .and_then(Value::as_i64)
            .unwrap_or(0)
            .into();
        Self { status, raw }
    }
}

/// One live property reading from the device snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyReading {
    /// Property identifier; readings without one are skipped in reconciliation
    pub attribute: Option<String>,
    /// Last reported value
    pub value: Value,
}

/// One entry of the device roster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceListEntry {
    /// Platform id; synthesized as "productKey:name" when absent
    pub iot_id: String,
    /// Connection status
    pub status: DeviceStatus,
    /// Last modification timestamp (ms), null rather than omitted
    pub last_modified: Option<i64>,
    /// All other server fields, passed through untouched
    pub raw: Map<String, Value>,
}

impl DeviceListEntry {
    /// Normalize a raw roster entry.
    ///
    /// A present, non-empty `iotId` is never overwritten.
    pub fn from_raw(raw: Map<String, Value>) -> Self {
        let iot_id = match raw.get("iotId").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let pk = raw.get("productKey").and_then(Value::as_str).unwrap_or("");
                let name = raw.get("name").and_then(Value::as_str).unwrap_or("");
                format!("{pk}:{name}")
            }
        };
        let status = raw
            .get("status")
            .and_then(Value::as_i64)
            .unwrap_or(0)
            .into();
        let last_modified = raw.get("gmtModified").and_then(Value::as_i64);
        Self {
            iot_id,
            status,
            last_modified,
            raw,
        }
    }
}
