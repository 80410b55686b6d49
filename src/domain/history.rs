//! History - Property Timeline Types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::format::value_to_wire_string;

/// One point of a property's history series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Timestamp in milliseconds since epoch
    pub timestamp: i64,
    /// Reported value, wire string form
    pub value: String,
}

impl HistoryPoint {
    /// Parse one timeline item. The platform reports the timestamp under
    /// `time`, older deployments under `timestamp`.
    pub fn from_raw(raw: &Value) -> Self {
        let timestamp = raw
            .get("time")
            .or_else(|| raw.get("timestamp"))
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let value = raw
            .get("value")
            .map(value_to_wire_string)
            .unwrap_or_default();
        Self { timestamp, value }
    }
}
