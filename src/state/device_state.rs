//! DeviceState - Snapshot, Template and Editable Value Map
//!
//! Holds the last fetched device snapshot, the live property readings, the
//! TSL template and the editable value map reconciled from them. The
//! `identifier` is the join key everywhere; all values are stored in wire
//! string form (booleans as "1"/"0", enums as the enum key).

use std::collections::HashMap;

use crate::domain::device::{DeviceSnapshot, DeviceStatus, PropertyReading};
use crate::domain::template::{EnumOption, PropertyTemplate};
use crate::utils::format::value_to_wire_string;

#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    /// Last device info, replaced wholesale per fetch
    pub snapshot: DeviceSnapshot,
    /// Last live property readings, replaced wholesale per fetch
    pub readings: Vec<PropertyReading>,
    /// TSL template, replaced wholesale per fetch
    pub template: PropertyTemplate,
    /// Editable value map keyed by property identifier
    pub values: HashMap<String, String>,
    /// Local on/off state of the legacy switch channels
    pub switches: HashMap<String, bool>,
}

impl DeviceState {
    /// Replace the info snapshot
    pub fn apply_snapshot(&mut self, snapshot: DeviceSnapshot) {
        self.snapshot = snapshot;
    }

    /// Replace the live readings
    pub fn apply_readings(&mut self, readings: Vec<PropertyReading>) {
        self.readings = readings;
    }

    /// Replace the template
    pub fn apply_template(&mut self, template: PropertyTemplate) {
        self.template = template;
    }

    /// Rebuild the value map from the current readings.
    ///
    /// Every reading with a defined attribute contributes its value;
    /// identifiers absent from the readings stay unset until the user edits
    /// them. Idempotent: unchanged inputs produce an unchanged map.
    pub fn reconcile(&mut self) {
        let mut values = HashMap::new();
        for reading in &self.readings {
            if let Some(attribute) = &reading.attribute {
                values.insert(attribute.clone(), value_to_wire_string(&reading.value));
            }
        }
        self.values = values;
    }

    /// User edit of a single property value; other keys are untouched
    pub fn set_value(&mut self, identifier: &str, value: impl Into<String>) {
        self.values.insert(identifier.to_string(), value.into());
    }

    pub fn value(&self, identifier: &str) -> Option<&str> {
        self.values.get(identifier).map(String::as_str)
    }

    /// Picker options for an enum property, in spec insertion order
    pub fn enum_options(&self, identifier: &str) -> Vec<EnumOption> {
        self.template
            .property(identifier)
            .map(|spec| spec.enum_options())
            .unwrap_or_default()
    }

    pub fn status(&self) -> DeviceStatus {
        self.snapshot.status
    }

    /// Flip a legacy switch channel's local state
    pub fn set_switch(&mut self, channel: &str, on: bool) {
        self.switches.insert(channel.to_string(), on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn readings() -> Vec<PropertyReading> {
        serde_json::from_value(json!([
            {"attribute": "temp", "value": 21.5},
            {"attribute": "mode", "value": "0"},
            {"value": "no attribute, skipped"}
        ]))
        .expect("readings")
    }

    #[test]
    fn test_reconcile_builds_value_map() {
        let mut state = DeviceState::default();
        state.apply_readings(readings());
        state.reconcile();

        assert_eq!(state.value("temp"), Some("21.5"));
        assert_eq!(state.value("mode"), Some("0"));
        assert_eq!(state.values.len(), 2);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut state = DeviceState::default();
        state.apply_readings(readings());
        state.reconcile();
        let first = state.values.clone();
        state.reconcile();
        assert_eq!(state.values, first);
    }

    #[test]
    fn test_user_edit_overwrites_single_key() {
        let mut state = DeviceState::default();
        state.apply_readings(readings());
        state.reconcile();

        state.set_value("mode", "1");
        assert_eq!(state.value("mode"), Some("1"));
        assert_eq!(state.value("temp"), Some("21.5"));
    }

    #[test]
    fn test_enum_options_from_template() {
        let mut state = DeviceState::default();
        state.apply_template(PropertyTemplate::from_payload(json!({"properties": [
            {
                "identifier": "mode",
                "accessMode": "rw",
                "dataType": {"type": "enum", "specs": {"0": "Auto", "1": "Manual"}}
            }
        ]})));

        let options = state.enum_options("mode");
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].key, "1");
        assert_eq!(options[1].label, "Manual");
        assert!(state.enum_options("unknown").is_empty());
    }
}
