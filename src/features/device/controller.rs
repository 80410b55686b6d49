//! Device Controller
//!
//! Orchestrates the info tab: snapshot and template fetches, value-map
//! reconciliation, property edits and writes. No optimistic updates: a
//! successful write triggers a fresh properties fetch to converge local
//! state with what the device actually accepted.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

use crate::services::{ServiceEvent, ServiceHub, SwitchCommand};
use crate::state::device_state::DeviceState;

pub struct DeviceController {
    hub: ServiceHub,
    state: Arc<RwLock<DeviceState>>,
}

impl DeviceController {
    pub fn new(hub: ServiceHub) -> Self {
        Self {
            hub,
            state: Arc::new(RwLock::new(DeviceState::default())),
        }
    }

    pub fn state(&self) -> RwLockReadGuard<'_, DeviceState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, DeviceState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Refresh the info tab: fetch the snapshot, then the live readings and
    /// the template as independent requests, then reconcile the value map
    /// once both have resolved.
    pub async fn refresh_info(&self) {
        let snapshot = match self.hub.device().fetch_info().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(%err, "Device info fetch failed");
                self.hub
                    .emit(ServiceEvent::error(err.notice_text("Fetch device info failed")));
                return;
            }
        };
        self.state_mut().apply_snapshot(snapshot);
        self.hub.emit(ServiceEvent::SnapshotUpdated);

        let (readings, template) = tokio::join!(
            self.hub.device().fetch_properties(),
            self.hub.device().fetch_template(),
        );

        match readings {
            Ok(readings) => {
                self.state_mut().apply_readings(readings);
                self.hub.emit(ServiceEvent::PropertiesUpdated);
            }
            Err(err) => {
                self.hub
                    .emit(ServiceEvent::error(err.notice_text("Fetch properties failed")));
            }
        }
        match template {
            Ok(template) => {
                let mut state = self.state_mut();
                state.apply_template(template);
                state.reconcile();
                drop(state);
                self.hub.emit(ServiceEvent::TemplateUpdated);
            }
            Err(err) => {
                self.hub
                    .emit(ServiceEvent::error(err.notice_text("Fetch template failed")));
            }
        }
    }

    /// Refresh just the connection status
    pub async fn refresh_status(&self) {
        match self.hub.device().fetch_status().await {
            Ok(status) => {
                self.state_mut().snapshot.status = status;
                self.hub.emit(ServiceEvent::SnapshotUpdated);
            }
            Err(err) => {
                self.hub
                    .emit(ServiceEvent::error(err.notice_text("Fetch device status failed")));
            }
        }
    }

    /// Re-fetch the live readings (after a write, or on demand).
    ///
    /// Updates the readings only; the value map keeps the user's edits.
    pub async fn refresh_properties(&self) {
        match self.hub.device().fetch_properties().await {
            Ok(readings) => {
                self.state_mut().apply_readings(readings);
                self.hub.emit(ServiceEvent::PropertiesUpdated);
            }
            Err(err) => {
                self.hub
                    .emit(ServiceEvent::error(err.notice_text("Fetch properties failed")));
            }
        }
    }

    /// User edit of a text or numeric property
    pub fn set_value(&self, identifier: &str, value: impl Into<String>) {
        self.state_mut().set_value(identifier, value);
    }

    /// Confirmed enum picker selection; stores the enum key, not the label.
    ///
    /// A key the template does not declare for the property is ignored.
    pub fn confirm_enum(&self, identifier: &str, key: &str) {
        {
            let state = self.state();
            if let Some(spec) = state.template.property(identifier) {
                if spec.is_enum() && !spec.enum_options().iter().any(|o| o.key == key) {
                    warn!(identifier, key, "Undeclared enum key");
                    return;
                }
            }
        }
        self.state_mut().set_value(identifier, key);
    }

    /// Boolean toggle: stores "1"/"0" and writes through immediately,
    /// no separate submit action. Ignored when the template declares the
    /// property as a non-bool kind.
    pub async fn toggle_bool(&self, identifier: &str, on: bool) {
        let declared_other_kind = self
            .state()
            .template
            .property(identifier)
            .is_some_and(|spec| !spec.is_bool());
        if declared_other_kind {
            warn!(identifier, "Toggle on a non-bool property");
            return;
        }
        let value = if on { "1" } else { "0" };
        self.state_mut().set_value(identifier, value);
        if self.hub.writer().write_one(identifier, value).await.is_ok() {
            self.refresh_properties().await;
        }
    }

    /// Submit the current value of one property
    pub async fn submit_one(&self, identifier: &str) {
        let value = self.state().value(identifier).map(str::to_string);
        let Some(value) = value else {
            self.hub.emit(ServiceEvent::info("Fill or pick a property value first"));
            return;
        };
        if self.hub.writer().write_one(identifier, &value).await.is_ok() {
            self.refresh_properties().await;
        }
    }

    /// Submit every writable property with a defined value
    pub async fn submit_all(&self) {
        let (template, values) = {
            let state = self.state();
            (state.template.clone(), state.values.clone())
        };
        let report = self.hub.writer().write_all(&template, &values).await;
        if report.succeeded > 0 {
            self.refresh_properties().await;
        }
    }

    /// Flip a legacy switch channel through the admin control endpoint
    pub async fn toggle_switch(&self, channel: &str, on: bool) {
        self.state_mut().set_switch(channel, on);
        match self
            .hub
            .control()
            .send_switch(channel, SwitchCommand::from_on(on))
            .await
        {
            Ok(()) => self.hub.emit(ServiceEvent::success("Command dispatched")),
            Err(err) => {
                warn!(channel, %err, "Control command failed");
                self.hub
                    .emit(ServiceEvent::error(err.notice_text("Control failed")));
            }
        }
    }
}
