//! Legacy Control Commands
//!
//! The on/off control call predates the device-management API: it lives on
//! the admin host, takes a form-urlencoded body, carries no token, and is
//! judged by HTTP status alone.

use std::sync::Arc;
use tracing::{instrument, warn};

use crate::domain::device::DeviceIdentity;
use crate::error::{Error, Result};
use crate::services::transport::{ApiTransport, Query};

/// Wire commands accepted by the control endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchCommand {
    TurnOn,
    TurnOff,
}

impl SwitchCommand {
    pub fn from_on(on: bool) -> Self {
        if on {
            SwitchCommand::TurnOn
        } else {
            SwitchCommand::TurnOff
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchCommand::TurnOn => "turnon",
            SwitchCommand::TurnOff => "turnoff",
        }
    }
}

pub struct ControlApi {
    transport: Arc<dyn ApiTransport>,
    base_url: String,
    identity: DeviceIdentity,
}

impl ControlApi {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        base_url: impl Into<String>,
        identity: DeviceIdentity,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            identity,
        }
    }

    /// Dispatch an on/off command for one switch channel.
    #[instrument(skip(self))]
    pub async fn send_switch(&self, identifier: &str, command: SwitchCommand) -> Result<()> {
        let url = format!("{}/admin/alidevrealdata/controldev.html", self.base_url);
        let form = Query::new()
            .push("pk", self.identity.product_key.as_str())
            .push("deviceName", self.identity.device_name.as_str())
            .push("identifier", identifier)
            .push("cmd", command.as_str());

        let status = self.transport.post_form(&url, &form).await?;
        if !(200..300).contains(&status) {
            warn!(status, identifier, "Control command refused");
            return Err(Error::Server {
                code: status as i64,
                message: None,
            });
        }
        Ok(())
    }
}
