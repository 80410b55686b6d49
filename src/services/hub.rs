//! Service Hub
//!
//! Central wiring for the API services. Owns the shared transport, the token
//! manager and one instance of each endpoint API, and provides the event
//! channel the front end drains for notices and update signals.

use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

use crate::connection::ConsoleConfig;
use crate::error::Result;
use crate::services::control::ControlApi;
use crate::services::device::DeviceApi;
use crate::services::events::ServiceEvent;
use crate::services::history::HistoryApi;
use crate::services::roster::RosterApi;
use crate::services::token::TokenManager;
use crate::services::transport::{ApiTransport, HttpTransport};
use crate::services::writer::PropertyWriter;

pub struct ServiceHub {
    tokens: Arc<TokenManager>,
    device: Arc<DeviceApi>,
    writer: Arc<PropertyWriter>,
    roster: Arc<RosterApi>,
    history: Arc<HistoryApi>,
    control: Arc<ControlApi>,
    tx: Sender<ServiceEvent>,
    rx: Receiver<ServiceEvent>,
}

impl ServiceHub {
    /// Create a hub with the production HTTP transport
    pub fn new(config: ConsoleConfig) -> Result<Self> {
        let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::new()?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a hub over an arbitrary transport (tests use a recorded one)
    pub fn with_transport(config: ConsoleConfig, transport: Arc<dyn ApiTransport>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();

        let tokens = Arc::new(TokenManager::new(
            transport.clone(),
            config.api.base_url.clone(),
            config.account.clone(),
            tx.clone(),
        ));
        let device = Arc::new(DeviceApi::new(
            transport.clone(),
            config.api.base_url.clone(),
            config.device.clone(),
            tokens.clone(),
        ));
        let writer = Arc::new(PropertyWriter::new(device.clone(), tx.clone()));
        let roster = Arc::new(RosterApi::new(device.clone()));
        let history = Arc::new(HistoryApi::new(
            transport.clone(),
            config.api.base_url.clone(),
            device.clone(),
            tokens.clone(),
        ));
        let control = Arc::new(ControlApi::new(
            transport,
            config.api.legacy_base_url.clone(),
            config.device.clone(),
        ));

        Self {
            tokens,
            device,
            writer,
            roster,
            history,
            control,
            tx,
            rx,
        }
    }

    /// Event receiver for the front end.
    ///
    /// Notices and update signals from all services are multiplexed into
    /// this single channel.
    pub fn events(&self) -> Receiver<ServiceEvent> {
        self.rx.clone()
    }

    /// Send an event on behalf of a controller
    pub fn emit(&self, event: ServiceEvent) {
        let _ = self.tx.send(event);
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    pub fn device(&self) -> &Arc<DeviceApi> {
        &self.device
    }

    pub fn writer(&self) -> &Arc<PropertyWriter> {
        &self.writer
    }

    pub fn roster(&self) -> &Arc<RosterApi> {
        &self.roster
    }

    pub fn history(&self) -> &Arc<HistoryApi> {
        &self.history
    }

    pub fn control(&self) -> &Arc<ControlApi> {
        &self.control
    }
}

impl Clone for ServiceHub {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            device: self.device.clone(),
            writer: self.writer.clone(),
            roster: self.roster.clone(),
            history: self.history.clone(),
            control: self.control.clone(),
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl std::fmt::Debug for ServiceHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHub")
            .field("device", &self.device.identity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::transport::testing::RecordingTransport;

    #[test]
    fn test_hub_wiring() {
        let hub = ServiceHub::with_transport(
            ConsoleConfig::default(),
            Arc::new(RecordingTransport::default()),
        );
        hub.emit(ServiceEvent::info("hello"));
        assert_eq!(hub.events().try_recv(), Ok(ServiceEvent::info("hello")));
    }
}
