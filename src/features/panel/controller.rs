//! Panel Controller
//!
//! Top-level three-tab console. Owns one controller per tab and routes
//! refresh and load-more actions to whichever tab is active. Startup
//! acquires a token first; the initial device fetch runs detached so the
//! panel is interactive while it completes.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::services::{ServiceEvent, ServiceHub};
use crate::state::tabs_state::ActiveTab;

use crate::features::device::DeviceController;
use crate::features::history::HistoryController;
use crate::features::roster::RosterController;

pub struct PanelController {
    hub: ServiceHub,
    device: Arc<DeviceController>,
    roster: Arc<RosterController>,
    history: Arc<HistoryController>,
    tab: RwLock<ActiveTab>,
}

impl PanelController {
    pub fn new(hub: ServiceHub, now_ms: i64) -> Arc<Self> {
        Arc::new(Self {
            device: Arc::new(DeviceController::new(hub.clone())),
            roster: Arc::new(RosterController::new(hub.clone())),
            history: Arc::new(HistoryController::new(hub.clone(), now_ms)),
            tab: RwLock::new(ActiveTab::default()),
            hub,
        })
    }

    pub fn device(&self) -> &Arc<DeviceController> {
        &self.device
    }

    pub fn roster(&self) -> &Arc<RosterController> {
        &self.roster
    }

    pub fn history(&self) -> &Arc<HistoryController> {
        &self.history
    }

    pub fn active_tab(&self) -> ActiveTab {
        *self.tab.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire a session token, then kick off the initial device fetch.
    ///
    /// The fetch is detached; startup returns as soon as the token is in
    /// hand and failures surface through the event channel.
    pub async fn startup(self: &Arc<Self>) {
        match self.hub.tokens().acquire().await {
            Ok(credential) => {
                info!(expires_at = %credential.expires_at(), "Session established");
                let device = self.device.clone();
                tokio::spawn(async move {
                    device.refresh_info().await;
                });
            }
            Err(err) => {
                self.hub
                    .emit(ServiceEvent::error(err.notice_text("Get token failed")));
            }
        }
    }

    /// Switch tabs; each tab refreshes its own data on entry
    pub async fn on_tab_change(&self, tab: ActiveTab) {
        *self.tab.write().unwrap_or_else(PoisonError::into_inner) = tab;
        match tab {
            ActiveTab::Info => self.device.refresh_info().await,
            ActiveTab::List => self.roster.refresh().await,
            ActiveTab::History => self.history.query().await,
        }
    }

    /// Pull-to-refresh for whichever tab is active
    pub async fn refresh(&self) {
        match self.active_tab() {
            ActiveTab::Info => self.device.refresh_info().await,
            ActiveTab::List => self.roster.refresh().await,
            ActiveTab::History => self.history.query().await,
        }
    }

    /// Bottom-reach; only the device list paginates
    pub async fn load_more(&self) {
        if self.active_tab() == ActiveTab::List {
            self.roster.load_more().await;
        }
    }
}
