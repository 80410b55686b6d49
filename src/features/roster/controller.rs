//! Roster Controller
//!
//! Paginated device list: pull-to-refresh resets to page 1, bottom-reach
//! loads the next page and appends. Overlapping load-more calls are guarded
//! by a single loading flag.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

use crate::services::{ServiceEvent, ServiceHub};
use crate::state::roster_state::RosterState;

pub struct RosterController {
    hub: ServiceHub,
    state: Arc<RwLock<RosterState>>,
}

impl RosterController {
    pub fn new(hub: ServiceHub) -> Self {
        Self {
            hub,
            state: Arc::new(RwLock::new(RosterState::default())),
        }
    }

    pub fn state(&self) -> RwLockReadGuard<'_, RosterState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, RosterState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Narrow subsequent fetches by connection status
    pub fn set_status_filter(&self, filter: Option<i64>) {
        self.state_mut().status_filter = filter;
    }

    /// Reset to page 1 and fetch it (tab switch, pull-to-refresh)
    pub async fn refresh(&self) {
        self.state_mut().reset_page();
        self.fetch_current_page().await;
    }

    /// Fetch the next page and append it to the roster.
    ///
    /// A no-op while a fetch is already in flight.
    pub async fn load_more(&self) {
        {
            let mut state = self.state_mut();
            if state.loading {
                return;
            }
            state.loading = true;
            state.current_page += 1;
        }
        self.fetch_current_page().await;
    }

    async fn fetch_current_page(&self) {
        let (page, page_size, filter) = {
            let state = self.state();
            (state.current_page, state.page_size, state.status_filter)
        };

        match self.hub.roster().fetch_page(page, page_size, filter).await {
            Ok(fetched) => {
                let mut state = self.state_mut();
                state.apply_page(page, fetched);
                state.loading = false;
                drop(state);
                self.hub.emit(ServiceEvent::RosterUpdated);
            }
            Err(err) => {
                warn!(page, %err, "Roster page fetch failed");
                self.state_mut().loading = false;
                self.hub
                    .emit(ServiceEvent::error(err.notice_text("Fetch device list failed")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{ConsoleConfig, Credential};
    use crate::services::transport::testing::RecordingTransport;
    use serde_json::{Value, json};

    fn page_body(n: usize, total: i64) -> Value {
        let items: Vec<Value> = (0..n).map(|i| json!({"iotId": format!("d{i}")})).collect();
        json!({"code": 200, "total": total, "data": items})
    }

    fn controller(transport: Arc<RecordingTransport>) -> RosterController {
        let hub = ServiceHub::with_transport(ConsoleConfig::default(), transport);
        hub.tokens().set_cached(Credential::issued_now("tok-live", 3600));
        RosterController::new(hub)
    }

    #[tokio::test]
    async fn test_refresh_then_load_more_accumulates() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/things/info", page_body(20, 57));
        let controller = controller(transport.clone());

        controller.refresh().await;
        controller.load_more().await;
        controller.load_more().await;

        let state = controller.state();
        // Accumulated roster, duplicates possible; total stays authoritative
        assert_eq!(state.entries.len(), 60);
        assert_eq!(state.total, 57);
        assert_eq!(state.current_page, 3);

        let calls = transport.calls_to("/api/things/info");
        assert_eq!(calls[0].query.get("currentPage"), Some("1"));
        assert_eq!(calls[1].query.get("currentPage"), Some("2"));
        assert_eq!(calls[2].query.get("currentPage"), Some("3"));
    }

    #[tokio::test]
    async fn test_refresh_resets_to_page_one() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/things/info", page_body(5, 5));
        let controller = controller(transport.clone());

        controller.refresh().await;
        controller.load_more().await;
        controller.refresh().await;

        let state = controller.state();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.entries.len(), 5);
    }

    #[tokio::test]
    async fn test_failed_page_clears_loading_flag() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/things/info", json!({"code": 500, "message": "boom"}));
        let controller = controller(transport);

        controller.load_more().await;
        assert!(!controller.state().loading);
        // The page increment is not rolled back on failure
        assert_eq!(controller.state().current_page, 2);
    }

    #[tokio::test]
    async fn test_status_filter_threaded_through() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/things/info", page_body(1, 1));
        let controller = controller(transport.clone());

        controller.set_status_filter(Some(3));
        controller.refresh().await;

        let call = &transport.calls_to("/api/things/info")[0];
        assert_eq!(call.query.get("status"), Some("3"));
    }
}
