//! History Controller
//!
//! Query window and series for one property identifier. Changing a bound or
//! the identifier never auto-requeries; the query action is explicit.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

use crate::services::{ServiceEvent, ServiceHub};
use crate::state::history_state::HistoryState;

pub struct HistoryController {
    hub: ServiceHub,
    state: Arc<RwLock<HistoryState>>,
}

impl HistoryController {
    pub fn new(hub: ServiceHub, now_ms: i64) -> Self {
        Self {
            hub,
            state: Arc::new(RwLock::new(HistoryState::new(now_ms))),
        }
    }

    pub fn state(&self) -> RwLockReadGuard<'_, HistoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, HistoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_identifier(&self, identifier: &str) {
        self.state_mut().set_identifier(identifier);
    }

    pub fn set_start_ts(&self, ts: i64) {
        self.state_mut().set_start_ts(ts);
    }

    pub fn set_end_ts(&self, ts: i64) {
        self.state_mut().set_end_ts(ts);
    }

    /// Query the configured window for the configured identifier.
    pub async fn query(&self) {
        let (identifier, start_ts, end_ts) = {
            let state = self.state();
            (state.identifier.clone(), state.start_ts, state.end_ts)
        };

        match self.hub.history().query(&identifier, start_ts, end_ts).await {
            Ok(points) => {
                let mut state = self.state_mut();
                state.apply_points(points);
                info!(
                    identifier,
                    window = %state.window_label(),
                    points = state.points.len(),
                    "History series replaced"
                );
                drop(state);
                self.hub.emit(ServiceEvent::HistoryUpdated);
            }
            Err(err) => {
                warn!(%err, "History query failed");
                self.hub
                    .emit(ServiceEvent::error(err.notice_text("Fetch history failed")));
            }
        }
    }
}
