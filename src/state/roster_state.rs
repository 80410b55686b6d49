//! RosterState - Accumulated Device List
//!
//! Page 1 replaces the roster, later pages append in arrival order with no
//! de-duplication. The total is the server's declared count when present,
//! otherwise the accumulated length (a lower bound, not authoritative).

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::domain::device::DeviceListEntry;
use crate::services::RosterPage;

#[derive(Debug, Clone)]
pub struct RosterState {
    pub entries: Vec<DeviceListEntry>,
    pub current_page: u32,
    pub page_size: u32,
    pub total: i64,
    /// Filter by connection status, omitted from requests when None
    pub status_filter: Option<i64>,
    /// Guards overlapping load-more calls
    pub loading: bool,
}

impl Default for RosterState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
            status_filter: None,
            loading: false,
        }
    }
}

impl RosterState {
    /// Apply a fetched page under the accumulation rule.
    ///
    /// A declared total of zero counts as absent, same as a missing field.
    pub fn apply_page(&mut self, page: u32, fetched: RosterPage) {
        if page == 1 {
            self.entries = fetched.entries;
        } else {
            self.entries.extend(fetched.entries);
        }
        self.total = fetched
            .total
            .filter(|total| *total != 0)
            .unwrap_or(self.entries.len() as i64);
    }

    /// Reset pagination for a fresh page-1 fetch
    pub fn reset_page(&mut self) {
        self.current_page = 1;
    }
}
