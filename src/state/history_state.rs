//! HistoryState - Query Window and Fetched Series
//!
//! The window defaults to the last 24 hours and is user-adjustable within
//! ±365 days around session start. Changing a bound never auto-requeries;
//! an explicit query action is required.

use crate::constants::{HISTORY_BOUND_DAYS, HISTORY_DEFAULT_WINDOW_HOURS};
use crate::domain::history::HistoryPoint;
use crate::utils::format::format_datetime_ms;

const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

#[derive(Debug, Clone, Default)]
pub struct HistoryState {
    /// Property identifier to query; empty means unset
    pub identifier: String,
    /// Fetched series, server order
    pub points: Vec<HistoryPoint>,
    /// Window start (ms, inclusive)
    pub start_ts: i64,
    /// Window end (ms, inclusive)
    pub end_ts: i64,
    /// Earliest selectable instant
    pub min_ts: i64,
    /// Latest selectable instant
    pub max_ts: i64,
}

impl HistoryState {
    /// Initialize the window around session start (`now_ms`).
    pub fn new(now_ms: i64) -> Self {
        Self {
            identifier: String::new(),
            points: Vec::new(),
            start_ts: now_ms - HISTORY_DEFAULT_WINDOW_HOURS * MS_PER_HOUR,
            end_ts: now_ms,
            min_ts: now_ms - HISTORY_BOUND_DAYS * MS_PER_DAY,
            max_ts: now_ms + HISTORY_BOUND_DAYS * MS_PER_DAY,
        }
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
    }

    /// Set the window start, clamped to the picker bounds
    pub fn set_start_ts(&mut self, ts: i64) {
        self.start_ts = ts.clamp(self.min_ts, self.max_ts);
    }

    /// Set the window end, clamped to the picker bounds
    pub fn set_end_ts(&mut self, ts: i64) {
        self.end_ts = ts.clamp(self.min_ts, self.max_ts);
    }

    /// Replace the series wholesale
    pub fn apply_points(&mut self, points: Vec<HistoryPoint>) {
        self.points = points;
    }

    /// Display label for the query window
    pub fn window_label(&self) -> String {
        format!(
            "{} ~ {}",
            format_datetime_ms(self.start_ts),
            format_datetime_ms(self.end_ts)
        )
    }
}
