//! Service Events
//!
//! Events emitted by the service and controller layers for a front end to
//! consume. Toast-style notices and state-updated signals are multiplexed
//! into one channel.

use chrono::{DateTime, Utc};

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Events for service -> front-end communication
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    /// Transient user-visible notice (toast)
    Notice {
        level: NoticeLevel,
        message: String,
    },

    /// A fresh credential was stored
    TokenRefreshed { expires_at: DateTime<Utc> },

    /// Device info snapshot was replaced
    SnapshotUpdated,

    /// Live property readings were replaced
    PropertiesUpdated,

    /// TSL template was replaced and the value map reconciled
    TemplateUpdated,

    /// Device roster changed (page applied)
    RosterUpdated,

    /// History series was replaced
    HistoryUpdated,
}

impl ServiceEvent {
    pub fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self::Notice {
            level,
            message: message.into(),
        }
    }

    /// Create an info notice
    pub fn info(message: impl Into<String>) -> Self {
        Self::notice(NoticeLevel::Info, message)
    }

    /// Create a success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self::notice(NoticeLevel::Success, message)
    }

    /// Create an error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self::notice(NoticeLevel::Error, message)
    }
}
