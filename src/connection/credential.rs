//! Bearer Credential
//!
//! Short-lived access token for the device API. Replaced wholesale on expiry
//! or explicit refresh, never partially mutated.

use chrono::{DateTime, Duration, Utc};

/// A cached bearer credential with expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Bearer token passed on every device request
    pub token: String,
    /// Acquisition time
    pub issued_at: DateTime<Utc>,
    /// Validity in seconds as declared by the token endpoint
    pub ttl_seconds: i64,
}

impl Credential {
    /// Create a credential issued now
    pub fn issued_now(token: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            token: token.into(),
            issued_at: Utc::now(),
            ttl_seconds,
        }
    }

    /// Instant after which the credential must not be used
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::seconds(self.ttl_seconds)
    }

    /// Whether the credential is expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }
}
