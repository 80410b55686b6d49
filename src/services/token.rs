//! Token Manager
//!
//! Acquires and caches the bearer credential every device call depends on.
//! The credential is replaced wholesale on expiry or explicit refresh; there
//! is no background renewal, call sites go through [`TokenManager::ensure_fresh`].

use chrono::Utc;
use crossbeam_channel::Sender;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use crate::connection::{AccountConfig, Credential};
use crate::constants::TOKEN_SUCCESS_CODE;
use crate::error::{Error, Result};
use crate::services::events::ServiceEvent;
use crate::services::transport::{ApiTransport, Query};

pub struct TokenManager {
    transport: Arc<dyn ApiTransport>,
    base_url: String,
    account: AccountConfig,
    credential: Mutex<Option<Credential>>,
    events: Sender<ServiceEvent>,
}

impl TokenManager {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        base_url: impl Into<String>,
        account: AccountConfig,
        events: Sender<ServiceEvent>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            account,
            credential: Mutex::new(None),
            events,
        }
    }

    /// Acquire a fresh credential from the token endpoint and cache it.
    pub async fn acquire(&self) -> Result<Credential> {
        let url = format!("{}/api/token", self.base_url);
        let query = Query::new()
            .push("username", self.account.username.as_str())
            .push("pwd", self.account.password.as_str());

        let body = self.transport.post_query(&url, &query).await?;

        let code = body
            .get("code")
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::MalformedPayload {
                message: "Token response has no code field".to_string(),
            })?;
        if code != TOKEN_SUCCESS_CODE {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string);
            warn!(code, "Token acquisition refused");
            return Err(Error::Server { code, message });
        }

        let token = body
            .get("token")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let ttl_seconds = body.get("expiresIn").and_then(Value::as_i64).unwrap_or(0);

        let credential = Credential::issued_now(token, ttl_seconds);
        info!(ttl_seconds, "Credential acquired");

        *self.lock() = Some(credential.clone());
        let _ = self.events.send(ServiceEvent::TokenRefreshed {
            expires_at: credential.expires_at(),
        });

        Ok(credential)
    }

    /// The cached credential, expired or not
    pub fn cached(&self) -> Option<Credential> {
        self.lock().clone()
    }

    /// Return a credential valid right now, re-acquiring when the cached one
    /// is absent or past its expiry.
    pub async fn ensure_fresh(&self) -> Result<Credential> {
        if let Some(credential) = self.cached() {
            if !credential.is_expired(Utc::now()) {
                return Ok(credential);
            }
        }
        self.acquire().await
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Credential>> {
        self.credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Inject a credential directly (tests)
    #[cfg(test)]
    pub fn set_cached(&self, credential: Credential) {
        *self.lock() = Some(credential);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::transport::testing::RecordingTransport;
    use chrono::Duration;
    use serde_json::json;

    fn manager(transport: Arc<RecordingTransport>) -> TokenManager {
        let (tx, _rx) = crossbeam_channel::unbounded();
        TokenManager::new(
            transport,
            "http://api.test",
            AccountConfig {
                username: "YH001".to_string(),
                password: "pw".to_string(),
            },
            tx,
        )
    }

    #[tokio::test]
    async fn test_acquire_stores_credential() {
        let transport = Arc::new(RecordingTransport::default());
        transport.push_response(json!({"code": 200, "token": "tok-1", "expiresIn": 3600}));
        let manager = manager(transport.clone());

        let credential = manager.acquire().await.expect("acquire");
        assert_eq!(credential.token, "tok-1");
        assert_eq!(credential.ttl_seconds, 3600);
        assert_eq!(manager.cached().expect("cached").token, "tok-1");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].url.ends_with("/api/token"));
        assert_eq!(calls[0].query.get("username"), Some("YH001"));
        assert_eq!(calls[0].query.get("pwd"), Some("pw"));
    }

    #[tokio::test]
    async fn test_acquire_surfaces_server_refusal() {
        let transport = Arc::new(RecordingTransport::default());
        transport.push_response(json!({"code": 401, "message": "bad account"}));
        let manager = manager(transport);

        let err = manager.acquire().await.expect_err("refused");
        assert!(matches!(err, Error::Server { code: 401, .. }));
    }

    #[tokio::test]
    async fn test_ensure_fresh_skips_acquire_when_valid() {
        let transport = Arc::new(RecordingTransport::default());
        let manager = manager(transport.clone());
        manager.set_cached(Credential::issued_now("tok-live", 3600));

        let credential = manager.ensure_fresh().await.expect("fresh");
        assert_eq!(credential.token, "tok-live");
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_fresh_reacquires_when_expired() {
        let transport = Arc::new(RecordingTransport::default());
        transport.push_response(json!({"code": 200, "token": "tok-2", "expiresIn": 60}));
        let manager = manager(transport.clone());
        manager.set_cached(Credential {
            token: "tok-old".to_string(),
            issued_at: Utc::now() - Duration::seconds(7200),
            ttl_seconds: 3600,
        });

        let credential = manager.ensure_fresh().await.expect("fresh");
        assert_eq!(credential.token, "tok-2");
        assert_eq!(transport.calls().len(), 1);
    }
}
