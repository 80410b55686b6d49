//! Device API
//!
//! Fetchers for a single device: info, connection status, live property
//! readings and the TSL template, plus the single-property write. Every call
//! goes through the token manager first, so an expired credential is
//! re-acquired before the device request is issued.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::device::{DeviceIdentity, DeviceSnapshot, DeviceStatus, PropertyReading};
use crate::domain::template::PropertyTemplate;
use crate::error::Result;
use crate::services::envelope::{self, EndpointFamily, Payload};
use crate::services::token::TokenManager;
use crate::services::transport::{ApiTransport, Query};

pub struct DeviceApi {
    transport: Arc<dyn ApiTransport>,
    base_url: String,
    identity: DeviceIdentity,
    tokens: Arc<TokenManager>,
}

impl DeviceApi {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        base_url: impl Into<String>,
        identity: DeviceIdentity,
        tokens: Arc<TokenManager>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            identity,
            tokens,
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Common path for thing-family endpoints: fresh token, identity
    /// parameters, success-code check.
    pub(crate) async fn thing_call(&self, path: &str, extra: Query) -> Result<Value> {
        let credential = self.tokens.ensure_fresh().await?;
        let url = format!("{}{path}", self.base_url);

        let mut query = Query::new()
            .push("token", credential.token)
            .push("pk", self.identity.product_key.as_str())
            .push("deviceName", self.identity.device_name.as_str());
        for (key, value) in extra.pairs() {
            query = query.push(key, value.as_str());
        }

        let body = self.transport.post_query(&url, &query).await?;
        envelope::check_code(&body, EndpointFamily::Thing)?;
        Ok(body)
    }

    /// Fetch device identity attributes and connection status, replaced
    /// wholesale on success.
    #[instrument(skip(self))]
    pub async fn fetch_info(&self) -> Result<DeviceSnapshot> {
        let body = self.thing_call("/api/thing/info", Query::new()).await?;
        let payload = envelope::decode(&body)
            .map(Payload::into_value)
            .unwrap_or(Value::Null);
        Ok(DeviceSnapshot::from_payload(payload))
    }

    /// Fetch just the connection status
    #[instrument(skip(self))]
    pub async fn fetch_status(&self) -> Result<DeviceStatus> {
        let body = self.thing_call("/api/thing/status", Query::new()).await?;
        let status = envelope::decode(&body)
            .map(Payload::into_value)
            .as_ref()
            .and_then(|payload| payload.get("status"))
            .and_then(Value::as_i64)
            .unwrap_or(0);
        Ok(status.into())
    }

    /// Fetch the live property snapshot.
    ///
    /// A payload that is not an array of readings yields an empty list
    /// rather than an error.
    #[instrument(skip(self))]
    pub async fn fetch_properties(&self) -> Result<Vec<PropertyReading>> {
        let body = self
            .thing_call("/api/thing/properties", Query::new())
            .await?;
        let items = envelope::decode(&body)
            .map(Payload::into_items)
            .unwrap_or_default();
        let readings = items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect();
        Ok(readings)
    }

    /// Fetch the TSL template; malformed templates collapse to empty
    #[instrument(skip(self))]
    pub async fn fetch_template(&self) -> Result<PropertyTemplate> {
        let body = self.thing_call("/api/thing/tsl", Query::new()).await?;
        let payload = envelope::decode(&body)
            .map(Payload::into_value)
            .unwrap_or(Value::Null);
        Ok(PropertyTemplate::from_payload(payload))
    }

    /// Write one property value. The value travels in its wire string form.
    #[instrument(skip(self), fields(correlation = %Uuid::new_v4()))]
    pub async fn write_property(&self, identifier: &str, value: &str) -> Result<()> {
        debug!(identifier, value, "Writing property");
        let query = Query::new()
            .push("identifier", identifier)
            .push("value", value);
        self.thing_call("/api/thing/properties/set", query).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{AccountConfig, Credential};
    use crate::services::transport::testing::RecordingTransport;
    use chrono::{Duration, Utc};
    use serde_json::json;

    pub(crate) fn api(transport: Arc<RecordingTransport>) -> DeviceApi {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let tokens = Arc::new(TokenManager::new(
            transport.clone(),
            "http://api.test",
            AccountConfig::default(),
            tx,
        ));
        tokens.set_cached(Credential::issued_now("tok-live", 3600));
        DeviceApi::new(
            transport,
            "http://api.test",
            DeviceIdentity {
                product_key: "a10VqNZhdXD".to_string(),
                device_name: "H4G001".to_string(),
            },
            tokens,
        )
    }

    #[tokio::test]
    async fn test_fetch_info_builds_identity_query() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route(
            "/api/thing/info",
            json!({"code": 200, "data": {"status": 1, "nickName": "pump"}}),
        );
        let api = api(transport.clone());

        let snapshot = api.fetch_info().await.expect("info");
        assert_eq!(snapshot.status, DeviceStatus::Online);

        let call = &transport.calls_to("/api/thing/info")[0];
        assert_eq!(call.query.get("token"), Some("tok-live"));
        assert_eq!(call.query.get("pk"), Some("a10VqNZhdXD"));
        assert_eq!(call.query.get("deviceName"), Some("H4G001"));
    }

    #[tokio::test]
    async fn test_fetch_info_flat_envelope() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/thing/info", json!({"code": 200, "status": 3}));
        let api = api(transport);
        let snapshot = api.fetch_info().await.expect("info");
        assert_eq!(snapshot.status, DeviceStatus::Offline);
    }

    #[tokio::test]
    async fn test_expired_credential_reacquired_before_device_call() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/token", json!({"code": 200, "token": "tok-new", "expiresIn": 60}));
        transport.route("/api/thing/status", json!({"code": 200, "data": {"status": 1}}));
        let api = api(transport.clone());
        api.tokens.set_cached(Credential {
            token: "tok-stale".to_string(),
            issued_at: Utc::now() - Duration::seconds(7200),
            ttl_seconds: 3600,
        });

        api.fetch_status().await.expect("status");

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].url.ends_with("/api/token"));
        assert_eq!(calls[1].query.get("token"), Some("tok-new"));
    }

    #[tokio::test]
    async fn test_fetch_properties_readings() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route(
            "/api/thing/properties",
            json!({"code": 200, "data": [
                {"attribute": "temp", "value": 21.5},
                {"value": "orphan"}
            ]}),
        );
        let api = api(transport);
        let readings = api.fetch_properties().await.expect("readings");
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].attribute.as_deref(), Some("temp"));
        assert_eq!(readings[1].attribute, None);
    }

    #[tokio::test]
    async fn test_fetch_properties_non_array_payload_is_empty() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route(
            "/api/thing/properties",
            json!({"code": 200, "data": {"unexpected": true}}),
        );
        let api = api(transport);
        assert!(api.fetch_properties().await.expect("readings").is_empty());
    }

    #[tokio::test]
    async fn test_server_error_leaves_no_partial_result() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route(
            "/api/thing/info",
            json!({"code": 500, "message": "boom"}),
        );
        let api = api(transport);
        assert!(api.fetch_info().await.is_err());
    }

    #[tokio::test]
    async fn test_write_property_params() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/thing/properties/set", json!({"code": 200}));
        let api = api(transport.clone());

        api.write_property("mode", "1").await.expect("write");

        let call = &transport.calls_to("/api/thing/properties/set")[0];
        assert_eq!(call.query.get("identifier"), Some("mode"));
        assert_eq!(call.query.get("value"), Some("1"));
    }
}
