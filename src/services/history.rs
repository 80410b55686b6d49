//! History Query Engine
//!
//! Time-bounded, ordered series of values for one property identifier.
//! The engine requests ascending order from the server and does not re-sort
//! client-side. Note this endpoint spells out `productKey` where the rest of
//! the family abbreviates it as `pk`.

use std::sync::Arc;
use tracing::instrument;

use crate::constants::HISTORY_PAGE_SIZE;
use crate::domain::history::HistoryPoint;
use crate::error::{Error, Result};
use crate::services::device::DeviceApi;
use crate::services::envelope::{self, EndpointFamily, Payload};
use crate::services::token::TokenManager;
use crate::services::transport::{ApiTransport, Query};

pub struct HistoryApi {
    transport: Arc<dyn ApiTransport>,
    base_url: String,
    api: Arc<DeviceApi>,
    tokens: Arc<TokenManager>,
}

impl HistoryApi {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        base_url: impl Into<String>,
        api: Arc<DeviceApi>,
        tokens: Arc<TokenManager>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api,
            tokens,
        }
    }

    /// Query the property timeline over `[start_ts, end_ts]` (both
    /// inclusive, milliseconds).
    ///
    /// Fails fast with a validation error when `identifier` is unset; no
    /// request is issued in that case.
    #[instrument(skip(self))]
    pub async fn query(
        &self,
        identifier: &str,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<Vec<HistoryPoint>> {
        if identifier.is_empty() {
            return Err(Error::Validation {
                message: "Pick a property first".to_string(),
            });
        }

        let credential = self.tokens.ensure_fresh().await?;
        let identity = self.api.identity();
        let url = format!("{}/api/thing/property/timeline", self.base_url);
        let query = Query::new()
            .push("token", credential.token)
            .push("productKey", identity.product_key.as_str())
            .push("deviceName", identity.device_name.as_str())
            .push("identifier", identifier)
            .push("start", start_ts.to_string())
            .push("end", end_ts.to_string())
            .push("pageSize", HISTORY_PAGE_SIZE.to_string())
            .push("ordered", "true");

        let body = self.transport.post_query(&url, &query).await?;
        envelope::check_code(&body, EndpointFamily::Thing)?;

        let items = envelope::decode(&body)
            .map(Payload::into_items)
            .unwrap_or_default();
        Ok(items.iter().map(HistoryPoint::from_raw).collect())
    }
}
