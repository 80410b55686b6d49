//! Device List Paginator
//!
//! Fetches one page of the device roster. The endpoint is the least
//! consistent of the family: the body may be a bare array or any of the
//! envelope shapes, and `total` is only sometimes declared.

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::device::DeviceListEntry;
use crate::error::Result;
use crate::services::device::DeviceApi;
use crate::services::envelope::{self, Payload};
use crate::services::transport::Query;

/// One fetched page of the roster
#[derive(Debug, Clone, Default)]
pub struct RosterPage {
    pub entries: Vec<DeviceListEntry>,
    /// Server-declared total; absent when the response omits it
    pub total: Option<i64>,
}

pub struct RosterApi {
    api: Arc<DeviceApi>,
}

impl RosterApi {
    pub fn new(api: Arc<DeviceApi>) -> Self {
        Self { api }
    }

    /// Fetch one roster page. `status_filter` narrows by connection status
    /// and is omitted from the request entirely when `None`.
    #[instrument(skip(self))]
    pub async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        status_filter: Option<i64>,
    ) -> Result<RosterPage> {
        let query = Query::new()
            .push("currentPage", page.to_string())
            .push("pageSize", page_size.to_string())
            .push_opt("status", status_filter.map(|s| s.to_string()));

        let body = self.api.thing_call("/api/things/info", query).await?;

        // A bare top-level array skips the envelope entirely
        let (raw_entries, total) = match &body {
            Value::Array(items) => (items.clone(), None),
            _ => {
                let items = envelope::decode(&body)
                    .map(Payload::into_items)
                    .unwrap_or_default();
                (items, envelope::declared_total(&body))
            }
        };

        let entries = raw_entries
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(DeviceListEntry::from_raw(map)),
                _ => None,
            })
            .collect();

        Ok(RosterPage { entries, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{AccountConfig, Credential};
    use crate::domain::device::DeviceIdentity;
    use crate::services::token::TokenManager;
    use crate::services::transport::testing::RecordingTransport;
    use serde_json::json;

    fn roster(transport: Arc<RecordingTransport>) -> RosterApi {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let tokens = Arc::new(TokenManager::new(
            transport.clone(),
            "http://api.test",
            AccountConfig::default(),
            tx,
        ));
        tokens.set_cached(Credential::issued_now("tok-live", 3600));
        RosterApi::new(Arc::new(DeviceApi::new(
            transport,
            "http://api.test",
            DeviceIdentity {
                product_key: "pk".to_string(),
                device_name: "dev".to_string(),
            },
            tokens,
        )))
    }

    #[tokio::test]
    async fn test_fetch_page_enveloped_with_total() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route(
            "/api/things/info",
            json!({"code": 200, "total": 57, "data": [
                {"iotId": "d1", "status": 1},
                {"productKey": "pk", "name": "n2", "status": 3}
            ]}),
        );
        let roster = roster(transport.clone());

        let page = roster.fetch_page(1, 20, None).await.expect("page");
        assert_eq!(page.total, Some(57));
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[0].iot_id, "d1");
        assert_eq!(page.entries[1].iot_id, "pk:n2");

        let call = &transport.calls_to("/api/things/info")[0];
        assert_eq!(call.query.get("currentPage"), Some("1"));
        assert_eq!(call.query.get("pageSize"), Some("20"));
        assert_eq!(call.query.get("status"), None);
    }

    #[tokio::test]
    async fn test_fetch_page_bare_array() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/things/info", json!([{"iotId": "d1"}]));
        let roster = roster(transport);

        let page = roster.fetch_page(1, 20, None).await.expect("page");
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.total, None);
    }

    #[tokio::test]
    async fn test_fetch_page_items_shape() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route(
            "/api/things/info",
            json!({"code": 200, "items": [{"iotId": "d1"}, {"iotId": "d2"}]}),
        );
        let roster = roster(transport);

        let page = roster.fetch_page(2, 20, None).await.expect("page");
        assert_eq!(page.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_status_filter_serialized_when_present() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/things/info", json!({"code": 200, "data": []}));
        let roster = roster(transport.clone());

        roster.fetch_page(1, 20, Some(1)).await.expect("page");
        let call = &transport.calls_to("/api/things/info")[0];
        assert_eq!(call.query.get("status"), Some("1"));
    }
}
