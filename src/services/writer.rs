//! Property Writer
//!
//! Single and batched property writes. A batch selects every writable
//! template property with a defined value-map entry and issues one write per
//! property through a bounded-concurrency queue, so the upstream API never
//! sees a burst. The aggregate notice counts issued writes, not confirmed
//! successes; each write's own failure notice is queued independently.

use crossbeam_channel::Sender;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::constants::WRITE_CONCURRENCY;
use crate::domain::template::PropertyTemplate;
use crate::error::Result;
use crate::services::device::DeviceApi;
use crate::services::events::ServiceEvent;

/// Outcome of a batch submit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Writes issued (writable properties with a defined value)
    pub attempted: usize,
    /// Writes confirmed by the server
    pub succeeded: usize,
    /// Writes refused or lost in transit
    pub failed: usize,
}

/// Select the (identifier, value) pairs a batch submit will write:
/// every template property whose access mode includes write and whose value
/// map entry is defined, in template order.
pub fn select_writable(
    template: &PropertyTemplate,
    values: &HashMap<String, String>,
) -> Vec<(String, String)> {
    template
        .properties
        .iter()
        .filter(|spec| spec.access_mode.writable())
        .filter_map(|spec| {
            values
                .get(&spec.identifier)
                .map(|value| (spec.identifier.clone(), value.clone()))
        })
        .collect()
}

pub struct PropertyWriter {
    api: Arc<DeviceApi>,
    events: Sender<ServiceEvent>,
}

impl PropertyWriter {
    pub fn new(api: Arc<DeviceApi>, events: Sender<ServiceEvent>) -> Self {
        Self { api, events }
    }

    /// Write one property; emits the success or failure notice itself.
    pub async fn write_one(&self, identifier: &str, value: &str) -> Result<()> {
        match self.api.write_property(identifier, value).await {
            Ok(()) => {
                let _ = self.events.send(ServiceEvent::success("Property set"));
                Ok(())
            }
            Err(err) => {
                warn!(identifier, %err, "Property write failed");
                let _ = self
                    .events
                    .send(ServiceEvent::error(err.notice_text("Set property failed")));
                Err(err)
            }
        }
    }

    /// Submit every writable property with a defined value.
    ///
    /// The aggregate notice fires once all issued writes have completed,
    /// regardless of their individual outcomes.
    pub async fn write_all(
        &self,
        template: &PropertyTemplate,
        values: &HashMap<String, String>,
    ) -> BatchReport {
        let has_writable = template
            .properties
            .iter()
            .any(|spec| spec.access_mode.writable());
        if !has_writable {
            let _ = self
                .events
                .send(ServiceEvent::info("No writable properties"));
            return BatchReport::default();
        }

        let selected = select_writable(template, values);
        if selected.is_empty() {
            let _ = self
                .events
                .send(ServiceEvent::info("No property values to submit"));
            return BatchReport::default();
        }

        let attempted = selected.len();
        info!(attempted, "Batch property submit");

        let results: Vec<bool> = stream::iter(selected)
            .map(|(identifier, value)| async move {
                self.write_one(&identifier, &value).await.is_ok()
            })
            .buffer_unordered(WRITE_CONCURRENCY)
            .collect()
            .await;

        let succeeded = results.iter().filter(|ok| **ok).count();
        let report = BatchReport {
            attempted,
            succeeded,
            failed: attempted - succeeded,
        };

        let _ = self.events.send(ServiceEvent::success(format!(
            "Batch submit complete, {attempted} properties"
        )));

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{AccountConfig, Credential};
    use crate::domain::device::DeviceIdentity;
    use crate::services::events::NoticeLevel;
    use crate::services::token::TokenManager;
    use crate::services::transport::testing::RecordingTransport;
    use crossbeam_channel::Receiver;
    use serde_json::{Value, json};

    fn template(specs: Value) -> PropertyTemplate {
        PropertyTemplate::from_payload(specs)
    }

    fn writer(transport: Arc<RecordingTransport>) -> (PropertyWriter, Receiver<ServiceEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let tokens = Arc::new(TokenManager::new(
            transport.clone(),
            "http://api.test",
            AccountConfig::default(),
            tx.clone(),
        ));
        tokens.set_cached(Credential::issued_now("tok-live", 3600));
        let api = Arc::new(DeviceApi::new(
            transport,
            "http://api.test",
            DeviceIdentity {
                product_key: "pk".to_string(),
                device_name: "dev".to_string(),
            },
            tokens,
        ));
        (PropertyWriter::new(api, tx), rx)
    }

    fn notices(rx: &Receiver<ServiceEvent>) -> Vec<(NoticeLevel, String)> {
        rx.try_iter()
            .filter_map(|event| match event {
                ServiceEvent::Notice { level, message } => Some((level, message)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_select_writable_in_template_order() {
        let template = template(json!({"properties": [
            {"identifier": "a", "accessMode": "rw"},
            {"identifier": "b", "accessMode": "r"},
            {"identifier": "c", "accessMode": "rw"},
            {"identifier": "d", "accessMode": "rw"}
        ]}));
        let values = HashMap::from([
            ("c".to_string(), "3".to_string()),
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        // b is read-only, d has no value
        assert_eq!(
            select_writable(&template, &values),
            vec![
                ("a".to_string(), "1".to_string()),
                ("c".to_string(), "3".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_write_all_reports_and_notices() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route("/api/thing/properties/set", json!({"code": 200}));
        let (writer, rx) = writer(transport.clone());

        let template = template(json!({"properties": [
            {"identifier": "a", "accessMode": "rw"},
            {"identifier": "b", "accessMode": "rw"}
        ]}));
        let values = HashMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "0".to_string()),
        ]);

        let report = writer.write_all(&template, &values).await;
        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 2);
        assert_eq!(transport.calls_to("/api/thing/properties/set").len(), 2);

        let all = notices(&rx);
        let aggregate = all.last().expect("aggregate notice");
        assert_eq!(aggregate.0, NoticeLevel::Success);
        assert!(aggregate.1.contains("2 properties"));
    }

    #[tokio::test]
    async fn test_write_all_aggregate_counts_issued_not_confirmed() {
        let transport = Arc::new(RecordingTransport::default());
        transport.route(
            "/api/thing/properties/set",
            json!({"code": 500, "message": "refused"}),
        );
        let (writer, rx) = writer(transport);

        let template = template(json!({"properties": [
            {"identifier": "a", "accessMode": "rw"}
        ]}));
        let values = HashMap::from([("a".to_string(), "1".to_string())]);

        let report = writer.write_all(&template, &values).await;
        assert_eq!(report.attempted, 1);
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 1);

        // Individual failure notice plus the aggregate completion notice
        let all = notices(&rx);
        assert!(all.iter().any(|(level, msg)| *level == NoticeLevel::Error
            && msg == "refused"));
        assert!(all.iter().any(|(level, msg)| *level == NoticeLevel::Success
            && msg.contains("1 properties")));
    }

    #[tokio::test]
    async fn test_write_all_nothing_writable() {
        let transport = Arc::new(RecordingTransport::default());
        let (writer, rx) = writer(transport.clone());

        let template = template(json!({"properties": [
            {"identifier": "a", "accessMode": "r"}
        ]}));
        let report = writer.write_all(&template, &HashMap::new()).await;
        assert_eq!(report, BatchReport::default());
        assert!(transport.calls().is_empty());

        let all = notices(&rx);
        assert_eq!(all[0].1, "No writable properties");
    }

    #[tokio::test]
    async fn test_write_all_no_defined_values() {
        let transport = Arc::new(RecordingTransport::default());
        let (writer, rx) = writer(transport.clone());

        let template = template(json!({"properties": [
            {"identifier": "a", "accessMode": "rw"}
        ]}));
        let report = writer.write_all(&template, &HashMap::new()).await;
        assert_eq!(report, BatchReport::default());
        assert!(transport.calls().is_empty());

        let all = notices(&rx);
        assert_eq!(all[0].1, "No property values to submit");
    }
}
