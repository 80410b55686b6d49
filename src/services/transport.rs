//! API Transport
//!
//! Thin seam over the HTTP client. Every cloud endpoint is a POST; the
//! device-management family carries its parameters in the query string with a
//! JSON content type, the legacy control endpoint posts a form-urlencoded
//! body. The trait exists so flow logic can be exercised against a recorded
//! transport in tests.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};

/// Query parameter list with the omit-empty rule applied at build time.
///
/// Parameters whose value is `None` or an empty string are omitted entirely
/// rather than serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter; empty values are dropped.
    pub fn push(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    /// Append an optional parameter; `None` is dropped.
    pub fn push_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Value of a parameter, if present (test and logging convenience)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Abstraction over the HTTP layer
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// POST to `url` with query parameters; returns the parsed JSON body.
    async fn post_query(&self, url: &str, query: &Query) -> Result<Value>;

    /// POST a form-urlencoded body to `url`; returns the HTTP status code.
    async fn post_form(&self, url: &str, form: &Query) -> Result<u16>;
}

/// Production transport backed by reqwest
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn post_query(&self, url: &str, query: &Query) -> Result<Value> {
        debug!(url, params = query.pairs().len(), "POST query");
        let response = self
            .client
            .post(url)
            .query(query.pairs())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let body: Value = response.json().await.map_err(|_| Error::MalformedPayload {
            message: format!("Non-JSON response from {url}"),
        })?;
        Ok(body)
    }

    async fn post_form(&self, url: &str, form: &Query) -> Result<u16> {
        debug!(url, "POST form");
        let response = self.client.post(url).form(form.pairs()).send().await?;
        Ok(response.status().as_u16())
    }
}
