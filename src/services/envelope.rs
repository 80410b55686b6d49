//! Response Envelope Decoder
//!
//! The upstream API wraps every response in an envelope
//! `{code, message?, data?, items?, total?, token?, expiresIn?}` but is not
//! consistent about where the payload lives. Three success shapes occur in
//! the wild and every fetcher must route its response through this decoder
//! instead of reading `data` directly:
//!
//! 1. `{code, data: X}`: payload under `data`
//! 2. `{code, items: [...]}`: payload is the item list
//! 3. `{code, ...fields}`: payload is the object minus envelope fields

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Envelope fields stripped when decoding the flat shape
const ENVELOPE_FIELDS: [&str; 6] = [
    "code",
    "message",
    "localizedMsg",
    "token",
    "expiresIn",
    "total",
];

/// Canonical payload, one variant per accepted envelope shape
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Shape 1: the `data` value, verbatim
    Data(Value),
    /// Shape 2: the `items` list (non-array `items` collapses to empty)
    Items(Vec<Value>),
    /// Shape 3: remaining fields after stripping the envelope
    Flat(Map<String, Value>),
}

impl Payload {
    /// The payload as a single JSON value (Items re-wraps as an array)
    pub fn into_value(self) -> Value {
        match self {
            Payload::Data(v) => v,
            Payload::Items(items) => Value::Array(items),
            Payload::Flat(map) => Value::Object(map),
        }
    }

    /// The payload's item list, for endpoints that return sequences.
    ///
    /// Accepts a bare array under `data`, the `items` variant, and an object
    /// carrying an `items` array; anything else is an empty list.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Payload::Items(items) => items,
            Payload::Data(Value::Array(items)) => items,
            Payload::Data(Value::Object(map)) | Payload::Flat(map) => {
                match map.get("items").cloned() {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }
}

/// Decode a response body into its canonical payload.
///
/// Returns `None` when nothing remains after stripping envelope fields.
pub fn decode(body: &Value) -> Option<Payload> {
    let map = body.as_object()?;

    if let Some(data) = map.get("data") {
        return Some(Payload::Data(data.clone()));
    }

    if let Some(items) = map.get("items") {
        let items = match items {
            Value::Array(items) => items.clone(),
            _ => Vec::new(),
        };
        return Some(Payload::Items(items));
    }

    let rest: Map<String, Value> = map
        .iter()
        .filter(|(key, _)| !ENVELOPE_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if rest.is_empty() {
        None
    } else {
        Some(Payload::Flat(rest))
    }
}

/// Endpoint families with distinct success-code conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFamily {
    /// Token acquisition: success is exactly 200
    Token,
    /// Thing management: some deployments answer 0, others 200
    Thing,
}

impl EndpointFamily {
    pub fn is_success(&self, code: i64) -> bool {
        match self {
            EndpointFamily::Token => code == 200,
            EndpointFamily::Thing => code == 0 || code == 200,
        }
    }
}

/// Check the envelope's response code against the endpoint family.
///
/// A missing or non-integer `code` is a malformed payload; a non-success
/// code carries the server's human-readable message when present.
pub fn check_code(body: &Value, family: EndpointFamily) -> Result<()> {
    let code = body
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::MalformedPayload {
            message: "Response envelope has no code field".to_string(),
        })?;

    if family.is_success(code) {
        return Ok(());
    }

    let message = body
        .get("message")
        .or_else(|| body.get("localizedMsg"))
        .and_then(Value::as_str)
        .map(str::to_string);
    Err(Error::Server { code, message })
}

/// The envelope's declared total, when present
pub fn declared_total(body: &Value) -> Option<i64> {
    body.get("total").and_then(Value::as_i64)
}
