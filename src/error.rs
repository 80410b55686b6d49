//! Error types for Thing Console
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// Missing required local input (e.g. unset property identifier)
    #[snafu(display("Validation: {message}"))]
    Validation { message: String },

    /// Network or connection failure while talking to the cloud API
    #[snafu(display("Transport error: {source}"))]
    Transport { source: reqwest::Error },

    /// Non-success response code from the cloud API
    #[snafu(display("Server error (code {code}): {}", message.as_deref().unwrap_or("no message")))]
    Server { code: i64, message: Option<String> },

    /// Response body was neither an object nor an array where one was expected
    #[snafu(display("Malformed payload: {message}"))]
    MalformedPayload { message: String },

    /// IO error (file operations, etc.)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },
}

impl Error {
    /// Message suitable for a user-facing notice, with a generic fallback
    /// when the server supplied none.
    pub fn notice_text(&self, fallback: &str) -> String {
        match self {
            Error::Server {
                message: Some(msg), ..
            } if !msg.is_empty() => msg.clone(),
            Error::Validation { message } => message.clone(),
            Error::Transport { .. } => "Network request failed".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::Transport { source }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
