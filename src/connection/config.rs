//! Console Configuration
//!
//! Connection configuration data structures and TOML persistence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::domain::device::DeviceIdentity;
use crate::error::Result;
use crate::helpers::{decrypt, encrypt, get_or_create_config_dir};

/// Cloud account used for token acquisition
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountConfig {
    pub username: String,
    /// Password (encrypted at rest)
    pub password: String,
}

/// API endpoint roots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Device-management API root
    pub base_url: String,
    /// Legacy admin host for the form-encoded control endpoint
    pub legacy_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://hkapi.tchjjc.com".to_string(),
            legacy_base_url: "http://hk.tchjjc.com".to_string(),
        }
    }
}

/// Full console configuration
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub account: AccountConfig,
    pub device: DeviceIdentity,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Get or create the configuration file path
fn get_config_path() -> Result<PathBuf> {
    let config_dir = get_or_create_config_dir()?;
    let path = config_dir.join("console.toml");

    #[cfg(debug_assertions)]
    info!("Config file: {}", path.display());

    Ok(path)
}

/// Load the console configuration from disk.
///
/// A missing or empty file yields the default configuration.
pub fn load_config() -> Result<ConsoleConfig> {
    let path = get_config_path()?;
    if !path.exists() {
        return Ok(ConsoleConfig::default());
    }

    let value = fs::read_to_string(&path)?;
    if value.trim().is_empty() {
        return Ok(ConsoleConfig::default());
    }

    let mut config: ConsoleConfig = toml::from_str(&value)?;

    // Decrypt sensitive fields; tolerate plaintext from hand-edited files
    if !config.account.password.is_empty() {
        config.account.password =
            decrypt(&config.account.password).unwrap_or_else(|_| config.account.password.clone());
    }

    Ok(config)
}

/// Save the console configuration to disk
pub fn save_config(mut config: ConsoleConfig) -> Result<()> {
    if !config.account.password.is_empty() {
        config.account.password = encrypt(&config.account.password)?;
    }

    let path = get_config_path()?;
    let content = toml::to_string_pretty(&config)?;
    fs::write(&path, content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_roots() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api.base_url, "http://hkapi.tchjjc.com");
        assert_eq!(config.api.legacy_base_url, "http://hk.tchjjc.com");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ConsoleConfig {
            account: AccountConfig {
                username: "YH001".to_string(),
                password: "secret".to_string(),
            },
            device: DeviceIdentity {
                product_key: "a10VqNZhdXD".to_string(),
                device_name: "H4G001".to_string(),
            },
            api: ApiConfig::default(),
        };
        let text = toml::to_string_pretty(&config).expect("serialize");
        let back: ConsoleConfig = toml::from_str(&text).expect("parse");
        assert_eq!(back, config);
    }

    #[test]
    fn test_missing_api_section_uses_default() {
        let text = r#"
            [account]
            username = "u"
            password = ""

            [device]
            product_key = "pk"
            device_name = "dev"
        "#;
        let config: ConsoleConfig = toml::from_str(text).expect("parse");
        assert_eq!(config.api, ApiConfig::default());
    }
}
