//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/utility-billing/config.toml`,
//! overridable with `BILLING_CONFIG`). Every field has a default, so a
//! partial file or no file at all is valid.
//!
//! ```toml
//! [server]
//! api_host = "0.0.0.0"
//! api_port = 8080
//!
//! [database]
//! url = "sqlite://billing.db?mode=rwc"
//!
//! [logging]
//! level = "info"
//! format = "fmt"
//!
//! [billing]
//! default_rate = "0.18"
//! high_consumption_threshold = "10000"
//! default_average_window = 3
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::errors::InfraError;

/// Environment variable pointing at the config file
pub const CONFIG_ENV_VAR: &str = "BILLING_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://billing.db?mode=rwc".to_string(),
        }
    }
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `utility_billing=debug`
    pub level: String,
    /// `fmt` or `json`
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "fmt".to_string(),
        }
    }
}

/// Billing engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Rate per unit when no tariff matches the meter
    pub default_rate: Decimal,
    /// Consumption above this raises a high-consumption warning
    pub high_consumption_threshold: Decimal,
    /// Readings averaged for estimates when the caller gives no window
    pub default_average_window: u32,
    pub default_currency: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_rate: Decimal::new(18, 2),
            high_consumption_threshold: Decimal::from(10_000),
            default_average_window: 3,
            default_currency: "USD".to_string(),
        }
    }
}

impl AppConfig {
    /// Read the config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        toml::from_str(raw).map_err(|e| InfraError::Config(e.to_string()))
    }

    /// Write the config as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), InfraError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(|e| InfraError::Config(e.to_string()))?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

/// `BILLING_CONFIG` if set, else `~/.config/utility-billing/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("utility-billing")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.billing.default_rate, dec!(0.18));
        assert_eq!(cfg.billing.high_consumption_threshold, dec!(10000));
        assert_eq!(cfg.billing.default_average_window, 3);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9100

            [billing]
            default_rate = "0.21"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.api_port, 9100);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.billing.default_rate, dec!(0.21));
        assert_eq!(cfg.billing.default_average_window, 3);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = AppConfig::from_toml("[server\napi_port = ").unwrap_err();
        assert!(matches!(err, InfraError::Config(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("utility-billing-missing/config.toml");
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.database.url, DatabaseSettings::default().url);
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("utility-billing-cfg-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.billing.default_currency = "EUR".to_string();
        cfg.server.shutdown_timeout = 5;

        cfg.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        assert_eq!(loaded.billing, cfg.billing);
        assert_eq!(loaded.server.shutdown_timeout, 5);
        let _ = std::fs::remove_dir_all(dir);
    }
}
