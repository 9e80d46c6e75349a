//! Server Configuration
//!
//! Layered from `config/default`, `config/local`, an optional explicit file
//! and `NUDGEWEALTH__SECTION__KEY` environment variables, in that order.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use nudgewealth_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

/// Where records live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the JSON collections (file backend)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Write demo data into empty collections at startup
    #[serde(default = "default_true")]
    pub seed_on_start: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: default_data_dir(),
            seed_on_start: true,
        }
    }
}

/// API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    #[serde(default = "default_true")]
    pub enable_tracing: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

impl ServerConfig {
    /// Load configuration from files and environment
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NUDGEWEALTH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("failed to read configuration")?;
        config
            .try_deserialize()
            .context("invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert!(config.storage.seed_on_start);
        assert_eq!(config.engine.nudge_threshold_percent, Decimal::from(80));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_socket_addr() {
        let settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 9090,
        };
        assert_eq!(settings.socket_addr().unwrap().port(), 9090);

        let bad = ServerSettings {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9999\n\n[storage]\nbackend = \"memory\"\n\n[engine]\nutc_offset_minutes = 330\n",
        )
        .unwrap();

        let config = ServerConfig::load(path.to_str()).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.engine.utc_offset_minutes, 330);
        assert_eq!(config.engine.currency_symbol, "₹");
    }
}
