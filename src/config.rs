//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::chart::ChartOptions;
use crate::input::{valid_amount_or_default, DEFAULT_HOLDINGS_AMOUNT};
use crate::series::SeriesStyle;
use crate::snapshot::{DEFAULT_PRICE_COLUMN, DEFAULT_TABLE, DEFAULT_TIMESTAMP_COLUMN};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub holdings: HoldingsConfig,

    #[serde(default)]
    pub series: SeriesStyle,

    #[serde(default)]
    pub chart: ChartOptions,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the price snapshot lives and how it is laid out
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,

    #[serde(default = "default_table")]
    pub table: String,

    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,

    #[serde(default = "default_price_column")]
    pub price_column: String,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data.sqlite3")
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_timestamp_column() -> String {
    DEFAULT_TIMESTAMP_COLUMN.to_string()
}

fn default_price_column() -> String {
    DEFAULT_PRICE_COLUMN.to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
            table: default_table(),
            timestamp_column: default_timestamp_column(),
            price_column: default_price_column(),
        }
    }
}

/// Holdings amount settings
#[derive(Debug, Clone, Deserialize)]
pub struct HoldingsConfig {
    /// Multiplier in effect before the user confirms one
    #[serde(default = "default_amount")]
    pub default_amount: f64,
}

fn default_amount() -> f64 {
    DEFAULT_HOLDINGS_AMOUNT
}

impl Default for HoldingsConfig {
    fn default() -> Self {
        Self {
            default_amount: default_amount(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    ///
    /// An invalid `[holdings] default_amount` is replaced by the built-in default.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        config.holdings.default_amount = valid_amount_or_default(config.holdings.default_amount);
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        // Try default config locations
        let config_paths = [
            dirs::config_dir().map(|p| p.join("holdings").join("config.toml")),
            Some(PathBuf::from("/etc/holdings/config.toml")),
            Some(PathBuf::from("./holdings.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("HOLDINGS_SNAPSHOT") {
            self.snapshot.path = PathBuf::from(path);
        }

        if let Some(host) = var("HOLDINGS_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("HOLDINGS_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid HOLDINGS_API_PORT: {}", port),
            }
        }

        if let Some(level) = var("HOLDINGS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("HOLDINGS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Holdings Configuration
#
# Environment variables override these settings:
# - HOLDINGS_SNAPSHOT
# - HOLDINGS_API_HOST
# - HOLDINGS_API_PORT
# - HOLDINGS_LOG_LEVEL
# - HOLDINGS_LOG_FORMAT

[snapshot]
# Serialized SQLite database with the price history
path = "data.sqlite3"

# Table and columns read by the price query
table = "prices"
timestamp_column = "date"
price_column = "price"

[holdings]
# Amount charted before one is entered
default_amount = 1.0

[series]
label = "Holdings value"
color = "#f2a900"

[chart]
width = 1400
height = 700
background = "#17171a"
line_width = 3.0
# 0 draws the line without point markers
point_radius = 0.0

[chart.x_axis]
display = true
# year or month
unit = "year"
grid_color = "#222531"
tick_color = "#858ca2"

[chart.y_axis]
display = true
grid_color = "#222531"
tick_color = "#858ca2"

[chart.tooltip]
background = "#222531"
raw_label = "Bitcoin price"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (empty allows none)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::TimeUnit;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.snapshot.table, "prices");
        assert_eq!(config.holdings.default_amount, 1.0);
        assert_eq!(config.series.color, "#f2a900");
        assert_eq!(config.chart.x_axis.unit, TimeUnit::Year);
        assert_eq!(config.chart.point_radius, 0.0);
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.snapshot.path, PathBuf::from("data.sqlite3"));
        assert_eq!(config.api.addr(), "0.0.0.0:8090");
        assert_eq!(config.series.label, "Holdings value");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HOLDINGS_SNAPSHOT", "/srv/btc.sqlite3"),
            ("HOLDINGS_API_PORT", "not-a-port"),
            ("HOLDINGS_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.snapshot.path, PathBuf::from("/srv/btc.sqlite3"));
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_default_amount_falls_back() {
        for amount in ["nan", "-0.5", "inf"] {
            let config = Config::parse(&format!("[holdings]\ndefault_amount = {}\n", amount)).unwrap();
            assert_eq!(config.holdings.default_amount, 1.0, "{} should fall back", amount);
        }

        let config = Config::parse("[holdings]\ndefault_amount = 0.25\n").unwrap();
        assert_eq!(config.holdings.default_amount, 0.25);
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("holdings.toml");
        std::fs::write(&path, "[api]\nport = \"eighty\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("holdings.toml"));
    }
}
