//! Configuration management for the stock dashboard engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SDB_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Analytics service configuration
    pub api: ApiConfig,

    /// Periodic snapshot refresh configuration
    pub refresh: RefreshConfig,

    /// Calculation narrative configuration
    pub narrative: NarrativeConfig,

    /// CSV export configuration
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Analytics service base URL, including the `/api` prefix
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    /// Seconds between periodic snapshot refreshes
    pub interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NarrativeConfig {
    /// Estimated cost-of-goods ratio used by the turnover narrative
    pub cogs_ratio: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Directory the headless runner writes CSV exports into
    pub directory: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("SDB_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", "http://127.0.0.1:5000/api")?
            .set_default("api.timeout_secs", 30)?
            .set_default("refresh.interval_secs", 60)?
            .set_default("narrative.cogs_ratio", shared::detail::DEFAULT_COGS_RATIO)?
            .set_default("export.directory", "exports")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SDB_ prefix)
            .add_source(
                Environment::with_prefix("SDB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        shared::validate_cogs_ratio(config.narrative.cogs_ratio)
            .map_err(|msg| ConfigError::Message(msg.to_string()))?;
        shared::validate_refresh_interval(config.refresh.interval_secs)
            .map_err(|msg| ConfigError::Message(msg.to_string()))?;
        Ok(config)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            cogs_ratio: shared::detail::DEFAULT_COGS_RATIO,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: "exports".to_string(),
        }
    }
}
