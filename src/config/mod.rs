//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SATPLEDGE_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use satpledge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod gateway;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use gateway::GatewayConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment gateway configuration (Lightning Charge)
    pub gateway: GatewayConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SATPLEDGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SATPLEDGE__DATABASE__URL=...` -> `database.url = ...`
    /// - `SATPLEDGE__GATEWAY__API_TOKEN=...` -> `gateway.api_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required environment variables are missing
    /// or cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SATPLEDGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.gateway.validate()?;
        Ok(())
    }
}
