//! # grant-config
//!
//! Layered configuration loading for the grant tracker using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GRANTS_*` prefix, `__` as separator)
//! 2. Project-level `./grants.toml`
//! 3. User-level `~/.config/grant-tracker/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `GRANTS_SERVER__PORT` -> `server.port`,
//! `GRANTS_UPLOADS__DIR` -> `uploads.dir`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use grant_config::GrantConfig;
//!
//! let config = GrantConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//! println!("listening on {}", config.server.bind_address());
//! ```

mod database;
mod error;
mod server;
mod uploads;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use server::ServerConfig;
pub use uploads::{DEFAULT_MAX_FILE_BYTES, UploadsConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "grants.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "GRANTS_";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct GrantConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
}

impl GrantConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`]. A missing `.env` is not an error.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or layer
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values the server cannot start with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for port 0, an empty database path
    /// or a zero upload limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be non-zero"));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host", "must not be empty"));
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("database.path", "must not be empty"));
        }
        if self.uploads.max_file_bytes == 0 {
            return Err(ConfigError::invalid(
                "uploads.max_file_bytes",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("grant-tracker").join("config.toml"))
    }
}
