//! # reg-config
//!
//! Layered configuration loading for the registrar service using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`REGISTRAR_*` prefix, `__` as separator)
//! 2. Project-level `registrar.toml`
//! 3. User-level `~/.config/registrar/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `REGISTRAR_SERVER__LISTEN_ADDR` -> `server.listen_addr`,
//! `REGISTRAR_STORAGE__BACKEND` -> `storage.backend`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use reg_config::RegistrarConfig;
//!
//! let config = RegistrarConfig::load_with_dotenv().expect("config");
//! config.validate().expect("valid config");
//! println!("listening on {}", config.server.listen_addr);
//! ```

mod database;
mod error;
mod s3;
mod server;
mod storage;

pub use database::{DatabaseConfig, IN_MEMORY_PATH};
pub use error::ConfigError;
pub use s3::S3Config;
pub use server::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "registrar.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "REGISTRAR_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegistrarConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub s3: S3Config,
}

impl RegistrarConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source is malformed or a value has
    /// the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unparseable listen address
    /// or an empty upload prefix, and `ConfigError::NotConfigured` when the
    /// `s3` backend is selected without bucket credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;

        if self.storage.upload_prefix().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.upload_dir".into(),
                reason: "must name a directory".into(),
            });
        }

        if self.storage.backend == StorageBackend::S3 && !self.s3.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "s3".into(),
            });
        }

        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("registrar").join("config.toml"))
    }
}
