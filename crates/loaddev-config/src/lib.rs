//! # loaddev-config
//!
//! Layered configuration loading for LoadDev using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LOADDEV_*` prefix, `__` as separator)
//! 2. Project-level `loaddev.toml`
//! 3. User-level `~/.config/loaddev/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LOADDEV_DATABASE__PATH` -> `database.path`,
//! `LOADDEV_GATEWAY__PORT` -> `gateway.port`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use loaddev_config::LoadDevConfig;
//!
//! let config = LoadDevConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind_address());
//! ```

mod database;
mod error;
mod gateway;
mod server;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use gateway::{GatewayConfig, RouteConfig, SERVICE_PREFIXES};
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOCAL_CONFIG_FILE: &str = "loaddev.toml";
const MASK: &str = "********";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoadDevConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl LoadDevConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the result is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load with an explicit TOML file layered above the standard files.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or the result is invalid.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config: Self = Self::figment_with_file(Some(path)).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        Self::figment_with_file(None)
    }

    fn figment_with_file(extra: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit --config file
        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("LOADDEV_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("loaddev").join("config.toml"))
    }

    /// Reject values that would only fail later at bind or forward time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "must be non-zero"));
        }
        if self.gateway.port == 0 {
            return Err(invalid("gateway.port", "must be non-zero"));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(invalid("gateway.timeout_secs", "must be at least 1"));
        }
        if self.database.path.is_empty() && !self.database.is_remote() {
            return Err(invalid("database.path", "must not be empty"));
        }
        for (i, route) in self.gateway.routes.iter().enumerate() {
            if !route.prefix.starts_with('/') {
                return Err(invalid(
                    &format!("gateway.routes[{i}].prefix"),
                    "must start with '/'",
                ));
            }
            if !(route.upstream.starts_with("http://") || route.upstream.starts_with("https://"))
            {
                return Err(invalid(
                    &format!("gateway.routes[{i}].upstream"),
                    "must be an http:// or https:// URL",
                ));
            }
        }
        Ok(())
    }

    /// Copy with secrets replaced, for display.
    #[must_use]
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        if !copy.database.auth_token.is_empty() {
            copy.database.auth_token = MASK.into();
        }
        copy
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LoadDevConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.database.is_remote());
        assert_eq!(config.database.path, "loaddev.db");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.gateway.routes.len(), SERVICE_PREFIXES.len());
    }

    #[test]
    fn masked_hides_token() {
        let mut config = LoadDevConfig::default();
        config.database.auth_token = "secret".into();
        assert_eq!(config.masked().database.auth_token, MASK);
        assert_eq!(config.database.auth_token, "secret");
    }

    #[test]
    fn zero_gateway_timeout_rejected() {
        let mut config = LoadDevConfig::default();
        config.gateway.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gateway.timeout_secs"));
    }

    #[test]
    fn bad_route_rejected() {
        let mut config = LoadDevConfig::default();
        config.gateway.routes.push(RouteConfig {
            prefix: "rifles".into(),
            upstream: "http://localhost:1".into(),
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("prefix"));
    }
}
