//! Configuration management for sessions.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support
//! - Environment variable overrides
//! - Section-wise validation
mod connection;
mod exchange;
pub use connection::*;
pub use exchange::*;

use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Prefix of environment variables that override settings,
/// e.g. `ZOOLINK__EXCHANGE__BUFFER_LENGTH=4096`
pub const ENV_PREFIX: &str = "ZOOLINK";

/// Session configuration
///
/// Sources are merged in priority order:
/// 1. Default values from code
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Service endpoints and session timeout
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Exchange buffer sizing and read-watch policy
    #[serde(default)]
    pub exchange: ExchangeConfig,
}

impl SessionConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// # Note
    /// Validation is deferred so that `with_override_config()` can still be
    /// applied. Call `validate()` before use.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("CONFIG_PATH", "config/zoolink.toml");
    /// std::env::set_var("ZOOLINK__CONNECTION__HOSTS", "zk1:2181,zk2:2181");
    /// let cfg = SessionConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies overrides from a file, then environment variables again, on
    /// top of the current values. Does not validate.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates every section and returns the validated configuration.
    pub fn validate(self) -> Result<Self> {
        self.connection.validate()?;
        self.exchange.validate()?;
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
