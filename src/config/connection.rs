use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Where to connect and how long the session may stay silent
///
/// ```toml
/// [connection]
/// hosts = "zk1:2181,zk2:2181,zk3:2181"
/// recv_timeout_in_ms = 10000
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConnectionConfig {
    /// Comma-separated `host:port` list, handed to the native client as is
    #[serde(default = "default_hosts")]
    pub hosts: String,

    /// Session receive timeout in milliseconds, passed through unchanged
    #[serde(default = "default_recv_timeout_in_ms")]
    pub recv_timeout_in_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            recv_timeout_in_ms: default_recv_timeout_in_ms(),
        }
    }
}

impl ConnectionConfig {
    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_in_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hosts.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "connection.hosts must not be empty".into(),
            )));
        }

        if self.recv_timeout_in_ms == 0 || self.recv_timeout_in_ms > i32::MAX as u64 {
            return Err(Error::Config(ConfigError::Message(format!(
                "connection.recv_timeout_in_ms must be between 1 and {}, got {}",
                i32::MAX,
                self.recv_timeout_in_ms
            ))));
        }

        Ok(())
    }
}

fn default_hosts() -> String {
    "localhost:2181".to_string()
}

fn default_recv_timeout_in_ms() -> u64 {
    10_000
}
