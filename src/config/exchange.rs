use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_BUFFER_LENGTH;
use crate::Error;
use crate::Result;

/// Exchange buffer sizing and read-watch policy
///
/// ```toml
/// [exchange]
/// buffer_length = 4096  # payloads beyond this are truncated silently
/// watch_reads = true
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExchangeConfig {
    /// Capacity in bytes of the buffer used for get payloads and created
    /// paths.
    ///
    /// Default: 1024
    #[serde(default = "default_buffer_length")]
    pub buffer_length: usize,

    /// Whether reads (`get`, `exists`, `get_children`) leave a one-shot watch
    /// behind, so the next change of the node reaches the session callback.
    ///
    /// Default: true
    #[serde(default = "default_watch_reads")]
    pub watch_reads: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            buffer_length: default_buffer_length(),
            watch_reads: default_watch_reads(),
        }
    }
}

impl ExchangeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.buffer_length == 0 || self.buffer_length > i32::MAX as usize {
            return Err(Error::Config(ConfigError::Message(format!(
                "exchange.buffer_length must be between 1 and {}, got {}",
                i32::MAX,
                self.buffer_length
            ))));
        }
        Ok(())
    }
}

fn default_buffer_length() -> usize {
    DEFAULT_BUFFER_LENGTH
}

fn default_watch_reads() -> bool {
    true
}
