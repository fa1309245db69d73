use std::sync::Arc;

use tracing::debug;

use super::Session;
use crate::constants::DEFAULT_BUFFER_LENGTH;
use crate::Connector;
use crate::Result;
use crate::SessionConfig;
use crate::Watcher;
use crate::ZkError;
use crate::ZkResult;

/// Configurable builder for [`Session`] instances
///
/// # Typical Usage Flow
/// 1. Create with `SessionBuilder::new(connector)`
/// 2. Chain configuration methods
/// 3. Finalize with `.build()` (registered, not yet initialised) or
///    `.connect()` (registered and initialised from the configuration)
///
/// # Default Configuration
/// - Buffer length: 1024 bytes
/// - Read watches: enabled
/// - Watcher: none
pub struct SessionBuilder {
    connector: Arc<dyn Connector>,
    config: SessionConfig,
    watcher: Option<Watcher>,
}

impl SessionBuilder {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            config: SessionConfig::default(),
            watcher: None,
        }
    }

    /// Set exchange buffer capacity in bytes (default: 1024)
    pub fn buffer_length(
        mut self,
        buffer_length: usize,
    ) -> Self {
        self.config.exchange.buffer_length = buffer_length;
        self
    }

    /// Enable/disable one-shot watches on reads (default: enabled)
    pub fn watch_reads(
        mut self,
        enable: bool,
    ) -> Self {
        self.config.exchange.watch_reads = enable;
        self
    }

    /// Install the session callback before the session is registered, so no
    /// notification can arrive ahead of it.
    pub fn watcher(
        mut self,
        watcher: Watcher,
    ) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Completely replaces the configuration, including settings made
    /// through [`buffer_length`](SessionBuilder::buffer_length) and
    /// [`watch_reads`](SessionBuilder::watch_reads).
    pub fn config(
        mut self,
        config: &SessionConfig,
    ) -> Self {
        self.config = config.clone();
        self
    }

    /// Registers the session. The native handle is opened later by
    /// [`Session::init`].
    pub fn build(self) -> ZkResult<Session> {
        self.config.exchange.validate().map_err(|e| {
            debug!(error = %e, "rejected exchange configuration");
            ZkError::bad_arguments()
        })?;
        Ok(Session::register(
            self.connector,
            self.watcher,
            self.config.exchange.buffer_length,
            self.config.exchange.watch_reads,
        ))
    }

    /// Validates the configuration, registers the session and initialises it
    /// with the configured hosts and receive timeout.
    ///
    /// A session whose initialisation fails is dropped, which unregisters it.
    pub fn connect(self) -> Result<Session> {
        let config = self.config.clone().validate()?;
        let session = self.build()?;
        session.init(&config.connection.hosts, config.connection.recv_timeout())?;
        Ok(session)
    }
}

impl Session {
    /// Registers a session with default settings against `connector`.
    pub fn with_connector(connector: Arc<dyn Connector>) -> Session {
        Session::register(connector, None, DEFAULT_BUFFER_LENGTH, true)
    }

    pub fn builder(connector: Arc<dyn Connector>) -> SessionBuilder {
        SessionBuilder::new(connector)
    }
}

#[cfg(feature = "native")]
impl Session {
    /// Registers a session with default settings, backed by the native client.
    pub fn new() -> Session {
        Session::with_connector(Arc::new(crate::ZooKeeperConnector::new()))
    }

    /// Builds, registers and initialises a native session.
    ///
    /// ```ignore
    /// let session = Session::connect(&SessionConfig::new()?)?;
    /// ```
    pub fn connect(config: &SessionConfig) -> Result<Session> {
        SessionBuilder::new(Arc::new(crate::ZooKeeperConnector::new()))
            .config(config)
            .connect()
    }
}

#[cfg(feature = "native")]
impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}
