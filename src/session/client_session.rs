use std::fmt;
use std::mem;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::buffer::c_path;
use crate::buffer::payload_arg;
use crate::constants::ANY_VERSION;
use crate::constants::ZNONODE;
use crate::constants::ZOK;
use crate::metrics::OPERATION_ERRORS;
use crate::utils::OpTimer;
use crate::Connector;
use crate::CreateFlags;
use crate::ErrorKind;
use crate::ExchangeBuffer;
use crate::NativeHandle;
use crate::NodeStat;
use crate::SessionContext;
use crate::SessionId;
use crate::SessionRegistry;
use crate::StateKind;
use crate::Watcher;
use crate::ZkError;
use crate::ZkResult;

enum HandleState {
    Uninitialized,
    Open(Box<dyn NativeHandle>),
    Closed,
}

impl HandleState {
    fn as_str(&self) -> &'static str {
        match self {
            HandleState::Uninitialized => "uninitialized",
            HandleState::Open(_) => "open",
            HandleState::Closed => "closed",
        }
    }
}

/// One connection to the coordination service
///
/// Registered for watch dispatch from construction until [`close`] (or drop).
/// Operations block the calling thread for one round trip and may be issued
/// from several threads; `close` waits for operations in flight.
///
/// | Call            | Uninitialized    | Open            | Closed        |
/// |-----------------|------------------|-----------------|---------------|
/// | `init`          | opens handle     | `InvalidState`  | `InvalidState`|
/// | node operations | `InvalidState`   | native result   | `InvalidState`|
/// | `state`         | `Unknown`        | native state    | `Unknown`     |
/// | `close`         | `Ok`             | native close rc | `InvalidState`|
///
/// [`close`]: Session::close
pub struct Session {
    id: SessionId,
    context: Arc<SessionContext>,
    registry: Arc<SessionRegistry>,
    connector: Arc<dyn Connector>,
    buffer_length: AtomicUsize,
    watch_reads: bool,
    handle: RwLock<HandleState>,
}

impl Session {
    pub(super) fn register(
        connector: Arc<dyn Connector>,
        watcher: Option<Watcher>,
        buffer_length: usize,
        watch_reads: bool,
    ) -> Session {
        let context = Arc::new(match watcher {
            Some(watcher) => SessionContext::with_watcher(watcher),
            None => SessionContext::new(),
        });
        let registry = connector.dispatcher().registry().clone();
        let id = registry.register(context.clone());
        debug!(session_id = %id, buffer_length, watch_reads, "session created");

        Session {
            id,
            context,
            registry,
            connector,
            buffer_length: AtomicUsize::new(buffer_length),
            watch_reads,
            handle: RwLock::new(HandleState::Uninitialized),
        }
    }

    /// Registry identity, also the context carried by this session's
    /// notifications.
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn buffer_length(&self) -> usize {
        self.buffer_length.load(Ordering::Relaxed)
    }

    /// Changes the exchange buffer capacity used by later calls.
    ///
    /// Payloads longer than this come back truncated, without error.
    pub fn set_buffer_length(
        &self,
        buffer_length: usize,
    ) -> ZkResult<()> {
        if buffer_length == 0 || buffer_length > i32::MAX as usize {
            return Err(ZkError::bad_arguments());
        }
        self.buffer_length.store(buffer_length, Ordering::Relaxed);
        Ok(())
    }

    /// Whether reads leave a one-shot watch behind.
    pub fn watch_reads(&self) -> bool {
        self.watch_reads
    }

    /// Installs or replaces the callback for this session's notifications.
    pub fn set_watcher(
        &self,
        watcher: Watcher,
    ) {
        self.context.set_watcher(watcher);
    }

    pub fn clear_watcher(&self) {
        self.context.clear_watcher();
    }

    pub fn is_initialized(&self) -> bool {
        matches!(*self.handle.read(), HandleState::Open(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(*self.handle.read(), HandleState::Closed)
    }

    /// Opens the native handle.
    ///
    /// Returns once the handle exists. Connection establishment continues in
    /// the background; the callback sees a session event once it succeeds.
    /// On failure the session stays registered and uninitialised: `init` may
    /// be retried and `close` is still required.
    pub fn init(
        &self,
        hosts: &str,
        recv_timeout: Duration,
    ) -> ZkResult<()> {
        let _timer = OpTimer::new("init");
        let result = self.open_handle(hosts, recv_timeout);
        self.observe("init", result)
    }

    fn open_handle(
        &self,
        hosts: &str,
        recv_timeout: Duration,
    ) -> ZkResult<()> {
        let mut guard = self.handle.write();
        if !matches!(*guard, HandleState::Uninitialized) {
            return Err(ZkError::invalid_state());
        }
        let c_hosts = c_path(hosts)?;
        let recv_timeout_ms = i32::try_from(recv_timeout.as_millis()).map_err(|_| ZkError::bad_arguments())?;

        let handle = self.connector.connect(&c_hosts, recv_timeout_ms, self.id)?;
        *guard = HandleState::Open(handle);
        info!(session_id = %self.id, hosts, recv_timeout_ms, "session initialized");
        Ok(())
    }

    /// Creates a persistent node and returns its path.
    pub fn create(
        &self,
        path: &str,
        value: impl AsRef<[u8]>,
    ) -> ZkResult<String> {
        self.create_with_flags(path, value, CreateFlags::NONE)
    }

    /// Creates a node and returns the path the service assigned, which
    /// differs from `path` when [`CreateFlag::Sequential`](crate::CreateFlag)
    /// is set.
    ///
    /// An empty `value` creates the node with a null payload.
    pub fn create_with_flags(
        &self,
        path: &str,
        value: impl AsRef<[u8]>,
        flags: impl Into<CreateFlags>,
    ) -> ZkResult<String> {
        let value = value.as_ref();
        let flags = flags.into();
        self.with_handle("create", |handle| {
            let node_path = c_path(path)?;
            payload_arg(value)?;
            let mut path_buffer = ExchangeBuffer::with_capacity(self.buffer_length())?;
            ZkError::check(handle.create(&node_path, value, flags.code(), &mut path_buffer))?;
            let created = path_buffer.into_path();
            debug!(session_id = %self.id, path, %flags, created = %created, "node created");
            Ok(created)
        })
    }

    /// Deletes a childless node, whatever its version.
    pub fn delete(
        &self,
        path: &str,
    ) -> ZkResult<()> {
        self.with_handle("delete", |handle| {
            let node_path = c_path(path)?;
            ZkError::check(handle.delete(&node_path, ANY_VERSION))
        })
    }

    /// Fetches the payload of a node.
    ///
    /// At most [`buffer_length`](Session::buffer_length) bytes are returned;
    /// a longer payload is truncated without error. A null or empty payload
    /// comes back as an empty vector.
    pub fn get(
        &self,
        path: &str,
    ) -> ZkResult<Vec<u8>> {
        self.read_node("get", path).map(|(value, _)| value)
    }

    /// Like [`get`](Session::get), also returning node metadata.
    ///
    /// `stat.data_length` is the full payload length, so comparing it with
    /// the returned length reveals truncation.
    pub fn get_with_stat(
        &self,
        path: &str,
    ) -> ZkResult<(Vec<u8>, NodeStat)> {
        self.read_node("get_with_stat", path)
    }

    fn read_node(
        &self,
        op: &'static str,
        path: &str,
    ) -> ZkResult<(Vec<u8>, NodeStat)> {
        self.with_handle(op, |handle| {
            let node_path = c_path(path)?;
            let mut buffer = ExchangeBuffer::with_capacity(self.buffer_length())?;
            let mut stat = NodeStat::default();
            ZkError::check(handle.get(&node_path, self.watch_reads, &mut buffer, &mut stat))?;
            Ok((buffer.into_payload(), stat))
        })
    }

    /// Overwrites the payload of a node, whatever its version.
    pub fn set(
        &self,
        path: &str,
        value: impl AsRef<[u8]>,
    ) -> ZkResult<()> {
        let value = value.as_ref();
        self.with_handle("set", |handle| {
            let node_path = c_path(path)?;
            payload_arg(value)?;
            ZkError::check(handle.set(&node_path, value, ANY_VERSION))
        })
    }

    /// Metadata of a node, `None` when it does not exist.
    ///
    /// Under the read-watch policy a watch is left either way, so a missing
    /// node reports its creation.
    pub fn exists(
        &self,
        path: &str,
    ) -> ZkResult<Option<NodeStat>> {
        self.with_handle("exists", |handle| {
            let node_path = c_path(path)?;
            let mut stat = NodeStat::default();
            match handle.exists(&node_path, self.watch_reads, &mut stat) {
                ZOK => Ok(Some(stat)),
                ZNONODE => Ok(None),
                rc => Err(ZkError::from_code(rc)),
            }
        })
    }

    /// Names (not paths) of the node's immediate children, in no particular
    /// order.
    pub fn get_children(
        &self,
        path: &str,
    ) -> ZkResult<Vec<String>> {
        self.with_handle("get_children", |handle| {
            let node_path = c_path(path)?;
            let mut children = Vec::new();
            ZkError::check(handle.get_children(&node_path, self.watch_reads, &mut children))?;
            Ok(children)
        })
    }

    /// Connection state reported by the native handle; `Unknown` unless open.
    pub fn state(&self) -> StateKind {
        match &*self.handle.read() {
            HandleState::Open(handle) => StateKind::from_code(handle.state()),
            _ => StateKind::Unknown,
        }
    }

    /// Unregisters the session, then releases its native handle.
    ///
    /// Notifications arriving afterwards are dropped. Closing an
    /// uninitialised session only unregisters it; closing twice fails with
    /// `InvalidState`. Must not be called from this session's own callback
    /// while other threads have operations in flight on it.
    pub fn close(&self) -> ZkResult<()> {
        let _timer = OpTimer::new("close");
        let result = self.release("close");
        self.observe("close", result)
    }

    fn release(
        &self,
        reason: &'static str,
    ) -> ZkResult<()> {
        let previous = mem::replace(&mut *self.handle.write(), HandleState::Closed);
        match previous {
            HandleState::Closed => Err(ZkError::invalid_state()),
            HandleState::Uninitialized => {
                self.registry.unregister(self.id);
                debug!(session_id = %self.id, reason, "uninitialized session released");
                Ok(())
            }
            HandleState::Open(mut handle) => {
                self.registry.unregister(self.id);
                let rc = handle.close();
                info!(session_id = %self.id, reason, rc, "session closed");
                ZkError::check(rc)
            }
        }
    }

    /// Runs `op` against the open handle, or fails with `InvalidState`.
    fn with_handle<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&dyn NativeHandle) -> ZkResult<T>,
    ) -> ZkResult<T> {
        let _timer = OpTimer::new(op);
        let result = match &*self.handle.read() {
            HandleState::Open(handle) => f(handle.as_ref()),
            _ => Err(ZkError::invalid_state()),
        };
        self.observe(op, result)
    }

    fn observe<T>(
        &self,
        op: &'static str,
        result: ZkResult<T>,
    ) -> ZkResult<T> {
        if let Err(e) = &result {
            OPERATION_ERRORS.with_label_values(&[op, e.kind().as_str()]).inc();
            debug!(session_id = %self.id, op, error = %e, "session operation failed");
        }
        result
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if matches!(*self.handle.get_mut(), HandleState::Open(_)) {
            warn!(session_id = %self.id, "session dropped without close");
        }
        if let Err(e) = self.release("drop") {
            if !matches!(e.kind(), ErrorKind::InvalidState) {
                warn!(session_id = %self.id, "releasing dropped session failed: {}", e);
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("handle", &self.handle.read().as_str())
            .field("buffer_length", &self.buffer_length())
            .field("watch_reads", &self.watch_reads)
            .field("context", &self.context)
            .finish()
    }
}
