use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::debug;
use tracing::trace;

use crate::metrics::LIVE_SESSIONS;
use crate::Watcher;

lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<SessionRegistry> = Arc::new(SessionRegistry::new());
}

/// Registry identity of a session, also its native callback context
///
/// Identities come from a per-registry monotonic counter starting at 1, so a
/// context of 0 (a null pointer on the native side) never names a session
/// and an identity is never handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        SessionId(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Value passed to the native client as the watcher context.
    pub fn as_context(&self) -> usize {
        self.0 as usize
    }

    /// Recovers an identity from a watcher context.
    pub fn from_context(context: usize) -> Self {
        SessionId(context as u64)
    }
}

impl fmt::Display for SessionId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-session state reachable from the notification thread
///
/// Holds only the application callback. The slot can be swapped while a
/// dispatch is running; the dispatch keeps whichever callback it loaded.
#[derive(Default)]
pub struct SessionContext {
    watcher: ArcSwapOption<Watcher>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_watcher(watcher: Watcher) -> Self {
        Self {
            watcher: ArcSwapOption::from_pointee(watcher),
        }
    }

    pub fn set_watcher(
        &self,
        watcher: Watcher,
    ) {
        self.watcher.store(Some(Arc::new(watcher)));
    }

    pub fn clear_watcher(&self) {
        self.watcher.store(None);
    }

    /// Snapshot of the current callback, if any.
    pub fn watcher(&self) -> Option<Arc<Watcher>> {
        self.watcher.load_full()
    }

    pub fn has_watcher(&self) -> bool {
        self.watcher.load().is_some()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("has_watcher", &self.has_watcher())
            .finish()
    }
}

struct RegistryInner {
    /// Last identity handed out
    last_id: u64,
    sessions: HashMap<SessionId, Arc<SessionContext>>,
}

/// Concurrency-safe map from [`SessionId`] to [`SessionContext`]
///
/// Lookups share a reader lock; register and unregister take the writer
/// lock, so a lookup never observes a half-inserted entry.
pub struct SessionRegistry {
    inner: RwLock<RegistryInner>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                last_id: 0,
                sessions: HashMap::new(),
            }),
        }
    }

    /// Registry shared by every session opened through the native client.
    pub fn global() -> Arc<SessionRegistry> {
        GLOBAL_REGISTRY.clone()
    }

    /// Assigns the next identity and publishes `context` under it.
    pub fn register(
        &self,
        context: Arc<SessionContext>,
    ) -> SessionId {
        let id = {
            let mut inner = self.inner.write();
            inner.last_id += 1;
            let id = SessionId(inner.last_id);
            inner.sessions.insert(id, context);
            id
        };
        LIVE_SESSIONS.inc();
        debug!(session_id = %id, "session registered");
        id
    }

    /// Resolves an identity. Returns `None` once the session is unregistered.
    pub fn lookup(
        &self,
        id: SessionId,
    ) -> Option<Arc<SessionContext>> {
        let found = self.inner.read().sessions.get(&id).cloned();
        trace!(session_id = %id, found = found.is_some(), "session lookup");
        found
    }

    /// Removes an identity; every later lookup of it fails.
    ///
    /// A dispatch that resolved the identity before this call may still be
    /// running its callback; only registry consistency is guaranteed.
    pub fn unregister(
        &self,
        id: SessionId,
    ) -> Option<Arc<SessionContext>> {
        let removed = self.inner.write().sessions.remove(&id);
        if removed.is_some() {
            LIVE_SESSIONS.dec();
            debug!(session_id = %id, "session unregistered");
        }
        removed
    }

    pub fn contains(
        &self,
        id: SessionId,
    ) -> bool {
        self.inner.read().sessions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("SessionRegistry")
            .field("last_id", &inner.last_id)
            .field("live", &inner.sessions.len())
            .finish()
    }
}
