use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use lazy_static::lazy_static;
use tracing::debug;
use tracing::error;
use tracing::trace;

use crate::metrics::WATCH_EVENTS_DISPATCHED;
use crate::metrics::WATCH_EVENTS_DROPPED;
use crate::EventKind;
use crate::SessionId;
use crate::SessionRegistry;
use crate::StateKind;

lazy_static! {
    static ref GLOBAL_DISPATCHER: Arc<Dispatcher> = Arc::new(Dispatcher::new(SessionRegistry::global()));
}

/// Notification delivered to a session callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedEvent {
    pub kind: EventKind,
    pub state: StateKind,
    /// Affected node; empty for session events
    pub path: String,
}

/// Application callback, run synchronously on the notification thread
pub type Watcher = Box<dyn Fn(&WatchedEvent) + Send + Sync>;

/// What happened to one notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The session callback ran to completion
    Delivered,
    /// The identity no longer resolves, typically a session already closed
    Unregistered,
    /// The session exists but has no callback installed
    NoWatcher,
    /// The callback panicked; the panic was contained
    WatcherPanicked,
}

impl Delivery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delivery::Delivered => "delivered",
            Delivery::Unregistered => "unregistered",
            Delivery::NoWatcher => "no_watcher",
            Delivery::WatcherPanicked => "watcher_panicked",
        }
    }
}

/// Routes native notifications to session callbacks by registry identity
///
/// Holds no per-session state. One instance serves every session of a
/// native client; [`Dispatcher::global`] is the instance wired to the C
/// library's watcher trampoline.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<SessionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub fn global() -> Arc<Dispatcher> {
        GLOBAL_DISPATCHER.clone()
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Entry point for the native notification thread.
    ///
    /// Never panics: a late notification for a closed session is dropped and
    /// a panicking callback is caught.
    pub fn dispatch(
        &self,
        event_code: i32,
        state_code: i32,
        path: &str,
        context: usize,
    ) -> Delivery {
        let event = WatchedEvent {
            kind: EventKind::from_code(event_code),
            state: StateKind::from_code(state_code),
            path: path.to_string(),
        };
        self.deliver(SessionId::from_context(context), event)
    }

    /// Delivers an already-translated event to the session named by `id`.
    pub fn deliver(
        &self,
        id: SessionId,
        event: WatchedEvent,
    ) -> Delivery {
        // The read lock is released before the callback runs, so the callback
        // may open or close sessions itself.
        let outcome = match self.registry.lookup(id) {
            None => Delivery::Unregistered,
            Some(context) => match context.watcher() {
                None => Delivery::NoWatcher,
                Some(watcher) => {
                    trace!(session_id = %id, kind = %event.kind, state = %event.state, path = %event.path, "dispatching watch event");
                    match panic::catch_unwind(AssertUnwindSafe(|| (**watcher)(&event))) {
                        Ok(()) => Delivery::Delivered,
                        Err(_) => {
                            error!(session_id = %id, kind = %event.kind, path = %event.path, "session watcher panicked");
                            Delivery::WatcherPanicked
                        }
                    }
                }
            },
        };

        match outcome {
            Delivery::Delivered => {
                WATCH_EVENTS_DISPATCHED.with_label_values(&[event.kind.as_str()]).inc();
            }
            dropped => {
                if dropped != Delivery::WatcherPanicked {
                    debug!(session_id = %id, reason = dropped.as_str(), kind = %event.kind, path = %event.path, "watch event dropped");
                }
                WATCH_EVENTS_DROPPED.with_label_values(&[dropped.as_str()]).inc();
            }
        }
        outcome
    }
}
