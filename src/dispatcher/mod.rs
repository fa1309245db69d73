//! Watcher dispatcher
//!
//! The native client accepts one watcher function per handle and calls it on
//! its own internal thread. Every handle opened by this crate is given the
//! same entry point; the dispatcher turns the raw notification into a
//! [`WatchedEvent`], resolves the owning session through the
//! [`SessionRegistry`] and runs that session's callback.
//!
//! ```text
//! native thread ──> dispatch(type, state, path, ctx)
//!                      │ translate codes
//!                      │ registry.lookup(SessionId::from_context(ctx))
//!                      ├─ not registered ──> drop
//!                      ├─ no watcher     ──> drop
//!                      └─ watcher(&event)
//! ```

mod watch_dispatcher;

pub use watch_dispatcher::*;
