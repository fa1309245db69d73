//! Session registry
//!
//! The native client hands a notification back with nothing but the opaque
//! context value supplied when the handle was opened. That value is a
//! [`SessionId`]; the registry is the only place that can turn it back into
//! a live session, and it is authoritative: once a session is unregistered
//! its identity no longer resolves, whatever the native side still holds.

mod session_registry;

pub use session_registry::*;
