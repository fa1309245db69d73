//! Client binding for a ZooKeeper-style coordination service.
//!
//! Sessions talk to the service through its native C client. That client
//! reports watch notifications on its own thread, carrying nothing but an
//! opaque context value; this crate turns that into per-session callbacks:
//! - [`SessionRegistry`] maps the context value ([`SessionId`]) back to the
//!   session, under a reader-writer lock
//! - [`Dispatcher`] is the single entry point for notifications
//! - [`ExchangeBuffer`] carries payloads and paths across the boundary
//! - the taxonomy ([`ErrorKind`], [`EventKind`], [`StateKind`],
//!   [`CreateFlag`]) replaces the service's integer codes
//!
//! Linking against `libzookeeper_mt` requires the `native` feature.

mod buffer;
mod config;
mod constants;
mod dispatcher;
mod errors;
mod metrics;
mod native;
mod registry;
mod session;
mod taxonomy;
mod utils;

pub use buffer::ExchangeBuffer;
pub use config::*;
pub use constants::DEFAULT_BUFFER_LENGTH;
pub use dispatcher::*;
pub use errors::*;
pub use metrics::gather_metrics;
pub use native::*;
pub use registry::*;
pub use session::*;
pub use taxonomy::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
