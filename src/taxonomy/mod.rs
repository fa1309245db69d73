//! Translation tables from the coordination service's integer vocabulary
//!
//! Every raw code that crosses the native boundary (watch event types,
//! connection states, return codes, create flags) is turned into one of the
//! enums below before the rest of the crate looks at it. The functions are
//! pure lookups: unrecognised codes map to an `Unknown` variant instead of
//! failing, so a newer server or client library never breaks dispatch.

mod create_flag;
mod error_kind;
mod event;
mod state;

pub use create_flag::*;
pub use error_kind::*;
pub use event::*;
pub use state::*;
