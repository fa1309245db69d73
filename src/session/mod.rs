//! Client session API
//!
//! A [`Session`] is one connection to the coordination service:
//! - created through [`SessionBuilder`], which registers it for watch dispatch
//! - initialised with [`Session::init`], which opens the native handle
//! - used for node operations, each a blocking round trip
//! - closed with [`Session::close`], which unregisters it and releases the
//!   handle
//!
//! # Basic Usage
//! ```ignore
//! use std::time::Duration;
//! use zoolink::{CreateFlag, Session};
//!
//! let session = Session::new();
//! session.set_watcher(Box::new(|event| println!("{} {} {}", event.kind, event.state, event.path)));
//! session.init("localhost:2181", Duration::from_millis(1000))?;
//!
//! let path = session.create_with_flags("/jobs/job-", b"payload", CreateFlag::Sequential)?;
//! let value = session.get(&path)?;
//! session.set(&path, b"done")?;
//! session.delete(&path)?;
//! session.close()?;
//! ```

mod builder;
mod client_session;

pub use builder::*;
pub use client_session::*;
