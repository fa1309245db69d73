//! the test_utils folder here will share utils or test components between
//! unit tests
mod memory_ensemble;

pub use memory_ensemble::*;

use std::time::Duration;

use crossbeam_channel::unbounded;
use crossbeam_channel::Receiver;

use crate::WatchedEvent;
use crate::Watcher;

/// How long a test waits for a notification that should arrive
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(2);

/// How long a test waits before concluding a notification will not arrive
pub const SILENCE_TIMEOUT: Duration = Duration::from_millis(200);

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    env_logger::init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

/// Watcher that forwards every event it receives into a channel.
pub fn recording_watcher() -> (Watcher, Receiver<WatchedEvent>) {
    let (tx, rx) = unbounded();
    let watcher: Watcher = Box::new(move |event: &WatchedEvent| {
        let _ = tx.send(event.clone());
    });
    (watcher, rx)
}
