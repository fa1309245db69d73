//! Seam between the session layer and the native client
//!
//! [`Connector`] opens handles; [`NativeHandle`] is one open handle. Both speak
//! the service's raw integer vocabulary so that translation happens in one
//! place, the session layer, through the taxonomy.
//!
//! With the `native` feature the crate provides [`ZooKeeperConnector`], backed
//! by `libzookeeper_mt`. Its single `extern "C"` watcher trampoline forwards
//! every notification to [`Dispatcher::global`].

use std::ffi::CStr;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::Dispatcher;
use crate::ExchangeBuffer;
use crate::SessionId;
use crate::ZkResult;

#[cfg(feature = "native")]
mod ffi;
#[cfg(feature = "native")]
mod zookeeper;

#[cfg(feature = "native")]
pub use zookeeper::*;

/// Node metadata, laid out like the native client's `struct Stat`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStat {
    /// Transaction id that created the node
    pub czxid: i64,
    /// Transaction id that last modified the node
    pub mzxid: i64,
    /// Creation time, ms since epoch
    pub ctime: i64,
    /// Last modification time, ms since epoch
    pub mtime: i64,
    /// Number of payload changes
    pub version: i32,
    /// Number of child list changes
    pub cversion: i32,
    /// Number of ACL changes
    pub aversion: i32,
    /// Owning session of an ephemeral node, 0 otherwise
    pub ephemeral_owner: i64,
    /// Full payload length, independent of any exchange buffer capacity
    pub data_length: i32,
    pub num_children: i32,
    /// Transaction id that last modified the children
    pub pzxid: i64,
}

/// Opens native handles bound to a notification dispatcher
#[cfg_attr(test, automock)]
pub trait Connector: Send + Sync + 'static {
    /// Dispatcher that this connector's handles report notifications to.
    /// Sessions register in its registry.
    fn dispatcher(&self) -> Arc<Dispatcher>;

    /// Opens a handle whose notifications carry `context` as their opaque
    /// context value.
    ///
    /// Returns once the handle exists; connection establishment continues in
    /// the background and is reported through session events.
    fn connect(
        &self,
        hosts: &CStr,
        recv_timeout_ms: i32,
        context: SessionId,
    ) -> ZkResult<Box<dyn NativeHandle>>;
}

/// One open native handle
///
/// Methods return the native return code. Payload arguments are empty for a
/// null payload. Implementations must tolerate calls from several threads;
/// the session serialises `close` against every other call.
#[cfg_attr(test, automock)]
pub trait NativeHandle: Send + Sync {
    fn create(
        &self,
        path: &CStr,
        value: &[u8],
        flags: i32,
        path_buffer: &mut ExchangeBuffer,
    ) -> i32;

    fn delete(
        &self,
        path: &CStr,
        version: i32,
    ) -> i32;

    fn exists(
        &self,
        path: &CStr,
        watch: bool,
        stat: &mut NodeStat,
    ) -> i32;

    fn get(
        &self,
        path: &CStr,
        watch: bool,
        buffer: &mut ExchangeBuffer,
        stat: &mut NodeStat,
    ) -> i32;

    fn set(
        &self,
        path: &CStr,
        value: &[u8],
        version: i32,
    ) -> i32;

    fn get_children(
        &self,
        path: &CStr,
        watch: bool,
        children: &mut Vec<String>,
    ) -> i32;

    /// Raw connection state.
    fn state(&self) -> i32;

    /// Releases the handle. Called at most once.
    fn close(&mut self) -> i32;
}
