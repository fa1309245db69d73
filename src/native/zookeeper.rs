use std::ffi::CStr;
use std::io;
use std::panic;
use std::ptr;
use std::ptr::NonNull;
use std::sync::Arc;

use libc::c_char;
use libc::c_int;
use libc::c_void;
use tracing::debug;
use tracing::error;
use tracing::warn;

use super::ffi;
use super::Connector;
use super::NativeHandle;
use super::NodeStat;
use crate::buffer::decode_c_strings;
use crate::buffer::payload_arg;
use crate::constants::ZOK;
use crate::Dispatcher;
use crate::ExchangeBuffer;
use crate::SessionId;
use crate::ZkError;
use crate::ZkResult;

/// The one watcher function handed to every native handle.
///
/// Runs on the C client's completion thread. Nothing may unwind out of it.
unsafe extern "C" fn watcher_trampoline(
    _zh: *mut ffi::zhandle_t,
    event_type: c_int,
    state: c_int,
    path: *const c_char,
    context: *mut c_void,
) {
    let path = if path.is_null() {
        String::new()
    } else {
        CStr::from_ptr(path).to_string_lossy().into_owned()
    };
    let context = context as usize;
    let result = panic::catch_unwind(move || {
        Dispatcher::global().dispatch(event_type, state, &path, context);
    });
    if result.is_err() {
        error!("watcher trampoline caught a panic");
    }
}

/// Connector backed by `libzookeeper_mt`
///
/// All handles share [`Dispatcher::global`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ZooKeeperConnector;

impl ZooKeeperConnector {
    pub fn new() -> Self {
        ZooKeeperConnector
    }
}

impl Connector for ZooKeeperConnector {
    fn dispatcher(&self) -> Arc<Dispatcher> {
        Dispatcher::global()
    }

    fn connect(
        &self,
        hosts: &CStr,
        recv_timeout_ms: i32,
        context: SessionId,
    ) -> ZkResult<Box<dyn NativeHandle>> {
        let zh = unsafe {
            ffi::zookeeper_init(
                hosts.as_ptr(),
                Some(watcher_trampoline),
                recv_timeout_ms,
                ptr::null(),
                context.as_context() as *mut c_void,
                0,
            )
        };
        match NonNull::new(zh) {
            Some(zh) => {
                debug!(session_id = %context, hosts = ?hosts, "native handle created");
                Ok(Box::new(ZooKeeperHandle { zh: Some(zh) }))
            }
            None => {
                let os_error = io::Error::last_os_error();
                warn!(session_id = %context, hosts = ?hosts, "zookeeper_init failed: {}", os_error);
                Err(ZkError::from_init_errno(os_error.raw_os_error()))
            }
        }
    }
}

/// Open `zhandle_t`
///
/// The multi-threaded client library serialises calls on one handle
/// internally, so shared references may be used from several threads.
#[derive(Debug)]
pub struct ZooKeeperHandle {
    /// `None` once closed
    zh: Option<NonNull<ffi::zhandle_t>>,
}

unsafe impl Send for ZooKeeperHandle {}
unsafe impl Sync for ZooKeeperHandle {}

impl ZooKeeperHandle {
    fn raw(&self) -> *mut ffi::zhandle_t {
        self.zh.map_or(ptr::null_mut(), NonNull::as_ptr)
    }
}

impl NativeHandle for ZooKeeperHandle {
    fn create(
        &self,
        path: &CStr,
        value: &[u8],
        flags: i32,
        path_buffer: &mut ExchangeBuffer,
    ) -> i32 {
        let (value_ptr, value_len) = match payload_arg(value) {
            Ok(arg) => arg,
            Err(e) => return e.code(),
        };
        unsafe {
            ffi::zoo_create(
                self.raw(),
                path.as_ptr(),
                value_ptr,
                value_len,
                ptr::addr_of!(ffi::ZOO_OPEN_ACL_UNSAFE),
                flags,
                path_buffer.as_mut_ptr(),
                path_buffer.capacity_arg(),
            )
        }
    }

    fn delete(
        &self,
        path: &CStr,
        version: i32,
    ) -> i32 {
        unsafe { ffi::zoo_delete(self.raw(), path.as_ptr(), version) }
    }

    fn exists(
        &self,
        path: &CStr,
        watch: bool,
        stat: &mut NodeStat,
    ) -> i32 {
        unsafe { ffi::zoo_exists(self.raw(), path.as_ptr(), watch as c_int, stat) }
    }

    fn get(
        &self,
        path: &CStr,
        watch: bool,
        buffer: &mut ExchangeBuffer,
        stat: &mut NodeStat,
    ) -> i32 {
        let data = buffer.as_mut_ptr();
        unsafe {
            ffi::zoo_get(
                self.raw(),
                path.as_ptr(),
                watch as c_int,
                data,
                buffer.actual_len_mut(),
                stat,
            )
        }
    }

    fn set(
        &self,
        path: &CStr,
        value: &[u8],
        version: i32,
    ) -> i32 {
        let (value_ptr, value_len) = match payload_arg(value) {
            Ok(arg) => arg,
            Err(e) => return e.code(),
        };
        unsafe { ffi::zoo_set(self.raw(), path.as_ptr(), value_ptr, value_len, version) }
    }

    fn get_children(
        &self,
        path: &CStr,
        watch: bool,
        children: &mut Vec<String>,
    ) -> i32 {
        let mut strings = ffi::String_vector::default();
        let rc = unsafe { ffi::zoo_get_children(self.raw(), path.as_ptr(), watch as c_int, &mut strings) };
        if rc == ZOK {
            *children = unsafe { decode_c_strings(strings.data, strings.count) };
            unsafe {
                ffi::deallocate_String_vector(&mut strings);
            }
        }
        rc
    }

    fn state(&self) -> i32 {
        match self.zh {
            Some(zh) => unsafe { ffi::zoo_state(zh.as_ptr()) },
            None => 0,
        }
    }

    fn close(&mut self) -> i32 {
        match self.zh.take() {
            Some(zh) => unsafe { ffi::zookeeper_close(zh.as_ptr()) },
            None => ZOK,
        }
    }
}

impl Drop for ZooKeeperHandle {
    fn drop(&mut self) {
        if self.zh.is_some() {
            let rc = self.close();
            if rc != ZOK {
                warn!("zookeeper_close on drop failed: {}", ZkError::from_code(rc));
            }
        }
    }
}
