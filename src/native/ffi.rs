//! Raw declarations for the multi-threaded ZooKeeper C client
//! (`zookeeper.h`). Only the synchronous calls this crate uses are declared.

#![allow(non_camel_case_types)]

use libc::c_char;
use libc::c_int;
use libc::c_void;

use super::NodeStat;

/// Opaque native handle
#[repr(C)]
pub(crate) struct zhandle_t {
    _private: [u8; 0],
}

/// Opaque ACL list; only the address of the built-in lists is taken
#[repr(C)]
pub(crate) struct ACL_vector {
    _private: [u8; 0],
}

#[repr(C)]
pub(crate) struct String_vector {
    pub count: i32,
    pub data: *mut *mut c_char,
}

impl Default for String_vector {
    fn default() -> Self {
        Self {
            count: 0,
            data: std::ptr::null_mut(),
        }
    }
}

#[repr(C)]
pub(crate) struct clientid_t {
    _private: [u8; 0],
}

pub(crate) type watcher_fn = Option<
    unsafe extern "C" fn(zh: *mut zhandle_t, event_type: c_int, state: c_int, path: *const c_char, context: *mut c_void),
>;

extern "C" {
    /// Fully open ACL: anyone may do anything
    pub(crate) static ZOO_OPEN_ACL_UNSAFE: ACL_vector;

    pub(crate) fn zookeeper_init(
        host: *const c_char,
        watcher: watcher_fn,
        recv_timeout: c_int,
        clientid: *const clientid_t,
        context: *mut c_void,
        flags: c_int,
    ) -> *mut zhandle_t;

    pub(crate) fn zookeeper_close(zh: *mut zhandle_t) -> c_int;

    pub(crate) fn zoo_state(zh: *mut zhandle_t) -> c_int;

    pub(crate) fn zoo_create(
        zh: *mut zhandle_t,
        path: *const c_char,
        value: *const c_char,
        valuelen: c_int,
        acl: *const ACL_vector,
        flags: c_int,
        path_buffer: *mut c_char,
        path_buffer_len: c_int,
    ) -> c_int;

    pub(crate) fn zoo_delete(
        zh: *mut zhandle_t,
        path: *const c_char,
        version: c_int,
    ) -> c_int;

    pub(crate) fn zoo_exists(
        zh: *mut zhandle_t,
        path: *const c_char,
        watch: c_int,
        stat: *mut NodeStat,
    ) -> c_int;

    pub(crate) fn zoo_get(
        zh: *mut zhandle_t,
        path: *const c_char,
        watch: c_int,
        buffer: *mut c_char,
        buffer_len: *mut c_int,
        stat: *mut NodeStat,
    ) -> c_int;

    pub(crate) fn zoo_set(
        zh: *mut zhandle_t,
        path: *const c_char,
        buffer: *const c_char,
        buflen: c_int,
        version: c_int,
    ) -> c_int;

    pub(crate) fn zoo_get_children(
        zh: *mut zhandle_t,
        path: *const c_char,
        watch: c_int,
        strings: *mut String_vector,
    ) -> c_int;

    pub(crate) fn deallocate_String_vector(v: *mut String_vector) -> c_int;
}
