//! Marshalling of paths and payloads across the native boundary
//!
//! Variable-length results (a node's payload, the path assigned by a create)
//! come back through an [`ExchangeBuffer`]: a zero-filled block of fixed
//! capacity, allocated for one call and dropped when the call returns, plus
//! an actual-length slot the service updates.
//!
//! The service truncates a payload larger than the capacity without saying
//! so. This layer does not detect it either: `into_payload` returns at most
//! `capacity` bytes and no error. Callers that care compare the length
//! against `NodeStat::data_length`.

use std::ffi::CStr;
use std::ffi::CString;
use std::ptr;

use libc::c_char;
use libc::c_int;

use crate::constants::NULL_PAYLOAD_LEN;
use crate::ZkError;
use crate::ZkResult;


/// Fixed-capacity output buffer with an actual-length result
#[derive(Debug)]
pub struct ExchangeBuffer {
    data: Vec<u8>,
    actual_len: c_int,
}

impl ExchangeBuffer {
    /// Allocates a zero-filled buffer.
    ///
    /// Fails with `BadArguments` when the capacity cannot be expressed as a
    /// native `int`.
    pub fn with_capacity(capacity: usize) -> ZkResult<Self> {
        let actual_len = c_int::try_from(capacity).map_err(|_| ZkError::bad_arguments())?;
        Ok(Self {
            data: vec![0; capacity],
            actual_len,
        })
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Length most recently reported for the buffer's contents.
    ///
    /// Starts at the capacity; negative values mean "no data".
    pub fn actual_len(&self) -> i32 {
        self.actual_len
    }

    /// Stores `value` the way the native client does: at most `capacity`
    /// bytes are kept and the actual length is set to the number copied.
    pub fn fill(
        &mut self,
        value: &[u8],
    ) -> usize {
        let n = value.len().min(self.capacity());
        self.data[..n].copy_from_slice(&value[..n]);
        self.actual_len = n as c_int;
        n
    }

    /// Marks the buffer as holding a null payload.
    pub fn fill_null(&mut self) {
        self.actual_len = NULL_PAYLOAD_LEN;
    }

    /// Writes a NUL-terminated path, truncated to leave room for the
    /// terminator, as the native client does for `path_buffer`.
    pub fn write_path(
        &mut self,
        path: &str,
    ) {
        if self.data.is_empty() {
            return;
        }
        let n = path.len().min(self.capacity() - 1);
        self.data[..n].copy_from_slice(&path.as_bytes()[..n]);
        self.data[n] = 0;
    }

    /// Payload bytes; empty (never an error) when the reported length is zero
    /// or negative.
    pub fn into_payload(mut self) -> Vec<u8> {
        if self.actual_len <= 0 {
            return Vec::new();
        }
        let len = (self.actual_len as usize).min(self.data.len());
        self.data.truncate(len);
        self.data
    }

    /// Path string up to the first NUL, or the whole buffer if none.
    pub fn into_path(self) -> String {
        let end = self.data.iter().position(|b| *b == 0).unwrap_or(self.data.len());
        String::from_utf8_lossy(&self.data[..end]).into_owned()
    }

    #[cfg_attr(not(feature = "native"), allow(dead_code))]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut c_char {
        self.data.as_mut_ptr() as *mut c_char
    }

    /// Capacity as the native `int` the buffer was validated against.
    #[cfg_attr(not(feature = "native"), allow(dead_code))]
    pub(crate) fn capacity_arg(&self) -> c_int {
        self.data.len() as c_int
    }

    /// In/out length slot for calls that report how many bytes they wrote.
    #[cfg_attr(not(feature = "native"), allow(dead_code))]
    pub(crate) fn actual_len_mut(&mut self) -> &mut c_int {
        &mut self.actual_len
    }
}

/// Pointer/length pair for an input payload.
///
/// Empty and absent are the same value: `(NULL, -1)`, the native "null data"
/// indicator, so an empty slice's dangling pointer never reaches the service.
pub(crate) fn payload_arg(value: &[u8]) -> ZkResult<(*const c_char, c_int)> {
    if value.is_empty() {
        return Ok((ptr::null(), NULL_PAYLOAD_LEN));
    }
    let len = c_int::try_from(value.len()).map_err(|_| ZkError::bad_arguments())?;
    Ok((value.as_ptr() as *const c_char, len))
}

/// Paths are validated by the service only; an interior NUL is the one
/// thing that cannot be expressed across the boundary.
pub(crate) fn c_path(path: &str) -> ZkResult<CString> {
    CString::new(path).map_err(|_| ZkError::bad_arguments())
}

/// Decodes a native array of `count` C strings. Null entries are skipped.
///
/// # Safety
/// `data` must be null or point to `count` readable pointers, each null or
/// pointing to a NUL-terminated string that outlives this call.
#[cfg_attr(not(feature = "native"), allow(dead_code))]
pub(crate) unsafe fn decode_c_strings(
    data: *const *mut c_char,
    count: c_int,
) -> Vec<String> {
    if data.is_null() || count <= 0 {
        return Vec::new();
    }
    let mut names = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let item = *data.add(i);
        if item.is_null() {
            continue;
        }
        names.push(CStr::from_ptr(item).to_string_lossy().into_owned());
    }
    names
}
