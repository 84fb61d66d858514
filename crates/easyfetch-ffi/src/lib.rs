//! # easyfetch-ffi - C-compatible FFI bindings
//!
//! This crate provides a stable C ABI over `easyfetch-core`, so that numerical
//! environments, Python, C and other hosts can run a blocking transfer and read
//! back the effective URL.
//!
//! ## Safety
//!
//! All FFI functions that take pointers are marked `unsafe`. Callers must
//! ensure:
//! - Valid pointers (non-null where required, pointing to initialized data)
//! - Proper memory ownership (don't double-free, don't use-after-free)
//! - String encoding (UTF-8 for all strings)
//! - A transfer handle is used from one thread at a time
//!
//! ## Memory Management
//!
//! - Rust owns all opaque handle memory (`EasyfetchTransfer`)
//! - Caller owns string buffers returned via `*mut c_char`
//! - `easyfetch_transfer_new()` allocates, `easyfetch_transfer_free()` releases
//! - Returned strings must be freed with `easyfetch_free_string()`
//!
//! ## Error Handling
//!
//! Functions return an `EasyfetchErrorCode` as `c_int` (0 = success).
//! Error details are written to an optional `error_out` parameter. libcurl
//! failures read `libcurl (code = N): message`.

// FFI code inherently requires unsafe operations within unsafe functions
#![allow(unsafe_op_in_unsafe_fn)]

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

use easyfetch_core::TransferHandle;

pub mod entry;
pub mod error;
pub mod transfer;

pub use error::{EasyfetchError, EasyfetchErrorCode};

/// Opaque handle to a transfer session
#[repr(C)]
pub struct EasyfetchTransfer {
    _private: [u8; 0],
}

/// Internal representation of EasyfetchTransfer
pub(crate) struct TransferState {
    pub(crate) handle: TransferHandle,
    /// libcurl code of the last failed call, 0 after a successful one
    pub(crate) last_curl_code: c_int,
}

/// Initialize the easyfetch FFI library
///
/// Installs a log subscriber filtered by `RUST_LOG` (default `info`).
/// Returns 0 on success.
///
/// # Safety
///
/// Safe to call multiple times (idempotent).
#[unsafe(no_mangle)]
pub extern "C" fn easyfetch_init() -> c_int {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    EasyfetchErrorCode::Success as c_int
}

/// Get the version string of the easyfetch library
///
/// Returns a pointer to a static null-terminated string.
/// Caller must NOT free this pointer.
#[unsafe(no_mangle)]
pub extern "C" fn easyfetch_version() -> *const c_char {
    const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

/// Free a string returned by easyfetch FFI functions
///
/// # Safety
///
/// - `s` must be null or a pointer returned by an easyfetch FFI function
/// - `s` must not be used after this call
/// - `s` must not be freed multiple times
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Convert a Rust string into a caller-owned C string
///
/// Interior NUL bytes cannot cross the boundary; such strings are truncated
/// at the first NUL.
pub(crate) fn to_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let mut bytes = s.into();
    if let Some(nul) = bytes.iter().position(|&b| b == 0) {
        bytes.truncate(nul);
    }
    CString::new(bytes)
        .unwrap_or_default()
        .into_raw()
}

/// Convert a C string to a Rust String
///
/// # Safety
///
/// - `s` must be null or a valid null-terminated string
pub(crate) unsafe fn from_c_string(s: *const c_char) -> Option<String> {
    if s.is_null() {
        None
    } else {
        CStr::from_ptr(s).to_str().ok().map(|s| s.to_string())
    }
}
