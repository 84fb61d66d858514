//! Transfer handle API FFI

use std::os::raw::{c_char, c_int};

use easyfetch_core::{TransferError, TransferHandle};

use crate::error::{EasyfetchError, EasyfetchErrorCode, report};
use crate::{EasyfetchTransfer, TransferState, ffi_try, ffi_try_ptr, from_c_string, to_c_string};

impl TransferState {
    /// Remember the libcurl code of `result` and lift it to an FFI error
    fn record<T>(&mut self, result: Result<T, TransferError>) -> Result<T, EasyfetchError> {
        match result {
            Ok(value) => {
                self.last_curl_code = 0;
                Ok(value)
            }
            Err(err) => {
                self.last_curl_code = err.code;
                Err(err.into())
            }
        }
    }
}

/// Borrow the state behind a handle, or report a null handle
///
/// # Safety
///
/// - `transfer` must be null or a valid handle from `easyfetch_transfer_new()`
unsafe fn state_mut<'a>(
    transfer: *mut EasyfetchTransfer,
) -> Result<&'a mut TransferState, EasyfetchError> {
    if transfer.is_null() {
        Err(EasyfetchError::invalid_argument("transfer is null"))
    } else {
        Ok(&mut *(transfer as *mut TransferState))
    }
}

/// Create a new transfer handle
///
/// Verbose protocol logging to stderr is on and the session's error buffer is
/// registered.
///
/// # Safety
///
/// - `error_out` must be null or a valid pointer to receive error message
/// - Caller must free the returned handle with `easyfetch_transfer_free()`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_transfer_new(
    error_out: *mut *mut c_char,
) -> *mut EasyfetchTransfer {
    let handle = ffi_try_ptr!(TransferHandle::create(), error_out);

    let state = Box::new(TransferState {
        handle,
        last_curl_code: 0,
    });
    Box::into_raw(state) as *mut EasyfetchTransfer
}

/// Free a transfer handle, releasing its session
///
/// # Safety
///
/// - `transfer` must be null or a pointer returned by `easyfetch_transfer_new()`
/// - `transfer` must not be used after this call
/// - `transfer` must not be freed multiple times
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_transfer_free(transfer: *mut EasyfetchTransfer) {
    if !transfer.is_null() {
        drop(Box::from_raw(transfer as *mut TransferState));
    }
}

/// Set the URL of the next transfer
///
/// # Safety
///
/// - `transfer` must be a valid transfer handle
/// - `url` must be a valid null-terminated UTF-8 string
/// - `error_out` must be null or a valid pointer to receive error message
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_transfer_set_url(
    transfer: *mut EasyfetchTransfer,
    url: *const c_char,
    error_out: *mut *mut c_char,
) -> c_int {
    let state = ffi_try!(state_mut(transfer), error_out);
    let Some(url) = from_c_string(url) else {
        return report(
            EasyfetchError::invalid_argument("url is null or not UTF-8"),
            error_out,
        );
    };

    let result = state.handle.set_url(&url);
    ffi_try!(state.record(result), error_out);
    EasyfetchErrorCode::Success as c_int
}

/// Toggle libcurl verbose protocol logging
///
/// # Safety
///
/// - `transfer` must be a valid transfer handle
/// - `error_out` must be null or a valid pointer to receive error message
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_transfer_set_verbose(
    transfer: *mut EasyfetchTransfer,
    on: bool,
    error_out: *mut *mut c_char,
) -> c_int {
    let state = ffi_try!(state_mut(transfer), error_out);

    let result = state.handle.set_verbose(on);
    ffi_try!(state.record(result), error_out);
    EasyfetchErrorCode::Success as c_int
}

/// Run one blocking transfer
///
/// Blocks the calling thread until the transfer finishes or fails.
///
/// # Safety
///
/// - `transfer` must be a valid transfer handle
/// - `error_out` must be null or a valid pointer to receive error message
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_transfer_perform(
    transfer: *mut EasyfetchTransfer,
    error_out: *mut *mut c_char,
) -> c_int {
    let state = ffi_try!(state_mut(transfer), error_out);

    let result = state.handle.perform();
    ffi_try!(state.record(result), error_out);
    EasyfetchErrorCode::Success as c_int
}

/// Get the URL the last transfer actually used
///
/// Writes an empty string before the first transfer.
///
/// # Safety
///
/// - `transfer` must be a valid transfer handle
/// - `url_out` must be a valid pointer to receive the URL string
/// - Caller must free `*url_out` with `easyfetch_free_string()`
/// - `error_out` must be null or a valid pointer to receive error message
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_transfer_effective_url(
    transfer: *mut EasyfetchTransfer,
    url_out: *mut *mut c_char,
    error_out: *mut *mut c_char,
) -> c_int {
    let state = ffi_try!(state_mut(transfer), error_out);
    if url_out.is_null() {
        return report(EasyfetchError::invalid_argument("url_out is null"), error_out);
    }

    let result = state.handle.effective_url();
    let url = ffi_try!(state.record(result), error_out);
    *url_out = to_c_string(url);
    EasyfetchErrorCode::Success as c_int
}

/// Get the HTTP status of the last transfer (0 if none)
///
/// # Safety
///
/// - `transfer` must be a valid transfer handle
/// - `code_out` must be a valid pointer to receive the status
/// - `error_out` must be null or a valid pointer to receive error message
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_transfer_response_code(
    transfer: *mut EasyfetchTransfer,
    code_out: *mut u32,
    error_out: *mut *mut c_char,
) -> c_int {
    let state = ffi_try!(state_mut(transfer), error_out);
    if code_out.is_null() {
        return report(EasyfetchError::invalid_argument("code_out is null"), error_out);
    }

    let result = state.handle.response_code();
    *code_out = ffi_try!(state.record(result), error_out);
    EasyfetchErrorCode::Success as c_int
}

/// libcurl status of the last failed call on this handle
///
/// Returns 0 if the last call succeeded or `transfer` is null.
///
/// # Safety
///
/// - `transfer` must be null or a valid transfer handle
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_transfer_last_curl_code(
    transfer: *const EasyfetchTransfer,
) -> c_int {
    if transfer.is_null() {
        return 0;
    }
    (*(transfer as *const TransferState)).last_curl_code
}
