//! Host entry point FFI

use std::os::raw::{c_char, c_int};

use easyfetch_core::{EntryError, TransferOptions, fetch};

use crate::error::{EasyfetchError, EasyfetchErrorCode, report};
use crate::{ffi_try, from_c_string, to_c_string};

/// Fetch the single URL in `argv` and return the effective URL
///
/// This is the entry point for hosts that pass positional arguments through
/// (for example an interpreter's extension function). Exactly one argument is
/// accepted; any other count returns `Usage` with the usage text in
/// `error_out` and no transfer is attempted. Verbose protocol logging goes to
/// stderr, as with `easyfetch_transfer_new()`.
///
/// # Safety
///
/// - `argv` must point to `argc` valid null-terminated UTF-8 strings
///   (may be null when `argc` is 0)
/// - `url_out` must be a valid pointer to receive the URL string
/// - Caller must free `*url_out` with `easyfetch_free_string()`
/// - `error_out` must be null or a valid pointer to receive error message
#[unsafe(no_mangle)]
pub unsafe extern "C" fn easyfetch_fetch(
    argc: c_int,
    argv: *const *const c_char,
    url_out: *mut *mut c_char,
    error_out: *mut *mut c_char,
) -> c_int {
    if url_out.is_null() {
        return report(EasyfetchError::invalid_argument("url_out is null"), error_out);
    }

    let Ok(argc) = usize::try_from(argc) else {
        return report(EasyfetchError::invalid_argument("argc is negative"), error_out);
    };

    // arity is checked before any argument is decoded
    if argc != 1 {
        return report(EntryError::Usage { got: argc }.into(), error_out);
    }

    if argv.is_null() {
        return report(EasyfetchError::invalid_argument("argv is null"), error_out);
    }

    let Some(arg) = from_c_string(*argv) else {
        return report(
            EasyfetchError::invalid_argument("argv[0] is null or not UTF-8"),
            error_out,
        );
    };

    let url = ffi_try!(fetch(&[arg], &TransferOptions::default()), error_out);
    *url_out = to_c_string(url);

    EasyfetchErrorCode::Success as c_int
}
