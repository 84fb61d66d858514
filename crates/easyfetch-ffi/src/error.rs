//! Error handling for FFI boundary

use std::os::raw::{c_char, c_int};

use easyfetch_core::{EntryError, TransferError};

use crate::to_c_string;

/// FFI error codes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EasyfetchErrorCode {
    /// Operation succeeded
    Success = 0,
    /// Invalid argument provided (null pointer, bad UTF-8)
    InvalidArgument = 1,
    /// Host entry point called with the wrong number of arguments
    Usage = 2,
    /// libcurl reported a non-success status
    Transfer = 3,
    /// Internal error
    InternalError = 99,
}

impl From<i32> for EasyfetchErrorCode {
    fn from(code: i32) -> Self {
        match code {
            0 => EasyfetchErrorCode::Success,
            1 => EasyfetchErrorCode::InvalidArgument,
            2 => EasyfetchErrorCode::Usage,
            3 => EasyfetchErrorCode::Transfer,
            _ => EasyfetchErrorCode::InternalError,
        }
    }
}

/// Error type for FFI operations
#[derive(Debug)]
pub struct EasyfetchError {
    pub code: EasyfetchErrorCode,
    pub message: String,
    /// libcurl status behind a `Transfer` error
    pub curl_code: Option<c_int>,
}

impl EasyfetchError {
    pub fn new(code: EasyfetchErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            curl_code: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(EasyfetchErrorCode::InvalidArgument, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(EasyfetchErrorCode::InternalError, message)
    }

    /// Convert error to a caller-owned C string
    pub fn to_c_string(&self) -> *mut c_char {
        to_c_string(self.message.as_str())
    }
}

impl From<TransferError> for EasyfetchError {
    fn from(err: TransferError) -> Self {
        Self {
            code: EasyfetchErrorCode::Transfer,
            message: err.to_string(),
            curl_code: Some(err.code),
        }
    }
}

impl From<EntryError> for EasyfetchError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::Usage { .. } => Self::new(EasyfetchErrorCode::Usage, err.to_string()),
            EntryError::Transfer(err) => err.into(),
        }
    }
}

/// Write `err` to `error_out` (if non-null) and return its code
///
/// # Safety
///
/// - `error_out` must be null or a valid pointer to receive error message
pub(crate) unsafe fn report(err: EasyfetchError, error_out: *mut *mut c_char) -> c_int {
    if !error_out.is_null() {
        *error_out = err.to_c_string();
    }
    err.code as c_int
}

/// Helper macro for FFI error handling (for functions returning c_int error codes)
///
/// Writes error message to `error_out` if provided and returns error code.
#[macro_export]
macro_rules! ffi_try {
    ($result:expr, $error_out:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                let easyfetch_err: $crate::error::EasyfetchError = err.into();
                if !$error_out.is_null() {
                    unsafe {
                        *$error_out = easyfetch_err.to_c_string();
                    }
                }
                return easyfetch_err.code as i32;
            }
        }
    };
}

/// Helper macro for FFI error handling (for functions returning pointers)
///
/// Writes error message to `error_out` if provided and returns null pointer.
#[macro_export]
macro_rules! ffi_try_ptr {
    ($result:expr, $error_out:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                let easyfetch_err: $crate::error::EasyfetchError = err.into();
                if !$error_out.is_null() {
                    unsafe {
                        *$error_out = easyfetch_err.to_c_string();
                    }
                }
                return std::ptr::null_mut();
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_error_code_conversion() {
        assert_eq!(EasyfetchErrorCode::from(0), EasyfetchErrorCode::Success);
        assert_eq!(EasyfetchErrorCode::from(1), EasyfetchErrorCode::InvalidArgument);
        assert_eq!(EasyfetchErrorCode::from(2), EasyfetchErrorCode::Usage);
        assert_eq!(EasyfetchErrorCode::from(3), EasyfetchErrorCode::Transfer);
        assert_eq!(EasyfetchErrorCode::from(99), EasyfetchErrorCode::InternalError);
        assert_eq!(EasyfetchErrorCode::from(-5), EasyfetchErrorCode::InternalError);
    }

    #[test]
    fn test_error_code_values() {
        assert_eq!(EasyfetchErrorCode::Success as i32, 0);
        assert_eq!(EasyfetchErrorCode::InvalidArgument as i32, 1);
        assert_eq!(EasyfetchErrorCode::Usage as i32, 2);
        assert_eq!(EasyfetchErrorCode::Transfer as i32, 3);
        assert_eq!(EasyfetchErrorCode::InternalError as i32, 99);
    }

    #[test]
    fn test_from_transfer_error() {
        let err: EasyfetchError = TransferError::new(7, "Couldn't connect to server").into();
        assert_eq!(err.code, EasyfetchErrorCode::Transfer);
        assert_eq!(err.curl_code, Some(7));
        assert_eq!(err.message, "libcurl (code = 7): Couldn't connect to server");
    }

    #[test]
    fn test_from_usage_error() {
        let err: EasyfetchError = EntryError::Usage { got: 0 }.into();
        assert_eq!(err.code, EasyfetchErrorCode::Usage);
        assert_eq!(err.curl_code, None);
        assert!(err.message.starts_with(easyfetch_core::USAGE));
    }

    #[test]
    fn test_from_entry_transfer_error() {
        let err: EasyfetchError =
            EntryError::Transfer(TransferError::new(6, "Could not resolve host")).into();
        assert_eq!(err.code, EasyfetchErrorCode::Transfer);
        assert_eq!(err.curl_code, Some(6));
    }

    #[test]
    fn test_error_to_c_string() {
        let err = EasyfetchError::internal_error("test error");
        let c_str = err.to_c_string();
        assert!(!c_str.is_null());

        unsafe {
            assert_eq!(CStr::from_ptr(c_str).to_str().unwrap(), "test error");
            crate::easyfetch_free_string(c_str);
        }
    }

    #[test]
    fn test_report_null_error_out() {
        let code = unsafe {
            report(
                EasyfetchError::invalid_argument("ignored"),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(code, EasyfetchErrorCode::InvalidArgument as c_int);
    }

    #[test]
    fn test_ffi_try_macro_success() {
        fn test_function(error_out: *mut *mut c_char) -> i32 {
            let result: Result<i32, EasyfetchError> = Ok(42);
            let value = ffi_try!(result, error_out);
            assert_eq!(value, 42);
            0
        }

        let mut error_out: *mut c_char = std::ptr::null_mut();
        assert_eq!(test_function(&mut error_out), 0);
        assert!(error_out.is_null());
    }

    #[test]
    fn test_ffi_try_macro_error() {
        fn test_function(error_out: *mut *mut c_char) -> i32 {
            let result: Result<i32, TransferError> = Err(TransferError::new(3, "No URL set"));
            ffi_try!(result, error_out);
            #[allow(unreachable_code)]
            0
        }

        let mut error_out: *mut c_char = std::ptr::null_mut();
        let result = test_function(&mut error_out);
        assert_eq!(result, EasyfetchErrorCode::Transfer as i32);
        assert!(!error_out.is_null());

        unsafe {
            let msg = CStr::from_ptr(error_out).to_str().unwrap();
            assert_eq!(msg, "libcurl (code = 3): No URL set");
            crate::easyfetch_free_string(error_out);
        }
    }

    #[test]
    fn test_ffi_try_ptr_macro_error() {
        fn test_function(error_out: *mut *mut c_char) -> *mut i32 {
            let result: Result<i32, EasyfetchError> =
                Err(EasyfetchError::internal_error("test error"));
            let value = ffi_try_ptr!(result, error_out);
            Box::into_raw(Box::new(value))
        }

        let mut error_out: *mut c_char = std::ptr::null_mut();
        let result = test_function(&mut error_out);
        assert!(result.is_null());
        assert!(!error_out.is_null());

        unsafe {
            let msg = CStr::from_ptr(error_out).to_str().unwrap();
            assert_eq!(msg, "test error");
            crate::easyfetch_free_string(error_out);
        }
    }
}
