//! Error types for easyfetch transfers.
//!
//! Every libcurl call that reports a non-success status surfaces as a
//! [`TransferError`] carrying the numeric libcurl code and the message text.
//! The message is the contents of the session's error buffer when libcurl
//! wrote one, otherwise the static `curl_easy_strerror` description.
//!
//! Nothing is retried. [`ErrorKind`] is a display-level classification only:
//! transient and permanent failures travel through the same channel.

use thiserror::Error;

/// Result alias for transfer operations
pub type Result<T> = std::result::Result<T, TransferError>;

/// A non-success status reported by libcurl
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("libcurl (code = {code}): {message}")]
pub struct TransferError {
    /// Numeric libcurl status (`CURLcode`)
    pub code: i32,
    /// Human-readable message from the error buffer or libcurl's string table
    pub message: String,
    kind: ErrorKind,
}

/// Coarse classification of a libcurl failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// URL could not be parsed or uses an unsupported scheme
    Url,
    /// Host name could not be resolved
    Resolve,
    /// TCP connection could not be established
    Connect,
    /// Configured timeout elapsed
    Timeout,
    /// Anything else
    Other,
}

impl TransferError {
    /// Build an error from a raw code and message
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            kind: ErrorKind::Other,
        }
    }

    /// Classification of this failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<curl::Error> for TransferError {
    fn from(err: curl::Error) -> Self {
        let kind = if err.is_url_malformed() || err.is_unsupported_protocol() {
            ErrorKind::Url
        } else if err.is_couldnt_resolve_host() || err.is_couldnt_resolve_proxy() {
            ErrorKind::Resolve
        } else if err.is_couldnt_connect() {
            ErrorKind::Connect
        } else if err.is_operation_timedout() {
            ErrorKind::Timeout
        } else {
            ErrorKind::Other
        };

        let message = match err.extra_description() {
            Some(extra) if !extra.trim().is_empty() => extra.trim_end().to_string(),
            _ => err.description().to_string(),
        };

        Self {
            code: err.code() as i32,
            message,
            kind,
        }
    }
}
