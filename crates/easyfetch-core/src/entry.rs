//! Host entry point: one URL in, the effective URL out.

use thiserror::Error;

use crate::error::TransferError;
use crate::options::TransferOptions;
use crate::transfer::TransferHandle;

/// Usage text shown on a wrong-arity call
pub const USAGE: &str = "usage: easyfetch URL";

/// Errors from [`fetch`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// Called with anything other than exactly one argument
    #[error("usage: easyfetch URL (expected 1 argument, got {got})")]
    Usage {
        /// Number of arguments received
        got: usize,
    },

    /// libcurl reported a failure
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl EntryError {
    /// libcurl status code, if this is a transfer failure
    #[must_use]
    pub fn curl_code(&self) -> Option<i32> {
        match self {
            EntryError::Usage { .. } => None,
            EntryError::Transfer(err) => Some(err.code),
        }
    }
}

/// Transfer the single URL in `args` and return the effective URL
///
/// The arity check happens before any session is created, so a wrong-arity
/// call never touches the network.
///
/// # Errors
///
/// [`EntryError::Usage`] unless `args` holds exactly one element, otherwise
/// any libcurl failure as [`EntryError::Transfer`].
pub fn fetch<S: AsRef<str>>(
    args: &[S],
    options: &TransferOptions,
) -> Result<String, EntryError> {
    let [url] = args else {
        tracing::warn!(got = args.len(), "{USAGE}");
        return Err(EntryError::Usage { got: args.len() });
    };

    let mut handle = TransferHandle::with_options(options)?;
    handle.set_url(url.as_ref())?;
    handle.perform()?;
    Ok(handle.effective_url()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_args_is_usage() {
        let args: [&str; 0] = [];
        let err = fetch(&args, &TransferOptions::quiet()).unwrap_err();
        assert_eq!(err, EntryError::Usage { got: 0 });
        assert_eq!(err.curl_code(), None);
    }

    #[test]
    fn test_two_args_is_usage() {
        let err = fetch(
            &["http://a.invalid", "http://b.invalid"],
            &TransferOptions::quiet(),
        )
        .unwrap_err();
        assert_eq!(err, EntryError::Usage { got: 2 });
    }

    #[test]
    fn test_usage_message() {
        let err = EntryError::Usage { got: 3 };
        let msg = err.to_string();
        assert!(msg.starts_with(USAGE));
        assert!(msg.contains("got 3"));
    }

    #[test]
    fn test_transfer_failure_carries_code() {
        let err = fetch(&["http://127.0.0.1:1/"], &TransferOptions::quiet()).unwrap_err();
        assert_eq!(err.curl_code(), Some(7));
        assert!(err.to_string().starts_with("libcurl (code = 7): "));
    }

    #[test]
    fn test_owned_string_args() {
        let args = vec![String::from("nosuchscheme://host/")];
        let err = fetch(&args, &TransferOptions::quiet()).unwrap_err();
        assert!(matches!(err, EntryError::Transfer(_)));
    }
}
