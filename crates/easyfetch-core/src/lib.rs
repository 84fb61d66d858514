//! # easyfetch Core
//!
//! A safe facade over libcurl's blocking "easy" interface.
//!
//! This crate provides:
//! - [`TransferHandle`]: one exclusively owned libcurl session
//! - [`TransferOptions`]: the option bundle a handle is created with
//! - [`entry::fetch`]: the single-argument host entry point
//! - Error types carrying libcurl's numeric code and message
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Host (Rust / C ABI / shell)                    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                     entry::fetch(args)                          │
//! │   (arity check, one transfer, effective URL)                    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                       TransferHandle                            │
//! │   (owned easy session, option setters, blocking perform)        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                     libcurl (curl crate)                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use easyfetch_core::TransferHandle;
//!
//! let mut handle = TransferHandle::create()?;
//! handle.set_url("http://example.com")?;
//! handle.perform()?;
//! println!("{}", handle.effective_url()?);
//! # Ok::<(), easyfetch_core::TransferError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod entry;
pub mod error;
pub mod options;
pub mod transfer;

pub use entry::{EntryError, USAGE, fetch};
pub use error::{ErrorKind, Result, TransferError};
pub use options::{TransferOptions, VerboseSink};
pub use transfer::TransferHandle;

/// Log target used when libcurl's verbose output is routed through `tracing`
pub const WIRE_TARGET: &str = "easyfetch::wire";
