//! Transfer option bundle.
//!
//! Defaults match a plain libcurl easy session with verbose output switched
//! on: no redirect following, no timeout, body written to stdout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where libcurl's verbose protocol trace is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerboseSink {
    /// The standard diagnostic stream
    #[default]
    Stderr,
    /// `tracing` events at target [`crate::WIRE_TARGET`]
    Log,
}

/// Options applied to a [`crate::TransferHandle`] at creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOptions {
    /// Enable libcurl verbose protocol logging
    #[serde(default = "default_true")]
    pub verbose: bool,
    /// Destination of verbose output
    #[serde(default)]
    pub verbose_sink: VerboseSink,
    /// Follow HTTP redirects inside libcurl
    #[serde(default)]
    pub follow_redirects: bool,
    /// Whole-transfer timeout in seconds; unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Drop the response body instead of writing it to stdout
    #[serde(default)]
    pub discard_body: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            verbose_sink: VerboseSink::Stderr,
            follow_redirects: false,
            timeout_secs: None,
            discard_body: false,
        }
    }
}

impl TransferOptions {
    /// Options with verbose output switched off
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            verbose: false,
            ..Self::default()
        }
    }

    /// Timeout as a `Duration`
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
