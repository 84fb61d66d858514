//! The transfer handle: one owned libcurl easy session.
//!
//! A [`TransferHandle`] owns exactly one session from [`TransferHandle::create`]
//! until it is dropped, at which point the session is released. The type is
//! neither `Clone` nor `Copy`, so a session can never be released twice:
//!
//! ```compile_fail
//! fn assert_clone<T: Clone>() {}
//! assert_clone::<easyfetch_core::TransferHandle>();
//! ```
//!
//! Session lifecycle:
//!
//! ```text
//! create() ──► ready ──perform()──► transferred ──drop──► released
//!               │  ▲                    │  ▲
//!               └──┘ set_url() etc.     └──┘ perform() again
//! ```
//!
//! `perform()` blocks the calling thread for DNS, connect and the whole
//! transfer. The handle is `Send` but meant to be used from one thread at a
//! time; each thread that needs a transfer owns its own handle.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use curl::easy::{Easy, InfoType};

use crate::WIRE_TARGET;
use crate::error::{Result, TransferError};
use crate::options::{TransferOptions, VerboseSink};

/// Blocking single-transfer HTTP client session
pub struct TransferHandle {
    easy: Easy,
    sink: VerboseSink,
    performed: u64,
}

impl TransferHandle {
    /// Allocate a new session with the default options applied
    ///
    /// The session's error-message buffer (`CURLOPT_ERRORBUFFER`) is registered
    /// by the session wrapper on allocation, and verbose protocol logging to
    /// the standard diagnostic stream is switched on. Response bodies are
    /// written to stdout, as a bare libcurl session does.
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl rejects one of the default options.
    /// Failure to allocate the session itself aborts the process.
    pub fn create() -> Result<Self> {
        let mut easy = Easy::new();
        easy.verbose(true)?;

        let mut handle = Self {
            easy,
            sink: VerboseSink::Stderr,
            performed: 0,
        };
        handle.write_body_to(std::io::stdout())?;

        tracing::debug!("transfer session created");
        Ok(handle)
    }

    /// Allocate a new session and apply an option bundle
    ///
    /// # Errors
    ///
    /// Returns the first error libcurl reports while applying the options.
    pub fn with_options(options: &TransferOptions) -> Result<Self> {
        let mut handle = Self::create()?;
        handle.set_verbose(options.verbose)?;
        if options.verbose_sink != VerboseSink::Stderr {
            handle.set_verbose_sink(options.verbose_sink)?;
        }
        handle.set_follow_redirects(options.follow_redirects)?;
        handle.set_timeout(options.timeout())?;
        if options.discard_body {
            handle.discard_body()?;
        }
        Ok(handle)
    }

    /// Set the URL of the next transfer
    ///
    /// No validation happens here; libcurl reports malformed URLs from
    /// [`perform`](Self::perform).
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl rejects the option, or if the URL holds an
    /// interior NUL byte and cannot be passed to libcurl at all.
    pub fn set_url(&mut self, url: &str) -> Result<()> {
        self.easy.url(url)?;
        tracing::trace!(url, "url set");
        Ok(())
    }

    /// Toggle libcurl's verbose protocol logging
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl rejects the option.
    pub fn set_verbose(&mut self, on: bool) -> Result<()> {
        self.easy.verbose(on)?;
        Ok(())
    }

    /// Choose where verbose output goes
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl rejects the debug callback.
    pub fn set_verbose_sink(&mut self, sink: VerboseSink) -> Result<()> {
        match sink {
            VerboseSink::Stderr => self.easy.debug_function(write_stderr)?,
            VerboseSink::Log => self.easy.debug_function(log_wire)?,
        }
        self.sink = sink;
        Ok(())
    }

    /// Current verbose sink
    #[must_use]
    pub fn verbose_sink(&self) -> VerboseSink {
        self.sink
    }

    /// Let libcurl follow HTTP redirects
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl rejects the option.
    pub fn set_follow_redirects(&mut self, on: bool) -> Result<()> {
        self.easy.follow_location(on)?;
        Ok(())
    }

    /// Bound the whole transfer; `None` leaves it unbounded
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl rejects the option.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        // zero means "no timeout" to libcurl
        self.easy.timeout(timeout.unwrap_or(Duration::ZERO))?;
        Ok(())
    }

    /// Write response bodies to `writer` instead of stdout
    ///
    /// A failed write aborts the transfer with libcurl's write error (code 23).
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl rejects the write callback.
    pub fn write_body_to<W>(&mut self, mut writer: W) -> Result<()>
    where
        W: Write + Send + 'static,
    {
        self.easy.write_function(move |data| {
            // a short count tells libcurl the write failed
            Ok(writer.write_all(data).map_or(0, |()| data.len()))
        })?;
        Ok(())
    }

    /// Drop response bodies instead of writing them to stdout
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl rejects the write callback.
    pub fn discard_body(&mut self) -> Result<()> {
        self.easy.write_function(|data| Ok(data.len()))?;
        Ok(())
    }

    /// Report download progress as `(total_bytes, received_bytes)`
    ///
    /// `total_bytes` is zero while the size is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl rejects the progress options.
    pub fn set_progress<F>(&mut self, mut progress: F) -> Result<()>
    where
        F: FnMut(u64, u64) + Send + 'static,
    {
        self.easy.progress(true)?;
        self.easy
            .progress_function(move |dl_total, dl_now, _ul_total, _ul_now| {
                progress(dl_total.max(0.0) as u64, dl_now.max(0.0) as u64);
                true
            })?;
        Ok(())
    }

    /// Run one blocking transfer with the current options
    ///
    /// May be called repeatedly; every call is an independent transfer and
    /// replaces the previous effective URL.
    ///
    /// # Errors
    ///
    /// Returns libcurl's status code and message on any non-success result.
    pub fn perform(&mut self) -> Result<()> {
        self.performed += 1;
        tracing::debug!(transfer = self.performed, "performing transfer");

        match self.easy.perform() {
            Ok(()) => {
                tracing::debug!(transfer = self.performed, "transfer complete");
                Ok(())
            }
            Err(err) => {
                let err = TransferError::from(err);
                tracing::warn!(
                    transfer = self.performed,
                    code = err.code,
                    "transfer failed: {}",
                    err.message
                );
                Err(err)
            }
        }
    }

    /// The URL the last transfer actually used
    ///
    /// Reflects redirects libcurl followed. Empty before the first
    /// [`perform`](Self::perform) or when libcurl reports none.
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl fails to report the value.
    pub fn effective_url(&mut self) -> Result<String> {
        if self.performed == 0 {
            return Ok(String::new());
        }
        let url = self.easy.effective_url()?;
        Ok(url.map(str::to_owned).unwrap_or_default())
    }

    /// HTTP status of the last transfer, zero if none was received
    ///
    /// # Errors
    ///
    /// Returns an error if libcurl fails to report the value.
    pub fn response_code(&mut self) -> Result<u32> {
        if self.performed == 0 {
            return Ok(0);
        }
        Ok(self.easy.response_code()?)
    }

    /// Number of times [`perform`](Self::perform) has been called
    #[must_use]
    pub fn transfer_count(&self) -> u64 {
        self.performed
    }
}

impl Drop for TransferHandle {
    fn drop(&mut self) {
        tracing::debug!(transfers = self.performed, "transfer session released");
    }
}

impl fmt::Debug for TransferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferHandle")
            .field("sink", &self.sink)
            .field("performed", &self.performed)
            .finish_non_exhaustive()
    }
}

fn write_stderr(kind: InfoType, data: &[u8]) {
    let prefix = match kind {
        InfoType::Text => "*",
        InfoType::HeaderIn => "<",
        InfoType::HeaderOut => ">",
        _ => return,
    };
    let mut stderr = std::io::stderr().lock();
    let _ = write!(stderr, "{prefix} ");
    let _ = stderr.write_all(data);
}

fn log_wire(kind: InfoType, data: &[u8]) {
    match kind {
        InfoType::Text => {
            let text = String::from_utf8_lossy(data);
            tracing::debug!(target: WIRE_TARGET, "* {}", text.trim_end());
        }
        InfoType::HeaderIn => {
            let text = String::from_utf8_lossy(data);
            tracing::debug!(target: WIRE_TARGET, "< {}", text.trim_end());
        }
        InfoType::HeaderOut => {
            let text = String::from_utf8_lossy(data);
            for line in text.lines().filter(|l| !l.is_empty()) {
                tracing::debug!(target: WIRE_TARGET, "> {}", line);
            }
        }
        InfoType::DataIn => tracing::trace!(target: WIRE_TARGET, bytes = data.len(), "data in"),
        InfoType::DataOut => tracing::trace!(target: WIRE_TARGET, bytes = data.len(), "data out"),
        _ => tracing::trace!(target: WIRE_TARGET, bytes = data.len(), "tls data"),
    }
}
