//! Download progress display.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Download progress tracker fed from libcurl's progress callback
pub struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    /// Create a new progress tracker for `url`
    #[must_use]
    pub fn new(url: &str) -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg} {bytes} ({bytes_per_sec})")
                .expect("Invalid progress template"),
        );
        bar.set_message(format!("Fetching {url}"));
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Progress callback for `TransferHandle::set_progress`
    pub fn callback(&self) -> impl FnMut(u64, u64) + Send + 'static {
        let bar = self.bar.clone();
        move |total, now| {
            if total > 0 && bar.length() != Some(total) {
                bar.set_length(total);
            }
            bar.set_position(now);
        }
    }

    /// Finish with a summary of the bytes received
    pub fn finish(&self) {
        let received = format_bytes(self.bar.position());
        self.bar.finish_with_message(format!("Received {received}"));
    }

    /// Abandon the progress display (for errors)
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

/// Format bytes in human-readable format
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{size:.2} {}", UNITS[unit_idx])
}
