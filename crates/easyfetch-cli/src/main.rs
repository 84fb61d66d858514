//! easyfetch CLI
//!
//! Runs one blocking libcurl transfer and prints the effective URL.

mod config;
mod progress;

use clap::Parser;
use std::path::PathBuf;

use config::Config;
use easyfetch_core::{TransferHandle, TransferOptions, VerboseSink};
use progress::DownloadProgress;

/// easyfetch - fetch a URL and print the URL libcurl actually used
#[derive(Parser, Debug)]
#[command(name = "easyfetch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Turn off libcurl's protocol trace
    #[arg(short, long)]
    quiet: bool,

    /// Follow HTTP redirects
    #[arg(short = 'L', long)]
    location: bool,

    /// Abort the transfer after this many seconds
    #[arg(
        long,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..=config::MAX_TIMEOUT_SECS)
    )]
    timeout: Option<u64>,

    /// Do not write the response body to stdout
    #[arg(long)]
    discard_body: bool,

    /// Route libcurl's protocol trace through the logger
    #[arg(long)]
    trace_log: bool,

    /// Show a progress spinner on stderr
    #[arg(long)]
    progress: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL to fetch
    url: String,
}

impl Cli {
    /// Merge command-line flags over the configured transfer options
    fn transfer_options(&self, config: &Config) -> TransferOptions {
        let mut options = config.transfer.clone();
        if self.quiet {
            options.verbose = false;
        }
        if self.trace_log {
            options.verbose_sink = VerboseSink::Log;
        }
        if self.location {
            options.follow_redirects = true;
        }
        if self.timeout.is_some() {
            options.timeout_secs = self.timeout;
        }
        if self.discard_body {
            options.discard_body = true;
        }
        options
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Config::default_path())?,
    };

    config.validate()?;

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.to_lowercase()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(level)
        .init();

    let options = cli.transfer_options(&config);
    let effective_url = fetch_url(&cli.url, &options, cli.progress)?;
    println!("{effective_url}");

    Ok(())
}

/// Transfer `url` once and return the effective URL
fn fetch_url(url: &str, options: &TransferOptions, show_progress: bool) -> anyhow::Result<String> {
    tracing::debug!(url, ?options, "starting transfer");

    let mut handle = TransferHandle::with_options(options)?;
    let progress = show_progress.then(|| DownloadProgress::new(url));
    if let Some(progress) = &progress {
        handle.set_progress(progress.callback())?;
    }

    handle.set_url(url)?;
    if let Err(err) = handle.perform() {
        if let Some(progress) = &progress {
            progress.abandon();
        }
        return Err(err.into());
    }
    if let Some(progress) = &progress {
        progress.finish();
    }

    let effective_url = handle.effective_url()?;
    tracing::info!(
        url,
        effective_url = effective_url.as_str(),
        status = handle.response_code()?,
        "transfer complete"
    );
    Ok(effective_url)
}
