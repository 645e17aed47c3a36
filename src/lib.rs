//! DupSleuth - Duplicate Image Scanner
//!
//! A cross-platform Rust CLI application that walks a directory tree,
//! computes a perceptual fingerprint per image, moves duplicates to
//! the system trash, and records every move in an audit manifest.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod progress;
pub mod quarantine;
pub mod scanner;
pub mod session;
pub mod signal;

use std::thread;

use anyhow::{anyhow, Context};
use crossbeam_channel::unbounded;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::progress::ProgressRenderer;
use crate::scanner::ExtensionFilter;
use crate::session::{ChannelSink, ScanSession, SessionConfig, SessionRegistry};

/// Run the application: one scan session on a worker thread, with the
/// calling thread draining and rendering the event stream.
///
/// # Errors
///
/// Returns an error for session-fatal conditions (invalid root,
/// unopenable manifest, concurrent scan on the same root) and if the
/// worker thread dies.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    // Config-file extensions first, CLI `--ext` additions on top.
    let config = Config::load();
    let extensions: Vec<String> = config
        .extensions
        .iter()
        .cloned()
        .chain(cli.extensions.iter().cloned())
        .collect();

    let handler = signal::install_handler();

    let session_config = SessionConfig::new(&cli.directory)
        .with_filter(ExtensionFilter::new(extensions))
        .with_manifest_path(cli.manifest.clone())
        .with_shutdown_flag(handler.get_flag());

    let registry = SessionRegistry::new();
    let (tx, rx) = unbounded();

    // Worker: runs the session, posting events into the channel.
    // The control context below never blocks it.
    let worker_registry = registry.clone();
    let worker = thread::spawn(move || {
        let sink = ChannelSink::new(tx);
        ScanSession::new(session_config).run(&worker_registry, &sink)
    });

    // Drain until the worker drops its sender (terminal event last).
    let mut renderer = ProgressRenderer::new(cli.quiet).with_color(!cli.no_color);
    for event in rx {
        renderer.handle(&event);
    }

    let outcome = worker
        .join()
        .map_err(|_| anyhow!("scan worker thread panicked"))?;

    if let Some(error) = outcome.error {
        return Err(error).context(format!("scan of {} failed", cli.directory.display()));
    }

    Ok(ExitCode::from_outcome(&outcome))
}
