//! Ctrl+C handling for cooperative scan cancellation.
//!
//! The handler sets a shared `AtomicBool` that the scan worker checks
//! at the top of its per-file loop. Nothing is interrupted forcibly:
//! an in-flight decode or trash move always finishes, and the session
//! ends in `Cancelled` with its partial statistics delivered.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared cancellation flag set when Ctrl+C is received.
///
/// Cloning shares the flag. `ShutdownHandler` is `Send` and `Sync`.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with the flag initially unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request cancellation (used by tests and embedders).
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get the flag to hand to the scan session.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Reset the flag, for reuse across tests.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler and return its flag holder.
///
/// The ctrlc hook can only be registered once per process, so repeat
/// calls (parallel tests included) reuse the first handler, reset. If
/// registration fails because some other component owns the hook, an
/// unhooked handler is returned; `request_shutdown` still works.
pub fn install_handler() -> ShutdownHandler {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return handler.clone();
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    match ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let _ = writeln!(std::io::stderr(), "\nInterrupted. Finishing current file...");
        let _ = std::io::stderr().flush();
    }) {
        Ok(()) => {
            let _ = GLOBAL_HANDLER.set(handler.clone());
            handler
        }
        Err(e) => {
            log::debug!("Ctrl+C handler not installed ({}), using unhooked flag", e);
            let fallback = GLOBAL_HANDLER.get_or_init(ShutdownHandler::new).clone();
            fallback.reset();
            fallback
        }
    }
}
