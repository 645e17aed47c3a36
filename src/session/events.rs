//! Progress event model for scan sessions.
//!
//! The scanning worker reports progress through an [`EventSink`].
//! Sinks never mutate scan state; they observe copies of event data.
//! Delivery is fire-and-forget: posting an event must never block the
//! worker, and events for one session arrive in the order they were
//! produced, with the terminal [`ScanEvent::Finished`] always last.

use std::path::PathBuf;

use crossbeam_channel::Sender;

use super::{SessionCounts, SessionStatus};

/// Severity attached to an error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable condition; the scan continues.
    Warning,
    /// Per-file failure; the file was skipped.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One event in a session's progress stream.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// Discovery finished; the denominator for progress fractions is
    /// known before any per-file event fires.
    DiscoveryComplete {
        /// Number of candidate files found under the root.
        total_discovered: usize,
    },

    /// One file was processed (fingerprinted, or skipped on error).
    Progress {
        /// Human-readable progress line.
        message: String,
        /// Files processed so far, including this one.
        scanned: usize,
        /// Total candidate files.
        total: usize,
    },

    /// A duplicate was detected. Fired exactly once per duplicate,
    /// immediately before the quarantine attempt.
    DuplicateFound {
        /// The file about to be quarantined.
        duplicate_path: PathBuf,
        /// The first-seen file with the same fingerprint.
        original_path: PathBuf,
    },

    /// A recoverable error occurred.
    Error {
        /// Description of the failure.
        message: String,
        /// How severe the failure was.
        severity: Severity,
    },

    /// The session reached a terminal state. Always the last event.
    Finished {
        /// How the session ended.
        status: SessionStatus,
        /// Final counters, valid regardless of how many per-file
        /// errors occurred.
        counts: SessionCounts,
    },
}

/// Consumer side of the session event stream.
///
/// Implementations must be cheap and non-blocking; the scanning
/// worker calls [`EventSink::post`] inline between files.
pub trait EventSink: Send + Sync {
    /// Deliver one event. Must not block.
    fn post(&self, event: ScanEvent);
}

/// Sink that forwards events into a crossbeam channel.
///
/// The worker owns the sender; the control context drains the
/// receiver on its own schedule. A disconnected receiver is ignored
/// so a vanished consumer can never stall the scan.
pub struct ChannelSink {
    tx: Sender<ScanEvent>,
}

impl ChannelSink {
    /// Wrap a channel sender.
    #[must_use]
    pub fn new(tx: Sender<ScanEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn post(&self, event: ScanEvent) {
        // Unbounded channel: send never blocks. SendError means the
        // receiver is gone, which is not the worker's problem.
        let _ = self.tx.send(event);
    }
}

/// Sink that discards every event.
///
/// Useful for headless runs and tests that only care about the
/// session outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn post(&self, _event: ScanEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (tx, rx) = unbounded();
        let sink = ChannelSink::new(tx);

        sink.post(ScanEvent::DiscoveryComplete {
            total_discovered: 2,
        });
        sink.post(ScanEvent::Progress {
            message: "Scanning... 1/2 files".to_string(),
            scanned: 1,
            total: 2,
        });

        match rx.recv().unwrap() {
            ScanEvent::DiscoveryComplete { total_discovered } => {
                assert_eq!(total_discovered, 2);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match rx.recv().unwrap() {
            ScanEvent::Progress { scanned, total, .. } => {
                assert_eq!(scanned, 1);
                assert_eq!(total, 2);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_channel_sink_ignores_disconnected_receiver() {
        let (tx, rx) = unbounded();
        let sink = ChannelSink::new(tx);
        drop(rx);

        // Must not panic or block.
        sink.post(ScanEvent::DiscoveryComplete {
            total_discovered: 0,
        });
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
