//! Scan session orchestration.
//!
//! # Overview
//!
//! A [`ScanSession`] is one complete, stateful execution of the
//! enumerate → fingerprint → detect → quarantine pipeline over a
//! single root directory. The session owns the fingerprint index and
//! all counters; observers only ever see copies of event data through
//! an [`events::EventSink`].
//!
//! # Lifecycle
//!
//! `Idle → Counting → Scanning → {Completed, Cancelled, Failed}`
//!
//! - Counting establishes `total_discovered` before the first
//!   per-file event, so progress fractions are meaningful from file 1.
//! - Per-file errors (undecodable images, failed trash moves) are
//!   skip-and-continue; only a missing root or an unopenable manifest
//!   fail the whole session.
//! - Cancellation is cooperative: a shared flag checked at the top of
//!   the per-file loop. An in-flight decode or move always finishes.
//! - Exactly one terminal [`events::ScanEvent::Finished`] is emitted,
//!   after which the session is torn down and the index released.

pub mod events;
pub mod index;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::manifest::{ManifestError, ManifestWriter, DEFAULT_MANIFEST_NAME};
use crate::quarantine::{QuarantineMover, QuarantineOutcome, TrashMover};
use crate::scanner::{Enumerator, ExtensionFilter, FingerprintEngine};

pub use events::{ChannelSink, EventSink, NullSink, ScanEvent, Severity};
pub use index::FingerprintIndex;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// All discovered files were processed.
    Completed,
    /// The cancellation flag was observed mid-scan.
    Cancelled,
    /// A session-fatal condition: invalid root, manifest unopenable,
    /// or a concurrent session already active on the root.
    Failed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Final counters for one session.
///
/// Reported in the terminal event regardless of how many per-file
/// errors occurred along the way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounts {
    /// Candidate files found during the counting pass.
    pub total_discovered: usize,
    /// Files processed (fingerprinted or skipped on error).
    pub scanned: usize,
    /// Duplicates detected against the fingerprint index.
    pub duplicates: usize,
    /// Duplicates successfully moved to trash.
    pub quarantined: usize,
    /// Quarantine attempts that failed; those files stay in place.
    pub quarantine_failures: usize,
    /// Per-file errors (undecodable files, traversal failures).
    pub errors: usize,
}

/// Session-fatal errors.
///
/// Everything else that can go wrong during a scan is recovered
/// per-file and surfaces only as an observability event.
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// The scan root does not exist.
    #[error("scan root does not exist: {0}")]
    RootNotFound(PathBuf),

    /// The scan root is not a directory.
    #[error("scan root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The manifest could not be created at session start.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Another session is already scanning this root.
    #[error("a scan is already running for {0}")]
    AlreadyScanning(PathBuf),
}

/// Result of running a session to its terminal state.
#[derive(Debug)]
pub struct SessionOutcome {
    /// Terminal status.
    pub status: SessionStatus,
    /// Final counters.
    pub counts: SessionCounts,
    /// One outcome per quarantine attempt, in scan order.
    pub quarantine_outcomes: Vec<QuarantineOutcome>,
    /// The fatal error when `status` is [`SessionStatus::Failed`].
    pub error: Option<SessionError>,
}

/// Configuration for one scan session.
#[derive(Clone)]
pub struct SessionConfig {
    /// Root directory to scan.
    pub root: PathBuf,
    /// Extension allow-list for candidate files.
    pub filter: ExtensionFilter,
    /// Where to write the audit manifest.
    pub manifest_path: PathBuf,
    /// Optional cooperative cancellation flag.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Quarantine strategy; defaults to the system trash.
    pub mover: Arc<dyn QuarantineMover>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("root", &self.root)
            .field("filter", &self.filter)
            .field("manifest_path", &self.manifest_path)
            .field("shutdown_flag", &self.shutdown_flag)
            .field("mover", &"<mover>")
            .finish()
    }
}

impl SessionConfig {
    /// Create a configuration for the given root with defaults: the
    /// standard image allow-list, `duplicates.txt` in the working
    /// directory, no cancellation flag, trash-backed quarantine.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            filter: ExtensionFilter::default(),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_NAME),
            shutdown_flag: None,
            mover: Arc::new(TrashMover::new()),
        }
    }

    /// Set the extension allow-list.
    #[must_use]
    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the manifest path.
    #[must_use]
    pub fn with_manifest_path(mut self, path: PathBuf) -> Self {
        self.manifest_path = path;
        self
    }

    /// Set the cancellation flag shared with the control context.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Substitute the quarantine strategy.
    #[must_use]
    pub fn with_mover(mut self, mover: Arc<dyn QuarantineMover>) -> Self {
        self.mover = mover;
        self
    }

    /// Check if cancellation has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Guard against concurrent sessions on one root.
///
/// Cloning shares the underlying registry. Registration is released
/// when the [`RegistryGuard`] drops, so a session that ends by any
/// path (including panic unwind) frees its root.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    active: Arc<Mutex<HashSet<PathBuf>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `root` as actively scanned.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyScanning`] if a session holds
    /// a registration for the same root.
    pub fn acquire(&self, root: &Path) -> Result<RegistryGuard, SessionError> {
        let mut active = self.active.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if !active.insert(root.to_path_buf()) {
            return Err(SessionError::AlreadyScanning(root.to_path_buf()));
        }
        Ok(RegistryGuard {
            registry: self.clone(),
            root: root.to_path_buf(),
        })
    }

    /// Whether a session is currently registered for `root`.
    #[must_use]
    pub fn is_active(&self, root: &Path) -> bool {
        self.active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(root)
    }

    fn release(&self, root: &Path) {
        self.active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(root);
    }
}

/// RAII registration for one active scan root.
#[derive(Debug)]
pub struct RegistryGuard {
    registry: SessionRegistry,
    root: PathBuf,
}

impl Drop for RegistryGuard {
    fn drop(&mut self) {
        self.registry.release(&self.root);
    }
}

/// One stateful execution of the scan pipeline over a root directory.
pub struct ScanSession {
    config: SessionConfig,
    counts: SessionCounts,
    outcomes: Vec<QuarantineOutcome>,
}

impl ScanSession {
    /// Create a session from its configuration. No filesystem work
    /// happens until [`ScanSession::run`].
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            counts: SessionCounts::default(),
            outcomes: Vec::new(),
        }
    }

    /// Run the session to a terminal state.
    ///
    /// Consumes the session: the fingerprint index, manifest handle,
    /// and registry slot are all released on return. Exactly one
    /// terminal event is posted to `sink`, and it is the last event.
    pub fn run(mut self, registry: &SessionRegistry, sink: &dyn EventSink) -> SessionOutcome {
        // Validation: root must exist and be a directory before
        // Counting begins. No partial manifest on failure.
        if !self.config.root.exists() {
            let error = SessionError::RootNotFound(self.config.root.clone());
            return self.fail(error, sink);
        }
        if !self.config.root.is_dir() {
            let error = SessionError::NotADirectory(self.config.root.clone());
            return self.fail(error, sink);
        }

        let _guard = match registry.acquire(&self.config.root) {
            Ok(guard) => guard,
            Err(e) => return self.fail(e, sink),
        };

        let mut manifest = match ManifestWriter::create(&self.config.manifest_path) {
            Ok(writer) => writer,
            Err(e) => return self.fail(SessionError::Manifest(e), sink),
        };

        // Counting pass: the full candidate list is collected before
        // the first progress event, so fractions are meaningful from
        // file 1. Traversal errors are reported and their subtrees
        // skipped.
        let enumerator = Enumerator::new(&self.config.root, self.config.filter.clone());
        let (files, walk_errors) = enumerator.collect_candidates();
        for err in walk_errors {
            self.counts.errors += 1;
            sink.post(ScanEvent::Error {
                message: err.to_string(),
                severity: Severity::Warning,
            });
        }

        self.counts.total_discovered = files.len();
        sink.post(ScanEvent::DiscoveryComplete {
            total_discovered: self.counts.total_discovered,
        });
        log::info!(
            "Scanning {} candidate files under {}",
            self.counts.total_discovered,
            self.config.root.display()
        );

        let engine = FingerprintEngine::new();
        let mut index = FingerprintIndex::new();
        let mut manifest_degraded = false;

        for path in &files {
            // Cooperative cancellation, observed within one file's
            // processing latency.
            if self.config.is_shutdown_requested() {
                log::info!(
                    "Scan cancelled after {}/{} files",
                    self.counts.scanned,
                    self.counts.total_discovered
                );
                return self.finish(SessionStatus::Cancelled, sink);
            }

            match engine.fingerprint(path) {
                Ok(fingerprint) => {
                    if let Some(original) = index.observe(fingerprint, path) {
                        let original = original.to_path_buf();
                        self.counts.duplicates += 1;
                        log::info!("Duplicate found: {}", path.display());

                        sink.post(ScanEvent::DuplicateFound {
                            duplicate_path: path.clone(),
                            original_path: original.clone(),
                        });

                        self.quarantine(path, &original, &mut manifest, &mut manifest_degraded, sink);
                    }
                }
                Err(e) => {
                    self.counts.errors += 1;
                    sink.post(ScanEvent::Error {
                        message: e.to_string(),
                        severity: Severity::Error,
                    });
                }
            }

            self.counts.scanned += 1;
            sink.post(ScanEvent::Progress {
                message: format!(
                    "Scanning... {}/{} files",
                    self.counts.scanned, self.counts.total_discovered
                ),
                scanned: self.counts.scanned,
                total: self.counts.total_discovered,
            });
        }

        self.finish(SessionStatus::Completed, sink)
    }

    /// Quarantine one confirmed duplicate and record it.
    fn quarantine(
        &mut self,
        duplicate: &Path,
        original: &Path,
        manifest: &mut ManifestWriter,
        manifest_degraded: &mut bool,
        sink: &dyn EventSink,
    ) {
        match self.config.mover.quarantine(duplicate) {
            Ok(()) => {
                self.counts.quarantined += 1;
                self.outcomes
                    .push(QuarantineOutcome::succeeded(duplicate.to_path_buf()));

                // Audit trail only; the move is already done and is
                // never unwound on a manifest failure.
                if let Err(e) = manifest.record(original, duplicate) {
                    if !*manifest_degraded {
                        log::error!("Manifest degraded, audit trail incomplete: {}", e);
                        *manifest_degraded = true;
                    }
                }
            }
            Err(e) => {
                self.counts.quarantine_failures += 1;
                log::warn!("Failed to quarantine {}: {}", duplicate.display(), e);
                self.outcomes
                    .push(QuarantineOutcome::failed(duplicate.to_path_buf(), &e));
                sink.post(ScanEvent::Error {
                    message: e.to_string(),
                    severity: Severity::Error,
                });
            }
        }
    }

    /// Emit the terminal event and tear down.
    fn finish(self, status: SessionStatus, sink: &dyn EventSink) -> SessionOutcome {
        sink.post(ScanEvent::Finished {
            status,
            counts: self.counts,
        });
        log::info!(
            "Session {}: {} scanned, {} duplicates, {} quarantined, {} failed",
            status,
            self.counts.scanned,
            self.counts.duplicates,
            self.counts.quarantined,
            self.counts.quarantine_failures
        );
        SessionOutcome {
            status,
            counts: self.counts,
            quarantine_outcomes: self.outcomes,
            error: None,
        }
    }

    /// Emit a fatal error plus the terminal event and tear down.
    fn fail(self, error: SessionError, sink: &dyn EventSink) -> SessionOutcome {
        log::error!("Session failed: {}", error);
        sink.post(ScanEvent::Error {
            message: error.to_string(),
            severity: Severity::Error,
        });
        sink.post(ScanEvent::Finished {
            status: SessionStatus::Failed,
            counts: self.counts,
        });
        SessionOutcome {
            status: SessionStatus::Failed,
            counts: self.counts,
            quarantine_outcomes: self.outcomes,
            error: Some(error),
        }
    }
}
