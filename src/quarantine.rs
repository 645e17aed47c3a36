//! Recoverable quarantine of duplicate files.
//!
//! # Overview
//!
//! A confirmed duplicate is quarantined by moving it to the system
//! trash, never by unlinking it, so the action stays user-reversible.
//! From the caller's perspective the move is atomic: afterwards the
//! file is either gone from its original path or untouched, with the
//! failure returned as a value.
//!
//! # Safety
//!
//! Failures never escape as panics and never abort the scan; the
//! session logs them, skips the file, and moves on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for quarantine operations.
#[derive(Debug, Error)]
pub enum QuarantineError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to move the file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The trash operation itself failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl QuarantineError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Outcome of one quarantine attempt. One per duplicate; a failed
/// attempt is never retried automatically.
#[derive(Debug, Clone)]
pub struct QuarantineOutcome {
    /// Path the attempt targeted.
    pub path: PathBuf,
    /// Whether the file was relocated.
    pub success: bool,
    /// Failure description when `success` is false.
    pub error: Option<String>,
}

impl QuarantineOutcome {
    /// Outcome for a relocated file.
    #[must_use]
    pub fn succeeded(path: PathBuf) -> Self {
        Self {
            path,
            success: true,
            error: None,
        }
    }

    /// Outcome for a failed attempt; the file is still in place.
    #[must_use]
    pub fn failed(path: PathBuf, error: &QuarantineError) -> Self {
        Self {
            path,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Relocates confirmed duplicates to a recoverable location.
///
/// The production implementation is [`TrashMover`]. The trait exists
/// so tests and embedders can substitute their own relocation
/// strategy without touching the session loop.
pub trait QuarantineMover: Send + Sync {
    /// Move `path` out of its directory.
    ///
    /// # Errors
    ///
    /// On error the file remains exactly where it was.
    fn quarantine(&self, path: &Path) -> Result<(), QuarantineError>;
}

/// Mover backed by the platform trash/recycle facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrashMover;

impl TrashMover {
    /// Create a new trash-backed mover.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl QuarantineMover for TrashMover {
    fn quarantine(&self, path: &Path) -> Result<(), QuarantineError> {
        // Existence check first so a vanished file reports NotFound
        // rather than a platform-specific trash error.
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => QuarantineError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => {
                QuarantineError::PermissionDenied(path.to_path_buf())
            }
            _ => QuarantineError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let size = metadata.len();

        trash::delete(path).map_err(|e| {
            log::error!("Trash operation failed for {}: {}", path.display(), e);
            QuarantineError::TrashFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        log::info!("Moved to trash: {} ({} bytes)", path.display(), size);
        Ok(())
    }
}
