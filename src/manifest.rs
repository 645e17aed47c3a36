//! Durable audit manifest for quarantine actions.
//!
//! Each scan session maintains one append-only text manifest,
//! `duplicates.txt` by default: created fresh (truncated) when the
//! session starts, flushed after every record, closed at session end
//! including early termination. One line is written per *successful*
//! quarantine. The manifest is an audit trail, not a transaction log:
//! a write failure is logged but never unwinds a quarantine that
//! already happened.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default manifest file name, created in the working directory.
pub const DEFAULT_MANIFEST_NAME: &str = "duplicates.txt";

/// Errors from the manifest writer.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest could not be created at session start. This is
    /// the only session-fatal manifest condition.
    #[error("cannot create manifest {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record could not be written or flushed. Scanning continues
    /// with an incomplete audit trail.
    #[error("cannot write manifest record: {0}")]
    Write(#[source] io::Error),
}

/// Append-only writer for the per-session audit manifest.
pub struct ManifestWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    records: usize,
}

impl ManifestWriter {
    /// Create the manifest, truncating any previous content.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Create`] if the file cannot be
    /// opened; callers treat this as session-fatal.
    pub fn create(path: &Path) -> Result<Self, ManifestError> {
        let file = File::create(path).map_err(|e| ManifestError::Create {
            path: path.to_path_buf(),
            source: e,
        })?;

        log::debug!("Manifest opened at {}", path.display());

        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            records: 0,
        })
    }

    /// Append one audit line for a successful quarantine and flush.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Write`] on I/O failure. The record may
    /// be lost; the quarantine it describes is not undone.
    pub fn record(&mut self, original: &Path, duplicate: &Path) -> Result<(), ManifestError> {
        writeln!(
            self.writer,
            "Duplicate found: {} and {} (moved to trash)",
            original.display(),
            duplicate.display()
        )
        .map_err(ManifestError::Write)?;

        // Flush per record so the manifest survives a crash mid-scan.
        self.writer.flush().map_err(ManifestError::Write)?;

        self.records += 1;
        Ok(())
    }

    /// Path the manifest was created at.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far.
    #[must_use]
    pub fn records(&self) -> usize {
        self.records
    }
}

impl Drop for ManifestWriter {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("Failed to flush manifest on close: {}", e);
        }
    }
}
