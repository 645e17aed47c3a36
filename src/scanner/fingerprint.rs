//! Perceptual fingerprinting of image content.
//!
//! This module provides the [`FingerprintEngine`] which decodes an
//! image and derives a fixed-length content fingerprint. Fingerprints
//! are DCT-based perceptual hashes, so re-encodes of the same pixels
//! produce the same value, and they are compared by exact equality:
//! two files are duplicates when their fingerprints are identical.

use image_hasher::{HashAlg, HasherConfig};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while fingerprinting a file.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// Failed to open or decode the image.
    #[error("Failed to decode image {0}: {1}")]
    Decode(String, #[source] image::ImageError),
}

/// A fixed-length content fingerprint for one image.
///
/// Stored as the base64 form of the underlying perceptual hash. Equal
/// fingerprints mean duplicate content; no distance comparison is
/// performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The base64 representation of the fingerprint.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes perceptual fingerprints for image files.
pub struct FingerprintEngine {
    hasher: image_hasher::Hasher,
}

impl FingerprintEngine {
    /// Create a new engine with the DCT-preprocessed median hash,
    /// the configuration most resilient to recompression.
    #[must_use]
    pub fn new() -> Self {
        let config = HasherConfig::new().hash_alg(HashAlg::Median).preproc_dct();
        Self {
            hasher: config.to_hasher(),
        }
    }

    /// Decode the file at `path` and compute its fingerprint.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::Decode`] if the file is unreadable,
    /// corrupt, or not a supported image format. Callers treat this
    /// as skip-the-file, never as a fatal condition.
    pub fn fingerprint<P: AsRef<Path>>(&self, path: P) -> Result<Fingerprint, FingerprintError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            log::error!("Failed to decode {}: {}", path.display(), e);
            FingerprintError::Decode(path.display().to_string(), e)
        })?;

        let hash = self.hasher.hash_image(&img);
        Ok(Fingerprint(hash.to_base64()))
    }
}

impl Default for FingerprintEngine {
    fn default() -> Self {
        Self::new()
    }
}
