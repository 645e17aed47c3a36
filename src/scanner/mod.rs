//! Scanner module for image discovery and fingerprinting.
//!
//! This module provides functionality for:
//! - Deterministic directory traversal filtered by an image-extension
//!   allow-list
//! - Perceptual fingerprinting of decoded images
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`enumerator`]: Directory traversal and candidate discovery
//! - [`fingerprint`]: Image decoding and perceptual hashing
//!
//! # Example
//!
//! ```no_run
//! use dupsleuth::scanner::{Enumerator, ExtensionFilter};
//! use std::path::Path;
//!
//! let filter = ExtensionFilter::default();
//! let enumerator = Enumerator::new(Path::new("/home/user/Pictures"), filter);
//! for entry in enumerator.discover() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod enumerator;
pub mod fingerprint;

use std::path::{Path, PathBuf};

// Re-export main types
pub use enumerator::Enumerator;
pub use fingerprint::{Fingerprint, FingerprintEngine, FingerprintError};

/// Extensions scanned when the user supplies no override.
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Case-insensitive extension allow-list for candidate files.
///
/// Extensions are stored lowercase without a leading dot. A file
/// matches when its extension, lowercased, is in the list.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Create a filter from a list of extensions.
    ///
    /// Leading dots are stripped and entries are lowercased, so
    /// `".PNG"`, `"png"`, and `"Png"` are all the same entry.
    #[must_use]
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Check whether a path's extension is in the allow-list.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }

    /// The extensions in this filter, lowercase, without dots.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

/// Errors that can occur during directory enumeration.
///
/// Enumeration errors are yielded as values and never stop the
/// traversal; the affected subtree is skipped.
#[derive(thiserror::Error, Debug)]
pub enum EnumerateError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_matches_allow_list() {
        let filter = ExtensionFilter::default();

        assert!(filter.matches(Path::new("/a/photo.png")));
        assert!(filter.matches(Path::new("/a/photo.jpg")));
        assert!(filter.matches(Path::new("/a/photo.jpeg")));
        assert!(!filter.matches(Path::new("/a/photo.gif")));
        assert!(!filter.matches(Path::new("/a/notes.txt")));
        assert!(!filter.matches(Path::new("/a/no_extension")));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = ExtensionFilter::default();

        assert!(filter.matches(Path::new("/a/photo.PNG")));
        assert!(filter.matches(Path::new("/a/photo.Jpg")));
        assert!(filter.matches(Path::new("/a/photo.JPEG")));
    }

    #[test]
    fn test_filter_normalizes_entries() {
        let filter = ExtensionFilter::new([".WEBP", "Png", ""]);

        assert_eq!(
            filter.extensions(),
            &["webp".to_string(), "png".to_string()]
        );
        assert!(filter.matches(Path::new("/a/pic.webp")));
        assert!(filter.matches(Path::new("/a/pic.png")));
        assert!(!filter.matches(Path::new("/a/pic.jpg")));
    }

    #[test]
    fn test_enumerate_error_display() {
        let err = EnumerateError::PermissionDenied(PathBuf::from("/test"));
        assert_eq!(err.to_string(), "Permission denied: /test");

        let err = EnumerateError::NotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Path not found: /missing");
    }
}
