//! Directory enumerator built on walkdir.
//!
//! # Overview
//!
//! This module provides the [`Enumerator`] struct for discovering the
//! candidate image files under a scan root. Traversal is sequential
//! and sorted by file name, so the order in which files are yielded
//! (and therefore which copy of a duplicate pair counts as the
//! "original") is stable across runs.
//!
//! # Features
//!
//! - Deterministic sorted traversal
//! - Case-insensitive extension allow-list filtering
//! - Traversal errors yielded as values, never a panic or an abort
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use dupsleuth::scanner::{Enumerator, ExtensionFilter};
//! use std::path::Path;
//!
//! let enumerator = Enumerator::new(Path::new("/home/user/Pictures"), ExtensionFilter::default());
//! for entry in enumerator.discover() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{EnumerateError, ExtensionFilter};

/// Sequential directory walker for candidate discovery.
///
/// Yields regular files whose extension is in the allow-list.
/// Directories, symlinks, and non-matching files are skipped.
#[derive(Debug)]
pub struct Enumerator {
    /// Root path to walk
    root: PathBuf,
    /// Extension allow-list
    filter: ExtensionFilter,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Enumerator {
    /// Create a new enumerator for the given root.
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory to scan
    /// * `filter` - Extension allow-list
    #[must_use]
    pub fn new(root: &Path, filter: ExtensionFilter) -> Self {
        Self {
            root: root.to_path_buf(),
            filter,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the enumerator stops yielding
    /// entries as soon as possible.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the tree, yielding allow-listed files one at a time.
    ///
    /// Errors (permission denied, vanished entries) are yielded as
    /// [`EnumerateError`] values rather than stopping iteration; the
    /// affected subtree is skipped by walkdir.
    pub fn discover(&self) -> impl Iterator<Item = Result<PathBuf, EnumerateError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| {
                if self.is_shutdown_requested() {
                    log::debug!("Enumerator: shutdown requested, stopping iteration");
                    return None;
                }

                match entry_result {
                    Ok(entry) => {
                        if !entry.file_type().is_file() {
                            return None;
                        }
                        if !self.filter.matches(entry.path()) {
                            log::trace!("Skipping non-image file: {}", entry.path().display());
                            return None;
                        }
                        Some(Ok(entry.into_path()))
                    }
                    Err(e) => {
                        let path = e
                            .path()
                            .map_or_else(|| self.root.clone(), Path::to_path_buf);
                        Some(Err(self.convert_error(path, e)))
                    }
                }
            })
    }

    /// Collect every candidate file, splitting out traversal errors.
    ///
    /// This is the counting pass: the returned list's length is
    /// `total_discovered`, known before any file is processed.
    #[must_use]
    pub fn collect_candidates(&self) -> (Vec<PathBuf>, Vec<EnumerateError>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();

        for entry in self.discover() {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => errors.push(e),
            }
        }

        (files, errors)
    }

    /// Convert a walkdir error to an [`EnumerateError`].
    fn convert_error(&self, path: PathBuf, error: walkdir::Error) -> EnumerateError {
        use std::io::ErrorKind;

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                EnumerateError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::debug!("Path vanished during walk: {}", path.display());
                EnumerateError::NotFound(path)
            }
            _ => {
                log::warn!("Walk error for {}: {}", path.display(), error);
                EnumerateError::Io {
                    path,
                    source: std::io::Error::other(error.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    /// Create a test directory with image and non-image files.
    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        for name in ["b.png", "a.jpg", "c.JPEG", "notes.txt", "clip.gif"] {
            let mut f = File::create(dir.path().join(name)).unwrap();
            writeln!(f, "placeholder content for {}", name).unwrap();
        }

        let subdir = dir.path().join("nested");
        fs::create_dir(&subdir).unwrap();
        let mut f = File::create(subdir.join("deep.png")).unwrap();
        writeln!(f, "nested placeholder").unwrap();

        dir
    }

    #[test]
    fn test_enumerator_filters_by_extension() {
        let dir = create_test_dir();
        let enumerator = Enumerator::new(dir.path(), ExtensionFilter::default());

        let (files, errors) = enumerator.collect_candidates();

        assert!(errors.is_empty());
        assert_eq!(files.len(), 4);

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert!(names.contains(&"a.jpg"));
        assert!(names.contains(&"b.png"));
        assert!(names.contains(&"c.JPEG"));
        assert!(names.contains(&"deep.png"));
        assert!(!names.contains(&"notes.txt"));
        assert!(!names.contains(&"clip.gif"));
    }

    #[test]
    fn test_enumerator_yields_sorted_order() {
        let dir = create_test_dir();
        let enumerator = Enumerator::new(dir.path(), ExtensionFilter::default());

        let (files, _) = enumerator.collect_candidates();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        // Top-level entries in file-name order, nested directory last
        // by its own name position.
        assert_eq!(names, vec!["a.jpg", "b.png", "c.JPEG", "deep.png"]);
    }

    #[test]
    fn test_enumerator_skips_directories() {
        let dir = TempDir::new().unwrap();
        // A directory whose name looks like an image file.
        fs::create_dir(dir.path().join("fake.png")).unwrap();

        let enumerator = Enumerator::new(dir.path(), ExtensionFilter::default());
        let (files, errors) = enumerator.collect_candidates();

        assert!(files.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_enumerator_nonexistent_root_yields_error() {
        let enumerator = Enumerator::new(
            Path::new("/nonexistent/path/12345"),
            ExtensionFilter::default(),
        );

        let (files, errors) = enumerator.collect_candidates();

        assert!(files.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_enumerator_shutdown_flag() {
        let dir = create_test_dir();

        let shutdown = Arc::new(AtomicBool::new(true));
        let enumerator = Enumerator::new(dir.path(), ExtensionFilter::default())
            .with_shutdown_flag(Arc::clone(&shutdown));

        let (files, _) = enumerator.collect_candidates();
        assert!(files.is_empty());
    }

    #[test]
    fn test_enumerator_custom_filter() {
        let dir = create_test_dir();
        let enumerator = Enumerator::new(dir.path(), ExtensionFilter::new(["gif"]));

        let (files, _) = enumerator.collect_candidates();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap(), "clip.gif");
    }
}
