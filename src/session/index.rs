//! In-memory fingerprint index, the arbiter of duplication.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::Fingerprint;

/// Map from fingerprint to the first path seen with that fingerprint.
///
/// Owned exclusively by the active scan session and discarded at
/// session end. A fingerprint maps to exactly one "original" path for
/// the lifetime of the session: the first file observed with it,
/// regardless of how many later duplicates turn up. The index
/// performs no I/O and has no failure modes.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    entries: HashMap<Fingerprint, PathBuf>,
}

impl FingerprintIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fingerprint observation.
    ///
    /// If the fingerprint is new, `path` becomes its original and
    /// `None` is returned (unique so far). If it was seen before, the
    /// stored original path is returned and the index is unchanged.
    pub fn observe(&mut self, fingerprint: Fingerprint, path: &Path) -> Option<&Path> {
        use std::collections::hash_map::Entry;

        match self.entries.entry(fingerprint) {
            Entry::Occupied(entry) => Some(entry.into_mut().as_path()),
            Entry::Vacant(entry) => {
                entry.insert(path.to_path_buf());
                None
            }
        }
    }

    /// Number of distinct fingerprints observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(engine: &crate::scanner::FingerprintEngine, path: &Path) -> Fingerprint {
        engine.fingerprint(path).unwrap()
    }

    fn write_png(path: &Path, vertical: bool) {
        let img = image::RgbImage::from_fn(64, 64, |x, y| {
            let v = if vertical { (y * 4) as u8 } else { (x * 4) as u8 };
            image::Rgb([v, v, v])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_first_observation_is_unique() {
        let dir = tempfile::tempdir().unwrap();
        let engine = crate::scanner::FingerprintEngine::new();
        let a = dir.path().join("a.png");
        write_png(&a, false);

        let mut index = FingerprintIndex::new();
        assert!(index.observe(fp(&engine, &a), &a).is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_second_observation_reports_original() {
        let dir = tempfile::tempdir().unwrap();
        let engine = crate::scanner::FingerprintEngine::new();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_png(&a, false);
        std::fs::copy(&a, &b).unwrap();

        let mut index = FingerprintIndex::new();
        assert!(index.observe(fp(&engine, &a), &a).is_none());

        let original = index.observe(fp(&engine, &b), &b);
        assert_eq!(original, Some(a.as_path()));
        // The hit must not replace the stored original.
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_first_seen_path_is_permanent() {
        let dir = tempfile::tempdir().unwrap();
        let engine = crate::scanner::FingerprintEngine::new();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let c = dir.path().join("c.png");
        write_png(&a, false);
        std::fs::copy(&a, &b).unwrap();
        std::fs::copy(&a, &c).unwrap();

        let mut index = FingerprintIndex::new();
        index.observe(fp(&engine, &a), &a);

        // Every later duplicate reports the same original.
        assert_eq!(index.observe(fp(&engine, &b), &b), Some(a.as_path()));
        assert_eq!(index.observe(fp(&engine, &c), &c), Some(a.as_path()));
    }

    #[test]
    fn test_distinct_fingerprints_grow_the_index() {
        let dir = tempfile::tempdir().unwrap();
        let engine = crate::scanner::FingerprintEngine::new();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_png(&a, false);
        write_png(&b, true);

        let mut index = FingerprintIndex::new();
        assert!(index.observe(fp(&engine, &a), &a).is_none());
        assert!(index.observe(fp(&engine, &b), &b).is_none());
        assert_eq!(index.len(), 2);
    }
}
