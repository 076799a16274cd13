//! Projection of a flat, sorted blob listing onto a single directory level.
//!
//! Given the blobs under prefix `P` (sorted ascending by key), every blob is
//! either a file directly under `P` or lives in some subdirectory `P/s/...`.
//! Files are emitted as-is with `P/` stripped. Each distinct `s` is emitted
//! once as a directory.
//!
//! Deduplication is streaming: the projector only remembers the previous
//! subdirectory prefix. Because all keys beginning with `P/s/` are contiguous
//! in sorted order, that single comparison is enough. Unsorted input breaks
//! this and yields duplicate directory entries; it is detected and logged but
//! not corrected.

use azfs_store::BlobInfo;
use tracing::{debug, warn};

use crate::entry::DirectoryEntry;
use crate::path::{parent_prefix_of_key, DELIMITER};

/// Streaming projection of blobs into directory entries.
///
/// Built with [`Projection::new`]; yields [`DirectoryEntry`] values in the
/// order of the underlying listing.
pub struct Projection<'p, I> {
    blobs: I,
    prefix: Option<&'p str>,
    /// Sub-prefix (`P/s`) of the last directory emitted or skipped.
    last_sub_prefix: Option<String>,
    last_key: Option<String>,
    unsorted: bool,
}

impl<'p, I> Projection<'p, I>
where
    I: Iterator<Item = BlobInfo>,
{
    /// Project `blobs`, which were listed under `prefix`.
    ///
    /// `prefix` is the directory being listed without its trailing delimiter,
    /// or `None` for the top level of the container.
    pub fn new(prefix: Option<&'p str>, blobs: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            blobs: blobs.into_iter(),
            prefix,
            last_sub_prefix: None,
            last_key: None,
            unsorted: false,
        }
    }

    /// `true` once a key arrived that sorts before its predecessor.
    pub fn saw_unsorted_input(&self) -> bool {
        self.unsorted
    }

    fn check_order(&mut self, key: &str) {
        if let Some(last) = &self.last_key {
            if key < last.as_str() && !self.unsorted {
                warn!(key, previous = %last, "blob listing is not sorted; directory entries may repeat");
                self.unsorted = true;
            }
        }
        self.last_key = Some(key.to_string());
    }

    /// The part of `key` below the listed prefix.
    fn relative<'k>(&self, key: &'k str) -> Option<&'k str> {
        match self.prefix {
            None => Some(key),
            Some(prefix) => key.strip_prefix(prefix)?.strip_prefix(DELIMITER),
        }
    }

    fn step(&mut self, blob: &BlobInfo) -> Option<DirectoryEntry> {
        self.check_order(&blob.key);

        let Some(relative) = self.relative(&blob.key) else {
            warn!(key = %blob.key, prefix = ?self.prefix, "blob outside listed prefix");
            return None;
        };

        if parent_prefix_of_key(&blob.key) == self.prefix {
            if relative.is_empty() {
                debug!(key = %blob.key, "skipping directory marker blob");
                return None;
            }
            return Some(DirectoryEntry::file(relative, blob));
        }

        // Deeper than one level: `relative` contains at least one delimiter.
        let name = relative
            .split_once(DELIMITER)
            .map_or(relative, |(first, _)| first);
        let sub_prefix_len = blob.key.len() - relative.len() + name.len();
        let sub_prefix = &blob.key[..sub_prefix_len];

        if self.last_sub_prefix.as_deref() == Some(sub_prefix) {
            return None;
        }
        self.last_sub_prefix = Some(sub_prefix.to_string());

        if name.is_empty() {
            debug!(key = %blob.key, "skipping blob under an empty path segment");
            return None;
        }
        Some(DirectoryEntry::directory(name, blob))
    }
}

impl<I> Iterator for Projection<'_, I>
where
    I: Iterator<Item = BlobInfo>,
{
    type Item = DirectoryEntry;

    fn next(&mut self) -> Option<DirectoryEntry> {
        loop {
            let blob = self.blobs.next()?;
            if let Some(entry) = self.step(&blob) {
                return Some(entry);
            }
        }
    }
}

/// Project a sorted listing taken under `prefix` into one directory level.
pub fn project<B>(prefix: Option<&str>, blobs: B) -> Vec<DirectoryEntry>
where
    B: IntoIterator<Item = BlobInfo>,
{
    Projection::new(prefix, blobs).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn blobs(keys: &[&str]) -> Vec<BlobInfo> {
        keys.iter()
            .enumerate()
            .map(|(i, key)| {
                BlobInfo::new(*key, 10 * i as u64, Utc.timestamp_opt(1_700_000_000, 0).unwrap())
            })
            .collect()
    }

    fn names(entries: &[DirectoryEntry]) -> Vec<(String, EntryKind)> {
        entries.iter().map(|e| (e.name.clone(), e.kind)).collect()
    }

    const SAMPLE: &[&str] = &["docs/a.txt", "docs/sub/b.txt", "docs/sub/c.txt", "e.txt"];

    #[test]
    fn root_listing_collapses_subdirectories() {
        let entries = project(None, blobs(SAMPLE));
        assert_eq!(
            names(&entries),
            vec![
                ("docs".to_string(), EntryKind::Directory),
                ("e.txt".to_string(), EntryKind::File),
            ]
        );
    }

    #[test]
    fn prefix_listing_strips_prefix() {
        let listed: Vec<_> = blobs(SAMPLE)
            .into_iter()
            .filter(|b| b.key.starts_with("docs/"))
            .collect();
        let entries = project(Some("docs"), listed);
        assert_eq!(
            names(&entries),
            vec![
                ("a.txt".to_string(), EntryKind::File),
                ("sub".to_string(), EntryKind::Directory),
            ]
        );
    }

    #[test]
    fn deep_only_subdirectory_is_listed() {
        let entries = project(None, blobs(&["x/y/z/file", "x/y/z/other"]));
        assert_eq!(names(&entries), vec![("x".to_string(), EntryKind::Directory)]);
    }

    #[test]
    fn file_metadata_is_preserved() {
        let input = blobs(&["a", "b"]);
        let entries = project(None, input.clone());
        assert_eq!(entries[1].size, input[1].size);
        assert_eq!(entries[1].last_modified, input[1].last_modified);
        assert!(!entries[1].is_directory());
    }

    #[test]
    fn directory_takes_first_blob_metadata() {
        let input = blobs(&["d/1", "d/2"]);
        let entries = project(None, input.clone());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].size, input[0].size);
    }

    #[test]
    fn file_and_directory_with_same_name() {
        let entries = project(None, blobs(&["docs", "docs/a"]));
        assert_eq!(
            names(&entries),
            vec![
                ("docs".to_string(), EntryKind::File),
                ("docs".to_string(), EntryKind::Directory),
            ]
        );
    }

    #[test]
    fn sibling_with_shared_name_prefix() {
        // "docs.txt" sorts between nothing and "docs/..." but must not merge.
        let entries = project(None, blobs(&["docs.txt", "docs/a", "docs2/b"]));
        assert_eq!(
            names(&entries),
            vec![
                ("docs.txt".to_string(), EntryKind::File),
                ("docs".to_string(), EntryKind::Directory),
                ("docs2".to_string(), EntryKind::Directory),
            ]
        );
    }

    #[test]
    fn directory_marker_is_skipped() {
        let entries = project(Some("docs"), blobs(&["docs/", "docs/a"]));
        assert_eq!(names(&entries), vec![("a".to_string(), EntryKind::File)]);
    }

    #[test]
    fn blobs_outside_prefix_are_skipped() {
        let entries = project(Some("docs"), blobs(&["docs/a", "docs2/b", "other"]));
        assert_eq!(names(&entries), vec![("a".to_string(), EntryKind::File)]);
    }

    #[test]
    fn nested_prefix() {
        let entries = project(
            Some("a/b"),
            blobs(&["a/b/c.txt", "a/b/d/e.txt", "a/b/d/f/g.txt", "a/b/h/i"]),
        );
        assert_eq!(
            names(&entries),
            vec![
                ("c.txt".to_string(), EntryKind::File),
                ("d".to_string(), EntryKind::Directory),
                ("h".to_string(), EntryKind::Directory),
            ]
        );
    }

    #[test]
    fn empty_listing() {
        assert!(project(None, Vec::new()).is_empty());
    }

    #[test]
    fn unsorted_input_is_detected() {
        let mut projection = Projection::new(None, blobs(&["d/1", "e/1", "d/2"]));
        let entries: Vec<_> = projection.by_ref().collect();
        assert!(projection.saw_unsorted_input());
        // The single-comparison dedup cannot recover from this.
        assert_eq!(entries.iter().filter(|e| e.name == "d").count(), 2);
    }

    #[test]
    fn sorted_input_is_not_flagged() {
        let mut projection = Projection::new(None, blobs(SAMPLE));
        projection.by_ref().for_each(drop);
        assert!(!projection.saw_unsorted_input());
    }

    #[test]
    fn projection_is_idempotent() {
        let first = project(None, blobs(SAMPLE));
        let second = project(None, blobs(SAMPLE));
        assert_eq!(first, second);
    }

    #[test]
    fn entries_serialize_with_lowercase_kind() {
        let entries = project(None, blobs(&["d/x"]));
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["kind"], "directory");
        assert_eq!(json["name"], "d");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn key_sets() -> impl Strategy<Value = BTreeSet<String>> {
            prop::collection::btree_set("[ab]{1,2}(/[ab]{1,2}){0,3}", 0..24)
        }

        fn listing(keys: &BTreeSet<String>) -> Vec<BlobInfo> {
            keys.iter()
                .map(|k| BlobInfo::new(k.clone(), 0, Utc.timestamp_opt(0, 0).unwrap()))
                .collect()
        }

        proptest! {
            #[test]
            fn root_matches_set_semantics(keys in key_sets()) {
                let entries = project(None, listing(&keys));

                let files: BTreeSet<String> =
                    keys.iter().filter(|k| !k.contains('/')).cloned().collect();
                let dirs: BTreeSet<String> = keys
                    .iter()
                    .filter_map(|k| k.split_once('/').map(|(d, _)| d.to_string()))
                    .collect();

                let got_files: Vec<String> = entries
                    .iter()
                    .filter(|e| e.kind == EntryKind::File)
                    .map(|e| e.name.clone())
                    .collect();
                let got_dirs: Vec<String> = entries
                    .iter()
                    .filter(|e| e.kind == EntryKind::Directory)
                    .map(|e| e.name.clone())
                    .collect();

                prop_assert_eq!(got_files.len(), files.len());
                prop_assert_eq!(got_dirs.len(), dirs.len());
                prop_assert_eq!(got_files.into_iter().collect::<BTreeSet<_>>(), files);
                prop_assert_eq!(got_dirs.into_iter().collect::<BTreeSet<_>>(), dirs);
            }

            #[test]
            fn prefixed_listing_has_no_duplicates(keys in key_sets()) {
                let listed: Vec<BlobInfo> = listing(&keys)
                    .into_iter()
                    .filter(|b| b.key.starts_with("a/"))
                    .collect();
                let entries = project(Some("a"), listed);
                let unique: BTreeSet<(String, EntryKind)> =
                    entries.iter().map(|e| (e.name.clone(), e.kind)).collect();
                prop_assert_eq!(unique.len(), entries.len());
                prop_assert!(entries.iter().all(|e| !e.name.is_empty() && !e.name.contains('/')));
            }

            #[test]
            fn projection_is_deterministic(keys in key_sets()) {
                prop_assert_eq!(project(None, listing(&keys)), project(None, listing(&keys)));
            }
        }
    }
}
