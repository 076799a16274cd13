use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use azfs_store::BlobInfo;

/// Whether a listing entry is a real blob or a synthesized directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One line of a directory listing.
///
/// Never persisted. Directory entries borrow `size` and `last_modified` from
/// the first blob found beneath them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Name relative to the listed directory, without delimiters.
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

impl DirectoryEntry {
    pub fn file(name: impl Into<String>, blob: &BlobInfo) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            size: blob.size,
            last_modified: blob.last_modified,
        }
    }

    pub fn directory(name: impl Into<String>, first_blob: &BlobInfo) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
            size: first_blob.size,
            last_modified: first_blob.last_modified,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn kinds_order_files_first() {
        let set: BTreeSet<(&str, EntryKind)> = [
            ("sub", EntryKind::Directory),
            ("sub", EntryKind::File),
            ("a.txt", EntryKind::File),
            ("sub", EntryKind::Directory),
        ]
        .into_iter()
        .collect();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![
                ("a.txt", EntryKind::File),
                ("sub", EntryKind::File),
                ("sub", EntryKind::Directory),
            ]
        );
    }
}
