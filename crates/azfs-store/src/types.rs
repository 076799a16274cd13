use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A container as reported by [`crate::BlobStore::list_containers`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub name: String,
    pub last_modified: DateTime<Utc>,
}

/// A blob as reported by [`crate::BlobStore::list_blobs`].
///
/// The key is relative to its container and may contain `/` delimiters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobInfo {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

impl BlobInfo {
    pub fn new(key: impl Into<String>, size: u64, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
        }
    }
}
