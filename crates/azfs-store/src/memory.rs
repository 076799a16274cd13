use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::names::{validate_blob_key, validate_container_name};
use crate::traits::BlobStore;
use crate::types::{BlobInfo, ContainerInfo};

#[derive(Clone)]
struct MemoryBlob {
    data: Vec<u8>,
    last_modified: DateTime<Utc>,
}

struct MemoryContainer {
    last_modified: DateTime<Utc>,
    blobs: BTreeMap<String, MemoryBlob>,
}

/// In-memory, `BTreeMap`-based blob store.
///
/// Intended for tests and embedding. Containers and blobs live behind a
/// `RwLock`; ordered maps give sorted listings for free.
pub struct InMemoryBlobStore {
    containers: RwLock<BTreeMap<String, MemoryContainer>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of containers currently stored.
    pub fn container_count(&self) -> usize {
        self.containers.read().expect("lock poisoned").len()
    }

    /// Number of blobs across all containers.
    pub fn blob_count(&self) -> usize {
        self.containers
            .read()
            .expect("lock poisoned")
            .values()
            .map(|c| c.blobs.len())
            .sum()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.containers
            .read()
            .expect("lock poisoned")
            .values()
            .flat_map(|c| c.blobs.values())
            .map(|b| b.data.len() as u64)
            .sum()
    }

    /// Sorted keys of every blob in `container`, or `None` if it does not exist.
    pub fn keys(&self, container: &str) -> Option<Vec<String>> {
        let map = self.containers.read().expect("lock poisoned");
        map.get(container).map(|c| c.blobs.keys().cloned().collect())
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn create_container(&self, name: &str) -> StoreResult<bool> {
        validate_container_name(name)?;
        let mut map = self.containers.write().expect("lock poisoned");
        if map.contains_key(name) {
            return Ok(false);
        }
        map.insert(
            name.to_string(),
            MemoryContainer {
                last_modified: Utc::now(),
                blobs: BTreeMap::new(),
            },
        );
        debug!(container = name, "created container");
        Ok(true)
    }

    fn list_containers(&self) -> StoreResult<Vec<ContainerInfo>> {
        let map = self.containers.read().expect("lock poisoned");
        Ok(map
            .iter()
            .map(|(name, c)| ContainerInfo {
                name: name.clone(),
                last_modified: c.last_modified,
            })
            .collect())
    }

    fn delete_container(&self, name: &str) -> StoreResult<()> {
        validate_container_name(name)?;
        let mut map = self.containers.write().expect("lock poisoned");
        map.remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::ContainerNotFound(name.to_string()))
    }

    fn list_blobs(&self, container: &str, prefix: Option<&str>) -> StoreResult<Vec<BlobInfo>> {
        validate_container_name(container)?;
        let map = self.containers.read().expect("lock poisoned");
        let c = map
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        let prefix = prefix.unwrap_or("");
        Ok(c.blobs
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, blob)| BlobInfo::new(key.clone(), blob.data.len() as u64, blob.last_modified))
            .collect())
    }

    fn put_blob(&self, container: &str, key: &str, data: &[u8]) -> StoreResult<()> {
        validate_container_name(container)?;
        validate_blob_key(key)?;
        let mut map = self.containers.write().expect("lock poisoned");
        let c = map
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        c.blobs.insert(
            key.to_string(),
            MemoryBlob {
                data: data.to_vec(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    fn get_blob(&self, container: &str, key: &str) -> StoreResult<Vec<u8>> {
        validate_container_name(container)?;
        validate_blob_key(key)?;
        let map = self.containers.read().expect("lock poisoned");
        let c = map
            .get(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        c.blobs
            .get(key)
            .map(|b| b.data.clone())
            .ok_or_else(|| StoreError::BlobNotFound {
                container: container.to_string(),
                key: key.to_string(),
            })
    }

    fn delete_blob(&self, container: &str, key: &str) -> StoreResult<()> {
        validate_container_name(container)?;
        validate_blob_key(key)?;
        let mut map = self.containers.write().expect("lock poisoned");
        let c = map
            .get_mut(container)
            .ok_or_else(|| StoreError::ContainerNotFound(container.to_string()))?;
        c.blobs
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::BlobNotFound {
                container: container.to_string(),
                key: key.to_string(),
            })
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("container_count", &self.container_count())
            .field("blob_count", &self.blob_count())
            .finish()
    }
}
