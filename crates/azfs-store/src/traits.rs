use std::path::Path;

use tracing::debug;

use crate::error::StoreResult;
use crate::types::{BlobInfo, ContainerInfo};

/// A flat container/blob store.
///
/// All implementations must satisfy these invariants:
/// - Containers cannot contain containers; blob keys are opaque strings.
/// - `list_blobs` returns blobs sorted ascending by key.
/// - Operations on an absent container fail with
///   [`StoreError::ContainerNotFound`](crate::StoreError::ContainerNotFound);
///   reads and deletes of an absent blob fail with
///   [`StoreError::BlobNotFound`](crate::StoreError::BlobNotFound).
/// - Invalid container names and blob keys are rejected here, not by callers.
pub trait BlobStore: Send + Sync {
    /// Create a container. Returns `true` if it was created, `false` if it
    /// already existed.
    fn create_container(&self, name: &str) -> StoreResult<bool>;

    /// List all containers, sorted by name.
    fn list_containers(&self) -> StoreResult<Vec<ContainerInfo>>;

    /// Delete a container and every blob in it.
    fn delete_container(&self, name: &str) -> StoreResult<()>;

    /// List the blobs of `container` whose key starts with `prefix`.
    ///
    /// `None` lists the whole container. The prefix is matched as a raw
    /// string: callers wanting one "directory" pass it with a trailing `/`.
    fn list_blobs(&self, container: &str, prefix: Option<&str>) -> StoreResult<Vec<BlobInfo>>;

    /// Write a blob, replacing any existing blob with the same key.
    fn put_blob(&self, container: &str, key: &str, data: &[u8]) -> StoreResult<()>;

    /// Read a blob's full contents.
    fn get_blob(&self, container: &str, key: &str) -> StoreResult<Vec<u8>>;

    /// Delete a single blob.
    fn delete_blob(&self, container: &str, key: &str) -> StoreResult<()>;

    /// Upload the contents of a local file.
    ///
    /// Default implementation reads the file and calls `put_blob()`. Backends
    /// may override to stream instead of buffering.
    fn put_blob_from_file(&self, container: &str, key: &str, path: &Path) -> StoreResult<()> {
        let data = std::fs::read(path)?;
        debug!(container, key, path = %path.display(), bytes = data.len(), "uploading file");
        self.put_blob(container, key, &data)
    }

    /// Download a blob into a local file, creating or truncating it.
    ///
    /// Default implementation calls `get_blob()` and writes the result.
    fn get_blob_to_file(&self, container: &str, key: &str, path: &Path) -> StoreResult<()> {
        let data = self.get_blob(container, key)?;
        debug!(container, key, path = %path.display(), bytes = data.len(), "downloading to file");
        std::fs::write(path, data)?;
        Ok(())
    }
}
