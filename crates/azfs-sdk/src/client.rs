use std::path::Path;

use azfs_namespace::{
    as_directory, container_of, parent_prefix_of, project, trim_trailing, DirectoryEntry,
    ResolvedPath, DELIMITER,
};
use azfs_store::{BlobStore, ContainerInfo, StoreError};
use tracing::{debug, info};

use crate::error::{SdkError, SdkResult};

/// What [`AzFs::rmdir`] removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// The path named a container, which was deleted with all its blobs.
    Container,
    /// The path named a prefix; this many blobs under it were deleted.
    Blobs(usize),
}

/// Directory-style operations over a blob store.
///
/// Paths are virtual paths of the form `container/key`; see
/// [`azfs_namespace::path`]. The store client is injected and reused for
/// every call.
pub struct AzFs<S> {
    store: S,
}

impl<S: BlobStore> AzFs<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // ---- Containers ----

    /// Create the container named by `path`. Returns `false` if it already
    /// existed.
    pub fn mkdir(&self, path: &str) -> SdkResult<bool> {
        let container = container_of(trim_trailing(path));
        debug!(container, "mkdir");
        Ok(self.store.create_container(container)?)
    }

    /// List all containers.
    pub fn lsdir(&self) -> SdkResult<Vec<ContainerInfo>> {
        Ok(self.store.list_containers()?)
    }

    /// Remove a container, or every blob under a prefix inside one.
    ///
    /// `C` and `C/` delete container `C`. `C/docs/` deletes each blob whose
    /// key starts with `docs/`, one call at a time; the first failure stops
    /// the loop and leaves the rest in place.
    pub fn rmdir(&self, path: &str) -> SdkResult<Removal> {
        let resolved = ResolvedPath::parse(trim_trailing(path));
        if resolved.is_container() {
            debug!(container = resolved.container, "rmdir container");
            self.store.delete_container(resolved.container)?;
            return Ok(Removal::Container);
        }

        let prefix = format!("{}{DELIMITER}", resolved.key);
        debug!(container = resolved.container, prefix = %prefix, "rmdir prefix");
        let blobs = self.store.list_blobs(resolved.container, Some(&prefix))?;

        let mut deleted = 0;
        for blob in &blobs {
            if let Err(source) = self.store.delete_blob(resolved.container, &blob.key) {
                if deleted == 0 {
                    return Err(source.into());
                }
                return Err(SdkError::PartialRemoval {
                    path: path.to_string(),
                    deleted,
                    source,
                });
            }
            deleted += 1;
        }
        Ok(Removal::Blobs(deleted))
    }

    // ---- Blobs ----

    /// Upload `local` to `remote`, creating the container if it is missing.
    ///
    /// Container creation and the retried upload happen at most once.
    pub fn put(&self, local: &Path, remote: &str) -> SdkResult<()> {
        let target = ResolvedPath::parse(remote);
        match self
            .store
            .put_blob_from_file(target.container, target.key, local)
        {
            Err(StoreError::ContainerNotFound(_)) => {
                info!(container = target.container, "container missing, creating it");
                self.store.create_container(target.container)?;
                self.store
                    .put_blob_from_file(target.container, target.key, local)?;
                Ok(())
            }
            result => Ok(result?),
        }
    }

    /// Download `remote` into `local`.
    pub fn get(&self, remote: &str, local: &Path) -> SdkResult<()> {
        let source = ResolvedPath::parse(remote);
        self.store
            .get_blob_to_file(source.container, source.key, local)?;
        Ok(())
    }

    /// Delete the blob at `path`.
    pub fn rm(&self, path: &str) -> SdkResult<()> {
        let target = ResolvedPath::parse(path);
        debug!(container = target.container, key = target.key, "rm");
        self.store.delete_blob(target.container, target.key)?;
        Ok(())
    }

    // ---- Listing ----

    /// List one directory level. Every target is treated as a directory:
    /// `C`, `C/` and `/C/` all list the top of container `C`.
    pub fn ls(&self, path: &str) -> SdkResult<Vec<DirectoryEntry>> {
        let dir = as_directory(path);
        let container = container_of(&dir);
        let prefix = parent_prefix_of(&dir);
        let query = prefix.map(|p| format!("{p}{DELIMITER}"));
        debug!(container, prefix = ?query, "ls");

        let blobs = self.store.list_blobs(container, query.as_deref())?;
        Ok(project(prefix, blobs))
    }

    /// Normalize a path for display as the new working directory.
    pub fn chdir(&self, path: &str) -> String {
        as_directory(path).trim_end_matches(DELIMITER).to_string()
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for AzFs<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzFs").field("store", &self.store).finish()
    }
}
