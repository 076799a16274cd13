use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::names::{validate_blob_key, validate_container_name};
use crate::traits::BlobStore;
use crate::types::{BlobInfo, ContainerInfo};

/// Suffix for in-flight writes; such files are invisible to listings.
const TEMP_SUFFIX: &str = ".partial";
/// Suffix of the sidecar file holding a blob's key.
const KEY_SUFFIX: &str = ".key";
/// Hex digits of the digest used as the shard directory name.
const SHARD_LEN: usize = 2;
/// Hex length of a BLAKE3 digest.
const DIGEST_HEX_LEN: usize = 64;
const COPY_BUF_LEN: usize = 64 * 1024;

/// Directory-backed blob store.
///
/// Layout: `<root>/<container>/<shard>/<digest>` with the key itself in
/// `<digest>.key` next to the data. `digest` is the hex BLAKE3 hash of the
/// key and `shard` its first two hex digits. File names therefore have a
/// fixed length whatever the key, and keys such as `a` and `a/b` coexist
/// without the local filesystem ever seeing the `/` delimiter.
///
/// Writes go to a temporary file and are renamed into place.
pub struct LocalBlobStore {
    root: PathBuf,
}

/// Where one blob lives on disk.
struct BlobLocation {
    shard: PathBuf,
    data: PathBuf,
    key_file: PathBuf,
}

impl BlobLocation {
    fn temp(&self) -> PathBuf {
        with_suffix(&self.data, TEMP_SUFFIX)
    }
}

impl LocalBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            StoreError::Transport(format!("cannot open store at {}: {e}", root.display()))
        })?;
        debug!(root = %root.display(), "opened local blob store");
        Ok(Self { root })
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn container_dir(&self, container: &str) -> StoreResult<PathBuf> {
        validate_container_name(container)?;
        Ok(self.root.join(container))
    }

    /// Resolve a container directory that must already exist.
    fn existing_container_dir(&self, container: &str) -> StoreResult<PathBuf> {
        let dir = self.container_dir(container)?;
        if !dir.is_dir() {
            return Err(StoreError::ContainerNotFound(container.to_string()));
        }
        Ok(dir)
    }

    fn locate(&self, container: &str, key: &str) -> StoreResult<BlobLocation> {
        validate_blob_key(key)?;
        let dir = self.existing_container_dir(container)?;
        let digest = key_digest(key);
        let shard = dir.join(&digest[..SHARD_LEN]);
        Ok(BlobLocation {
            data: shard.join(&digest),
            key_file: shard.join(format!("{digest}{KEY_SUFFIX}")),
            shard,
        })
    }

    fn locate_existing(&self, container: &str, key: &str) -> StoreResult<BlobLocation> {
        let location = self.locate(container, key)?;
        if !location.data.is_file() {
            return Err(StoreError::BlobNotFound {
                container: container.to_string(),
                key: key.to_string(),
            });
        }
        Ok(location)
    }

    /// Create the shard directory and record the key before any data lands.
    fn prepare_write(&self, container: &str, key: &str) -> StoreResult<BlobLocation> {
        let location = self.locate(container, key)?;
        fs::create_dir_all(&location.shard).map_err(backend_error)?;
        fs::write(&location.key_file, key.as_bytes()).map_err(backend_error)?;
        Ok(location)
    }

    /// Move a fully written temporary file into place.
    fn commit(temp: &Path, path: &Path) -> StoreResult<()> {
        fs::rename(temp, path).map_err(|e| {
            let _ = fs::remove_file(temp);
            backend_error(e)
        })
    }
}

/// Hex BLAKE3 digest of a blob key.
fn key_digest(key: &str) -> String {
    hex::encode(blake3::hash(key.as_bytes()).as_bytes())
}

/// Blobs of one shard directory whose key starts with `prefix`.
fn list_shard(shard: &Path, prefix: &str, blobs: &mut Vec<BlobInfo>) -> StoreResult<()> {
    for entry in fs::read_dir(shard).map_err(backend_error)? {
        let entry = entry.map_err(backend_error)?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if !is_digest(file_name) {
            continue;
        }
        let key = match fs::read(shard.join(format!("{file_name}{KEY_SUFFIX}"))) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(key) => key,
                Err(_) => {
                    warn!(file_name, "skipping blob with non-UTF-8 key file");
                    continue;
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(file_name, "skipping blob without key file");
                continue;
            }
            Err(e) => return Err(backend_error(e)),
        };
        if !key.starts_with(prefix) {
            continue;
        }
        let meta = entry.metadata().map_err(backend_error)?;
        blobs.push(BlobInfo::new(key, meta.len(), modified_time(&meta)));
    }
    Ok(())
}

fn is_digest(name: &str) -> bool {
    name.len() == DIGEST_HEX_LEN && name.bytes().all(|b| b.is_ascii_hexdigit())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Failures inside the store directory are the backend's, not the caller's.
fn backend_error(err: io::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

/// Copy `reader` into `writer`, blaming each failure on the side it came from.
fn pump(
    reader: &mut impl Read,
    writer: &mut impl Write,
    read_err: fn(io::Error) -> StoreError,
    write_err: fn(io::Error) -> StoreError,
) -> StoreResult<u64> {
    let mut buf = vec![0u8; COPY_BUF_LEN];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_err(e)),
        };
        writer.write_all(&buf[..n]).map_err(write_err)?;
        total += n as u64;
    }
    writer.flush().map_err(write_err)?;
    Ok(total)
}

fn modified_time(meta: &fs::Metadata) -> DateTime<Utc> {
    meta.modified().map(DateTime::<Utc>::from).unwrap_or_default()
}

impl BlobStore for LocalBlobStore {
    fn create_container(&self, name: &str) -> StoreResult<bool> {
        let dir = self.container_dir(name)?;
        match fs::create_dir(&dir) {
            Ok(()) => {
                debug!(container = name, "created container");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(backend_error(e)),
        }
    }

    fn list_containers(&self) -> StoreResult<Vec<ContainerInfo>> {
        let mut containers = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(backend_error)? {
            let entry = entry.map_err(backend_error)?;
            let meta = entry.metadata().map_err(backend_error)?;
            if !meta.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %entry.path().display(), "skipping non-UTF-8 container directory");
                continue;
            };
            containers.push(ContainerInfo {
                name,
                last_modified: modified_time(&meta),
            });
        }
        containers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(containers)
    }

    fn delete_container(&self, name: &str) -> StoreResult<()> {
        let dir = self.existing_container_dir(name)?;
        fs::remove_dir_all(&dir).map_err(backend_error)?;
        debug!(container = name, "deleted container");
        Ok(())
    }

    fn list_blobs(&self, container: &str, prefix: Option<&str>) -> StoreResult<Vec<BlobInfo>> {
        let dir = self.existing_container_dir(container)?;
        let prefix = prefix.unwrap_or("");
        let mut blobs = Vec::new();
        for entry in fs::read_dir(&dir).map_err(backend_error)? {
            let entry = entry.map_err(backend_error)?;
            let is_shard = entry.file_type().map_err(backend_error)?.is_dir()
                && entry.file_name().len() == SHARD_LEN;
            if !is_shard {
                warn!(
                    container,
                    path = %entry.path().display(),
                    "skipping foreign entry in container"
                );
                continue;
            }
            list_shard(&entry.path(), prefix, &mut blobs)?;
        }
        blobs.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(blobs)
    }

    fn put_blob(&self, container: &str, key: &str, data: &[u8]) -> StoreResult<()> {
        let location = self.prepare_write(container, key)?;
        let temp = location.temp();
        fs::write(&temp, data).map_err(backend_error)?;
        Self::commit(&temp, &location.data)
    }

    fn get_blob(&self, container: &str, key: &str) -> StoreResult<Vec<u8>> {
        let location = self.locate_existing(container, key)?;
        fs::read(&location.data).map_err(backend_error)
    }

    fn delete_blob(&self, container: &str, key: &str) -> StoreResult<()> {
        let location = self.locate_existing(container, key)?;
        fs::remove_file(&location.data).map_err(backend_error)?;
        if let Err(e) = fs::remove_file(&location.key_file) {
            if e.kind() != ErrorKind::NotFound {
                return Err(backend_error(e));
            }
        }
        // Only succeeds once the shard is empty.
        let _ = fs::remove_dir(&location.shard);
        Ok(())
    }

    fn put_blob_from_file(&self, container: &str, key: &str, local: &Path) -> StoreResult<()> {
        // A missing source is the caller's error and must leave the store untouched.
        let mut source = File::open(local)?;
        let location = self.prepare_write(container, key)?;
        let temp = location.temp();
        let mut target = File::create(&temp).map_err(backend_error)?;
        let bytes = pump(&mut source, &mut target, StoreError::Io, backend_error)
            .inspect_err(|_| {
                let _ = fs::remove_file(&temp);
            })?;
        drop(target);
        debug!(container, key, bytes, "uploaded file");
        Self::commit(&temp, &location.data)
    }

    fn get_blob_to_file(&self, container: &str, key: &str, local: &Path) -> StoreResult<()> {
        let location = self.locate_existing(container, key)?;
        let mut source = File::open(&location.data).map_err(backend_error)?;
        let mut target = File::create(local)?;
        let bytes = pump(&mut source, &mut target, backend_error, StoreError::Io)?;
        debug!(container, key, bytes, "downloaded file");
        Ok(())
    }
}

impl std::fmt::Debug for LocalBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBlobStore")
            .field("root", &self.root)
            .finish()
    }
}
