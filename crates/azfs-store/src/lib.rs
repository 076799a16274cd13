//! Blob store backends for azfs.
//!
//! A blob store is a flat, two-level namespace: named containers, each
//! holding blobs addressed by opaque string keys. The `/` character inside a
//! key is a naming convention only; the store has no directories. Everything
//! hierarchical is synthesized on top of this crate by `azfs-namespace`.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`LocalBlobStore`] -- directory-backed store rooted at a local path
//!
//! # Contract
//!
//! 1. `list_blobs` returns blobs sorted ascending by key.
//! 2. A missing container or blob is reported as a resource-missing error
//!    ([`StoreError::is_resource_missing`]), never as `Ok`.
//! 3. Failures reading or writing *local* files are [`StoreError::Io`] and are
//!    never confused with a missing remote resource.
//! 4. Name validation happens in the store, not in callers.

pub mod error;
pub mod local;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use local::LocalBlobStore;
pub use memory::InMemoryBlobStore;
pub use names::{validate_blob_key, validate_container_name};
pub use traits::BlobStore;
pub use types::{BlobInfo, ContainerInfo};
