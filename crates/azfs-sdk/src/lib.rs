//! High-level SDK for azfs.
//!
//! [`AzFs`] wraps a [`BlobStore`] client and exposes the directory-style
//! commands of the `azfs` tool. The client is constructed once by the caller
//! and passed in; `AzFs` holds no other state.

pub mod error;
pub mod client;

pub use error::{SdkError, SdkResult};
pub use client::{AzFs, Removal};

// Re-export key types
pub use azfs_namespace::{DirectoryEntry, EntryKind};
pub use azfs_store::{BlobStore, ContainerInfo, InMemoryBlobStore, LocalBlobStore, StoreError};
