//! Hierarchical namespace emulation over a flat blob store.
//!
//! A virtual path such as `photos/2024/may/a.jpg` names container `photos`
//! and blob key `2024/may/a.jpg`. The store knows nothing about `2024/` or
//! `may/`; those directories exist only as a derived view computed from the
//! sorted key listing.
//!
//! # Modules
//!
//! - [`path`] -- splitting virtual paths into container, key, and prefix
//! - [`entry`] -- the synthetic [`DirectoryEntry`] produced by listings
//! - [`projector`] -- turning a sorted blob listing into one directory level

pub mod entry;
pub mod path;
pub mod projector;

pub use entry::{DirectoryEntry, EntryKind};
pub use path::{
    as_directory, blob_key_of, container_of, parent_prefix_of, parent_prefix_of_key,
    trim_trailing, ResolvedPath, DELIMITER,
};
pub use projector::{project, Projection};
