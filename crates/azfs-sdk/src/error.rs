use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("store error: {0}")]
    Store(#[from] azfs_store::StoreError),

    #[error("rmdir {path}: deleted {deleted} blob(s) before failing: {source}")]
    PartialRemoval {
        path: String,
        deleted: usize,
        #[source]
        source: azfs_store::StoreError,
    },
}

impl SdkError {
    /// Returns `true` if the underlying store reported a missing resource.
    pub fn is_resource_missing(&self) -> bool {
        match self {
            SdkError::Store(e) | SdkError::PartialRemoval { source: e, .. } => {
                e.is_resource_missing()
            }
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
