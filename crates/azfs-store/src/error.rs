/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The target container does not exist.
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// The target blob does not exist in an existing container.
    #[error("blob not found: {container}/{key}")]
    BlobNotFound { container: String, key: String },

    /// A container name or blob key was rejected by the store.
    #[error("invalid {kind} {name:?}: {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    /// The backend could not be reached or refused the request.
    #[error("transport error: {0}")]
    Transport(String),

    /// Reading or writing a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` if the error means the target container or blob is absent.
    pub fn is_resource_missing(&self) -> bool {
        matches!(
            self,
            StoreError::ContainerNotFound(_) | StoreError::BlobNotFound { .. }
        )
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
