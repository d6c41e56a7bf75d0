use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by a [`super::KeyValueStore`]. They never leave [`super::ResultCache`].
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    #[error("cache store unavailable: {reason}")]
    Unavailable {
        /// Error message.
        reason: String,
    },

    /// A cached value could not be encoded or decoded.
    #[error("cache value serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
