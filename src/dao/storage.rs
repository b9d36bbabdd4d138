use std::error::Error;
use thiserror::Error;

/// Result alias for rating store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Backend-neutral failure surfaced by every [`RatingStore`](super::rating_store::RatingStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the request.
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A stored record could not be mapped back to a rating.
    #[error("corrupted rating record `{key}`: {reason}")]
    Corrupted { key: String, reason: &'static str },
}

impl StorageError {
    /// Wrap any backend failure into [`StorageError::Unavailable`].
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
