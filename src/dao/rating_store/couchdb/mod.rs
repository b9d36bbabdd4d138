//! CouchDB implementation of [`RatingStore`](super::RatingStore) over its HTTP API.

mod config;
mod error;
mod models;
mod store;

pub use config::CouchConfig;
pub use error::CouchDaoError;
pub use store::CouchRatingStore;

use crate::dao::storage::StorageError;

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        match err {
            CouchDaoError::InvalidDocId { doc_id, kind } => StorageError::Corrupted {
                key: doc_id,
                reason: kind,
            },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
