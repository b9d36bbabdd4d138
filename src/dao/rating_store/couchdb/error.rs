use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Low-level reason a single CouchDB HTTP exchange failed.
#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error("request could not be sent")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected response status {0}")]
    Status(StatusCode),
    #[error("response body could not be decoded")]
    Decode(#[source] reqwest::Error),
    #[error("document does not match the rating layout")]
    Document(#[source] serde_json::Error),
}

/// Failures of the CouchDB rating store, named after the rating operation that failed.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    /// `COUCH_BASE_URL` is not set.
    #[error("missing CouchDB environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to build CouchDB client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The ratings database could neither be read nor created.
    #[error("failed to ensure CouchDB database `{database}` exists")]
    EnsureDatabase {
        database: String,
        #[source]
        source: RequestFailure,
    },
    #[error("CouchDB health check failed")]
    HealthCheck {
        #[source]
        source: RequestFailure,
    },
    #[error("failed to save game rating `{id}`")]
    SaveRating {
        id: Uuid,
        #[source]
        source: RequestFailure,
    },
    #[error("failed to load game rating `{id}`")]
    LoadRating {
        id: Uuid,
        #[source]
        source: RequestFailure,
    },
    #[error("failed to delete game rating `{id}`")]
    DeleteRating {
        id: Uuid,
        #[source]
        source: RequestFailure,
    },
    #[error("failed to list game ratings")]
    ListRatings {
        #[source]
        source: RequestFailure,
    },
    /// A stored document id is not `game_rating::<uuid>`.
    #[error("invalid document ID `{doc_id}`: {kind}")]
    InvalidDocId { doc_id: String, kind: &'static str },
}
