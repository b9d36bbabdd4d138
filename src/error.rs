use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    dao::storage::StorageError,
    services::alerts::{ENTITY_NAME, FailureAlert},
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The rating store reported a failure.
    #[error("storage failure")]
    Storage(#[source] StorageError),
    /// No rating store is installed (degraded mode).
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// The caller violated the request contract.
    #[error("invalid input: {message}")]
    InvalidInput {
        entity_name: &'static str,
        error_key: &'static str,
        message: String,
    },
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Storage(err)
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request, reported with failure alert headers.
    #[error("{message}")]
    BadRequest {
        entity_name: &'static str,
        error_key: &'static str,
        message: String,
    },
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(source) => {
                error!(error = %source, "rating store failure");
                AppError::Internal(source.to_string())
            }
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::InvalidInput {
                entity_name,
                error_key,
                message,
            } => AppError::BadRequest {
                entity_name,
                error_key,
                message,
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            entity_name: ENTITY_NAME,
            error_key: "validation",
            message: rejection.body_text(),
        }
    }
}

/// Structured failure payload returned with every error response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Entity concerned by the failure, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    /// Machine readable failure key (e.g. `idexists`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_key: Option<String>,
    /// Human readable description.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let alert = match &self {
            AppError::BadRequest {
                entity_name,
                error_key,
                ..
            } => Some(FailureAlert {
                entity_name: *entity_name,
                error_key: *error_key,
            }),
            _ => None,
        };

        // Internal details stay in the logs.
        let message = match &self {
            AppError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };

        let payload = Json(ErrorBody {
            entity_name: alert.as_ref().map(|a| a.entity_name.to_string()),
            error_key: alert.as_ref().map(|a| a.error_key.to_string()),
            message,
            status: status.as_u16(),
        });

        let mut response = (status, payload).into_response();
        if let Some(alert) = alert {
            response.extensions_mut().insert(alert);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_become_internal_errors() {
        let source = std::io::Error::other("connection reset");
        let err: AppError =
            ServiceError::from(StorageError::unavailable("boom".into(), source)).into();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_error_body_hides_backend_detail() {
        let response = AppError::Internal("failed to save game rating `42`".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "internal server error");
        assert_eq!(body["status"], 500);
    }

    #[test]
    fn bad_requests_carry_failure_alert() {
        let response = AppError::BadRequest {
            entity_name: "gameRating",
            error_key: "idexists",
            message: "A new gameRating cannot already have an ID".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let alert = response.extensions().get::<FailureAlert>().unwrap();
        assert_eq!(alert.error_key, "idexists");
    }

    #[test]
    fn degraded_mode_is_unavailable() {
        let response = AppError::from(ServiceError::Degraded).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
