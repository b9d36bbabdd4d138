use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: &'static str,
}

impl HealthResponse {
    /// A rating store is installed and answering.
    pub fn ok() -> Self {
        Self { status: "ok" }
    }

    /// No rating store is installed.
    pub fn degraded() -> Self {
        Self { status: "degraded" }
    }
}
