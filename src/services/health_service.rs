use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether a rating store is installed, logging health-check failures.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_rating_store().await {
        Ok(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "rating store health check failed");
            }
        }
        Err(_) => warn!("rating store unavailable (degraded mode)"),
    }

    if state.is_degraded().await {
        HealthResponse::degraded()
    } else {
        HealthResponse::ok()
    }
}
