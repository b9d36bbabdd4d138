use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod game_rating;
pub mod health;

/// Compose all route trees, nesting REST resources under the configured API root.
pub fn router(state: SharedState) -> Router<()> {
    let resources = game_rating::router(state.clone());
    let api_root = state.config().api_root.as_str();
    let api_router = if api_root.is_empty() {
        resources
    } else {
        Router::new().nest(api_root, resources)
    };

    health::router()
        .merge(api_router)
        .merge(docs::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn healthcheck_reports_degraded_without_store() {
        let app = router(AppState::new(AppConfig::default()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthcheck")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"status":"degraded"}"#);
    }

    #[tokio::test]
    async fn resources_follow_configured_api_root() {
        let config = AppConfig {
            api_root: String::new(),
            ..AppConfig::default()
        };
        let app = router(AppState::new(config));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/game-ratings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        // Route exists; no store installed.
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
