//! End-to-end lifecycle of a game rating through the public router.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::LOCATION},
};
use game_ratings_back::{
    config::AppConfig, dao::rating_store::memory::MemoryRatingStore, routes, state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::with_store(AppConfig::default(), Arc::new(MemoryRatingStore::new()));
    routes::router(state)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .map(|value| value.to_str().unwrap().to_owned());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, location, json)
}

#[tokio::test]
async fn rating_lifecycle() {
    let app = app();

    let (status, location, created) = call(
        &app,
        Method::POST,
        "/api/game-ratings",
        Some(json!({"gameName": "Outer Wilds", "score": 9, "reviewer": "hearthian"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let location = location.expect("location header");
    let id = created["id"].as_str().unwrap().to_owned();
    assert_eq!(location, format!("/api/game-ratings/{id}"));

    let (status, _, fetched) = call(&app, Method::GET, &location, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _, updated) = call(
        &app,
        Method::PUT,
        "/api/game-ratings",
        Some(json!({"id": id, "gameName": "Outer Wilds", "score": 10, "reviewer": "hearthian"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["score"], 10);

    let (status, _, listed) = call(&app, Method::GET, "/api/game-ratings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([updated]));

    let (status, _, body) = call(&app, Method::DELETE, &location, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);

    let (status, _, body) = call(&app, Method::GET, &location, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn malformed_identifier_is_rejected() {
    let app = app();
    let (status, _, _) = call(&app, Method::GET, "/api/game-ratings/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
