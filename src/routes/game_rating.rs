use axum::{
    Json, Router,
    extract::{FromRequest, OriginalUri, Path, State},
    http::{HeaderValue, StatusCode, header::LOCATION},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::Query;
use tracing::debug;
use uuid::Uuid;

use crate::{
    dto::{pagination::PageQuery, rating::GameRatingDto},
    error::{AppError, ErrorBody},
    services::{
        alerts::{ENTITY_NAME, FailureAlert},
        pagination::generate_pagination_headers,
        rating_service,
    },
    state::SharedState,
};

/// CRUD routes for game ratings, relative to the API root.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route(
            "/game-ratings",
            post(create_game_rating)
                .put(update_game_rating)
                .get(get_all_game_ratings),
        )
        .route(
            "/game-ratings/{id}",
            get(get_game_rating).delete(delete_game_rating),
        )
        .route_layer(middleware::map_response_with_state(
            state,
            apply_failure_alert,
        ))
}

/// JSON body whose decoding failures are reported as a structured `validation` 400.
#[derive(FromRequest, serde::Deserialize)]
#[from_request(via(Json), rejection(AppError))]
pub struct RatingPayload(pub GameRatingDto);

/// Turn the [`FailureAlert`] left by [`AppError`] into `X-{app}-error`/`X-{app}-params` headers.
async fn apply_failure_alert(State(state): State<SharedState>, mut response: Response) -> Response {
    if let Some(alert) = response.extensions_mut().remove::<FailureAlert>() {
        response.headers_mut().extend(state.alerts().failure(&alert));
    }
    response
}

/// Create a new rating. The payload must not carry an identifier.
#[utoipa::path(
    post,
    path = "/api/game-ratings",
    tag = "game-ratings",
    request_body = GameRatingDto,
    responses(
        (status = 201, description = "Rating created", body = GameRatingDto),
        (status = 400, description = "Identifier supplied or payload invalid", body = ErrorBody)
    )
)]
pub async fn create_game_rating(
    State(state): State<SharedState>,
    RatingPayload(payload): RatingPayload,
) -> Result<Response, AppError> {
    debug!(?payload, "REST request to save GameRating");
    if payload.id.is_some() {
        return Err(AppError::BadRequest {
            entity_name: ENTITY_NAME,
            error_key: "idexists",
            message: format!("A new {ENTITY_NAME} cannot already have an ID"),
        });
    }
    create(&state, payload).await
}

/// Update a rating; a payload without identifier is created instead.
#[utoipa::path(
    put,
    path = "/api/game-ratings",
    tag = "game-ratings",
    request_body = GameRatingDto,
    responses(
        (status = 200, description = "Rating updated", body = GameRatingDto),
        (status = 201, description = "Rating created from a payload without identifier",
            body = GameRatingDto),
        (status = 400, description = "Payload invalid", body = ErrorBody)
    )
)]
pub async fn update_game_rating(
    State(state): State<SharedState>,
    RatingPayload(payload): RatingPayload,
) -> Result<Response, AppError> {
    debug!(?payload, "REST request to update GameRating");
    match payload.id {
        None => create(&state, payload).await,
        Some(id) => {
            let saved = rating_service::save(&state, payload).await?;
            let headers = state
                .alerts()
                .entity_update(ENTITY_NAME, &id.to_string());
            Ok((StatusCode::OK, headers, Json(saved)).into_response())
        }
    }
}

async fn create(state: &SharedState, payload: GameRatingDto) -> Result<Response, AppError> {
    let saved = rating_service::save(state, payload).await?;
    let Some(id) = saved.id else {
        return Err(AppError::Internal(
            "rating store returned a rating without identifier".into(),
        ));
    };

    let location = format!("{}/game-ratings/{id}", state.config().api_root);
    let location = HeaderValue::from_str(&location)
        .map_err(|err| AppError::Internal(format!("invalid location `{location}`: {err}")))?;

    let mut headers = state
        .alerts()
        .entity_creation(ENTITY_NAME, &id.to_string());
    headers.insert(LOCATION, location);
    Ok((StatusCode::CREATED, headers, Json(saved)).into_response())
}

/// List one page of ratings; paging metadata travels in `X-Total-Count` and `Link`.
#[utoipa::path(
    get,
    path = "/api/game-ratings",
    tag = "game-ratings",
    params(PageQuery),
    responses(
        (status = 200, description = "Requested page of ratings", body = [GameRatingDto]),
        (status = 400, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn get_all_game_ratings(
    State(state): State<SharedState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    debug!(?query, "REST request to get a page of GameRatings");
    let request = rating_service::page_request(&state, &query)?;
    let sort = request.sort.clone();
    let page = rating_service::find_all(&state, request).await?;
    let headers = generate_pagination_headers(uri.path(), &page, &sort);
    Ok((StatusCode::OK, headers, Json(page.content)).into_response())
}

/// Fetch a rating by identifier; 404 with an empty body when absent.
#[utoipa::path(
    get,
    path = "/api/game-ratings/{id}",
    tag = "game-ratings",
    params(("id" = Uuid, Path, description = "Identifier of the rating")),
    responses(
        (status = 200, description = "Rating found", body = GameRatingDto),
        (status = 404, description = "No rating with this identifier")
    )
)]
pub async fn get_game_rating(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    debug!(%id, "REST request to get GameRating");
    let response = match rating_service::find_one(&state, id).await? {
        Some(rating) => Json(rating).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    };
    Ok(response)
}

/// Delete a rating. Answers 200 whether or not it existed.
#[utoipa::path(
    delete,
    path = "/api/game-ratings/{id}",
    tag = "game-ratings",
    params(("id" = Uuid, Path, description = "Identifier of the rating")),
    responses((status = 200, description = "Rating deleted"))
)]
pub async fn delete_game_rating(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    debug!(%id, "REST request to delete GameRating");
    rating_service::delete(&state, id).await?;
    let headers = state
        .alerts()
        .entity_deletion(ENTITY_NAME, &id.to_string());
    Ok((StatusCode::OK, headers).into_response())
}
