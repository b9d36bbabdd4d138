//! Delegation from the REST layer to the installed
//! [`RatingStore`](crate::dao::rating_store::RatingStore).

use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::rating_store::{Page, PageRequest},
    dto::{pagination::PageQuery, rating::GameRatingDto},
    error::ServiceError,
    services::alerts::ENTITY_NAME,
    state::SharedState,
};

/// Validate and upsert a rating, returning it as persisted (with its identifier).
pub async fn save(
    state: &SharedState,
    rating: GameRatingDto,
) -> Result<GameRatingDto, ServiceError> {
    rating
        .validate()
        .map_err(|err| ServiceError::InvalidInput {
            entity_name: ENTITY_NAME,
            error_key: "validation",
            message: format!("validation failed: {err}"),
        })?;

    let store = state.require_rating_store().await?;
    let saved = store.save(rating.into()).await?;
    debug!(id = ?saved.id, "saved game rating");
    Ok(saved.into())
}

/// Resolve the pagination query against the configured page sizes.
pub fn page_request(state: &SharedState, query: &PageQuery) -> Result<PageRequest, ServiceError> {
    let config = state.config();
    query
        .to_page_request(config.default_page_size, config.max_page_size)
        .map_err(|message| ServiceError::InvalidInput {
            entity_name: ENTITY_NAME,
            error_key: "pagination",
            message,
        })
}

/// Fetch one page of ratings.
pub async fn find_all(
    state: &SharedState,
    request: PageRequest,
) -> Result<Page<GameRatingDto>, ServiceError> {
    let store = state.require_rating_store().await?;
    let page = store.find_all(request).await?;
    debug!(
        page = page.page,
        size = page.size,
        total = page.total_elements,
        "listed game ratings"
    );
    Ok(page.map(GameRatingDto::from))
}

/// Fetch a single rating; absence is not an error.
pub async fn find_one(
    state: &SharedState,
    id: Uuid,
) -> Result<Option<GameRatingDto>, ServiceError> {
    let store = state.require_rating_store().await?;
    Ok(store.find_one(id).await?.map(GameRatingDto::from))
}

/// Remove a rating. Succeeds whether or not it existed.
pub async fn delete(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_rating_store().await?;
    store.delete(id).await?;
    debug!(%id, "deleted game rating");
    Ok(())
}
