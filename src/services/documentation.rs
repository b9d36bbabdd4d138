use utoipa::OpenApi;

/// Aggregated OpenAPI document for the game ratings service.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game_rating::create_game_rating,
        crate::routes::game_rating::update_game_rating,
        crate::routes::game_rating::get_all_game_ratings,
        crate::routes::game_rating::get_game_rating,
        crate::routes::game_rating::delete_game_rating,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::rating::GameRatingDto,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game-ratings", description = "CRUD operations on game ratings"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_rating_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/game-ratings"));
        assert!(doc.paths.paths.contains_key("/api/game-ratings/{id}"));
        assert!(doc.paths.paths.contains_key("/healthcheck"));
    }
}
