use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::GameRatingEntity;

/// Game rating as exchanged over the REST API.
///
/// `id` is absent for a rating that was never persisted and must stay absent when
/// creating one.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GameRatingDto {
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    pub game_name: String,
    #[validate(range(max = 10))]
    pub score: u8,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
    #[validate(length(max = 100))]
    pub reviewer: Option<String>,
}

impl From<GameRatingDto> for GameRatingEntity {
    fn from(value: GameRatingDto) -> Self {
        Self {
            id: value.id,
            game_name: value.game_name,
            score: value.score,
            comment: value.comment,
            reviewer: value.reviewer,
        }
    }
}

impl From<GameRatingEntity> for GameRatingDto {
    fn from(value: GameRatingEntity) -> Self {
        Self {
            id: value.id,
            game_name: value.game_name,
            score: value.score,
            comment: value.comment,
            reviewer: value.reviewer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_camel_case_and_skips_missing_fields() {
        let dto = GameRatingDto {
            id: None,
            game_name: "Hades".into(),
            score: 10,
            comment: None,
            reviewer: None,
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({"gameName": "Hades", "score": 10}));
    }

    #[test]
    fn rejects_out_of_range_score_and_empty_name() {
        let dto: GameRatingDto =
            serde_json::from_value(serde_json::json!({"gameName": "", "score": 11})).unwrap();
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 2);
    }
}
