use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MongoDaoError;
use crate::dao::{
    models::GameRatingEntity,
    rating_store::{Direction, SortField, SortOrder},
};

/// Rating document stored in the `game_ratings` collection.
///
/// The identifier is kept as its hyphenated string form so filters and sort keys stay
/// readable from the Mongo shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRatingDocument {
    #[serde(rename = "_id")]
    id: String,
    game_name: String,
    score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reviewer: Option<String>,
}

impl MongoRatingDocument {
    pub fn from_entity(id: Uuid, entity: GameRatingEntity) -> Self {
        Self {
            id: id.to_string(),
            game_name: entity.game_name,
            score: i32::from(entity.score),
            comment: entity.comment,
            reviewer: entity.reviewer,
        }
    }
}

impl TryFrom<MongoRatingDocument> for GameRatingEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoRatingDocument) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&value.id).map_err(|source| MongoDaoError::InvalidDocumentId {
            id: value.id.clone(),
            source,
        })?;
        Ok(Self {
            id: Some(id),
            game_name: value.game_name,
            score: value.score.clamp(0, i32::from(u8::MAX)) as u8,
            comment: value.comment,
            reviewer: value.reviewer,
        })
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}

fn column(field: SortField) -> &'static str {
    match field {
        SortField::Id => "_id",
        SortField::GameName => "game_name",
        SortField::Score => "score",
        SortField::Reviewer => "reviewer",
    }
}

/// Translate sort orders into a Mongo sort document, always ending on `_id`.
pub fn sort_document(orders: &[SortOrder]) -> Document {
    let mut sort = Document::new();
    for order in orders {
        let key = column(order.field);
        if sort.contains_key(key) {
            continue;
        }
        let direction = match order.direction {
            Direction::Asc => 1,
            Direction::Desc => -1,
        };
        sort.insert(key, direction);
    }
    if !sort.contains_key("_id") {
        sort.insert("_id", 1);
    }
    sort
}
