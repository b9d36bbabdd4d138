use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::CouchDaoError;
use crate::dao::models::GameRatingEntity;

pub const RATING_PREFIX: &str = "game_rating::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    #[allow(dead_code)]
    pub id: String,
    #[serde(default)]
    pub doc: Option<Value>,
}

/// Minimal projection used to read the current revision of a document.
#[derive(Debug, Deserialize)]
pub struct RevisionOnly {
    #[serde(rename = "_rev")]
    pub rev: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchRatingDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub rating: RatingBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingBody {
    pub game_name: String,
    pub score: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub reviewer: Option<String>,
}

impl CouchRatingDocument {
    pub fn from_entity(id: Uuid, rating: GameRatingEntity, rev: Option<String>) -> Self {
        Self {
            id: rating_doc_id(id),
            rev,
            rating: RatingBody {
                game_name: rating.game_name,
                score: rating.score,
                comment: rating.comment,
                reviewer: rating.reviewer,
            },
        }
    }

    pub fn try_into_entity(self) -> Result<GameRatingEntity, CouchDaoError> {
        let id = parse_rating_doc_id(&self.id)?;
        Ok(GameRatingEntity {
            id: Some(id),
            game_name: self.rating.game_name,
            score: self.rating.score,
            comment: self.rating.comment,
            reviewer: self.rating.reviewer,
        })
    }
}

pub fn rating_doc_id(id: Uuid) -> String {
    format!("{RATING_PREFIX}{id}")
}

pub fn parse_rating_doc_id(doc_id: &str) -> Result<Uuid, CouchDaoError> {
    let raw = doc_id
        .strip_prefix(RATING_PREFIX)
        .ok_or_else(|| CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
            kind: "missing game_rating prefix",
        })?;
    Uuid::parse_str(raw).map_err(|_| CouchDaoError::InvalidDocId {
        doc_id: doc_id.to_string(),
        kind: "malformed uuid",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_ids_are_prefixed() {
        let id = Uuid::new_v4();
        let doc_id = rating_doc_id(id);
        assert!(doc_id.starts_with(RATING_PREFIX));
        assert_eq!(parse_rating_doc_id(&doc_id).unwrap(), id);
    }

    #[test]
    fn foreign_document_ids_are_rejected() {
        assert!(matches!(
            parse_rating_doc_id("game::123"),
            Err(CouchDaoError::InvalidDocId { .. })
        ));
        assert!(matches!(
            parse_rating_doc_id("game_rating::not-a-uuid"),
            Err(CouchDaoError::InvalidDocId { .. })
        ));
    }

    #[test]
    fn serialized_document_omits_missing_revision() {
        let id = Uuid::new_v4();
        let rating = GameRatingEntity {
            id: Some(id),
            game_name: "Fez".into(),
            score: 6,
            comment: None,
            reviewer: None,
        };
        let document = CouchRatingDocument::from_entity(id, rating, None);
        let value = serde_json::to_value(document).unwrap();
        assert!(value.get("_rev").is_none());
        assert_eq!(value["game_name"], "Fez");
    }
}
