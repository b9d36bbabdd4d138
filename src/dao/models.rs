use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Game rating as persisted by the storage backends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRatingEntity {
    /// Identifier assigned by the store on first save; `None` while transient.
    pub id: Option<Uuid>,
    /// Name of the rated game.
    pub game_name: String,
    /// Score between 0 and 10.
    pub score: u8,
    /// Free-form comment left by the reviewer.
    pub comment: Option<String>,
    /// Display name of the reviewer.
    pub reviewer: Option<String>,
}

impl GameRatingEntity {
    /// Return the entity with an identifier, generating one when it is still transient.
    pub fn with_assigned_id(mut self) -> (Uuid, Self) {
        let id = *self.id.get_or_insert_with(Uuid::new_v4);
        (id, self)
    }
}
