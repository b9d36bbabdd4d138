//! Process-local rating store used for development setups and tests.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::GameRatingEntity,
    rating_store::{Page, PageRequest, RatingStore},
    storage::StorageResult,
};

/// Rating store backed by a concurrent hash map. Data does not survive a restart.
#[derive(Clone, Default)]
pub struct MemoryRatingStore {
    ratings: Arc<DashMap<Uuid, GameRatingEntity>>,
}

impl MemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ratings currently held.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

impl RatingStore for MemoryRatingStore {
    fn save(
        &self,
        rating: GameRatingEntity,
    ) -> BoxFuture<'static, StorageResult<GameRatingEntity>> {
        let ratings = self.ratings.clone();
        Box::pin(async move {
            let (id, rating) = rating.with_assigned_id();
            ratings.insert(id, rating.clone());
            Ok(rating)
        })
    }

    fn find_all(
        &self,
        request: PageRequest,
    ) -> BoxFuture<'static, StorageResult<Page<GameRatingEntity>>> {
        let ratings = self.ratings.clone();
        Box::pin(async move {
            let snapshot = ratings
                .iter()
                .map(|entry| entry.value().clone())
                .collect::<Vec<_>>();
            Ok(request.paginate(snapshot))
        })
    }

    fn find_one(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRatingEntity>>> {
        let ratings = self.ratings.clone();
        Box::pin(async move { Ok(ratings.get(&id).map(|entry| entry.value().clone())) })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let ratings = self.ratings.clone();
        Box::pin(async move {
            ratings.remove(&id);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::rating_store::{SortField, SortOrder};

    fn transient(name: &str, score: u8) -> GameRatingEntity {
        GameRatingEntity {
            id: None,
            game_name: name.into(),
            score,
            comment: Some("fun".into()),
            reviewer: None,
        }
    }

    #[tokio::test]
    async fn save_assigns_identifier_and_stores_rating() {
        let store = MemoryRatingStore::new();

        let saved = store.save(transient("Hades", 10)).await.unwrap();

        let id = saved.id.expect("identifier assigned");
        assert_eq!(store.find_one(id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn save_with_identifier_replaces_existing_rating() {
        let store = MemoryRatingStore::new();
        let mut saved = store.save(transient("Hades", 10)).await.unwrap();

        saved.score = 7;
        let updated = store.save(saved.clone()).await.unwrap();

        assert_eq!(updated, saved);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find_one(saved.id.unwrap()).await.unwrap().unwrap().score,
            7
        );
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryRatingStore::new();
        let saved = store.save(transient("Fez", 6)).await.unwrap();
        let id = saved.id.unwrap();

        store.delete(id).await.unwrap();
        store.delete(id).await.unwrap();

        assert!(store.find_one(id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn find_all_returns_sorted_page() {
        let store = MemoryRatingStore::new();
        for (name, score) in [("Braid", 7), ("Hades", 10), ("Tunic", 9)] {
            store.save(transient(name, score)).await.unwrap();
        }

        let page = store
            .find_all(PageRequest::new(0, 2).with_sort(vec![SortOrder::desc(SortField::Score)]))
            .await
            .unwrap();

        let scores: Vec<_> = page.content.iter().map(|r| r.score).collect();
        assert_eq!(scores, [10, 9]);
        assert_eq!(page.total_elements, 3);
    }
}
