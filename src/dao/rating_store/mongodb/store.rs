use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoRatingDocument, doc_id, sort_document},
};
use crate::dao::{
    models::GameRatingEntity,
    rating_store::{Page, PageRequest, RatingStore},
    storage::StorageResult,
};

const RATING_COLLECTION_NAME: &str = "game_ratings";

/// Rating store persisting documents in MongoDB.
#[derive(Clone)]
pub struct MongoRatingStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        info!("MongoDB connection re-established");
        Ok(())
    }
}

impl MongoRatingStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.collection().await;
        let index = mongodb::IndexModel::builder()
            .keys(doc! {"game_name": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("game_rating_name_idx".to_owned()))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: RATING_COLLECTION_NAME,
                index: "game_name",
                source,
            })?;

        Ok(())
    }

    async fn collection(&self) -> Collection<MongoRatingDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoRatingDocument>(RATING_COLLECTION_NAME)
    }

    async fn save_rating(&self, rating: GameRatingEntity) -> MongoResult<GameRatingEntity> {
        let (id, rating) = rating.with_assigned_id();
        let document = MongoRatingDocument::from_entity(id, rating.clone());
        let collection = self.collection().await;

        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveRating { id, source })?;

        Ok(rating)
    }

    async fn find_rating(&self, id: Uuid) -> MongoResult<Option<GameRatingEntity>> {
        let collection = self.collection().await;

        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadRating { id, source })?;

        document.map(GameRatingEntity::try_from).transpose()
    }

    async fn find_ratings(&self, request: PageRequest) -> MongoResult<Page<GameRatingEntity>> {
        let collection = self.collection().await;

        let total = collection
            .count_documents(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListRatings { source })?;

        // Keeps the skip below the driver's signed limit for absurd page indexes.
        if request.starts_past(total) {
            return Ok(Page::new(Vec::new(), &request, total));
        }

        let documents: Vec<MongoRatingDocument> = collection
            .find(doc! {})
            .sort(sort_document(&request.sort))
            .skip(request.offset())
            .limit(i64::try_from(request.size).unwrap_or(i64::MAX))
            .await
            .map_err(|source| MongoDaoError::ListRatings { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListRatings { source })?;

        let content = documents
            .into_iter()
            .map(GameRatingEntity::try_from)
            .collect::<MongoResult<Vec<_>>>()?;

        Ok(Page::new(content, &request, total))
    }

    async fn delete_rating(&self, id: Uuid) -> MongoResult<()> {
        let collection = self.collection().await;
        collection
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteRating { id, source })?;
        Ok(())
    }
}

impl RatingStore for MongoRatingStore {
    fn save(
        &self,
        rating: GameRatingEntity,
    ) -> BoxFuture<'static, StorageResult<GameRatingEntity>> {
        let store = self.clone();
        Box::pin(async move { store.save_rating(rating).await.map_err(Into::into) })
    }

    fn find_all(
        &self,
        request: PageRequest,
    ) -> BoxFuture<'static, StorageResult<Page<GameRatingEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_ratings(request).await.map_err(Into::into) })
    }

    fn find_one(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRatingEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_rating(id).await.map_err(Into::into) })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.delete_rating(id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
