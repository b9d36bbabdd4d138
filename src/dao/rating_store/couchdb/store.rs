use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::from_value;
use uuid::Uuid;

use crate::dao::{
    models::GameRatingEntity,
    rating_store::{Page, PageRequest, RatingStore},
    storage::{StorageError, StorageResult},
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult, RequestFailure},
    models::{
        AllDocsResponse, CouchRatingDocument, END_SUFFIX, RATING_PREFIX, RevisionOnly,
        rating_doc_id,
    },
};

/// Rating store persisting documents in a CouchDB database.
#[derive(Clone)]
pub struct CouchRatingStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

type RequestResult<T> = Result<T, RequestFailure>;

impl CouchRatingStore {
    /// Establish a connection to CouchDB and ensure the ratings database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let store = Self {
            client,
            base_url: Arc::from(config.base_url),
            database: Arc::from(config.database),
            auth: config
                .credentials
                .map(|(user, pass)| (Arc::from(user), Arc::from(pass))),
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth {
            Some((ref user, ref pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.database_url(), path);
        self.authorize(self.client.request(method, url))
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        self.create_database_if_missing()
            .await
            .map_err(|source| CouchDaoError::EnsureDatabase {
                database: self.database.to_string(),
                source,
            })
    }

    async fn create_database_if_missing(&self) -> RequestResult<()> {
        let url = self.database_url();
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(RequestFailure::Transport)?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let create = self
                    .authorize(self.client.put(&url))
                    .send()
                    .await
                    .map_err(RequestFailure::Transport)?;
                // 412 means another instance created it first.
                match create.status() {
                    status if status.is_success() => Ok(()),
                    StatusCode::PRECONDITION_FAILED => Ok(()),
                    other => Err(RequestFailure::Status(other)),
                }
            }
            other => Err(RequestFailure::Status(other)),
        }
    }

    async fn ping(&self) -> RequestResult<()> {
        let response = self
            .authorize(self.client.get(self.database_url()))
            .send()
            .await
            .map_err(RequestFailure::Transport)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(RequestFailure::Status(response.status()))
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> RequestResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, doc_id)
            .send()
            .await
            .map_err(RequestFailure::Transport)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<T>()
                .await
                .map(Some)
                .map_err(RequestFailure::Decode),
            other => Err(RequestFailure::Status(other)),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> RequestResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .request(Method::PUT, doc_id)
            .json(document)
            .send()
            .await
            .map_err(RequestFailure::Transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(RequestFailure::Status(response.status()))
        }
    }

    async fn save_rating(&self, id: Uuid, rating: GameRatingEntity) -> RequestResult<()> {
        let doc_id = rating_doc_id(id);
        let rev = self
            .get_document::<RevisionOnly>(&doc_id)
            .await?
            .map(|existing| existing.rev);
        let document = CouchRatingDocument::from_entity(id, rating, rev);
        self.put_document(&doc_id, &document).await
    }

    async fn delete_document(&self, doc_id: &str) -> RequestResult<()> {
        let Some(current) = self.get_document::<RevisionOnly>(doc_id).await? else {
            return Ok(());
        };

        let response = self
            .request(Method::DELETE, doc_id)
            .query(&[("rev", current.rev)])
            .send()
            .await
            .map_err(RequestFailure::Transport)?;

        match response.status() {
            // Removed concurrently between the revision lookup and the delete.
            StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            other => Err(RequestFailure::Status(other)),
        }
    }

    async fn list_documents(&self) -> RequestResult<Vec<CouchRatingDocument>> {
        let query = [
            ("include_docs", "true".to_string()),
            ("startkey", format!("\"{RATING_PREFIX}\"")),
            ("endkey", format!("\"{RATING_PREFIX}{END_SUFFIX}\"")),
        ];

        let response = self
            .request(Method::GET, "_all_docs")
            .query(&query)
            .send()
            .await
            .map_err(RequestFailure::Transport)?;

        if !response.status().is_success() {
            return Err(RequestFailure::Status(response.status()));
        }

        let payload = response
            .json::<AllDocsResponse>()
            .await
            .map_err(RequestFailure::Decode)?;

        payload
            .rows
            .into_iter()
            .filter_map(|row| row.doc)
            .map(|doc| from_value(doc).map_err(RequestFailure::Document))
            .collect()
    }
}

impl RatingStore for CouchRatingStore {
    fn save(
        &self,
        rating: GameRatingEntity,
    ) -> BoxFuture<'static, StorageResult<GameRatingEntity>> {
        let store = self.clone();
        Box::pin(async move {
            let (id, rating) = rating.with_assigned_id();
            store
                .save_rating(id, rating.clone())
                .await
                .map_err(|source| CouchDaoError::SaveRating { id, source })?;
            Ok(rating)
        })
    }

    fn find_all(
        &self,
        request: PageRequest,
    ) -> BoxFuture<'static, StorageResult<Page<GameRatingEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let documents = store
                .list_documents()
                .await
                .map_err(|source| CouchDaoError::ListRatings { source })?;
            let ratings = documents
                .into_iter()
                .map(CouchRatingDocument::try_into_entity)
                .collect::<CouchResult<Vec<_>>>()?;
            Ok(request.paginate(ratings))
        })
    }

    fn find_one(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRatingEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let maybe_doc = store
                .get_document::<CouchRatingDocument>(&rating_doc_id(id))
                .await
                .map_err(|source| CouchDaoError::LoadRating { id, source })?;
            Ok(maybe_doc
                .map(CouchRatingDocument::try_into_entity)
                .transpose()?)
        })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete_document(&rating_doc_id(id))
                .await
                .map_err(|source| StorageError::from(CouchDaoError::DeleteRating { id, source }))
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .ping()
                .await
                .map_err(|source| StorageError::from(CouchDaoError::HealthCheck { source }))
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
