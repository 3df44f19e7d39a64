//! Database Module
//!
//! JSON document storage behind [`DocumentStore`] plus typed repositories.

pub mod repository;
pub mod store;

pub use store::{Collection, DocumentStore, Filter, MemoryStore, Query, SortOrder, SqliteStore};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use std::sync::Arc;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique field that collided
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Record is still referenced by this many documents
    #[error("In use by {0} records")]
    InUse(u64),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(field) => {
                AppError::already_exists(field.clone()).with_detail("field", field)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::InUse(count) => AppError::with_message(
                ErrorCode::AlreadyExists,
                format!("Record is referenced by {count} other records"),
            )
            .with_detail("count", count),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::database(msg)
            }
        }
    }
}

/// Base repository: a store handle bound to one collection
#[derive(Clone)]
pub struct BaseRepository {
    store: Arc<dyn DocumentStore>,
    collection: Collection,
}

impl BaseRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: Collection) -> Self {
        Self { store, collection }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub async fn insert<T: Serialize + DeserializeOwned>(&self, record: &T) -> RepoResult<T> {
        let doc = self.store.insert(self.collection, to_document(record)?).await?;
        from_document(doc)
    }

    pub async fn find<T: DeserializeOwned>(&self, query: &Query) -> RepoResult<Vec<T>> {
        self.store
            .find(self.collection, query)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn find_one<T: DeserializeOwned>(
        &self,
        filters: Vec<Filter>,
    ) -> RepoResult<Option<T>> {
        let query = Query {
            filters,
            limit: Some(1),
            ..Query::default()
        };
        Ok(self.find(&query).await?.into_iter().next())
    }

    pub async fn find_by_id<T: DeserializeOwned>(&self, id: &str) -> RepoResult<Option<T>> {
        self.store
            .find_by_id(self.collection, id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Merge `patch` into the record, guarded by `guards`
    pub async fn update_where<T: DeserializeOwned>(
        &self,
        id: &str,
        guards: &[Filter],
        patch: &impl Serialize,
    ) -> RepoResult<Option<T>> {
        self.store
            .update_where(self.collection, id, guards, to_document(patch)?)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Merge `patch` into the record, failing with NotFound when it is gone
    pub async fn update<T: DeserializeOwned>(
        &self,
        id: &str,
        patch: &impl Serialize,
    ) -> RepoResult<T> {
        self.update_where(id, &[], patch)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("{} {} not found", self.collection, id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.store.delete_by_id(self.collection, id).await
    }

    pub async fn count(&self, filters: &[Filter]) -> RepoResult<u64> {
        self.store.count(self.collection, filters).await
    }
}

fn to_document(value: &impl Serialize) -> RepoResult<Value> {
    serde_json::to_value(value).map_err(|e| RepoError::Validation(e.to_string()))
}

fn from_document<T: DeserializeOwned>(doc: Value) -> RepoResult<T> {
    serde_json::from_value(doc).map_err(|e| RepoError::Database(format!("corrupt document: {e}")))
}
