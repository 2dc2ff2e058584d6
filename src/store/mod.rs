//! Record store boundary.
//!
//! The application only ever talks to a [`RecordStore`]: a document database
//! with one collection per record kind, each document being an opaque id and
//! a flat map of JSON fields.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Developers,
    Assignments,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Developers => "developers",
            Collection::Assignments => "assignments",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Ordering and size of a collection listing.
///
/// Without `order_by` documents come back in insertion order. With it, only
/// documents carrying that field are returned, largest value first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub order_by: Option<String>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn newest_first(field: &str) -> Self {
        Self {
            order_by: Some(field.to_string()),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {collection}/{id} not found")]
    NotFound { collection: Collection, id: String },
    #[error("store backend error: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("record encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, collection: Collection, query: ListQuery)
    -> Result<Vec<Document>, StoreError>;

    /// Stores a new document and returns the id the store assigned to it.
    async fn create(&self, collection: Collection, fields: Fields) -> Result<String, StoreError>;

    /// Shallow merge of `fields` into an existing document. A `null` value removes the field.
    async fn update(&self, collection: Collection, id: &str, fields: Fields)
    -> Result<(), StoreError>;

    /// Deleting an id that does not exist succeeds.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

/// Applies `patch` on top of `fields` with the update semantics of [`RecordStore::update`].
pub fn merge_fields(fields: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        if value.is_null() {
            fields.remove(&key);
        } else {
            fields.insert(key, value);
        }
    }
}
