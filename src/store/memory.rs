//! In-process record store.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{merge_fields, Collection, Document, Fields, ListQuery, RecordStore, StoreError};

/// Keeps every collection as an insertion-ordered vector.
#[derive(Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    writes: AtomicUsize,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of create/update/delete calls received so far, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.load(AtomicOrdering::SeqCst)
    }

    /// Raw stored document, bypassing the typed layer.
    pub async fn document(&self, collection: Collection, id: &str) -> Option<Document> {
        let collections = self.collections.read().await;
        collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned()
    }

    /// Inserts a document with a caller-chosen id.
    pub async fn insert(&self, collection: Collection, id: &str, fields: Fields) {
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(Document {
            id: id.to_string(),
            fields,
        });
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(
        &self,
        collection: Collection,
        query: ListQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections.get(&collection).cloned().unwrap_or_default();

        if let Some(field) = &query.order_by {
            docs.retain(|d| d.fields.get(field).is_some_and(|v| !v.is_null()));
            docs.sort_by(|a, b| compare_values(b.fields.get(field), a.fields.get(field)));
        }
        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }

        Ok(docs)
    }

    async fn create(&self, collection: Collection, mut fields: Fields) -> Result<String, StoreError> {
        self.record_write();
        let id = Uuid::new_v4().simple().to_string();
        fields.retain(|_, v| !v.is_null());

        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(Document {
            id: id.clone(),
            fields,
        });
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        self.record_write();
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;

        merge_fields(&mut doc.fields, fields);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        self.record_write();
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(&collection) {
            docs.retain(|d| d.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = MemoryRecordStore::new();
        let a = store.create(Collection::Developers, fields(json!({"firstName": "A"}))).await.unwrap();
        let b = store.create(Collection::Developers, fields(json!({"firstName": "B"}))).await.unwrap();

        let docs = store.list(Collection::Developers, ListQuery::all()).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), b.as_str()]);
        assert!(store.list(Collection::Projects, ListQuery::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ordered_listing_is_descending_limited_and_skips_unordered_documents() {
        let store = MemoryRecordStore::new();
        for (id, created) in [("p1", "2024-01-01T00:00:00Z"), ("p2", "2024-03-01T00:00:00Z"), ("p3", "2024-02-01T00:00:00Z")] {
            store.insert(Collection::Projects, id, fields(json!({"createdAt": created}))).await;
        }
        store.insert(Collection::Projects, "legacy", fields(json!({"name": "no timestamp"}))).await;

        let docs = store
            .list(Collection::Projects, ListQuery::newest_first("createdAt").limit(2))
            .await
            .unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3"]);
    }

    #[tokio::test]
    async fn update_of_missing_document_is_not_found() {
        let store = MemoryRecordStore::new();
        let err = store
            .update(Collection::Assignments, "nope", Fields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { collection: Collection::Assignments, .. }));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn create_drops_null_fields_and_delete_is_idempotent() {
        let store = MemoryRecordStore::new();
        let id = store
            .create(Collection::Projects, fields(json!({"name": "X", "endDate": null})))
            .await
            .unwrap();
        let doc = store.document(Collection::Projects, &id).await.unwrap();
        assert!(!doc.fields.contains_key("endDate"));

        store.delete(Collection::Projects, &id).await.unwrap();
        store.delete(Collection::Projects, &id).await.unwrap();
        assert!(store.document(Collection::Projects, &id).await.is_none());
    }
}
