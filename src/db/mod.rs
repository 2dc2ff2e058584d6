use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::models::{Assignment, Developer, Project, Record};
use crate::store::{Collection, Document, Fields, ListQuery, RecordStore, StoreError};

/// Most projects ever fetched by the project list.
pub const PROJECT_LIST_LIMIT: usize = 100;

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

/// Typed access to the three PMO+ collections over an injected record store
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn RecordStore>,
}

impl Database {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    // Project operations
    pub async fn get_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.list(ListQuery::newest_first(CREATED_AT).limit(PROJECT_LIST_LIMIT))
            .await
    }

    /// Every project in store order, without the list screen's cap.
    pub async fn get_all_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.list(ListQuery::all()).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), StoreError> {
        self.delete::<Project>(id).await
    }

    // Developer operations
    pub async fn get_developers(&self) -> Result<Vec<Developer>, StoreError> {
        self.list(ListQuery::all()).await
    }

    pub async fn delete_developer(&self, id: &str) -> Result<(), StoreError> {
        self.delete::<Developer>(id).await
    }

    // Assignment operations
    pub async fn get_assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        self.list(ListQuery::all()).await
    }

    pub async fn delete_assignment(&self, id: &str) -> Result<(), StoreError> {
        self.delete::<Assignment>(id).await
    }

    /// Points an assignment at another project; every other field is left as stored.
    pub async fn reassign(&self, assignment_id: &str, project_id: &str) -> Result<(), StoreError> {
        let mut fields = Fields::new();
        fields.insert("projectId".into(), Value::String(project_id.to_string()));
        fields.insert(UPDATED_AT.into(), Value::String(timestamp()));

        self.store
            .update(Collection::Assignments, assignment_id, fields)
            .await?;
        info!(assignment_id, project_id, "assignment reassigned");
        Ok(())
    }

    /// Creates the record when it has no id yet, updates it otherwise. Returns the record id.
    pub async fn save<T: Record>(&self, record: &T) -> Result<String, StoreError> {
        if record.id().is_empty() {
            self.create(record).await
        } else {
            self.update(record).await?;
            Ok(record.id().to_string())
        }
    }

    async fn list<T: Record>(&self, query: ListQuery) -> Result<Vec<T>, StoreError> {
        let docs = self.store.list(T::COLLECTION, query).await?;
        Ok(docs.into_iter().filter_map(decode::<T>).collect())
    }

    async fn create<T: Record>(&self, record: &T) -> Result<String, StoreError> {
        let mut fields = encode(record)?;
        let now = timestamp();
        fields.insert(CREATED_AT.into(), Value::String(now.clone()));
        fields.insert(UPDATED_AT.into(), Value::String(now));

        let id = self.store.create(T::COLLECTION, fields).await?;
        info!(collection = %T::COLLECTION, id = %id, "record created");
        Ok(id)
    }

    async fn update<T: Record>(&self, record: &T) -> Result<(), StoreError> {
        let mut fields = encode(record)?;
        for field in T::CLEARABLE {
            fields.entry(field.to_string()).or_insert(Value::Null);
        }
        fields.insert(UPDATED_AT.into(), Value::String(timestamp()));

        self.store.update(T::COLLECTION, record.id(), fields).await?;
        info!(collection = %T::COLLECTION, id = record.id(), "record updated");
        Ok(())
    }

    async fn delete<T: Record>(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(T::COLLECTION, id).await?;
        info!(collection = %T::COLLECTION, id, "record deleted");
        Ok(())
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn encode<T: Record>(record: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Encoding(serde::ser::Error::custom(format!(
            "record encoded to a non-object value: {other}"
        )))),
    }
}

fn decode<T: Record>(doc: Document) -> Option<T> {
    match serde_json::from_value::<T>(Value::Object(doc.fields)) {
        Ok(mut record) => {
            record.set_id(doc.id);
            Some(record)
        }
        Err(err) => {
            warn!(collection = %T::COLLECTION, id = %doc.id, error = %err, "skipping undecodable record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn setup() -> (Arc<MemoryRecordStore>, Database) {
        let store = Arc::new(MemoryRecordStore::new());
        let db = Database::new(store.clone());
        (store, db)
    }

    #[tokio::test]
    async fn project_without_end_date_reads_back_absent() {
        let (store, db) = setup();
        let mut project = Project::new(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        project.name = "Apollo".into();

        let id = db.save(&project).await.unwrap();
        let raw = store.document(Collection::Projects, &id).await.unwrap();
        assert!(!raw.fields.contains_key("endDate"));
        assert!(raw.fields.contains_key("createdAt"));
        assert!(raw.fields.contains_key("updatedAt"));

        let projects = db.get_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, id);
        assert_eq!(projects[0].end_date, None);
    }

    #[tokio::test]
    async fn clearing_an_end_date_removes_the_stored_field() {
        let (store, db) = setup();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut assignment = Assignment::new(start);
        assignment.end_date = Some(start + chrono::Duration::days(10));
        assignment.id = db.save(&assignment).await.unwrap();

        assignment.end_date = None;
        assignment.is_indefinite = true;
        db.save(&assignment).await.unwrap();

        let raw = store
            .document(Collection::Assignments, &assignment.id)
            .await
            .unwrap();
        assert!(!raw.fields.contains_key("endDate"));
        assert_eq!(raw.fields["isIndefinite"], json!(true));
    }

    #[tokio::test]
    async fn undecodable_records_are_skipped() {
        let (store, db) = setup();
        let Value::Object(broken) = json!({"developerId": "d1"}) else {
            unreachable!()
        };
        store.insert(Collection::Assignments, "broken", broken).await;

        let Value::Object(valid) = json!({
            "developerId": "d1",
            "projectId": "p1",
            "timeAllocation": 50,
            "startDate": "2024-01-01T00:00:00.000Z",
            "isIndefinite": true,
        }) else {
            unreachable!()
        };
        store.insert(Collection::Assignments, "a1", valid).await;

        let assignments = db.get_assignments().await.unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].id, "a1");
        assert_eq!(assignments[0].time_allocation, 50);
    }

    #[tokio::test]
    async fn reassign_only_touches_the_project_reference() {
        let (store, db) = setup();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut assignment = Assignment::new(start);
        assignment.developer_id = "d1".into();
        assignment.project_id = "p1".into();
        assignment.time_allocation = 40;
        let id = db.save(&assignment).await.unwrap();
        let before = store.document(Collection::Assignments, &id).await.unwrap();

        db.reassign(&id, "p2").await.unwrap();

        let after = store.document(Collection::Assignments, &id).await.unwrap();
        assert_eq!(after.fields["projectId"], json!("p2"));
        for field in ["developerId", "timeAllocation", "startDate", "isIndefinite", "createdAt"] {
            assert_eq!(after.fields[field], before.fields[field], "{field} changed");
        }
    }

    #[tokio::test]
    async fn reassigning_a_missing_assignment_fails() {
        let (_, db) = setup();
        let err = db.reassign("ghost", "p1").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
