//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use crossterm::event::KeyCode;
use pmo_plus::app::App;
use pmo_plus::db::Database;
use pmo_plus::models::{Assignment, Developer, Project, ProjectStatus};
use pmo_plus::store::{Collection, Document, Fields, ListQuery, MemoryRecordStore, RecordStore, StoreError};

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, d, 0, 0, 0).unwrap()
}

/// Reads go to the wrapped store; every write fails.
pub struct ReadOnlyStore {
    pub inner: Arc<MemoryRecordStore>,
}

#[async_trait]
impl RecordStore for ReadOnlyStore {
    async fn list(&self, collection: Collection, query: ListQuery) -> Result<Vec<Document>, StoreError> {
        self.inner.list(collection, query).await
    }

    async fn create(&self, _collection: Collection, _fields: Fields) -> Result<String, StoreError> {
        Err(StoreError::Unavailable("writes disabled".into()))
    }

    async fn update(&self, _collection: Collection, _id: &str, _fields: Fields) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("writes disabled".into()))
    }

    async fn delete(&self, _collection: Collection, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("writes disabled".into()))
    }
}

/// Ids of the seeded records, in creation order.
pub struct Seeded {
    pub projects: Vec<String>,
    pub developers: Vec<String>,
    pub assignments: Vec<String>,
}

/// Two in-progress projects, one developer and two assignments on the first project.
pub async fn seed(store: Arc<MemoryRecordStore>) -> Seeded {
    let db = Database::new(store);

    let mut projects = Vec::new();
    for name in ["Apollo", "Gemini"] {
        let mut project = Project::new(day(1));
        project.name = name.into();
        project.status = ProjectStatus::InProgress;
        projects.push(db.save(&project).await.unwrap());
    }

    let developer = Developer {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        position: "Engineer".into(),
        ..Developer::default()
    };
    let developer_id = db.save(&developer).await.unwrap();

    let mut assignments = Vec::new();
    for allocation in [40, 30] {
        let mut assignment = Assignment::new(day(3));
        assignment.developer_id = developer_id.clone();
        assignment.project_id = projects[0].clone();
        assignment.time_allocation = allocation;
        assignment.is_indefinite = true;
        assignments.push(db.save(&assignment).await.unwrap());
    }

    Seeded {
        projects,
        developers: vec![developer_id],
        assignments,
    }
}

pub fn app_over(store: Arc<dyn RecordStore>) -> App {
    App::new(Database::new(store))
}

pub async fn press(app: &mut App, keys: &[KeyCode]) {
    for key in keys {
        app.handle_key(*key).await.unwrap();
    }
}

pub async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(KeyCode::Char(c)).await.unwrap();
    }
}
