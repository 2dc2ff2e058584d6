//! Postgres-backed record store: one JSONB row per document.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Collection, Document, Fields, ListQuery, RecordStore, StoreError};
use crate::config::Config;

pub struct PgRecordStore {
    pool: PgPool,
    namespace: String,
}

impl PgRecordStore {
    /// Create a new store with a connection pool, scoped to the configured project id
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .connect(config.database_url())
            .await?;

        Ok(Self::with_pool(pool, config.project_id()))
    }

    pub fn with_pool(pool: PgPool, namespace: &str) -> Self {
        Self {
            pool,
            namespace: namespace.to_string(),
        }
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Migration statements for document storage.
    pub fn migrations() -> &'static [&'static str] {
        &[
            r#"
CREATE TABLE IF NOT EXISTS pmo_records (
    seq BIGSERIAL NOT NULL,
    namespace TEXT NOT NULL,
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    fields JSONB NOT NULL DEFAULT '{}'::jsonb,
    PRIMARY KEY (namespace, collection, id)
)
"#,
            "CREATE INDEX IF NOT EXISTS idx_pmo_records_seq ON pmo_records (namespace, collection, seq)",
        ]
    }

    /// Applies the schema. Every statement is idempotent.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in Self::migrations() {
            sqlx::query(statement).execute(self.get_pool()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list(
        &self,
        collection: Collection,
        query: ListQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let limit = query.limit.map(|l| l as i64);

        let rows: Vec<(String, Json<Fields>)> = match &query.order_by {
            Some(field) => {
                sqlx::query_as(
                    r#"
                    SELECT id, fields FROM pmo_records
                    WHERE namespace = $1 AND collection = $2
                      AND fields -> $4::text IS NOT NULL
                      AND fields -> $4::text <> 'null'::jsonb
                    ORDER BY fields -> $4::text DESC, seq ASC
                    LIMIT $3
                    "#,
                )
                .bind(&self.namespace)
                .bind(collection.as_str())
                .bind(limit)
                .bind(field)
                .fetch_all(self.get_pool())
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT id, fields FROM pmo_records
                    WHERE namespace = $1 AND collection = $2
                    ORDER BY seq ASC
                    LIMIT $3
                    "#,
                )
                .bind(&self.namespace)
                .bind(collection.as_str())
                .bind(limit)
                .fetch_all(self.get_pool())
                .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|(id, Json(fields))| Document { id, fields })
            .collect())
    }

    async fn create(&self, collection: Collection, mut fields: Fields) -> Result<String, StoreError> {
        let id = Uuid::new_v4().simple().to_string();
        fields.retain(|_, v| !v.is_null());

        sqlx::query(
            r#"
            INSERT INTO pmo_records (namespace, collection, id, fields)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&self.namespace)
        .bind(collection.as_str())
        .bind(&id)
        .bind(Json(&fields))
        .execute(self.get_pool())
        .await?;

        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE pmo_records
            SET fields = jsonb_strip_nulls(fields || $4)
            WHERE namespace = $1 AND collection = $2 AND id = $3
            "#,
        )
        .bind(&self.namespace)
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(&fields))
        .execute(self.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM pmo_records WHERE namespace = $1 AND collection = $2 AND id = $3")
            .bind(&self.namespace)
            .bind(collection.as_str())
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }
}
