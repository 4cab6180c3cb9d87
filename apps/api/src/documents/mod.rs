//! Persistence Client: saved resumes and cover letters in PostgreSQL.
//!
//! Every operation soft-fails. Database errors are logged and turned into an
//! empty result (`None`, an empty list, `false`); nothing propagates past the
//! store.

pub mod handlers;

use chrono::Utc;
use sqlx::{Executor, PgPool};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::document::DocumentContent;
use crate::models::saved_document::{SavedDocument, SavedDocumentRow};

const SCHEMA: &str = include_str!("../../migrations/0001_documents.sql");

const SELECT_COLUMNS: &str =
    "SELECT id, type AS kind, title, content, created_at, updated_at FROM documents";

#[derive(Clone)]
pub struct DocumentStore {
    pool: PgPool,
}

fn decode(row: SavedDocumentRow) -> Option<SavedDocument> {
    let id = row.id;
    SavedDocument::try_from(row)
        .map_err(|e| warn!("Skipping saved document {id}: {e}"))
        .ok()
}

impl DocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `documents` table when missing. Returns false when the
    /// database could not be reached.
    pub async fn ensure_schema(&self) -> bool {
        match self.pool.execute(SCHEMA).await {
            Ok(_) => {
                info!("documents table ready");
                true
            }
            Err(e) => {
                error!("Could not prepare documents table: {e}");
                false
            }
        }
    }

    /// Saves a document and returns its new id.
    pub async fn create(&self, title: &str, content: &DocumentContent) -> Option<Uuid> {
        let json = match serde_json::to_value(content) {
            Ok(json) => json,
            Err(e) => {
                error!("Could not serialize document '{title}': {e}");
                return None;
            }
        };

        let id = Uuid::new_v4();
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO documents (id, type, title, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(content.kind().as_str())
        .bind(title)
        .bind(json)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                info!("Saved {} '{title}' as {id}", content.kind().as_str());
                Some(id)
            }
            Err(e) => {
                error!("Saving document '{title}' failed: {e}");
                None
            }
        }
    }

    /// All saved documents, most recently updated first.
    pub async fn list_all(&self) -> Vec<SavedDocument> {
        let rows = sqlx::query_as::<_, SavedDocumentRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY updated_at DESC"
        ))
        .fetch_all(&self.pool)
        .await;

        match rows {
            Ok(rows) => rows.into_iter().filter_map(decode).collect(),
            Err(e) => {
                error!("Listing documents failed: {e}");
                Vec::new()
            }
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Option<SavedDocument> {
        let row = sqlx::query_as::<_, SavedDocumentRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        match row {
            Ok(row) => row.and_then(decode),
            Err(e) => {
                error!("Fetching document {id} failed: {e}");
                None
            }
        }
    }

    /// True when a document was removed.
    pub async fn delete_by_id(&self, id: Uuid) -> bool {
        match sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(result) => {
                let removed = result.rows_affected() > 0;
                if removed {
                    info!("Deleted document {id}");
                }
                removed
            }
            Err(e) => {
                error!("Deleting document {id} failed: {e}");
                false
            }
        }
    }
}
