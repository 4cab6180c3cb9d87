use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::document::{DocumentContent, DocumentKind};

/// Raw `documents` table row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedDocumentRow {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub content: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted resume or cover letter, as handed back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDocument {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub title: String,
    pub content: DocumentContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SavedDocumentRow> for SavedDocument {
    type Error = String;

    fn try_from(row: SavedDocumentRow) -> Result<Self, Self::Error> {
        let kind = DocumentKind::parse(&row.kind)
            .ok_or_else(|| format!("unknown document type '{}'", row.kind))?;
        let content = DocumentContent::from_value(kind, row.content)
            .map_err(|e| format!("malformed {} content: {e}", kind.as_str()))?;
        Ok(SavedDocument {
            id: row.id,
            kind,
            title: row.title,
            content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str) -> SavedDocumentRow {
        SavedDocumentRow {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            title: "Jane's resume".to_string(),
            content: serde_json::json!({"fullName": "Jane Doe"}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_with_known_kind() {
        let doc = SavedDocument::try_from(row("resume")).unwrap();
        assert_eq!(doc.kind, DocumentKind::Resume);
        match doc.content {
            DocumentContent::Resume(r) => assert_eq!(r.full_name, "Jane Doe"),
            other => panic!("expected resume, got {other:?}"),
        }
    }

    #[test]
    fn test_row_with_unknown_kind_is_rejected() {
        assert!(SavedDocument::try_from(row("invoice")).is_err());
    }
}
