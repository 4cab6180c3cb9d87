//! Axum route handlers for saved documents.
//!
//! The store never fails loudly, so these handlers only distinguish "found"
//! from "not found". A failed save surfaces as 503 so the client can show a
//! banner and retry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{DocumentContent, DocumentKind};
use crate::models::saved_document::SavedDocument;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveDocumentRequest {
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub title: String,
    pub content: Value,
}

#[derive(Debug, Serialize)]
pub struct SaveDocumentResponse {
    pub id: Uuid,
}

/// POST /api/v1/documents
pub async fn handle_save_document(
    State(state): State<AppState>,
    Json(req): Json<SaveDocumentRequest>,
) -> Result<(StatusCode, Json<SaveDocumentResponse>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    let content = DocumentContent::from_value(req.kind, req.content)
        .map_err(|e| AppError::Validation(format!("Invalid {} content: {e}", req.kind.as_str())))?;

    let id = state
        .documents
        .create(req.title.trim(), &content)
        .await
        .ok_or_else(|| AppError::Configuration("Document could not be saved".to_string()))?;

    Ok((StatusCode::CREATED, Json(SaveDocumentResponse { id })))
}

/// GET /api/v1/documents
pub async fn handle_list_documents(State(state): State<AppState>) -> Json<Vec<SavedDocument>> {
    Json(state.documents.list_all().await)
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SavedDocument>, AppError> {
    state
        .documents
        .get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.documents.delete_by_id(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Document {id} not found")))
    }
}
