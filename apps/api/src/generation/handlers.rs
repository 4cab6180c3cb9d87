//! Axum route handlers for the drafting API.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::drafts::{draft_about, draft_cover_letter, draft_experience};
use crate::llm_client::{GenerationError, TextGenerator};
use crate::models::document::{CoverLetter, Resume};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DraftRequest<T> {
    pub document: T,
}

#[derive(Debug, Deserialize)]
pub struct DraftExperienceRequest {
    pub document: Resume,
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse<T> {
    pub document: T,
}

fn generator(state: &AppState) -> Result<Arc<dyn TextGenerator>, AppError> {
    state
        .generator
        .clone()
        .ok_or_else(|| GenerationError::MissingCredentials.into())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate/about
pub async fn handle_draft_about(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest<Resume>>,
) -> Result<Json<DraftResponse<Resume>>, AppError> {
    let generator = generator(&state)?;
    let mut document = req.document;
    draft_about(generator.as_ref(), &mut document).await?;
    Ok(Json(DraftResponse { document }))
}

/// POST /api/v1/generate/experience
pub async fn handle_draft_experience(
    State(state): State<AppState>,
    Json(req): Json<DraftExperienceRequest>,
) -> Result<Json<DraftResponse<Resume>>, AppError> {
    let generator = generator(&state)?;
    let mut document = req.document;
    draft_experience(generator.as_ref(), &mut document, req.index).await?;
    Ok(Json(DraftResponse { document }))
}

/// POST /api/v1/generate/cover-letter
///
/// Sets both the letter body and its subject line.
pub async fn handle_draft_cover_letter(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest<CoverLetter>>,
) -> Result<Json<DraftResponse<CoverLetter>>, AppError> {
    let generator = generator(&state)?;
    let mut document = req.document;
    draft_cover_letter(generator.as_ref(), &mut document).await?;
    Ok(Json(DraftResponse { document }))
}
