//! Axum route handlers for preview sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::ExportArtifact;
use crate::models::document::{DocumentContent, DocumentKind};
use crate::preview::{PreviewShell, ShellStatus};
use crate::render::{render_document, VisualTree};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub document: Value,
    #[serde(default)]
    pub template_id: String,
}

impl PreviewRequest {
    fn render(self) -> Result<VisualTree, AppError> {
        let kind = self.kind;
        let content = DocumentContent::from_value(kind, self.document).map_err(|e| {
            AppError::Validation(format!("Invalid {} document: {e}", kind.as_str()))
        })?;
        Ok(render_document(&content, &self.template_id))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub template_id: &'static str,
    pub html: String,
    pub sections: Vec<String>,
    pub status: ShellStatus,
}

impl PreviewResponse {
    fn from_shell(id: Uuid, shell: &PreviewShell) -> Result<Self, AppError> {
        let (template_id, html, sections) = shell
            .read(|tree| {
                (
                    tree.template_id,
                    tree.to_html_fragment(),
                    tree.section_keys().into_iter().map(str::to_string).collect(),
                )
            })
            .ok_or_else(|| AppError::NotFound(format!("Preview {id} has no mounted document")))?;

        Ok(Self {
            id,
            kind: shell.kind(),
            template_id,
            html,
            sections,
            status: shell.status(),
        })
    }
}

async fn session(state: &AppState, id: Uuid) -> Result<std::sync::Arc<PreviewShell>, AppError> {
    state
        .previews
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Preview {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/previews
///
/// Renders the posted document and mounts it as a new preview session.
pub async fn handle_open_preview(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<(StatusCode, Json<PreviewResponse>), AppError> {
    let tree = req.render()?;
    let (id, shell) = state.previews.open(tree).await;
    Ok((StatusCode::CREATED, Json(PreviewResponse::from_shell(id, &shell)?)))
}

/// GET /api/v1/previews/:id
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreviewResponse>, AppError> {
    let shell = session(&state, id).await?;
    Ok(Json(PreviewResponse::from_shell(id, &shell)?))
}

/// PUT /api/v1/previews/:id
///
/// Re-renders after a form edit so the preview mirrors the latest model.
pub async fn handle_update_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let shell = session(&state, id).await?;
    shell.update(req.render()?)?;
    Ok(Json(PreviewResponse::from_shell(id, &shell)?))
}

/// DELETE /api/v1/previews/:id
pub async fn handle_close_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.previews.close(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Preview {id} not found")))
    }
}

/// GET /api/v1/previews/:id/status
pub async fn handle_preview_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShellStatus>, AppError> {
    Ok(Json(session(&state, id).await?.status()))
}

/// POST /api/v1/previews/:id/download
///
/// Raster PDF of the preview as currently mounted. 409 while another
/// download of the same session is running.
pub async fn handle_download_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ExportArtifact, AppError> {
    let shell = session(&state, id).await?;
    let artifact = shell
        .download(state.rasterizer.as_ref(), &state.raster_options)
        .await?;
    Ok(artifact)
}

/// POST /api/v1/previews/:id/print
pub async fn handle_print_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ExportArtifact, AppError> {
    let shell = session(&state, id).await?;
    let printed = shell.print(state.printer.as_ref()).await?;
    Ok(ExportArtifact::pdf(shell.kind().pdf_filename(), printed))
}
