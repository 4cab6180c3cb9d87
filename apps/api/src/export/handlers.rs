//! Axum route handlers for structured export.

use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::docx::{build_word_document, docx_filename, package};
use crate::export::ExportArtifact;
use crate::models::document::Resume;

#[derive(Debug, Deserialize)]
pub struct DocxExportRequest {
    pub document: Resume,
}

/// POST /api/v1/export/docx
///
/// Builds the word-processing document straight from the posted model.
pub async fn handle_export_docx(
    Json(req): Json<DocxExportRequest>,
) -> Result<ExportArtifact, AppError> {
    let doc = build_word_document(&req.document);
    let bytes = package(&doc)?;
    let filename = docx_filename(&req.document.full_name);
    info!("Exported {filename} ({} blocks, {} bytes)", doc.blocks.len(), bytes.len());
    Ok(ExportArtifact::docx(filename, bytes))
}
