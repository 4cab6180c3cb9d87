//! Axum route handlers for stateless rendering.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::document::{CoverLetter, Resume};
use crate::render::{render_cover_letter, render_resume, VisualTree};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest<T> {
    pub document: T,
    #[serde(default)]
    pub template_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    /// The template actually applied (the default when the requested id is unknown).
    pub template_id: &'static str,
    pub html: String,
    pub sections: Vec<String>,
}

impl From<&VisualTree> for RenderResponse {
    fn from(tree: &VisualTree) -> Self {
        Self {
            template_id: tree.template_id,
            html: tree.to_html_fragment(),
            sections: tree.section_keys().into_iter().map(str::to_string).collect(),
        }
    }
}

/// POST /api/v1/render/resume
pub async fn handle_render_resume(Json(req): Json<RenderRequest<Resume>>) -> Json<RenderResponse> {
    let tree = render_resume(&req.document, &req.template_id);
    Json(RenderResponse::from(&tree))
}

/// POST /api/v1/render/cover-letter
pub async fn handle_render_cover_letter(
    Json(req): Json<RenderRequest<CoverLetter>>,
) -> Json<RenderResponse> {
    let tree = render_cover_letter(&req.document, &req.template_id);
    Json(RenderResponse::from(&tree))
}
