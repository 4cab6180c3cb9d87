use axum::{extract::Path, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::templates::{find, style_for, templates, StyleVariant, Template};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    #[serde(flatten)]
    pub template: &'static Template,
    pub variant: StyleVariant,
}

impl From<&'static Template> for TemplateSummary {
    fn from(template: &'static Template) -> Self {
        Self {
            template,
            variant: style_for(template.id).variant,
        }
    }
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateSummary>> {
    Json(templates().iter().map(TemplateSummary::from).collect())
}

/// GET /api/v1/templates/:id
///
/// Strict lookup for selection UIs; rendering itself falls back silently.
pub async fn handle_get_template(
    Path(id): Path<String>,
) -> Result<Json<TemplateSummary>, AppError> {
    find(&id)
        .map(|t| Json(TemplateSummary::from(t)))
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}
