// Export Pipeline: raster (snapshot → normalize → rasterize → paginate → PDF)
// and structured (document model → DOCX). Both only read their source.

pub mod chrome;
pub mod docx;
pub mod handlers;
pub mod pdf;
pub mod raster;
pub mod rasterizer;
pub mod surface;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub use raster::{export_raster, RasterOptions};
pub use rasterizer::{PrintDialog, Rasterizer};
pub use surface::{DocumentSurface, MountId, MountRole};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no rendered document is mounted")]
    MissingPreview,

    #[error("rasterization failed: {0}")]
    Rasterize(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("document packaging failed: {0}")]
    Package(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished, downloadable file.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn pdf(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        }
    }

    pub fn docx(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: DOCX_CONTENT_TYPE,
            bytes,
        }
    }
}

/// `attachment` disposition with `filename` as a quoted string. Quotes and
/// backslashes are escaped; control characters are dropped.
fn content_disposition(filename: &str) -> String {
    let mut quoted = String::with_capacity(filename.len());
    for c in filename.chars().filter(|c| !c.is_control()) {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    format!("attachment; filename=\"{quoted}\"")
}

/// Served as an attachment so the client saves it under `filename`.
impl IntoResponse for ExportArtifact {
    fn into_response(self) -> Response {
        let disposition = content_disposition(&self.filename);
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}
