//! Raster export: snapshot the mounted preview, normalize it to an A4 page,
//! rasterize it through the browser backend and paginate the bitmap into a PDF.
//!
//! The export always reads the tree the user is looking at; it never
//! re-renders from the document model.

use tracing::{info, warn};

use crate::export::pdf::paginate_to_pdf;
use crate::export::surface::{DocumentSurface, MountId, MountRole, ScopedMount};
use crate::export::{ExportArtifact, ExportError, Rasterizer};
use crate::models::document::DocumentKind;
use crate::render::VisualTree;

/// Lowest supersampling factor accepted for print output.
pub const MIN_SUPERSAMPLE: f64 = 2.0;

/// A4 at 96 DPI, in CSS pixels.
pub const A4_VIEWPORT_WIDTH: u32 = 794;
pub const A4_VIEWPORT_HEIGHT: u32 = 1123;

#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    pub scale: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: MIN_SUPERSAMPLE,
            viewport_width: A4_VIEWPORT_WIDTH,
            viewport_height: A4_VIEWPORT_HEIGHT,
            jpeg_quality: 95,
        }
    }
}

impl RasterOptions {
    pub fn with_scale(scale: f64) -> Self {
        if scale < MIN_SUPERSAMPLE {
            warn!("Raster scale {scale} below minimum, using {MIN_SUPERSAMPLE}");
        }
        Self {
            scale,
            ..Self::default()
        }
    }

    pub fn effective_scale(&self) -> f64 {
        if self.scale.is_finite() {
            self.scale.max(MIN_SUPERSAMPLE)
        } else {
            MIN_SUPERSAMPLE
        }
    }
}

/// Fixes the page to print geometry: no transforms or shadow, full A4 size,
/// white background.
pub fn normalize_for_print(tree: &mut VisualTree) {
    tree.root.walk_mut(&mut |el| {
        el.remove_style("transform");
        el.remove_style("transform-origin");
        el.remove_style("scale");
    });

    let root = &mut tree.root;
    root.remove_style("box-shadow");
    root.set_style("width", "210mm");
    root.set_style("min-height", "297mm");
    root.set_style("margin", "0");
    root.set_style("background-color", "#ffffff");
}

/// A raster export with its isolated copy already attached.
///
/// The copy is taken in `prepare`, so the export reflects the preview at the
/// moment it was requested. Dropping the job detaches the copy.
pub struct RasterJob<'a> {
    kind: DocumentKind,
    clone: ScopedMount<'a>,
}

impl<'a> RasterJob<'a> {
    pub fn prepare(surface: &'a DocumentSurface, preview: MountId) -> Result<Self, ExportError> {
        let snapshot = surface.snapshot(preview).ok_or(ExportError::MissingPreview)?;
        let kind = snapshot.kind;
        let clone = surface.attach_scoped(MountRole::ExportClone, snapshot);
        clone.modify(normalize_for_print);
        Ok(Self { kind, clone })
    }

    pub async fn run(
        self,
        rasterizer: &dyn Rasterizer,
        options: &RasterOptions,
    ) -> Result<ExportArtifact, ExportError> {
        let html = self
            .clone
            .html_document()
            .ok_or(ExportError::MissingPreview)?;

        info!(
            "Rasterizing {} at {}x",
            self.kind.as_str(),
            options.effective_scale()
        );
        let bitmap = rasterizer.rasterize(&html, options).await?;
        let pdf = paginate_to_pdf(&bitmap, options.jpeg_quality)?;

        info!(
            "Raster export of {} produced {} bytes from {}x{} bitmap",
            self.kind.as_str(),
            pdf.len(),
            bitmap.width(),
            bitmap.height()
        );
        Ok(ExportArtifact::pdf(self.kind.pdf_filename(), pdf))
    }
}

/// Runs the whole raster pipeline against the tree mounted at `preview`.
pub async fn export_raster(
    surface: &DocumentSurface,
    preview: MountId,
    rasterizer: &dyn Rasterizer,
    options: &RasterOptions,
) -> Result<ExportArtifact, ExportError> {
    RasterJob::prepare(surface, preview)?
        .run(rasterizer, options)
        .await
}
