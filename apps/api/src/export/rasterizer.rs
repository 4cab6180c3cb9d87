//! Browser-engine seams. Layout is delegated to a real rendering engine; the
//! pipeline only needs "HTML in, pixels (or a printed PDF) out".
//!
//! `AppState` carries these as `Arc<dyn Rasterizer>` / `Arc<dyn PrintDialog>`.

use async_trait::async_trait;
use image::RgbImage;

use crate::export::{ExportError, RasterOptions};

#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// Renders `html` to a bitmap at `options.effective_scale()` device pixels per CSS pixel.
    async fn rasterize(&self, html: &str, options: &RasterOptions) -> Result<RgbImage, ExportError>;
}

#[async_trait]
pub trait PrintDialog: Send + Sync {
    /// Prints `html` and returns the printed document.
    async fn print(&self, html: &str) -> Result<Vec<u8>, ExportError>;
}
