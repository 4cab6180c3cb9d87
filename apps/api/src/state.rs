use std::sync::Arc;

use crate::documents::DocumentStore;
use crate::export::{PrintDialog, RasterOptions, Rasterizer};
use crate::llm_client::TextGenerator;
use crate::preview::PreviewRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub documents: DocumentStore,
    /// `None` when no generation credentials are configured.
    pub generator: Option<Arc<dyn TextGenerator>>,
    /// Browser backend for raster export. Default: `ChromeBackend`.
    pub rasterizer: Arc<dyn Rasterizer>,
    pub printer: Arc<dyn PrintDialog>,
    pub previews: PreviewRegistry,
    pub raster_options: RasterOptions,
}
