// Headless Chrome backend for rasterizing and printing rendered pages.
//
// Each call launches a browser, loads the page from a temporary HTML file and
// tears everything down afterwards. The browser API is blocking, so the work
// runs on the blocking pool.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::{CaptureScreenshotFormatOption, Viewport};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::export::raster::{A4_VIEWPORT_HEIGHT, A4_VIEWPORT_WIDTH};
use crate::export::{ExportError, PrintDialog, RasterOptions, Rasterizer};

/// A4 in inches, for the print path.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

const PAGE_HEIGHT_SCRIPT: &str =
    "Math.max(document.body.scrollHeight, document.documentElement.scrollHeight)";

#[derive(Debug, Clone, Default)]
pub struct ChromeBackend {
    chrome_path: Option<PathBuf>,
}

fn browser_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Browser(e.to_string())
}

impl ChromeBackend {
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self { chrome_path }
    }

    fn launch(&self, window: (u32, u32)) -> Result<Browser, ExportError> {
        Browser::new(LaunchOptions {
            headless: true,
            window_size: Some(window),
            path: self.chrome_path.clone(),
            ..Default::default()
        })
        .map_err(browser_err)
    }

    /// Writes `html` to a temporary file the browser can navigate to.
    fn stage(html: &str) -> Result<tempfile::NamedTempFile, ExportError> {
        let mut file = tempfile::Builder::new()
            .prefix("vitae-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    fn open(browser: &Browser, page: &Path) -> Result<std::sync::Arc<Tab>, ExportError> {
        let url = format!("file://{}", page.display());
        let tab = browser.new_tab().map_err(browser_err)?;
        tab.navigate_to(&url).map_err(browser_err)?;
        tab.wait_until_navigated().map_err(browser_err)?;
        Ok(tab)
    }

    fn rasterize_blocking(
        &self,
        html: &str,
        options: &RasterOptions,
    ) -> Result<RgbImage, ExportError> {
        let page = Self::stage(html)?;
        let browser = self.launch((options.viewport_width, options.viewport_height))?;
        let tab = Self::open(&browser, page.path())?;

        let height = tab
            .evaluate(PAGE_HEIGHT_SCRIPT, false)
            .map_err(browser_err)?
            .value
            .and_then(|v| v.as_f64())
            .unwrap_or(options.viewport_height as f64)
            .max(options.viewport_height as f64);

        let scale = options.effective_scale();
        debug!("Capturing {}x{} CSS px at {}x", options.viewport_width, height, scale);

        let png = tab
            .capture_screenshot(
                CaptureScreenshotFormatOption::Png,
                None,
                Some(Viewport {
                    x: 0.0,
                    y: 0.0,
                    width: options.viewport_width as f64,
                    height,
                    scale,
                }),
                true,
            )
            .map_err(|e| ExportError::Rasterize(e.to_string()))?;

        if let Err(e) = tab.close(true) {
            warn!("Could not close browser tab: {e}");
        }
        Ok(image::load_from_memory(&png)?.to_rgb8())
    }

    fn print_blocking(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        let page = Self::stage(html)?;
        let browser = self.launch((A4_VIEWPORT_WIDTH, A4_VIEWPORT_HEIGHT))?;
        let tab = Self::open(&browser, page.path())?;

        let pdf = tab
            .print_to_pdf(Some(PrintToPdfOptions {
                print_background: Some(true),
                paper_width: Some(A4_WIDTH_IN),
                paper_height: Some(A4_HEIGHT_IN),
                margin_top: Some(0.0),
                margin_bottom: Some(0.0),
                margin_left: Some(0.0),
                margin_right: Some(0.0),
                prefer_css_page_size: Some(true),
                ..Default::default()
            }))
            .map_err(browser_err)?;

        if let Err(e) = tab.close(true) {
            warn!("Could not close browser tab: {e}");
        }
        Ok(pdf)
    }
}

#[async_trait]
impl Rasterizer for ChromeBackend {
    async fn rasterize(
        &self,
        html: &str,
        options: &RasterOptions,
    ) -> Result<RgbImage, ExportError> {
        let backend = self.clone();
        let html = html.to_string();
        let options = options.clone();
        let bitmap =
            tokio::task::spawn_blocking(move || backend.rasterize_blocking(&html, &options))
                .await
                .map_err(|e| ExportError::Rasterize(e.to_string()))??;
        info!("Rasterized page to {}x{}", bitmap.width(), bitmap.height());
        Ok(bitmap)
    }
}

#[async_trait]
impl PrintDialog for ChromeBackend {
    async fn print(&self, html: &str) -> Result<Vec<u8>, ExportError> {
        let backend = self.clone();
        let html = html.to_string();
        let pdf = tokio::task::spawn_blocking(move || backend.print_blocking(&html))
            .await
            .map_err(|e| ExportError::Browser(e.to_string()))??;
        info!("Printed page ({} bytes)", pdf.len());
        Ok(pdf)
    }
}
