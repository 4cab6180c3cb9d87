//! One preview session: the mounted visual tree plus the download and print
//! actions the overlay offers.
//!
//! State machine: `idle → downloading → idle` and `idle → printing → idle`.
//! A second action while one is running is rejected, and the state returns
//! to idle on every exit path.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::export::{
    export_raster, DocumentSurface, ExportArtifact, ExportError, MountId, MountRole, PrintDialog,
    RasterOptions, Rasterizer,
};
use crate::models::document::DocumentKind;
use crate::preview::progress::ProgressTicker;
use crate::render::{Element, VisualTree};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("a download is already in progress")]
    DownloadInFlight,

    #[error("preview is busy {0}")]
    Busy(&'static str),

    #[error("expected a {expected} document, got {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellState {
    Idle,
    Downloading,
    Printing,
}

impl ShellState {
    fn as_str(&self) -> &'static str {
        match self {
            ShellState::Idle => "idle",
            ShellState::Downloading => "downloading",
            ShellState::Printing => "printing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShellStatus {
    pub state: ShellState,
    /// Cosmetic download progress, 0–100.
    pub progress: u8,
}

pub struct PreviewShell {
    kind: DocumentKind,
    surface: DocumentSurface,
    preview: MountId,
    state: Mutex<ShellState>,
    progress: watch::Sender<u8>,
    ticker: ProgressTicker,
}

/// Puts the shell back to idle when the action ends.
struct ActionGuard<'a> {
    shell: &'a PreviewShell,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        *self.shell.lock_state() = ShellState::Idle;
    }
}

impl PreviewShell {
    /// Mounts `tree` as the live preview.
    pub fn open(tree: VisualTree) -> Self {
        Self::with_ticker(tree, ProgressTicker::default())
    }

    pub fn with_ticker(tree: VisualTree, ticker: ProgressTicker) -> Self {
        let kind = tree.kind;
        let surface = DocumentSurface::new();
        let preview = surface.mount(MountRole::Preview, tree);
        let (progress, _) = watch::channel(0);
        Self {
            kind,
            surface,
            preview,
            state: Mutex::new(ShellState::Idle),
            progress,
            ticker,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ShellState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, action: ShellState) -> Result<ActionGuard<'_>, ShellError> {
        let mut state = self.lock_state();
        match (*state, action) {
            (ShellState::Idle, _) => {
                *state = action;
                Ok(ActionGuard { shell: self })
            }
            (ShellState::Downloading, ShellState::Downloading) => Err(ShellError::DownloadInFlight),
            (busy, _) => Err(ShellError::Busy(busy.as_str())),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Replaces the mounted tree with a fresh render of the same document kind.
    pub fn update(&self, tree: VisualTree) -> Result<(), ShellError> {
        if tree.kind != self.kind {
            return Err(ShellError::KindMismatch {
                expected: self.kind.as_str(),
                found: tree.kind.as_str(),
            });
        }
        if !self.surface.replace(self.preview, tree) {
            return Err(ExportError::MissingPreview.into());
        }
        Ok(())
    }

    /// Runs `f` against the mounted preview tree.
    pub fn read<T>(&self, f: impl FnOnce(&VisualTree) -> T) -> Option<T> {
        self.surface.read(self.preview, f)
    }

    /// False while a download or print is running.
    pub fn is_idle(&self) -> bool {
        *self.lock_state() == ShellState::Idle
    }

    pub fn status(&self) -> ShellStatus {
        ShellStatus {
            state: *self.lock_state(),
            progress: *self.progress.borrow(),
        }
    }

    /// Raster export of the tree as mounted when this is called.
    ///
    /// Progress runs alongside the export and reaches 100 before the
    /// artifact is returned; it stays there until the next download.
    pub async fn download(
        &self,
        rasterizer: &dyn Rasterizer,
        options: &RasterOptions,
    ) -> Result<ExportArtifact, ShellError> {
        let _action = self.begin(ShellState::Downloading)?;
        info!("Download of {} started", self.kind.as_str());

        // The export is polled first, so its snapshot is taken before either
        // side yields.
        let export = export_raster(&self.surface, self.preview, rasterizer, options);
        let ticker = async {
            self.ticker.run(&self.progress).await;
            Ok::<_, ExportError>(())
        };
        let result = tokio::try_join!(export, ticker);

        match result {
            Ok((artifact, ())) => Ok(artifact),
            Err(e) => {
                warn!("Download of {} failed: {e}", self.kind.as_str());
                self.progress.send_replace(0);
                Err(e.into())
            }
        }
    }

    /// Prints the preview from a full-page overlay copy, removed afterwards
    /// whatever the printer reports.
    pub async fn print(&self, printer: &dyn PrintDialog) -> Result<Vec<u8>, ShellError> {
        let _action = self.begin(ShellState::Printing)?;
        let tree = self
            .surface
            .snapshot(self.preview)
            .ok_or(ExportError::MissingPreview)?;

        let overlay = self
            .surface
            .attach_scoped(MountRole::PrintOverlay, print_overlay(tree));
        let html = overlay.html_document().ok_or(ExportError::MissingPreview)?;

        let printed = printer.print(&html).await?;
        info!("Printed {} ({} bytes)", self.kind.as_str(), printed.len());
        Ok(printed)
    }
}

/// Wraps the page in a fixed, white, topmost container sized to the viewport.
fn print_overlay(tree: VisualTree) -> VisualTree {
    let mut page = tree.root;
    page.remove_style("box-shadow");
    page.set_style("width", "100%");
    page.set_style("min-height", "100%");
    page.set_style("padding", "0");
    page.set_style("margin", "0");
    page.set_style("background", "white");
    page.set_style("transform", "scale(1)");
    page.set_style("transform-origin", "top center");

    let container = Element::new("div")
        .attr("class", "print-container")
        .style("position", "fixed")
        .style("left", "0")
        .style("top", "0")
        .style("width", "100%")
        .style("height", "100%")
        .style("display", "flex")
        .style("align-items", "flex-start")
        .style("justify-content", "center")
        .style("background", "white")
        .style("z-index", "9999")
        .style("padding", "0")
        .child(page);

    VisualTree {
        root: container,
        ..tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::export::raster::tests::{jane, FailingRasterizer, SolidRasterizer};
    use crate::models::document::CoverLetter;
    use crate::preview::progress::PROGRESS_DONE;
    use crate::render::{render_cover_letter, render_resume};

    fn shell() -> PreviewShell {
        PreviewShell::open(render_resume(&jane(), "modern-professional"))
    }

    /// Records how many overlays were mounted while it printed.
    struct RecordingPrinter {
        shell: Arc<PreviewShell>,
        overlays_seen: Mutex<Option<usize>>,
        fail: bool,
    }

    #[async_trait]
    impl PrintDialog for RecordingPrinter {
        async fn print(&self, html: &str) -> Result<Vec<u8>, ExportError> {
            *self.overlays_seen.lock().unwrap() =
                Some(self.shell.surface.count(MountRole::PrintOverlay));
            assert!(html.contains("z-index: 9999"));
            if self.fail {
                Err(ExportError::Browser("dismissed".into()))
            } else {
                Ok(b"%PDF-printed".to_vec())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_is_monotonic_and_reaches_done() {
        let shell = Arc::new(shell());
        let mut rx = shell.progress.subscribe();

        let collector = tokio::spawn(async move {
            let mut seen = vec![*rx.borrow_and_update()];
            while rx.changed().await.is_ok() {
                let value = *rx.borrow_and_update();
                seen.push(value);
                if value == PROGRESS_DONE {
                    break;
                }
            }
            seen
        });

        let artifact = shell
            .download(&SolidRasterizer::default(), &RasterOptions::default())
            .await
            .unwrap();
        assert_eq!(artifact.filename, "resume.pdf");

        let seen = collector.await.unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
        assert_eq!(seen.last(), Some(&PROGRESS_DONE));
        assert_eq!(shell.status().state, ShellState::Idle);
        assert_eq!(shell.status().progress, PROGRESS_DONE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_download_rejected_while_first_runs() {
        let shell = shell();
        let rasterizer = SolidRasterizer::default();
        let options = RasterOptions::default();

        let (first, second) = tokio::join!(
            shell.download(&rasterizer, &options),
            shell.download(&rasterizer, &options)
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(ShellError::DownloadInFlight)));
        assert_eq!(shell.status().state, ShellState::Idle);
        assert_eq!(rasterizer.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_download_returns_to_idle_without_clone() {
        let shell = shell();
        let result = shell
            .download(&FailingRasterizer, &RasterOptions::default())
            .await;

        assert!(matches!(result, Err(ShellError::Export(ExportError::Rasterize(_)))));
        assert_eq!(shell.status().state, ShellState::Idle);
        assert_eq!(shell.surface.count(MountRole::ExportClone), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_uses_tree_as_of_invocation() {
        let shell = Arc::new(shell());
        let rasterizer = Arc::new(SolidRasterizer::default());

        let task = {
            let shell = shell.clone();
            let rasterizer = rasterizer.clone();
            tokio::spawn(async move {
                shell
                    .download(rasterizer.as_ref(), &RasterOptions::default())
                    .await
                    .map(|a| a.filename)
            })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;

        let mut edited = jane();
        edited.full_name = "Edited Name".into();
        shell.update(render_resume(&edited, "modern-professional")).unwrap();

        assert_eq!(task.await.unwrap().unwrap(), "resume.pdf");
        let seen = rasterizer.seen.lock().unwrap();
        assert!(seen[0].0.contains("Jane Doe"));
        assert!(!seen[0].0.contains("Edited Name"));
    }

    #[tokio::test]
    async fn test_print_mounts_overlay_and_removes_it() {
        let shell = Arc::new(shell());
        let printer = RecordingPrinter {
            shell: shell.clone(),
            overlays_seen: Mutex::new(None),
            fail: false,
        };

        let printed = shell.print(&printer).await.unwrap();

        assert_eq!(printed, b"%PDF-printed".to_vec());
        assert_eq!(*printer.overlays_seen.lock().unwrap(), Some(1));
        assert_eq!(shell.surface.count(MountRole::PrintOverlay), 0);
        assert_eq!(shell.status().state, ShellState::Idle);
    }

    #[tokio::test]
    async fn test_failed_print_still_removes_overlay() {
        let shell = Arc::new(shell());
        let printer = RecordingPrinter {
            shell: shell.clone(),
            overlays_seen: Mutex::new(None),
            fail: true,
        };

        assert!(shell.print(&printer).await.is_err());
        assert_eq!(shell.surface.count(MountRole::PrintOverlay), 0);
        assert_eq!(shell.status().state, ShellState::Idle);
    }

    #[test]
    fn test_update_rejects_other_document_kind() {
        let shell = shell();
        let letter = render_cover_letter(&CoverLetter::default(), "modern-professional");
        assert!(matches!(
            shell.update(letter),
            Err(ShellError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_update_replaces_preview() {
        let shell = shell();
        let mut edited = jane();
        edited.full_name = "Edited Name".into();
        shell.update(render_resume(&edited, "modern-professional")).unwrap();
        let html = shell.read(VisualTree::to_html_fragment).unwrap();
        assert!(html.contains("Edited Name"));
    }
}
