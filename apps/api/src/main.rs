mod config;
mod db;
mod documents;
mod errors;
mod export;
mod generation;
mod llm_client;
mod models;
mod preview;
mod render;
mod routes;
mod state;
mod templates;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::documents::DocumentStore;
use crate::export::chrome::ChromeBackend;
use crate::export::RasterOptions;
use crate::llm_client::{GenerationClient, TextGenerator};
use crate::preview::PreviewRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Persistence: lazy pool, schema prepared best-effort
    let documents = DocumentStore::new(create_pool(&config.database_url)?);
    if !documents.ensure_schema().await {
        warn!("Saved documents unavailable until the database is reachable");
    }

    // Generation client (optional)
    let generator: Option<Arc<dyn TextGenerator>> =
        match GenerationClient::new(config.gemini_api_key.clone()) {
            Ok(client) => {
                info!("Generation client initialized (model: {})", llm_client::MODEL);
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!("Generation disabled: {e}");
                None
            }
        };

    // Browser backend for raster export and printing
    let browser = Arc::new(ChromeBackend::new(config.chrome_path.clone()));
    let raster_options = RasterOptions::with_scale(config.export_scale);
    info!(
        "Raster export at {}x supersampling",
        raster_options.effective_scale()
    );

    // Preview sessions, with idle ones swept in the background
    let previews = PreviewRegistry::new();
    previews.spawn_eviction(Duration::from_secs(config.preview_idle_secs));
    info!("Idle previews expire after {}s", config.preview_idle_secs);

    let state = AppState {
        documents,
        generator,
        rasterizer: browser.clone(),
        printer: browser,
        previews,
        raster_options,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
