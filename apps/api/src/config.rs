use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Absent disables the drafting endpoints (they answer 503).
    pub gemini_api_key: Option<String>,
    /// Browser binary for rasterizing and printing; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
    /// Raster export supersampling factor.
    pub export_scale: f64,
    /// Preview sessions unused for this many seconds are dropped.
    pub preview_idle_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            chrome_path: optional_env("CHROME_PATH").map(PathBuf::from),
            export_scale: std::env::var("EXPORT_SCALE")
                .unwrap_or_else(|_| "2.0".to_string())
                .parse::<f64>()
                .context("EXPORT_SCALE must be a number")?,
            preview_idle_secs: std::env::var("PREVIEW_IDLE_SECS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse::<u64>()
                .context("PREVIEW_IDLE_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
