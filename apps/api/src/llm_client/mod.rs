//! Generation Client: drafts prose for the forms through the hosted Gemini
//! `generateContent` API.
//!
//! The client is constructed explicitly from configuration and handed to the
//! handlers through `AppState`. A missing API key fails at construction.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const MODEL: &str = "gemini-pro";
/// Attempts per call, the first included.
const MAX_ATTEMPTS: u32 = 3;

/// Errors surfaced to the forms. Messages are shown to the user as-is.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Google Gemini API key is missing. Set GEMINI_API_KEY to enable generation.")]
    MissingCredentials,

    #[error("{0}")]
    MissingInput(String),

    #[error("{0}")]
    Upstream(String),
}

/// Transport-level failures, folded into `GenerationError::Upstream`.
#[derive(Debug, Error)]
enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,
}

/// What to draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    About { title: String },
    ExperienceDescription { position: String, company: String },
    CoverLetter { title: String, company: String },
}

impl GenerationRequest {
    fn label(&self) -> &'static str {
        match self {
            GenerationRequest::About { .. } => "About Me generation",
            GenerationRequest::ExperienceDescription { .. } => "Experience description generation",
            GenerationRequest::CoverLetter { .. } => "Cover letter generation",
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            GenerationRequest::About { title } => prompts::about_prompt(title),
            GenerationRequest::ExperienceDescription { position, company } => {
                prompts::experience_prompt(position, company)
            }
            GenerationRequest::CoverLetter { title, company } => {
                prompts::cover_letter_prompt(title, company)
            }
        }
    }
}

/// Text generation seam. `GenerationClient` is the production implementation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    async fn generate_about(&self, title: &str) -> Result<String, GenerationError> {
        self.generate(&GenerationRequest::About {
            title: title.to_string(),
        })
        .await
    }

    async fn generate_experience(
        &self,
        position: &str,
        company: &str,
    ) -> Result<String, GenerationError> {
        self.generate(&GenerationRequest::ExperienceDescription {
            position: position.to_string(),
            company: company.to_string(),
        })
        .await
    }

    async fn generate_cover_letter(
        &self,
        title: &str,
        company: &str,
    ) -> Result<String, GenerationError> {
        self.generate(&GenerationRequest::CoverLetter {
            title: title.to_string(),
            company: company.to_string(),
        })
        .await
    }
}

/// Subject line for a cover letter. Formatted locally, no model call.
pub fn generate_subject(title: &str) -> String {
    format!("Application for {} Position", title.trim())
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CandidateContent {
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .and_then(|p| p.text.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    api_key: String,
}

impl GenerationClient {
    pub fn new(api_key: Option<String>) -> Result<Self, GenerationError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerationError::MissingCredentials)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| GenerationError::Upstream(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client, api_key })
    }

    fn endpoint(&self) -> String {
        format!("{GEMINI_API_BASE}/{MODEL}:generateContent")
    }

    /// Raw call to `generateContent`. Retries on 429 and 5xx with
    /// exponential backoff.
    async fn call(&self, prompt: &str) -> Result<String, ApiError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        with_retries(|| self.send_once(&body)).await
    }

    /// One request. Transport errors, 429 and 5xx come back as `Retry`.
    async fn send_once(&self, body: &GenerateContentRequest<'_>) -> Result<String, Attempt> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| Attempt::Retry(ApiError::Http(e)))?;

        let status = response.status();

        if is_retryable(status.as_u16()) {
            let text = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, text);
            return Err(Attempt::Retry(ApiError::Api {
                status: status.as_u16(),
                message: text,
            }));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(Attempt::Fail(ApiError::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Attempt::Fail(ApiError::Http(e)))?;
        let text = parsed
            .text()
            .ok_or(Attempt::Fail(ApiError::EmptyContent))?
            .to_string();
        debug!("Generation succeeded ({} chars)", text.len());
        Ok(text)
    }
}

/// Outcome of a failed attempt.
#[derive(Debug)]
enum Attempt {
    Retry(ApiError),
    Fail(ApiError),
}

fn is_retryable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Delay before retry number `attempt`, counted from 1: 1s, 2s, 4s, ...
fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(1000 << attempt.saturating_sub(1).min(10))
}

/// Runs `send` up to `MAX_ATTEMPTS` times, returning the first success or
/// the error of the last attempt.
async fn with_retries<F, Fut>(mut send: F) -> Result<String, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, Attempt>>,
{
    let mut attempt = 0;
    loop {
        match send().await {
            Ok(text) => return Ok(text),
            Err(Attempt::Fail(e)) => return Err(e),
            Err(Attempt::Retry(e)) if attempt + 1 >= MAX_ATTEMPTS => return Err(e),
            Err(Attempt::Retry(e)) => {
                attempt += 1;
                let delay = backoff(attempt);
                warn!(
                    "Generation attempt {attempt} failed ({e}), retrying after {}ms...",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.call(&request.prompt())
            .await
            .map_err(|e| GenerationError::Upstream(format!("{} failed: {e}", request.label())))
    }
}
