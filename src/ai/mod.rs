/// AI module for Finch
///
/// One provider: the Google generative-language (Gemini)
/// `generateContent` endpoint, called over plain HTTP. The client is an
/// explicitly constructed value (no module-level singleton) injected
/// into the request pipeline behind the `GenerationService` trait, so
/// tests can substitute a scripted fake.
mod gemini;

pub use gemini::{DEFAULT_MODEL, GeminiClient, InlineData, Part, SAFETY_SETTINGS, SafetySetting};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("Gemini error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("response blocked: {0}")]
    Blocked(String),
    #[error("empty response from model")]
    EmptyResponse,
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Transport(err.to_string())
    }
}

/// The seam between the pipeline and the external service. One call,
/// one textual result; no streaming.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, parts: Vec<Part>) -> Result<String, ServiceError>;
}
