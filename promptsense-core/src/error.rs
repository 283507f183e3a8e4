//! Failure taxonomy for outbound service calls.

use thiserror::Error;

/// The one message shown to the user for any failed run.
///
/// The detailed cause goes to the log, never to the screen.
pub const SERVICE_ERROR_MESSAGE: &str = "Connection lost. Please check your API key or try again.";

/// Result alias used across the service layer.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Anything that can go wrong while asking the external service for a verdict.
///
/// Callers above the orchestrator treat every variant the same way; the
/// variants exist so the log says what actually happened.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("required input text is empty")]
    EmptyInput,

    #[error("no API key configured (set GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("service returned empty content")]
    EmptyContent,

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// The fixed user-facing text for this failure.
    pub fn user_message(&self) -> &'static str {
        SERVICE_ERROR_MESSAGE
    }
}
