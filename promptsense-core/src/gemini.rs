//! Gemini-backed [`PromptService`].
//!
//! One `generateContent` call per operation with a structured-output schema.
//! No retries: a failed call surfaces as an error and the user resubmits.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ServiceError};
use crate::prompts;
use crate::service::PromptService;
use crate::types::{AnalysisResult, IterationAdvice};

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, if there are any.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Builds a client. The request timeout is enforced by the orchestrator, not here.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingApiKey`] for a blank key and
    /// [`ServiceError::Http`] if the TLS backend cannot be initialised.
    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ServiceError::MissingApiKey);
        }
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Sends one structured-output request and deserializes the JSON it returns.
    async fn generate<T: DeserializeOwned>(
        &self,
        system: &str,
        content: &str,
        schema: Value,
    ) -> Result<T> {
        let body = GenerateRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![RequestPart { text: system }],
            },
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![RequestPart { text: content }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), raw));
        }

        let envelope: GenerateResponse = response.json().await?;
        if let Some(usage) = &envelope.usage_metadata {
            debug!(
                model = %self.model,
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "generateContent succeeded"
            );
        }
        parse_envelope(envelope)
    }
}

/// Builds an `Api` error, preferring the message inside a JSON error body.
fn api_error(status: u16, raw: String) -> ServiceError {
    let message = serde_json::from_str::<GeminiError>(&raw)
        .map(|e| e.error.message)
        .unwrap_or(raw);
    ServiceError::Api { status, message }
}

fn parse_envelope<T: DeserializeOwned>(envelope: GenerateResponse) -> Result<T> {
    let text = envelope.text().ok_or(ServiceError::EmptyContent)?;
    Ok(serde_json::from_str(strip_json_fences(&text))?)
}

/// Strips ```json ... ``` or ``` ... ``` fences some models wrap around JSON.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(rest) => {
            let rest = rest.trim_start();
            rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
        }
        None => text,
    }
}

#[async_trait]
impl PromptService for GeminiClient {
    async fn analyze(&self, prompt: &str) -> Result<AnalysisResult> {
        self.generate(
            prompts::ANALYZE_SYSTEM,
            &prompts::analyze_content(prompt),
            prompts::analysis_schema(),
        )
        .await
    }

    async fn fix_advice(
        &self,
        original_prompt: &str,
        observed_output: &str,
    ) -> Result<IterationAdvice> {
        self.generate(
            prompts::DEBUG_SYSTEM,
            &prompts::debug_content(original_prompt, observed_output),
            prompts::advice_schema(),
        )
        .await
    }
}
