//! Gemini `generateContent` REST transport.
//!
//! Only the slice of the API this crate uses is modelled: one user turn with
//! an inline document part and a text part, JSON response mode, and the
//! candidate text plus token usage on the way back.

use crate::config::AnalyzerConfig;
use crate::error::ResumeLensError;
use crate::pipeline::Transport;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

// ── Request ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    /// Raw base64, no `data:` prefix.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
}

impl GenerationConfig {
    pub fn json() -> Self {
        Self {
            response_mime_type: "application/json".to_string(),
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u64>,
    pub candidates_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    ///
    /// A response with no candidates (blocked prompt) or whose first
    /// candidate carries no text is a service failure, not a format one:
    /// there is nothing to parse.
    pub fn text(&self) -> Result<String, ResumeLensError> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .map(|r| format!("prompt blocked ({r})"))
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(ResumeLensError::EmptyResponse { reason });
        };

        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            let reason = match candidate.finish_reason.as_deref() {
                Some(r) => format!("empty candidate (finish reason {r})"),
                None => "empty candidate".to_string(),
            };
            return Err(ResumeLensError::EmptyResponse { reason });
        }
        Ok(text)
    }
}

// ── Transport ────────────────────────────────────────────────────────────

/// HTTP transport for the hosted Gemini API.
///
/// Holds a pooled `reqwest::Client` but no session state; every call is an
/// independent request.
#[derive(Debug, Clone)]
pub struct GeminiTransport {
    client: Client,
    api_base: String,
    timeout_secs: u64,
}

impl GeminiTransport {
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ResumeLensError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ResumeLensError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            timeout_secs: config.request_timeout_secs,
        })
    }

    /// Endpoint URL for `model`.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    fn map_reqwest(&self, e: reqwest::Error) -> ResumeLensError {
        if e.is_timeout() {
            ResumeLensError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            ResumeLensError::Transport {
                message: e.to_string(),
            }
        }
    }
}

impl Transport for GeminiTransport {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, ResumeLensError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, body);
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ResumeLensError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse =
            response.json().await.map_err(|e| self.map_reqwest(e))?;

        if let Some(ref usage) = body.usage_metadata {
            debug!(
                "Gemini usage: {} input tokens, {} output tokens",
                usage.prompt_token_count.unwrap_or(0),
                usage.candidates_token_count.unwrap_or(0)
            );
        }

        body.text()
    }
}
