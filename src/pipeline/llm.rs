//! Analysis client: one `generateContent` call per submission.
//!
//! Prompt text lives in [`crate::prompts`] and the HTTP details in
//! [`crate::gemini`]; this module only assembles the request, checks the
//! credential, and turns the answer into an [`AnalysisResult`].
//!
//! ## No retries
//!
//! Every failure goes straight back to the caller. A resubmit is a user
//! decision, so the client never loops, sleeps, or keeps state between
//! calls.

use crate::config::AnalyzerConfig;
use crate::error::{ErrorKind, ResumeLensError};
use crate::gemini::{Blob, Content, GeminiTransport, GenerateContentRequest, GenerationConfig, Part};
use crate::output::AnalysisResult;
use crate::pipeline::{postprocess, PreparedDocument};
use crate::prompts::analysis_prompt;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Sends a prepared request to a generative model and returns its raw text.
///
/// [`GeminiTransport`] is the production implementation; tests substitute
/// an in-memory fake.
pub trait Transport {
    fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> impl Future<Output = Result<String, ResumeLensError>>;
}

/// Client for the external analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisClient<T = GeminiTransport> {
    config: AnalyzerConfig,
    transport: T,
}

impl AnalysisClient<GeminiTransport> {
    /// Client backed by the Gemini REST API.
    pub fn new(config: AnalyzerConfig) -> Result<Self, ResumeLensError> {
        let transport = GeminiTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> AnalysisClient<T> {
    /// Client backed by a caller-supplied transport.
    pub fn with_transport(config: AnalyzerConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Analyse `document` for `role`.
    ///
    /// # Errors
    /// - [`ResumeLensError::MissingApiKey`] when no credential is configured;
    ///   returned before the transport is touched.
    /// - Service errors from the transport, unchanged.
    /// - [`ResumeLensError::MalformedResponse`] /
    ///   [`ResumeLensError::SchemaViolation`] when the text does not match
    ///   the analysis schema.
    pub async fn analyze(
        &self,
        document: &PreparedDocument,
        role: &str,
    ) -> Result<AnalysisResult, ResumeLensError> {
        let api_key = self.config.credential().ok_or(ResumeLensError::MissingApiKey)?;

        let request = build_request(document, role);
        let start = Instant::now();
        info!(
            "Requesting analysis from {} ({}, {} bytes payload)",
            self.config.model,
            document.mime_type,
            document.payload.len()
        );

        let raw = self
            .transport
            .generate(api_key, &self.config.model, &request)
            .await?;
        debug!(
            "Received {} chars in {}ms",
            raw.len(),
            start.elapsed().as_millis()
        );

        let cleaned = postprocess::clean_json(&raw);
        AnalysisResult::from_json(&cleaned).inspect_err(|e| {
            if e.kind() == ErrorKind::ResponseFormat {
                warn!("Response did not match the analysis schema: {}", e);
            }
        })
    }
}

/// Assemble the single-turn request: document part first, then the prompt.
pub fn build_request(document: &PreparedDocument, role: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![
                Part::InlineData {
                    inline_data: Blob {
                        mime_type: document.mime_type.clone(),
                        data: document.payload.clone(),
                    },
                },
                Part::Text {
                    text: analysis_prompt(role, document.kind),
                },
            ],
        }],
        generation_config: GenerationConfig::json(),
    }
}
