//! Error types for the resume-lens library.
//!
//! One enum covers every way a submission can fail. The variants map onto
//! four failure classes that callers treat differently:
//!
//! * [`ErrorKind::Configuration`] — nothing was sent; fix the setup
//!   (usually a missing `GEMINI_API_KEY`) before trying again.
//! * [`ErrorKind::DocumentRead`] — the uploaded file could not be read
//!   or decoded. Resubmitting the same file will fail the same way.
//! * [`ErrorKind::Service`] — the request never produced an answer
//!   (timeout, HTTP error, blocked prompt). A manual resubmit may succeed.
//! * [`ErrorKind::ResponseFormat`] — the service answered, but not in
//!   the agreed JSON shape. Usually a prompt/schema mismatch.
//!
//! Nothing in the crate retries automatically; every error is surfaced at the
//! submission boundary and stored as the controller's `last_error`.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the resume-lens library.
#[derive(Debug, Error)]
pub enum ResumeLensError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No API credential was configured.
    #[error("API key missing.\nSet GEMINI_API_KEY or pass --api-key.")]
    MissingApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Document errors ───────────────────────────────────────────────────
    /// The document could not be read from disk.
    #[error("Failed to read document '{path}': {source}")]
    DocumentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was read but contained no bytes.
    #[error("Document is empty: nothing to analyse")]
    EmptyDocument,

    /// The declared image could not be decoded or re-encoded.
    #[error("Failed to decode image ({mime_type}): {detail}")]
    ImageDecode { mime_type: String, detail: String },

    // ── Service errors ────────────────────────────────────────────────────
    /// The HTTP request could not be completed.
    #[error("Request to Gemini failed: {message}")]
    Transport { message: String },

    /// The request exceeded the configured timeout.
    #[error("Gemini did not respond within {secs}s")]
    Timeout { secs: u64 },

    /// The API answered with a non-success status.
    #[error("Gemini API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered successfully but produced no usable candidate.
    #[error("Gemini returned no analysis: {reason}")]
    EmptyResponse { reason: String },

    // ── Response format errors ────────────────────────────────────────────
    /// The candidate text was not valid JSON for the analysis schema.
    #[error("Analysis response is not valid JSON: {detail}")]
    MalformedResponse { detail: String },

    /// The JSON parsed but violated a schema constraint.
    #[error("Analysis response failed validation: field `{field}` {problem}")]
    SchemaViolation { field: String, problem: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The four failure classes a submission can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    DocumentRead,
    Service,
    ResponseFormat,
}

impl ResumeLensError {
    /// Classify the error. `Internal` counts as a service-side failure since
    /// resubmitting is the only remedy available to the user.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::InvalidConfig(_) => ErrorKind::Configuration,
            Self::DocumentUnreadable { .. } | Self::EmptyDocument | Self::ImageDecode { .. } => {
                ErrorKind::DocumentRead
            }
            Self::Transport { .. }
            | Self::Timeout { .. }
            | Self::Api { .. }
            | Self::EmptyResponse { .. }
            | Self::Internal(_) => ErrorKind::Service,
            Self::MalformedResponse { .. } | Self::SchemaViolation { .. } => {
                ErrorKind::ResponseFormat
            }
        }
    }
}
