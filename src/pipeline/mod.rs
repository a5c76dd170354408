//! Pipeline stages for resume analysis.
//!
//! Each submodule implements exactly one transformation step so it can be
//! tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ llm ──▶ postprocess ──▶ AnalysisResult
//! (file)    (base64)   (Gemini) (cleanup)
//! ```
//!
//! 1. [`input`]  — describe the uploaded file and load its bytes
//! 2. [`encode`] — base64 the document; downscale and JPEG-encode images
//! 3. [`llm`]    — one `generateContent` call per submission, no retries
//! 4. [`postprocess`] — strip model quirks (fences, BOM) before JSON parsing

pub mod encode;
pub mod input;
pub mod llm;
pub mod postprocess;

pub use encode::{fit_within, prepare};
pub use input::DocumentFile;
pub use llm::{AnalysisClient, Transport};

/// What kind of document was uploaded. Drives both encoding and the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Any `image/*` upload; re-encoded as JPEG and OCR'd by the model.
    Image,
    /// Everything else (PDF in practice); sent byte-for-byte.
    Document,
}

impl DocumentKind {
    /// Classify a MIME type.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.trim().to_ascii_lowercase().starts_with("image/") {
            Self::Image
        } else {
            Self::Document
        }
    }
}

/// A document ready to embed in an API request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    /// Raw base64 (standard alphabet, padded). Never a `data:` URL.
    pub payload: String,
    /// MIME type of the payload bytes; `image/jpeg` for every image.
    pub mime_type: String,
    pub kind: DocumentKind,
    /// Final pixel dimensions for images.
    pub dimensions: Option<(u32, u32)>,
}
