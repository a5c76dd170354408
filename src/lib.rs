//! # resume-lens
//!
//! Structured resume critique against a target job role, powered by Google
//! Gemini.
//!
//! A resume (PDF or image) is prepared for upload, sent with a fixed
//! recruiter-style prompt and JSON schema, and the answer is parsed into an
//! [`AnalysisResult`]: score, overview, strengths, categorised skills,
//! missing sections, WHAT/WHY/HOW improvements, role alignment, and an
//! action plan.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Input    path or bytes + declared MIME type
//!  ├─ 2. Prepare  PDF → base64 as-is; image → ≤1500 px JPEG q80 → base64
//!  ├─ 3. Analyze  one Gemini generateContent call (JSON mode), no retries
//!  ├─ 4. Parse    strip fences → serde → schema validation
//!  └─ 5. Render   controller stores the result and shows the results view
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume_lens::{AnalyzerConfig, DocumentFile, SubmitOutcome, View, ViewController, NullRenderer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key from GEMINI_API_KEY
//!     let controller = ViewController::from_config(AnalyzerConfig::from_env(), NullRenderer)?;
//!     controller.navigate(View::Upload);
//!
//!     let file = DocumentFile::from_path("resume.pdf");
//!     if controller.submit(Some(file), "Backend Engineer").await == SubmitOutcome::Completed {
//!         let state = controller.state();
//!         println!("score: {}", state.last_result.unwrap().score);
//!     } else if let Some(err) = controller.state().last_error {
//!         eprintln!("{err}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `resume-lens` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod controller;
pub mod error;
pub mod gemini;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod render;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use controller::{IgnoreReason, SubmitOutcome, ViewController};
pub use error::{ErrorKind, ResumeLensError};
pub use gemini::{GeminiTransport, GenerateContentRequest};
pub use output::{AnalysisResult, Improvement, MatchLevel, MissingSection, RoleAlignment, Skills};
pub use pipeline::{prepare, AnalysisClient, DocumentFile, DocumentKind, PreparedDocument, Transport};
pub use progress::{NoopObserver, Observer, Stage, SubmissionObserver};
pub use render::{NullRenderer, Renderer};
pub use state::{AppState, Lifecycle, View};
