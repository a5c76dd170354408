//! Observer trait for submission lifecycle events.
//!
//! Inject an [`Arc<dyn SubmissionObserver>`] via
//! [`crate::controller::ViewController::with_observer`] to drive a spinner,
//! a status line, or a log of state transitions.
//!
//! # Example
//!
//! ```rust
//! use resume_lens::{Lifecycle, Stage, SubmissionObserver};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct StatusLine {
//!     last: Mutex<Option<String>>,
//! }
//!
//! impl SubmissionObserver for StatusLine {
//!     fn on_stage(&self, stage: Stage) {
//!         *self.last.lock().unwrap() = Some(stage.message().to_string());
//!     }
//!
//!     fn on_lifecycle_change(&self, lifecycle: Lifecycle) {
//!         if lifecycle == Lifecycle::Idle {
//!             *self.last.lock().unwrap() = None;
//!         }
//!     }
//! }
//! ```

use crate::state::Lifecycle;
use std::sync::Arc;

/// The long-running steps of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading, downscaling and encoding the document.
    Preparing,
    /// Waiting on the analysis service.
    Consulting,
}

impl Stage {
    /// Status text shown while the stage runs.
    pub fn message(self) -> &'static str {
        match self {
            Stage::Preparing => "Preparing document...",
            Stage::Consulting => "Consulting Gemini AI...",
        }
    }
}

/// Receives submission events from the view controller.
///
/// All methods default to no-ops so implementors only override what they
/// need. Calls arrive on the thread driving the submission, in order.
pub trait SubmissionObserver: Send + Sync {
    /// The lifecycle moved to `lifecycle` (idle → submitting or back).
    fn on_lifecycle_change(&self, lifecycle: Lifecycle) {
        let _ = lifecycle;
    }

    /// A pipeline stage started.
    fn on_stage(&self, stage: Stage) {
        let _ = stage;
    }

    /// The submission failed; `message` is what was stored as `last_error`.
    fn on_error(&self, message: &str) {
        let _ = message;
    }
}

/// Type alias for a shared observer.
pub type Observer = Arc<dyn SubmissionObserver>;

/// An observer that ignores every event.
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}
