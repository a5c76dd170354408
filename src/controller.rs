//! View controller: view routing plus the submission lifecycle.
//!
//! ## State machine
//!
//! ```text
//!            submit(file, role)
//!   Idle ──────────────────────▶ Submitting
//!    ▲                               │
//!    │  ok: store result, → Results  │ prepare ─▶ analyze
//!    └───────────────────────────────┘
//!       err: store message, view unchanged
//! ```
//!
//! Navigation is orthogonal to the lifecycle and allowed in either state.
//!
//! ## Single flight without a lock
//!
//! The state lives in a `RefCell` and every method takes `&self`, so two
//! `submit` futures for the same controller can be polled concurrently on
//! one thread. The lifecycle gate makes the second one a no-op. Borrows are
//! released before every `.await`.
//!
//! A `submit` future dropped mid-flight (timeout, `select!`, aborted task)
//! puts the lifecycle back to `Idle` on drop, so the gate never stays shut.

use crate::config::AnalyzerConfig;
use crate::error::{ErrorKind, ResumeLensError};
use crate::gemini::GeminiTransport;
use crate::output::AnalysisResult;
use crate::pipeline::{self, AnalysisClient, DocumentFile, Transport};
use crate::progress::{Observer, Stage};
use crate::render::Renderer;
use crate::state::{AppState, Lifecycle, View};
use std::cell::RefCell;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Why a `submit` call did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Another submission is in flight.
    Busy,
    /// No file was selected.
    MissingFile,
    /// The role was empty or blank.
    MissingRole,
}

/// How a `submit` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Gate closed; state untouched, nothing sent.
    Ignored(IgnoreReason),
    /// Analysis stored and the results view shown.
    Completed,
    /// The attempt failed; the message is in `last_error`.
    Failed(ErrorKind),
}

/// Owns the [`AppState`] and drives it.
pub struct ViewController<T = GeminiTransport, R = crate::render::NullRenderer> {
    state: RefCell<AppState>,
    client: AnalysisClient<T>,
    renderer: R,
    observer: Option<Observer>,
}

impl<R: Renderer> ViewController<GeminiTransport, R> {
    /// Controller talking to the Gemini API.
    pub fn from_config(config: AnalyzerConfig, renderer: R) -> Result<Self, ResumeLensError> {
        Ok(Self::new(AnalysisClient::new(config)?, renderer))
    }
}

impl<T: Transport, R: Renderer> ViewController<T, R> {
    /// Start in the home view, idle, with no result.
    pub fn new(client: AnalysisClient<T>, renderer: R) -> Self {
        Self {
            state: RefCell::new(AppState::default()),
            client,
            renderer,
            observer: None,
        }
    }

    /// Attach an observer for lifecycle and stage events.
    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn current_view(&self) -> View {
        self.state.borrow().current_view
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.borrow().lifecycle
    }

    pub fn client(&self) -> &AnalysisClient<T> {
        &self.client
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Show `target`. Rendering happens on every navigation to `Results`.
    pub fn navigate(&self, target: View) {
        self.state.borrow_mut().current_view = target;
        debug!("Navigated to {}", target);

        if target == View::Results {
            self.renderer.render(&self.state.borrow());
        }
    }

    /// Navigate by route name. Unknown names are ignored and return `false`.
    pub fn navigate_named(&self, name: &str) -> bool {
        match name.parse::<View>() {
            Ok(view) => {
                self.navigate(view);
                true
            }
            Err(e) => {
                debug!("Ignoring navigation: {}", e);
                false
            }
        }
    }

    /// Prepare `file`, analyse it for `role`, and show the result.
    ///
    /// Ignored unless the controller is idle and both inputs are present.
    /// Failures never propagate: they end up in `last_error`.
    pub async fn submit(&self, file: Option<DocumentFile>, role: &str) -> SubmitOutcome {
        let role = role.trim();
        let file = match self.begin(file, role) {
            Ok(file) => file,
            Err(reason) => {
                debug!("Submit ignored: {:?}", reason);
                return SubmitOutcome::Ignored(reason);
            }
        };

        let guard = InFlight {
            state: &self.state,
            observer: self.observer.as_ref(),
            armed: true,
        };
        let start = Instant::now();
        info!("Submitting {} for role \"{}\"", file.mime_type, role);

        let outcome = self.run(file, role).await;
        guard.disarm();

        match outcome {
            Ok(result) => {
                info!(
                    "Analysis complete: score {} in {}ms",
                    result.score,
                    start.elapsed().as_millis()
                );
                self.complete(result);
                SubmitOutcome::Completed
            }
            Err(e) => {
                let kind = e.kind();
                self.fail(&e);
                SubmitOutcome::Failed(kind)
            }
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────

    /// Idle → Submitting, if the gate is open.
    fn begin(&self, file: Option<DocumentFile>, role: &str) -> Result<DocumentFile, IgnoreReason> {
        let mut state = self.state.borrow_mut();
        if state.lifecycle == Lifecycle::Submitting {
            return Err(IgnoreReason::Busy);
        }
        let file = file.ok_or(IgnoreReason::MissingFile)?;
        if role.is_empty() {
            return Err(IgnoreReason::MissingRole);
        }

        state.lifecycle = Lifecycle::Submitting;
        state.selected_role = role.to_string();
        state.last_error = None;
        drop(state);

        self.notify_lifecycle(Lifecycle::Submitting);
        Ok(file)
    }

    async fn run(&self, file: DocumentFile, role: &str) -> Result<AnalysisResult, ResumeLensError> {
        self.notify_stage(Stage::Preparing);
        let document = pipeline::prepare(file, self.client.config()).await?;

        self.notify_stage(Stage::Consulting);
        self.client.analyze(&document, role).await
    }

    /// Submitting → Idle with a result, then show it.
    fn complete(&self, result: AnalysisResult) {
        {
            let mut state = self.state.borrow_mut();
            state.last_result = Some(result);
            state.last_error = None;
            state.lifecycle = Lifecycle::Idle;
        }
        self.notify_lifecycle(Lifecycle::Idle);
        self.navigate(View::Results);
    }

    /// Submitting → Idle with an error. The previous result and the current
    /// view are left as they were.
    fn fail(&self, error: &ResumeLensError) {
        let message = error.to_string();
        match error.kind() {
            ErrorKind::ResponseFormat => warn!("Analysis response rejected: {}", message),
            kind => warn!("Submission failed ({:?}): {}", kind, message),
        }

        {
            let mut state = self.state.borrow_mut();
            state.last_error = Some(message.clone());
            state.lifecycle = Lifecycle::Idle;
        }
        if let Some(ref o) = self.observer {
            o.on_error(&message);
        }
        self.notify_lifecycle(Lifecycle::Idle);
    }

    fn notify_lifecycle(&self, lifecycle: Lifecycle) {
        if let Some(ref o) = self.observer {
            o.on_lifecycle_change(lifecycle);
        }
    }

    fn notify_stage(&self, stage: Stage) {
        if let Some(ref o) = self.observer {
            o.on_stage(stage);
        }
    }
}

/// Restores `Idle` if a submission is abandoned before it completes or fails.
struct InFlight<'a> {
    state: &'a RefCell<AppState>,
    observer: Option<&'a Observer>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return;
        };
        state.lifecycle = Lifecycle::Idle;
        drop(state);

        warn!("Submission abandoned before completion");
        if let Some(o) = self.observer {
            o.on_lifecycle_change(Lifecycle::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::GenerateContentRequest;
    use crate::render::NullRenderer;

    struct NeverCalled;

    impl Transport for NeverCalled {
        async fn generate(
            &self,
            _api_key: &str,
            _model: &str,
            _request: &GenerateContentRequest,
        ) -> Result<String, ResumeLensError> {
            panic!("transport must not be reached");
        }
    }

    struct Stalls;

    impl Transport for Stalls {
        async fn generate(
            &self,
            _api_key: &str,
            _model: &str,
            _request: &GenerateContentRequest,
        ) -> Result<String, ResumeLensError> {
            std::future::pending().await
        }
    }

    fn controller() -> ViewController<NeverCalled, NullRenderer> {
        let config = AnalyzerConfig::builder().api_key("k").build().unwrap();
        ViewController::new(AnalysisClient::with_transport(config, NeverCalled), NullRenderer)
    }

    #[test]
    fn starts_home_and_idle() {
        let c = controller();
        assert_eq!(c.current_view(), View::Home);
        assert_eq!(c.lifecycle(), Lifecycle::Idle);
    }

    #[test]
    fn navigate_named_rejects_unknown_routes() {
        let c = controller();
        assert!(c.navigate_named("upload"));
        assert_eq!(c.current_view(), View::Upload);
        assert!(!c.navigate_named("admin"));
        assert_eq!(c.current_view(), View::Upload);
    }

    #[tokio::test]
    async fn submit_without_file_is_ignored() {
        let c = controller();
        let before = c.state();
        assert_eq!(
            c.submit(None, "Engineer").await,
            SubmitOutcome::Ignored(IgnoreReason::MissingFile)
        );
        assert_eq!(c.state(), before);
    }

    #[tokio::test]
    async fn submit_with_blank_role_is_ignored() {
        let c = controller();
        let file = DocumentFile::from_bytes(b"%PDF".to_vec(), "application/pdf");
        assert_eq!(
            c.submit(Some(file), "   ").await,
            SubmitOutcome::Ignored(IgnoreReason::MissingRole)
        );
        assert_eq!(c.lifecycle(), Lifecycle::Idle);
    }

    #[tokio::test]
    async fn unreadable_file_fails_before_transport() {
        let c = controller();
        c.navigate(View::Upload);
        let file = DocumentFile::from_path("/no/such/resume.pdf");
        let outcome = c.submit(Some(file), "Engineer").await;

        assert_eq!(outcome, SubmitOutcome::Failed(ErrorKind::DocumentRead));
        let s = c.state();
        assert_eq!(s.current_view, View::Upload);
        assert_eq!(s.lifecycle, Lifecycle::Idle);
        assert_eq!(s.selected_role, "Engineer");
        assert!(s.last_error.unwrap().contains("/no/such/resume.pdf"));
    }

    #[tokio::test]
    async fn dropped_submit_reopens_gate() {
        let config = AnalyzerConfig::builder().api_key("k").build().unwrap();
        let c = ViewController::new(AnalysisClient::with_transport(config, Stalls), NullRenderer);
        let file = DocumentFile::from_bytes(b"%PDF".to_vec(), "application/pdf");

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            c.submit(Some(file), "Engineer"),
        )
        .await;
        assert!(timed_out.is_err());
        assert_eq!(c.lifecycle(), Lifecycle::Idle);

        let outcome = c
            .submit(Some(DocumentFile::from_path("/no/such/resume.pdf")), "Engineer")
            .await;
        assert_eq!(outcome, SubmitOutcome::Failed(ErrorKind::DocumentRead));
    }
}
