//! Application state owned by the view controller.

use crate::output::AnalysisResult;
use std::fmt;
use std::str::FromStr;

/// The three views of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Home,
    Upload,
    Results,
}

impl View {
    pub const ALL: [View; 3] = [View::Home, View::Upload, View::Results];

    /// Route name, as used by navigation links.
    pub fn as_str(self) -> &'static str {
        match self {
            View::Home => "home",
            View::Upload => "upload",
            View::Results => "results",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown view '{s}'"))
    }
}

/// Request lifecycle, independent of the visible view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Idle,
    Submitting,
}

/// Everything the renderer needs to draw the current screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub current_view: View,
    pub lifecycle: Lifecycle,
    /// Role of the most recent submission.
    pub selected_role: String,
    /// Result of the last successful analysis. Kept when a later attempt fails.
    pub last_result: Option<AnalysisResult>,
    /// Message of the last failed attempt; cleared when a new attempt starts.
    pub last_error: Option<String>,
}

impl AppState {
    /// True while a submission is in flight; the submit action is disabled.
    pub fn is_busy(&self) -> bool {
        self.lifecycle == Lifecycle::Submitting
    }
}
