//! Render contract between the controller and whatever draws the results.
//!
//! The controller calls [`Renderer::render`] after every navigation to the
//! results view, including when no analysis has succeeded yet.

use crate::state::AppState;

/// Projects application state onto a display surface.
pub trait Renderer {
    /// Draw the results view. `state.last_result` may be `None`.
    fn render(&self, state: &AppState);
}

/// Renderer for headless use; draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _state: &AppState) {}
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, state: &AppState) {
        (**self).render(state)
    }
}
