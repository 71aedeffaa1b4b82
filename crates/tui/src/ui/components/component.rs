//! Component system for the LeadDash TUI.
//!
//! Components own no store state. They read `App`, adjust purely local UI
//! state (selection, open flags) directly, and report everything else back as
//! [`Effect`]s for `App::apply_effects` to execute.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::app::{App, Effect};

/// A UI element with its own event handling and rendering.
pub(crate) trait Component {
    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into the given area.
    ///
    /// Implementations should be side-effect free except for frame drawing.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown while the component has focus.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }
}
