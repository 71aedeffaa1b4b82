//! Runtime: terminal lifecycle and the event loop for the TUI.
//!
//! The loop is synchronous. It redraws, then blocks on `crossterm` input for
//! at most one tick so relative ages stay current while the user is idle.

use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::main_view::MainView;

const TICK: Duration = Duration::from_secs(1);

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Set up the terminal, run the event loop until the user quits, and restore
/// the terminal even when the loop fails.
pub fn run_app(mut app: App) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut main_view = MainView::default();
    let result = event_loop(&mut terminal, &mut app, &mut main_view);
    cleanup_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;

        if !event::poll(TICK)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let effects = main_view.handle_key_events(app, key);
                if !effects.is_empty() {
                    debug!(?effects, "Applying effects");
                }
                app.apply_effects(effects);
            }
            Event::Resize(width, height) => debug!(width, height, "Terminal resized"),
            _ => {}
        }
    }
    Ok(())
}
