//! Top-level view: header, dashboard body and the notification panel overlay.
//!
//! Global keys are handled here; everything else goes to the panel while it
//! is open.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::app::{App, Effect};
use crate::ui::components::{Component, HeaderComponent, NotificationsComponent};
use crate::ui::theme::theme_helpers as th;

const HEADER_HEIGHT: u16 = 3;

#[derive(Debug, Default)]
pub struct MainView {
    header: HeaderComponent,
    notifications: NotificationsComponent,
}

impl MainView {
    fn render_body(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.theme;
        let mut lines = vec![
            Line::from(Span::styled("Welcome back!", theme.text_primary_style())),
            Line::from(Span::styled(
                format!("You have {} unread notification(s).", app.store.unread()),
                theme.text_secondary_style(),
            )),
            Line::from(""),
        ];
        if let Some(status) = &app.status {
            lines.push(Line::from(Span::styled(status.as_str(), theme.status_info())));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(th::build_hint_spans(
            theme,
            &[(" n", " Notifications  "), (" D", " Dark mode  "), (" q", " Quit")],
        )));

        let body = Paragraph::new(lines).wrap(Wrap { trim: true }).block(Block::default());
        frame.render_widget(body, area);
    }
}

impl Component for MainView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Effect::Quit];
        }
        match key.code {
            KeyCode::Char('q') => vec![Effect::Quit],
            KeyCode::Char('n') => vec![Effect::TogglePanel],
            KeyCode::Char('D') => vec![Effect::ToggleDarkMode],
            _ if app.panel.is_open() => self.notifications.handle_key_events(app, key),
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        frame.render_widget(Block::default().style(th::app_style(&*app.theme)), area);
        let rows = Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)]).split(area);

        self.header.render(frame, rows[0], app);
        self.render_body(frame, rows[1].inner(ratatui::layout::Margin::new(1, 1)), app);
        if app.panel.is_open() {
            self.notifications.render(frame, rows[1], app);
        }
    }
}
