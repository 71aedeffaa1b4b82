//! Sticky header: product title, notification bell and dark-mode indicator.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers as th;

/// Largest unread count shown verbatim on the bell badge.
const BADGE_MAX: usize = 9;

/// Label for the bell badge: nothing when everything is read, the exact count
/// up to nine, and `9+` beyond that.
pub fn badge_label(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        count if count <= BADGE_MAX => Some(count.to_string()),
        _ => Some(format!("{BADGE_MAX}+")),
    }
}

#[derive(Debug, Default)]
pub struct HeaderComponent;

impl Component for HeaderComponent {
    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.theme;
        let block = th::block(theme, None, false);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);
        let columns = Layout::horizontal([Constraint::Min(10), Constraint::Length(28)]).split(inner);

        let title = Line::from(vec![
            Span::styled("LeadDash", theme.accent_emphasis_style()),
            Span::styled("  Leads", theme.text_secondary_style()),
        ]);
        frame.render_widget(Paragraph::new(title), columns[0]);

        let mode = if app.dark_mode() { "☾ Dark" } else { "☀ Light" };
        let mut spans = vec![Span::styled(format!("{mode}   "), theme.text_muted_style())];
        let bell_style = if app.panel.is_open() {
            theme.accent_emphasis_style()
        } else {
            theme.text_primary_style().add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled("🔔", bell_style));
        if let Some(label) = badge_label(app.store.unread()) {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {label} "), th::badge_style(theme)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Right), columns[1]);
    }
}
