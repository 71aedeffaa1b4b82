use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use leaddash_types::Notification;
use leaddash_util::relative_age;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, List, ListItem, ListState, Paragraph};

use crate::app::{App, Effect};
use crate::ui::components::Component;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers as th;

const PANEL_MAX_WIDTH: u16 = 64;
const LINES_PER_ITEM: u16 = 3;

/// Notification panel controller.
#[derive(Debug, Default)]
pub struct NotificationsComponent;

impl NotificationsComponent {
    fn build_item<'a>(notification: &'a Notification, now: DateTime<Utc>, is_selected: bool, theme: &dyn Theme) -> ListItem<'a> {
        let marker = if notification.read { "  " } else { "● " };
        let mut title_style = theme.text_primary_style();
        if !notification.read {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }

        let mut header = vec![
            Span::styled(marker, theme.status_info()),
            Span::styled(format!("{} ", notification.kind.icon()), theme.accent_primary_style()),
            Span::styled(notification.title.as_str(), title_style),
            Span::styled(format!("  {}", relative_age(notification.created_at, now)), theme.text_muted_style()),
        ];
        if is_selected {
            header.insert(0, Span::styled("> ", theme.accent_emphasis_style()));
        } else {
            header.insert(0, Span::raw("  "));
        }

        let detail = Line::from(vec![
            Span::raw("      "),
            Span::styled(notification.message.as_str(), theme.text_secondary_style()),
        ]);
        let action = if notification.kind.offers_tour() {
            Line::from(vec![Span::raw("      "), Span::styled("[t] Start tour", theme.status_success())])
        } else {
            Line::from("")
        };

        ListItem::new(vec![Line::from(header), detail, action])
    }

    /// Area of the panel, anchored to the top-right corner of `area`.
    pub fn panel_area(area: Rect, notification_count: usize) -> Rect {
        let width = area.width.min(PANEL_MAX_WIDTH);
        let content_rows = (notification_count.max(1) as u16).saturating_mul(LINES_PER_ITEM);
        // Borders plus the hint line.
        let height = content_rows.saturating_add(3).min(area.height);
        Rect::new(area.x + area.width - width, area.y, width, height)
    }
}

impl Component for NotificationsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let notifications = app.store.notifications();
        let selected_id = app.panel.selected(notifications).map(|notification| notification.id.clone());
        let selected_offers_tour = app.panel.selected(notifications).is_some_and(|notification| notification.kind.offers_tour());
        let len = notifications.len();

        match key.code {
            KeyCode::Esc => vec![Effect::ClosePanel],
            KeyCode::Up | KeyCode::Char('k') => {
                app.panel.select_previous(len);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.panel.select_next(len);
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char('r') => selected_id.map(Effect::MarkRead).into_iter().collect(),
            KeyCode::Delete | KeyCode::Char('d') => selected_id.map(Effect::Delete).into_iter().collect(),
            KeyCode::Char('t') if selected_offers_tour => selected_id.map(Effect::StartTour).into_iter().collect(),
            KeyCode::Char('a') => vec![Effect::MarkAllRead],
            KeyCode::Char('c') => vec![Effect::ClearAll],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.theme;
        let notifications = app.store.notifications();
        let panel = Self::panel_area(area, notifications.len());
        frame.render_widget(Clear, panel);

        let block = th::block(theme, Some(" Notifications "), true);
        frame.render_widget(block.clone(), panel);
        let inner = block.inner(panel);
        let segments = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if notifications.is_empty() {
            frame.render_widget(Paragraph::new(Span::styled("No notifications", theme.text_muted_style())), segments[0]);
        } else {
            let now = app.now();
            let selected_index = app.panel.selected_index();
            let items: Vec<ListItem> = notifications
                .iter()
                .enumerate()
                .map(|(index, notification)| Self::build_item(notification, now, index == selected_index, theme))
                .collect();

            let mut list_state = ListState::default();
            list_state.select(Some(selected_index));
            let list = List::new(items).highlight_style(theme.selection_style());
            frame.render_stateful_widget(list, segments[0], &mut list_state);
        }

        frame.render_widget(Paragraph::new(Line::from(self.get_hint_spans(app))), segments[1]);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::build_hint_spans(
            &*app.theme,
            &[(" ↑/↓", " Select "), (" r", " Read "), (" d", " Delete "), (" a", " All read "), (" c", " Clear "), (" Esc", " Close")],
        )
    }
}
