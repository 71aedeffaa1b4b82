use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::roles::Theme;
use crate::ui::theme::roles::ThemeRoles;

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Style for the root background behind every panel.
pub fn app_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { background, text, .. } = *theme.roles();
    Style::default().bg(background).fg(text)
}

/// Badge/tag style (filled accent, readable text).
pub fn badge_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { error, badge_fg, .. } = *theme.roles();
    Style::default().bg(error).fg(badge_fg).add_modifier(Modifier::BOLD)
}

/// Turn `(key, description)` pairs into styled hint spans.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(*key, theme.accent_emphasis_style()));
        spans.push(Span::styled(*description, theme.text_muted_style()));
    }
    spans
}
