//! Status bar at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::actions::ActionId;
use crate::ui::state::UiState;

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState) {
    let t = &state.theme;

    let badge = |key: String, color: Color| -> Span {
        Span::styled(
            format!(" {} ", key),
            Style::default()
                .fg(t.bg_dark)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
    };
    let dim = |text: &str| -> Span {
        Span::styled(format!(" {} ", text), Style::default().fg(t.text_dim))
    };

    let mut spans = vec![Span::raw(" ")];

    // Transient message goes first so it survives narrow terminals.
    if let Some(msg) = state.visible_status() {
        let color = if state.is_error { t.danger } else { t.warning };
        spans.push(Span::styled(
            format!("{}  ", msg),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    for action in ActionId::ALL {
        let color = if action.needs_confirmation() {
            t.warning
        } else {
            t.accent
        };
        spans.push(badge(action.key().to_string(), color));
        spans.push(dim(action.label()));
    }
    spans.push(badge("?".to_string(), t.accent));
    spans.push(dim("Help"));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
