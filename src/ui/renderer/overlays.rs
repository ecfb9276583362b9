//! Popup overlays: destructive-action confirmation and key help.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::helpers::centered_rect;
use crate::actions::ActionId;
use crate::constants::{CONFIRM_POPUP_HEIGHT, CONFIRM_POPUP_WIDTH};
use crate::ui::state::UiState;

pub fn render_confirm(
    frame: &mut Frame,
    area: Rect,
    action: ActionId,
    app_id: &str,
    state: &UiState,
) {
    let t = &state.theme;
    let border_color = match action {
        ActionId::Uninstall | ActionId::ClearData => t.danger,
        _ => t.warning,
    };

    let popup_width = CONFIRM_POPUP_WIDTH.min(area.width.saturating_sub(4));
    let popup_area = centered_rect(popup_width, CONFIRM_POPUP_HEIGHT, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(
            format!(" Confirm: {} ", action.label()),
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!("  {} ", action.label()), Style::default().fg(t.text_primary)),
            Span::styled(app_id.to_string(), t.header_style()),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Are you sure? ", Style::default().fg(t.text_dim)),
            Span::styled(
                "[y]",
                Style::default().fg(t.success).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Yes  ", Style::default().fg(t.text_dim)),
            Span::styled(
                "[n]",
                Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" No", Style::default().fg(t.text_dim)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_help(frame: &mut Frame, area: Rect, state: &UiState) {
    let t = &state.theme;
    let key = |k: &str| Span::styled(format!("  {:<12}", k), t.label_style());
    let text = |s: &str| Span::styled(s.to_string(), Style::default().fg(t.text_primary));

    let mut lines = vec![
        Line::raw(""),
        Line::from(vec![key("Tab / S-Tab"), text("Next / previous page")]),
        Line::from(vec![key("1-9"), text("Jump to page")]),
        Line::from(vec![key("↑↓ PgUp PgDn"), text("Scroll")]),
        Line::from(vec![key("Home / End"), text("Top / bottom")]),
    ];
    for action in ActionId::ALL {
        let mut label = action.label().to_string();
        if action.needs_confirmation() {
            label.push_str(" (asks first)");
        }
        lines.push(Line::from(vec![key(&action.key().to_string()), text(&label)]));
    }
    lines.push(Line::from(vec![key("Esc"), text("Back")]));

    let height = (lines.len() as u16 + 3).min(area.height);
    let popup_area = centered_rect(48.min(area.width), height, area);
    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .title(Span::styled(" Keys ", t.header_style()))
        .title_bottom(Span::styled(" ? to close ", Style::default().fg(t.text_muted)))
        .borders(Borders::ALL)
        .border_style(t.border_style());
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
