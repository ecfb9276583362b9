//! Header bar: app name, page tab strip, refresh summary.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::state::UiState;
use crate::utils::format_duration;
use crate::view::DiagnosticView;

pub fn render_header(frame: &mut Frame, area: Rect, view: &DiagnosticView, state: &UiState) {
    let t = &state.theme;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16), // Name
            Constraint::Min(20),    // Page tabs
            Constraint::Length(30), // Refresh summary
        ])
        .split(area);

    let pulse = if state.auto_refreshing && state.tick_count % 2 == 0 {
        "●"
    } else {
        "○"
    };
    let name = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(pulse, Style::default().fg(t.success)),
        Span::styled(" hood ", t.header_style()),
        Span::styled(env!("CARGO_PKG_VERSION"), Style::default().fg(t.text_muted)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(name, chunks[0]);

    let pages = view.pages();
    let mut tab_spans = vec![Span::raw(" ")];
    for (i, title) in pages.titles().into_iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::styled(" │ ", Style::default().fg(t.text_muted)));
        }
        let label = if i < 9 {
            format!(" {} {} ", i + 1, title)
        } else {
            format!(" {} ", title)
        };
        let style = if i == view.current_focus() {
            t.tab_active_style()
        } else {
            t.tab_inactive_style()
        };
        tab_spans.push(Span::styled(label, style));
    }
    let tabs = Paragraph::new(Line::from(tab_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(tabs, chunks[1]);

    let mode = if state.suspended {
        "paused".to_string()
    } else if state.auto_refreshing {
        let interval = view.config().refresh_interval();
        if interval.as_secs() == 0 {
            format!("every {}ms", interval.as_millis())
        } else {
            format!("every {}", format_duration(interval.as_secs()))
        }
    } else {
        "manual".to_string()
    };
    let age = view
        .last_refreshed()
        .map(|at| format!("{} ago", format_duration(at.elapsed().as_secs())))
        .unwrap_or_else(|| "never".to_string());
    let summary = Paragraph::new(Line::from(Span::styled(
        format!("{} · {} ", mode, age),
        Style::default().fg(t.text_dim),
    )))
    .alignment(Alignment::Right)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(summary, chunks[2]);
}
