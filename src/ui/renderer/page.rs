//! Body: the focused page as a two-column label/value table.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::helpers::render_scrollbar_bordered;
use crate::ui::state::UiState;
use crate::view::DiagnosticView;

pub fn render_page(frame: &mut Frame, area: Rect, view: &DiagnosticView, state: &UiState) {
    let t = &state.theme;

    let Some(page) = view.focused_page() else {
        let empty = Paragraph::new("No diagnostic pages")
            .style(Style::default().fg(t.text_dim))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(t.border_style()),
            );
        frame.render_widget(empty, area);
        return;
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", page.title()), t.header_style()))
        .title_bottom(Span::styled(
            format!(" {} entries ", page.len()),
            Style::default().fg(t.text_muted),
        ))
        .borders(Borders::ALL)
        .border_style(t.border_style());

    if page.is_empty() {
        let empty = Paragraph::new("No entries")
            .style(Style::default().fg(t.text_dim))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let scroll = view.scroll();
    let rows: Vec<Row> = page
        .entries()
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, entry)| {
            let row = Row::new(vec![
                Cell::from(Span::styled(entry.label().to_string(), t.label_style())),
                Cell::from(Span::styled(entry.value().to_string(), t.value_style())),
            ]);
            if i % 2 == 1 {
                row.style(Style::default().bg(t.row_alt_bg))
            } else {
                row
            }
        })
        .collect();

    let label_width = page.label_width().min(area.width as usize / 2) as u16;
    let table = Table::new(rows, [Constraint::Length(label_width), Constraint::Min(10)])
        .column_spacing(3)
        .block(block);
    frame.render_widget(table, area);

    render_scrollbar_bordered(frame, area, page.len(), scroll);
}
