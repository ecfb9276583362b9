//! Renderer module, split into focused submodules.
//!
//! - `header`: title, page tab strip, refresh summary
//! - `page`: entry table of the focused page
//! - `status_bar`: action key badges and the transient status message
//! - `overlays`: confirmation and help popups
//! - `helpers`: shared rendering utilities

mod header;
pub mod helpers;
mod overlays;
mod page;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::state::UiState;
use crate::view::DiagnosticView;

/// Top-level render function.
pub fn render(frame: &mut Frame, view: &DiagnosticView, state: &UiState) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header bar
            Constraint::Min(5),    // Focused page
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    header::render_header(frame, main_chunks[0], view, state);
    page::render_page(frame, main_chunks[1], view, state);
    status_bar::render_status_bar(frame, main_chunks[2], state);

    if !state.has_popup() {
        return;
    }
    match state.pending_confirm {
        Some(action) => {
            overlays::render_confirm(frame, size, action, view.config().app_id(), state)
        }
        None => overlays::render_help(frame, size, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionId;
    use crate::config::Config;
    use crate::error::Result;
    use crate::models::PageSet;
    use crate::provider::PageProvider;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::sync::Arc;

    fn view() -> DiagnosticView {
        let provider: Box<dyn PageProvider> =
            Box::new(|set: PageSet, _: &Config| -> Result<PageSet> { Ok(set) });
        let mut pages = PageSet::new();
        pages
            .add_page("Application")
            .add("Name", "hood")
            .add("Build", "7.4.2");
        pages.add_page("Memory").add("Total", "16.0 GiB");
        DiagnosticView::new(
            provider,
            Arc::new(Config::builder().app_id("demo").build()),
            pages,
        )
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw(view: &DiagnosticView, state: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| render(f, view, state)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn renders_tabs_and_focused_entries() {
        let view = view();
        let text = draw(&view, &UiState::default());
        assert!(text.contains("Application"));
        assert!(text.contains("Memory"));
        assert!(text.contains("Build"));
        assert!(text.contains("7.4.2"));
        assert!(!text.contains("16.0 GiB"));
    }

    #[test]
    fn switching_focus_changes_body() {
        let mut view = view();
        view.focus_next();
        let text = draw(&view, &UiState::default());
        assert!(text.contains("16.0 GiB"));
        assert!(!text.contains("7.4.2"));
    }

    #[test]
    fn confirm_popup_names_action_and_app() {
        let view = view();
        let state = UiState {
            pending_confirm: Some(ActionId::KillProcess),
            ..Default::default()
        };
        let text = draw(&view, &state);
        assert!(text.contains("Confirm: Kill"));
        assert!(text.contains("demo"));
    }

    #[test]
    fn help_popup_only_when_requested() {
        let view = view();
        assert!(!draw(&view, &UiState::default()).contains("? to close"));
        let state = UiState {
            show_help: true,
            ..Default::default()
        };
        assert!(draw(&view, &state).contains("? to close"));
    }

    #[test]
    fn status_message_is_shown() {
        let view = view();
        let mut state = UiState::default();
        state.set_status("Logged 2 pages to hood::pages");
        let text = draw(&view, &state);
        assert!(text.contains("Logged 2 pages"));
    }

    #[test]
    fn empty_set_renders_placeholder() {
        let provider: Box<dyn PageProvider> =
            Box::new(|set: PageSet, _: &Config| -> Result<PageSet> { Ok(set) });
        let view = DiagnosticView::new(provider, Arc::new(Config::default()), PageSet::new());
        let text = draw(&view, &UiState::default());
        assert!(text.contains("No diagnostic pages"));
    }
}
