//! Interactive host: owns the terminal and feeds input, focus changes,
//! and auto-refresh ticks into the lifecycle controller.

use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        DisableFocusChange, EnableFocusChange, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::actions::{ActionId, Navigator};
use crate::constants::{PAGE_SIZE, REDRAW_TICK_MS};
use crate::lifecycle::LifecycleController;
use crate::ui::{self, UiState};

/// Host navigation for the terminal: going back leaves the app.
#[derive(Debug, Clone, Default)]
pub struct QuitFlag(Rc<Cell<bool>>);

impl QuitFlag {
    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

impl Navigator for QuitFlag {
    fn navigate_back(&mut self) {
        self.0.set(true);
    }
}

pub struct App {
    controller: LifecycleController,
    state: UiState,
    quit: QuitFlag,
}

impl App {
    /// `controller` must already be started in interactive mode.
    pub fn new(controller: LifecycleController, state: UiState, quit: QuitFlag) -> Self {
        Self {
            controller,
            state,
            quit,
        }
    }

    /// Run the main event loop. Returns when the user leaves.
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableFocusChange
        )?;
        terminal.show_cursor()?;

        self.controller.destroy();
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        self.activate();
        let mut events = EventStream::new();

        while !self.quit.is_set() {
            self.state.auto_refreshing = self.controller.is_auto_refreshing();
            if let Some(view) = self.controller.view() {
                terminal.draw(|frame| ui::render(frame, view, &self.state))?;
            }

            let redraw = tokio::time::sleep(Duration::from_millis(REDRAW_TICK_MS));
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                tick = self.controller.next_refresh() => {
                    if let Err(e) = self.controller.on_refresh_tick(tick) {
                        tracing::warn!(error = %e, "auto-refresh failed");
                        self.state.set_error(format!("Refresh failed: {}", e));
                    }
                }
                _ = redraw => {
                    self.state.tick_count = self.state.tick_count.wrapping_add(1);
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.handle_key(key) {
                    self.quit.0.set(true);
                }
            }
            Event::FocusLost => {
                if let Err(e) = self.controller.deactivate() {
                    tracing::warn!(error = %e, "deactivate failed");
                }
                self.state.suspended = true;
            }
            Event::FocusGained => self.activate(),
            _ => {}
        }
    }

    fn activate(&mut self) {
        self.state.suspended = false;
        if let Err(e) = self.controller.activate() {
            tracing::warn!(error = %e, "activation refresh failed");
            self.state.set_error(format!("Refresh failed: {}", e));
        }
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        if let Some(action) = self.state.pending_confirm {
            return self.handle_key_confirm(key, action);
        }
        if self.state.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.state.show_help = false;
            }
            return false;
        }
        self.handle_key_normal(key)
    }

    fn handle_key_confirm(&mut self, key: KeyEvent, action: ActionId) -> bool {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.state.pending_confirm = None;
                self.run_action(action);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state.pending_confirm = None;
                self.state.set_status(format!("{} cancelled", action.label()));
            }
            _ => {}
        }
        self.quit.is_set()
    }

    fn handle_key_normal(&mut self, key: KeyEvent) -> bool {
        let Some(view) = self.controller.view_mut() else {
            return true;
        };
        match key.code {
            KeyCode::Tab => view.focus_next(),
            KeyCode::BackTab => view.focus_prev(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                view.set_focus(index);
            }
            KeyCode::Up => view.scroll_by(-1),
            KeyCode::Down => view.scroll_by(1),
            KeyCode::PageUp => view.scroll_by(-(PAGE_SIZE as isize)),
            KeyCode::PageDown => view.scroll_by(PAGE_SIZE as isize),
            KeyCode::Home => view.scroll_home(),
            KeyCode::End => view.scroll_end(),
            KeyCode::Char('?') => self.state.show_help = true,
            KeyCode::Esc => self.run_action(ActionId::NavigateBack),
            KeyCode::Char(c) => {
                if let Some(action) = ActionId::from_key(c) {
                    if action.needs_confirmation() {
                        self.state.pending_confirm = Some(action);
                    } else {
                        self.run_action(action);
                    }
                }
            }
            _ => {}
        }
        self.quit.is_set()
    }

    fn run_action(&mut self, action: ActionId) {
        match self.controller.route_action(action.as_str()) {
            Ok(effect) => {
                if let Some(notice) = effect.notice() {
                    self.state.set_status(notice);
                }
            }
            Err(e) => {
                tracing::warn!(action = action.as_str(), error = %e, "action failed");
                self.state.set_error(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionRouter, DeviceActions};
    use crate::config::Config;
    use crate::error::Result as HoodResult;
    use crate::models::{LaunchParameters, PageSet};
    use crate::provider::PageProvider;
    use crate::sink::LogSink;
    use std::cell::RefCell;

    type Calls = Rc<RefCell<Vec<String>>>;

    struct RecordingDevice(Calls);

    impl DeviceActions for RecordingDevice {
        fn open_app_info(&mut self, app_id: &str) -> HoodResult<String> {
            self.0.borrow_mut().push(format!("app-info:{}", app_id));
            Ok(format!("{} info", app_id))
        }
        fn request_uninstall(&mut self, app_id: &str) -> HoodResult<String> {
            self.0.borrow_mut().push(format!("uninstall:{}", app_id));
            Ok("uninstall requested".into())
        }
        fn kill_background_processes(&mut self, app_id: &str) -> HoodResult<String> {
            self.0.borrow_mut().push(format!("kill:{}", app_id));
            Ok("killed".into())
        }
        fn clear_app_data(&mut self, app_id: &str) -> HoodResult<String> {
            self.0.borrow_mut().push(format!("clear:{}", app_id));
            Ok("cleared".into())
        }
    }

    struct NullSink;

    impl LogSink for NullSink {
        fn log_pages(&mut self, _: &PageSet) -> HoodResult<()> {
            Ok(())
        }
        fn describe(&self) -> String {
            "null".into()
        }
    }

    fn app() -> (App, Calls, Rc<Cell<usize>>) {
        let calls: Calls = Rc::default();
        let populated = Rc::new(Cell::new(0));
        let counter = populated.clone();
        let provider: Box<dyn PageProvider> =
            Box::new(move |mut set: PageSet, _: &Config| -> HoodResult<PageSet> {
                counter.set(counter.get() + 1);
                for title in ["One", "Two", "Three"] {
                    let page = set.add_page(title);
                    for i in 0..30 {
                        page.add(format!("k{}", i), "v");
                    }
                }
                Ok(set)
            });
        let quit = QuitFlag::default();
        let router = ActionRouter::new(
            Box::new(RecordingDevice(calls.clone())),
            Box::new(quit.clone()),
        );
        let mut controller = LifecycleController::new(
            LaunchParameters::default(),
            Config::builder().app_id("demo").build(),
            provider,
            Box::new(NullSink),
            router,
        );
        controller.start().unwrap();
        (App::new(controller, UiState::default(), quit), calls, populated)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn destructive_action_waits_for_confirmation() {
        let (mut app, calls, _) = app();
        assert!(!press(&mut app, KeyCode::Char('u')));
        assert_eq!(app.state.pending_confirm, Some(ActionId::Uninstall));
        assert!(calls.borrow().is_empty());

        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.state.pending_confirm, None);
        assert_eq!(*calls.borrow(), vec!["uninstall:demo"]);
        assert_eq!(app.state.visible_status(), Some("uninstall requested"));
    }

    #[test]
    fn declined_confirmation_does_nothing() {
        let (mut app, calls, _) = app();
        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('n'));
        assert!(calls.borrow().is_empty());
        assert_eq!(app.state.visible_status(), Some("Kill cancelled"));
    }

    #[test]
    fn app_info_runs_immediately() {
        let (mut app, calls, _) = app();
        press(&mut app, KeyCode::Char('i'));
        assert_eq!(*calls.borrow(), vec!["app-info:demo"]);
        assert_eq!(app.state.visible_status(), Some("demo info"));
    }

    #[test]
    fn refresh_key_repopulates() {
        let (mut app, _, populated) = app();
        assert_eq!(populated.get(), 1);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(populated.get(), 2);
        assert_eq!(app.state.visible_status(), Some("Refreshed"));
    }

    #[test]
    fn navigation_keys_move_focus_and_scroll() {
        let (mut app, _, _) = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.controller.view().unwrap().current_focus(), 1);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.controller.view().unwrap().current_focus(), 2);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.controller.view().unwrap().current_focus(), 2);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.controller.view().unwrap().current_focus(), 1);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.controller.view().unwrap().scroll(), PAGE_SIZE);
        press(&mut app, KeyCode::End);
        assert_eq!(app.controller.view().unwrap().scroll(), 29);
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let (mut app, calls, _) = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.state.show_help);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(!app.state.show_help);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn back_and_ctrl_c_quit() {
        let (mut app, _, _) = app();
        assert!(press(&mut app, KeyCode::Char('q')));
        let (mut app, _, _) = self::app();
        assert!(press(&mut app, KeyCode::Esc));
        let (mut app, _, _) = self::app();
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }
}
