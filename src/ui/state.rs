use std::time::{Duration, Instant};

use crate::actions::ActionId;
use crate::constants::STATUS_MESSAGE_TIMEOUT_SECS;
use crate::ui::theme::Theme;

/// Presentation state that lives beside the diagnostic view: popups,
/// transient messages, and what the header shows about refresh.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
    pub is_error: bool,
    /// Destructive action waiting for a y/n answer.
    pub pending_confirm: Option<ActionId>,
    pub show_help: bool,
    pub auto_refreshing: bool,
    pub suspended: bool,
    pub tick_count: u64,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Default::default()
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.is_error = true;
    }

    /// The status message, unless it has expired.
    pub fn visible_status(&self) -> Option<&str> {
        self.status_message.as_ref().and_then(|(msg, when)| {
            (when.elapsed() < Duration::from_secs(STATUS_MESSAGE_TIMEOUT_SECS))
                .then_some(msg.as_str())
        })
    }

    pub fn has_popup(&self) -> bool {
        self.pending_confirm.is_some() || self.show_help
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_expires() {
        let mut state = UiState::default();
        assert_eq!(state.visible_status(), None);
        state.set_status("Refreshed");
        assert_eq!(state.visible_status(), Some("Refreshed"));
        assert!(!state.is_error);

        let old = Instant::now() - Duration::from_secs(STATUS_MESSAGE_TIMEOUT_SECS + 1);
        state.status_message = Some(("stale".into(), old));
        assert_eq!(state.visible_status(), None);
    }

    #[test]
    fn errors_are_flagged() {
        let mut state = UiState::default();
        state.set_error("boom");
        assert!(state.is_error);
        state.set_status("ok");
        assert!(!state.is_error);
    }

    #[test]
    fn popups() {
        let mut state = UiState::default();
        assert!(!state.has_popup());
        state.pending_confirm = Some(ActionId::Uninstall);
        assert!(state.has_popup());
    }
}
