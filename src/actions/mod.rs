//! Action routing: a closed set of command identifiers mapped to either an
//! internal operation (refresh, log) or a delegated collaborator call.

mod system;

pub use system::SystemActions;

use std::fmt;
use std::str::FromStr;

use crate::error::{HoodError, Result};
use crate::sink::LogSink;
use crate::view::DiagnosticView;

/// Every command the diagnostics surface understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    Refresh,
    Log,
    AppInfo,
    Uninstall,
    KillProcess,
    ClearData,
    NavigateBack,
}

impl ActionId {
    pub const ALL: [ActionId; 7] = [
        ActionId::Refresh,
        ActionId::Log,
        ActionId::AppInfo,
        ActionId::Uninstall,
        ActionId::KillProcess,
        ActionId::ClearData,
        ActionId::NavigateBack,
    ];

    /// Stable identifier used on the command surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::Refresh => "refresh",
            ActionId::Log => "log",
            ActionId::AppInfo => "app-info",
            ActionId::Uninstall => "uninstall",
            ActionId::KillProcess => "kill-process",
            ActionId::ClearData => "clear-data",
            ActionId::NavigateBack => "navigate-back",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            ActionId::Refresh => "Refresh",
            ActionId::Log => "Log",
            ActionId::AppInfo => "App info",
            ActionId::Uninstall => "Uninstall",
            ActionId::KillProcess => "Kill",
            ActionId::ClearData => "Clear data",
            ActionId::NavigateBack => "Back",
        }
    }

    /// Key bound to the action in the interactive view.
    pub fn key(&self) -> char {
        match self {
            ActionId::Refresh => 'r',
            ActionId::Log => 'l',
            ActionId::AppInfo => 'i',
            ActionId::Uninstall => 'u',
            ActionId::KillProcess => 'k',
            ActionId::ClearData => 'c',
            ActionId::NavigateBack => 'q',
        }
    }

    pub fn from_key(key: char) -> Option<ActionId> {
        Self::ALL.iter().copied().find(|a| a.key() == key)
    }

    /// Destructive actions ask the user before they run.
    pub fn needs_confirmation(&self) -> bool {
        matches!(
            self,
            ActionId::Uninstall | ActionId::KillProcess | ActionId::ClearData
        )
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = HoodError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| HoodError::Action {
                action: s.to_string(),
                reason: "unknown action".to_string(),
            })
    }
}

/// Outcome of routing one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Refreshed,
    Logged { pages: usize, destination: String },
    Delegated { action: ActionId, notice: String },
    NavigatedBack,
    /// Unrecognized identifier; nothing happened.
    Ignored,
}

impl Effect {
    /// Short text for a transient user notification, if the effect has one.
    pub fn notice(&self) -> Option<String> {
        match self {
            Effect::Refreshed => Some("Refreshed".to_string()),
            Effect::Logged { pages, destination } => {
                Some(format!("Logged {} pages to {}", pages, destination))
            }
            Effect::Delegated { notice, .. } => Some(notice.clone()),
            Effect::NavigatedBack | Effect::Ignored => None,
        }
    }
}

/// Device-management operations carried out outside the core. Each call
/// receives the target application identifier and returns a short notice.
pub trait DeviceActions {
    fn open_app_info(&mut self, app_id: &str) -> Result<String>;
    fn request_uninstall(&mut self, app_id: &str) -> Result<String>;
    fn kill_background_processes(&mut self, app_id: &str) -> Result<String>;
    fn clear_app_data(&mut self, app_id: &str) -> Result<String>;
}

/// Host navigation (leaving the diagnostics surface).
pub trait Navigator {
    fn navigate_back(&mut self);
}

/// Dispatch table from action identifiers to effects.
pub struct ActionRouter {
    device: Box<dyn DeviceActions>,
    navigator: Box<dyn Navigator>,
}

impl ActionRouter {
    pub fn new(device: Box<dyn DeviceActions>, navigator: Box<dyn Navigator>) -> Self {
        Self { device, navigator }
    }

    /// Route a raw identifier. Unknown identifiers are a silent no-op.
    pub fn route(
        &mut self,
        action_id: &str,
        view: &mut DiagnosticView,
        sink: &mut dyn LogSink,
    ) -> Result<Effect> {
        match action_id.parse::<ActionId>() {
            Ok(action) => self.dispatch(action, view, sink),
            Err(_) => {
                tracing::debug!(action_id, "ignoring unknown action");
                Ok(Effect::Ignored)
            }
        }
    }

    pub fn dispatch(
        &mut self,
        action: ActionId,
        view: &mut DiagnosticView,
        sink: &mut dyn LogSink,
    ) -> Result<Effect> {
        tracing::info!(action = action.as_str(), "routing action");
        let app_id = view.config().app_id().to_string();
        let effect = match action {
            ActionId::Refresh => {
                view.refresh(true)?;
                Effect::Refreshed
            }
            ActionId::Log => {
                let pages = view.pages();
                sink.log_pages(&pages)?;
                Effect::Logged {
                    pages: pages.len(),
                    destination: sink.describe(),
                }
            }
            ActionId::AppInfo => Effect::Delegated {
                action,
                notice: self.device.open_app_info(&app_id)?,
            },
            ActionId::Uninstall => Effect::Delegated {
                action,
                notice: self.device.request_uninstall(&app_id)?,
            },
            ActionId::KillProcess => Effect::Delegated {
                action,
                notice: self.device.kill_background_processes(&app_id)?,
            },
            ActionId::ClearData => Effect::Delegated {
                action,
                notice: self.device.clear_app_data(&app_id)?,
            },
            ActionId::NavigateBack => {
                self.navigator.navigate_back();
                Effect::NavigatedBack
            }
        };
        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::PageSet;
    use crate::provider::PageProvider;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    type Calls = Rc<RefCell<Vec<String>>>;

    struct RecordingDevice(Calls);

    impl DeviceActions for RecordingDevice {
        fn open_app_info(&mut self, app_id: &str) -> Result<String> {
            self.0.borrow_mut().push(format!("app-info:{}", app_id));
            Ok("info".into())
        }
        fn request_uninstall(&mut self, app_id: &str) -> Result<String> {
            self.0.borrow_mut().push(format!("uninstall:{}", app_id));
            Ok("uninstall".into())
        }
        fn kill_background_processes(&mut self, app_id: &str) -> Result<String> {
            self.0.borrow_mut().push(format!("kill:{}", app_id));
            Ok("killed".into())
        }
        fn clear_app_data(&mut self, app_id: &str) -> Result<String> {
            self.0.borrow_mut().push(format!("clear:{}", app_id));
            Err(HoodError::Action {
                action: "clear-data".into(),
                reason: "denied".into(),
            })
        }
    }

    struct RecordingNav(Calls);

    impl Navigator for RecordingNav {
        fn navigate_back(&mut self) {
            self.0.borrow_mut().push("back".into());
        }
    }

    struct RecordingSink {
        logged: Calls,
    }

    impl LogSink for RecordingSink {
        fn log_pages(&mut self, pages: &PageSet) -> Result<()> {
            self.logged.borrow_mut().push(format!("{} pages", pages.len()));
            Ok(())
        }
        fn describe(&self) -> String {
            "memory".into()
        }
    }

    struct Fixture {
        calls: Calls,
        provider_calls: Rc<RefCell<usize>>,
        router: ActionRouter,
        view: DiagnosticView,
        sink: RecordingSink,
    }

    fn fixture() -> Fixture {
        let calls: Calls = Rc::default();
        let provider_calls = Rc::new(RefCell::new(0usize));
        let counter = provider_calls.clone();
        let provider: Box<dyn PageProvider> =
            Box::new(move |mut set: PageSet, _: &Config| -> Result<PageSet> {
                *counter.borrow_mut() += 1;
                set.add_page("One");
                set.add_page("Two");
                Ok(set)
            });
        let config = Arc::new(Config::builder().app_id("demo").build());
        Fixture {
            router: ActionRouter::new(
                Box::new(RecordingDevice(calls.clone())),
                Box::new(RecordingNav(calls.clone())),
            ),
            view: DiagnosticView::new(provider, config, PageSet::new()),
            sink: RecordingSink {
                logged: Rc::default(),
            },
            calls,
            provider_calls,
        }
    }

    #[test]
    fn ids_round_trip_through_from_str() {
        for action in ActionId::ALL {
            assert_eq!(action.as_str().parse::<ActionId>().unwrap(), action);
            assert_eq!(ActionId::from_key(action.key()), Some(action));
        }
        assert!("reboot".parse::<ActionId>().is_err());
    }

    #[test]
    fn only_destructive_actions_confirm() {
        let confirming: Vec<ActionId> = ActionId::ALL
            .into_iter()
            .filter(ActionId::needs_confirmation)
            .collect();
        assert_eq!(
            confirming,
            vec![ActionId::Uninstall, ActionId::KillProcess, ActionId::ClearData]
        );
    }

    #[test]
    fn refresh_forces_exactly_one_repopulation() {
        let mut f = fixture();
        let effect = f.router.route("refresh", &mut f.view, &mut f.sink).unwrap();
        assert_eq!(effect, Effect::Refreshed);
        assert_eq!(*f.provider_calls.borrow(), 1);
        assert_eq!(f.view.refresh_count(), 1);
        // regardless of how recently it last ran
        f.router.route("refresh", &mut f.view, &mut f.sink).unwrap();
        assert_eq!(*f.provider_calls.borrow(), 2);
    }

    #[test]
    fn log_writes_current_set_to_sink() {
        let mut f = fixture();
        f.view.refresh(false).unwrap();
        let effect = f.router.route("log", &mut f.view, &mut f.sink).unwrap();
        assert_eq!(
            effect,
            Effect::Logged {
                pages: 2,
                destination: "memory".into()
            }
        );
        assert_eq!(*f.sink.logged.borrow(), vec!["2 pages".to_string()]);
        assert_eq!(effect.notice().unwrap(), "Logged 2 pages to memory");
    }

    #[test]
    fn delegated_actions_receive_app_id() {
        let mut f = fixture();
        for id in ["app-info", "uninstall", "kill-process"] {
            f.router.route(id, &mut f.view, &mut f.sink).unwrap();
        }
        assert_eq!(
            *f.calls.borrow(),
            vec!["app-info:demo", "uninstall:demo", "kill:demo"]
        );
        assert_eq!(*f.provider_calls.borrow(), 0);
    }

    #[test]
    fn delegate_errors_propagate() {
        let mut f = fixture();
        let err = f
            .router
            .route("clear-data", &mut f.view, &mut f.sink)
            .unwrap_err();
        assert!(err.to_string().contains("denied"));
        assert_eq!(*f.calls.borrow(), vec!["clear:demo"]);
    }

    #[test]
    fn navigate_back_delegates_to_host() {
        let mut f = fixture();
        let effect = f
            .router
            .route("navigate-back", &mut f.view, &mut f.sink)
            .unwrap();
        assert_eq!(effect, Effect::NavigatedBack);
        assert_eq!(effect.notice(), None);
        assert_eq!(*f.calls.borrow(), vec!["back"]);
    }

    #[test]
    fn unknown_action_is_a_silent_no_op() {
        let mut f = fixture();
        let effect = f
            .router
            .route("unknown-id", &mut f.view, &mut f.sink)
            .unwrap();
        assert_eq!(effect, Effect::Ignored);
        assert!(f.calls.borrow().is_empty());
        assert!(f.sink.logged.borrow().is_empty());
        assert_eq!(*f.provider_calls.borrow(), 0);
    }
}
