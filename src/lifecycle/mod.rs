//! Lifecycle controller: the state machine tying launch parameters, the
//! provider, the view, the refresh scheduler, and the action router together.
//!
//! ```text
//! Created ─start()─▶ Populating ─┬─ headless ──▶ HeadlessDone
//!                                └─ interactive ▶ Active ⇄ Suspended
//!                                                  (activate / deactivate)
//! any ─destroy()─▶ Destroyed
//! ```

mod mode;

pub use mode::{Mode, ModeDispatcher};

use std::fmt;
use std::sync::Arc;

use crate::actions::{ActionRouter, Effect};
use crate::config::Config;
use crate::error::{HoodError, Result};
use crate::models::LaunchParameters;
use crate::provider::{populate_fresh, PageProvider};
use crate::scheduler::{RefreshScheduler, Tick};
use crate::sink::LogSink;
use crate::view::DiagnosticView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Populating,
    HeadlessDone,
    Active,
    Suspended,
    Destroyed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Populating => "populating",
            LifecycleState::HeadlessDone => "headless-done",
            LifecycleState::Active => "active",
            LifecycleState::Suspended => "suspended",
            LifecycleState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// What the host should do after `start()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Headless run finished; exit.
    Terminate,
    /// A view exists; run the interactive loop.
    Interactive,
}

pub struct LifecycleController {
    params: LaunchParameters,
    config: Arc<Config>,
    state: LifecycleState,
    provider: Option<Box<dyn PageProvider>>,
    sink: Option<Box<dyn LogSink>>,
    router: Option<ActionRouter>,
    view: Option<DiagnosticView>,
    scheduler: RefreshScheduler,
}

impl LifecycleController {
    pub fn new(
        params: LaunchParameters,
        config: Config,
        provider: Box<dyn PageProvider>,
        sink: Box<dyn LogSink>,
        router: ActionRouter,
    ) -> Self {
        Self {
            params,
            config: Arc::new(config),
            state: LifecycleState::Created,
            provider: Some(provider),
            sink: Some(sink),
            router: Some(router),
            view: None,
            scheduler: RefreshScheduler::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn params(&self) -> LaunchParameters {
        self.params
    }

    pub fn mode(&self) -> Mode {
        ModeDispatcher::dispatch(&self.params)
    }

    pub fn view(&self) -> Option<&DiagnosticView> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut DiagnosticView> {
        self.view.as_mut()
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Dispatch on the launch mode and run the initial population.
    pub fn start(&mut self) -> Result<Outcome> {
        self.expect_state("start", &[LifecycleState::Created])?;
        if !self.config.enabled() {
            tracing::info!("diagnostics disabled by config, nothing to populate");
            self.destroy();
            return Ok(Outcome::Terminate);
        }
        let mode = self.mode();
        tracing::info!(%mode, auto_refresh = self.params.auto_refresh, "starting diagnostics");
        self.state = LifecycleState::Populating;

        let mut provider = self
            .provider
            .take()
            .ok_or_else(|| HoodError::Provider("no page provider installed".into()))?;
        let pages = populate_fresh(provider.as_mut(), &self.config)?;

        match mode {
            Mode::Headless => {
                let sink = self.sink.as_mut().ok_or_else(|| {
                    HoodError::Config("no log sink installed".into())
                })?;
                sink.log_pages(&pages)?;
                tracing::info!(
                    pages = pages.len(),
                    destination = %sink.describe(),
                    "headless dump written"
                );
                self.state = LifecycleState::HeadlessDone;
                Ok(Outcome::Terminate)
            }
            Mode::Interactive => {
                self.view = Some(DiagnosticView::new(provider, Arc::clone(&self.config), pages));
                self.state = LifecycleState::Active;
                Ok(Outcome::Interactive)
            }
        }
    }

    /// The view became visible: refresh now, and arm auto-refresh if enabled.
    pub fn activate(&mut self) -> Result<()> {
        self.expect_state("activate", &[LifecycleState::Active, LifecycleState::Suspended])?;
        self.state = LifecycleState::Active;
        if self.params.auto_refresh {
            self.scheduler.start(self.config.refresh_interval());
        }
        self.refresh_view(false)
    }

    /// The view went to the background: cancel auto-refresh unconditionally.
    pub fn deactivate(&mut self) -> Result<()> {
        self.expect_state(
            "deactivate",
            &[LifecycleState::Active, LifecycleState::Suspended],
        )?;
        self.scheduler.stop();
        self.state = LifecycleState::Suspended;
        Ok(())
    }

    /// A permission prompt came back; whatever it granted may change the pages.
    pub fn on_permission_result(&mut self) -> Result<()> {
        self.expect_state(
            "handle permission result",
            &[LifecycleState::Active, LifecycleState::Suspended],
        )?;
        self.refresh_view(false)
    }

    /// Wait for the next auto-refresh tick. Pending forever when auto-refresh
    /// is off or suspended.
    pub async fn next_refresh(&mut self) -> Tick {
        self.scheduler.next_tick().await
    }

    /// Handle a tick obtained from [`next_refresh`](Self::next_refresh).
    pub fn on_refresh_tick(&mut self, tick: Tick) -> Result<()> {
        if self.state != LifecycleState::Active {
            tracing::debug!(generation = tick.generation, "tick outside active state ignored");
            return Ok(());
        }
        self.refresh_view(false)
    }

    /// Run a ready auto-refresh tick without waiting. Returns whether one ran.
    pub fn pump(&mut self) -> Result<bool> {
        match self.scheduler.try_tick() {
            Some(tick) => self.on_refresh_tick(tick).map(|_| true),
            None => Ok(false),
        }
    }

    /// Route a user- or system-triggered action identifier.
    pub fn route_action(&mut self, action_id: &str) -> Result<Effect> {
        self.expect_state(
            "route an action",
            &[LifecycleState::Active, LifecycleState::Suspended],
        )?;
        match (
            self.router.as_mut(),
            self.view.as_mut(),
            self.sink.as_mut(),
        ) {
            (Some(router), Some(view), Some(sink)) => router.route(action_id, view, sink.as_mut()),
            _ => Err(HoodError::InvalidState {
                operation: "route an action",
                state: self.state,
            }),
        }
    }

    /// Release the view and collaborators. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.state == LifecycleState::Destroyed {
            return;
        }
        self.scheduler.stop();
        self.view = None;
        self.provider = None;
        self.sink = None;
        self.router = None;
        self.state = LifecycleState::Destroyed;
        tracing::debug!("diagnostics destroyed");
    }

    fn refresh_view(&mut self, forced: bool) -> Result<()> {
        match self.view.as_mut() {
            Some(view) => view.refresh(forced),
            None => Err(HoodError::InvalidState {
                operation: "refresh",
                state: self.state,
            }),
        }
    }

    fn expect_state(&self, operation: &'static str, allowed: &[LifecycleState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(HoodError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        self.destroy();
    }
}
