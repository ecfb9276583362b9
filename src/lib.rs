//! # hood
//!
//! An in-app diagnostics surface: a host supplies a [`PageProvider`] that
//! fills titled pages of label/value entries, and hood either dumps them once
//! to a log sink (headless) or shows them in a terminal view that refreshes
//! on activation, on demand, and on an optional cancellable timer.
//!
//! ```text
//! main.rs ── LaunchParameters ─▶ LifecycleController ─▶ ModeDispatcher
//!                                   │        │
//!                      PageProvider ┘        ├─ headless: LogSink, exit
//!                                            └─ interactive: DiagnosticView
//!                                                 ├─ RefreshScheduler
//!                                                 └─ ActionRouter ─▶ DeviceActions
//! ```
//!
//! # Modules
//!
//! - [`lifecycle`]: state machine and mode dispatch
//! - [`view`]: current page set, focus, refresh
//! - [`provider`]: provider boundary and the sysinfo-backed reference provider
//! - [`scheduler`]: auto-refresh timer
//! - [`actions`]: action identifiers and routing
//! - [`sink`]: log sinks
//! - [`app`], [`ui`]: the terminal host

pub mod actions;
pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod provider;
pub mod scheduler;
pub mod sink;
pub mod ui;
pub mod utils;
pub mod view;

pub use actions::{ActionId, ActionRouter, DeviceActions, Effect, Navigator};
pub use config::{Config, ConfigBuilder, Verbosity};
pub use error::{HoodError, Result};
pub use lifecycle::{LifecycleController, LifecycleState, Mode, ModeDispatcher, Outcome};
pub use models::{Entry, LaunchParameters, Page, PageSet};
pub use provider::PageProvider;
pub use scheduler::{RefreshScheduler, Tick};
pub use sink::{LogSink, OutputFormat};
pub use view::DiagnosticView;
