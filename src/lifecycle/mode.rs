use std::fmt;

use crate::models::LaunchParameters;

/// How a launch is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Populate once, write to the log sink, terminate. No view.
    Headless,
    /// Populate, render, refresh while active.
    Interactive,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Headless => write!(f, "headless"),
            Mode::Interactive => write!(f, "interactive"),
        }
    }
}

/// Picks the run mode from the launch parameters.
pub struct ModeDispatcher;

impl ModeDispatcher {
    /// Decided by the `headless` flag alone.
    pub fn dispatch(params: &LaunchParameters) -> Mode {
        if params.headless {
            Mode::Headless
        } else {
            Mode::Interactive
        }
    }
}
