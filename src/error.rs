//! Error type for the diagnostics core.

use thiserror::Error;

use crate::lifecycle::LifecycleState;

#[derive(Debug, Error)]
pub enum HoodError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The page provider could not produce a page set. Always surfaced to
    /// the caller.
    #[error("Page provider failed: {0}")]
    Provider(String),

    /// A lifecycle operation was called in a state that does not allow it.
    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },

    /// A delegated action (app-info, uninstall, ...) failed in its collaborator.
    #[error("Action '{action}' failed: {reason}")]
    Action { action: String, reason: String },

    /// The log sink has nowhere to write the dump.
    #[error("Log sink unavailable: {0}")]
    Sink(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HoodError>;
