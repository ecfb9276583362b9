//! Application-wide constants.
//!
//! Timing, layout, and path defaults in one place.

use std::path::PathBuf;

// ── Timing ────────────────────────────────────────────────────────
/// Auto-refresh interval (ms) while the view is active.
pub const DEFAULT_REFRESH_MS: u64 = 10_000;
/// Minimum allowed refresh interval (ms) to prevent a busy loop of providers.
pub const MIN_REFRESH_MS: u64 = 100;
/// Status message display duration (seconds).
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 5;
/// Redraw tick (ms) so expiring status messages disappear without input.
pub const REDRAW_TICK_MS: u64 = 250;
/// Initial sysinfo settling delay (ms) so CPU usage is non-zero on first read.
pub const INITIAL_SETTLE_MS: u64 = 250;

// ── Provider defaults ─────────────────────────────────────────────
/// Processes listed on the Processes page by default.
pub const DEFAULT_MAX_PROCESSES: usize = 15;
/// Hard cap for the Processes page.
pub const MAX_PROCESSES_CAP: usize = 500;
/// Minimum disk size to include on the Disks page (bytes).
pub const MIN_DISK_SIZE_BYTES: u64 = 1_000_000_000;
/// Maximum command line length shown for a process.
pub const MAX_CMD_LEN: usize = 80;
/// Replacement text for redacted environment values.
pub const REDACTED: &str = "<redacted>";

// ── UI Layout ─────────────────────────────────────────────────────
/// Page up/down step size.
pub const PAGE_SIZE: usize = 20;
/// Confirmation popup width.
pub const CONFIRM_POPUP_WIDTH: u16 = 50;
/// Confirmation popup height.
pub const CONFIRM_POPUP_HEIGHT: u16 = 7;

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/hood/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("hood")
}

/// Returns `~/.config/hood/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns `~/.local/share/hood/`.
pub fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("hood")
}

/// Returns `~/.local/share/hood/hood.log` (interactive-mode log file).
pub fn log_file_path() -> PathBuf {
    data_dir().join("hood.log")
}
