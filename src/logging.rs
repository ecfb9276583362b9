//! Tracing subscriber setup.
//!
//! Headless runs log to stderr so stdout stays clean for the page dump.
//! Interactive runs own the terminal, so logs go to a file under the data
//! directory instead.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::lifecycle::Mode;

/// Target of the page dump events. Always enabled at `info`, whatever the
/// configured level, since a dump the user asked for must not vanish.
pub const PAGES_TARGET: &str = "hood::pages";

/// `RUST_LOG` wins over the configured level when set.
pub(crate) fn filter(level: &str) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    match format!("{}=info", PAGES_TARGET).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Install the global subscriber. Only the first call takes effect.
///
/// When the log file can't be opened in interactive mode, logging is left
/// off rather than scribbling over the TUI.
pub fn init_tracing(mode: Mode, level: &str, log_file: &Path) {
    match mode {
        Mode::Headless => {
            let _ = tracing_subscriber::registry()
                .with(filter(level))
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .try_init();
        }
        Mode::Interactive => {
            if let Some(dir) = log_file.parent() {
                if std::fs::create_dir_all(dir).is_err() {
                    return;
                }
            }
            let Ok(file) = OpenOptions::new().create(true).append(true).open(log_file) else {
                return;
            };
            let _ = tracing_subscriber::registry()
                .with(filter(level))
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .try_init();
        }
    }
}
