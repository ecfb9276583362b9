//! # hood - in-app diagnostics pages
//!
//! Headless runs dump the pages once and exit; interactive runs show them
//! in a terminal view with optional auto-refresh.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hood::actions::{ActionRouter, SystemActions};
use hood::app::{App, QuitFlag};
use hood::config::{ConfigBuilder, Verbosity};
use hood::constants::{config_file_path, log_file_path};
use hood::lifecycle::{LifecycleController, ModeDispatcher, Outcome};
use hood::logging::init_tracing;
use hood::models::LaunchParameters;
use hood::provider::SystemPageProvider;
use hood::sink::{LogSink, OutputFormat, TracingLogSink, WriterLogSink};
use hood::ui::{Theme, UiState};

/// hood - diagnostic pages for an application
#[derive(Parser, Debug)]
#[command(name = "hood", version, about = "In-app diagnostics pages, headless or interactive")]
struct Cli {
    /// Populate once, write the pages to the output, and exit
    #[arg(long)]
    headless: bool,

    /// Refresh the view on a timer while it is focused
    #[arg(long)]
    auto_refresh: bool,

    /// Config file (default: ~/.config/hood/config.toml)
    #[arg(long, short = 'c', value_name = "PATH", env = "HOOD_CONFIG")]
    config: Option<PathBuf>,

    /// Auto-refresh interval in milliseconds
    #[arg(long, short = 'i', value_name = "MS")]
    interval: Option<u64>,

    /// Detail level (brief, normal, verbose)
    #[arg(long, short = 'v')]
    verbosity: Option<Verbosity>,

    /// Application the device actions target
    #[arg(long, value_name = "ID")]
    app_id: Option<String>,

    /// Headless output format (text, json)
    #[arg(long, short = 'f', default_value = "text")]
    format: OutputFormat,

    /// Headless output file (default: stdout)
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Color theme (default, gruvbox, nord)
    #[arg(long, short = 't')]
    theme: Option<String>,
}

impl Cli {
    /// Flags and their `HOOD_*` environment twins; either one enables.
    fn launch_parameters(&self) -> LaunchParameters {
        let from_env = LaunchParameters::from_raw(
            std::env::var("HOOD_HEADLESS").ok().as_deref(),
            std::env::var("HOOD_AUTO_REFRESH").ok().as_deref(),
        );
        LaunchParameters::new(self.headless, self.auto_refresh).merge(from_env)
    }
}

fn headless_sink(cli: &Cli) -> Result<Box<dyn LogSink>> {
    let (writer, name): (Box<dyn Write>, String) = match &cli.output {
        Some(path) => (
            Box::new(
                File::create(path)
                    .with_context(|| format!("cannot create {}", path.display()))?,
            ),
            path.display().to_string(),
        ),
        None => (Box::new(io::stdout()), "stdout".to_string()),
    };
    Ok(Box::new(WriterLogSink::new(writer, cli.format, name)))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let params = cli.launch_parameters();
    let mode = ModeDispatcher::dispatch(&params);

    // Load config, then apply CLI overrides
    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let (mut builder, config_error) = match ConfigBuilder::from_file(&config_path) {
        Ok(builder) => (builder, None),
        Err(e) => (ConfigBuilder::new(), Some(e)),
    };
    if let Some(ms) = cli.interval {
        builder = builder.refresh_interval_ms(ms);
    }
    if let Some(verbosity) = cli.verbosity {
        builder = builder.verbosity(verbosity);
    }
    if let Some(ref app_id) = cli.app_id {
        builder = builder.app_id(app_id.clone());
    }
    if let Some(ref theme) = cli.theme {
        builder = builder.theme(theme.clone());
    }
    let config = builder.build();

    init_tracing(mode, config.log_level(), &log_file_path());
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "ignoring config file, using defaults");
    }

    let sink: Box<dyn LogSink> = match mode {
        hood::Mode::Headless => headless_sink(&cli)?,
        hood::Mode::Interactive => {
            Box::new(TracingLogSink::new(log_file_path().display().to_string()))
        }
    };
    let quit = QuitFlag::default();
    let router = ActionRouter::new(
        Box::new(SystemActions::new(config.actions().clone())),
        Box::new(quit.clone()),
    );
    let theme = Theme::resolve(config.theme());

    let mut controller = LifecycleController::new(
        params,
        config,
        Box::new(SystemPageProvider::new()),
        sink,
        router,
    );

    match controller.start().context("initial population failed")? {
        Outcome::Terminate => Ok(()),
        Outcome::Interactive => App::new(controller, UiState::new(theme), quit).run().await,
    }
}
