use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::*;
use crate::error::{HoodError, Result};

/// How much detail the page provider includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Brief,
    #[default]
    Normal,
    Verbose,
}

impl FromStr for Verbosity {
    type Err = HoodError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(Verbosity::Brief),
            "normal" => Ok(Verbosity::Normal),
            "verbose" => Ok(Verbosity::Verbose),
            other => Err(HoodError::Config(format!("unknown verbosity '{}'", other))),
        }
    }
}

/// Shell command hooks backing the delegated device actions.
/// `None` means the action reports "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActionCommands {
    pub app_info: Option<String>,
    pub uninstall: Option<String>,
    pub clear_data: Option<String>,
}

/// Options controlling what the page provider includes and how the view
/// refreshes. Immutable once built; construct through [`Config::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    enabled: bool,
    app_id: String,
    verbosity: Verbosity,
    include_processes: bool,
    max_processes: usize,
    include_environment: bool,
    redact_patterns: Vec<String>,
    hidden_pages: Vec<String>,
    refresh_interval_ms: u64,
    log_level: String,
    theme: String,
    actions: ActionCommands,
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new().build()
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// When false, startup terminates without populating anything.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Identifier of the application the delegated actions target.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn include_processes(&self) -> bool {
        self.include_processes
    }

    pub fn max_processes(&self) -> usize {
        self.max_processes
    }

    pub fn include_environment(&self) -> bool {
        self.include_environment
    }

    pub fn redact_patterns(&self) -> &[String] {
        &self.redact_patterns
    }

    pub fn hidden_pages(&self) -> &[String] {
        &self.hidden_pages
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Name of the color theme for the interactive view.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn actions(&self) -> &ActionCommands {
        &self.actions
    }

    /// Whether an environment variable name matches a redaction pattern
    /// (case-insensitive substring).
    pub fn should_redact(&self, name: &str) -> bool {
        let upper = name.to_ascii_uppercase();
        self.redact_patterns
            .iter()
            .any(|p| upper.contains(&p.to_ascii_uppercase()))
    }
}

/// Builder for [`Config`]; every option has a documented default.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    enabled: bool,
    app_id: String,
    verbosity: Verbosity,
    include_processes: bool,
    max_processes: usize,
    include_environment: bool,
    redact_patterns: Vec<String>,
    hidden_pages: Vec<String>,
    refresh_interval_ms: u64,
    log_level: String,
    theme: String,
    actions: ActionCommands,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            enabled: true,
            app_id: env!("CARGO_PKG_NAME").to_string(),
            verbosity: Verbosity::Normal,
            include_processes: true,
            max_processes: DEFAULT_MAX_PROCESSES,
            include_environment: false,
            redact_patterns: ["KEY", "TOKEN", "SECRET", "PASSWORD", "CREDENTIAL"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hidden_pages: Vec::new(),
            refresh_interval_ms: DEFAULT_REFRESH_MS,
            log_level: "info".to_string(),
            theme: "default".to_string(),
            actions: ActionCommands::default(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        let app_id = app_id.into();
        if !app_id.trim().is_empty() {
            self.app_id = app_id;
        }
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn include_processes(mut self, include: bool) -> Self {
        self.include_processes = include;
        self
    }

    /// Clamped to `1..=MAX_PROCESSES_CAP`.
    pub fn max_processes(mut self, max: usize) -> Self {
        self.max_processes = max.clamp(1, MAX_PROCESSES_CAP);
        self
    }

    pub fn include_environment(mut self, include: bool) -> Self {
        self.include_environment = include;
        self
    }

    pub fn redact_patterns(mut self, patterns: Vec<String>) -> Self {
        self.redact_patterns = patterns;
        self
    }

    pub fn hide_page(mut self, title: impl Into<String>) -> Self {
        self.hidden_pages.push(title.into());
        self
    }

    pub fn hidden_pages(mut self, titles: Vec<String>) -> Self {
        self.hidden_pages = titles;
        self
    }

    /// Clamped to at least `MIN_REFRESH_MS`.
    pub fn refresh_interval_ms(mut self, ms: u64) -> Self {
        self.refresh_interval_ms = ms.max(MIN_REFRESH_MS);
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        let level = level.into();
        if !level.trim().is_empty() {
            self.log_level = level;
        }
        self
    }

    pub fn theme(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.theme = name;
        }
        self
    }

    pub fn actions(mut self, actions: ActionCommands) -> Self {
        self.actions = actions;
        self
    }

    pub fn build(self) -> Config {
        Config {
            enabled: self.enabled,
            app_id: self.app_id,
            verbosity: self.verbosity,
            include_processes: self.include_processes,
            max_processes: self.max_processes,
            include_environment: self.include_environment,
            redact_patterns: self.redact_patterns,
            hidden_pages: self.hidden_pages,
            refresh_interval_ms: self.refresh_interval_ms,
            log_level: self.log_level,
            theme: self.theme,
            actions: self.actions,
        }
    }

    /// Seed a builder from a TOML file, merging present values over the
    /// defaults. A missing file yields the defaults; a malformed one is an
    /// error so the caller can warn and fall back.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };
        let file_config: FileConfig = toml::from_str(&content)
            .map_err(|e| HoodError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(file_config.merge_into(Self::new()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file_config: FileConfig =
            toml::from_str(content).map_err(|e| HoodError::Config(e.to_string()))?;
        Ok(file_config.merge_into(Self::new()))
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    enabled: Option<bool>,
    app_id: Option<String>,
    verbosity: Option<Verbosity>,
    include_processes: Option<bool>,
    max_processes: Option<usize>,
    include_environment: Option<bool>,
    redact_patterns: Option<Vec<String>>,
    hidden_pages: Option<Vec<String>>,
    refresh_interval_ms: Option<u64>,
    log_level: Option<String>,
    theme: Option<String>,
    actions: Option<ActionCommands>,
}

impl FileConfig {
    fn merge_into(self, mut builder: ConfigBuilder) -> ConfigBuilder {
        if let Some(v) = self.enabled {
            builder = builder.enabled(v);
        }
        if let Some(v) = self.app_id {
            builder = builder.app_id(v);
        }
        if let Some(v) = self.verbosity {
            builder = builder.verbosity(v);
        }
        if let Some(v) = self.include_processes {
            builder = builder.include_processes(v);
        }
        if let Some(v) = self.max_processes {
            builder = builder.max_processes(v);
        }
        if let Some(v) = self.include_environment {
            builder = builder.include_environment(v);
        }
        if let Some(v) = self.redact_patterns {
            builder = builder.redact_patterns(v);
        }
        if let Some(v) = self.hidden_pages {
            builder = builder.hidden_pages(v);
        }
        if let Some(v) = self.refresh_interval_ms {
            builder = builder.refresh_interval_ms(v);
        }
        if let Some(v) = self.log_level {
            builder = builder.log_level(v);
        }
        if let Some(v) = self.theme {
            builder = builder.theme(v);
        }
        if let Some(v) = self.actions {
            builder = builder.actions(v);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert!(c.enabled());
        assert_eq!(c.app_id(), "hood");
        assert_eq!(c.verbosity(), Verbosity::Normal);
        assert!(c.include_processes());
        assert!(!c.include_environment());
        assert_eq!(c.max_processes(), DEFAULT_MAX_PROCESSES);
        assert_eq!(c.refresh_interval(), Duration::from_millis(10_000));
        assert_eq!(c.log_level(), "info");
        assert_eq!(c.theme(), "default");
        assert_eq!(c.actions(), &ActionCommands::default());
    }

    #[test]
    fn builder_setters_and_clamps() {
        let c = Config::builder()
            .app_id("myapp")
            .verbosity(Verbosity::Verbose)
            .max_processes(0)
            .refresh_interval_ms(5)
            .hide_page("Network")
            .build();
        assert_eq!(c.app_id(), "myapp");
        assert_eq!(c.verbosity(), Verbosity::Verbose);
        assert_eq!(c.max_processes(), 1);
        assert_eq!(c.refresh_interval(), Duration::from_millis(MIN_REFRESH_MS));
        assert_eq!(c.hidden_pages(), &["Network".to_string()]);
    }

    #[test]
    fn blank_app_id_keeps_default() {
        let c = Config::builder().app_id("  ").build();
        assert_eq!(c.app_id(), "hood");
    }

    #[test]
    fn should_redact_is_case_insensitive_substring() {
        let c = Config::default();
        assert!(c.should_redact("GITHUB_TOKEN"));
        assert!(c.should_redact("aws_secret_access_key"));
        assert!(!c.should_redact("PATH"));
    }

    #[test]
    fn verbosity_from_str() {
        assert_eq!("Brief".parse::<Verbosity>().unwrap(), Verbosity::Brief);
        assert_eq!(" verbose ".parse::<Verbosity>().unwrap(), Verbosity::Verbose);
        assert!("loud".parse::<Verbosity>().is_err());
    }

    #[test]
    fn from_toml_merges_over_defaults() {
        let c = ConfigBuilder::from_toml(
            r#"
            app_id = "firefox"
            verbosity = "brief"
            theme = "nord"
            refresh_interval_ms = 2500
            hidden_pages = ["Disks"]

            [actions]
            uninstall = "echo bye"
            "#,
        )
        .unwrap()
        .build();
        assert_eq!(c.app_id(), "firefox");
        assert_eq!(c.verbosity(), Verbosity::Brief);
        assert_eq!(c.theme(), "nord");
        assert_eq!(c.refresh_interval(), Duration::from_millis(2500));
        assert_eq!(c.hidden_pages(), &["Disks".to_string()]);
        assert_eq!(c.actions().uninstall.as_deref(), Some("echo bye"));
        assert_eq!(c.actions().clear_data, None);
        // untouched fields keep defaults
        assert!(c.include_processes());
    }

    #[test]
    fn from_toml_rejects_malformed() {
        let err = ConfigBuilder::from_toml("verbosity = 12").unwrap_err();
        assert!(matches!(err, HoodError::Config(_)));
    }

    #[test]
    fn from_file_missing_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let c = ConfigBuilder::from_file(&dir.path().join("nope.toml"))
            .unwrap()
            .build();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn from_file_reads_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "include_environment = true\nmax_processes = 3").unwrap();
        let c = ConfigBuilder::from_file(file.path()).unwrap().build();
        assert!(c.include_environment());
        assert_eq!(c.max_processes(), 3);
    }

    #[test]
    fn from_toml_can_disable() {
        let c = ConfigBuilder::from_toml("enabled = false").unwrap().build();
        assert!(!c.enabled());
        assert_eq!(c.app_id(), "hood");
    }
}
