use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration loaded from `~/.triage-deck/config.toml`.
///
/// Every section is optional; a missing file yields the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub cli: CliConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Load config from `~/.triage-deck/config.toml`, falling back to
    /// defaults when the file does not exist. Environment overrides are
    /// applied before validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        let mut cfg = if path.exists() {
            Self::parse_file(&path)?
        } else {
            Config::default()
        };
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a specific path.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut cfg = Self::parse_file(&path.into())?;
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    fn parse_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        self.validate()?;
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// `TRIAGE_CLI`, `TRIAGE_API_URL`, `TRIAGE_INVESTIGATIONS_DIR` and
    /// `TUI_DEBUG=1` take precedence over the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("TRIAGE_CLI").filter(|v| !v.is_empty()) {
            self.cli.path = v;
        }
        if let Some(v) = lookup("TRIAGE_API_URL").filter(|v| !v.is_empty()) {
            self.api.base_url = v;
        }
        if let Some(v) = lookup("TRIAGE_INVESTIGATIONS_DIR").filter(|v| !v.is_empty()) {
            self.paths.investigations_dir = v;
        }
        if lookup("TUI_DEBUG").as_deref() == Some("1") {
            self.ui.debug_overlay = true;
        }
    }

    /// Semantic validation for settings that are not fully expressible via type checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cli.path.trim().is_empty() {
            return Err(ConfigError::Validation("cli.path must not be empty".into()));
        }
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "api.base_url '{}' must start with http:// or https://",
                self.api.base_url
            )));
        }
        if self.sync.tick_ms < 100 {
            return Err(ConfigError::Validation(format!(
                "sync.tick_ms must be at least 100 (got {})",
                self.sync.tick_ms
            )));
        }
        if self.sync.log_window == 0 {
            return Err(ConfigError::Validation(
                "sync.log_window must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        home().join(".triage-deck").join("config.toml")
    }
}

/// Expand a leading `~` against the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home().join(rest),
        None if path == "~" => home(),
        None => PathBuf::from(path),
    }
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("validation: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Section structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}
fn default_log_file() -> String {
    "~/.triage-deck/td-tui.log".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Investigation CLI binary, resolved through `PATH` when relative.
    #[serde(default = "default_cli_path")]
    pub path: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            path: default_cli_path(),
        }
    }
}

fn default_cli_path() -> String {
    "triage".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base")]
    pub base_url: String,
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            timeout_secs: default_api_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:3001".into()
}
fn default_api_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_investigations_dir")]
    pub investigations_dir: String,
    /// Versioned subdirectory checked when a file is missing at the root.
    #[serde(default = "default_legacy_run_dir")]
    pub legacy_run_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            investigations_dir: default_investigations_dir(),
            legacy_run_dir: default_legacy_run_dir(),
        }
    }
}

impl PathsConfig {
    pub fn investigations_root(&self) -> PathBuf {
        expand_home(&self.investigations_dir)
    }
}

fn default_investigations_dir() -> String {
    "~/support-triage/investigations".into()
}
fn default_legacy_run_dir() -> String {
    "investigation-1".into()
}

/// Which collaborator answers "load agent statuses".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentSource {
    #[default]
    Cli,
    Api,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_log_window")]
    pub log_window: usize,
    #[serde(default)]
    pub agent_source: AgentSource,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            log_window: default_log_window(),
            agent_source: AgentSource::default(),
        }
    }
}

fn default_tick_ms() -> u64 {
    2000
}
fn default_log_window() -> usize {
    crate::types::LOG_WINDOW
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub debug_overlay: bool,
}
