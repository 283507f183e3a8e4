//! Configuration for promptsense.
//!
//! Settings come from three places, later ones winning:
//!
//! 1. built-in defaults,
//! 2. `$XDG_CONFIG_HOME/promptsense/config.toml` (or `~/.config/promptsense/config.toml`),
//! 3. command-line flags.
//!
//! The API key is never read from the file; it comes from `GEMINI_API_KEY`,
//! falling back to `API_KEY`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use promptsense_core::gemini::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key found; set GEMINI_API_KEY (or API_KEY)")]
    MissingApiKey,

    #[error("cannot read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Terminal tool that scores vibe-coding prompts and explains failed generations.
#[derive(Debug, Default, Parser)]
#[command(name = "promptsense", version, about)]
pub struct Cli {
    /// Color theme: `catppuccin-mocha` or `dark`.
    #[arg(long)]
    pub theme: Option<String>,

    /// Model used for both analysis and fix advice.
    #[arg(long)]
    pub model: Option<String>,

    /// Seconds to wait for one service call before giving up.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Preload the prompt input from a file.
    #[arg(long, value_name = "PATH")]
    pub prompt_file: Option<PathBuf>,

    /// Preload the observed-output input from a file (Debug mode).
    #[arg(long, value_name = "PATH")]
    pub observed_file: Option<PathBuf>,

    /// Start in Debug mode instead of Analyze.
    #[arg(long)]
    pub debug: bool,

    /// Read settings from this file instead of the XDG location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout_secs: 60,
        }
    }
}

impl Config {
    /// Loads `path`, falling back to defaults.
    ///
    /// A missing file is silent. A file that cannot be parsed logs a warning and
    /// yields defaults, so a typo never blocks startup.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config parse error, using defaults");
                Self::default()
            }
        }
    }

    /// Applies command-line overrides on top of the file values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] when the merged timeout is zero.
    pub fn merge_cli(mut self, cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(theme) = &cli.theme {
            self.theme = theme.clone();
        }
        if let Some(model) = &cli.model {
            self.model = model.clone();
        }
        if let Some(secs) = cli.timeout {
            self.request_timeout_secs = secs;
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Returns the path to the promptsense config file.
///
/// Prefers `$XDG_CONFIG_HOME/promptsense/config.toml`; falls back to
/// `~/.config/promptsense/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("promptsense").join("config.toml")
}

/// Returns the directory daily log files are written to.
///
/// Prefers `$XDG_STATE_HOME/promptsense/logs`; falls back to
/// `~/.local/state/promptsense/logs`.
pub fn log_dir() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("promptsense").join("logs")
}

fn xdg_dir(var: &str, home_relative: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(home_relative))
        })
        .unwrap_or_else(|| PathBuf::from(home_relative))
}

/// Reads the API key from the environment.
///
/// # Errors
///
/// Returns [`ConfigError::MissingApiKey`] when none of [`API_KEY_VARS`] holds a
/// non-blank value.
pub fn api_key_from_env() -> Result<String, ConfigError> {
    api_key_from(|var| std::env::var(var).ok())
}

fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| lookup(var))
        .find(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey)
}

/// Reads an optional preload file given on the command line.
///
/// # Errors
///
/// Returns [`ConfigError::ReadInput`] if the file exists but cannot be read.
pub fn read_input_file(path: Option<&Path>) -> Result<Option<String>, ConfigError> {
    let Some(path) = path else {
        return Ok(None);
    };
    std::fs::read_to_string(path)
        .map(Some)
        .map_err(|source| ConfigError::ReadInput {
            path: path.to_owned(),
            source,
        })
}
