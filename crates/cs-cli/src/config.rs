//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::Cli;

/// Lookback window when nothing else is configured.
pub const DEFAULT_DAYS: u32 = 7;

/// Application configuration.
///
/// Built once at startup and never modified afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// WakaTime API key.
    pub wakatime_key: String,
    /// Clockify API key.
    pub clockify_key: String,
    /// How many days back to pull.
    pub days: u32,
    /// Optional project name mapping file.
    pub projects_file: Option<PathBuf>,
    /// Reserved for creating missing Clockify projects.
    pub add_projects: bool,
    /// WakaTime API root.
    pub wakatime_url: String,
    /// Clockify API root.
    pub clockify_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("wakatime_key", &"[REDACTED]")
            .field("clockify_key", &"[REDACTED]")
            .field("days", &self.days)
            .field("projects_file", &self.projects_file)
            .field("add_projects", &self.add_projects)
            .field("wakatime_url", &self.wakatime_url)
            .field("clockify_url", &self.clockify_url)
            .finish()
    }
}

/// Values given on the command line. Absent flags leave lower layers alone.
#[derive(Debug, Default, Serialize)]
struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    wakatime_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clockify_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    projects_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    add_projects: Option<bool>,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            wakatime_key: cli.wakatime_key.clone(),
            clockify_key: cli.clockify_key.clone(),
            days: cli.days,
            projects_file: cli.projects.clone(),
            add_projects: cli.add_projects.then_some(true),
        }
    }
}

impl Config {
    /// Loads configuration from default locations, the environment and `cli`.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load(cli: &Cli) -> Result<Self, figment::Error> {
        Self::load_from(cli, dirs_config_path().as_deref())
    }

    /// Loads configuration, reading the user config file from `config_dir`.
    ///
    /// Precedence, lowest first: defaults, `config_dir/config.toml`, the
    /// `--config` file, `CLOCKSYNC_*` variables, `WAKATIME_KEY` and
    /// `CLOCKIFY_KEY`, then command-line flags.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(cli: &Cli, config_dir: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new()
            .merge(Serialized::default("days", DEFAULT_DAYS))
            .merge(Serialized::default("add_projects", false))
            .merge(Serialized::default("wakatime_url", cs_wakatime::DEFAULT_BASE_URL))
            .merge(Serialized::default("clockify_url", cs_clockify::DEFAULT_BASE_URL));

        if let Some(config_dir) = config_dir {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = &cli.config {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment
            .merge(Env::prefixed("CLOCKSYNC_"))
            .merge(Env::raw().only(&["WAKATIME_KEY", "CLOCKIFY_KEY"]))
            .merge(Serialized::defaults(Overrides::from(cli)));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for clocksync.
///
/// On Linux: `~/.config/clocksync`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("clocksync"))
}
