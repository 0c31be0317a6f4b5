//! Configuration for the logging facility
//!
//! Carries the log root, run mode and retention window. Settings can be
//! loaded from and saved to a TOML file, or built programmatically.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Process-wide run mode, set once at initialization.
///
/// Development logs to stdout and keeps debug records; Production logs to
/// per-channel files and drops debug records entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    #[serde(rename = "dev")]
    Development,
    #[serde(rename = "pro")]
    Production,
}

impl RunMode {
    /// Parse a mode string. Anything that is not "pro" means Development.
    pub fn parse(mode: &str) -> Self {
        if mode.eq_ignore_ascii_case("pro") {
            RunMode::Production
        } else {
            RunMode::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Development => "dev",
            RunMode::Production => "pro",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, RunMode::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, RunMode::Development)
    }
}

/// Settings for the logging facility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding one day-named subdirectory per calendar day
    #[serde(default = "default_log_root")]
    pub log_root: PathBuf,

    /// Run mode: "dev" or "pro"
    #[serde(default = "default_mode")]
    pub mode: RunMode,

    /// Age in days after which a day directory is swept
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

/// Default log root (`~/.daylog/logs`)
/// Falls back to a local directory if the home directory cannot be determined
pub fn default_log_root() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".daylog").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".daylog/logs"))
}

fn default_mode() -> RunMode {
    RunMode::Development
}

fn default_retention_days() -> i64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_root: default_log_root(),
            mode: default_mode(),
            retention_days: default_retention_days(),
        }
    }
}

impl Settings {
    /// Create settings with an explicit root and mode
    pub fn new(log_root: impl Into<PathBuf>, mode: RunMode) -> Self {
        Self {
            log_root: log_root.into(),
            mode,
            retention_days: default_retention_days(),
        }
    }

    /// Load settings from file, or return default if not found
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read settings file")?;
            toml::from_str(&content).context("Failed to parse settings file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content).context("Failed to write settings file")?;
        Ok(())
    }
}
