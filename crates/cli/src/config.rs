//! Hook configuration
//!
//! Built-in defaults, then the TOML file named by `ROKID_HOOK_CONFIG`
//! (default `/etc/rokid-hook/config.toml`), then the `ROKID_HOOK_*` path
//! overrides. A missing file is not an error.

use anyhow::{Context, Result};
use hook_core::params::default_params;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_ENV: &str = "ROKID_HOOK_CONFIG";
pub const LOCK_ENV: &str = "ROKID_HOOK_LOCK";
pub const LOG_ENV: &str = "ROKID_HOOK_LOG";
pub const CONTROL_ENV: &str = "ROKID_HOOK_CTL";

const DEFAULT_CONFIG_PATH: &str = "/etc/rokid-hook/config.toml";

/// Invalid configuration value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} = {value} is outside {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    pub paths: PathsConfig,
    pub trigger: TriggerConfig,
    pub debounce: DebounceConfig,
    pub launch: LaunchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Debounce marker
    pub lock: PathBuf,
    /// Invocation log
    pub log: PathBuf,
    /// Vendor control binary
    pub control: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            lock: PathBuf::from("/tmp/rokid.lock"),
            log: PathBuf::from("/tmp/rokid.log"),
            control: PathBuf::from("/opt/rokid/rokid_max_ctl"),
        }
    }
}

/// udev fields that identify a HID bind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub driver: String,
    pub action: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        let m = hook_core::TriggerMatch::default();
        Self {
            driver: m.driver,
            action: m.action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub window_secs: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window_secs: hook_core::DEFAULT_WINDOW.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Parameters used when the hook gets no arguments
    pub default_params: Vec<String>,
    /// Exit with the control binary's code when it fails
    pub propagate_exit_status: bool,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            default_params: default_params(),
            propagate_exit_status: false,
        }
    }
}

impl HookConfig {
    /// Load from the configured file and the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(CONFIG_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = Self::from_file(&path)?;
        config.apply_overrides(lookup);
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Read a config file, defaults if it does not exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str, target: &mut PathBuf| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *target = PathBuf::from(value);
            }
        };
        set(LOCK_ENV, &mut self.paths.lock);
        set(LOG_ENV, &mut self.paths.log);
        set(CONTROL_ENV, &mut self.paths.control);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=3600).contains(&self.debounce.window_secs) {
            return Err(ConfigError::OutOfRange {
                key: "debounce.window_secs",
                value: self.debounce.window_secs,
                min: 1,
                max: 3600,
            });
        }

        let paths = [
            ("paths.lock", &self.paths.lock),
            ("paths.log", &self.paths.log),
            ("paths.control", &self.paths.control),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Empty(key));
            }
        }

        if self.trigger.driver.is_empty() {
            return Err(ConfigError::Empty("trigger.driver"));
        }
        if self.trigger.action.is_empty() {
            return Err(ConfigError::Empty("trigger.action"));
        }

        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.debounce.window_secs)
    }

    /// Fallback parameters in the form handed to the control binary
    pub fn default_params(&self) -> Vec<OsString> {
        self.launch.default_params.iter().map(OsString::from).collect()
    }

    pub fn trigger_match(&self) -> hook_core::TriggerMatch {
        hook_core::TriggerMatch {
            driver: self.trigger.driver.clone(),
            action: self.trigger.action.clone(),
        }
    }
}
