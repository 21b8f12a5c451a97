//! Configuration loading for Modalwatch.
//!
//! Reads `~/.modalwatch/config.toml`. Every field is optional and bad
//! config can never prevent startup: read or parse failures log a warning
//! and the defaults apply.

use std::{
    env,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Host autosave cadence assumed when the config does not say otherwise.
/// Matches the host application's stock preference (minutes).
const DEFAULT_AUTOSAVE_INTERVAL_MINUTES: u64 = 2;

#[derive(Debug, Default, Deserialize)]
pub struct MonitorConfig {
    pub autosave: Option<AutosaveConfig>,
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AutosaveConfig {
    /// The host's configured autosave interval in minutes. Elapsed time
    /// beyond this renders as a warning.
    pub interval_minutes: Option<u64>,
    /// Primary directory the autosave probe scans, overriding the host
    /// temp dir. Supports `${VAR}` expansion.
    pub temp_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UiConfig {
    pub high_contrast: Option<bool>,
}

impl MonitorConfig {
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return None;
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                None
            }
        }
    }

    /// Warn threshold in whole minutes.
    #[must_use]
    pub fn autosave_interval_minutes(&self) -> u64 {
        self.autosave
            .as_ref()
            .and_then(|autosave| autosave.interval_minutes)
            .unwrap_or(DEFAULT_AUTOSAVE_INTERVAL_MINUTES)
    }

    /// Probe directory override, env-expanded.
    #[must_use]
    pub fn probe_temp_dir(&self) -> Option<PathBuf> {
        self.autosave
            .as_ref()
            .and_then(|autosave| autosave.temp_dir.as_deref())
            .map(expand_env_vars)
            .map(PathBuf::from)
    }

    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.ui
            .as_ref()
            .and_then(|ui| ui.high_contrast)
            .unwrap_or(false)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < value.len() {
        if value[i..].starts_with("${") {
            let start = i + 2;
            if let Some(end_rel) = value[start..].find('}') {
                let end = start + end_rel;
                let var = &value[start..end];
                if !var.is_empty() {
                    let replacement = env::var(var).unwrap_or_default();
                    out.push_str(&replacement);
                }
                i = end + 1;
                continue;
            }
        }

        let ch = value[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".modalwatch").join("config.toml"))
}
