use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    cli::{Cli, DEFAULT_REFRESH_SECS},
    domain::weather::TrendMetric,
};

const CONFIG_DIR_VAR: &str = "CARPLOGIC_CONFIG_DIR";

/// User preferences. Never holds weather data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub water_type: String,
    pub season: String,
    pub trend: TrendMetric,
    pub refresh_interval_secs: u64,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            water_type: "Baggersee".to_string(),
            season: "Frühling".to_string(),
            trend: TrendMetric::Pressure,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl RuntimeSettings {
    /// Explicit CLI flags win over saved values.
    pub fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(trend) = cli.trend {
            self.trend = trend.into();
        }
        if let Some(water_type) = &cli.water_type {
            self.water_type.clone_from(water_type);
        }
        if let Some(season) = &cli.season {
            self.season.clone_from(season);
        }
        if cli.refresh_interval != DEFAULT_REFRESH_SECS {
            self.refresh_interval_secs = cli.refresh_interval;
        }
    }
}

pub fn load_runtime_settings(cli: &Cli, enable_disk: bool) -> (RuntimeSettings, Option<PathBuf>) {
    let path = if enable_disk { settings_path() } else { None };
    let mut settings = path
        .as_deref()
        .and_then(read_saved_settings)
        .unwrap_or_default();
    settings.apply_cli_overrides(cli);
    (settings, path)
}

fn read_saved_settings(path: &Path) -> Option<RuntimeSettings> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(saved) => Some(saved),
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable settings file");
            None
        }
    }
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    write_private(path, payload.as_bytes()).context("writing settings file failed")
}

#[cfg(unix)]
fn write_private(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(payload)?;
    // `mode` only applies when the file is created.
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn write_private(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    fs::File::create(path)?.write_all(payload)
}

fn settings_path() -> Option<PathBuf> {
    settings_path_from(std::env::var_os(CONFIG_DIR_VAR), std::env::var_os("HOME"))
}

fn settings_path_from(config_dir: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(base) = config_dir.filter(|dir| !dir.is_empty()) {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("carplogic")
            .join("settings.json"),
    )
}

#[cfg(test)]
mod tests;
