use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::defaults::{AuthorityKind, ProbePolicy};
use crate::field_table::{FieldTable, FieldTableError};
use crate::version::DeviceVersion;

/// Everything one pipeline invocation reads but never mutates.
///
/// Built once per process and shared by reference; independent declarations
/// may be compiled concurrently against the same config.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub field_table: FieldTable,
    /// Target device software version. `None` disables version gating and
    /// version-dependent coalescing.
    pub device_version: Option<DeviceVersion>,
}

impl PipelineConfig {
    pub fn new(field_table: FieldTable, device_version: Option<DeviceVersion>) -> Self {
        Self {
            field_table,
            device_version,
        }
    }

    /// Config backed by the embedded Field Table.
    pub fn embedded() -> Result<Self, FieldTableError> {
        Ok(Self::new(FieldTable::embedded()?, None))
    }

    /// Resolve the Field Table named by `settings` (embedded when absent).
    pub fn from_settings(settings: &Settings) -> Result<Self, FieldTableError> {
        let field_table = match &settings.field_table {
            Some(path) => FieldTable::load(path)?,
            None => FieldTable::embedded()?,
        };
        Ok(Self::new(field_table, settings.device_version.clone()))
    }

    /// True when the configured device version is at least `major`.
    pub fn device_at_least(&self, major: u32) -> bool {
        self.device_version
            .as_ref()
            .is_some_and(|version| version.at_least_major(major))
    }
}

/// Optional TOML settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub device_version: Option<DeviceVersion>,
    pub field_table: Option<PathBuf>,
    #[serde(default)]
    pub probe: ProbeSettings,
    /// Replay a captured defaulting exchange instead of treating the input
    /// as already defaulted.
    pub authority: Option<AuthoritySettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSettings {
    pub attempts: Option<u32>,
    pub interval_secs: Option<u64>,
}

/// A captured defaulting-authority answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthoritySettings {
    pub kind: AuthorityKind,
    /// File holding the captured response body.
    pub response: PathBuf,
    #[serde(default = "ok_status")]
    pub status: u16,
    #[serde(default = "ok_status")]
    pub probe_status: u16,
}

fn ok_status() -> u16 {
    200
}

impl Settings {
    /// The liveness gate policy, defaults filled in.
    pub fn probe_policy(&self) -> ProbePolicy {
        let defaults = ProbePolicy::default();
        ProbePolicy {
            attempts: self.probe.attempts.unwrap_or(defaults.attempts),
            interval: self
                .probe
                .interval_secs
                .map_or(defaults.interval, Duration::from_secs),
        }
    }
}

/// Errors returned when loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_settings(&raw, path.display().to_string())
}

fn parse_settings(raw: &str, path: String) -> Result<Settings, SettingsError> {
    toml::from_str(raw).map_err(|source| SettingsError::Parse { path, source })
}
