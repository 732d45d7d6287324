//! Spawnwatch configuration system.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpawnwatchError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnwatchConfig {
    /// Canonical storage/display offset, e.g. "+08:00" (server time).
    #[serde(default = "default_canonical_offset")]
    pub canonical_offset: String,
    /// Scheduler tick interval in seconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    /// Timezone role table: role code → UTC offset. The chat layer maps a
    /// submitter to a role; this table maps the role to an offset.
    #[serde(default = "default_role_offsets")]
    pub role_offsets: BTreeMap<String, String>,
}

fn default_canonical_offset() -> String {
    "+08:00".into()
}
fn default_tick_interval() -> u64 {
    60
}
fn default_role_offsets() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("PH".into(), "+08:00".into()),
        ("IND".into(), "+05:30".into()),
        ("MY".into(), "+08:00".into()),
        ("RU".into(), "+03:00".into()),
        ("US".into(), "-05:00".into()),
    ])
}

impl Default for SpawnwatchConfig {
    fn default() -> Self {
        Self {
            canonical_offset: default_canonical_offset(),
            tick_interval_secs: default_tick_interval(),
            role_offsets: default_role_offsets(),
        }
    }
}

impl SpawnwatchConfig {
    /// Load config from the default path (~/.spawnwatch/config.toml),
    /// falling back to defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpawnwatchError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| SpawnwatchError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".spawnwatch")
            .join("config.toml")
    }

    /// The canonical offset as a chrono timezone.
    pub fn canonical_tz(&self) -> Result<FixedOffset> {
        parse_offset(&self.canonical_offset)
    }

    /// Offset for a timezone role, if the role is known.
    pub fn offset_for_role(&self, role: &str) -> Option<Result<FixedOffset>> {
        self.role_offsets.get(role).map(|s| parse_offset(s))
    }
}

fn parse_offset(s: &str) -> Result<FixedOffset> {
    s.parse::<FixedOffset>()
        .map_err(|_| SpawnwatchError::Timezone(s.to_string()))
}
