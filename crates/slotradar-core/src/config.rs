//! SlotRadar configuration system.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{RadarError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub radar: RadarConfig,
    #[serde(default)]
    pub alarm: AlarmConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Destination → booking portal URL. Only used to open the check page.
    #[serde(default)]
    pub centers: BTreeMap<String, String>,
}

impl AppConfig {
    /// Load config from the default path (~/.slotradar/config.toml).
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
            .map_err(|e| RadarError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| RadarError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path())
    }

    /// Save config to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| RadarError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the SlotRadar home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".slotradar")
    }

    /// Booking portal URL for a destination, matched case-insensitively.
    pub fn center_url(&self, destination: &str) -> Option<&str> {
        self.centers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(destination.trim()))
            .map(|(_, url)| url.as_str())
    }
}

/// Radar (due-check loop) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarConfig {
    #[serde(default = "default_radar_tick")]
    pub tick_secs: u64,
    #[serde(default = "bool_true")]
    pub start_active: bool,
}

fn bool_true() -> bool { true }
fn default_radar_tick() -> u64 { 10 }

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_radar_tick(),
            start_active: true,
        }
    }
}

/// Alarm clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    #[serde(default = "default_alarm_tick")]
    pub tick_secs: u64,
    #[serde(default = "default_banner_secs")]
    pub banner_secs: u64,
    /// Alarms seeded at startup, "HH:MM".
    #[serde(default)]
    pub alarms: Vec<String>,
}

fn default_alarm_tick() -> u64 { 5 }
fn default_banner_secs() -> u64 { 10 }

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            tick_secs: default_alarm_tick(),
            banner_secs: default_banner_secs(),
            alarms: Vec::new(),
        }
    }
}

/// Notification channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "default_volume")]
    pub sound_volume: f32,
    #[serde(default = "default_blink_ms")]
    pub blink_interval_ms: u64,
    #[serde(default = "default_neutral_title")]
    pub neutral_title: String,
    #[serde(default = "bool_true")]
    pub system_notifications: bool,
}

fn default_volume() -> f32 { 0.6 }
fn default_blink_ms() -> u64 { 1000 }
fn default_neutral_title() -> String { "SlotRadar".into() }

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            sound_volume: default_volume(),
            blink_interval_ms: default_blink_ms(),
            neutral_title: default_neutral_title(),
            system_notifications: true,
        }
    }
}

/// File-backed collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_records_file")]
    pub records_file: String,
    #[serde(default = "default_opening_log_file")]
    pub opening_log_file: String,
    #[serde(default = "default_alarms_file")]
    pub alarms_file: String,
}

fn default_data_dir() -> String { "~/.slotradar".into() }
fn default_records_file() -> String { "records.json".into() }
fn default_opening_log_file() -> String { "opening_log.json".into() }
fn default_alarms_file() -> String { "alarms.json".into() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            records_file: default_records_file(),
            opening_log_file: default_opening_log_file(),
            alarms_file: default_alarms_file(),
        }
    }
}

impl StoreConfig {
    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir).to_string())
    }
}
