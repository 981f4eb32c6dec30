//! Read model consumed by the radar: monitorable records and the opening log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in a record's check log.
pub const MAX_CHECK_LOG: usize = 50;

/// Operator-set (or automatic) re-check tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityMode {
    #[default]
    Auto,
    Urgent,
    Normal,
    Dormant,
}

/// Application status as tracked by the surrounding system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Preparing,
    AwaitingAppointment,
    AppointmentBooked,
    Submitted,
    Closed,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Preparing => write!(f, "preparing"),
            RecordStatus::AwaitingAppointment => write!(f, "awaiting appointment"),
            RecordStatus::AppointmentBooked => write!(f, "appointment booked"),
            RecordStatus::Submitted => write!(f, "submitted"),
            RecordStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Projection of a client application the radar can watch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorableRecord {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub destination: String,
    #[serde(default)]
    pub priority: PriorityMode,
    #[serde(default)]
    pub target_date_start: Option<NaiveDate>,
    #[serde(default)]
    pub target_date_end: Option<NaiveDate>,
    /// Free-form; see `time_format::parse` in the scheduler crate.
    #[serde(default)]
    pub last_checked: Option<String>,
    /// Newest first, capped at [`MAX_CHECK_LOG`].
    #[serde(default)]
    pub check_log: Vec<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub status: RecordStatus,
}

impl MonitorableRecord {
    /// Only non-archived records awaiting an appointment are watched.
    pub fn is_monitorable(&self) -> bool {
        self.status == RecordStatus::AwaitingAppointment && !self.archived
    }

    /// Stamp a manual check: update `last_checked` and prepend to the log.
    pub fn record_check(&mut self, timestamp: &str, entry: &str) {
        self.last_checked = Some(timestamp.to_string());
        self.check_log.insert(0, entry.to_string());
        self.check_log.truncate(MAX_CHECK_LOG);
    }
}

/// A past observation of a slot actually being available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningLogEntry {
    pub destination: String,
    /// English weekday name, e.g. "Tuesday".
    pub day_of_week: String,
    /// "HH:MM".
    pub time: String,
    #[serde(default)]
    pub discovered_at: String,
}
