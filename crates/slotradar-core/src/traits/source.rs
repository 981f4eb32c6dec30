//! Collaborator port — where records come from and where effects go.

use crate::types::{MonitorableRecord, OpeningLogEntry, RecordStatus};

/// Live read model supplied by the surrounding system.
pub trait RecordSource: Send + Sync {
    /// Every record, eligible or not; eligibility is decided at scan time.
    fn records(&self) -> Vec<MonitorableRecord>;

    fn opening_logs(&self) -> Vec<OpeningLogEntry>;

    fn find(&self, client_id: &str, record_id: &str) -> Option<MonitorableRecord> {
        self.records()
            .into_iter()
            .find(|r| r.client_id == client_id && r.id == record_id)
    }
}

/// "Record was checked" effect.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordChecked {
    pub client_id: String,
    pub record_id: String,
    pub timestamp: String,
    pub log_entry: String,
}

/// Effects emitted outward for the surrounding system to persist.
/// All calls are fire-and-forget from the radar's point of view.
pub trait RadarSink: Send + Sync {
    fn on_record_checked(&self, checked: &RecordChecked);

    fn on_status_promoted(&self, client_id: &str, record_id: &str, status: RecordStatus);

    fn on_alarm_set_changed(&self, alarms: &[String]);
}
