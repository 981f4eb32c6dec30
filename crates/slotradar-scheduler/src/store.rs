//! File-based collaborator — records, opening log and alarms as JSON files.
//! In-memory state is authoritative; writes are best-effort and only happen
//! when an effect arrives, never on a tick.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use slotradar_core::config::StoreConfig;
use slotradar_core::{
    MonitorableRecord, OpeningLogEntry, RadarSink, RecordChecked, RecordSource, RecordStatus,
    Result,
};

pub struct JsonStore {
    records_path: PathBuf,
    alarms_path: PathBuf,
    records: Mutex<Vec<MonitorableRecord>>,
    opening_logs: Mutex<Vec<OpeningLogEntry>>,
}

impl JsonStore {
    /// Open the store in the configured data directory, creating it if needed.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let dir = config.data_path();
        std::fs::create_dir_all(&dir)?;
        Ok(Self::at(
            dir.join(&config.records_file),
            dir.join(&config.opening_log_file),
            dir.join(&config.alarms_file),
        ))
    }

    fn at(records_path: PathBuf, opening_log_path: PathBuf, alarms_path: PathBuf) -> Self {
        let records: Vec<MonitorableRecord> = load_json(&records_path);
        let opening_logs: Vec<OpeningLogEntry> = load_json(&opening_log_path);
        tracing::debug!(
            "📂 Loaded {} records, {} opening-log entries",
            records.len(),
            opening_logs.len()
        );
        Self {
            records_path,
            alarms_path,
            records: Mutex::new(records),
            opening_logs: Mutex::new(opening_logs),
        }
    }

    /// Alarms persisted by the last `on_alarm_set_changed`.
    pub fn load_alarms(&self) -> Vec<String> {
        load_json(&self.alarms_path)
    }

    fn records_guard(&self) -> MutexGuard<'_, Vec<MonitorableRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn update_record(&self, client_id: &str, record_id: &str, f: impl FnOnce(&mut MonitorableRecord)) {
        let mut records = self.records_guard();
        let Some(record) = records
            .iter_mut()
            .find(|r| r.client_id == client_id && r.id == record_id)
        else {
            tracing::warn!("⚠️ Effect for unknown record {client_id}/{record_id}");
            return;
        };
        f(record);
        if let Err(e) = save_json(&self.records_path, &*records) {
            tracing::warn!("⚠️ Failed to save records: {e}");
        }
    }
}

impl RecordSource for JsonStore {
    fn records(&self) -> Vec<MonitorableRecord> {
        self.records_guard().clone()
    }

    fn opening_logs(&self) -> Vec<OpeningLogEntry> {
        self.opening_logs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl RadarSink for JsonStore {
    fn on_record_checked(&self, checked: &RecordChecked) {
        self.update_record(&checked.client_id, &checked.record_id, |r| {
            r.record_check(&checked.timestamp, &checked.log_entry);
        });
    }

    fn on_status_promoted(&self, client_id: &str, record_id: &str, status: RecordStatus) {
        self.update_record(client_id, record_id, |r| r.status = status);
    }

    fn on_alarm_set_changed(&self, alarms: &[String]) {
        if let Err(e) = save_json(&self.alarms_path, alarms) {
            tracing::warn!("⚠️ Failed to save alarms: {e}");
        }
    }
}

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    match std::fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("⚠️ Failed to parse {}: {e}", path.display());
            T::default()
        }),
        Err(e) => {
            tracing::warn!("⚠️ Failed to read {}: {e}", path.display());
            T::default()
        }
    }
}

fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    tracing::debug!("💾 Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    fn scratch(name: &str) -> StoreConfig {
        let dir = std::env::temp_dir().join(format!("slotradar-test-{name}-{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        StoreConfig {
            data_dir: dir.to_string_lossy().into_owned(),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_missing_files_load_empty() {
        let cfg = scratch("empty");
        let store = JsonStore::open(&cfg).unwrap();
        assert!(store.records().is_empty());
        assert!(store.opening_logs().is_empty());
        assert!(store.load_alarms().is_empty());
        std::fs::remove_dir_all(cfg.data_path()).ok();
    }

    #[test]
    fn test_effects_persist() {
        let cfg = scratch("effects");
        let dir = cfg.data_path();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("records.json"),
            serde_json::to_string(&vec![record("c1", "r1")]).unwrap(),
        )
        .unwrap();

        let store = JsonStore::open(&cfg).unwrap();
        store.on_record_checked(&RecordChecked {
            client_id: "c1".into(),
            record_id: "r1".into(),
            timestamp: "2026-10-16T09:00:00".into(),
            log_entry: "checked".into(),
        });
        store.on_status_promoted("c1", "r1", RecordStatus::AppointmentBooked);
        store.on_alarm_set_changed(&["09:00".to_string()]);

        let reopened = JsonStore::open(&cfg).unwrap();
        let records = reopened.records();
        let r = &records[0];
        assert_eq!(r.last_checked.as_deref(), Some("2026-10-16T09:00:00"));
        assert_eq!(r.check_log, vec!["checked"]);
        assert_eq!(r.status, RecordStatus::AppointmentBooked);
        assert_eq!(reopened.load_alarms(), vec!["09:00"]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let cfg = scratch("corrupt");
        let dir = cfg.data_path();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("opening_log.json"), "{not json").unwrap();
        let store = JsonStore::open(&cfg).unwrap();
        assert!(store.opening_logs().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }
}
