//! Test doubles: a recording host and an in-memory collaborator.

use std::sync::Mutex;

use slotradar_core::{
    Host, HostNotification, MonitorableRecord, OpeningLogEntry, PriorityMode, RadarError,
    RadarSink, RecordChecked, RecordSource, RecordStatus, Result, ToneSequence,
};

pub fn record(client_id: &str, id: &str) -> MonitorableRecord {
    MonitorableRecord {
        id: id.into(),
        client_id: client_id.into(),
        client_name: format!("Client {client_id}"),
        destination: "France".into(),
        priority: PriorityMode::Auto,
        target_date_start: None,
        target_date_end: None,
        last_checked: None,
        check_log: Vec::new(),
        archived: false,
        status: RecordStatus::AwaitingAppointment,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    PermissionRequested,
    Notification(HostNotification),
    SoundStarted(f32),
    SoundStopped,
    Tone(usize),
    Title(String),
    Banner(String),
    BannerDismissed,
}

#[derive(Default)]
pub struct FakeHost {
    pub permission: bool,
    pub block_sound: bool,
    events: Mutex<Vec<HostEvent>>,
}

impl FakeHost {
    pub fn granted() -> Self {
        Self {
            permission: true,
            ..Self::default()
        }
    }

    pub fn denied() -> Self {
        Self::default()
    }

    /// Permission granted, but every attempt to start the sound loop fails.
    pub fn blocked_sound() -> Self {
        Self {
            permission: true,
            block_sound: true,
            ..Self::default()
        }
    }

    /// Display titles in the order they were set.
    pub fn titles(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Title(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    pub fn notifications(&self) -> Vec<HostNotification> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Notification(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn last_title(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            HostEvent::Title(t) => Some(t),
            _ => None,
        })
    }
}

impl Host for FakeHost {
    fn request_notification_permission(&self) -> bool {
        self.push(HostEvent::PermissionRequested);
        self.permission
    }

    fn show_notification(&self, notification: &HostNotification) -> Result<()> {
        self.push(HostEvent::Notification(notification.clone()));
        Ok(())
    }

    fn play_looping_sound(&self, volume: f32) -> Result<()> {
        if self.block_sound {
            return Err(RadarError::Host("autoplay blocked".into()));
        }
        self.push(HostEvent::SoundStarted(volume));
        Ok(())
    }

    fn stop_sound(&self) {
        self.push(HostEvent::SoundStopped);
    }

    fn play_tone(&self, tone: &ToneSequence) -> Result<()> {
        self.push(HostEvent::Tone(tone.beeps.len()));
        Ok(())
    }

    fn set_display_title(&self, title: &str) {
        self.push(HostEvent::Title(title.to_string()));
    }

    fn show_banner(&self, text: &str) {
        self.push(HostEvent::Banner(text.to_string()));
    }

    fn dismiss_banner(&self) {
        self.push(HostEvent::BannerDismissed);
    }
}

/// Collaborator that keeps everything in memory and records emitted effects.
#[derive(Default)]
pub struct MemorySource {
    pub records: Mutex<Vec<MonitorableRecord>>,
    pub logs: Mutex<Vec<OpeningLogEntry>>,
    pub checked: Mutex<Vec<RecordChecked>>,
    pub promoted: Mutex<Vec<(String, String, RecordStatus)>>,
    pub alarm_sets: Mutex<Vec<Vec<String>>>,
}

impl MemorySource {
    pub fn with_records(records: Vec<MonitorableRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn update(&self, client_id: &str, f: impl FnOnce(&mut MonitorableRecord)) {
        let mut records = self.records.lock().unwrap();
        if let Some(r) = records.iter_mut().find(|r| r.client_id == client_id) {
            f(r);
        }
    }
}

impl RecordSource for MemorySource {
    fn records(&self) -> Vec<MonitorableRecord> {
        self.records.lock().unwrap().clone()
    }

    fn opening_logs(&self) -> Vec<OpeningLogEntry> {
        self.logs.lock().unwrap().clone()
    }
}

impl RadarSink for MemorySource {
    fn on_record_checked(&self, checked: &RecordChecked) {
        {
            let mut records = self.records.lock().unwrap();
            if let Some(r) = records
                .iter_mut()
                .find(|r| r.client_id == checked.client_id && r.id == checked.record_id)
            {
                r.record_check(&checked.timestamp, &checked.log_entry);
            }
        }
        self.checked.lock().unwrap().push(checked.clone());
    }

    fn on_status_promoted(&self, client_id: &str, record_id: &str, status: RecordStatus) {
        {
            let mut records = self.records.lock().unwrap();
            if let Some(r) = records
                .iter_mut()
                .find(|r| r.client_id == client_id && r.id == record_id)
            {
                r.status = status;
            }
        }
        self.promoted
            .lock()
            .unwrap()
            .push((client_id.to_string(), record_id.to_string(), status));
    }

    fn on_alarm_set_changed(&self, alarms: &[String]) {
        self.alarm_sets.lock().unwrap().push(alarms.to_vec());
    }
}
