//! Radar engine — scans monitorable records and raises due-check alerts.
//! `RadarScheduler` drives `RadarEngine::tick` from a tokio interval; the
//! engine itself takes `now` explicitly so every decision is testable.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use slotradar_core::{
    MonitorableRecord, RadarError, RadarSink, RecordChecked, RecordSource, RecordStatus, Result,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::alerts::{AlertQueue, PendingAlert};
use crate::frequency::interval_minutes;
use crate::notify::NotificationMultiplexer;
use crate::time_format::{self, DisplayTier, Elapsed};
use crate::urgency::{self, UrgencyResult};

/// Per-record scan result.
#[derive(Debug, Clone, Serialize)]
pub struct RecordScan {
    pub client_id: String,
    pub record_id: String,
    pub urgency: UrgencyResult,
    pub interval_minutes: i64,
    pub elapsed: Elapsed,
    pub due: bool,
}

/// Outcome of one radar tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub due: usize,
    pub newly_queued: Vec<String>,
    pub queue_len: usize,
    pub triggered: bool,
}

/// Evaluate one record at `now`. Eligibility is checked by the caller.
pub fn scan_record(
    record: &MonitorableRecord,
    opening_logs: &[slotradar_core::OpeningLogEntry],
    now: NaiveDateTime,
) -> RecordScan {
    let urgency = urgency::score(record, opening_logs, now);
    let interval = interval_minutes(record, urgency.score);
    let elapsed = time_format::elapsed_since(record.last_checked.as_deref(), now);
    let due = elapsed.tier == DisplayTier::Never || elapsed.minutes_elapsed >= interval;
    RecordScan {
        client_id: record.client_id.clone(),
        record_id: record.id.clone(),
        urgency,
        interval_minutes: interval,
        elapsed,
        due,
    }
}

/// The radar engine — owns the alert queue and the notification fan-out.
pub struct RadarEngine {
    source: Arc<dyn RecordSource>,
    sink: Arc<dyn RadarSink>,
    queue: AlertQueue,
    notifier: NotificationMultiplexer,
    active: bool,
}

impl RadarEngine {
    /// Create an inactive engine.
    pub fn new(
        source: Arc<dyn RecordSource>,
        sink: Arc<dyn RadarSink>,
        notifier: NotificationMultiplexer,
    ) -> Self {
        Self {
            source,
            sink,
            queue: AlertQueue::new(),
            notifier,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Toggle the radar. Turning it off silences notifications but keeps
    /// queued alerts ("mute without forget"); they surface again on resume.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if active {
            tracing::info!("📡 Radar active ({} alerts held)", self.queue.len());
        } else {
            self.notifier.stop();
            tracing::info!("📴 Radar muted ({} alerts held)", self.queue.len());
        }
    }

    /// Due records among the eligible ones, as alert candidates.
    pub fn scan(&self, now: NaiveDateTime) -> Vec<PendingAlert> {
        let logs = self.source.opening_logs();
        self.source
            .records()
            .iter()
            .filter(|r| r.is_monitorable())
            .filter(|r| scan_record(r, &logs, now).due)
            .map(|r| PendingAlert {
                id: r.client_id.clone(),
                name: r.client_name.clone(),
                destination: r.destination.clone(),
            })
            .collect()
    }

    /// Tick — called periodically to queue newly due records and keep the
    /// notification channels alive while anything is pending.
    pub fn tick(&mut self, now: NaiveDateTime) -> TickReport {
        if !self.active {
            return TickReport {
                queue_len: self.queue.len(),
                ..TickReport::default()
            };
        }

        let due_list = self.scan(now);
        let due = due_list.len();
        let mut newly_queued = Vec::new();
        for alert in due_list {
            let id = alert.id.clone();
            if self.queue.enqueue_if_absent(alert) {
                newly_queued.push(id);
            }
        }

        let queue_len = self.queue.len();
        let triggered = queue_len > 0;
        if !newly_queued.is_empty() {
            tracing::info!(
                "🔔 {} new due check(s), {} pending",
                newly_queued.len(),
                queue_len
            );
        }
        if triggered {
            self.notifier.trigger(queue_len);
        }

        TickReport {
            due,
            newly_queued,
            queue_len,
            triggered,
        }
    }

    /// Operator dismissed one alert.
    pub fn acknowledge(&mut self, id: &str) -> bool {
        let removed = self.queue.acknowledge(id).is_some();
        if removed {
            tracing::debug!("✅ Alert acknowledged: {id}");
        }
        self.stop_if_drained();
        removed
    }

    /// "Ignore all": drop every pending alert and silence the channels.
    pub fn clear_all(&mut self) {
        let dropped = self.queue.clear_all();
        self.notifier.stop();
        tracing::info!("🧹 Cleared {dropped} pending alert(s)");
    }

    /// The operator performed a manual check. Emits the "record checked"
    /// effect and drops the client's alert under the same lock, so the next
    /// tick sees the fresh timestamp.
    pub fn mark_checked(
        &mut self,
        client_id: &str,
        record_id: &str,
        now: NaiveDateTime,
    ) -> Result<RecordChecked> {
        let record = self
            .source
            .find(client_id, record_id)
            .ok_or_else(|| RadarError::RecordNotFound(format!("{client_id}/{record_id}")))?;

        let timestamp = time_format::format_timestamp(now);
        let checked = RecordChecked {
            client_id: client_id.to_string(),
            record_id: record_id.to_string(),
            log_entry: format!("{} checked ({})", timestamp, record.destination),
            timestamp,
        };
        self.sink.on_record_checked(&checked);
        if self.queue.on_record_checked(client_id) {
            self.stop_if_drained();
        }
        tracing::info!("🕵️ Checked {} ({})", record.client_name, record.destination);
        Ok(checked)
    }

    /// An appointment was actually obtained; the record leaves monitoring.
    pub fn confirm_booked(&mut self, client_id: &str, record_id: &str) -> Result<()> {
        let record = self
            .source
            .find(client_id, record_id)
            .ok_or_else(|| RadarError::RecordNotFound(format!("{client_id}/{record_id}")))?;
        self.sink
            .on_status_promoted(client_id, record_id, RecordStatus::AppointmentBooked);
        if self.queue.acknowledge(client_id).is_some() {
            self.stop_if_drained();
        }
        tracing::info!("🎉 Appointment booked for {} ({})", record.client_name, record.destination);
        Ok(())
    }

    /// Alerts to present; empty while the radar is muted.
    pub fn visible_alerts(&self) -> Vec<PendingAlert> {
        if self.active {
            self.queue.snapshot()
        } else {
            Vec::new()
        }
    }

    pub fn queue(&self) -> &AlertQueue {
        &self.queue
    }

    pub fn notifier(&self) -> &NotificationMultiplexer {
        &self.notifier
    }

    pub fn source(&self) -> Arc<dyn RecordSource> {
        self.source.clone()
    }

    fn stop_if_drained(&mut self) {
        if self.queue.is_empty() {
            self.notifier.stop();
        }
    }
}

/// Owns the radar's recurring timer. Dropping it cancels the loop.
pub struct RadarScheduler {
    engine: Arc<Mutex<RadarEngine>>,
    every: Duration,
    handle: Option<JoinHandle<()>>,
}

impl RadarScheduler {
    pub fn new(engine: RadarEngine, every: Duration) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            every,
            handle: None,
        }
    }

    /// Shared handle for operator entry points (acknowledge, check, ...).
    pub fn engine(&self) -> Arc<Mutex<RadarEngine>> {
        self.engine.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Activate the radar and start ticking. No-op if already running.
    pub async fn activate(&mut self) {
        self.start(true).await;
    }

    /// Spawn the loop with the given active flag. The flag is set before the
    /// first tick, so a muted start never queues or sounds anything until
    /// the operator resumes.
    pub async fn start(&mut self, active: bool) {
        self.engine.lock().await.set_active(active);
        if self.is_running() {
            return;
        }
        self.handle = Some(tokio::spawn(run_radar_loop(self.engine.clone(), self.every)));
    }

    /// Cancel the timer, then silence notifications. Once this returns no
    /// further tick is delivered.
    pub async fn deactivate(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            // Waits out a tick that already holds the lock.
            let _ = handle.await;
        }
        self.engine.lock().await.set_active(false);
    }
}

impl Drop for RadarScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// The radar loop: one run-to-completion tick per interval.
pub async fn run_radar_loop(engine: Arc<Mutex<RadarEngine>>, every: Duration) {
    tracing::info!("⏰ Radar started (check every {}s)", every.as_secs());

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let report = {
            let mut eng = engine.lock().await;
            eng.tick(Local::now().naive_local())
        };
        tracing::debug!(
            "📡 Radar tick: {} due, {} new, {} pending",
            report.due,
            report.newly_queued.len(),
            report.queue_len
        );
    }
}
