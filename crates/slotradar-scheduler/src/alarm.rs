//! One-shot wall-clock reminders ("HH:MM"), on their own 5-second timer.
//!
//! An alarm fires at most once: it is removed from the set when it goes off
//! and `last_fired` stops consecutive ticks inside the same minute from
//! firing a re-added copy.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};
use slotradar_core::{Host, HostNotification, RadarError, RadarSink, Result, ToneSequence};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// A minute of the day. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn of(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for AlarmTime {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RadarError::InvalidAlarm(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

/// The alarm set plus everything a firing touches.
pub struct AlarmBook {
    alarms: BTreeSet<AlarmTime>,
    last_fired: Option<AlarmTime>,
    banner_until: Option<NaiveDateTime>,
    banner_ttl: chrono::Duration,
    permission: bool,
    host: Arc<dyn Host>,
    sink: Arc<dyn RadarSink>,
}

impl AlarmBook {
    /// `permission` is the notification grant obtained once at startup;
    /// without it a firing alarm is tone and banner only.
    pub fn new(
        host: Arc<dyn Host>,
        sink: Arc<dyn RadarSink>,
        banner_ttl: Duration,
        permission: bool,
    ) -> Self {
        Self {
            alarms: BTreeSet::new(),
            last_fired: None,
            banner_until: None,
            banner_ttl: chrono::Duration::from_std(banner_ttl)
                .unwrap_or_else(|_| chrono::Duration::seconds(10)),
            permission,
            host,
            sink,
        }
    }

    /// Seed alarms without emitting a change (e.g. loaded from the store).
    /// Invalid entries are skipped with a warning.
    pub fn seed<S: AsRef<str>>(&mut self, alarms: &[S]) {
        for raw in alarms {
            match raw.as_ref().parse::<AlarmTime>() {
                Ok(t) => {
                    self.alarms.insert(t);
                }
                Err(e) => tracing::warn!("⚠️ Skipping alarm: {e}"),
            }
        }
    }

    /// Add an alarm. Duplicates are ignored.
    pub fn add(&mut self, raw: &str) -> Result<AlarmTime> {
        let time: AlarmTime = raw.parse()?;
        if self.alarms.insert(time) {
            tracing::info!("⏰ Alarm set for {time}");
            self.publish();
        }
        Ok(time)
    }

    /// Remove an alarm. Returns whether it was present.
    pub fn remove(&mut self, raw: &str) -> Result<bool> {
        let time: AlarmTime = raw.parse()?;
        let removed = self.alarms.remove(&time);
        if removed {
            tracing::info!("🗑️ Alarm {time} removed");
            self.publish();
        }
        Ok(removed)
    }

    /// Alarms in ascending order, formatted "HH:MM".
    pub fn list(&self) -> Vec<String> {
        self.alarms.iter().map(ToString::to_string).collect()
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_until.is_some()
    }

    /// One 5-second tick. Returns the alarm that fired, if any.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<AlarmTime> {
        if self.banner_until.is_some_and(|until| now >= until) {
            self.banner_until = None;
            self.host.dismiss_banner();
        }

        let current = AlarmTime::of(now.time());
        if self.alarms.contains(&current) && self.last_fired != Some(current) {
            self.fire(current, now);
            return Some(current);
        }
        None
    }

    fn fire(&mut self, time: AlarmTime, now: NaiveDateTime) {
        self.alarms.remove(&time);
        self.last_fired = Some(time);
        tracing::info!("⏰ Alarm {time} fired");
        self.publish();

        if let Err(e) = self.host.play_tone(&ToneSequence::alarm()) {
            tracing::warn!("⚠️ Alarm tone blocked: {e}");
        }

        self.host.show_banner(&format!("⏰ Reminder: it is {time}"));
        self.banner_until = Some(now + self.banner_ttl);

        if self.permission {
            let notification = HostNotification {
                title: "⏰ SlotRadar reminder".into(),
                body: format!("Alarm {time}"),
                focus_on_click: true,
            };
            if let Err(e) = self.host.show_notification(&notification) {
                tracing::warn!("⚠️ Alarm notification failed: {e}");
            }
        }
    }

    fn publish(&self) {
        self.sink.on_alarm_set_changed(&self.list());
    }
}

/// Owns the alarm timer, independent of the radar's.
pub struct AlarmClock {
    book: Arc<Mutex<AlarmBook>>,
    every: Duration,
    handle: Option<JoinHandle<()>>,
}

impl AlarmClock {
    pub fn new(book: AlarmBook, every: Duration) -> Self {
        Self {
            book: Arc::new(Mutex::new(book)),
            every,
            handle: None,
        }
    }

    pub fn book(&self) -> Arc<Mutex<AlarmBook>> {
        self.book.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.handle = Some(tokio::spawn(run_alarm_loop(self.book.clone(), self.every)));
    }

    /// Cancel the timer and clear any banner still on screen.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
        let mut book = self.book.lock().await;
        if book.banner_until.take().is_some() {
            book.host.dismiss_banner();
        }
    }
}

impl Drop for AlarmClock {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub async fn run_alarm_loop(book: Arc<Mutex<AlarmBook>>, every: Duration) {
    tracing::info!("⏰ Alarm clock started (check every {}s)", every.as_secs());

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        book.lock().await.tick(Local::now().naive_local());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHost, HostEvent, MemorySource};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn book() -> (AlarmBook, Arc<FakeHost>, Arc<MemorySource>) {
        let host = Arc::new(FakeHost::granted());
        let sink = Arc::new(MemorySource::default());
        let book = AlarmBook::new(host.clone(), sink.clone(), Duration::from_secs(10), true);
        (book, host, sink)
    }

    #[test]
    fn test_parse_alarm_time() {
        assert_eq!("09:00".parse::<AlarmTime>().unwrap().to_string(), "09:00");
        assert_eq!("9:05".parse::<AlarmTime>().unwrap().to_string(), "09:05");
        for bad in ["", "9", "24:00", "12:60", "12:5", "ab:cd", "123:00", "-1:00"] {
            assert!(matches!(bad.parse::<AlarmTime>(), Err(RadarError::InvalidAlarm(_))), "{bad}");
        }
    }

    #[test]
    fn test_sorted_without_duplicates() {
        let (mut b, _, sink) = book();
        b.add("13:30").unwrap();
        b.add("09:00").unwrap();
        b.add("9:00").unwrap();
        assert_eq!(b.list(), vec!["09:00", "13:30"]);
        // The duplicate add emitted nothing.
        assert_eq!(sink.alarm_sets.lock().unwrap().len(), 2);
        assert!(b.add("25:00").is_err());
    }

    #[test]
    fn test_remove() {
        let (mut b, _, sink) = book();
        b.add("09:00").unwrap();
        assert!(b.remove("09:00").unwrap());
        assert!(!b.remove("09:00").unwrap());
        assert!(b.list().is_empty());
        assert_eq!(sink.alarm_sets.lock().unwrap().last().unwrap().len(), 0);
    }

    #[test]
    fn test_fires_once_within_minute() {
        let (mut b, host, sink) = book();
        b.add("09:00").unwrap();

        assert_eq!(b.tick(at(8, 59, 58)), None);
        assert_eq!(b.tick(at(9, 0, 3)).map(|t| t.to_string()).as_deref(), Some("09:00"));
        assert!(b.list().is_empty());
        assert_eq!(b.tick(at(9, 0, 8)), None);

        assert_eq!(host.count(|e| matches!(e, HostEvent::Tone(3))), 1);
        assert_eq!(host.notifications().len(), 1);
        assert!(host.notifications()[0].focus_on_click);
        assert_eq!(sink.alarm_sets.lock().unwrap().last().unwrap().len(), 0);
    }

    #[test]
    fn test_readded_alarm_same_minute_does_not_refire() {
        let (mut b, _, _) = book();
        b.add("09:00").unwrap();
        b.tick(at(9, 0, 3));
        b.add("09:00").unwrap();
        assert_eq!(b.tick(at(9, 0, 13)), None);
        assert_eq!(b.list(), vec!["09:00"]);
    }

    #[test]
    fn test_banner_self_dismisses() {
        let (mut b, host, _) = book();
        b.add("09:00").unwrap();
        b.tick(at(9, 0, 3));
        assert!(b.banner_visible());
        b.tick(at(9, 0, 8));
        assert!(b.banner_visible());
        b.tick(at(9, 0, 13));
        assert!(!b.banner_visible());
        assert_eq!(host.count(|e| *e == HostEvent::BannerDismissed), 1);
    }

    #[test]
    fn test_no_notification_without_permission() {
        let host = Arc::new(FakeHost::granted());
        let sink = Arc::new(MemorySource::default());
        let mut b = AlarmBook::new(host.clone(), sink, Duration::from_secs(10), false);
        b.add("09:00").unwrap();
        b.tick(at(9, 0, 0));
        assert!(host.notifications().is_empty());
        assert_eq!(host.count(|e| matches!(e, HostEvent::Tone(_))), 1);
    }

    #[test]
    fn test_book_does_not_request_permission() {
        let (mut b, host, _) = book();
        b.add("09:00").unwrap();
        b.tick(at(9, 0, 0));
        assert_eq!(host.count(|e| *e == HostEvent::PermissionRequested), 0);
        assert_eq!(host.notifications().len(), 1);
    }

    #[test]
    fn test_seed_skips_invalid() {
        let (mut b, _, sink) = book();
        b.seed(&["18:00", "bogus", "07:15"]);
        assert_eq!(b.list(), vec!["07:15", "18:00"]);
        assert!(sink.alarm_sets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clock_start_stop() {
        let (b, _, _) = book();
        let mut clock = AlarmClock::new(b, Duration::from_secs(3600));
        clock.start();
        assert!(clock.is_running());
        clock.book().lock().await.add("06:00").unwrap();
        clock.stop().await;
        assert!(!clock.is_running());
        assert_eq!(clock.book().lock().await.list(), vec!["06:00"]);
    }
}
