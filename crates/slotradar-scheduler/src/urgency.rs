//! Urgency scoring — how badly a record needs a re-check right now.
//!
//! Two independent, additive signals:
//! - target window opening in fewer than [`TARGET_WINDOW_DAYS`] days → +50
//! - an opening-log hit for the same destination, weekday and hour → +100

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use slotradar_core::{MonitorableRecord, OpeningLogEntry};

pub const TARGET_WINDOW_DAYS: i64 = 15;
pub const TARGET_WINDOW_POINTS: i32 = 50;
pub const HISTORY_MATCH_POINTS: i32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UrgencyResult {
    pub score: i32,
    pub history_match: bool,
}

/// Score a record against the opening log at `now`.
pub fn score(
    record: &MonitorableRecord,
    opening_logs: &[OpeningLogEntry],
    now: NaiveDateTime,
) -> UrgencyResult {
    let mut result = UrgencyResult::default();

    if let Some(start) = record.target_date_start {
        let days_until = (start - now.date()).num_days();
        if days_until < TARGET_WINDOW_DAYS {
            result.score += TARGET_WINDOW_POINTS;
        }
    }

    let today = weekday_name(now.weekday());
    let hour = now.hour();
    let matched = opening_logs.iter().any(|entry| {
        entry.destination.trim().eq_ignore_ascii_case(record.destination.trim())
            && entry.day_of_week.trim().eq_ignore_ascii_case(today)
            && hour_prefix(&entry.time) == Some(hour)
    });
    if matched {
        result.history_match = true;
        result.score += HISTORY_MATCH_POINTS;
    }

    result
}

fn hour_prefix(time: &str) -> Option<u32> {
    time.trim().split(':').next()?.trim().parse().ok()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;
    use chrono::{Duration, NaiveDate};

    // 2026-10-16 is a Friday.
    fn friday_9am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(9, 12, 0)
            .unwrap()
    }

    fn opening(destination: &str, day: &str, time: &str) -> OpeningLogEntry {
        OpeningLogEntry {
            destination: destination.into(),
            day_of_week: day.into(),
            time: time.into(),
            discovered_at: String::new(),
        }
    }

    #[test]
    fn test_no_signals() {
        let r = record("c1", "r1");
        assert_eq!(score(&r, &[], friday_9am()), UrgencyResult::default());
    }

    #[test]
    fn test_target_window() {
        let now = friday_9am();
        let mut r = record("c1", "r1");

        r.target_date_start = Some(now.date() + Duration::days(10));
        assert_eq!(score(&r, &[], now).score, 50);

        r.target_date_start = Some(now.date() + Duration::days(14));
        assert_eq!(score(&r, &[], now).score, 50);

        r.target_date_start = Some(now.date() + Duration::days(15));
        assert_eq!(score(&r, &[], now).score, 0);

        // Between 15 and 30 days adds nothing under the single-threshold rule.
        r.target_date_start = Some(now.date() + Duration::days(25));
        assert_eq!(score(&r, &[], now).score, 0);
    }

    #[test]
    fn test_history_match() {
        let now = friday_9am();
        let r = record("c1", "r1");
        let logs = vec![opening("france", "friday", "09:40")];
        let result = score(&r, &logs, now);
        assert!(result.history_match);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_history_requires_all_three() {
        let now = friday_9am();
        let r = record("c1", "r1");
        for logs in [
            vec![opening("Spain", "Friday", "09:00")],
            vec![opening("France", "Thursday", "09:00")],
            vec![opening("France", "Friday", "10:00")],
            vec![opening("France", "Friday", "bad")],
        ] {
            let result = score(&r, &logs, now);
            assert!(!result.history_match);
            assert_eq!(result.score, 0);
        }
    }

    #[test]
    fn test_signals_are_additive() {
        let now = friday_9am();
        let mut r = record("c1", "r1");
        r.target_date_start = Some(now.date() + Duration::days(3));
        let logs = vec![opening("France", "Friday", "9:05")];
        let result = score(&r, &logs, now);
        assert!(result.history_match);
        assert_eq!(result.score, 150);
    }
}
