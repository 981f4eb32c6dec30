//! "Last checked" parsing and elapsed-time bucketing.
//!
//! Timestamps arrive as free-form strings from the surrounding system: either
//! a machine format (RFC 3339 or ISO-like local date-time) or the compact
//! `D/M H:M` form operators type by hand, which carries no year.
//! All arithmetic is done on local wall-clock time (`NaiveDateTime`).

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Elapsed minutes reported for a record that was never checked.
pub const NEVER_ELAPSED: i64 = 999_999;

/// Result of parsing a "last checked" string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTimestamp {
    Parsed(NaiveDateTime),
    Unparseable,
}

impl ParsedTimestamp {
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            ParsedTimestamp::Parsed(dt) => Some(*dt),
            ParsedTimestamp::Unparseable => None,
        }
    }
}

/// Display bucket for elapsed time since the last check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayTier {
    Never,
    JustNow,
    Fresh,
    Recent,
    Aging,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Elapsed {
    pub text: String,
    pub minutes_elapsed: i64,
    pub tier: DisplayTier,
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a "last checked" value. Never fails; bad input is `Unparseable`.
pub fn parse(raw: &str, now: NaiveDateTime) -> ParsedTimestamp {
    let raw = raw.trim();
    if raw.is_empty() {
        return ParsedTimestamp::Unparseable;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return ParsedTimestamp::Parsed(dt.with_timezone(&Local).naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return ParsedTimestamp::Parsed(dt);
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return ParsedTimestamp::Parsed(midnight);
    }

    match parse_compact(raw, now) {
        Some(dt) => ParsedTimestamp::Parsed(dt),
        None => ParsedTimestamp::Unparseable,
    }
}

/// `D/M H:M` in the current year; an instant in the future means last year.
fn parse_compact(raw: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (date_part, time_part) = raw.split_once(char::is_whitespace)?;
    let (day, month) = date_part.split_once('/')?;
    let (hour, minute) = time_part.trim().split_once(':')?;

    let day: u32 = day.trim().parse().ok()?;
    let month: u32 = month.trim().parse().ok()?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;

    let at_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
    };

    let candidate = at_year(now.year())?;
    if candidate > now {
        at_year(now.year() - 1)
    } else {
        Some(candidate)
    }
}

/// Bucket the time since `parsed` relative to `now`.
pub fn classify(parsed: ParsedTimestamp, now: NaiveDateTime) -> Elapsed {
    let Some(at) = parsed.as_datetime() else {
        return Elapsed {
            text: "never".into(),
            minutes_elapsed: NEVER_ELAPSED,
            tier: DisplayTier::Never,
        };
    };

    if at > now {
        return Elapsed {
            text: "just now".into(),
            minutes_elapsed: 0,
            tier: DisplayTier::JustNow,
        };
    }

    let minutes = (now - at).num_minutes();
    let (tier, text) = match minutes {
        m if m < 60 => (DisplayTier::Fresh, format!("{m}m ago")),
        m if m < 240 => (DisplayTier::Recent, format!("{}h ago", m / 60)),
        m if m < 1440 => (DisplayTier::Aging, format!("{}h ago", m / 60)),
        m => (DisplayTier::Stale, format!("{}d ago", m / 1440)),
    };

    Elapsed {
        text,
        minutes_elapsed: minutes,
        tier,
    }
}

/// Parse and classify an optional "last checked" value in one go.
pub fn elapsed_since(raw: Option<&str>, now: NaiveDateTime) -> Elapsed {
    let parsed = raw.map_or(ParsedTimestamp::Unparseable, |r| parse(r, now));
    classify(parsed, now)
}

/// Canonical format written back when a record is checked.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}
