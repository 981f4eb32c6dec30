//! Cockpit ordering — one record in focus at a time, most pressing first.

use chrono::NaiveDateTime;
use serde::Serialize;
use slotradar_core::{MonitorableRecord, OpeningLogEntry};

use crate::engine::{scan_record, RecordScan};
use crate::time_format::DisplayTier;

/// Recency contribution of a never-checked record.
pub const NEVER_RECENCY: f64 = 100.0;

#[derive(Debug, Clone, Serialize)]
pub struct CockpitEntry {
    pub record: MonitorableRecord,
    pub scan: RecordScan,
    pub sort_key: f64,
}

fn recency_term(scan: &RecordScan) -> f64 {
    if scan.elapsed.tier == DisplayTier::Never {
        NEVER_RECENCY
    } else {
        scan.elapsed.minutes_elapsed as f64 / 10.0
    }
}

/// Score and order the eligible records, highest key first. Ties keep
/// their input order.
pub fn rank(
    records: &[MonitorableRecord],
    opening_logs: &[OpeningLogEntry],
    now: NaiveDateTime,
) -> Vec<CockpitEntry> {
    let mut entries: Vec<CockpitEntry> = records
        .iter()
        .filter(|r| r.is_monitorable())
        .map(|r| {
            let scan = scan_record(r, opening_logs, now);
            let sort_key = f64::from(scan.urgency.score) + recency_term(&scan);
            CockpitEntry {
                record: r.clone(),
                scan,
                sort_key,
            }
        })
        .collect();
    // `sort_by` is stable.
    entries.sort_by(|a, b| b.sort_key.total_cmp(&a.sort_key));
    entries
}

/// Focus cursor over a ranked list.
#[derive(Debug, Default)]
pub struct Cockpit {
    entries: Vec<CockpitEntry>,
    cursor: usize,
}

impl Cockpit {
    pub fn new(entries: Vec<CockpitEntry>) -> Self {
        Self { entries, cursor: 0 }
    }

    pub fn build(records: &[MonitorableRecord], logs: &[OpeningLogEntry], now: NaiveDateTime) -> Self {
        Self::new(rank(records, logs, now))
    }

    pub fn entries(&self) -> &[CockpitEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&CockpitEntry> {
        self.entries.get(self.cursor)
    }

    /// Advance; wraps to the first entry past the last.
    pub fn next(&mut self) -> Option<&CockpitEntry> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.entries.len();
        self.current()
    }

    /// Step back; stays on the first entry.
    pub fn previous(&mut self) -> Option<&CockpitEntry> {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }
}
