//! Re-check interval policy. Manual modes always win; `auto` maps the
//! urgency score onto the same three tiers.

use slotradar_core::{MonitorableRecord, PriorityMode};

pub const URGENT_MINUTES: i64 = 30;
pub const NORMAL_MINUTES: i64 = 120;
pub const DORMANT_MINUTES: i64 = 1440;

/// Minutes between manual checks for `record` given its urgency score.
pub fn interval_minutes(record: &MonitorableRecord, urgency_score: i32) -> i64 {
    interval_for_mode(record.priority, urgency_score)
}

pub fn interval_for_mode(mode: PriorityMode, urgency_score: i32) -> i64 {
    match mode {
        PriorityMode::Urgent => URGENT_MINUTES,
        PriorityMode::Normal => NORMAL_MINUTES,
        PriorityMode::Dormant => DORMANT_MINUTES,
        PriorityMode::Auto => match urgency_score {
            s if s >= 50 => URGENT_MINUTES,
            s if s >= 20 => NORMAL_MINUTES,
            _ => DORMANT_MINUTES,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_modes_ignore_score() {
        for score in [0, 25, 60, 250] {
            assert_eq!(interval_for_mode(PriorityMode::Urgent, score), 30);
            assert_eq!(interval_for_mode(PriorityMode::Normal, score), 120);
            assert_eq!(interval_for_mode(PriorityMode::Dormant, score), 1440);
        }
    }

    #[test]
    fn test_auto_tiers() {
        assert_eq!(interval_for_mode(PriorityMode::Auto, 60), 30);
        assert_eq!(interval_for_mode(PriorityMode::Auto, 50), 30);
        assert_eq!(interval_for_mode(PriorityMode::Auto, 49), 120);
        assert_eq!(interval_for_mode(PriorityMode::Auto, 25), 120);
        assert_eq!(interval_for_mode(PriorityMode::Auto, 20), 120);
        assert_eq!(interval_for_mode(PriorityMode::Auto, 19), 1440);
        assert_eq!(interval_for_mode(PriorityMode::Auto, 5), 1440);
    }

    #[test]
    fn test_record_uses_its_mode() {
        let mut r = crate::testing::record("c1", "r1");
        r.priority = PriorityMode::Urgent;
        assert_eq!(interval_minutes(&r, 0), 30);
    }
}
