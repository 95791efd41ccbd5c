//! Cycle grouping, statistics, and next-period prediction
//!
//! Period-status entries are grouped into cycles with a gap-threshold fold
//! over the date-sorted sequence; adjacent cycle starts then yield the
//! average length and the predicted next start. Everything here is a pure
//! function of the supplied logs and an explicit `today`.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{DailyLog, PeriodStatus};

/// Gap in whole days beyond which a period entry starts a new cycle rather
/// than continuing the current one. Typical bleeding rarely exceeds a week.
pub const CYCLE_GAP_DAYS: i64 = 7;

/// Bounds of a typical average cycle length in days
const TYPICAL_CYCLE_MIN_DAYS: i64 = 21;
const TYPICAL_CYCLE_MAX_DAYS: i64 = 35;

/// Derived cycle statistics, recomputed from scratch on every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStats {
    /// First logged day of the most recent cycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cycle_start: Option<NaiveDate>,
    /// Mean gap between adjacent cycle starts, rounded half-up; absent with
    /// fewer than two observed cycles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_cycle_length_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_predicted_start: Option<NaiveDate>,
    pub total_cycles: usize,
}

impl CycleStats {
    fn empty() -> Self {
        Self {
            last_cycle_start: None,
            average_cycle_length_days: None,
            next_predicted_start: None,
            total_cycles: 0,
        }
    }
}

/// How an average cycle length compares to the typical 21-35 day range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleLengthCategory {
    ShorterThanTypical,
    Typical,
    LongerThanTypical,
}

/// Group period entries into cycles and derive statistics.
///
/// Accepts the logs in any order. One data point is not enough to
/// extrapolate from, so the average and the prediction stay absent until a
/// second cycle is observed.
pub fn compute_cycle_stats(logs: &[DailyLog]) -> CycleStats {
    let mut period_dates: Vec<NaiveDate> = logs
        .iter()
        .filter(|l| l.period_status == PeriodStatus::Period)
        .map(|l| l.date)
        .collect();

    if period_dates.is_empty() {
        return CycleStats::empty();
    }

    period_dates.sort();

    // The first entry always opens a cycle; a later entry opens a new one
    // only when its gap from the current anchor exceeds the threshold.
    // Duplicate dates have gap 0 and collapse into the current cycle.
    let mut cycle_starts: Vec<NaiveDate> = Vec::new();
    let mut anchor: Option<NaiveDate> = None;
    for date in period_dates {
        match anchor {
            Some(start) if (date - start).num_days() <= CYCLE_GAP_DAYS => {}
            _ => {
                anchor = Some(date);
                cycle_starts.push(date);
            }
        }
    }

    let total_cycles = cycle_starts.len();
    let last_cycle_start = cycle_starts.last().copied();

    let average_cycle_length_days = if total_cycles >= 2 {
        let lengths: Vec<i64> = cycle_starts
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_days())
            .collect();
        let mean = lengths.iter().sum::<i64>() as f64 / lengths.len() as f64;
        Some(mean.round() as i64)
    } else {
        None
    };

    let next_predicted_start = match (last_cycle_start, average_cycle_length_days) {
        (Some(last), Some(avg)) => Some(last + Duration::days(avg)),
        _ => None,
    };

    tracing::debug!(
        total_cycles,
        average_cycle_length_days,
        "cycle statistics computed"
    );

    CycleStats {
        last_cycle_start,
        average_cycle_length_days,
        next_predicted_start,
        total_cycles,
    }
}

/// Whole days until the predicted next cycle start.
///
/// Negative when overdue, zero when due today. Absent without a prediction.
pub fn days_until(stats: &CycleStats, today: NaiveDate) -> Option<i64> {
    stats.next_predicted_start.map(|d| (d - today).num_days())
}

/// Whole days since the most recent cycle started
pub fn days_since(stats: &CycleStats, today: NaiveDate) -> Option<i64> {
    stats.last_cycle_start.map(|d| (today - d).num_days())
}

/// Classify the average cycle length against the typical 21-35 day range
pub fn length_category(stats: &CycleStats) -> Option<CycleLengthCategory> {
    stats.average_cycle_length_days.map(|len| {
        if len < TYPICAL_CYCLE_MIN_DAYS {
            CycleLengthCategory::ShorterThanTypical
        } else if len > TYPICAL_CYCLE_MAX_DAYS {
            CycleLengthCategory::LongerThanTypical
        } else {
            CycleLengthCategory::Typical
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use uuid::Uuid;

    const BASE: &str = "2026-01-01";

    /// A period-status log `day_offset` days after BASE (offset 0 = day 1)
    fn period_log(day_offset: i64) -> DailyLog {
        log_with_status(day_offset, PeriodStatus::Period)
    }

    fn log_with_status(day_offset: i64, status: PeriodStatus) -> DailyLog {
        DailyLog {
            id: Uuid::new_v4(),
            date: BASE.parse::<NaiveDate>().unwrap() + Duration::days(day_offset),
            period_status: status,
            mood: 3,
            acne: 0,
            hairfall: 0,
            cravings: 0,
            pain_level: 0,
            sleep_hours: None,
            weight: None,
            notes: None,
        }
    }

    #[test]
    fn no_period_entries_yields_empty_stats() {
        let logs = vec![
            log_with_status(0, PeriodStatus::None),
            log_with_status(1, PeriodStatus::Spotting),
        ];
        let stats = compute_cycle_stats(&logs);
        assert_eq!(stats.total_cycles, 0);
        assert_eq!(stats.last_cycle_start, None);
        assert_eq!(stats.average_cycle_length_days, None);
        assert_eq!(stats.next_predicted_start, None);
    }

    #[test]
    fn groups_entries_into_cycles_and_predicts() {
        // Period logged on days 1, 2, 30, 31, 60: three cycles starting on
        // days 1, 30 and 60, averaging (29 + 30) / 2 = 29.5 -> 30 days.
        let logs: Vec<DailyLog> = [0, 1, 29, 30, 59].map(period_log).to_vec();
        let stats = compute_cycle_stats(&logs);

        assert_eq!(stats.total_cycles, 3);
        assert_eq!(stats.average_cycle_length_days, Some(30));
        assert_eq!(
            stats.last_cycle_start,
            Some("2026-03-01".parse().unwrap())
        );
        // day 60 + 30 days = day 90
        assert_eq!(
            stats.next_predicted_start,
            Some("2026-03-31".parse().unwrap())
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let sorted: Vec<DailyLog> = [0, 1, 29, 30, 59].map(period_log).to_vec();
        let shuffled: Vec<DailyLog> = [59, 0, 30, 1, 29].map(period_log).to_vec();
        assert_eq!(compute_cycle_stats(&sorted), compute_cycle_stats(&shuffled));
    }

    #[test]
    fn single_cycle_has_no_prediction() {
        let logs: Vec<DailyLog> = [0, 1, 2, 3].map(period_log).to_vec();
        let stats = compute_cycle_stats(&logs);

        assert_eq!(stats.total_cycles, 1);
        assert_eq!(stats.last_cycle_start, Some(BASE.parse().unwrap()));
        assert_eq!(stats.average_cycle_length_days, None);
        assert_eq!(stats.next_predicted_start, None);
    }

    #[rstest]
    // A gap of exactly 7 days continues the current cycle
    #[case(7, 1)]
    // 8 days starts a new one
    #[case(8, 2)]
    fn gap_threshold_boundary(#[case] gap: i64, #[case] expected_cycles: usize) {
        let logs = vec![period_log(0), period_log(gap)];
        assert_eq!(compute_cycle_stats(&logs).total_cycles, expected_cycles);
    }

    #[test]
    fn duplicate_dates_collapse_to_one_cycle_start() {
        let logs = vec![period_log(0), period_log(0), period_log(1)];
        let stats = compute_cycle_stats(&logs);
        assert_eq!(stats.total_cycles, 1);
    }

    #[test]
    fn continuation_does_not_move_the_anchor() {
        // Days 1, 7, 13: each consecutive gap is 6, but day 13 is 12 days
        // past the day-1 anchor, so it opens a second cycle.
        let logs = vec![period_log(0), period_log(6), period_log(12)];
        assert_eq!(compute_cycle_stats(&logs).total_cycles, 2);
    }

    #[test]
    fn days_until_and_since_report_signed_differences() {
        let logs: Vec<DailyLog> = [0, 28].map(period_log).to_vec();
        let stats = compute_cycle_stats(&logs);
        // Two cycles 28 days apart: next predicted on day 57 (2026-02-26).
        assert_eq!(
            stats.next_predicted_start,
            Some("2026-02-26".parse().unwrap())
        );

        let before: NaiveDate = "2026-02-20".parse().unwrap();
        let due: NaiveDate = "2026-02-26".parse().unwrap();
        let after: NaiveDate = "2026-03-03".parse().unwrap();

        assert_eq!(days_until(&stats, before), Some(6));
        assert_eq!(days_until(&stats, due), Some(0));
        assert_eq!(days_until(&stats, after), Some(-5));
        assert_eq!(days_since(&stats, after), Some(33));
    }

    #[test]
    fn days_helpers_are_absent_without_data() {
        let stats = compute_cycle_stats(&[]);
        let today: NaiveDate = BASE.parse().unwrap();
        assert_eq!(days_until(&stats, today), None);
        assert_eq!(days_since(&stats, today), None);
    }

    #[rstest]
    #[case(20, CycleLengthCategory::ShorterThanTypical)]
    #[case(21, CycleLengthCategory::Typical)]
    #[case(28, CycleLengthCategory::Typical)]
    #[case(35, CycleLengthCategory::Typical)]
    #[case(36, CycleLengthCategory::LongerThanTypical)]
    fn length_category_boundaries(#[case] days: i64, #[case] expected: CycleLengthCategory) {
        let logs = vec![period_log(0), period_log(days)];
        let stats = compute_cycle_stats(&logs);
        assert_eq!(stats.average_cycle_length_days, Some(days));
        assert_eq!(length_category(&stats), Some(expected));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Cycle starts never outnumber period entries
        #[test]
        fn prop_cycle_count_bounded_by_entries(
            offsets in prop::collection::vec(0i64..400, 0..40)
        ) {
            let logs: Vec<DailyLog> = offsets.iter().map(|&o| period_log(o)).collect();
            let stats = compute_cycle_stats(&logs);
            prop_assert!(stats.total_cycles <= logs.len());
        }

        /// `days_until` is negative exactly when the prediction is strictly
        /// before today, and its magnitude is the day difference
        #[test]
        fn prop_days_until_sign_matches_date_order(
            first in 0i64..60,
            gap in 8i64..60,
            today_offset in 0i64..200
        ) {
            let logs = vec![period_log(first), period_log(first + gap)];
            let stats = compute_cycle_stats(&logs);
            let predicted = stats.next_predicted_start.unwrap();
            let today = BASE.parse::<NaiveDate>().unwrap() + Duration::days(today_offset);

            let days = days_until(&stats, today).unwrap();
            prop_assert_eq!(days < 0, predicted < today);
            prop_assert_eq!(days.abs(), (predicted - today).num_days().abs());
        }
    }
}
