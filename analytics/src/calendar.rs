//! Calendar month overlay construction
//!
//! Builds the grid the tracker's calendar view renders: leading padding
//! cells align day 1 to its weekday column (weeks run Sunday-first),
//! followed by one cell per day annotated with the matching log, a today
//! marker, and the predicted-period window.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cycle::CycleStats;
use crate::errors::AnalyticsError;
use crate::models::{DailyLog, PeriodStatus};

/// Radius in whole days around the predicted start that counts as the
/// predicted window (strictly less than, so the window spans 13 days)
const PREDICTED_WINDOW_DAYS: i64 = 7;

/// The single annotation a populated day-cell should be rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayHighlight {
    Period,
    Spotting,
    Predicted,
    Logged,
    Plain,
}

/// One populated day in the overlay grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDayCell {
    pub day: u32,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<DailyLog>,
    pub is_today: bool,
    pub is_predicted_window: bool,
}

impl CalendarDayCell {
    /// Resolve overlapping annotations by precedence:
    /// logged period > logged spotting > predicted window > logged > plain
    pub fn highlight(&self) -> DayHighlight {
        match self.log.as_ref().map(|l| l.period_status) {
            Some(PeriodStatus::Period) => DayHighlight::Period,
            Some(PeriodStatus::Spotting) => DayHighlight::Spotting,
            _ if self.is_predicted_window => DayHighlight::Predicted,
            Some(PeriodStatus::None) => DayHighlight::Logged,
            None => DayHighlight::Plain,
        }
    }
}

/// One calendar month as an ordered cell sequence; `None` cells are the
/// leading padding before the month's first weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarOverlay {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<Option<CalendarDayCell>>,
}

/// Build the overlay for one calendar month.
///
/// When duplicate dates slipped past the upstream uniqueness guarantee, the
/// first matching log wins. An out-of-range `month` is a contract violation.
pub fn build_calendar_overlay(
    logs: &[DailyLog],
    year: i32,
    month: u32,
    stats: &CycleStats,
    today: NaiveDate,
) -> Result<CalendarOverlay, AnalyticsError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AnalyticsError::InvalidInput(format!("invalid calendar month: {year}-{month:02}"))
    })?;
    let days_in_month = ((first + Months::new(1)) - first).num_days() as u32;
    let leading = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<CalendarDayCell>> =
        Vec::with_capacity(leading + days_in_month as usize);
    cells.resize(leading, None);

    for day in 1..=days_in_month {
        let date = first + Duration::days(i64::from(day - 1));
        let log = logs.iter().find(|l| l.date == date).cloned();
        let is_predicted_window = stats
            .next_predicted_start
            .map(|predicted| (date - predicted).num_days().abs() < PREDICTED_WINDOW_DAYS)
            .unwrap_or(false);

        cells.push(Some(CalendarDayCell {
            day,
            date,
            log,
            is_today: date == today,
            is_predicted_window,
        }));
    }

    Ok(CalendarOverlay { year, month, cells })
}
