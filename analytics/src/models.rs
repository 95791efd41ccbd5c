//! Data models for the PCOS tracker analytics engine

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AnalyticsError;

/// Menstrual status recorded for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    #[default]
    None,
    Spotting,
    Period,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::None => "none",
            PeriodStatus::Spotting => "spotting",
            PeriodStatus::Period => "period",
        }
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodStatus {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(PeriodStatus::None),
            "spotting" => Ok(PeriodStatus::Spotting),
            "period" => Ok(PeriodStatus::Period),
            other => Err(AnalyticsError::InvalidInput(format!(
                "unknown period status: {other}"
            ))),
        }
    }
}

/// One day of user-submitted observations
///
/// Owned by the storage collaborator; the engine never mutates these.
/// Scores outside their documented ranges are accepted as given — range
/// validation happens at ingestion, before records reach this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: Uuid,
    /// Calendar date of the observation (a day boundary, not an instant)
    pub date: NaiveDate,
    #[serde(default)]
    pub period_status: PeriodStatus,
    /// 1-5 scale
    #[serde(default = "default_mood")]
    pub mood: i32,
    /// 0-5 scale
    #[serde(default)]
    pub acne: i32,
    /// 0-5 scale
    #[serde(default)]
    pub hairfall: i32,
    /// 0-5 scale
    #[serde(default)]
    pub cravings: i32,
    /// 0-5 scale
    #[serde(default)]
    pub pain_level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Free text, not consumed by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_mood() -> i32 {
    3
}

impl DailyLog {
    /// Parse a raw JSON record from the storage collaborator.
    ///
    /// A missing `date`, a wrong field type, or an unknown `period_status`
    /// string is a contract violation and fails loudly.
    pub fn from_json(raw: &str) -> Result<Self, AnalyticsError> {
        serde_json::from_str(raw).map_err(|e| AnalyticsError::InvalidInput(e.to_string()))
    }
}
