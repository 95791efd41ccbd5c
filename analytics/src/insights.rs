//! Window aggregation, classification, and rule-based insight generation
//!
//! `compute_summary` turns a caller-chosen window of logs into aggregate
//! statistics, then runs two fixed rule tables over the finished aggregates:
//! one producing free-text recommendations, one producing severity-tagged
//! health alerts. Every rule is an independent predicate — all of them are
//! evaluated, and the output lists follow declaration order.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{DailyLog, PeriodStatus};

/// Classification cut points for one metric; `high` wins over `medium`
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub high: f64,
    pub medium: f64,
}

/// Mood runs on a 1-5 scale
pub const MOOD_THRESHOLDS: Thresholds = Thresholds {
    high: 4.0,
    medium: 3.0,
};
/// Sleep in hours per night
pub const SLEEP_THRESHOLDS: Thresholds = Thresholds {
    high: 8.0,
    medium: 7.0,
};
/// Pain runs on a 0-5 scale
pub const PAIN_THRESHOLDS: Thresholds = Thresholds {
    high: 3.0,
    medium: 2.0,
};

/// Cap on the number of recommendations returned in one summary
const MAX_RECOMMENDATIONS: usize = 6;

/// More period days than this in one window counts as irregular
const IRREGULAR_PERIOD_DAYS: usize = 10;

/// Qualitative bucket for a numeric aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightLevel {
    Low,
    Medium,
    High,
}

/// Bucket a value against fixed per-metric thresholds
pub fn classify(value: f64, thresholds: Thresholds) -> InsightLevel {
    if value >= thresholds.high {
        InsightLevel::High
    } else if value >= thresholds.medium {
        InsightLevel::Medium
    } else {
        InsightLevel::Low
    }
}

/// Severity attached to a generated health alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Needs medical attention
    High,
    /// Worth addressing soon
    Medium,
    /// Informational
    Info,
    /// Encouragement rather than a warning
    Positive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthAlert {
    pub severity: AlertSeverity,
    pub message: String,
}

/// Entry counts per period status over the summary window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub none: usize,
    pub spotting: usize,
    pub period: usize,
}

/// Aggregate view over a window of logs, plus fixed trailing sub-windows
///
/// Numeric aggregates are rounded to two decimal places for display
/// stability. A value of `0` doubles as "no data" for the averages — a
/// deliberate simplification the presentation layer must expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub total_logs: usize,
    pub avg_mood: f64,
    pub avg_sleep: f64,
    pub avg_pain: f64,
    /// Period-status entry count over the window
    pub period_frequency: usize,
    pub status_distribution: StatusDistribution,
    /// Trailing 7-day sub-window, anchored at `today`
    pub logs_this_week: usize,
    pub avg_mood_week: f64,
    pub avg_sleep_week: f64,
    /// Trailing 30-day sub-window, anchored at `today`
    pub logs_this_month: usize,
    pub period_days_month: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_log_date: Option<NaiveDate>,
    pub recommendations: Vec<String>,
    pub alerts: Vec<HealthAlert>,
}

impl InsightSummary {
    pub fn mood_level(&self) -> InsightLevel {
        classify(self.avg_mood, MOOD_THRESHOLDS)
    }

    pub fn sleep_level(&self) -> InsightLevel {
        classify(self.avg_sleep, SLEEP_THRESHOLDS)
    }

    pub fn pain_level(&self) -> InsightLevel {
        classify(self.avg_pain, PAIN_THRESHOLDS)
    }

    fn empty() -> Self {
        Self {
            total_logs: 0,
            avg_mood: 0.0,
            avg_sleep: 0.0,
            avg_pain: 0.0,
            period_frequency: 0,
            status_distribution: StatusDistribution::default(),
            logs_this_week: 0,
            avg_mood_week: 0.0,
            avg_sleep_week: 0.0,
            logs_this_month: 0,
            period_days_month: 0,
            last_log_date: None,
            recommendations: Vec::new(),
            alerts: Vec::new(),
        }
    }
}

struct AlertRule {
    applies: fn(&InsightSummary) -> bool,
    severity: AlertSeverity,
    message: &'static str,
}

/// All alert predicates are evaluated; declaration order is output order.
const ALERT_RULES: &[AlertRule] = &[
    AlertRule {
        applies: |s| s.avg_pain > 3.0,
        severity: AlertSeverity::High,
        message: "High pain levels: consider consulting your healthcare provider if pain persists",
    },
    AlertRule {
        applies: |s| s.avg_sleep < 6.0,
        severity: AlertSeverity::Medium,
        message: "Insufficient sleep: aim for 7-9 hours per night for better PCOS management",
    },
    AlertRule {
        applies: |s| s.avg_mood < 2.5,
        severity: AlertSeverity::Medium,
        message: "Low mood pattern: consider speaking with a mental health professional",
    },
    AlertRule {
        applies: |s| s.period_frequency == 0 && s.total_logs > 30,
        severity: AlertSeverity::Info,
        message: "No period recorded this window: this can be normal with PCOS, but consider consulting your healthcare provider",
    },
    AlertRule {
        applies: |s| s.avg_pain < 1.0 && s.avg_mood > 4.0 && s.avg_sleep > 7.0,
        severity: AlertSeverity::Positive,
        message: "Your symptoms are well-managed: keep up the good work with your current routine",
    },
];

struct RecommendationRule {
    applies: fn(&InsightSummary) -> bool,
    messages: &'static [&'static str],
}

/// Evaluated in declaration order; the combined output is capped at
/// [`MAX_RECOMMENDATIONS`] items.
const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        applies: |s| s.avg_mood < 3.0,
        messages: &[
            "Consider stress management techniques like meditation or yoga to improve mood",
            "Regular exercise can help boost mood and manage PCOS symptoms",
        ],
    },
    RecommendationRule {
        applies: |s| s.avg_sleep < 7.0,
        messages: &[
            "Aim for 7-9 hours of sleep per night for better hormone regulation",
            "Create a consistent bedtime routine to improve sleep quality",
        ],
    },
    RecommendationRule {
        applies: |s| s.avg_sleep > 9.0,
        messages: &[
            "Excessive sleep might indicate other issues - consider consulting a healthcare provider",
        ],
    },
    RecommendationRule {
        applies: |s| s.avg_pain > 3.0,
        messages: &[
            "High pain levels may require medical attention - consult your healthcare provider",
            "Heat therapy and gentle exercise may help manage pain",
        ],
    },
    RecommendationRule {
        applies: |s| s.period_frequency == 0 || s.period_frequency > IRREGULAR_PERIOD_DAYS,
        messages: &[
            "Irregular periods are common with PCOS - track patterns and discuss with your doctor",
            "Maintaining a healthy weight can help regulate menstrual cycles",
        ],
    },
    RecommendationRule {
        applies: |_| true,
        messages: &[
            "Follow a balanced, low-glycemic diet to help manage insulin resistance",
            "Regular physical activity can improve PCOS symptoms and overall health",
            "Consider supplements like inositol or vitamin D (consult your doctor first)",
            "Stay hydrated and limit processed foods and added sugars",
        ],
    },
];

/// Compute the aggregate summary for a window of logs.
///
/// `window_logs` drives the headline aggregates; the trailing 7- and 30-day
/// sub-windows are re-filtered from `all_logs` anchored at `today`, so they
/// can disagree with the headline figures when the caller passed a
/// different window. An empty window short-circuits to the empty-state
/// summary with no rule evaluation.
pub fn compute_summary(
    window_logs: &[DailyLog],
    all_logs: &[DailyLog],
    today: NaiveDate,
) -> InsightSummary {
    if window_logs.is_empty() {
        return InsightSummary::empty();
    }

    let week: Vec<&DailyLog> = trailing_window(all_logs, today, 7);
    let month: Vec<&DailyLog> = trailing_window(all_logs, today, 30);

    let mut summary = InsightSummary {
        total_logs: window_logs.len(),
        avg_mood: round2(mean(window_logs.iter().map(|l| f64::from(l.mood)))),
        avg_sleep: round2(mean(window_logs.iter().filter_map(|l| l.sleep_hours))),
        avg_pain: round2(mean(window_logs.iter().map(|l| f64::from(l.pain_level)))),
        period_frequency: count_status(window_logs.iter(), PeriodStatus::Period),
        status_distribution: StatusDistribution {
            none: count_status(window_logs.iter(), PeriodStatus::None),
            spotting: count_status(window_logs.iter(), PeriodStatus::Spotting),
            period: count_status(window_logs.iter(), PeriodStatus::Period),
        },
        logs_this_week: week.len(),
        avg_mood_week: round2(mean(week.iter().map(|l| f64::from(l.mood)))),
        avg_sleep_week: round2(mean(week.iter().filter_map(|l| l.sleep_hours))),
        logs_this_month: month.len(),
        period_days_month: count_status(month.iter().copied(), PeriodStatus::Period),
        last_log_date: all_logs.iter().map(|l| l.date).max(),
        recommendations: Vec::new(),
        alerts: Vec::new(),
    };

    summary.recommendations = evaluate_recommendations(&summary);
    summary.alerts = evaluate_alerts(&summary);

    tracing::debug!(
        total_logs = summary.total_logs,
        recommendations = summary.recommendations.len(),
        alerts = summary.alerts.len(),
        "insight summary computed"
    );

    summary
}

fn evaluate_recommendations(summary: &InsightSummary) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for rule in RECOMMENDATION_RULES {
        if (rule.applies)(summary) {
            out.extend(rule.messages.iter().map(|m| (*m).to_string()));
        }
    }
    out.truncate(MAX_RECOMMENDATIONS);
    out
}

fn evaluate_alerts(summary: &InsightSummary) -> Vec<HealthAlert> {
    ALERT_RULES
        .iter()
        .filter(|rule| (rule.applies)(summary))
        .map(|rule| HealthAlert {
            severity: rule.severity,
            message: rule.message.to_string(),
        })
        .collect()
}

/// Arithmetic mean; an empty input averages to 0 by contract, not `None`
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn count_status<'a>(
    logs: impl Iterator<Item = &'a DailyLog>,
    status: PeriodStatus,
) -> usize {
    logs.filter(|l| l.period_status == status).count()
}

/// Logs with `today - days < date <= today`
fn trailing_window(logs: &[DailyLog], today: NaiveDate, days: i64) -> Vec<&DailyLog> {
    let cutoff = today - Duration::days(days);
    logs.iter()
        .filter(|l| l.date > cutoff && l.date <= today)
        .collect()
}
