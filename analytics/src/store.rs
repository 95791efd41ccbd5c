//! Storage collaborator interface
//!
//! The engine is written against this read-only seam; the analyzers
//! themselves take fully materialized collections, so callers fetch a window
//! here and hand the result over. The engine never writes through this
//! interface.

use std::cmp::Reverse;

use chrono::NaiveDate;

use crate::models::DailyLog;

/// Read-only query interface exposed by the log store
pub trait LogStore {
    /// All logs with `start <= date <= end`, ascending by date
    fn logs_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<DailyLog>;

    /// The `limit` most recent logs, descending by date
    fn recent_logs(&self, limit: usize) -> Vec<DailyLog>;
}

/// Vec-backed store for tests and embedding callers
#[derive(Debug, Clone, Default)]
pub struct InMemoryLogStore {
    logs: Vec<DailyLog>,
}

impl InMemoryLogStore {
    pub fn new(logs: Vec<DailyLog>) -> Self {
        Self { logs }
    }

    pub fn push(&mut self, log: DailyLog) {
        self.logs.push(log);
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

impl LogStore for InMemoryLogStore {
    fn logs_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<DailyLog> {
        let mut out: Vec<DailyLog> = self
            .logs
            .iter()
            .filter(|l| l.date >= start && l.date <= end)
            .cloned()
            .collect();
        out.sort_by_key(|l| l.date);
        out
    }

    fn recent_logs(&self, limit: usize) -> Vec<DailyLog> {
        let mut out = self.logs.clone();
        out.sort_by_key(|l| Reverse(l.date));
        out.truncate(limit);
        out
    }
}
