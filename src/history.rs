//! Query history.
//!
//! Every executed statement leaves a summary entry, newest first, in a
//! bounded deque. Entries keep the outcome envelope minus the row data, so
//! the history stays small no matter what the queries returned.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::QueryResult;

/// How many entries the history keeps.
pub const HISTORY_CAPACITY: usize = 50;
/// Longer query texts are cut at this many characters.
pub const MAX_QUERY_LEN: usize = 1000;
/// At most this many result column names are kept per entry.
pub const MAX_SUMMARY_COLUMNS: usize = 10;

/// One executed statement's summary.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub query: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub affected_rows: usize,
    pub data_length: usize,
    pub columns: Vec<String>,
    #[serde(rename = "executionTime")]
    pub execution_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Bounded, newest-first log of executed statements.
#[derive(Clone, Debug)]
pub struct QueryHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    next_id: u64,
}

impl Default for QueryHistory {
    fn default() -> Self {
        QueryHistory::new()
    }
}

impl QueryHistory {
    pub fn new() -> Self {
        QueryHistory::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        QueryHistory {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Summarize a result and push it to the front, evicting the oldest
    /// entry once the capacity is reached.
    pub fn record(&mut self, result: &QueryResult) {
        let query = if result.query.chars().count() > MAX_QUERY_LEN {
            let cut: String = result.query.chars().take(MAX_QUERY_LEN).collect();
            format!("{cut}...")
        } else {
            result.query.clone()
        };

        let entry = HistoryEntry {
            id: self.next_id,
            query,
            success: result.success,
            message: result.message.clone(),
            error: result.error.clone(),
            affected_rows: result.affected_rows,
            data_length: result.data.len(),
            columns: result
                .columns
                .iter()
                .take(MAX_SUMMARY_COLUMNS)
                .cloned()
                .collect(),
            execution_time_ms: result.execution_time_ms,
            timestamp: result.timestamp,
        };
        self.next_id += 1;

        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
