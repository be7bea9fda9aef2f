//! Bounded in-memory log buffer

use chrono::{DateTime, Duration, Utc};
use nullaudit_domain::{LogEntry, LogQuery, LogType};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

/// Default buffer capacity
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Result of a log query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogQueryResult {
    /// Matching entries, newest first
    pub logs: Vec<LogEntry>,
    /// Entries in the buffer before filtering
    pub total: usize,
    /// Entries returned
    pub filtered: usize,
}

/// Aggregate numbers over the buffer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    /// Entries in the buffer
    pub total: usize,
    /// Entries per type
    pub by_type: BTreeMap<LogType, usize>,
    /// Entries per component
    pub by_component: BTreeMap<String, usize>,
    /// Entries stamped within the last hour
    pub last_hour: usize,
}

/// FIFO ring buffer of log entries
///
/// Holds at most `capacity` entries; appending past that evicts the oldest
/// inserted entries first, regardless of their timestamps.
#[derive(Debug, Clone)]
pub struct LogStore {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogStore {
    /// Create an empty buffer holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Insert at the end, evicting from the front past capacity
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Append several entries in order
    pub fn extend<I: IntoIterator<Item = LogEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.append(entry);
        }
    }

    /// Filter, sort newest first and truncate to the query limit
    ///
    /// Entries with equal timestamps come out newest-inserted first.
    pub fn query(&self, query: &LogQuery) -> LogQueryResult {
        let mut logs: Vec<LogEntry> = self
            .entries
            .iter()
            .rev()
            .filter(|entry| query.matches(entry))
            .cloned()
            .collect();

        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        logs.truncate(query.effective_limit());

        LogQueryResult {
            total: self.entries.len(),
            filtered: logs.len(),
            logs,
        }
    }

    /// Aggregate counts, with "last hour" measured back from `now`
    pub fn stats(&self, now: DateTime<Utc>) -> LogStats {
        let cutoff = now - Duration::hours(1);
        let mut by_type = BTreeMap::new();
        let mut by_component = BTreeMap::new();
        let mut last_hour = 0;

        for entry in &self.entries {
            *by_type.entry(entry.log_type).or_insert(0) += 1;
            *by_component.entry(entry.component.clone()).or_insert(0) += 1;
            if entry.timestamp >= cutoff {
                last_hour += 1;
            }
        }

        LogStats {
            total: self.entries.len(),
            by_type,
            by_component,
            last_hour,
        }
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(at: DateTime<Utc>, log_type: LogType, component: &str, message: &str) -> LogEntry {
        LogEntry::new(at, log_type, component, message)
    }

    #[test]
    fn test_eviction_is_fifo_by_insertion() {
        let now = Utc::now();
        let mut store = LogStore::new(3);
        // Insert out of timestamp order: eviction must still follow insertion.
        store.append(entry_at(now, LogType::Info, "a", "first"));
        store.append(entry_at(now - Duration::hours(2), LogType::Info, "a", "second"));
        store.append(entry_at(now, LogType::Info, "a", "third"));
        store.append(entry_at(now, LogType::Info, "a", "fourth"));

        let messages: Vec<_> = store.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "third", "fourth"]);
    }

    #[test]
    fn test_query_sorts_by_timestamp_not_insertion() {
        let now = Utc::now();
        let mut store = LogStore::default();
        store.append(entry_at(now - Duration::seconds(10), LogType::Info, "a", "middle"));
        store.append(entry_at(now - Duration::seconds(20), LogType::Info, "a", "oldest"));
        store.append(entry_at(now, LogType::Info, "a", "newest"));

        let result = store.query(&LogQuery::default());
        let messages: Vec<_> = result.logs.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_equal_timestamps_newest_inserted_first() {
        let now = Utc::now();
        let mut store = LogStore::default();
        store.append(entry_at(now, LogType::Info, "a", "one"));
        store.append(entry_at(now, LogType::Info, "a", "two"));

        let result = store.query(&LogQuery::default());
        assert_eq!(result.logs[0].message, "two");
        assert_eq!(result.logs[1].message, "one");
    }

    #[test]
    fn test_query_counts() {
        let now = Utc::now();
        let mut store = LogStore::default();
        for i in 0..6 {
            let log_type = if i % 2 == 0 { LogType::Error } else { LogType::Info };
            store.append(entry_at(now - Duration::seconds(i), log_type, "scanner", "x"));
        }

        let query = LogQuery {
            log_type: Some("error".to_string()),
            limit: Some(2),
            ..Default::default()
        };
        let result = store.query(&query);
        assert_eq!(result.total, 6);
        assert_eq!(result.filtered, 2);
        assert!(result.logs.iter().all(|e| e.log_type == LogType::Error));
    }

    #[test]
    fn test_stats_last_hour() {
        let now = Utc::now();
        let mut store = LogStore::default();
        store.append(entry_at(now - Duration::minutes(5), LogType::Info, "scanner", "recent"));
        store.append(entry_at(now - Duration::minutes(59), LogType::Warning, "hitl", "edge"));
        store.append(entry_at(now - Duration::hours(3), LogType::Info, "scanner", "old"));

        let stats = store.stats(now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.last_hour, 2);
        assert_eq!(stats.by_type[&LogType::Info], 2);
        assert_eq!(stats.by_component["scanner"], 2);
        assert_eq!(stats.by_component["hitl"], 1);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut store = LogStore::new(0);
        store.append(entry_at(Utc::now(), LogType::Debug, "a", "kept"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.capacity(), 1);
    }
}
