//! Log entries and log query criteria

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity/category of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    /// Routine progress
    Info,
    /// A step finished successfully
    Success,
    /// Something looks off
    Warning,
    /// A step failed
    Error,
    /// Diagnostic detail
    Debug,
}

impl LogType {
    /// All log types
    pub const ALL: [LogType; 5] = [
        LogType::Info,
        LogType::Success,
        LogType::Warning,
        LogType::Error,
        LogType::Debug,
    ];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Info => "info",
            LogType::Success => "success",
            LogType::Warning => "warning",
            LogType::Error => "error",
            LogType::Debug => "debug",
        }
    }
}

/// A single log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Severity/category
    #[serde(rename = "type")]
    pub log_type: LogType,
    /// Source label (e.g. "scanner", "hitl")
    pub component: String,
    /// Human-readable text
    pub message: String,
}

impl LogEntry {
    /// Create a log entry
    pub fn new(
        timestamp: DateTime<Utc>,
        log_type: LogType,
        component: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            log_type,
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Default number of entries a query returns
pub const DEFAULT_QUERY_LIMIT: usize = 500;

/// Filter criteria for log queries
///
/// All filters are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogQuery {
    /// Case-insensitive exact match on the type name
    #[serde(rename = "type")]
    pub log_type: Option<String>,

    /// Case-insensitive substring of the component
    pub component: Option<String>,

    /// Case-insensitive substring of the message or component
    pub search: Option<String>,

    /// Inclusive lower bound, RFC 3339. Unparseable values mean no bound.
    pub since: Option<String>,

    /// Maximum entries returned (default 500)
    pub limit: Option<usize>,
}

impl LogQuery {
    /// Parsed `since` bound; `None` when absent or unparseable
    pub fn since_bound(&self) -> Option<DateTime<Utc>> {
        self.since
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Effective result limit
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_QUERY_LIMIT)
    }

    /// Whether an entry passes every filter
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(wanted) = self.log_type.as_deref() {
            if !entry.log_type.as_str().eq_ignore_ascii_case(wanted.trim()) {
                return false;
            }
        }

        if let Some(component) = self.component.as_deref() {
            if !contains_ignore_case(&entry.component, component) {
                return false;
            }
        }

        if let Some(search) = self.search.as_deref() {
            if !contains_ignore_case(&entry.message, search)
                && !contains_ignore_case(&entry.component, search)
            {
                return false;
            }
        }

        if let Some(since) = self.since_bound() {
            if entry.timestamp < since {
                return false;
            }
        }

        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
