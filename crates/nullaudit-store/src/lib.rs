//! NullAudit Storage Layer
//!
//! In-memory stores for the HITL review queue and the activity log.
//!
//! # Architecture
//!
//! - [`TaskStore`]: ordered review tasks with forward-only status transitions
//! - [`LogStore`]: bounded FIFO ring buffer with filtering and statistics
//!
//! Both stores are plain owned values mutated through `&mut self`. Sharing
//! between request handlers is the caller's job (the server wraps each one in
//! an `RwLock`). Nothing is persisted; contents live as long as the process.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use nullaudit_domain::{LogEntry, LogQuery, LogType};
//! use nullaudit_store::LogStore;
//!
//! let mut logs = LogStore::new(1000);
//! logs.append(LogEntry::new(Utc::now(), LogType::Info, "scanner", "scan started"));
//!
//! let result = logs.query(&LogQuery::default());
//! assert_eq!(result.filtered, 1);
//! ```

#![warn(missing_docs)]

mod error;
mod log_store;
mod task_store;

pub use error::StoreError;
pub use log_store::{LogQueryResult, LogStats, LogStore, DEFAULT_LOG_CAPACITY};
pub use task_store::{FeedbackOutcome, TaskStats, TaskStore, DEFAULT_AVERAGE_RESPONSE_MS};
