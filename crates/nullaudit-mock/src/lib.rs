//! NullAudit Mock Data Layer
//!
//! Implementations of the [`DataSource`] trait from `nullaudit-domain`, plus
//! the keyword scanner behind the scan endpoint.
//!
//! # Sources
//!
//! - [`RandomSource`]: randomized records for the running service
//! - [`FixtureSource`]: deterministic records for tests
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, Utc};
//! use nullaudit_mock::{seed_logs, FixtureSource};
//!
//! let now = Utc::now();
//! let logs = seed_logs(&FixtureSource::new(), 4, Duration::seconds(15), now);
//! assert_eq!(logs.len(), 4);
//! assert_eq!(logs[3].timestamp, now);
//! assert_eq!(logs[0].timestamp, now - Duration::seconds(45));
//! ```

#![warn(missing_docs)]

mod catalog;
mod fixture;
mod random;
mod records;
mod scan;

use chrono::{DateTime, Duration, Utc};
use nullaudit_domain::{DataSource, LogEntry};

pub use fixture::FixtureSource;
pub use random::{random_hex, RandomSource};
pub use scan::scan_source;

/// `count` log entries spaced `spacing` apart, oldest first, the last at `now`
pub fn seed_logs(
    source: &dyn DataSource,
    count: usize,
    spacing: Duration,
    now: DateTime<Utc>,
) -> Vec<LogEntry> {
    (0..count)
        .map(|i| {
            let steps_back = (count - 1 - i) as i32;
            source.log_entry(now - spacing * steps_back)
        })
        .collect()
}
