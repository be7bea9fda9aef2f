//! Trait definitions for external interactions
//!
//! Stores never generate data themselves; everything synthetic comes through
//! a [`DataSource`] so tests can swap in deterministic fixtures.

use chrono::{DateTime, Utc};

use crate::dashboard::{AgentStatus, Attestation, DashboardStats, VulnerabilityBreakdown};
use crate::log::LogEntry;
use crate::task::ReviewTask;

/// Source of mock domain records
///
/// Implemented by the mock layer (nullaudit-mock). Each call is independent;
/// implementations may keep counters but never depend on store contents.
pub trait DataSource: Send + Sync {
    /// A fresh pending review task created at `now`
    fn review_task(&self, now: DateTime<Utc>) -> ReviewTask;

    /// A log entry stamped `at`
    fn log_entry(&self, at: DateTime<Utc>) -> LogEntry;

    /// Headline dashboard numbers
    fn dashboard_stats(&self, now: DateTime<Utc>) -> DashboardStats;

    /// Status of every audit agent
    fn agent_statuses(&self, now: DateTime<Utc>) -> Vec<AgentStatus>;

    /// Findings over the trailing `hours` hours
    fn vulnerability_breakdown(&self, hours: u32, now: DateTime<Utc>) -> VulnerabilityBreakdown;

    /// One attestation record
    fn attestation(&self, now: DateTime<Utc>) -> Attestation;
}
