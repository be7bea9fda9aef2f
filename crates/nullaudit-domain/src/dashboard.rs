//! Dashboard aggregates, agent status, attestations and scan reports
//!
//! These are read-only views produced by a [`DataSource`](crate::traits::DataSource)
//! or by the keyword scanner. None of them are stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::task::Priority;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Scans run since start-up
    pub total_scans: u64,
    /// Findings reported across all scans
    pub vulnerabilities_found: u64,
    /// Findings rated critical
    pub critical_findings: u64,
    /// Attestations recorded
    pub attestations: u64,
    /// Mean scan duration in seconds
    pub average_scan_seconds: f64,
    /// Agents currently running
    pub active_agents: u32,
    /// Review tasks waiting for a human
    pub pending_reviews: u64,
    /// Service uptime percentage
    pub uptime_percent: f64,
    /// When the snapshot was taken
    pub generated_at: DateTime<Utc>,
}

/// Run state of an audit agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    /// Processing work
    Active,
    /// Waiting for work
    Idle,
    /// Last run failed
    Error,
}

/// Status of one audit agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatus {
    /// Agent identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// What the agent does (e.g. "static-analysis")
    pub kind: String,
    /// Run state
    pub status: AgentState,
    /// Tasks finished since start-up
    pub tasks_completed: u64,
    /// Last heartbeat
    pub last_heartbeat: DateTime<Utc>,
}

/// Findings in one hour of the breakdown window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// Start of the hour
    pub hour: DateTime<Utc>,
    /// Findings raised in that hour
    pub count: u64,
}

/// Findings over a trailing window of hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerabilityBreakdown {
    /// Window length in hours
    pub hours: u32,
    /// Total findings in the window
    pub total: u64,
    /// Findings per severity
    pub by_severity: BTreeMap<Priority, u64>,
    /// Findings per category
    pub by_category: BTreeMap<String, u64>,
    /// One point per hour, oldest first
    pub timeline: Vec<TimelinePoint>,
}

impl VulnerabilityBreakdown {
    /// Recompute `total` from the timeline
    pub fn timeline_total(&self) -> u64 {
        self.timeline.iter().map(|p| p.count).sum()
    }
}

/// Confirmation state of a synthetic attestation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationStatus {
    /// Included in a block
    Confirmed,
    /// Submitted, not yet included
    Pending,
}

/// A synthetic on-chain attestation record
///
/// The hashes are random hex strings; nothing is ever submitted anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    /// Identifier
    pub id: String,
    /// `0x` + 64 hex characters
    pub tx_hash: String,
    /// Block the record claims to be in
    pub block_number: u64,
    /// Network label
    pub network: String,
    /// Audited contract address, `0x` + 40 hex characters
    pub contract_address: String,
    /// Digest of the audit report, `0x` + 64 hex characters
    pub report_hash: String,
    /// Confirmation state
    pub status: AttestationStatus,
    /// Submission time
    pub timestamp: DateTime<Utc>,
}

/// One keyword hit in scanned source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFinding {
    /// Detector name
    pub detector: String,
    /// Finding title
    pub title: String,
    /// Severity
    pub severity: Priority,
    /// 1-based line of the first match
    pub line: u32,
    /// Keyword that triggered the detector
    pub matched: String,
}

/// Result of scanning a piece of source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Lines scanned
    pub lines_scanned: usize,
    /// Findings, in source order
    pub findings: Vec<ScanFinding>,
    /// Findings per severity
    pub summary: BTreeMap<Priority, usize>,
}
