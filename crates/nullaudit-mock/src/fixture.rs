//! Deterministic data source for tests

use chrono::{DateTime, Duration, Utc};
use nullaudit_domain::{
    AgentState, AgentStatus, Attestation, AttestationStatus, DashboardStats, DataSource,
    LogEntry, ReviewTask, TaskType, VulnerabilityBreakdown,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::catalog::{AGENTS, FINDINGS, LOG_MESSAGES, NETWORK};
use crate::records::{self, TaskDraw};

/// Deterministic data source
///
/// Walks the catalog in order: the n-th task uses the n-th finding template,
/// the n-th log entry the n-th log message, and so on. Clones share the call
/// counter. Task ids are still unique UUIDv7 ids.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use nullaudit_domain::{DataSource, Priority};
/// use nullaudit_mock::FixtureSource;
///
/// let source = FixtureSource::new();
/// let first = source.review_task(Utc::now());
/// assert_eq!(first.priority, Priority::Critical);
/// assert_eq!(source.call_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    calls: Arc<AtomicU64>,
}

impl FixtureSource {
    /// Create a fixture source starting at the top of the catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records produced so far
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn next(&self) -> usize {
        self.calls.fetch_add(1, Ordering::Relaxed) as usize
    }
}

/// Deterministic hex: `0x` + `bytes * 2` characters derived from `seed`
fn fixture_hex(seed: usize, bytes: usize) -> String {
    let buf: Vec<u8> = (0..bytes).map(|i| (seed.wrapping_mul(31) + i) as u8).collect();
    format!("0x{}", hex::encode(buf))
}

impl DataSource for FixtureSource {
    fn review_task(&self, now: DateTime<Utc>) -> ReviewTask {
        let n = self.next();
        let task_type = if n % 4 == 3 {
            TaskType::Approval
        } else {
            TaskType::Review
        };

        records::review_task(
            TaskDraw {
                template: &FINDINGS[n % FINDINGS.len()],
                contract: n,
                agent: n,
                task_type,
                confidence: 0.9,
                line: 10 + n as u32,
                session: format!("session-{:04}", n),
            },
            now,
        )
    }

    fn log_entry(&self, at: DateTime<Utc>) -> LogEntry {
        let n = self.next();
        let (log_type, component, message) = LOG_MESSAGES[n % LOG_MESSAGES.len()];
        LogEntry::new(at, log_type, component, message)
    }

    fn dashboard_stats(&self, now: DateTime<Utc>) -> DashboardStats {
        self.next();
        DashboardStats {
            total_scans: 1_337,
            vulnerabilities_found: 412,
            critical_findings: 23,
            attestations: 1_024,
            average_scan_seconds: 42.5,
            active_agents: 4,
            pending_reviews: 0,
            uptime_percent: 99.95,
            generated_at: now,
        }
    }

    fn agent_statuses(&self, now: DateTime<Utc>) -> Vec<AgentStatus> {
        self.next();
        (0..AGENTS.len())
            .map(|i| {
                let status = if i == AGENTS.len() - 1 {
                    AgentState::Idle
                } else {
                    AgentState::Active
                };
                records::agent_status(i, status, 100 * (i as u64 + 1), now)
            })
            .collect()
    }

    fn vulnerability_breakdown(&self, hours: u32, now: DateTime<Utc>) -> VulnerabilityBreakdown {
        self.next();
        let per_hour = (0..hours as usize)
            .map(|h| {
                (0..h % 3)
                    .map(|k| {
                        let template = &FINDINGS[(h + k) % FINDINGS.len()];
                        (template.severity, template.finding_type)
                    })
                    .collect()
            })
            .collect();
        records::breakdown(hours, per_hour, now)
    }

    fn attestation(&self, now: DateTime<Utc>) -> Attestation {
        let n = self.next();
        Attestation {
            id: format!("att-{:04}", n),
            tx_hash: fixture_hex(n, 32),
            block_number: 5_000_000 + n as u64,
            network: NETWORK.to_string(),
            contract_address: fixture_hex(n + 1, 20),
            report_hash: fixture_hex(n + 2, 32),
            status: AttestationStatus::Confirmed,
            timestamp: now - Duration::minutes(n as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_cycle_through_catalog() {
        let source = FixtureSource::new();
        let now = Utc::now();
        let tasks: Vec<_> = (0..FINDINGS.len() + 1).map(|_| source.review_task(now)).collect();

        assert_eq!(tasks[0].payload.finding_type, FINDINGS[0].finding_type);
        assert_eq!(
            tasks[FINDINGS.len()].payload.finding_type,
            tasks[0].payload.finding_type
        );
        assert_ne!(tasks[0].id, tasks[FINDINGS.len()].id);
        assert_eq!(tasks[0].created_at, now);
    }

    #[test]
    fn test_clones_share_counter() {
        let a = FixtureSource::new();
        let b = a.clone();
        a.log_entry(Utc::now());
        b.log_entry(Utc::now());
        assert_eq!(a.call_count(), 2);
    }

    #[test]
    fn test_fixture_hex_shape() {
        let h = fixture_hex(7, 32);
        assert_eq!(h.len(), 66);
        assert_eq!(h, fixture_hex(7, 32));
    }

    #[test]
    fn test_breakdown_is_stable() {
        let now = Utc::now();
        let a = FixtureSource::new().vulnerability_breakdown(6, now);
        let b = FixtureSource::new().vulnerability_breakdown(6, now);
        assert_eq!(a, b);
        // Hours 0..6 contribute 0,1,2,0,1,2 findings.
        assert_eq!(a.total, 6);
    }
}
