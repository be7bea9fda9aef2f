//! Randomized data source

use chrono::{DateTime, Duration, Utc};
use nullaudit_domain::{
    AgentState, AgentStatus, Attestation, AttestationStatus, DashboardStats, DataSource,
    LogEntry, ReviewTask, TaskType, VulnerabilityBreakdown,
};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{AGENTS, CONTRACTS, FINDINGS, LOG_MESSAGES, NETWORK};
use crate::records::{self, TaskDraw};

/// `0x` followed by `bytes * 2` random hex characters
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill(buf.as_mut_slice());
    format!("0x{}", hex::encode(buf))
}

/// Data source backed by the thread-local RNG
///
/// Every value is structurally valid (confidence in [0, 1], hashes of the
/// right length, timelines covering the requested window) but otherwise
/// arbitrary. Use [`FixtureSource`](crate::FixtureSource) in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSource;

impl RandomSource {
    /// Create a random source
    pub fn new() -> Self {
        Self
    }
}

impl DataSource for RandomSource {
    fn review_task(&self, now: DateTime<Utc>) -> ReviewTask {
        let mut rng = rand::thread_rng();
        let template = FINDINGS.choose(&mut rng).unwrap_or(&FINDINGS[0]);
        let task_type = if rng.gen_bool(0.7) {
            TaskType::Review
        } else {
            TaskType::Approval
        };

        records::review_task(
            TaskDraw {
                template,
                contract: rng.gen_range(0..CONTRACTS.len()),
                agent: rng.gen_range(0..AGENTS.len()),
                task_type,
                confidence: rng.gen_range(0.55..0.99),
                line: rng.gen_range(12..420),
                session: format!("session-{}", &random_hex(4)[2..]),
            },
            now,
        )
    }

    fn log_entry(&self, at: DateTime<Utc>) -> LogEntry {
        let mut rng = rand::thread_rng();
        let (log_type, component, message) =
            LOG_MESSAGES[rng.gen_range(0..LOG_MESSAGES.len())];
        LogEntry::new(at, log_type, component, message)
    }

    fn dashboard_stats(&self, now: DateTime<Utc>) -> DashboardStats {
        let mut rng = rand::thread_rng();
        let total_scans = rng.gen_range(1_200..1_600);
        let vulnerabilities_found = rng.gen_range(300..450);

        DashboardStats {
            total_scans,
            vulnerabilities_found,
            critical_findings: rng.gen_range(10..40),
            attestations: rng.gen_range(800..total_scans),
            average_scan_seconds: (rng.gen_range(18.0..95.0_f64) * 10.0).round() / 10.0,
            active_agents: rng.gen_range(2..=AGENTS.len() as u32),
            pending_reviews: 0,
            uptime_percent: (rng.gen_range(99.0..99.99_f64) * 100.0).round() / 100.0,
            generated_at: now,
        }
    }

    fn agent_statuses(&self, now: DateTime<Utc>) -> Vec<AgentStatus> {
        let mut rng = rand::thread_rng();
        (0..AGENTS.len())
            .map(|i| {
                let roll: f64 = rng.gen();
                let status = if roll < 0.65 {
                    AgentState::Active
                } else if roll < 0.95 {
                    AgentState::Idle
                } else {
                    AgentState::Error
                };
                let heartbeat = now - Duration::seconds(rng.gen_range(0..90));
                records::agent_status(i, status, rng.gen_range(40..2_500), heartbeat)
            })
            .collect()
    }

    fn vulnerability_breakdown(&self, hours: u32, now: DateTime<Utc>) -> VulnerabilityBreakdown {
        let mut rng = rand::thread_rng();
        let per_hour = (0..hours)
            .map(|_| {
                let count = rng.gen_range(0..8);
                (0..count)
                    .map(|_| {
                        let template = &FINDINGS[rng.gen_range(0..FINDINGS.len())];
                        (template.severity, template.finding_type)
                    })
                    .collect()
            })
            .collect();
        records::breakdown(hours, per_hour, now)
    }

    fn attestation(&self, now: DateTime<Utc>) -> Attestation {
        let mut rng = rand::thread_rng();
        let status = if rng.gen_bool(0.85) {
            AttestationStatus::Confirmed
        } else {
            AttestationStatus::Pending
        };

        Attestation {
            id: format!("att-{}", uuid::Uuid::now_v7()),
            tx_hash: random_hex(32),
            block_number: rng.gen_range(5_000_000..6_500_000),
            network: NETWORK.to_string(),
            contract_address: random_hex(20),
            report_hash: random_hex(32),
            status,
            timestamp: now - Duration::seconds(rng.gen_range(0..86_400)),
        }
    }
}
