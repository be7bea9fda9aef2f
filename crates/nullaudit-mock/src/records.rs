//! Record assembly shared by the random and fixture sources

use chrono::{DateTime, Duration, DurationRound, Utc};
use nullaudit_domain::{
    AgentState, AgentStatus, FindingPayload, Priority, ReviewTask, TaskContext, TaskId,
    TaskMetadata, TaskStatus, TaskType, TimelinePoint, VulnerabilityBreakdown,
};
use std::collections::BTreeMap;

use crate::catalog::{FindingTemplate, AGENTS, CONTRACTS};

/// Choices a source makes for one task
pub(crate) struct TaskDraw<'a> {
    pub template: &'a FindingTemplate,
    pub contract: usize,
    pub agent: usize,
    pub task_type: TaskType,
    pub confidence: f64,
    pub line: u32,
    pub session: String,
}

pub(crate) fn review_task(draw: TaskDraw<'_>, now: DateTime<Utc>) -> ReviewTask {
    let (source_file, contract) = CONTRACTS[draw.contract % CONTRACTS.len()];
    let (agent_id, _, _) = AGENTS[draw.agent % AGENTS.len()];
    let template = draw.template;

    ReviewTask {
        id: TaskId::new(),
        task_type: draw.task_type,
        priority: template.severity,
        title: format!("{} in {}", template.title, contract),
        description: template.description.to_string(),
        metadata: TaskMetadata {
            agent_id: agent_id.to_string(),
            session_id: draw.session,
            created_at: now,
            confidence: draw.confidence.clamp(0.0, 1.0),
            context: TaskContext {
                source_file: source_file.to_string(),
                contract: contract.to_string(),
                detector: template.detector.to_string(),
                line: Some(draw.line),
            },
        },
        payload: FindingPayload {
            finding_type: template.finding_type.to_string(),
            severity: template.severity,
            evidence: template.evidence.iter().map(|e| e.to_string()).collect(),
            code_snippet: template.snippet.to_string(),
        },
        status: TaskStatus::Pending,
        assigned_to: None,
        created_at: now,
        updated_at: now,
        feedback: None,
    }
}

pub(crate) fn agent_status(
    index: usize,
    status: AgentState,
    tasks_completed: u64,
    last_heartbeat: DateTime<Utc>,
) -> AgentStatus {
    let (id, name, kind) = AGENTS[index % AGENTS.len()];
    AgentStatus {
        id: id.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        status,
        tasks_completed,
        last_heartbeat,
    }
}

/// Build a breakdown from per-hour finding lists (oldest hour first)
///
/// Each inner slice holds the severity and category of every finding in that
/// hour, so the totals always agree with the timeline.
pub(crate) fn breakdown(
    hours: u32,
    per_hour: Vec<Vec<(Priority, &str)>>,
    now: DateTime<Utc>,
) -> VulnerabilityBreakdown {
    let current_hour = now.duration_trunc(Duration::hours(1)).unwrap_or(now);
    let mut by_severity: BTreeMap<Priority, u64> =
        Priority::ALL.iter().map(|p| (*p, 0)).collect();
    let mut by_category = BTreeMap::new();
    let mut timeline = Vec::with_capacity(per_hour.len());
    let last = per_hour.len().saturating_sub(1);

    for (i, findings) in per_hour.into_iter().enumerate() {
        for (severity, category) in &findings {
            *by_severity.entry(*severity).or_insert(0) += 1;
            *by_category.entry(category.to_string()).or_insert(0) += 1;
        }
        timeline.push(TimelinePoint {
            hour: current_hour - Duration::hours((last - i) as i64),
            count: findings.len() as u64,
        });
    }

    let total = timeline.iter().map(|p| p.count).sum();
    VulnerabilityBreakdown {
        hours,
        total,
        by_severity,
        by_category,
        timeline,
    }
}
