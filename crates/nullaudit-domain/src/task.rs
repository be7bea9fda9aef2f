//! Review task module - the unit of work in the HITL queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::feedback::Feedback;

/// Opaque identifier for a review task
///
/// Generated ids have the form `task-<uuid v7>`, so they sort by creation time,
/// but callers must treat them as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh task id
    ///
    /// # Examples
    ///
    /// ```
    /// use nullaudit_domain::TaskId;
    ///
    /// let id = TaskId::new();
    /// assert!(id.as_str().starts_with("task-"));
    /// ```
    pub fn new() -> Self {
        Self(format!("task-{}", uuid::Uuid::now_v7()))
    }

    /// Wrap an existing id string (fixtures, lookups)
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of decision a task asks the reviewer for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Confirm or dismiss a finding
    Review,
    /// Approve an automated action before it runs
    Approval,
}

impl TaskType {
    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Review => "review",
            TaskType::Approval => "approval",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Informational
    Low,
    /// Should be looked at this cycle
    Medium,
    /// Should be looked at today
    High,
    /// Blocks a release
    Critical,
}

impl Priority {
    /// All priorities, lowest first
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Parse a priority (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "critical" => Some(Priority::Critical),
            _ => None,
        }
    }
}

/// Lifecycle state of a review task
///
/// Transitions only move forward:
/// - Pending → Assigned → Completed
/// - Pending → Completed
///
/// An assigned task may be handed to another reviewer (Assigned → Assigned).
/// Nothing leaves Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Waiting in the queue
    Pending,
    /// Claimed by a reviewer
    Assigned,
    /// Feedback recorded
    Completed,
}

impl TaskStatus {
    /// All statuses in lifecycle order
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::Assigned,
        TaskStatus::Completed,
    ];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Assigned => "assigned",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parse a status (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(TaskStatus::Pending),
            "assigned" => Some(TaskStatus::Assigned),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Assigned)
                | (TaskStatus::Pending, TaskStatus::Completed)
                | (TaskStatus::Assigned, TaskStatus::Assigned)
                | (TaskStatus::Assigned, TaskStatus::Completed)
        )
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid task status: {}", s))
    }
}

/// Where in the audited code base the finding came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContext {
    /// Source file path
    pub source_file: String,
    /// Contract the finding belongs to
    pub contract: String,
    /// Detector that raised it
    pub detector: String,
    /// Line number, when the detector reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Provenance of the automated finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetadata {
    /// Agent that raised the task
    pub agent_id: String,
    /// Scan session the agent was running
    pub session_id: String,
    /// When the agent raised it
    pub created_at: DateTime<Utc>,
    /// Agent confidence in [0, 1]
    pub confidence: f64,
    /// Location details
    pub context: TaskContext,
}

/// The finding under review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingPayload {
    /// Finding category (e.g. "reentrancy")
    pub finding_type: String,
    /// Severity reported by the detector
    pub severity: Priority,
    /// Evidence lines supporting the finding
    pub evidence: Vec<String>,
    /// Code excerpt around the finding
    pub code_snippet: String,
}

/// A review task in the HITL queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewTask {
    /// Unique identifier
    pub id: TaskId,

    /// Kind of decision requested
    #[serde(rename = "type")]
    pub task_type: TaskType,

    /// Priority
    pub priority: Priority,

    /// Short title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Agent provenance
    pub metadata: TaskMetadata,

    /// The finding itself
    pub payload: FindingPayload,

    /// Lifecycle state
    pub status: TaskStatus,

    /// Reviewer currently holding the task
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last mutation time
    pub updated_at: DateTime<Utc>,

    /// Feedback recorded when the task was completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl ReviewTask {
    /// Whether the task is still waiting in the queue
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Assigned));
        assert!(TaskStatus::Pending.can_transition_to(TaskStatus::Completed));
        assert!(TaskStatus::Assigned.can_transition_to(TaskStatus::Completed));
        assert!(TaskStatus::Assigned.can_transition_to(TaskStatus::Assigned));
    }

    #[test]
    fn test_no_transition_back_to_pending() {
        for status in TaskStatus::ALL {
            assert!(!status.can_transition_to(TaskStatus::Pending));
        }
    }

    #[test]
    fn test_completed_is_terminal() {
        for next in TaskStatus::ALL {
            assert!(!TaskStatus::Completed.can_transition_to(next));
        }
    }

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!(TaskStatus::parse("PENDING"), Some(TaskStatus::Pending));
        assert_eq!("Assigned".parse::<TaskStatus>(), Ok(TaskStatus::Assigned));
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_ids_are_unique() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), a.as_str());
    }

    #[test]
    fn test_priority_wire_names() {
        assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), "\"critical\"");
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert!(Priority::Low < Priority::Critical);
    }
}
