//! Reviewer feedback on a review task

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskId;

/// Reviewer id recorded when the submitter does not identify themselves
pub const ANONYMOUS_REVIEWER: &str = "anonymous";

/// Reviewer decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackAction {
    /// Finding confirmed as-is
    Approved,
    /// Finding dismissed
    Rejected,
    /// Finding confirmed with changes
    Modified,
    /// Decision postponed
    Deferred,
}

impl FeedbackAction {
    /// Accepted wire names, for error messages
    pub const NAMES: [&'static str; 4] = ["approved", "rejected", "modified", "deferred"];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackAction::Approved => "approved",
            FeedbackAction::Rejected => "rejected",
            FeedbackAction::Modified => "modified",
            FeedbackAction::Deferred => "deferred",
        }
    }

    /// Parse an action (exact wire name)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approved" => Some(FeedbackAction::Approved),
            "rejected" => Some(FeedbackAction::Rejected),
            "modified" => Some(FeedbackAction::Modified),
            "deferred" => Some(FeedbackAction::Deferred),
            _ => None,
        }
    }
}

/// A feedback record, created once when a task is completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Unique identifier
    pub id: String,
    /// Task the feedback belongs to
    pub task_id: TaskId,
    /// Reviewer, or `"anonymous"`
    pub reviewer_id: String,
    /// Decision
    pub action: FeedbackAction,
    /// Optional reviewer comments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Submission time
    pub timestamp: DateTime<Utc>,
    /// Milliseconds between task creation and submission
    pub response_time: u64,
}

impl Feedback {
    /// Build a feedback record for a task created at `task_created_at`
    ///
    /// A blank or missing reviewer becomes `"anonymous"`. The response time
    /// never goes negative, even if the clock moved backwards.
    pub fn new(
        task_id: TaskId,
        task_created_at: DateTime<Utc>,
        action: FeedbackAction,
        comments: Option<String>,
        reviewer_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let reviewer_id = reviewer_id
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| ANONYMOUS_REVIEWER.to_string());

        let response_time = (now - task_created_at).num_milliseconds().max(0) as u64;

        Self {
            id: format!("fb-{}", uuid::Uuid::now_v7()),
            task_id,
            reviewer_id,
            action,
            comments,
            timestamp: now,
            response_time,
        }
    }
}
