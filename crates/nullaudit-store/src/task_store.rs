//! In-memory HITL review task store

use chrono::{DateTime, Utc};
use nullaudit_domain::{
    DataSource, Feedback, FeedbackAction, Priority, ReviewTask, TaskStatus,
};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::StoreError;

/// Average response time reported while no task has been completed (5 minutes)
pub const DEFAULT_AVERAGE_RESPONSE_MS: u64 = 5 * 60 * 1000;

/// Result of a successful feedback submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackOutcome {
    /// The new feedback record
    pub feedback: Feedback,
    /// The task after completion
    pub task: ReviewTask,
}

/// Aggregate numbers over the task queue
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// All tasks
    pub total: usize,
    /// Tasks waiting in the queue
    pub pending: usize,
    /// Tasks held by a reviewer
    pub assigned: usize,
    /// Tasks with feedback
    pub completed: usize,
    /// Mean response time of completed tasks in milliseconds
    pub average_response_time: u64,
    /// Pending tasks with critical priority
    pub critical_pending: usize,
    /// Pending tasks per priority
    pub pending_by_priority: BTreeMap<Priority, usize>,
}

/// Ordered collection of review tasks
///
/// Tasks keep insertion order and are never removed. Every mutation goes
/// through [`assign`](TaskStore::assign) or
/// [`submit_feedback`](TaskStore::submit_feedback), which enforce the
/// forward-only status lifecycle.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use nullaudit_mock::FixtureSource;
/// use nullaudit_store::TaskStore;
///
/// let source = FixtureSource::new();
/// let store = TaskStore::seeded(&source, 5, Utc::now());
/// assert_eq!(store.list_pending().len(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<ReviewTask>,
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `count` tasks from `source`
    pub fn seeded(source: &dyn DataSource, count: usize, now: DateTime<Utc>) -> Self {
        let mut store = Self::new();
        store.generate(source, count, now);
        store
    }

    /// Number of tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in insertion order, optionally restricted to one status
    pub fn list(&self, status: Option<TaskStatus>) -> Vec<ReviewTask> {
        self.tasks
            .iter()
            .filter(|task| status.map_or(true, |s| task.status == s))
            .cloned()
            .collect()
    }

    /// Pending tasks in insertion order
    pub fn list_pending(&self) -> Vec<ReviewTask> {
        self.list(Some(TaskStatus::Pending))
    }

    /// Look up a task by id
    pub fn get(&self, id: &str) -> Result<&ReviewTask, StoreError> {
        self.tasks
            .iter()
            .find(|task| task.id.as_str() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut ReviewTask, StoreError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id.as_str() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Hand a task to a reviewer
    ///
    /// Fails with `Validation` for a blank reviewer, `NotFound` for an unknown
    /// id and `InvalidTransition` if the task is already completed.
    pub fn assign(
        &mut self,
        id: &str,
        reviewer_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ReviewTask, StoreError> {
        let reviewer_id = reviewer_id.trim();
        if reviewer_id.is_empty() {
            return Err(StoreError::validation("reviewerId", "reviewerId is required"));
        }

        let task = self.get_mut(id)?;
        if !task.status.can_transition_to(TaskStatus::Assigned) {
            return Err(StoreError::transition(id, task.status, TaskStatus::Assigned));
        }

        task.status = TaskStatus::Assigned;
        task.assigned_to = Some(reviewer_id.to_string());
        task.updated_at = now;

        Ok(task.clone())
    }

    /// Record reviewer feedback and complete the task
    ///
    /// `action` must be one of `approved`, `rejected`, `modified`, `deferred`;
    /// anything else fails with `Validation` before the task is touched.
    pub fn submit_feedback(
        &mut self,
        id: &str,
        action: &str,
        comments: Option<String>,
        reviewer_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<FeedbackOutcome, StoreError> {
        let action = FeedbackAction::parse(action).ok_or_else(|| {
            StoreError::validation(
                "action",
                format!("action must be one of: {}", FeedbackAction::NAMES.join(", ")),
            )
        })?;

        let task = self.get_mut(id)?;
        if !task.status.can_transition_to(TaskStatus::Completed) {
            return Err(StoreError::transition(id, task.status, TaskStatus::Completed));
        }

        let feedback = Feedback::new(
            task.id.clone(),
            task.created_at,
            action,
            comments,
            reviewer_id,
            now,
        );

        task.status = TaskStatus::Completed;
        task.updated_at = now;
        task.feedback = Some(feedback.clone());

        Ok(FeedbackOutcome {
            feedback,
            task: task.clone(),
        })
    }

    /// Append `count` freshly generated tasks and return them
    pub fn generate(
        &mut self,
        source: &dyn DataSource,
        count: usize,
        now: DateTime<Utc>,
    ) -> Vec<ReviewTask> {
        let generated: Vec<ReviewTask> = (0..count).map(|_| source.review_task(now)).collect();
        self.tasks.extend(generated.iter().cloned());
        generated
    }

    /// Aggregate numbers over all tasks
    pub fn stats(&self) -> TaskStats {
        let mut pending = 0;
        let mut assigned = 0;
        let mut completed = 0;
        let mut critical_pending = 0;
        let mut response_total: u64 = 0;
        let mut response_count: u64 = 0;
        let mut pending_by_priority: BTreeMap<Priority, usize> =
            Priority::ALL.iter().map(|p| (*p, 0)).collect();

        for task in &self.tasks {
            match task.status {
                TaskStatus::Pending => {
                    pending += 1;
                    *pending_by_priority.entry(task.priority).or_insert(0) += 1;
                    if task.priority == Priority::Critical {
                        critical_pending += 1;
                    }
                }
                TaskStatus::Assigned => assigned += 1,
                TaskStatus::Completed => {
                    completed += 1;
                    if let Some(feedback) = &task.feedback {
                        response_total += feedback.response_time;
                        response_count += 1;
                    }
                }
            }
        }

        let average_response_time = if response_count == 0 {
            DEFAULT_AVERAGE_RESPONSE_MS
        } else {
            response_total / response_count
        };

        TaskStats {
            total: self.tasks.len(),
            pending,
            assigned,
            completed,
            average_response_time,
            critical_pending,
            pending_by_priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use nullaudit_mock::FixtureSource;

    fn store_with(count: usize) -> (TaskStore, DateTime<Utc>) {
        let now = Utc::now();
        (TaskStore::seeded(&FixtureSource::new(), count, now), now)
    }

    #[test]
    fn test_assign_blank_reviewer_rejected() {
        let (mut store, now) = store_with(1);
        let id = store.list_pending()[0].id.to_string();

        let result = store.assign(&id, "  ", now);
        assert!(matches!(
            result,
            Err(StoreError::Validation { field: "reviewerId", .. })
        ));
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn test_assign_unknown_id() {
        let (mut store, now) = store_with(1);
        let result = store.assign("task-missing", "alice", now);
        assert_eq!(result, Err(StoreError::NotFound("task-missing".to_string())));
    }

    #[test]
    fn test_reassign_keeps_assigned() {
        let (mut store, now) = store_with(1);
        let id = store.list_pending()[0].id.to_string();

        store.assign(&id, "alice", now).unwrap();
        let task = store.assign(&id, "bob", now).unwrap();
        assert_eq!(task.status, TaskStatus::Assigned);
        assert_eq!(task.assigned_to.as_deref(), Some("bob"));
    }

    #[test]
    fn test_completed_task_cannot_be_reassigned() {
        let (mut store, now) = store_with(1);
        let id = store.list_pending()[0].id.to_string();

        store.submit_feedback(&id, "rejected", None, None, now).unwrap();
        let result = store.assign(&id, "alice", now);
        assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
        assert_eq!(store.get(&id).unwrap().status, TaskStatus::Completed);
    }

    #[test]
    fn test_feedback_twice_rejected() {
        let (mut store, now) = store_with(1);
        let id = store.list_pending()[0].id.to_string();

        store.submit_feedback(&id, "approved", None, None, now).unwrap();
        let second = store.submit_feedback(&id, "rejected", None, None, now);
        assert!(matches!(second, Err(StoreError::InvalidTransition { .. })));

        let feedback = store.get(&id).unwrap().feedback.as_ref().unwrap();
        assert_eq!(feedback.action, FeedbackAction::Approved);
    }

    #[test]
    fn test_invalid_action_does_not_mutate() {
        let (mut store, now) = store_with(1);
        let id = store.list_pending()[0].id.to_string();
        let before = store.get(&id).unwrap().clone();

        let result = store.submit_feedback(&id, "escalate", None, None, now + Duration::hours(1));
        assert!(matches!(
            result,
            Err(StoreError::Validation { field: "action", .. })
        ));
        assert_eq!(store.get(&id).unwrap(), &before);
    }

    #[test]
    fn test_invalid_action_checked_before_lookup() {
        let (mut store, now) = store_with(0);
        let result = store.submit_feedback("task-missing", "nope", None, None, now);
        assert!(matches!(result, Err(StoreError::Validation { .. })));
    }

    #[test]
    fn test_response_time_from_creation() {
        let (mut store, now) = store_with(1);
        let task = store.list_pending()[0].clone();
        let later = task.created_at + Duration::seconds(42);

        let outcome = store
            .submit_feedback(task.id.as_str(), "modified", Some("tweak".into()), Some("carol".into()), later)
            .unwrap();
        assert_eq!(outcome.feedback.response_time, 42_000);
        assert_eq!(outcome.feedback.reviewer_id, "carol");
        assert_eq!(outcome.task.updated_at, later);
        assert!(outcome.task.updated_at >= now);
    }

    #[test]
    fn test_stats_default_average_when_nothing_completed() {
        let (store, _) = store_with(3);
        let stats = store.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.average_response_time, DEFAULT_AVERAGE_RESPONSE_MS);
    }

    #[test]
    fn test_stats_average_over_completed() {
        let (mut store, _) = store_with(2);
        let tasks = store.list_pending();

        let t0 = &tasks[0];
        let t1 = &tasks[1];
        store
            .submit_feedback(t0.id.as_str(), "approved", None, None, t0.created_at + Duration::seconds(10))
            .unwrap();
        store
            .submit_feedback(t1.id.as_str(), "approved", None, None, t1.created_at + Duration::seconds(30))
            .unwrap();

        assert_eq!(store.stats().average_response_time, 20_000);
    }

    #[test]
    fn test_generate_appends_in_order() {
        let (mut store, now) = store_with(2);
        let first_ids: Vec<_> = store.list(None).into_iter().map(|t| t.id).collect();

        let generated = store.generate(&FixtureSource::new(), 3, now);
        assert_eq!(generated.len(), 3);
        assert_eq!(store.len(), 5);

        let all = store.list(None);
        assert_eq!(all[0].id, first_ids[0]);
        assert_eq!(all[1].id, first_ids[1]);
        assert_eq!(all[4].id, generated[2].id);
    }

    #[test]
    fn test_generate_zero_is_noop() {
        let (mut store, now) = store_with(2);
        assert!(store.generate(&FixtureSource::new(), 0, now).is_empty());
        assert_eq!(store.len(), 2);
    }
}
