//! HITL review task endpoints

use axum::{body::Bytes, extract::State, response::Json};
use chrono::Utc;
use nullaudit_domain::{Feedback, LogEntry, LogType, ReviewTask, TaskStatus};
use nullaudit_store::TaskStats;
use serde::{Deserialize, Serialize};

use super::{AppState, GenerateRequest};
use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};

/// Query string of `GET /api/tasks`
#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    /// Restrict to one status
    pub status: Option<String>,
}

/// Body of `POST /api/tasks/{id}/assign`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    /// Reviewer taking the task
    #[serde(default)]
    pub reviewer_id: Option<String>,
}

/// Body of `POST /api/tasks/{id}/feedback`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// approved | rejected | modified | deferred
    #[serde(default)]
    pub action: Option<String>,
    /// Optional comments
    #[serde(default)]
    pub comments: Option<String>,
    /// Reviewer; "anonymous" when absent
    #[serde(default)]
    pub reviewer_id: Option<String>,
}

/// Response of the assign endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct AssignResponse {
    /// Always true
    pub success: bool,
    /// Updated task
    pub task: ReviewTask,
}

/// Response of the feedback endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Always true
    pub success: bool,
    /// Recorded feedback
    pub feedback: Feedback,
    /// Completed task
    pub task: ReviewTask,
}

/// Response of the generate endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateTasksResponse {
    /// Always true
    pub success: bool,
    /// New tasks
    pub tasks: Vec<ReviewTask>,
    /// Store size afterwards
    pub total: usize,
}

/// GET /api/tasks/pending
pub async fn list_pending(State(state): State<AppState>) -> Json<Vec<ReviewTask>> {
    Json(state.tasks().list_pending())
}

/// GET /api/tasks?status=
pub async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TaskListParams>,
) -> Result<Json<Vec<ReviewTask>>, ApiError> {
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(TaskStatus::parse(s).ok_or_else(|| {
            ApiError::invalid_field("status", "status must be one of: pending, assigned, completed")
        })?),
    };

    Ok(Json(state.tasks().list(status)))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ReviewTask>, ApiError> {
    let task = state.tasks().get(&id)?.clone();
    Ok(Json(task))
}

/// POST /api/tasks/{id}/assign
pub async fn assign_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<AssignRequest>,
) -> Result<Json<AssignResponse>, ApiError> {
    let now = Utc::now();
    let reviewer = request.reviewer_id.unwrap_or_default();
    let task = state.tasks_mut().assign(&id, &reviewer, now)?;

    tracing::info!(task_id = %task.id, reviewer = %reviewer.trim(), "Task assigned");
    state.record(LogEntry::new(
        now,
        LogType::Info,
        "hitl",
        format!("Task {} assigned to {}", task.id, reviewer.trim()),
    ));

    Ok(Json(AssignResponse {
        success: true,
        task,
    }))
}

/// POST /api/tasks/{id}/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let action = request
        .action
        .ok_or_else(|| ApiError::invalid_field("action", "action is required"))?;

    let now = Utc::now();
    let outcome = state.tasks_mut().submit_feedback(
        &id,
        &action,
        request.comments,
        request.reviewer_id,
        now,
    )?;

    tracing::info!(
        task_id = %outcome.task.id,
        action = outcome.feedback.action.as_str(),
        response_ms = outcome.feedback.response_time,
        "Feedback recorded"
    );
    state.record(LogEntry::new(
        now,
        LogType::Success,
        "hitl",
        format!(
            "Task {} {} by {}",
            outcome.task.id,
            outcome.feedback.action.as_str(),
            outcome.feedback.reviewer_id
        ),
    ));

    Ok(Json(FeedbackResponse {
        success: true,
        feedback: outcome.feedback,
        task: outcome.task,
    }))
}

/// GET /api/tasks/stats
pub async fn task_stats(State(state): State<AppState>) -> Json<TaskStats> {
    Json(state.tasks().stats())
}

/// POST /api/tasks/generate
pub async fn generate_tasks(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateTasksResponse>, ApiError> {
    let request = GenerateRequest::from_body(&body)?;
    let count = request.resolve(state.max_generate_batch)?;

    let (tasks, total) = {
        let mut store = state.tasks_mut();
        let tasks = store.generate(state.source.as_ref(), count, Utc::now());
        (tasks, store.len())
    };

    tracing::debug!(count, total, "Generated review tasks");

    Ok(Json(GenerateTasksResponse {
        success: true,
        tasks,
        total,
    }))
}
