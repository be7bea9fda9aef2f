//! HTTP request handlers for the NullAudit API.
//!
//! Routes live under `/api` and pass through the rate limiter; `/health` does
//! not. Each handler does its store work inside a single lock scope.

pub mod dashboard;
pub mod logs;
pub mod tasks;

use crate::config::ServerConfig;
use crate::error::{panic_response, ApiError};
use crate::rate_limit::{self, RateLimiter};
use axum::{
    extract::State,
    http::Uri,
    middleware,
    response::Json,
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::{Duration, Utc};
use nullaudit_domain::{DataSource, LogEntry};
use nullaudit_mock::seed_logs;
use nullaudit_store::{LogStore, TaskStore};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// HITL review queue
    pub tasks: Arc<RwLock<TaskStore>>,
    /// Activity log buffer
    pub logs: Arc<RwLock<LogStore>>,
    /// Where generated records come from
    pub source: Arc<dyn DataSource>,
    /// API rate limiter
    pub rate_limiter: Arc<RateLimiter>,
    /// Largest count accepted by the generate endpoints
    pub max_generate_batch: usize,
}

impl AppState {
    /// Build state from configuration, seeding both stores from `source`
    pub fn new(config: &ServerConfig, source: Arc<dyn DataSource>) -> Self {
        let now = Utc::now();
        let tasks = TaskStore::seeded(source.as_ref(), config.seed_tasks, now);

        let mut logs = LogStore::new(config.log_capacity);
        logs.extend(seed_logs(
            source.as_ref(),
            config.seed_logs,
            Duration::seconds(config.seed_log_spacing_secs as i64),
            now,
        ));

        Self {
            tasks: Arc::new(RwLock::new(tasks)),
            logs: Arc::new(RwLock::new(logs)),
            source,
            rate_limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
            max_generate_batch: config.max_generate_batch,
        }
    }

    /// Read access to the task store
    pub fn tasks(&self) -> RwLockReadGuard<'_, TaskStore> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the task store
    pub fn tasks_mut(&self) -> RwLockWriteGuard<'_, TaskStore> {
        self.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read access to the log store
    pub fn logs(&self) -> RwLockReadGuard<'_, LogStore> {
        self.logs.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write access to the log store
    pub fn logs_mut(&self) -> RwLockWriteGuard<'_, LogStore> {
        self.logs.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one entry to the activity log
    pub fn record(&self, entry: LogEntry) {
        self.logs_mut().append(entry);
    }
}

/// Body of the generate endpoints
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Requested count; anything that is not a non-negative integer means 1
    #[serde(default)]
    pub count: Option<serde_json::Value>,
}

impl GenerateRequest {
    /// Parse an optional JSON body; only an empty body means "no request"
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body).map_err(|e| ApiError::Validation {
            field: None,
            message: format!("Invalid JSON body: {}", e),
        })
    }

    /// Effective count, checked against the batch cap
    pub fn resolve(&self, max: usize) -> Result<usize, ApiError> {
        let count = self
            .count
            .as_ref()
            .and_then(|v| match v {
                serde_json::Value::Number(n) => n.as_u64(),
                serde_json::Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .map(|n| n as usize)
            .unwrap_or(1);

        if count > max {
            return Err(ApiError::invalid_field(
                "count",
                format!("count must be at most {}", max),
            ));
        }
        Ok(count)
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Tasks in the review queue
    pub tasks: usize,
    /// Entries in the log buffer
    pub logs: usize,
}

/// GET /health - Liveness and store sizes
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let tasks = state.tasks().len();
    let logs = state.logs().len();

    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        tasks,
        logs,
    })
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    let api = AxumRouter::new()
        .route("/tasks", get(tasks::list_tasks))
        .route("/tasks/pending", get(tasks::list_pending))
        .route("/tasks/stats", get(tasks::task_stats))
        .route("/tasks/generate", post(tasks::generate_tasks))
        .route("/tasks/:id", get(tasks::get_task))
        .route("/tasks/:id/assign", post(tasks::assign_task))
        .route("/tasks/:id/feedback", post(tasks::submit_feedback))
        .route("/logs", get(logs::query_logs))
        .route("/logs/stats", get(logs::log_stats))
        .route("/logs/generate", post(logs::generate_logs))
        .route("/dashboard/stats", get(dashboard::dashboard_stats))
        .route("/agents/status", get(dashboard::agent_status))
        .route("/vulnerabilities", get(dashboard::vulnerabilities))
        .route("/attestations", get(dashboard::attestations))
        .route("/scan", post(dashboard::scan))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.rate_limiter),
            rate_limit::enforce,
        ));

    AxumRouter::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
