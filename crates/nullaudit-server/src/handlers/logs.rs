//! Activity log endpoints

use axum::{body::Bytes, extract::State, response::Json};
use chrono::{Duration, Utc};
use nullaudit_domain::LogQuery;
use nullaudit_mock::seed_logs;
use nullaudit_store::{LogQueryResult, LogStats};
use serde::{Deserialize, Serialize};

use super::{AppState, GenerateRequest};
use crate::error::{ApiError, ApiQuery};

/// Raw query string of `GET /api/logs`
///
/// Everything arrives as text so a bad `limit` falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct LogQueryParams {
    #[serde(rename = "type")]
    log_type: Option<String>,
    component: Option<String>,
    search: Option<String>,
    since: Option<String>,
    limit: Option<String>,
}

impl From<LogQueryParams> for LogQuery {
    fn from(params: LogQueryParams) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        LogQuery {
            log_type: non_empty(params.log_type),
            component: non_empty(params.component),
            search: non_empty(params.search),
            since: non_empty(params.since),
            limit: params.limit.and_then(|l| l.trim().parse().ok()),
        }
    }
}

/// Response of the generate endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateLogsResponse {
    /// Always true
    pub success: bool,
    /// Entries appended
    pub generated: usize,
    /// Buffer size afterwards
    pub total: usize,
}

/// GET /api/logs
pub async fn query_logs(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LogQueryParams>,
) -> Result<Json<LogQueryResult>, ApiError> {
    let query = LogQuery::from(params);
    Ok(Json(state.logs().query(&query)))
}

/// GET /api/logs/stats
pub async fn log_stats(State(state): State<AppState>) -> Json<LogStats> {
    Json(state.logs().stats(Utc::now()))
}

/// POST /api/logs/generate
pub async fn generate_logs(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateLogsResponse>, ApiError> {
    let request = GenerateRequest::from_body(&body)?;
    let count = request.resolve(state.max_generate_batch)?;

    let entries = seed_logs(state.source.as_ref(), count, Duration::seconds(1), Utc::now());
    let total = {
        let mut logs = state.logs_mut();
        logs.extend(entries);
        logs.len()
    };

    tracing::debug!(count, total, "Generated log entries");

    Ok(Json(GenerateLogsResponse {
        success: true,
        generated: count,
        total,
    }))
}
