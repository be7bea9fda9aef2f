//! Dashboard, agent, vulnerability, attestation and scan endpoints

use axum::{extract::State, response::Json};
use chrono::Utc;
use nullaudit_domain::{
    AgentStatus, Attestation, DashboardStats, LogEntry, LogType, Priority, ScanReport,
    VulnerabilityBreakdown,
};
use nullaudit_mock::scan_source;
use serde::Deserialize;

use super::AppState;
use crate::error::{ApiError, ApiJson, ApiQuery};

const DEFAULT_HOURS: u32 = 24;
const MAX_HOURS: u32 = 168;
const DEFAULT_ATTESTATIONS: usize = 10;
const MAX_ATTESTATIONS: usize = 50;

/// `?hours=` for the vulnerability breakdown
#[derive(Debug, Deserialize)]
pub struct HoursParams {
    hours: Option<String>,
}

/// `?count=` for attestations
#[derive(Debug, Deserialize)]
pub struct CountParams {
    count: Option<String>,
}

/// Body of `POST /api/scan`
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Source to scan
    #[serde(default)]
    pub code: Option<String>,
}

/// Parse an integer query value, falling back to `default` and clamping to `min..=max`
fn clamped<T>(raw: Option<&str>, default: T, min: T, max: T) -> T
where
    T: std::str::FromStr + Ord,
{
    raw.and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
        .clamp(min, max)
}

/// GET /api/dashboard/stats
pub async fn dashboard_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    let pending = state.tasks().stats().pending;
    let mut stats = state.source.dashboard_stats(Utc::now());
    stats.pending_reviews = pending as u64;
    Json(stats)
}

/// GET /api/agents/status
pub async fn agent_status(State(state): State<AppState>) -> Json<Vec<AgentStatus>> {
    Json(state.source.agent_statuses(Utc::now()))
}

/// GET /api/vulnerabilities?hours=
pub async fn vulnerabilities(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<HoursParams>,
) -> Result<Json<VulnerabilityBreakdown>, ApiError> {
    let hours = clamped(params.hours.as_deref(), DEFAULT_HOURS, 1, MAX_HOURS);
    Ok(Json(state.source.vulnerability_breakdown(hours, Utc::now())))
}

/// GET /api/attestations?count=
pub async fn attestations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CountParams>,
) -> Result<Json<Vec<Attestation>>, ApiError> {
    let count = clamped(
        params.count.as_deref(),
        DEFAULT_ATTESTATIONS,
        1,
        MAX_ATTESTATIONS,
    );
    let now = Utc::now();
    Ok(Json((0..count).map(|_| state.source.attestation(now)).collect()))
}

/// POST /api/scan
pub async fn scan(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ScanRequest>,
) -> Result<Json<ScanReport>, ApiError> {
    let code = request
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::invalid_field("code", "code must not be empty"))?;

    let report = scan_source(&code);
    let critical = report
        .summary
        .get(&Priority::Critical)
        .copied()
        .unwrap_or(0);

    tracing::info!(
        lines = report.lines_scanned,
        findings = report.findings.len(),
        critical,
        "Scan finished"
    );

    let log_type = if critical > 0 {
        LogType::Warning
    } else {
        LogType::Success
    };
    state.record(LogEntry::new(
        Utc::now(),
        log_type,
        "scanner",
        format!(
            "Scanned {} lines: {} findings ({} critical)",
            report.lines_scanned,
            report.findings.len(),
            critical
        ),
    ));

    Ok(Json(report))
}
