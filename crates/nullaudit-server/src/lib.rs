//! NullAudit Server
//!
//! HTTP front end of the mock audit service: the HITL review queue, the
//! activity log, dashboard data and the keyword scanner, all behind a
//! per-client fixed-window rate limiter.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod feeder;
pub mod handlers;
pub mod rate_limit;

use config::ServerConfig;
use feeder::LogFeeder;
use handlers::{create_router, AppState};
use nullaudit_mock::RandomSource;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Server start-up error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Seeds the stores from a [`RandomSource`], starts the log feeder when an
/// interval is configured, and serves until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;

    info!("Starting NullAudit server");
    info!("Bind address: {}", config.bind_addr());
    info!(
        "Rate limit: {} requests per {}s",
        config.rate_limit.max_requests, config.rate_limit.window_secs
    );

    let state = AppState::new(&config, Arc::new(RandomSource::new()));
    info!(
        tasks = state.tasks().len(),
        logs = state.logs().len(),
        "Seeded stores"
    );

    if let Some(interval) = config.log_feed_interval() {
        let feeder = LogFeeder::new(state.clone(), interval);
        tokio::spawn(feeder.run());
    }

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = ServerError::Server("test error".to_string());
        assert_eq!(err.to_string(), "Server error: test error");
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected_before_bind() {
        let config = ServerConfig {
            log_capacity: 0,
            ..ServerConfig::default()
        };
        let result = start_server(config).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
