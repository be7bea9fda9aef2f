//! NullAudit server binary
//!
//! Serves the mock audit API. Configuration comes from an optional TOML file;
//! `--bind` and `--port` override whatever the file says.

use clap::Parser;
use nullaudit_server::{config::ServerConfig, start_server, ServerError};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "nullaudit-server")]
#[command(version, about = "Mock audit service: HITL review queue, activity log and dashboard data")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "NULLAUDIT_CONFIG")]
    config: Option<String>,

    /// Bind address override
    #[arg(short, long)]
    bind: Option<String>,

    /// Port override
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ServerError> {
    let mut config = match args.config.as_deref() {
        Some(path) => ServerConfig::from_file(path)?,
        None => {
            tracing::warn!("No config file specified, using defaults");
            ServerConfig::default()
        }
    };

    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.bind_port = port;
    }

    start_server(config).await
}
