//! Daemon entry point for the earnings MCP server.
//!
//! Loads an env file and configuration, builds the control plane over
//! Alpha Vantage, and runs the enabled transports until one of them fails.

mod config;
mod control;

use earnings_mcp::server::{serve_stdio, serve_streamable_http};
use earnings_trigger::TriggerServer;
use tokio::task::JoinSet;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{EarningsConfig, load_env_file};
use crate::control::build_control_plane;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let env_file = load_env_file()?;
    init_tracing();
    if let Some(path) = &env_file {
        info!("loaded environment from {}", path.display());
    }

    let config = EarningsConfig::from_args()?;
    let control = build_control_plane(&config)?;

    let mut servers: JoinSet<Result<(), BoxError>> = JoinSet::new();
    if config.mcp_serve {
        servers.spawn(serve_streamable_http(control.clone(), config.mcp_http.clone()));
    }
    if config.trigger_serve {
        servers.spawn(TriggerServer::new(control.clone(), config.trigger.clone()).serve());
    }
    if config.enable_stdio {
        servers.spawn(serve_stdio(control));
    }

    while let Some(joined) = servers.join_next().await {
        joined??;
    }
    Ok(())
}

/// Logs go to stderr so stdio transport output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
