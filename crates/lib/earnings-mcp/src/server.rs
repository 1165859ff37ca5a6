//! MCP server runners for earnings-mcp.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router};
use axum::routing::get;
use earnings_core::control::EarningsControlPlane;
use earnings_store::models::HealthStatus;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tracing::info;

use crate::EarningsMcp;

pub const DEFAULT_MCP_HTTP_ADDR: &str = "0.0.0.0:3000";

/// Configuration for the MCP streamable HTTP server.
#[derive(Debug, Clone)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    pub stateful_mode: bool,
    pub sse_keep_alive: Option<Duration>,
    pub sse_retry: Option<Duration>,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(15)),
            sse_retry: Some(Duration::from_secs(3)),
        }
    }

    #[must_use]
    pub const fn with_stateful_mode(mut self, stateful_mode: bool) -> Self {
        self.stateful_mode = stateful_mode;
        self
    }
}

impl Default for McpHttpServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP HTTP address"))
    }
}

/// Serves the MCP server over stdio.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    control: EarningsControlPlane,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = EarningsMcp::new(control);
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}

/// Serves the MCP server using streamable HTTP transport at `/mcp`, with a
/// liveness route at `/health`.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http(
    control: EarningsControlPlane,
    config: McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = config.addr;
    let app = build_router(control, &config);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("earnings-mcp listening on http://{addr}/mcp");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(control: EarningsControlPlane, config: &McpHttpServerConfig) -> Router {
    let service: StreamableHttpService<EarningsMcp, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(EarningsMcp::new(control.clone())),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                sse_keep_alive: config.sse_keep_alive,
                sse_retry: config.sse_retry,
                stateful_mode: config.stateful_mode,
                ..Default::default()
            },
        );

    Router::new()
        .route("/health", get(health))
        .nest_service("/mcp", service)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::default())
}
