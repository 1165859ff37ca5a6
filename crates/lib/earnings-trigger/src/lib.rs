//! Function-trigger HTTP adapter for earnings-mcp.
//!
//! Accepts tool-trigger contexts on `POST /tools/{tool_name}`, runs them
//! through the shared control plane and answers with the same JSON documents
//! the MCP tools return.

pub mod catalog;
pub mod context;

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{Json, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use earnings_core::control::{
    EarningsControlPlane,
    ErrorKind,
    ToolError,
    ToolRequest,
    render_error,
    render_result,
};
use earnings_store::models::{ErrorDocument, HealthStatus, RevenueReport};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{ToolDefinition, TriggerTool, tool_catalog};
use crate::context::{ContextError, parse_trigger_context};

/// Remediation hint attached to configuration, transport and unexpected
/// failures.
pub const API_KEY_NOTE: &str =
    "Make sure ALPHAVANTAGE_API_KEY is configured in your .env file";

pub const DEFAULT_TRIGGER_ADDR: &str = "127.0.0.1:7071";

/// Configuration for the trigger HTTP server.
#[derive(Debug, Clone)]
pub struct TriggerServerConfig {
    pub addr: SocketAddr,
    pub request_timeout: Duration,
}

impl TriggerServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            request_timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for TriggerServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_ADDR.parse().expect("valid default address"))
    }
}

/// HTTP trigger server wrapper.
pub struct TriggerServer {
    config: TriggerServerConfig,
    state: AppState,
}

impl TriggerServer {
    #[must_use]
    pub const fn new(control: EarningsControlPlane, config: TriggerServerConfig) -> Self {
        let state = AppState {
            control,
            request_timeout: config.request_timeout,
        };
        Self { config, state }
    }

    /// Runs the HTTP server until shutdown.
    ///
    /// # Errors
    /// Returns any listener or server error.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let app = router_with_state(self.state);

        info!("earnings-trigger listening on {addr}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    control: EarningsControlPlane,
    request_timeout: Duration,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    document: ErrorDocument,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            document: ErrorDocument::new(message),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            document: ErrorDocument::new(message),
        }
    }

    fn timeout() -> Self {
        Self {
            status: StatusCode::REQUEST_TIMEOUT,
            document: ErrorDocument::new("tool request timed out").with_note(API_KEY_NOTE),
        }
    }
}

impl From<ContextError> for ApiError {
    fn from(err: ContextError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        json_document(self.status, render_error(&self.document))
    }
}

fn json_document(status: StatusCode, document: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        document,
    )
        .into_response()
}

/// Builds the trigger router over a control plane.
pub fn build_router(control: EarningsControlPlane, request_timeout: Duration) -> Router {
    router_with_state(AppState {
        control,
        request_timeout,
    })
}

fn router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/:tool_name", post(invoke_tool))
        .with_state(state)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::default())
}

async fn list_tools() -> Json<Vec<ToolDefinition>> {
    Json(tool_catalog())
}

async fn invoke_tool(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
    body: String,
) -> Result<Response, ApiError> {
    let tool = TriggerTool::from_name(&tool_name)
        .ok_or_else(|| ApiError::not_found(format!("unknown tool: {tool_name}")))?;
    let request = parse_trigger_context(&body).inspect_err(|err| {
        warn!("rejected {tool_name} trigger context: {err}");
    })?;

    let document = tokio::time::timeout(
        state.request_timeout,
        run_tool(&state.control, tool, &request),
    )
    .await
    .map_err(|_| ApiError::timeout())?;

    Ok(json_document(StatusCode::OK, document))
}

/// Revenue document extended with the statement value as received.
#[derive(Debug, Serialize)]
struct TriggerRevenueDocument {
    #[serde(flatten)]
    report: RevenueReport,
    raw_revenue: String,
}

impl From<RevenueReport> for TriggerRevenueDocument {
    fn from(report: RevenueReport) -> Self {
        // An absent statement value reads as "0", like the amount itself.
        let raw_revenue = report
            .raw_total_revenue
            .clone()
            .unwrap_or_else(|| "0".to_string());
        Self {
            report,
            raw_revenue,
        }
    }
}

async fn run_tool(
    control: &EarningsControlPlane,
    tool: TriggerTool,
    request: &ToolRequest,
) -> String {
    match tool {
        TriggerTool::CompanyRevenue => render_trigger(
            control
                .company_revenue(request)
                .await
                .map(TriggerRevenueDocument::from),
        ),
        TriggerTool::CompanyFreeCashFlow => {
            render_trigger(control.company_free_cash_flow(request).await)
        }
    }
}

/// Renders a tool outcome, adding the remediation hint where the failure
/// points at configuration or the upstream service.
fn render_trigger<T: Serialize>(result: Result<T, ToolError>) -> String {
    match result {
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::Config | ErrorKind::Transport | ErrorKind::Unexpected
            ) =>
        {
            render_error(&err.to_document().with_note(API_KEY_NOTE))
        }
        other => render_result(&other),
    }
}
