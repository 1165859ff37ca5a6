//! MCP server implementation for earnings-mcp.
//!
//! This crate wires the earnings control plane into rmcp tool handlers and
//! exposes the MCP-facing API surface for revenue and free cash flow lookups.

mod tools;
pub mod server;

use earnings_core::control::EarningsControlPlane;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

pub use tools::earnings::CompanyMetricParams;

const SERVER_INSTRUCTIONS: &str = r#"earnings-mcp provides read-only quarterly earnings figures for MSFT, TSLA and NVDA, sourced from Alpha Vantage.

Tools:
- `get_company_revenue` returns `total_revenue_usd_millions` for a fiscal quarter.
- `get_company_free_cash_flow` returns `free_cash_flow_usd_millions` (operating cash flow minus capital
  expenditures) together with both inputs.

Arguments: `company_symbol` (MSFT, TSLA or NVDA), `fiscal_year` (default 2024), `fiscal_quarter` (1-4, default 4).

Notes:
- Fiscal quarters are inferred from the statement's period-end month (Sep/Oct = Q1, Dec/Jan = Q2,
  Mar/Apr = Q3, Jun/Jul = Q4).
- When no statement matches the requested period the most recent one is returned and `exact_match` is false.
- Failures return `{ "status": "error", "message": ... }`.
- `health` returns `ok`."#;

/// MCP server wrapper around the earnings control plane and tool routers.
#[derive(Clone)]
pub struct EarningsMcp {
    tool_router: ToolRouter<Self>,
    control: EarningsControlPlane,
}

impl EarningsMcp {
    /// Creates a new server over a control plane.
    #[must_use]
    pub fn new(control: EarningsControlPlane) -> Self {
        let tool_router = Self::tool_router_core() + Self::tool_router_earnings();
        Self {
            tool_router,
            control,
        }
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl EarningsMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for EarningsMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
