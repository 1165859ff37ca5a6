use earnings_core::control::{ToolError, ToolRequest, render_error, render_result};
use earnings_store::schema::{
    DEFAULT_FISCAL_QUARTER,
    DEFAULT_FISCAL_YEAR,
    TOOL_COMPANY_FREE_CASH_FLOW,
    TOOL_COMPANY_REVENUE,
};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::EarningsMcp;

/// Parameters shared by the revenue and free cash flow tools.
///
/// Year and quarter are read as JSON numbers so that fractional or oversized
/// values reach validation and come back as error documents.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CompanyMetricParams {
    /// Company ticker symbol (MSFT, TSLA, or NVDA).
    pub company_symbol: String,
    /// Fiscal year (e.g., 2024).
    #[serde(default = "default_fiscal_year")]
    #[schemars(with = "i64")]
    pub fiscal_year: f64,
    /// Fiscal quarter (1, 2, 3, or 4).
    #[serde(default = "default_fiscal_quarter")]
    #[schemars(with = "i64")]
    pub fiscal_quarter: f64,
}

fn default_fiscal_year() -> f64 {
    f64::from(DEFAULT_FISCAL_YEAR)
}

#[allow(clippy::cast_precision_loss)]
const fn default_fiscal_quarter() -> f64 {
    DEFAULT_FISCAL_QUARTER as f64
}

impl TryFrom<CompanyMetricParams> for ToolRequest {
    type Error = ToolError;

    fn try_from(params: CompanyMetricParams) -> Result<Self, Self::Error> {
        Self::from_json_numbers(params.company_symbol, params.fiscal_year, params.fiscal_quarter)
    }
}

fn rejected_document(tool: &str, err: &ToolError) -> String {
    debug!("{tool} rejected input: {err}");
    render_error(&err.to_document())
}

impl EarningsMcp {
    /// Renders the revenue document for a request.
    pub async fn revenue_document(&self, request: &ToolRequest) -> String {
        render_result(&self.control.company_revenue(request).await)
    }

    /// Renders the free cash flow document for a request.
    pub async fn free_cash_flow_document(&self, request: &ToolRequest) -> String {
        render_result(&self.control.company_free_cash_flow(request).await)
    }

    async fn revenue_tool_document(&self, params: CompanyMetricParams) -> String {
        match ToolRequest::try_from(params) {
            Ok(request) => self.revenue_document(&request).await,
            Err(err) => rejected_document(TOOL_COMPANY_REVENUE, &err),
        }
    }

    async fn free_cash_flow_tool_document(&self, params: CompanyMetricParams) -> String {
        match ToolRequest::try_from(params) {
            Ok(request) => self.free_cash_flow_document(&request).await,
            Err(err) => rejected_document(TOOL_COMPANY_FREE_CASH_FLOW, &err),
        }
    }
}

#[tool_router(router = tool_router_earnings, vis = "pub")]
impl EarningsMcp {
    #[tool(description = "Get total revenue in USD millions for a company's quarterly earnings report. Returns JSON with total_revenue_usd_millions.")]
    async fn get_company_revenue(
        &self,
        Parameters(params): Parameters<CompanyMetricParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let document = self.revenue_tool_document(params).await;
        Ok(CallToolResult::success(vec![Content::text(document)]))
    }

    #[tool(description = "Get free cash flow in USD millions for a company's quarterly earnings report. Free Cash Flow = Operating Cash Flow - Capital Expenditures.")]
    async fn get_company_free_cash_flow(
        &self,
        Parameters(params): Parameters<CompanyMetricParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let document = self.free_cash_flow_tool_document(params).await;
        Ok(CallToolResult::success(vec![Content::text(document)]))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use earnings_core::control::EarningsControlPlane;
    use earnings_core::source::{FetchFuture, ReportSource};
    use earnings_store::models::{
        CompanySymbol,
        QuarterlyReport,
        QuarterlyReportsResponse,
        ReportType,
    };
    use serde_json::{Value, json};

    use super::*;

    struct FixedSource {
        reports: Vec<QuarterlyReport>,
        calls: Arc<AtomicUsize>,
    }

    impl ReportSource for FixedSource {
        fn fetch_quarterly_reports(
            &self,
            _report_type: ReportType,
            _symbol: CompanySymbol,
        ) -> FetchFuture<'_> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = QuarterlyReportsResponse::from_reports(self.reports.clone());
            Box::pin(async move { Ok(response) })
        }
    }

    fn server_with(reports: Vec<QuarterlyReport>) -> (EarningsMcp, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FixedSource {
            reports,
            calls: calls.clone(),
        };
        (
            EarningsMcp::new(EarningsControlPlane::from_source(source)),
            calls,
        )
    }

    #[test]
    fn params_default_to_latest_fiscal_quarter() {
        let params: CompanyMetricParams =
            serde_json::from_value(json!({ "company_symbol": "tsla" })).expect("params parse");
        let request = ToolRequest::try_from(params).expect("defaults are valid");

        assert_eq!(request.company_symbol, "tsla");
        assert_eq!(request.fiscal_year, 2024);
        assert_eq!(request.fiscal_quarter, 4);
    }

    #[tokio::test]
    async fn revenue_document_reports_millions() {
        let (server, calls) = server_with(vec![
            QuarterlyReport::ending("2024-06-30").with_total_revenue("64727000000"),
        ]);

        let document = server
            .revenue_document(&ToolRequest::new("MSFT"))
            .await;
        let value: Value = serde_json::from_str(&document).expect("document is json");

        assert_eq!(value["company"], "MSFT");
        assert_eq!(value["fiscal_date_ending"], "2024-06-30");
        assert_eq!(value["total_revenue_usd_millions"], 64727.0);
        assert_eq!(value["exact_match"], true);
        assert!(value.get("raw_revenue").is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_symbol_renders_error_without_fetch() {
        let (server, calls) = server_with(Vec::new());

        let document = server
            .free_cash_flow_document(&ToolRequest::new("GOOG"))
            .await;

        assert_eq!(
            document,
            "{\n  \"status\": \"error\",\n  \"message\": \"Invalid company symbol. Supported: MSFT, TSLA, NVDA\"\n}"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn free_cash_flow_document_lists_inputs() {
        let (server, _calls) = server_with(vec![
            QuarterlyReport::ending("2024-07-31")
                .with_operating_cashflow("500000000")
                .with_capital_expenditures("-100000000"),
        ]);

        let document = server
            .free_cash_flow_document(&ToolRequest::new("nvda"))
            .await;
        let value: Value = serde_json::from_str(&document).expect("document is json");

        assert_eq!(value["company"], "NVDA");
        assert_eq!(value["free_cash_flow_usd_millions"], 400.0);
        assert_eq!(value["operating_cash_flow_usd_millions"], 500.0);
        assert_eq!(value["capital_expenditures_usd_millions"], 100.0);
        assert_eq!(value["currency"], "USD");
    }

    fn params(value: Value) -> CompanyMetricParams {
        serde_json::from_value(value).expect("params parse")
    }

    #[tokio::test]
    async fn fractional_quarter_renders_validation_error() {
        let (server, calls) = server_with(Vec::new());

        let document = server
            .revenue_tool_document(params(
                json!({ "company_symbol": "MSFT", "fiscal_quarter": 4.5 }),
            ))
            .await;

        assert_eq!(
            document,
            "{\n  \"status\": \"error\",\n  \"message\": \"Fiscal quarter must be 1, 2, 3, or 4\"\n}"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oversized_numbers_render_validation_errors() {
        let (server, calls) = server_with(Vec::new());

        let quarter = server
            .free_cash_flow_tool_document(params(
                json!({ "company_symbol": "MSFT", "fiscal_quarter": 1e20 }),
            ))
            .await;
        let year = server
            .revenue_tool_document(params(
                json!({ "company_symbol": "MSFT", "fiscal_year": 1e12 }),
            ))
            .await;

        let quarter: Value = serde_json::from_str(&quarter).expect("document is json");
        let year: Value = serde_json::from_str(&year).expect("document is json");
        assert_eq!(quarter["message"], "Fiscal quarter must be 1, 2, 3, or 4");
        assert_eq!(year["message"], "Fiscal year must be a whole number");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn symbol_is_checked_before_numbers() {
        let (server, _calls) = server_with(Vec::new());

        let document = server
            .revenue_tool_document(params(
                json!({ "company_symbol": "GOOG", "fiscal_quarter": 4.5 }),
            ))
            .await;
        let value: Value = serde_json::from_str(&document).expect("document is json");

        assert_eq!(
            value["message"],
            "Invalid company symbol. Supported: MSFT, TSLA, NVDA"
        );
    }

    #[tokio::test]
    async fn integral_floats_are_accepted() {
        let (server, calls) = server_with(vec![
            QuarterlyReport::ending("2024-06-30").with_total_revenue("64727000000"),
        ]);

        let document = server
            .revenue_tool_document(params(
                json!({ "company_symbol": "MSFT", "fiscal_year": 2024.0, "fiscal_quarter": 4.0 }),
            ))
            .await;
        let value: Value = serde_json::from_str(&document).expect("document is json");

        assert_eq!(value["fiscal_year"], 2024);
        assert_eq!(value["fiscal_quarter"], 4);
        assert_eq!(value["exact_match"], true);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
