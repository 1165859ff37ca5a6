use earnings_store::models::{FreeCashFlowReport, ReportType};
use earnings_store::schema::TOOL_COMPANY_FREE_CASH_FLOW;
use tracing::{info, warn};

use crate::fiscal::find_report;
use crate::metrics::free_cash_flow;

use super::{EarningsControlPlane, ToolError, ToolRequest, log_failure};

impl EarningsControlPlane {
    /// Resolves free cash flow (operating cash flow minus capital
    /// expenditures) for a company and fiscal period.
    ///
    /// # Errors
    /// Returns `ToolError` for invalid input, upstream failures, missing data
    /// or unreadable statement values.
    pub async fn company_free_cash_flow(
        &self,
        request: &ToolRequest,
    ) -> Result<FreeCashFlowReport, ToolError> {
        self.resolve_free_cash_flow(request)
            .await
            .inspect_err(|err| log_failure(TOOL_COMPANY_FREE_CASH_FLOW, err))
    }

    async fn resolve_free_cash_flow(
        &self,
        request: &ToolRequest,
    ) -> Result<FreeCashFlowReport, ToolError> {
        let (symbol, period) = request.validate()?;
        let reports = self.load_reports(ReportType::CashFlow, symbol).await?;
        if reports.is_empty() {
            return Err(ToolError::NoData(
                "No quarterly cash flow data available".to_string(),
            ));
        }

        let matched = find_report(&reports, period.fiscal_year, period.fiscal_quarter)?
            .ok_or_else(|| ToolError::period_not_found(symbol, period))?;
        let fiscal_date_ending = matched.report.fiscal_date_ending.clone();
        if !matched.exact {
            warn!(
                "exact period not found for {symbol} {period}, using most recent: {}",
                fiscal_date_ending.as_deref().unwrap_or("unknown")
            );
        }

        let figures = free_cash_flow(matched.report)?;
        info!(
            "Free Cash Flow for {symbol} {period}: ${}M",
            figures.free_cash_flow
        );
        Ok(FreeCashFlowReport::new(
            symbol,
            period,
            fiscal_date_ending,
            figures,
            matched.exact,
        ))
    }
}
