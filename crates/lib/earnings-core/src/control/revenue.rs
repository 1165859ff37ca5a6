use earnings_store::models::{ReportType, RevenueReport};
use earnings_store::schema::TOOL_COMPANY_REVENUE;
use tracing::{info, warn};

use crate::fiscal::find_report;
use crate::metrics::revenue_usd_millions;

use super::{EarningsControlPlane, ToolError, ToolRequest, log_failure};

impl EarningsControlPlane {
    /// Resolves total revenue for a company and fiscal period.
    ///
    /// Input is validated before the income statements are fetched.
    ///
    /// # Errors
    /// Returns `ToolError` for invalid input, upstream failures, missing data
    /// or unreadable statement values.
    pub async fn company_revenue(&self, request: &ToolRequest) -> Result<RevenueReport, ToolError> {
        self.resolve_revenue(request)
            .await
            .inspect_err(|err| log_failure(TOOL_COMPANY_REVENUE, err))
    }

    async fn resolve_revenue(&self, request: &ToolRequest) -> Result<RevenueReport, ToolError> {
        let (symbol, period) = request.validate()?;
        let reports = self
            .load_reports(ReportType::IncomeStatement, symbol)
            .await?;
        if reports.is_empty() {
            return Err(ToolError::NoData("No quarterly data available".to_string()));
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

        let revenue = revenue_usd_millions(matched.report)?;
        info!("Revenue for {symbol} {period}: ${revenue}M");
        Ok(RevenueReport::new(
            symbol,
            period,
            fiscal_date_ending,
            revenue,
            matched.exact,
        )
        .with_raw_total_revenue(matched.report.total_revenue.clone()))
    }
}
