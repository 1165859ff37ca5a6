//! Metric extraction from matched quarterly statements.

use std::error::Error;
use std::fmt;

use earnings_store::models::{CashFlowFigures, QuarterlyReport};
use earnings_store::schema::{
    FIELD_CAPITAL_EXPENDITURES,
    FIELD_OPERATING_CASHFLOW,
    FIELD_TOTAL_REVENUE,
    NONE_LITERAL,
    USD_PER_MILLION,
};

/// A statement field held a value that is not a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricError {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for MetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid numeric value for {}: '{}'", self.field, self.value)
    }
}

impl Error for MetricError {}

/// Parses a monetary field. Absent, empty and `"None"` values read as zero.
///
/// # Errors
/// Returns `MetricError` when a present value cannot be parsed.
pub fn parse_amount(field: &'static str, value: Option<&str>) -> Result<f64, MetricError> {
    let Some(raw) = value else {
        return Ok(0.0);
    };
    if raw.is_empty() || raw == NONE_LITERAL {
        return Ok(0.0);
    }
    raw.trim().parse::<f64>().map_err(|_| MetricError {
        field,
        value: raw.to_string(),
    })
}

/// Rounds to two decimal places, ties away from zero.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a USD amount to rounded USD millions.
#[must_use]
pub fn usd_millions(value: f64) -> f64 {
    round_cents(value / USD_PER_MILLION)
}

/// Total revenue in USD millions.
///
/// # Errors
/// Returns `MetricError` if `totalRevenue` is not numeric.
pub fn revenue_usd_millions(report: &QuarterlyReport) -> Result<f64, MetricError> {
    let revenue = parse_amount(FIELD_TOTAL_REVENUE, report.total_revenue.as_deref())?;
    Ok(usd_millions(revenue))
}

/// Free cash flow and its inputs in USD millions.
///
/// Capital expenditures are taken as an absolute value before subtraction,
/// whatever sign the feed reports them with.
///
/// # Errors
/// Returns `MetricError` if either input field is not numeric.
pub fn free_cash_flow(report: &QuarterlyReport) -> Result<CashFlowFigures, MetricError> {
    let operating = parse_amount(
        FIELD_OPERATING_CASHFLOW,
        report.operating_cashflow.as_deref(),
    )?;
    let capex = parse_amount(
        FIELD_CAPITAL_EXPENDITURES,
        report.capital_expenditures.as_deref(),
    )?
    .abs();

    Ok(CashFlowFigures {
        free_cash_flow: usd_millions(operating - capex),
        operating_cash_flow: usd_millions(operating),
        capital_expenditures: usd_millions(capex),
    })
}
