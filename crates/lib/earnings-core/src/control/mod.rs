use std::{error::Error, fmt, sync::Arc};

use earnings_store::models::{
    CompanySymbol,
    ErrorDocument,
    FiscalPeriod,
    QuarterlyReport,
    ReportType,
};
use earnings_store::schema::{DEFAULT_FISCAL_QUARTER, DEFAULT_FISCAL_YEAR};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::metrics::MetricError;
use crate::source::{ReportSource, SourceError};

pub mod cash_flow;
pub mod document;
pub mod revenue;

pub use document::{render_error, render_result};

/// Failure categories a tool call can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Transport,
    NoData,
    Config,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    Validation(String),
    Transport(String),
    NoData(String),
    Config(String),
    Unexpected(String),
}

impl ToolError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::NoData(_) => ErrorKind::NoData,
            Self::Config(_) => ErrorKind::Config,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::Transport(message)
            | Self::NoData(message)
            | Self::Config(message)
            | Self::Unexpected(message) => message,
        }
    }

    #[must_use]
    pub fn to_document(&self) -> ErrorDocument {
        ErrorDocument::new(self.message())
    }

    fn invalid_symbol() -> Self {
        Self::Validation(format!(
            "Invalid company symbol. Supported: {}",
            CompanySymbol::supported_list()
        ))
    }

    fn invalid_quarter() -> Self {
        Self::Validation("Fiscal quarter must be 1, 2, 3, or 4".to_string())
    }

    fn invalid_year() -> Self {
        Self::Validation("Fiscal year must be a whole number".to_string())
    }

    fn period_not_found(symbol: CompanySymbol, period: FiscalPeriod) -> Self {
        Self::NoData(format!("No data found for {symbol} {period}"))
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for ToolError {}

impl From<SourceError> for ToolError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::MissingCredential(name) => {
                Self::Config(format!("{name} environment variable is required"))
            }
            SourceError::Transport(message) => Self::Transport(format!("HTTP error: {message}")),
            SourceError::Decode(message) => Self::Unexpected(message),
        }
    }
}

impl From<MetricError> for ToolError {
    fn from(err: MetricError) -> Self {
        Self::Unexpected(err.to_string())
    }
}

/// Caller input shared by both tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolRequest {
    pub company_symbol: String,
    #[serde(default = "default_fiscal_year")]
    pub fiscal_year: i32,
    #[serde(default = "default_fiscal_quarter")]
    pub fiscal_quarter: i64,
}

impl ToolRequest {
    #[must_use]
    pub fn new(company_symbol: impl Into<String>) -> Self {
        Self {
            company_symbol: company_symbol.into(),
            fiscal_year: DEFAULT_FISCAL_YEAR,
            fiscal_quarter: DEFAULT_FISCAL_QUARTER,
        }
    }

    #[must_use]
    pub const fn with_fiscal_year(mut self, fiscal_year: i32) -> Self {
        self.fiscal_year = fiscal_year;
        self
    }

    #[must_use]
    pub const fn with_fiscal_quarter(mut self, fiscal_quarter: i64) -> Self {
        self.fiscal_quarter = fiscal_quarter;
        self
    }

    /// Builds a request from JSON numbers, which may arrive as floats.
    ///
    /// The symbol is checked first so an unsupported symbol is reported
    /// ahead of a malformed year or quarter, as in `validate`.
    ///
    /// # Errors
    /// Returns `ToolError::Validation` for an unsupported symbol, a year that
    /// is not a whole `i32`, or a quarter that is not a whole number.
    pub fn from_json_numbers(
        company_symbol: impl Into<String>,
        fiscal_year: f64,
        fiscal_quarter: f64,
    ) -> Result<Self, ToolError> {
        let request = Self::new(company_symbol);
        request
            .company_symbol
            .parse::<CompanySymbol>()
            .map_err(|_| ToolError::invalid_symbol())?;
        let fiscal_year = whole_number(fiscal_year)
            .and_then(|year| i32::try_from(year).ok())
            .ok_or_else(ToolError::invalid_year)?;
        let fiscal_quarter = whole_number(fiscal_quarter).ok_or_else(ToolError::invalid_quarter)?;
        Ok(request
            .with_fiscal_year(fiscal_year)
            .with_fiscal_quarter(fiscal_quarter))
    }

    /// Checks the symbol against the supported set, then the quarter range.
    ///
    /// # Errors
    /// Returns `ToolError::Validation` for an unsupported symbol or quarter.
    pub fn validate(&self) -> Result<(CompanySymbol, FiscalPeriod), ToolError> {
        let symbol = self
            .company_symbol
            .parse::<CompanySymbol>()
            .map_err(|_| ToolError::invalid_symbol())?;
        let period = FiscalPeriod::new(self.fiscal_year, self.fiscal_quarter)
            .ok_or_else(ToolError::invalid_quarter)?;
        Ok((symbol, period))
    }
}

/// 2^63, the first float above the `i64` range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Converts an integral float to `i64`, rejecting fractions and overflow.
#[allow(clippy::cast_possible_truncation)]
fn whole_number(value: f64) -> Option<i64> {
    let integral = value.is_finite() && value.fract() == 0.0;
    (integral && (-I64_LIMIT..I64_LIMIT).contains(&value)).then(|| value as i64)
}

const fn default_fiscal_year() -> i32 {
    DEFAULT_FISCAL_YEAR
}

const fn default_fiscal_quarter() -> i64 {
    DEFAULT_FISCAL_QUARTER
}

/// Tool facade over a report source.
#[derive(Clone)]
pub struct EarningsControlPlane {
    source: Arc<dyn ReportSource>,
}

impl EarningsControlPlane {
    #[must_use]
    pub fn new(source: Arc<dyn ReportSource>) -> Self {
        Self { source }
    }

    #[must_use]
    pub fn from_source<S: ReportSource + 'static>(source: S) -> Self {
        Self::new(Arc::new(source))
    }

    async fn load_reports(
        &self,
        report_type: ReportType,
        symbol: CompanySymbol,
    ) -> Result<Vec<QuarterlyReport>, ToolError> {
        let response = self
            .source
            .fetch_quarterly_reports(report_type, symbol)
            .await?;
        Ok(response.quarterly_reports)
    }
}

fn log_failure(tool: &str, err: &ToolError) {
    match err.kind() {
        ErrorKind::Validation => debug!("{tool} rejected input: {err}"),
        ErrorKind::NoData => warn!("{tool} found no data: {err}"),
        ErrorKind::Transport | ErrorKind::Config | ErrorKind::Unexpected => {
            error!("{tool} failed: {err}");
        }
    }
}
