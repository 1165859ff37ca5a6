use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{
    CURRENCY_USD,
    DATA_SOURCE_ALPHA_VANTAGE,
    FREE_CASH_FLOW_CALCULATION,
    SERVICE_NAME,
    STATUS_ERROR,
    STATUS_HEALTHY,
};

/// Company tickers the tools are allowed to look up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompanySymbol {
    Msft,
    Tsla,
    Nvda,
}

impl CompanySymbol {
    pub const ALL: [Self; 3] = [Self::Msft, Self::Tsla, Self::Nvda];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Msft => "MSFT",
            Self::Tsla => "TSLA",
            Self::Nvda => "NVDA",
        }
    }

    /// Comma separated list of supported tickers, in declaration order.
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|symbol| symbol.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CompanySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSymbol(pub String);

impl fmt::Display for UnknownSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported company symbol: {}", self.0)
    }
}

impl Error for UnknownSymbol {}

impl FromStr for CompanySymbol {
    type Err = UnknownSymbol;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let upper = value.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|symbol| symbol.as_str() == upper)
            .ok_or(UnknownSymbol(upper))
    }
}

/// Statement families requested from the upstream feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    IncomeStatement,
    CashFlow,
}

impl ReportType {
    /// Value of the upstream `function` query parameter.
    #[must_use]
    pub const fn function(self) -> &'static str {
        match self {
            Self::IncomeStatement => "INCOME_STATEMENT",
            Self::CashFlow => "CASH_FLOW",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function())
    }
}

/// Requested fiscal year and quarter. The quarter is always 1 through 4.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FiscalPeriod {
    pub fiscal_year: i32,
    pub fiscal_quarter: u8,
}

impl FiscalPeriod {
    /// Builds a period, rejecting quarters outside 1..=4.
    #[must_use]
    pub fn new(fiscal_year: i32, fiscal_quarter: i64) -> Option<Self> {
        let fiscal_quarter = u8::try_from(fiscal_quarter).ok()?;
        (1..=4).contains(&fiscal_quarter).then_some(Self {
            fiscal_year,
            fiscal_quarter,
        })
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{} Q{}", self.fiscal_year, self.fiscal_quarter)
    }
}

/// One quarterly statement as delivered by the upstream feed.
///
/// Monetary fields are decimal strings and may be absent or the literal
/// `"None"`. Fields the tools never read are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_date_ending: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_cashflow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital_expenditures: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuarterlyReport {
    #[must_use]
    pub fn ending(fiscal_date_ending: impl Into<String>) -> Self {
        Self {
            fiscal_date_ending: Some(fiscal_date_ending.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_total_revenue(mut self, value: impl Into<String>) -> Self {
        self.total_revenue = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_operating_cashflow(mut self, value: impl Into<String>) -> Self {
        self.operating_cashflow = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_capital_expenditures(mut self, value: impl Into<String>) -> Self {
        self.capital_expenditures = Some(value.into());
        self
    }
}

/// Envelope returned by the upstream statement endpoints.
///
/// When throttled or misconfigured the feed answers 200 with one of the
/// advisory fields set and no reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuarterlyReportsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "quarterlyReports", default)]
    pub quarterly_reports: Vec<QuarterlyReport>,
    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "Information", default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[serde(rename = "Error Message", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl QuarterlyReportsResponse {
    #[must_use]
    pub const fn from_reports(quarterly_reports: Vec<QuarterlyReport>) -> Self {
        Self {
            symbol: None,
            quarterly_reports,
            note: None,
            information: None,
            error_message: None,
        }
    }

    /// First advisory message the feed attached, if any.
    #[must_use]
    pub fn advisory(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.information.as_deref())
            .or(self.note.as_deref())
    }
}

/// Revenue lookup result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevenueReport {
    pub company: CompanySymbol,
    pub fiscal_year: i32,
    pub fiscal_quarter: u8,
    pub fiscal_date_ending: Option<String>,
    pub total_revenue_usd_millions: f64,
    pub currency: String,
    pub data_source: String,
    pub exact_match: bool,
    /// `totalRevenue` exactly as the statement carried it.
    #[serde(skip)]
    pub raw_total_revenue: Option<String>,
}

impl RevenueReport {
    #[must_use]
    pub fn new(
        company: CompanySymbol,
        period: FiscalPeriod,
        fiscal_date_ending: Option<String>,
        total_revenue_usd_millions: f64,
        exact_match: bool,
    ) -> Self {
        Self {
            company,
            fiscal_year: period.fiscal_year,
            fiscal_quarter: period.fiscal_quarter,
            fiscal_date_ending,
            total_revenue_usd_millions,
            currency: CURRENCY_USD.to_string(),
            data_source: DATA_SOURCE_ALPHA_VANTAGE.to_string(),
            exact_match,
            raw_total_revenue: None,
        }
    }

    #[must_use]
    pub fn with_raw_total_revenue(mut self, raw_total_revenue: Option<String>) -> Self {
        self.raw_total_revenue = raw_total_revenue;
        self
    }
}

/// Free cash flow figures in USD millions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CashFlowFigures {
    pub free_cash_flow: f64,
    pub operating_cash_flow: f64,
    pub capital_expenditures: f64,
}

/// Free cash flow lookup result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreeCashFlowReport {
    pub company: CompanySymbol,
    pub fiscal_year: i32,
    pub fiscal_quarter: u8,
    pub fiscal_date_ending: Option<String>,
    pub free_cash_flow_usd_millions: f64,
    pub operating_cash_flow_usd_millions: f64,
    pub capital_expenditures_usd_millions: f64,
    pub currency: String,
    pub data_source: String,
    pub calculation: String,
    pub exact_match: bool,
}

impl FreeCashFlowReport {
    #[must_use]
    pub fn new(
        company: CompanySymbol,
        period: FiscalPeriod,
        fiscal_date_ending: Option<String>,
        figures: CashFlowFigures,
        exact_match: bool,
    ) -> Self {
        Self {
            company,
            fiscal_year: period.fiscal_year,
            fiscal_quarter: period.fiscal_quarter,
            fiscal_date_ending,
            free_cash_flow_usd_millions: figures.free_cash_flow,
            operating_cash_flow_usd_millions: figures.operating_cash_flow,
            capital_expenditures_usd_millions: figures.capital_expenditures,
            currency: CURRENCY_USD.to_string(),
            data_source: DATA_SOURCE_ALPHA_VANTAGE.to_string(),
            calculation: FREE_CASH_FLOW_CALCULATION.to_string(),
            exact_match,
        }
    }
}

/// Error document returned to tool callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDocument {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ErrorDocument {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: message.into(),
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Liveness payload served on `/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: STATUS_HEALTHY.to_string(),
            service: SERVICE_NAME.to_string(),
        }
    }
}
