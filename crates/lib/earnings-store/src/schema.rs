pub const FIELD_FISCAL_DATE_ENDING: &str = "fiscalDateEnding";
pub const FIELD_TOTAL_REVENUE: &str = "totalRevenue";
pub const FIELD_OPERATING_CASHFLOW: &str = "operatingCashflow";
pub const FIELD_CAPITAL_EXPENDITURES: &str = "capitalExpenditures";

/// Literal the upstream feed uses for a missing numeric value.
pub const NONE_LITERAL: &str = "None";

pub const CURRENCY_USD: &str = "USD";
pub const DATA_SOURCE_ALPHA_VANTAGE: &str = "Alpha Vantage";
pub const FREE_CASH_FLOW_CALCULATION: &str = "Operating Cash Flow - Capital Expenditures";

pub const STATUS_ERROR: &str = "error";
pub const STATUS_HEALTHY: &str = "healthy";
pub const SERVICE_NAME: &str = "mcp-finance-server";

pub const TOOL_COMPANY_REVENUE: &str = "get_company_revenue";
pub const TOOL_COMPANY_FREE_CASH_FLOW: &str = "get_company_free_cash_flow";

pub const DEFAULT_COMPANY_SYMBOL: &str = "MSFT";
pub const DEFAULT_FISCAL_YEAR: i32 = 2024;
pub const DEFAULT_FISCAL_QUARTER: i64 = 4;

pub const USD_PER_MILLION: f64 = 1_000_000.0;
