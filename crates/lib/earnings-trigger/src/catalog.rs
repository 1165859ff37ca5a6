//! Tool metadata advertised to the trigger host.

use earnings_store::schema::{TOOL_COMPANY_FREE_CASH_FLOW, TOOL_COMPANY_REVENUE};
use serde::{Deserialize, Serialize};

/// One argument of a trigger tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolProperty {
    pub property_name: String,
    pub property_type: String,
    pub description: String,
}

impl ToolProperty {
    fn new(property_name: &str, property_type: &str, description: &str) -> Self {
        Self {
            property_name: property_name.to_string(),
            property_type: property_type.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub tool_name: String,
    pub description: String,
    pub tool_properties: Vec<ToolProperty>,
}

fn metric_properties() -> Vec<ToolProperty> {
    vec![
        ToolProperty::new(
            "company_symbol",
            "string",
            "Company ticker symbol (MSFT, TSLA, or NVDA)",
        ),
        ToolProperty::new("fiscal_year", "number", "Fiscal year (e.g., 2024)"),
        ToolProperty::new("fiscal_quarter", "number", "Fiscal quarter (1, 2, 3, or 4)"),
    ]
}

/// Tools exposed through the trigger adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTool {
    CompanyRevenue,
    CompanyFreeCashFlow,
}

impl TriggerTool {
    pub const ALL: [Self; 2] = [Self::CompanyRevenue, Self::CompanyFreeCashFlow];

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CompanyRevenue => TOOL_COMPANY_REVENUE,
            Self::CompanyFreeCashFlow => TOOL_COMPANY_FREE_CASH_FLOW,
        }
    }

    #[must_use]
    pub fn definition(self) -> ToolDefinition {
        let description = match self {
            Self::CompanyRevenue => {
                "Get total revenue in USD millions for a given company's quarterly earnings report"
            }
            Self::CompanyFreeCashFlow => {
                "Get free cash flow in USD millions for a given company's quarterly earnings report"
            }
        };
        ToolDefinition {
            tool_name: self.name().to_string(),
            description: description.to_string(),
            tool_properties: metric_properties(),
        }
    }
}

#[must_use]
pub fn tool_catalog() -> Vec<ToolDefinition> {
    TriggerTool::ALL.into_iter().map(TriggerTool::definition).collect()
}
