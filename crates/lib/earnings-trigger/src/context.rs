//! Tool-trigger context parsing.
//!
//! A trigger delivers `{"arguments": {...}}`, either as a JSON object or as a
//! JSON string holding one. Arguments are looser than the MCP surface:
//! missing values take defaults and integers may arrive as strings.

use std::error::Error;
use std::fmt;

use earnings_core::control::ToolRequest;
use earnings_store::schema::{
    DEFAULT_COMPANY_SYMBOL,
    DEFAULT_FISCAL_QUARTER,
    DEFAULT_FISCAL_YEAR,
};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    Malformed(String),
    InvalidArgument { name: &'static str, value: String },
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed trigger context: {message}"),
            Self::InvalidArgument { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ContextError {}

/// Parses a raw trigger body into a tool request.
///
/// # Errors
/// Returns `ContextError` if the body is not a JSON object (directly or
/// string-encoded) or an argument has the wrong shape.
pub fn parse_trigger_context(body: &str) -> Result<ToolRequest, ContextError> {
    let mut context: Value = if body.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str(body).map_err(|err| ContextError::Malformed(err.to_string()))?
    };
    if let Value::String(encoded) = &context {
        context = serde_json::from_str(encoded)
            .map_err(|err| ContextError::Malformed(err.to_string()))?;
    }

    let Value::Object(mut context) = context else {
        return Err(ContextError::Malformed(
            "context must be a JSON object".to_string(),
        ));
    };
    let arguments = match context.remove("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(arguments)) => arguments,
        Some(other) => {
            return Err(ContextError::Malformed(format!(
                "arguments must be an object, got {other}"
            )));
        }
    };

    request_from_arguments(&arguments)
}

fn request_from_arguments(arguments: &Map<String, Value>) -> Result<ToolRequest, ContextError> {
    let company_symbol = match arguments.get("company_symbol") {
        None | Some(Value::Null) => DEFAULT_COMPANY_SYMBOL.to_string(),
        Some(Value::String(symbol)) => symbol.clone(),
        Some(other) => {
            return Err(ContextError::InvalidArgument {
                name: "company_symbol",
                value: other.to_string(),
            });
        }
    };

    let fiscal_year = integer_argument(arguments, "fiscal_year", i64::from(DEFAULT_FISCAL_YEAR))?;
    let fiscal_year = i32::try_from(fiscal_year).map_err(|_| ContextError::InvalidArgument {
        name: "fiscal_year",
        value: fiscal_year.to_string(),
    })?;
    let fiscal_quarter = integer_argument(arguments, "fiscal_quarter", DEFAULT_FISCAL_QUARTER)?;

    Ok(ToolRequest::new(company_symbol)
        .with_fiscal_year(fiscal_year)
        .with_fiscal_quarter(fiscal_quarter))
}

#[allow(clippy::cast_possible_truncation)]
fn integer_argument(
    arguments: &Map<String, Value>,
    name: &'static str,
    default: i64,
) -> Result<i64, ContextError> {
    let invalid = |value: &Value| ContextError::InvalidArgument {
        name,
        value: value.to_string(),
    };

    let Some(value) = arguments.get(name).filter(|value| !value.is_null()) else {
        return Ok(default);
    };
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float.trunc() as i64))
            .ok_or_else(|| invalid(value)),
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| invalid(value)),
        _ => Err(invalid(value)),
    }
}
