//! JSON result documents returned by both tool adapters.

use earnings_store::models::ErrorDocument;
use serde::Serialize;

use super::ToolError;

/// Renders a tool outcome as a pretty-printed JSON document.
#[must_use]
pub fn render_result<T: Serialize>(result: &Result<T, ToolError>) -> String {
    match result {
        Ok(report) => to_pretty_json(report),
        Err(err) => render_error(&err.to_document()),
    }
}

#[must_use]
pub fn render_error(document: &ErrorDocument) -> String {
    to_pretty_json(document)
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        let fallback = serde_json::Value::String(err.to_string());
        format!("{{\n  \"status\": \"error\",\n  \"message\": {fallback}\n}}")
    })
}
