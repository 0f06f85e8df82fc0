//! Static tool registry.

use rmcp::model::{JsonObject, Tool};
use serde_json::json;
use std::sync::Arc;

/// Name of the only tool this server exposes.
pub const GET_SALES_TOTAL: &str = "get_sales_total";

const GET_SALES_TOTAL_DESCRIPTION: &str = "Get the total sales for the current month";

/// All tools, in advertised order. Always returns the same value.
#[must_use]
pub fn list_tools() -> Vec<Tool> {
    vec![get_sales_total_tool()]
}

fn get_sales_total_tool() -> Tool {
    let schema = json!({
        "type": "object",
        "properties": {
            "accountName": {
                "type": "string",
                "description": "Name of the account",
                "default": "None"
            }
        }
    });
    let schema_obj = schema.as_object().cloned().unwrap_or_else(JsonObject::new);
    Tool::new(
        GET_SALES_TOTAL,
        GET_SALES_TOTAL_DESCRIPTION,
        Arc::new(schema_obj),
    )
}
