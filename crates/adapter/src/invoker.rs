//! Tool invocation: argument validation, dispatch, and error normalization.
//!
//! Every call produces exactly one `CallToolResult`. Failures never surface as protocol errors;
//! they are reported as `isError: true` with the failure message as text.

use crate::error::ToolCallError;
use crate::registry::GET_SALES_TOTAL;
use crate::sales_api::SalesTotalSource;
use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Arguments accepted by `get_sales_total`.
///
/// The schema advertises a default of `"None"` for `accountName`, but no default is applied
/// here: an absent (or `null`) name is forwarded as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GetSalesTotalArgs {
    #[serde(default, rename = "accountName")]
    pub account_name: Option<String>,
}

/// A validated tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    GetSalesTotal(GetSalesTotalArgs),
}

impl ToolCall {
    /// Validate a raw `tools/call` request.
    ///
    /// Missing arguments are rejected before the name is looked at.
    ///
    /// # Errors
    ///
    /// Returns [`ToolCallError::MissingArguments`], [`ToolCallError::UnknownTool`], or
    /// [`ToolCallError::InvalidArguments`].
    pub fn parse(name: &str, arguments: Option<JsonObject>) -> Result<Self, ToolCallError> {
        let Some(arguments) = arguments else {
            return Err(ToolCallError::MissingArguments);
        };

        match name {
            GET_SALES_TOTAL => serde_json::from_value(Value::Object(arguments))
                .map(Self::GetSalesTotal)
                .map_err(|e| ToolCallError::InvalidArguments {
                    tool: GET_SALES_TOTAL.to_string(),
                    message: e.to_string(),
                }),
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }

    #[must_use]
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::GetSalesTotal(_) => GET_SALES_TOTAL,
        }
    }
}

/// Routes tool calls to their handlers. Stateless apart from the shared upstream source.
#[derive(Clone)]
pub struct ToolInvoker {
    sales: Arc<dyn SalesTotalSource>,
}

impl ToolInvoker {
    pub fn new(sales: Arc<dyn SalesTotalSource>) -> Self {
        Self { sales }
    }

    /// Validate and execute a call, returning the raw result text.
    ///
    /// # Errors
    ///
    /// Returns a [`ToolCallError`] for invalid requests or upstream transport failures.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<String, ToolCallError> {
        let call = ToolCall::parse(name, arguments)?;
        debug!(tool = call.tool_name(), "dispatching tool call");

        match call {
            ToolCall::GetSalesTotal(args) => Ok(self
                .sales
                .fetch_sales_total(args.account_name.as_deref())
                .await?),
        }
    }

    /// Execute a call and wrap the outcome into a tool result envelope.
    pub async fn call_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.invoke(name, arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                warn!(tool = %name, error = %e, "tool call failed");
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        }
    }
}
