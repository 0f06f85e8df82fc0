//! MCP server handler: exposes the registry and invoker through `tools/list` and `tools/call`.

use crate::invoker::ToolInvoker;
use crate::registry;
use crate::sales_api::SalesTotalSource;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler};
use std::sync::Arc;
use tracing::{Instrument as _, info_span};

/// Name reported in `serverInfo` during `initialize`.
pub const SERVER_NAME: &str = "revenue-labs-mcp-server";

#[derive(Clone)]
pub struct SalesToolServer {
    invoker: ToolInvoker,
}

impl SalesToolServer {
    pub fn new(sales: Arc<dyn SalesTotalSource>) -> Self {
        Self {
            invoker: ToolInvoker::new(sales),
        }
    }
}

impl ServerHandler for SalesToolServer {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = SERVER_NAME.to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(registry::list_tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let span = info_span!("tool_call", tool = %request.name);
        Ok(self
            .invoker
            .call_tool(&request.name, request.arguments)
            .instrument(span)
            .await)
    }
}
