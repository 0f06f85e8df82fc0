//! Revenue Labs MCP server.
//!
//! Exposes a single tool, `get_sales_total`, that forwards its `accountName` argument to the
//! Revenue Labs sales API and returns the response text untouched.

pub mod config;
pub mod error;
pub mod invoker;
pub mod logging;
pub mod registry;
pub mod sales_api;
pub mod server;

pub use invoker::ToolInvoker;
pub use sales_api::{SalesApiClient, SalesTotalSource};
pub use server::SalesToolServer;
