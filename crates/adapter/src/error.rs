//! Error types for the MCP server.

use thiserror::Error;

/// Startup-time errors. Any of these is fatal for the process.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Configuration errors (missing API key, invalid URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup errors (stdio transport failed to initialize)
    #[error("Startup error: {0}")]
    Startup(String),

    /// Sales API client could not be built
    #[error("Sales API error: {0}")]
    SalesApi(#[from] SalesApiError),
}

/// Result type alias for startup operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors raised by the outbound sales-total call.
///
/// The `Display` output is the bare message: it becomes the text of the tool error envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SalesApiError {
    /// Connection, timeout or body read failure.
    #[error("{0}")]
    Transport(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Per-invocation tool failures, reported to callers as `isError = true` results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolCallError {
    #[error("No arguments provided")]
    MissingArguments,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for tool {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Upstream(#[from] SalesApiError),
}
