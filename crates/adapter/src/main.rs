use anyhow::Context as _;
use clap::Parser as _;
use revenue_labs_mcp_server::config::{self, Cli, STARTUP_FAILURE_EXIT_CODE};
use revenue_labs_mcp_server::error::AdapterError;
use revenue_labs_mcp_server::sales_api::redact_url;
use revenue_labs_mcp_server::{SalesApiClient, SalesToolServer, logging};
use rmcp::ServiceExt as _;
use rmcp::transport::stdio;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if config::is_informational(&e) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(STARTUP_FAILURE_EXIT_CODE);
        }
    };
    logging::init(&cli.log_level, cli.log_format)?;

    if let Err(e) = run(cli).await {
        error!(error = %e, "Fatal error running server");
        return Err(e);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.sales_api_config()?;
    info!(url = %redact_url(&config.url), timeout = ?config.timeout, "sales API configured");

    let client = SalesApiClient::new(config).map_err(AdapterError::from)?;
    let server = SalesToolServer::new(Arc::new(client));

    let service = server
        .serve(stdio())
        .await
        .map_err(|e| AdapterError::Startup(format!("stdio transport: {e}")))?;
    // Emitted once the initialize handshake has completed.
    info!("Revenue Labs MCP Server is running over stdio");

    let reason = service.waiting().await.context("MCP service task")?;
    info!(?reason, "MCP session closed");
    Ok(())
}
