use anyhow::Context as _;
use std::process::Stdio;
use tokio::process::{Child, Command};

pub use revenue_labs_test_support::{StubSalesApi, pick_unused_port};

/// Environment knobs the server reads; cleared so the parent environment can't leak in.
const SERVER_ENV: &[&str] = &[
    "API_KEY",
    "ALLOW_MISSING_API_KEY",
    "SALES_API_URL",
    "SALES_API_TIMEOUT_SECS",
    "LOG_FORMAT",
    "RUST_LOG",
];

/// Server command with a clean environment and piped stdio. Killed when the child handle drops.
pub fn server_command(api_key: Option<&str>, sales_api_url: &str) -> Command {
    let bin = env!("CARGO_BIN_EXE_revenue-labs-mcp-server");
    let mut cmd = Command::new(bin);
    for var in SERVER_ENV {
        cmd.env_remove(var);
    }
    if let Some(key) = api_key {
        cmd.env("API_KEY", key);
    }
    cmd.env("SALES_API_URL", sales_api_url)
        .env("LOG_LEVEL", "debug")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    cmd
}

pub fn spawn_server(api_key: Option<&str>, sales_api_url: &str) -> anyhow::Result<Child> {
    server_command(api_key, sales_api_url)
        .spawn()
        .context("spawn revenue-labs-mcp-server")
}
