//! Command-line / environment configuration.

use crate::error::{AdapterError, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Fixed upstream endpoint for the sales-total lookup.
pub const DEFAULT_SALES_API_URL: &str = "https://api.revenuelabs.co/mcp/get_sales_total";

/// Value sent as `X-API-Key` when the key is missing and the legacy fallback is enabled.
pub const MISSING_API_KEY_SENTINEL: &str = "undefined";

/// Process exit status for any startup failure, including unparsable flags or env values.
pub const STARTUP_FAILURE_EXIT_CODE: i32 = 1;

/// `--help` / `--version` output surfaces as a clap "error"; those are not startup failures.
#[must_use]
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Revenue Labs MCP server (stdio).
#[derive(Debug, Clone, Parser)]
#[command(name = "revenue-labs-mcp-server", version, about)]
pub struct Cli {
    /// API key sent to the sales API in the `X-API-Key` header.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Start even when no API key is configured, sending the literal `undefined` instead.
    #[arg(long, env = "ALLOW_MISSING_API_KEY")]
    pub allow_missing_api_key: bool,

    /// Sales-total endpoint URL.
    #[arg(long, env = "SALES_API_URL", default_value = DEFAULT_SALES_API_URL)]
    pub sales_api_url: String,

    /// Per-request timeout in seconds (0 = no timeout).
    #[arg(long, env = "SALES_API_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (logs always go to stderr).
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Resolve the outbound sales API configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is not a valid `http(s)` URL, or if no API key is
    /// set and `--allow-missing-api-key` was not given.
    pub fn sales_api_config(&self) -> Result<SalesApiConfig> {
        let url = parse_sales_api_url(&self.sales_api_url)?;

        let api_key = match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => ApiKey::new(key),
            _ if self.allow_missing_api_key => {
                tracing::warn!(
                    "API_KEY is not set; sending the literal '{MISSING_API_KEY_SENTINEL}' as X-API-Key"
                );
                ApiKey::new(MISSING_API_KEY_SENTINEL)
            }
            _ => {
                return Err(AdapterError::Config(
                    "API_KEY is not set (pass --api-key, or --allow-missing-api-key to send 'undefined')"
                        .to_string(),
                ));
            }
        };

        let timeout = match self.request_timeout_secs {
            None | Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        };

        Ok(SalesApiConfig {
            url,
            api_key,
            timeout,
        })
    }
}

fn parse_sales_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        AdapterError::Config(format!("Invalid sales API URL '{raw}': {e}"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AdapterError::Config(format!(
            "Invalid sales API URL '{raw}': unsupported scheme '{other}'"
        ))),
    }
}

/// Resolved configuration for the outbound sales-total call. Immutable once built.
#[derive(Debug, Clone)]
pub struct SalesApiConfig {
    pub url: Url,
    pub api_key: ApiKey,
    /// `None` = rely on the HTTP client's defaults (no overall timeout).
    pub timeout: Option<Duration>,
}

impl SalesApiConfig {
    /// Config pointing at `url` with no timeout.
    #[must_use]
    pub fn new(url: Url, api_key: impl Into<String>) -> Self {
        Self {
            url,
            api_key: ApiKey::new(api_key),
            timeout: None,
        }
    }
}

/// API key wrapper that keeps the secret out of `Debug` output and logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
