//! Outbound call to the Revenue Labs sales-total endpoint.
//!
//! The response body is passed through untouched: no status check, no parsing. Only transport
//! failures are reported as errors.

use crate::config::SalesApiConfig;
use crate::error::SalesApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use url::Url;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Source of sales totals. Implemented by [`SalesApiClient`]; tests substitute stubs.
#[async_trait]
pub trait SalesTotalSource: Send + Sync {
    /// Fetch the raw sales-total response text for `account_name`.
    async fn fetch_sales_total(&self, account_name: Option<&str>)
    -> Result<String, SalesApiError>;
}

/// Wire body. `accountName` on the tool side maps to `account_name` upstream.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct SalesTotalRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) account_name: Option<&'a str>,
}

/// HTTP client for the sales-total endpoint.
///
/// Cheap to share: `reqwest::Client` is internally reference counted and the config is
/// read-only. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct SalesApiClient {
    client: Client,
    config: SalesApiConfig,
}

impl SalesApiClient {
    /// Build a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed (e.g. TLS backend
    /// initialization failure).
    pub fn new(config: SalesApiConfig) -> Result<Self, SalesApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SalesApiError::Client(describe_reqwest_error(&e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SalesTotalSource for SalesApiClient {
    async fn fetch_sales_total(
        &self,
        account_name: Option<&str>,
    ) -> Result<String, SalesApiError> {
        let body = SalesTotalRequest { account_name };

        let response = self
            .client
            .post(self.config.url.clone())
            .header(API_KEY_HEADER, self.config.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| SalesApiError::Transport(describe_reqwest_error(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SalesApiError::Transport(describe_reqwest_error(&e)))?;

        debug!(
            status = status.as_u16(),
            bytes = text.len(),
            "sales API responded"
        );
        Ok(text)
    }
}

/// Render `url` without credentials, query or fragment, for logs and error text.
#[must_use]
pub fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

/// Flatten a reqwest error and its source chain into one message, with the URL redacted.
///
/// reqwest's top-level message is generic ("error sending request for url ..."); the useful part
/// (connection refused, timed out, ...) lives further down the chain.
fn describe_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !msg.contains(&cause_msg) {
            msg.push_str(": ");
            msg.push_str(&cause_msg);
        }
        source = cause.source();
    }
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}
