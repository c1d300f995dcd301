//! reqwest-backed implementation of [`protocol::Transport`].
//!
//! The transport is deliberately thin: one `POST` per exchange, no retries and
//! no interpretation of the body. The service reports its own failures inside
//! the JSON envelope, frequently alongside a non-2xx status, so any response
//! that carries a body is handed back to the solver untouched.

use std::time::Duration;

use async_trait::async_trait;
use protocol::{Transport, TransportError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument};

/// Suggested per-request timeout for [`HttpTransport::new`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client, e.g. one configured with a proxy.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    async fn exchange(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::network(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    TransportError::network(format!("connection failed: {e}"))
                } else {
                    TransportError::network(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::network(format!("failed to read response body: {e}")))?;

        debug!(status = status.as_u16(), bytes = bytes.len(), "exchange complete");

        if !status.is_success() && bytes.is_empty() {
            return Err(TransportError::http(
                status.as_u16(),
                format!("HTTP {status} with empty body"),
            ));
        }

        Ok(bytes.to_vec())
    }
}
