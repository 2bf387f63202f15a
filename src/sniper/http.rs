//! Shared HTTP GET plumbing for the gate and discovery endpoints.

use crate::errors::FetchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, instrument, warn};

/// Issues single GET requests and returns the raw body.
#[derive(Clone)]
pub struct HttpFetcher {
    http_client: Client,
    timeout: Duration,
    retry_attempts: usize,
}

impl HttpFetcher {
    pub fn new(http_client: Client, timeout: Duration, retry_attempts: usize) -> Self {
        Self {
            http_client,
            timeout,
            retry_attempts,
        }
    }

    /// GET `url`, retrying transport failures up to the configured number of extra attempts.
    #[instrument(skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.retry_attempts);

        RetryIf::spawn(
            retry_strategy,
            || self.get_once(url),
            |err: &FetchError| {
                if err.is_network() {
                    warn!("Retrying {} after network failure: {}", url, err);
                    true
                } else {
                    false
                }
            },
        )
        .await
    }

    async fn get_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        check_status(response.status())?;

        // Bodies are decoded lossily, so a failed read means the connection broke.
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read body: {}", e)))?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Any non-2xx status is a failure; redirects are already followed by the client.
pub fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(FetchError::NonSuccessStatus {
            status: status.as_u16(),
        })
    }
}

/// Join a fixed endpoint base with a mint address as `{base}/{mint}`.
pub fn endpoint_url(base: &str, mint_address: &str) -> Result<String, FetchError> {
    let mint = mint_address.trim();
    if mint.is_empty() {
        return Err(FetchError::InvalidInput("mint address is empty".to_string()));
    }
    if mint.contains(['/', '?', '#']) {
        return Err(FetchError::InvalidInput(format!(
            "mint address {:?} is not a path segment",
            mint
        )));
    }
    Ok(format!("{}/{}", base.trim_end_matches('/'), mint))
}
