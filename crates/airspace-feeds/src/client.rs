//! Shared HTTP client for upstream feeds.

use airspace_core::FetchError;
use reqwest::Client;
use std::time::Duration;

/// Default bound on a single upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper over `reqwest::Client` that maps every failure to [`FetchError`].
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("airspace-feeds/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` and return the body as text.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(map_transport_error)
    }
}

fn map_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_decode() || err.is_body() {
        FetchError::Decode(err.to_string())
    } else {
        FetchError::Unreachable(err.to_string())
    }
}
