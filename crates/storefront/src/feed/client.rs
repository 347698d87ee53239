//! HTTP client for the catalog feed.

use tracing::{debug, instrument};
use url::Url;

use super::FeedError;
use crate::config::FeedConfig;

/// Client for the spreadsheet feed endpoint.
///
/// Fetches raw framed text; parsing is [`super::parse_feed`]'s job. One
/// request per call, no retry: catalog loads are user-triggered and the
/// previous catalog stays available on failure.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    url: Url,
}

impl FeedClient {
    /// Create a new feed client.
    #[must_use]
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
        }
    }

    /// Fetch the raw feed text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<String, FeedError> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let text = response.text().await?;
        debug!(bytes = text.len(), "feed fetched");
        Ok(text)
    }
}
