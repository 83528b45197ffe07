use reqwest::Client;

use crate::{slice_feed, Rule, SlicerError};

/// Fetch-and-filter client for upstream feeds.
///
/// Rendering re-fetches the upstream on every call; nothing is cached, so a
/// slow or failing upstream is surfaced to exactly the request that hit it.
pub struct SlicerClient {
    client: Client,
}

impl SlicerClient {
    /// Create a new SlicerClient with a custom reqwest Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch an upstream feed and return it with the rule applied.
    ///
    /// A single attempt is made; transport errors and non-2xx statuses are
    /// both reported as the upstream being unavailable.
    pub async fn render(&self, url: &str, rule: Rule) -> crate::Result<Vec<u8>> {
        tracing::debug!(url, rule = rule.get(), "rendering sliced feed");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SlicerError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SlicerError::Upstream(format!(
                "HTTP {status} when fetching {url}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SlicerError::Upstream(e.to_string()))?;

        slice_feed(&bytes, rule)
    }
}
