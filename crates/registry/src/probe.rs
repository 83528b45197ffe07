use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::RegistryError;

/// Checks that a candidate host actually serves an XML feed before it is
/// admitted to the registry.
#[async_trait]
pub trait SourceProbe: Send + Sync {
    /// Returns Ok if the URL answers with a success status and an XML
    /// content type; otherwise the specific rejection reason.
    async fn probe(&self, url: &str) -> crate::Result<()>;
}

/// Probe that issues a real HTTP GET through a shared reqwest client.
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Create a new HttpProbe with a custom reqwest Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SourceProbe for HttpProbe {
    async fn probe(&self, url: &str) -> crate::Result<()> {
        tracing::debug!(url, "probing candidate feed host");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::BadStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !content_type.contains("xml") {
            return Err(RegistryError::NotXml(content_type.to_string()));
        }

        Ok(())
    }
}
