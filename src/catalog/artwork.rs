//! Cover art byte fetcher.
//!
//! Downloads the artwork image for a matched track. The URL is resolved from
//! the track's artwork template by the caller.

use std::time::Duration;

use super::beatport::USER_AGENT;
use super::domain::{CatalogError, CoverArt};

/// Artwork download client
pub struct ArtworkClient {
    http_client: reqwest::Client,
}

impl ArtworkClient {
    /// Create a new client
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        Ok(Self { http_client })
    }

    /// Download an image from a URL
    pub async fn download_image(&self, url: &str) -> Result<CoverArt, CatalogError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            return Err(CatalogError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();

        let data = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?
            .to_vec();

        if data.is_empty() {
            return Err(CatalogError::Api(format!("Empty image body from {url}")));
        }

        Ok(CoverArt {
            data,
            mime_type,
            url: url.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(ArtworkClient::new(Duration::from_secs(10)).is_ok());
    }

    #[tokio::test]
    async fn test_download_from_unreachable_host_is_network_error() {
        let client = ArtworkClient::new(Duration::from_secs(2)).unwrap();
        let result = client.download_image("http://127.0.0.1:9/cover.jpg").await;
        assert!(matches!(result, Err(CatalogError::Network(_))));
    }
}
