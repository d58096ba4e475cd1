//! Beatport search HTTP client
//!
//! Beatport has no public search API. The track search page embeds its results
//! as a JSON object in a script block, which this client extracts.

use std::time::Duration;

use super::{adapter, dto};
use crate::catalog::domain::{CatalogError, CatalogTrack, SITE_URL};

/// User agent string sent with every request
pub const USER_AGENT: &str = concat!("BeatportTagger/", env!("CARGO_PKG_VERSION"));

/// Beatport search client
pub struct BeatportClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl BeatportClient {
    /// Create a client against the public site
    pub fn new(timeout: Duration) -> Result<Self, CatalogError> {
        Self::with_base_url(SITE_URL, timeout)
    }

    /// Create a client with a custom base URL (mirrors, tests)
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Search tracks, returning results in the site's relevance order
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>, CatalogError> {
        let html = self.send_search_request(query).await?;
        let payload = parse_search_page(&html)?;
        let tracks = adapter::to_catalog_tracks(payload);
        tracing::debug!(query, results = tracks.len(), "Catalog search complete");
        Ok(tracks)
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search/tracks?q={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Send the HTTP request and return the page body
    async fn send_search_request(&self, query: &str) -> Result<String, CatalogError> {
        let url = self.search_url(query);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited);
        }

        if !status.is_success() {
            return Err(CatalogError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))
    }
}

/// Extract and deserialize the results payload from a search page
pub fn parse_search_page(html: &str) -> Result<dto::Playables, CatalogError> {
    let json = dto::extract_playables(html).ok_or(CatalogError::MissingPayload)?;
    serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))
}
