//! Trait definitions for the external catalog collaborators.
//!
//! These traits enable dependency injection and mocking for tests.
//! The batch runner only sees these seams; production code plugs in the
//! Beatport client and the artwork client.

use async_trait::async_trait;

use super::artwork::ArtworkClient;
use super::beatport::BeatportClient;
use super::domain::{CatalogError, CatalogTrack, CoverArt};

/// Free-text track search against a catalog.
///
/// Implementations return results in the provider's relevance order and drop
/// entries with a missing name, artists or duration.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>, CatalogError>;
}

/// Byte fetch for cover art.
#[async_trait]
pub trait ArtworkFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<CoverArt, CatalogError>;
}

// Implement traits for real clients

#[async_trait]
impl CatalogSearch for BeatportClient {
    async fn search_tracks(&self, query: &str) -> Result<Vec<CatalogTrack>, CatalogError> {
        BeatportClient::search_tracks(self, query).await
    }
}

#[async_trait]
impl ArtworkFetcher for ArtworkClient {
    async fn fetch(&self, url: &str) -> Result<CoverArt, CatalogError> {
        self.download_image(url).await
    }
}
