//! Catalog module - searches the online track catalog and fetches artwork.
//!
//! # Architecture
//!
//! Same layering for every provider:
//! - **Domain models** (`domain.rs`) - Internal types the matcher and tag writer use
//! - **API DTOs** (`beatport/dto.rs`) - Exact shapes of the provider payload
//! - **Adapters** - Convert DTOs to domain models and drop incomplete entries
//! - **Clients** - HTTP clients for the search page and artwork
//! - **Traits** (`traits.rs`) - Seams the batch runner depends on
//!
//! # Usage
//!
//! ```ignore
//! use beatport_tagger::catalog::{BeatportClient, CatalogSearch};
//!
//! let client = BeatportClient::new(Duration::from_secs(30))?;
//! let tracks = client.search_tracks("DJ One Test Track").await?;
//! ```

pub mod artwork;
pub mod beatport;
pub mod domain;
pub mod traits;

pub use artwork::ArtworkClient;
pub use beatport::BeatportClient;
pub use domain::{
    CatalogEntity, CatalogError, CatalogTrack, CoverArt, SITE_URL, resolve_artwork_url,
    to_ascii_key,
};
pub use traits::{ArtworkFetcher, CatalogSearch};
