//! Beatport catalog integration
//!
//! Searches the public Beatport track index and converts the embedded search
//! results into [`CatalogTrack`](crate::catalog::CatalogTrack) records.

pub mod dto;
mod adapter;
mod client;

pub use adapter::{to_catalog_track, to_catalog_tracks};
pub use client::{BeatportClient, USER_AGENT, parse_search_page};
