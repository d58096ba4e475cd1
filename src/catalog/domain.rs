//! Internal domain models for catalog search results.
//!
//! These types are OUR types - they don't change when the Beatport page format
//! changes. Search responses get converted into these types by the adapter.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Public site root used to build track and label links.
pub const SITE_URL: &str = "https://www.beatport.com";

static RE_IMAGE_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/image_size/\d+x\d+/").unwrap());

/// Placeholder tokens the artwork template may carry for width/height.
const ART_PLACEHOLDERS: [&str; 4] = ["{w}", "{h}", "{x}", "{y}"];

/// A named catalog entity (artist, release, label, genre).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntity {
    pub name: String,
    pub id: u64,
    pub slug: String,
}

impl CatalogEntity {
    pub fn new(name: impl Into<String>, id: u64, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id,
            slug: slug.into(),
        }
    }
}

/// One track returned by a catalog search.
///
/// Instances are built once from a search response and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTrack {
    pub id: u64,
    /// Full title, may include the mix descriptor
    pub title: String,
    /// Title without the mix descriptor
    pub name: String,
    /// Mix descriptor, e.g. "Original Mix"
    pub mix: String,
    pub artists: Vec<CatalogEntity>,
    /// The release the track appears on
    pub album: CatalogEntity,
    pub label: CatalogEntity,
    pub genres: Vec<CatalogEntity>,
    pub bpm: Option<u32>,
    /// Musical key as published, e.g. "A♭ min"
    pub musical_key: Option<String>,
    pub duration_ms: u64,
    pub release_date: Option<NaiveDate>,
    pub publish_date: Option<NaiveDate>,
    /// Artwork URL with `{w}`/`{h}` style placeholders
    pub artwork_url_template: String,
    pub slug: String,
    pub exclusive: bool,
}

impl CatalogTrack {
    /// Artist names in catalog order.
    pub fn artist_names(&self) -> Vec<&str> {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }

    /// Artist names joined with the given separator.
    pub fn joined_artists(&self, separator: &str) -> String {
        self.artist_names().join(separator)
    }

    /// Genre names joined with ", ".
    pub fn joined_genres(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Key in the plain ASCII convention used by DJ software ("Abm", "F#").
    pub fn ascii_key(&self) -> Option<String> {
        self.musical_key
            .as_deref()
            .map(to_ascii_key)
            .filter(|k| !k.is_empty())
    }

    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|d| d.year())
    }

    pub fn publish_year(&self) -> Option<i32> {
        self.publish_date.map(|d| d.year())
    }

    pub fn track_url(&self) -> String {
        format!("{}/track/{}/{}", SITE_URL, self.slug, self.id)
    }

    pub fn label_url(&self) -> String {
        format!("{}/label/{}/{}", SITE_URL, self.label.slug, self.label.id)
    }

    /// Artwork URL for a square image of `resolution` pixels.
    pub fn artwork_url(&self, resolution: u32) -> String {
        resolve_artwork_url(&self.artwork_url_template, resolution)
    }
}

/// Substitute a square resolution into an artwork URL template.
///
/// Placeholder tokens win; otherwise a `/image_size/WxH/` segment is rewritten;
/// otherwise the URL is returned unchanged.
pub fn resolve_artwork_url(template: &str, resolution: u32) -> String {
    let size = resolution.to_string();
    if ART_PLACEHOLDERS.iter().any(|p| template.contains(p)) {
        return ART_PLACEHOLDERS
            .iter()
            .fold(template.to_string(), |url, p| url.replace(p, &size));
    }
    RE_IMAGE_SIZE
        .replace(template, format!("/image_size/{size}x{size}/"))
        .into_owned()
}

/// Convert a published key ("A♭ min", "F♯ maj") to "Abm" / "F#".
pub fn to_ascii_key(key: &str) -> String {
    key.replace('♭', "b")
        .replace('♯', "#")
        .replace("min", "m")
        .replace("maj", "")
        .replace(' ', "")
}

/// Downloaded cover art
#[derive(Debug, Clone)]
pub struct CoverArt {
    /// Image data (JPEG or PNG)
    pub data: Vec<u8>,
    /// MIME type (image/jpeg or image/png)
    pub mime_type: String,
    /// Source URL
    pub url: String,
}

/// Errors that can occur while talking to the catalog
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Search page did not contain a results payload")]
    MissingPayload,

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::catalog_track;

    #[test]
    fn test_resolve_artwork_placeholders() {
        let url = "https://geo-media.beatport.com/image_size/{w}x{h}/abc.jpg";
        assert_eq!(
            resolve_artwork_url(url, 500),
            "https://geo-media.beatport.com/image_size/500x500/abc.jpg"
        );
        assert_eq!(
            resolve_artwork_url("https://img/{x}/{y}/a.jpg", 1200),
            "https://img/1200/1200/a.jpg"
        );
    }

    #[test]
    fn test_resolve_artwork_image_size_segment() {
        let url = "https://geo-media.beatport.com/image_size/250x250/abc.jpg";
        assert_eq!(
            resolve_artwork_url(url, 1400),
            "https://geo-media.beatport.com/image_size/1400x1400/abc.jpg"
        );
    }

    #[test]
    fn test_resolve_artwork_unchanged() {
        let url = "https://example.com/cover.jpg";
        assert_eq!(resolve_artwork_url(url, 800), url);
    }

    #[test]
    fn test_to_ascii_key() {
        assert_eq!(to_ascii_key("A♭ min"), "Abm");
        assert_eq!(to_ascii_key("F♯ maj"), "F#");
        assert_eq!(to_ascii_key("C maj"), "C");
        assert_eq!(to_ascii_key("E min"), "Em");
    }

    #[test]
    fn test_track_links() {
        let track = catalog_track("Test Track", &["DJ One"]);
        assert_eq!(
            track.track_url(),
            "https://www.beatport.com/track/test-track/1001"
        );
        assert_eq!(
            track.label_url(),
            "https://www.beatport.com/label/test-label/77"
        );
    }

    #[test]
    fn test_joined_fields() {
        let mut track = catalog_track("Test Track", &["DJ One", "DJ Two"]);
        track.genres = vec![
            CatalogEntity::new("Techno", 6, "techno"),
            CatalogEntity::new("Minimal", 14, "minimal"),
        ];
        assert_eq!(track.joined_artists(";"), "DJ One;DJ Two");
        assert_eq!(track.joined_genres(), "Techno, Minimal");
    }

    #[test]
    fn test_years() {
        let track = catalog_track("Test Track", &["DJ One"]);
        assert_eq!(track.release_year(), Some(2021));
        assert_eq!(track.publish_year(), Some(2021));
    }
}
