//! Beatport search page Data Transfer Objects
//!
//! These types match what the search page embeds in its `data-objects` script
//! block as `window.Playables = {...};`. Every field the adapter filters on is
//! optional here so that one malformed entry doesn't fail the whole page.
//! DO NOT use these types outside the beatport module - convert to domain types.

use serde::{Deserialize, Serialize};

/// JavaScript assignment that carries the search results.
const PLAYABLES_MARKER: &str = "window.Playables = ";

/// The `window.Playables` object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Playables {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Small `{name, id, slug}` record used for artists, releases, labels and genres
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Entity {
    pub name: Option<String>,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub slug: String,
}

/// A track entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub mix: Option<String>,
    #[serde(default)]
    pub artists: Vec<Entity>,
    pub release: Option<Entity>,
    pub label: Option<Entity>,
    #[serde(default)]
    pub genres: Vec<Entity>,
    pub bpm: Option<u32>,
    pub key: Option<String>,
    pub duration: Option<Duration>,
    pub date: Option<Dates>,
    pub images: Option<Images>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub exclusive: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Duration {
    pub milliseconds: Option<u64>,
}

/// Release and publish dates as `YYYY-MM-DD`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dates {
    pub released: Option<String>,
    pub published: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Images {
    pub dynamic: Option<Image>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    pub url: Option<String>,
}

/// Pull the `window.Playables` JSON text out of a search page.
///
/// The assignment runs to the end of its line and ends with `;`.
pub fn extract_playables(html: &str) -> Option<&str> {
    let start = html.find(PLAYABLES_MARKER)? + PLAYABLES_MARKER.len();
    let rest = &html[start..];
    let line = rest.split('\n').next().unwrap_or(rest).trim_end();
    let json = line.strip_suffix(';').unwrap_or(line);
    (!json.is_empty()).then_some(json)
}
