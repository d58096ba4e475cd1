//! Test utilities and fixtures for beatport-tagger tests.
//!
//! This module provides catalog fixtures and tiny audio files to reduce
//! boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{catalog_track, write_silent_mp3};
//!
//! let track = catalog_track("Test Track", &["DJ One"]);
//! write_silent_mp3(&dir.path().join("a.mp3"));
//! ```

use chrono::NaiveDate;
use std::path::Path;

use crate::catalog::{CatalogEntity, CatalogTrack};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, no CRC, no padding.
const MPEG_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
const MPEG_FRAME_LEN: usize = 417;
const MPEG_FRAME_COUNT: usize = 20;

fn slugify(text: &str) -> String {
    text.to_lowercase().replace(' ', "-")
}

/// Creates a catalog track with sensible defaults.
///
/// Customize using struct update syntax or by mutating fields:
///
/// ```ignore
/// let mut track = catalog_track("Test Track", &["DJ One"]);
/// track.id = 42;
/// ```
pub fn catalog_track(title: &str, artists: &[&str]) -> CatalogTrack {
    CatalogTrack {
        id: 1001,
        title: title.to_string(),
        name: title.to_string(),
        mix: "Original Mix".to_string(),
        artists: artists
            .iter()
            .enumerate()
            .map(|(i, name)| CatalogEntity::new(*name, 500 + i as u64, slugify(name)))
            .collect(),
        album: CatalogEntity::new("Test EP", 9001, "test-ep"),
        label: CatalogEntity::new("Test Label", 77, "test-label"),
        genres: vec![CatalogEntity::new("Techno", 6, "techno")],
        bpm: Some(128),
        musical_key: Some("A♭ min".to_string()),
        duration_ms: 360_000,
        release_date: NaiveDate::from_ymd_opt(2021, 3, 5),
        publish_date: NaiveDate::from_ymd_opt(2021, 2, 19),
        artwork_url_template: "https://geo-media.beatport.com/image_size/{w}x{h}/cover.jpg"
            .to_string(),
        slug: slugify(title),
        exclusive: false,
    }
}

/// Writes a short untagged MP3 of silent frames to `path`.
///
/// Enough for lofty to probe, read and tag.
pub fn write_silent_mp3(path: &Path) {
    let mut frame = vec![0u8; MPEG_FRAME_LEN];
    frame[..4].copy_from_slice(&MPEG_FRAME_HEADER);
    let data = frame.repeat(MPEG_FRAME_COUNT);
    std::fs::write(path, data).expect("Failed to write test MP3");
}

/// Writes a silent MP3 carrying an ID3v2 title and artist.
pub fn write_tagged_mp3(path: &Path, title: &str, artist: &str) {
    use lofty::config::WriteOptions;
    use lofty::tag::{Accessor, Tag, TagExt, TagType};

    write_silent_mp3(path);
    let mut tag = Tag::new(TagType::Id3v2);
    tag.set_title(title.to_string());
    tag.set_artist(artist.to_string());
    tag.save_to_path(path, WriteOptions::default())
        .expect("Failed to tag test MP3");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_track_defaults() {
        let track = catalog_track("Test Track", &["DJ One", "DJ Two"]);
        assert_eq!(track.id, 1001);
        assert_eq!(track.slug, "test-track");
        assert_eq!(track.artist_names(), vec!["DJ One", "DJ Two"]);
        assert_eq!(track.artists[1].slug, "dj-two");
        assert_eq!(track.joined_genres(), "Techno");
    }

    #[test]
    fn test_write_silent_mp3() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_silent_mp3(&path);

        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), MPEG_FRAME_LEN * MPEG_FRAME_COUNT);
        assert_eq!(&data[..4], &MPEG_FRAME_HEADER);
        assert_eq!(&data[MPEG_FRAME_LEN..MPEG_FRAME_LEN + 4], &MPEG_FRAME_HEADER);
    }

    #[test]
    fn test_write_tagged_mp3() {
        use lofty::file::TaggedFileExt;
        use lofty::tag::Accessor;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        write_tagged_mp3(&path, "Test Track", "DJ One");

        let tagged = lofty::probe::Probe::open(&path).unwrap().read().unwrap();
        let tag = tagged.primary_tag().unwrap();
        assert_eq!(tag.title().as_deref(), Some("Test Track"));
        assert_eq!(tag.artist().as_deref(), Some("DJ One"));
    }
}
