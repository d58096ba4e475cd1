//! Adapter layer: Convert Beatport DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! Entries missing a name, artists or duration are dropped here so the matcher
//! never sees them.

use chrono::NaiveDate;

use super::dto;
use crate::catalog::domain::{CatalogEntity, CatalogTrack};

/// Convert a search payload into catalog tracks, preserving result order.
pub fn to_catalog_tracks(payload: dto::Playables) -> Vec<CatalogTrack> {
    payload.tracks.into_iter().filter_map(to_catalog_track).collect()
}

/// Convert one entry, or `None` if it lacks the fields matching depends on.
pub fn to_catalog_track(track: dto::Track) -> Option<CatalogTrack> {
    let name = track.name.filter(|n| !n.trim().is_empty())?;
    let duration_ms = track.duration.and_then(|d| d.milliseconds)?;

    let artists: Vec<CatalogEntity> = track.artists.into_iter().filter_map(to_entity).collect();
    if artists.is_empty() {
        tracing::debug!(id = track.id, "Dropping search result without artists");
        return None;
    }

    let mix = track.mix.unwrap_or_default();
    let title = track
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| full_title(&name, &mix));

    let (release_date, publish_date) = track
        .date
        .map(|d| (parse_date(d.released), parse_date(d.published)))
        .unwrap_or((None, None));

    let artwork_url_template = track
        .images
        .and_then(|i| i.dynamic)
        .and_then(|d| d.url)
        .unwrap_or_default();

    Some(CatalogTrack {
        id: track.id,
        title,
        name,
        mix,
        artists,
        album: track.release.and_then(to_entity).unwrap_or_default(),
        label: track.label.and_then(to_entity).unwrap_or_default(),
        genres: track.genres.into_iter().filter_map(to_entity).collect(),
        bpm: track.bpm,
        musical_key: track.key.filter(|k| !k.is_empty()),
        duration_ms,
        release_date,
        publish_date,
        artwork_url_template,
        slug: track.slug,
        exclusive: track.exclusive,
    })
}

fn to_entity(entity: dto::Entity) -> Option<CatalogEntity> {
    let name = entity.name.filter(|n| !n.is_empty())?;
    Some(CatalogEntity {
        name,
        id: entity.id,
        slug: entity.slug,
    })
}

/// "Name (Mix)" when the page omits the full title.
fn full_title(name: &str, mix: &str) -> String {
    if mix.is_empty() {
        name.to_string()
    } else {
        format!("{name} ({mix})")
    }
}

fn parse_date(date: Option<String>) -> Option<NaiveDate> {
    let date = date?;
    match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::debug!(date = %date, error = %e, "Ignoring unparseable catalog date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, id: u64) -> dto::Entity {
        dto::Entity {
            name: Some(name.to_string()),
            id,
            slug: name.to_lowercase().replace(' ', "-"),
        }
    }

    fn full_dto() -> dto::Track {
        dto::Track {
            id: 42,
            title: Some("Test Track (Original Mix)".to_string()),
            name: Some("Test Track".to_string()),
            mix: Some("Original Mix".to_string()),
            artists: vec![entity("DJ One", 1), entity("DJ Two", 2)],
            release: Some(entity("Test EP", 9)),
            label: Some(entity("Test Label", 7)),
            genres: vec![entity("Techno", 6)],
            bpm: Some(128),
            key: Some("A♭ min".to_string()),
            duration: Some(dto::Duration {
                milliseconds: Some(360_000),
            }),
            date: Some(dto::Dates {
                released: Some("2021-03-05".to_string()),
                published: Some("not a date".to_string()),
            }),
            images: Some(dto::Images {
                dynamic: Some(dto::Image {
                    url: Some("https://img/{w}x{h}.jpg".to_string()),
                }),
            }),
            slug: "test-track".to_string(),
            exclusive: false,
        }
    }

    #[test]
    fn test_full_conversion() {
        let track = to_catalog_track(full_dto()).unwrap();
        assert_eq!(track.id, 42);
        assert_eq!(track.title, "Test Track (Original Mix)");
        assert_eq!(track.artist_names(), vec!["DJ One", "DJ Two"]);
        assert_eq!(track.album.name, "Test EP");
        assert_eq!(track.label.id, 7);
        assert_eq!(track.duration_ms, 360_000);
        assert_eq!(track.release_date, NaiveDate::from_ymd_opt(2021, 3, 5));
        assert_eq!(track.publish_date, None);
        assert_eq!(track.artwork_url(100), "https://img/100x100.jpg");
    }

    #[test]
    fn test_drops_entries_missing_required_fields() {
        let no_name = dto::Track {
            name: None,
            ..full_dto()
        };
        let no_artists = dto::Track {
            artists: vec![],
            ..full_dto()
        };
        let no_duration = dto::Track {
            duration: None,
            ..full_dto()
        };
        let payload = dto::Playables {
            tracks: vec![no_name, full_dto(), no_artists, no_duration],
        };
        let tracks = to_catalog_tracks(payload);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, 42);
    }

    #[test]
    fn test_title_falls_back_to_name_and_mix() {
        let track = to_catalog_track(dto::Track {
            title: None,
            ..full_dto()
        })
        .unwrap();
        assert_eq!(track.title, "Test Track (Original Mix)");
    }
}
