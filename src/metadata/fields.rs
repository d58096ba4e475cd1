//! Tag fields and the per-run update specification.
//!
//! Each [`TagField`] maps to a writer function that turns a matched
//! [`CatalogTrack`] into one or more tag values. The map is built once when the
//! [`TagUpdateSpec`] is constructed and applied to lofty's format-independent
//! [`Tag`], so the same logic serves MP3, FLAC and AIFF.

use lofty::picture::{MimeType, Picture, PictureType};
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogTrack, CoverArt};
use crate::error::ArtFetchError;

/// A tag field the tagger can update.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TagField {
    Title,
    Artist,
    Album,
    Label,
    Bpm,
    Genre,
    /// Release date plus release year
    Date,
    Key,
    PublishYear,
    TrackUrl,
    LabelUrl,
}

impl TagField {
    pub const ALL: [TagField; 11] = [
        TagField::Title,
        TagField::Artist,
        TagField::Album,
        TagField::Label,
        TagField::Bpm,
        TagField::Genre,
        TagField::Date,
        TagField::Key,
        TagField::PublishYear,
        TagField::TrackUrl,
        TagField::LabelUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagField::Title => "title",
            TagField::Artist => "artist",
            TagField::Album => "album",
            TagField::Label => "label",
            TagField::Bpm => "bpm",
            TagField::Genre => "genre",
            TagField::Date => "date",
            TagField::Key => "key",
            TagField::PublishYear => "publish-year",
            TagField::TrackUrl => "track-url",
            TagField::LabelUrl => "label-url",
        }
    }

    fn writer(self) -> FieldWriter {
        match self {
            TagField::Title => write_title,
            TagField::Artist => write_artist,
            TagField::Album => write_album,
            TagField::Label => write_label,
            TagField::Bpm => write_bpm,
            TagField::Genre => write_genre,
            TagField::Date => write_date,
            TagField::Key => write_key,
            TagField::PublishYear => write_publish_year,
            TagField::TrackUrl => write_track_url,
            TagField::LabelUrl => write_label_url,
        }
    }
}

impl std::fmt::Display for TagField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value destined for a tag.
///
/// `keys` lists the item keys to try in order; the first one the tag format
/// accepts is used (e.g. `Label` for Vorbis comments, `Publisher` for ID3v2).
/// A field counts as written only when all of its required values landed.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub field: TagField,
    pub keys: Vec<ItemKey>,
    pub value: String,
    /// Extra copies (like a bare year) that some formats have no slot for
    pub required: bool,
}

impl FieldValue {
    fn new(field: TagField, keys: Vec<ItemKey>, value: impl Into<String>) -> Self {
        Self {
            field,
            keys,
            value: value.into(),
            required: true,
        }
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Build the item stored under `key`. Link keys (ID3v2 `W***` frames) take locators.
    fn item(&self, key: &ItemKey) -> TagItem {
        let value = if is_link_key(key) {
            ItemValue::Locator(self.value.clone())
        } else {
            ItemValue::Text(self.value.clone())
        };
        TagItem::new(key.clone(), value)
    }
}

fn is_link_key(key: &ItemKey) -> bool {
    matches!(key, ItemKey::AudioFileUrl | ItemKey::PublisherUrl)
}

/// Current text or locator value stored under `key`, if non-empty.
fn existing_value<'a>(tag: &'a Tag, key: &ItemKey) -> Option<&'a str> {
    tag.get(key)
        .and_then(|item| item.value().text().or_else(|| item.value().locator()))
        .filter(|s| !s.trim().is_empty())
}

type FieldWriter = fn(&CatalogTrack, &str) -> Vec<FieldValue>;

fn write_title(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    vec![FieldValue::new(TagField::Title, vec![ItemKey::TrackTitle], &track.title)]
}

fn write_artist(track: &CatalogTrack, sep: &str) -> Vec<FieldValue> {
    vec![FieldValue::new(
        TagField::Artist,
        vec![ItemKey::TrackArtist],
        track.joined_artists(sep),
    )]
}

fn write_album(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    vec![FieldValue::new(TagField::Album, vec![ItemKey::AlbumTitle], &track.album.name)]
}

fn write_label(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    vec![FieldValue::new(
        TagField::Label,
        vec![ItemKey::Label, ItemKey::Publisher],
        &track.label.name,
    )]
}

fn write_bpm(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    track
        .bpm
        .map(|bpm| FieldValue::new(TagField::Bpm, vec![ItemKey::Bpm, ItemKey::IntegerBpm], bpm.to_string()))
        .into_iter()
        .collect()
}

fn write_genre(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    vec![FieldValue::new(TagField::Genre, vec![ItemKey::Genre], track.joined_genres())]
}

fn write_date(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    let Some(date) = track.release_date else {
        return Vec::new();
    };
    vec![
        FieldValue::new(
            TagField::Date,
            vec![ItemKey::RecordingDate],
            date.format("%Y-%m-%d").to_string(),
        ),
        // ID3v2 has no year item; v2.3 output derives TYER from the date
        FieldValue::new(TagField::Date, vec![ItemKey::Year], track.release_year().unwrap_or_default().to_string())
            .optional(),
    ]
}

fn write_key(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    track
        .ascii_key()
        .map(|key| FieldValue::new(TagField::Key, vec![ItemKey::InitialKey], key))
        .into_iter()
        .collect()
}

fn write_publish_year(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    track
        .publish_year()
        .map(|year| {
            FieldValue::new(
                TagField::PublishYear,
                vec![ItemKey::OriginalReleaseDate],
                year.to_string(),
            )
        })
        .into_iter()
        .collect()
}

fn write_track_url(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    vec![FieldValue::new(
        TagField::TrackUrl,
        vec![ItemKey::AudioFileUrl, ItemKey::Unknown("WWWAUDIOFILE".to_string())],
        track.track_url(),
    )]
}

fn write_label_url(track: &CatalogTrack, _sep: &str) -> Vec<FieldValue> {
    vec![FieldValue::new(
        TagField::LabelUrl,
        vec![ItemKey::PublisherUrl, ItemKey::Unknown("WWWPUBLISHER".to_string())],
        track.label_url(),
    )]
}

/// What to write for every file in a batch run.
///
/// Built once per run and shared read-only by all workers.
#[derive(Debug, Clone)]
pub struct TagUpdateSpec {
    fields: Vec<TagField>,
    writers: Vec<(TagField, FieldWriter)>,
    /// Replace fields that already have a value
    pub overwrite: bool,
    /// Joins multiple artists in the artist field
    pub artist_separator: String,
    /// Download artwork and replace embedded pictures
    pub replace_art: bool,
    /// Square artwork resolution in pixels
    pub art_resolution: u32,
    /// Minimum fuzzy similarity (0-100)
    pub fuzziness: u8,
}

impl Default for TagUpdateSpec {
    fn default() -> Self {
        Self::new([TagField::Genre])
    }
}

impl TagUpdateSpec {
    /// Create a spec writing `fields`; duplicates are ignored.
    pub fn new(fields: impl IntoIterator<Item = TagField>) -> Self {
        let mut fields: Vec<TagField> = fields.into_iter().collect();
        fields.sort();
        fields.dedup();
        let writers = fields.iter().map(|f| (*f, f.writer())).collect();
        Self {
            fields,
            writers,
            overwrite: true,
            artist_separator: ";".to_string(),
            replace_art: false,
            art_resolution: 1200,
            fuzziness: 80,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_artist_separator(mut self, separator: impl Into<String>) -> Self {
        self.artist_separator = separator.into();
        self
    }

    pub fn with_art(mut self, replace_art: bool, resolution: u32) -> Self {
        self.replace_art = replace_art;
        self.art_resolution = resolution;
        self
    }

    /// Set the fuzzy threshold, clamped to 100.
    pub fn with_fuzziness(mut self, fuzziness: u8) -> Self {
        self.fuzziness = fuzziness.min(100);
        self
    }

    pub fn fields(&self) -> &[TagField] {
        &self.fields
    }

    /// All values this spec would write for `track`, in field order.
    pub fn values_for(&self, track: &CatalogTrack) -> Vec<FieldValue> {
        self.writers
            .iter()
            .flat_map(|(_, write)| write(track, &self.artist_separator))
            .collect()
    }
}

/// What happened to the embedded artwork during a write
#[derive(Debug, Clone, Default)]
pub enum ArtStatus {
    #[default]
    NotRequested,
    Replaced,
    /// Download failed; existing pictures were left alone
    Failed(ArtFetchError),
}

/// Result of applying a spec to one file
#[derive(Debug, Clone, Default)]
pub struct WriteReport {
    /// Fields whose values were all stored
    pub fields_written: Vec<TagField>,
    /// Fields left alone because they already had a value
    pub fields_skipped: Vec<TagField>,
    pub art: ArtStatus,
}

/// Apply the fields selected by `spec` to an in-memory tag, honoring the overwrite policy.
///
/// The policy is decided per field: with `overwrite` off, a field any of whose
/// keys already holds a value is left untouched.
pub fn apply_fields(tag: &mut Tag, track: &CatalogTrack, spec: &TagUpdateSpec) -> WriteReport {
    let mut report = WriteReport::default();

    for (field, write) in &spec.writers {
        let values: Vec<FieldValue> = write(track, &spec.artist_separator)
            .into_iter()
            .filter(|v| !v.value.trim().is_empty())
            .collect();
        if values.is_empty() {
            continue;
        }

        let present = values
            .iter()
            .filter(|v| v.required)
            .flat_map(|v| v.keys.iter())
            .any(|k| existing_value(tag, k).is_some());
        if present && !spec.overwrite {
            report.fields_skipped.push(*field);
            continue;
        }

        let mut complete = true;
        for value in &values {
            let accepted = value.keys.iter().any(|k| store_item(tag, value.item(k)));
            if !accepted {
                tracing::debug!(field = %field, tag_type = ?tag.tag_type(), required = value.required, "Tag format has no slot for value");
                complete &= !value.required;
            }
        }
        if complete {
            report.fields_written.push(*field);
        }
    }

    report
}

/// Insert `item`, returning whether the tag format has a slot for it.
///
/// Vorbis comments and APE take free-form keys, so unknown keys are stored as-is there.
fn store_item(tag: &mut Tag, item: TagItem) -> bool {
    let free_form = matches!(item.key(), ItemKey::Unknown(_))
        && matches!(tag.tag_type(), TagType::VorbisComments | TagType::Ape);
    if free_form {
        tag.insert_unchecked(item);
        return true;
    }
    tag.insert(item)
}

/// Replace every embedded picture with `cover` as the front cover.
pub fn replace_cover(tag: &mut Tag, cover: &CoverArt) {
    while !tag.pictures().is_empty() {
        tag.remove_picture(0);
    }
    let picture = Picture::new_unchecked(
        PictureType::CoverFront,
        Some(MimeType::from_str(&cover.mime_type)),
        Some("Cover".to_string()),
        cover.data.clone(),
    );
    tag.push_picture(picture);
}
