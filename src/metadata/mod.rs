//! Audio file metadata reading and writing.
//!
//! Uses the lofty crate for format-independent metadata access. The batch
//! runner only talks to the [`TagStore`] trait; [`LoftyTagStore`] is the real
//! implementation for MP3, FLAC and AIFF files.

mod fields;

pub use fields::{
    ArtStatus, FieldValue, TagField, TagUpdateSpec, WriteReport, apply_fields, replace_cover,
};

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::id3::v2::Id3v2Tag;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt, TagType};
use std::path::Path;

use crate::catalog::{CatalogTrack, CoverArt};
use crate::error::TagError;

/// Separators tried, in priority order, when a single artist value holds
/// several names.
const ARTIST_SEPARATORS: [char; 3] = [';', ',', '/'];

/// The identity of a local file as read from its tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalTrackInfo {
    pub title: String,
    pub artists: Vec<String>,
}

impl LocalTrackInfo {
    /// Both a title and at least one artist are present.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.artists.is_empty()
    }

    /// Free-text catalog query: artists joined with ", ", a space, the title.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.artists.join(", "), self.title)
    }

    /// Fail with [`TagError::MissingInfo`] unless [`is_complete`](Self::is_complete).
    pub fn require_complete(self, path: &Path) -> Result<Self, TagError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(TagError::MissingInfo(path.to_path_buf()))
        }
    }
}

/// Split artist tag values into individual names.
///
/// Several values are taken as-is. A single value is split on the first
/// separator it contains, in the order `;`, `,`, `/`. Names are trimmed and
/// empty names dropped.
pub fn parse_artists<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let values: Vec<&str> = values.into_iter().collect();
    let parts: Vec<&str> = match values.as_slice() {
        [] => Vec::new(),
        [single] => match ARTIST_SEPARATORS.iter().find(|sep| single.contains(**sep)) {
            Some(sep) => single.split(*sep).collect(),
            None => vec![single],
        },
        many => many.to_vec(),
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract title and artists from a tag.
pub fn info_from_tag(tag: &Tag) -> LocalTrackInfo {
    LocalTrackInfo {
        title: tag
            .title()
            .map(|t| t.trim().to_string())
            .unwrap_or_default(),
        artists: parse_artists(tag.get_strings(&ItemKey::TrackArtist)),
    }
}

/// Reads local track identity and writes catalog data back.
///
/// Calls are blocking file I/O; async callers run them on the blocking pool.
/// Implementations must be safe to share across worker threads.
pub trait TagStore: Send + Sync {
    /// Read title and artists. Fails with `MissingInfo` when either is absent.
    fn read(&self, path: &Path) -> Result<LocalTrackInfo, TagError>;

    /// Write the fields selected by `spec` from `track`, and `cover` when given.
    fn write(
        &self,
        path: &Path,
        track: &CatalogTrack,
        spec: &TagUpdateSpec,
        cover: Option<&CoverArt>,
    ) -> Result<WriteReport, TagError>;
}

/// [`TagStore`] backed by lofty.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagStore;

impl TagStore for LoftyTagStore {
    fn read(&self, path: &Path) -> Result<LocalTrackInfo, TagError> {
        let tagged_file = Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|e| TagError::read(path, e))?;

        // Get the primary tag, or fall back to the first available tag
        let info = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .map(info_from_tag)
            .unwrap_or_default();

        info.require_complete(path)
    }

    fn write(
        &self,
        path: &Path,
        track: &CatalogTrack,
        spec: &TagUpdateSpec,
        cover: Option<&CoverArt>,
    ) -> Result<WriteReport, TagError> {
        let mut tagged_file = Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|e| TagError::write(path, e))?;

        let tag_type = tagged_file.primary_tag_type();
        let had_id3v1 = tag_type != TagType::Id3v1 && tagged_file.tag(TagType::Id3v1).is_some();

        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let Some(tag) = tagged_file.tag_mut(tag_type) else {
            return Err(TagError::write(path, format!("{tag_type:?} tags are not supported")));
        };

        let mut report = apply_fields(tag, track, spec);
        if let Some(cover) = cover {
            replace_cover(tag, cover);
            report.art = ArtStatus::Replaced;
        }

        save_tag(tag, path).map_err(|e| TagError::write(path, e))?;

        if had_id3v1 {
            Tag::new(TagType::Id3v1)
                .remove_from_path(path)
                .map_err(|e| TagError::write(path, e))?;
        }

        tracing::debug!(
            path = %path.display(),
            written = report.fields_written.len(),
            skipped = report.fields_skipped.len(),
            "Wrote tags"
        );
        Ok(report)
    }
}

/// Save `tag` to `path`. ID3v2 tags are saved as v2.3.
///
/// Going through [`Id3v2Tag`] turns dates into timestamp frames, which the
/// v2.3 writer splits into `TYER`/`TDAT` and `TORY`.
fn save_tag(tag: &Tag, path: &Path) -> lofty::error::Result<()> {
    let options = WriteOptions::default().use_id3v23(true);
    match tag.tag_type() {
        TagType::Id3v2 => Id3v2Tag::from(tag.clone()).save_to_path(path, options),
        _ => tag.save_to_path(path, options),
    }
}
