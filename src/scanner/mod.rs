use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the tagger processes (compared case-insensitively).
pub const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "flac", "aiff", "aif"];

/// Whether `path` has a supported audio extension.
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Recursively collects the audio files under `root`.
///
/// Supported extensions: mp3, flac, aiff, aif (case-insensitive). The listing
/// is taken once and sorted, so repeated runs visit files in the same order.
/// Unreadable entries are skipped with a warning.
pub fn enumerate_audio_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(root = %root.display(), "Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_audio_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "Enumerated audio files");
    files
}
