//! Directory listing command.

use std::path::Path;

use crate::error::Error;
use crate::scanner;

/// List the audio files a tag run would process
pub fn cmd_scan(path: &Path) -> anyhow::Result<()> {
    if !path.is_dir() {
        return Err(Error::not_found(path).into());
    }

    let files = scanner::enumerate_audio_files(path);
    for file in &files {
        println!("{}", file.display());
    }
    println!();
    println!("Found {} audio files.", files.len());
    Ok(())
}
