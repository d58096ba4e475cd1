//! Catalog search and single-file match preview.

use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::batch::TagPipeline;
use crate::catalog::{ArtworkClient, BeatportClient, CatalogTrack};
use crate::config::TaggerConfig;
use crate::error::TagError;
use crate::metadata::LoftyTagStore;

/// Search the catalog and print the results
pub fn cmd_search(
    rt: &Runtime,
    config: &TaggerConfig,
    query: &str,
    limit: usize,
) -> anyhow::Result<()> {
    let client =
        BeatportClient::with_base_url(config.catalog.base_url.clone(), config.catalog.timeout())?;

    println!("Searching: {}", query);
    println!();

    let tracks = rt.block_on(client.search_tracks(query))?;
    if tracks.is_empty() {
        println!("✗ No results.");
        return Ok(());
    }

    for (i, track) in tracks.iter().take(limit).enumerate() {
        println!("{:>2}. {}", i + 1, summary_line(track));
        println!("    {}", track.track_url());
    }
    if tracks.len() > limit {
        println!();
        println!("  ... and {} more", tracks.len() - limit);
    }
    Ok(())
}

/// Print the catalog track a file would be tagged from
pub fn cmd_match(rt: &Runtime, config: &TaggerConfig, path: &Path) -> anyhow::Result<()> {
    let timeout = config.catalog.timeout();
    let pipeline = TagPipeline::new(
        Arc::new(BeatportClient::with_base_url(
            config.catalog.base_url.clone(),
            timeout,
        )?),
        Arc::new(ArtworkClient::new(timeout)?),
        Arc::new(LoftyTagStore),
        config.tag_update_spec(),
    );

    println!("Matching: {:?}", path);
    println!();

    match rt.block_on(pipeline.find_match(path)) {
        Ok((info, track)) => {
            println!("  Local:  {} - {}", info.artists.join(", "), info.title);
            println!("  Query:  {}", info.search_query());
            println!();
            println!("✓ {}", summary_line(&track));
            println!("  Album:  {}", track.album.name);
            if let Some(date) = track.release_date {
                println!("  Date:   {}", date);
            }
            println!("  URL:    {}", track.track_url());
            Ok(())
        }
        Err(e @ TagError::NoMatch { .. }) => {
            println!("✗ {}", e);
            println!(
                "  Fuzziness is {}; lower it with --fuzziness to accept looser matches.",
                pipeline.spec().fuzziness
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn summary_line(track: &CatalogTrack) -> String {
    let mut details = vec![track.label.name.clone()];
    if let Some(bpm) = track.bpm {
        details.push(format!("{} BPM", bpm));
    }
    if let Some(key) = track.ascii_key() {
        details.push(key);
    }
    if !track.genres.is_empty() {
        details.push(track.joined_genres());
    }
    format!(
        "{} - {}  [{}]",
        track.joined_artists(", "),
        track.title,
        details.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::catalog_track;

    #[test]
    fn test_summary_line() {
        let track = catalog_track("Test Track", &["DJ One", "DJ Two"]);
        assert_eq!(
            summary_line(&track),
            "DJ One, DJ Two - Test Track  [Test Label, 128 BPM, Abm, Techno]"
        );
    }
}
