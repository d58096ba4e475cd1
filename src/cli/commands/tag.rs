//! Batch tagging command.

use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::batch::{BatchRunner, FileEvent, FileStatus, Progress, TagPipeline};
use crate::catalog::{ArtworkClient, BeatportClient};
use crate::config::TaggerConfig;
use crate::error::{Error, ResultExt};
use crate::metadata::{ArtStatus, LoftyTagStore};

/// Tag every audio file under `path`
pub fn cmd_tag(rt: &Runtime, config: &TaggerConfig, path: &Path) -> anyhow::Result<()> {
    if !path.is_dir() {
        return Err(Error::not_found(path).into());
    }

    let spec = config.tag_update_spec();
    let timeout = config.catalog.timeout();
    let catalog = BeatportClient::with_base_url(config.catalog.base_url.clone(), timeout)
        .with_context("Failed to create catalog client")?;
    let artwork = ArtworkClient::new(timeout).with_context("Failed to create artwork client")?;

    let fields: Vec<&str> = spec.fields().iter().map(|f| f.as_str()).collect();
    println!("Tagging: {:?}", path);
    println!(
        "  Fields: {}  |  overwrite: {}  |  art: {}  |  workers: {}",
        fields.join(", "),
        if spec.overwrite { "yes" } else { "no" },
        if spec.replace_art { "yes" } else { "no" },
        config.workers()
    );
    println!();

    let pipeline = TagPipeline::new(
        Arc::new(catalog),
        Arc::new(artwork),
        Arc::new(LoftyTagStore),
        spec,
    );
    let mut runner = BatchRunner::new(pipeline).with_workers(config.workers());

    let progress = rt.block_on(runner.tag_dir(path, print_event));

    println!();
    println!("═══════════════════════════════════════");
    println!("  Total:     {}", progress.total);
    println!("  Tagged:    {}", progress.succeeded);
    println!("  Failed:    {}", progress.failed);
    println!("═══════════════════════════════════════");

    let failed = runner.outcome().failed();
    if !failed.is_empty() {
        println!();
        println!("Failed files:");
        for path in failed {
            println!("  {}", path.display());
        }
    }

    Ok(())
}

fn print_event(event: &FileEvent) {
    let name = event
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| event.path.display().to_string());
    let counter = progress_counter(&event.progress);

    match &event.status {
        FileStatus::Success { track_id, report } => {
            let mut line = format!("{counter} ✓ {name} (#{track_id})");
            if !report.fields_skipped.is_empty() {
                let skipped: Vec<&str> = report.fields_skipped.iter().map(|f| f.as_str()).collect();
                line.push_str(&format!("  kept: {}", skipped.join(", ")));
            }
            match &report.art {
                ArtStatus::Replaced => line.push_str("  +art"),
                ArtStatus::Failed(e) => line.push_str(&format!("  (no art: {})", e.source)),
                ArtStatus::NotRequested => {}
            }
            println!("{line}");
        }
        FileStatus::Fail(e) => {
            eprintln!("{counter} ✗ {name}: {e}");
        }
    }
}

fn progress_counter(progress: &Progress) -> String {
    format!(
        "[{}/{} {:3.0}%]",
        progress.done(),
        progress.total,
        progress.fraction() * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counter() {
        let progress = Progress {
            total: 8,
            succeeded: 1,
            failed: 1,
        };
        assert_eq!(progress_counter(&progress), "[2/8  25%]");

        let done = Progress {
            total: 3,
            succeeded: 2,
            failed: 1,
        };
        assert_eq!(progress_counter(&done), "[3/3 100%]");
    }
}
