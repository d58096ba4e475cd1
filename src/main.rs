//! Beatport Tagger - fills audio file tags from the Beatport catalog.
//!
//! Reads title and artists from each MP3, FLAC or AIFF file in a directory,
//! searches the catalog, picks the best match and writes the selected fields
//! (genre, BPM, key, label, dates, artwork, ...) back to the file.

pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod metadata;
pub mod normalize;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("beatport_tagger=info".parse()?))
        .init();

    cli::run_command(&args)
}
