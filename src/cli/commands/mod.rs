//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `tag`: batch tagging of a directory
//! - `search`: catalog search and single-file match preview
//! - `scan`: list the files a batch would process
//! - `config`: show or initialise the configuration file

mod config;
mod scan;
mod search;
mod tag;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::TaggerConfig;
use crate::metadata::TagField;

pub use config::cmd_config;
pub use scan::cmd_scan;
pub use search::{cmd_match, cmd_search};
pub use tag::cmd_tag;

/// Beatport Tagger CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "BEATPORT_TAGGER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Tag every audio file in a directory from the catalog
    Tag {
        /// Directory to tag (searched recursively)
        path: PathBuf,
        #[command(flatten)]
        options: TagOptions,
    },
    /// Search the catalog and print the results
    Search {
        /// Free-text query, e.g. "DJ One Test Track"
        #[arg(required = true)]
        query: Vec<String>,
        /// Maximum number of results to print
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show which catalog track a file would be matched to, without writing
    Match {
        /// Path to the audio file
        path: PathBuf,
        /// Minimum fuzzy similarity (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        fuzziness: Option<u8>,
    },
    /// List the audio files a tag run would process
    Scan {
        /// Path to the directory to scan
        path: PathBuf,
    },
    /// Print the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

/// Flags overriding the `[tagging]` and `[batch]` config sections.
#[derive(Args, Debug, Default, Clone)]
pub struct TagOptions {
    /// Fields to write (comma separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub fields: Option<Vec<TagField>>,
    /// Replace fields that already have a value
    #[arg(long, conflicts_with = "keep_existing")]
    pub overwrite: bool,
    /// Only fill fields that are empty
    #[arg(long)]
    pub keep_existing: bool,
    /// Separator between multiple artists
    #[arg(long)]
    pub separator: Option<String>,
    /// Download cover art and replace embedded pictures
    #[arg(long)]
    pub replace_art: bool,
    /// Cover art size in pixels
    #[arg(long)]
    pub art_resolution: Option<u32>,
    /// Minimum fuzzy similarity (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub fuzziness: Option<u8>,
    /// Number of files processed in parallel
    #[arg(short, long)]
    pub workers: Option<usize>,
}

impl TagOptions {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut TaggerConfig) {
        let tagging = &mut config.tagging;
        if let Some(fields) = &self.fields {
            tagging.fields = fields.clone();
        }
        if self.overwrite {
            tagging.overwrite = true;
        }
        if self.keep_existing {
            tagging.overwrite = false;
        }
        if let Some(separator) = &self.separator {
            tagging.artist_separator = separator.clone();
        }
        if self.replace_art {
            tagging.replace_art = true;
        }
        if let Some(resolution) = self.art_resolution {
            tagging.art_resolution = resolution;
        }
        if let Some(fuzziness) = self.fuzziness {
            tagging.fuzziness = fuzziness;
        }
        if let Some(workers) = self.workers {
            config.batch.workers = workers;
        }
    }
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => crate::config::load_from(path),
        None => crate::config::load(),
    };

    match &cli.command {
        Commands::Tag { path, options } => {
            options.apply(&mut config);
            let rt = Runtime::new()?;
            cmd_tag(&rt, &config, path)
        }
        Commands::Search { query, limit } => {
            let rt = Runtime::new()?;
            cmd_search(&rt, &config, &query.join(" "), *limit)
        }
        Commands::Match { path, fuzziness } => {
            if let Some(fuzziness) = fuzziness {
                config.tagging.fuzziness = *fuzziness;
            }
            let rt = Runtime::new()?;
            cmd_match(&rt, &config, path)
        }
        Commands::Scan { path } => cmd_scan(path),
        Commands::Config { init } => cmd_config(&config, cli.config.as_deref(), *init),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_flags() {
        let cli = Cli::try_parse_from([
            "beatport-tagger",
            "tag",
            "/music",
            "--fields",
            "genre,bpm,track-url",
            "--keep-existing",
            "--fuzziness",
            "70",
            "-w",
            "4",
        ])
        .unwrap();

        let Commands::Tag { path, options } = cli.command else {
            panic!("expected tag command");
        };
        assert_eq!(path, PathBuf::from("/music"));

        let mut config = TaggerConfig::default();
        options.apply(&mut config);
        assert_eq!(
            config.tagging.fields,
            vec![TagField::Genre, TagField::Bpm, TagField::TrackUrl]
        );
        assert!(!config.tagging.overwrite);
        assert_eq!(config.tagging.fuzziness, 70);
        assert_eq!(config.workers(), 4);
    }

    #[test]
    fn test_tag_defaults_keep_config() {
        let cli = Cli::try_parse_from(["beatport-tagger", "tag", "/music"]).unwrap();
        let Commands::Tag { options, .. } = cli.command else {
            panic!("expected tag command");
        };

        let mut config = TaggerConfig::default();
        options.apply(&mut config);
        assert_eq!(config.tagging.fields, vec![TagField::Genre]);
        assert!(config.tagging.overwrite);
        assert_eq!(config.workers(), 16);
    }

    #[test]
    fn test_overwrite_flags_conflict() {
        let result = Cli::try_parse_from([
            "beatport-tagger",
            "tag",
            "/music",
            "--overwrite",
            "--keep-existing",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_fuzziness_out_of_range() {
        let result = Cli::try_parse_from(["beatport-tagger", "match", "a.mp3", "--fuzziness", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_search_joins_words() {
        let cli = Cli::try_parse_from(["beatport-tagger", "search", "DJ", "One", "Test"]).unwrap();
        match cli.command {
            Commands::Search { query, limit } => {
                assert_eq!(query.join(" "), "DJ One Test");
                assert_eq!(limit, 10);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["beatport-tagger", "config", "--config", "/tmp/x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }
}
