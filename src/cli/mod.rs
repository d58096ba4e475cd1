//! Command-line interface for beatport-tagger.
//!
//! This module provides CLI commands for tagging directories, searching the
//! catalog and inspecting the configuration.

mod commands;

pub use commands::{Cli, Commands, TagOptions, run_command};
