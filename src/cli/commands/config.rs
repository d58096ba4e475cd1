//! Configuration inspection command.

use std::path::Path;

use crate::config::{self, ConfigError, TaggerConfig};
use crate::error::{Error, ResultExt};

/// Print the effective configuration, or write the defaults with `init`
pub fn cmd_config(current: &TaggerConfig, explicit: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => config::config_path(),
    };

    if init {
        let Some(path) = path else {
            return Err(Error::from(ConfigError::NoConfigDir).into());
        };
        if path.exists() {
            println!("Config already exists at {:?}, leaving it alone.", path);
            return Ok(());
        }
        config::save_to(&TaggerConfig::default(), &path)
            .with_context("Failed to write default config")?;
        println!("✓ Wrote default config to {:?}", path);
        return Ok(());
    }

    match &path {
        Some(p) if p.exists() => println!("# Config file: {:?}", p),
        Some(p) => println!("# Config file: {:?} (not present, using defaults)", p),
        None => println!("# No config directory available, using defaults"),
    }
    println!();
    print!("{}", toml::to_string_pretty(current)?);
    Ok(())
}
