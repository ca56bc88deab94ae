//! Configuration for the roster shell
//!
//! Defaults, overridden by keys from an optional TOML file, overridden by
//! explicit command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use roster_engine::codec;

use crate::Args;

/// Keys accepted in the TOML configuration file. All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    file: Option<String>,
    data_dir: Option<PathBuf>,
    log_level: Option<String>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Fully resolved configuration
#[derive(Debug)]
pub struct Config {
    pub file: String,
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Merge command-line flags over the config file over defaults.
    pub fn resolve(args: &Args) -> Result<Self> {
        let from_file = match &args.config {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };

        Ok(Config {
            file: args
                .file
                .clone()
                .or(from_file.file)
                .unwrap_or_else(|| codec::DEFAULT_FILE.to_string()),
            data_dir: args
                .data_dir
                .clone()
                .or(from_file.data_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            log_level: args
                .log_level
                .clone()
                .or(from_file.log_level)
                .unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Path of the data file: absolute names are used as-is, relative names
    /// resolve under the data directory.
    pub fn data_path(&self) -> PathBuf {
        let file = Path::new(&self.file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }
}
