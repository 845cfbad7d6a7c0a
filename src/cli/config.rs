//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every command line:
//!
//! ```toml
//! # aja-tools.toml
//! [loader]
//! duplicate_timestamps = "keep-first"
//!
//! [alignment]
//! dropout_tolerance = 3
//! range_margin = 0.01
//! ```
//!
//! Command-line flags override the file, which overrides the profile.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use aja_tools::align::AlignConfig;
use aja_tools::logfile::{DuplicateTimestamps, LoadOptions};

/// Root configuration structure for aja-tools.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Logfile loading settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Alignment settings.
    #[serde(default)]
    pub alignment: AlignmentConfig,
}

/// Configuration for loading logfiles.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    /// How rows repeating the previous timestamp are handled.
    pub duplicate_timestamps: Option<DuplicateTimestamps>,
}

/// Configuration for the align command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignmentConfig {
    /// Out-of-range samples bridged inside a match.
    pub dropout_tolerance: Option<usize>,

    /// Fraction by which target ranges are widened.
    pub range_margin: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Load configuration from an optional path, defaulting when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Loader options from the `[loader]` table.
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            duplicate_timestamps: self.loader.duplicate_timestamps.unwrap_or_default(),
        }
    }

    /// Apply the `[alignment]` table on top of `base`.
    pub fn align_config(&self, base: AlignConfig) -> AlignConfig {
        AlignConfig {
            dropout_tolerance: self.alignment.dropout_tolerance.unwrap_or(base.dropout_tolerance),
            range_margin: self.alignment.range_margin.unwrap_or(base.range_margin),
        }
    }
}
