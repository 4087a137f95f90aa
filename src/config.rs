//! Configuration loading
//!
//! Lookup order: explicit path, `PHONOSTAT_CONFIG`, `./phonostat.toml`, then
//! built-in defaults. Command-line flags are applied on top by the binaries.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_ENV_VAR: &str = "PHONOSTAT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "phonostat.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lexicon: LexiconConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub statistics: StatisticsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pronunciation sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// CMUdict-format primary dictionary
    #[serde(default)]
    pub dictionary: Option<PathBuf>,

    /// Consulted after the primary dictionary misses
    #[serde(default)]
    pub secondary_dictionary: Option<PathBuf>,

    /// Where compiled dictionaries are kept (no caching if unset)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Reject generative output that has no well-formed phoneme
    #[serde(default)]
    pub strict_generative: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsConfig {
    #[serde(default = "default_true")]
    pub phoneme_frequencies: bool,

    #[serde(default = "default_ratio_precision")]
    pub ratio_precision: u32,

    #[serde(default = "default_frequency_precision")]
    pub frequency_precision: u32,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            phoneme_frequencies: true,
            ratio_precision: default_ratio_precision(),
            frequency_precision: default_frequency_precision(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Per-text transcription and syllable files
    #[serde(default = "default_true")]
    pub word_files: bool,

    /// Statistics.json next to Statistics.csv
    #[serde(default = "default_true")]
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            word_files: true,
            json: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_true() -> bool {
    true
}

fn default_ratio_precision() -> u32 {
    4
}

fn default_frequency_precision() -> u32 {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolves the configuration file and loads it, or returns defaults when
    /// none is found. An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            debug!(path = %local.display(), "loading local configuration");
            return Self::from_file(local);
        }
        Ok(Self::default())
    }
}
