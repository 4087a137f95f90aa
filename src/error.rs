// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A text source could not be decoded as UTF-8. Hosts skip the text.
    #[error("Text is not valid UTF-8: {}", .path.display())]
    Decode { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dictionary cache error: {0}")]
    Cache(#[from] bincode::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
