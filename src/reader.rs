// File: src/reader.rs
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Letters, optionally joined by one straight or curly apostrophe.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z]+(?:['’][A-Za-z]+)?").expect("token pattern is valid")
});

/// Splits text into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// A named sequence of word tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSource {
    pub name: String,
    pub words: Vec<String>,
}

impl TextSource {
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Self {
        Self { name: name.into(), words }
    }

    /// Tokenizes a passage entered by hand.
    pub fn from_passage(name: impl Into<String>, passage: &str) -> Self {
        Self::new(name, tokenize(passage))
    }
}

/// Reads and tokenizes a UTF-8 text file.
pub fn read_text_file(path: &Path) -> Result<TextSource> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|_| Error::Decode { path: path.to_path_buf() })?;
    Ok(TextSource::new(text_name(path), tokenize(&text)))
}

/// File stem used as the text identifier.
pub fn text_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A file is returned as is; a folder yields its top-level `*.txt` files in
/// name order.
pub fn discover_texts(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.extension()
                .map_or(false, |ext| ext.to_string_lossy().eq_ignore_ascii_case("txt"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Loads every text under `path`. Texts that cannot be read or decoded are
/// logged and returned separately so the run can continue without them.
pub fn load_sources(path: &Path) -> Result<(Vec<TextSource>, Vec<(PathBuf, Error)>)> {
    let mut sources = Vec::new();
    let mut skipped = Vec::new();
    for file in discover_texts(path)? {
        match read_text_file(&file) {
            Ok(source) => sources.push(source),
            Err(e) => {
                warn!(path = %file.display(), error = %e, "skipping text");
                skipped.push((file, e));
            }
        }
    }
    Ok((sources, skipped))
}
