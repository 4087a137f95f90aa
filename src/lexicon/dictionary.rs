// File: src/lexicon/dictionary.rs
use crate::core::types::{parse_sequence, PhonemeSequence};
use crate::error::{Error, Result};
use crate::lexicon::PronunciationSource;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A pronouncing dictionary in CMUdict format.
///
/// Each line holds a word followed by its phonemes, e.g. `CATS  K AE1 T S`.
/// Alternative pronunciations repeat the word with a `(n)` suffix and are kept
/// in file order. Lines starting with `;;;` and anything after `#` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PronouncingDictionary {
    entries: HashMap<String, Vec<PhonemeSequence>>,
}

impl PronouncingDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(content: &str) -> Self {
        let mut dictionary = Self::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let line = match line.split_once('#') {
                Some((entry, _comment)) => entry.trim_end(),
                None => line,
            };
            let Some((head, transcription)) = line.split_once(char::is_whitespace) else {
                continue;
            };
            let phonemes = parse_sequence(transcription);
            if phonemes.is_empty() {
                continue;
            }
            dictionary.insert(strip_variant(head), phonemes);
        }
        dictionary
    }

    /// Reads and parses a dictionary file. Invalid UTF-8 bytes are replaced.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path)?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), "dictionary is not valid UTF-8; decoding lossily");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        let dictionary = Self::parse(&content);
        debug!(path = %path.display(), words = dictionary.len(), "parsed pronouncing dictionary");
        Ok(dictionary)
    }

    /// Appends a pronunciation for `word`, keeping earlier ones preferred.
    pub fn insert(&mut self, word: &str, phonemes: PhonemeSequence) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(phonemes);
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn vocabulary(&self) -> HashSet<String> {
        self.entries.keys().cloned().collect()
    }
}

impl PronunciationSource for PronouncingDictionary {
    fn pronunciations(&self, word: &str) -> &[PhonemeSequence] {
        self.entries.get(word).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// `word(2)` → `word`
fn strip_variant(head: &str) -> &str {
    match head.strip_suffix(')').and_then(|h| h.rsplit_once('(')) {
        Some((word, n)) if !word.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => word,
        _ => head,
    }
}
