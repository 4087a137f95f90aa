// File: src/unknown.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Receives words that no resolution stage could transcribe.
///
/// The resolver never keeps this state itself, so parallel workers can each
/// own a collector and merge them afterwards.
pub trait UnknownSink {
    fn record(&mut self, word: &str);
}

/// Deduplicated, sorted collection of unknown words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownWords {
    words: BTreeSet<String>,
}

impl UnknownWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Folds another collector into this one.
    pub fn merge(&mut self, other: UnknownWords) {
        self.words.extend(other.words);
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.words.iter().cloned().collect()
    }
}

impl UnknownSink for UnknownWords {
    fn record(&mut self, word: &str) {
        if !word.is_empty() && !self.words.contains(word) {
            self.words.insert(word.to_string());
        }
    }
}

/// Sink for callers that do not care about unknown words.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardUnknown;

impl UnknownSink for DiscardUnknown {
    fn record(&mut self, _word: &str) {}
}
