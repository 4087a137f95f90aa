//! Lexical collaborators of the resolver: pronunciation sources, a generative
//! grapheme-to-phoneme model and a lemmatizer.

pub mod dictionary;
pub mod g2p;
pub mod lemmatizer;

use crate::core::types::PhonemeSequence;
use std::collections::HashMap;

pub use dictionary::PronouncingDictionary;
pub use g2p::RuleG2p;
pub use lemmatizer::SuffixLemmatizer;

/// A word → pronunciations mapping. The first pronunciation is preferred.
pub trait PronunciationSource: Send + Sync {
    /// Empty when the word is not in the vocabulary.
    fn pronunciations(&self, word: &str) -> &[PhonemeSequence];
}

/// A generative model producing raw symbols for any word. Output may contain
/// tokens that are not valid phonemes.
pub trait GraphemeToPhoneme: Send + Sync {
    fn generate(&self, word: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
}

/// Total, idempotent on base forms.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String;
}

impl PronunciationSource for HashMap<String, Vec<PhonemeSequence>> {
    fn pronunciations(&self, word: &str) -> &[PhonemeSequence] {
        self.get(word).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Stands in for a pronunciation source that was not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptySource;

impl PronunciationSource for EmptySource {
    fn pronunciations(&self, _word: &str) -> &[PhonemeSequence] {
        &[]
    }
}

/// Generative model that never produces output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentG2p;

impl GraphemeToPhoneme for SilentG2p {
    fn generate(&self, _word: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Lemmatizer that returns every word unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityLemmatizer;

impl Lemmatizer for IdentityLemmatizer {
    fn lemmatize(&self, word: &str, _pos: PartOfSpeech) -> String {
        word.to_string()
    }
}

/// The three lookups the resolver consults, in priority order.
pub struct LexicalOracle {
    pub primary: Box<dyn PronunciationSource>,
    pub secondary: Box<dyn PronunciationSource>,
    pub generator: Box<dyn GraphemeToPhoneme>,
}

impl LexicalOracle {
    pub fn new(
        primary: Box<dyn PronunciationSource>,
        secondary: Box<dyn PronunciationSource>,
        generator: Box<dyn GraphemeToPhoneme>,
    ) -> Self {
        Self { primary, secondary, generator }
    }

    /// An oracle that knows no words at all.
    pub fn empty() -> Self {
        Self::new(Box::new(EmptySource), Box::new(EmptySource), Box::new(SilentG2p))
    }
}
