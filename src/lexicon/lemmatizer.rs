// File: src/lexicon/lemmatizer.rs
use crate::lexicon::{Lemmatizer, PartOfSpeech};
use std::collections::HashSet;

/// Detachment rules (inflected suffix, base suffix), tried in order.
const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

fn irregular(word: &str, pos: PartOfSpeech) -> Option<&'static str> {
    match pos {
        PartOfSpeech::Verb => match word {
            "was" | "were" | "been" | "am" | "is" | "are" => Some("be"),
            "went" | "gone" => Some("go"),
            "did" | "done" | "does" => Some("do"),
            "had" | "has" => Some("have"),
            "ran" => Some("run"),
            "saw" | "seen" => Some("see"),
            "took" | "taken" => Some("take"),
            "made" => Some("make"),
            "said" => Some("say"),
            "came" => Some("come"),
            "gave" | "given" => Some("give"),
            "got" | "gotten" => Some("get"),
            "knew" | "known" => Some("know"),
            "thought" => Some("think"),
            "wrote" | "written" => Some("write"),
            _ => None,
        },
        PartOfSpeech::Noun => match word {
            "children" => Some("child"),
            "women" => Some("woman"),
            "feet" => Some("foot"),
            "teeth" => Some("tooth"),
            "mice" => Some("mouse"),
            "geese" => Some("goose"),
            "people" => Some("person"),
            _ => None,
        },
    }
}

/// WordNet-style suffix lemmatizer.
///
/// Rule outputs are accepted only when they are in the vocabulary; of several
/// accepted outputs the shortest wins. Words already in the vocabulary and words
/// no rule can reduce are returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct SuffixLemmatizer {
    vocabulary: HashSet<String>,
}

impl SuffixLemmatizer {
    pub fn new(vocabulary: HashSet<String>) -> Self {
        Self { vocabulary }
    }

    fn rules(pos: PartOfSpeech) -> &'static [(&'static str, &'static str)] {
        match pos {
            PartOfSpeech::Noun => NOUN_RULES,
            PartOfSpeech::Verb => VERB_RULES,
        }
    }
}

impl Lemmatizer for SuffixLemmatizer {
    fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String {
        if word.is_empty() || self.vocabulary.contains(word) {
            return word.to_string();
        }
        if let Some(base) = irregular(word, pos) {
            return base.to_string();
        }

        let mut best: Option<String> = None;
        for (suffix, replacement) in Self::rules(pos) {
            let Some(stem) = word.strip_suffix(suffix) else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }
            let candidate = format!("{}{}", stem, replacement);
            if !self.vocabulary.contains(&candidate) {
                continue;
            }
            if best.as_ref().map_or(true, |b| candidate.len() < b.len()) {
                best = Some(candidate);
            }
        }
        best.unwrap_or_else(|| word.to_string())
    }
}
