// File: src/core/resolver.rs
use crate::core::types::{
    is_phoneme_syntax, is_unknown_sequence, unknown_sequence, Phoneme, PhonemeSequence,
};
use crate::lexicon::{Lemmatizer, LexicalOracle, PartOfSpeech, PronunciationSource};
use crate::unknown::UnknownSink;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of one resolution stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Resolved(PhonemeSequence),
    /// The stage does not apply; try the next one.
    Pass,
    /// Stop the chain and treat the word as unknown.
    GiveUp,
}

/// The forms of a word the stages look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordForms {
    pub normalized: String,
    /// `normalized` first, then its lemma when distinct.
    pub candidates: Vec<String>,
    /// Nesting level; contraction parts are resolved one level down.
    pub depth: usize,
}

/// State shared with a stage while it runs.
pub struct ResolveScope<'a> {
    resolver: &'a PhoneticResolver,
    sink: &'a mut dyn UnknownSink,
}

impl ResolveScope<'_> {
    pub fn oracle(&self) -> &LexicalOracle {
        &self.resolver.oracle
    }

    /// Resolves a sub-word through the full chain at `depth`.
    pub fn resolve_part(&mut self, word: &str, depth: usize) -> PhonemeSequence {
        self.resolver.resolve_at(word, depth, &mut *self.sink)
    }
}

/// One link of the fallback chain.
pub trait ResolutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn attempt(&self, forms: &WordForms, scope: &mut ResolveScope<'_>) -> Attempt;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionarySource {
    Primary,
    Secondary,
}

/// First pronunciation of the first candidate found in a dictionary.
pub struct DictionaryLookup {
    source: DictionarySource,
}

impl DictionaryLookup {
    pub fn new(source: DictionarySource) -> Self {
        Self { source }
    }
}

impl ResolutionStrategy for DictionaryLookup {
    fn name(&self) -> &'static str {
        match self.source {
            DictionarySource::Primary => "dictionary",
            DictionarySource::Secondary => "secondary-dictionary",
        }
    }

    fn attempt(&self, forms: &WordForms, scope: &mut ResolveScope<'_>) -> Attempt {
        let oracle = scope.oracle();
        let source: &dyn PronunciationSource = match self.source {
            DictionarySource::Primary => oracle.primary.as_ref(),
            DictionarySource::Secondary => oracle.secondary.as_ref(),
        };
        forms
            .candidates
            .iter()
            .find_map(|form| source.pronunciations(form).first())
            .map_or(Attempt::Pass, |p| Attempt::Resolved(p.clone()))
    }
}

/// Second element of a contraction split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractionPart {
    Word(&'static str),
    Possessive,
}

/// Suffix patterns in match order.
const CONTRACTIONS: &[(&str, ContractionPart)] = &[
    ("n't", ContractionPart::Word("not")),
    ("'ll", ContractionPart::Word("will")),
    ("'ve", ContractionPart::Word("have")),
    ("'re", ContractionPart::Word("are")),
    ("'d", ContractionPart::Word("would")),
    ("'m", ContractionPart::Word("am")),
    ("'s", ContractionPart::Possessive),
];

/// Phoneme standing in for the possessive `'s`.
pub const POSSESSIVE_PHONEME: &str = "Z";

/// Splits `didn't` into `("did", Word("not"))`. The stem must be non-empty
/// lowercase ASCII letters.
pub fn split_contraction(word: &str) -> Option<(&str, ContractionPart)> {
    CONTRACTIONS.iter().find_map(|&(suffix, part)| {
        let stem = word.strip_suffix(suffix)?;
        let valid = !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_lowercase());
        valid.then_some((stem, part))
    })
}

/// Expands contractions and resolves each part independently.
pub struct ContractionExpansion;

impl ResolutionStrategy for ContractionExpansion {
    fn name(&self) -> &'static str {
        "contraction"
    }

    fn attempt(&self, forms: &WordForms, scope: &mut ResolveScope<'_>) -> Attempt {
        // Parts are plain words, so only the outermost call expands.
        if forms.depth > 0 {
            return Attempt::Pass;
        }
        let Some((stem, tail)) = split_contraction(&forms.normalized) else {
            return Attempt::Pass;
        };

        let mut phonemes = PhonemeSequence::new();
        let stem_phonemes = scope.resolve_part(stem, forms.depth + 1);
        if !is_unknown_sequence(&stem_phonemes) {
            phonemes.extend(stem_phonemes);
        }
        match tail {
            ContractionPart::Possessive => phonemes.push(Phoneme::new(POSSESSIVE_PHONEME)),
            ContractionPart::Word(word) => {
                let tail_phonemes = scope.resolve_part(word, forms.depth + 1);
                if !is_unknown_sequence(&tail_phonemes) {
                    phonemes.extend(tail_phonemes);
                }
            }
        }

        if phonemes.is_empty() {
            Attempt::GiveUp
        } else {
            Attempt::Resolved(phonemes)
        }
    }
}

/// Runs the generative model, keeping only well-formed symbols.
pub struct GenerativeFallback {
    /// When set, output with no well-formed symbol is rejected instead of being
    /// returned raw.
    strict: bool,
}

impl GenerativeFallback {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }
}

impl ResolutionStrategy for GenerativeFallback {
    fn name(&self) -> &'static str {
        "generative"
    }

    fn attempt(&self, forms: &WordForms, scope: &mut ResolveScope<'_>) -> Attempt {
        let raw = scope.oracle().generator.generate(&forms.normalized);
        let valid: PhonemeSequence = raw
            .iter()
            .filter(|s| is_phoneme_syntax(s))
            .map(|s| Phoneme::new(s.as_str()))
            .collect();
        if !valid.is_empty() {
            return Attempt::Resolved(valid);
        }
        if raw.is_empty() || self.strict {
            return Attempt::Pass;
        }
        debug!(word = %forms.normalized, ?raw, "generative output has no valid phoneme; keeping it raw");
        Attempt::Resolved(raw.into_iter().map(Phoneme::from).collect())
    }
}

/// How each letter is named aloud.
pub fn letter_name(letter: char) -> Option<&'static [&'static str]> {
    let phonemes: &'static [&'static str] = match letter {
        'a' => &["EY1"],
        'b' => &["B", "IY1"],
        'c' => &["S", "IY1"],
        'd' => &["D", "IY1"],
        'e' => &["IY1"],
        'f' => &["EH1", "F"],
        'g' => &["JH", "IY1"],
        'h' => &["EY1", "CH"],
        'i' => &["AY1"],
        'j' => &["JH", "EY1"],
        'k' => &["K", "EY1"],
        'l' => &["EH1", "L"],
        'm' => &["EH1", "M"],
        'n' => &["EH1", "N"],
        'o' => &["OW1"],
        'p' => &["P", "IY1"],
        'q' => &["K", "Y", "UW1"],
        'r' => &["AA1", "R"],
        's' => &["EH1", "S"],
        't' => &["T", "IY1"],
        'u' => &["Y", "UW1"],
        'v' => &["V", "IY1"],
        'w' => &["D", "AH1", "B", "AH0", "L", "Y", "UW0"],
        'x' => &["EH1", "K", "S"],
        'y' => &["W", "AY1"],
        'z' => &["Z", "IY1"],
        _ => return None,
    };
    Some(phonemes)
}

/// Spells the word out letter by letter.
pub struct LetterNames;

impl ResolutionStrategy for LetterNames {
    fn name(&self) -> &'static str {
        "letter-names"
    }

    fn attempt(&self, forms: &WordForms, _scope: &mut ResolveScope<'_>) -> Attempt {
        let phonemes: PhonemeSequence = forms
            .normalized
            .chars()
            .filter_map(letter_name)
            .flatten()
            .map(|&s| Phoneme::new(s))
            .collect();
        if phonemes.is_empty() {
            Attempt::Pass
        } else {
            Attempt::Resolved(phonemes)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverOptions {
    pub strict_generative: bool,
}

/// Maps a word token to phonemes through a fixed-priority chain:
/// primary dictionary, secondary dictionary, contraction expansion,
/// generative model, letter names, and finally the unknown marker.
pub struct PhoneticResolver {
    oracle: Arc<LexicalOracle>,
    lemmatizer: Arc<dyn Lemmatizer>,
    stages: Vec<Box<dyn ResolutionStrategy>>,
}

impl PhoneticResolver {
    pub fn new(
        oracle: Arc<LexicalOracle>,
        lemmatizer: Arc<dyn Lemmatizer>,
        options: ResolverOptions,
    ) -> Self {
        let stages: Vec<Box<dyn ResolutionStrategy>> = vec![
            Box::new(DictionaryLookup::new(DictionarySource::Primary)),
            Box::new(DictionaryLookup::new(DictionarySource::Secondary)),
            Box::new(ContractionExpansion),
            Box::new(GenerativeFallback::new(options.strict_generative)),
            Box::new(LetterNames),
        ];
        Self::with_stages(oracle, lemmatizer, stages)
    }

    pub fn with_stages(
        oracle: Arc<LexicalOracle>,
        lemmatizer: Arc<dyn Lemmatizer>,
        stages: Vec<Box<dyn ResolutionStrategy>>,
    ) -> Self {
        Self { oracle, lemmatizer, stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Lowercases, folds `’` into `'` and trims.
    pub fn normalize(word: &str) -> String {
        word.to_lowercase().replace('\u{2019}', "'").trim().to_string()
    }

    /// Candidate lookup forms: the normalized word, then its lemma if distinct.
    pub fn word_forms(&self, word: &str, depth: usize) -> WordForms {
        let normalized = Self::normalize(word);
        let verb = self.lemmatizer.lemmatize(&normalized, PartOfSpeech::Verb);
        let lemma = self.lemmatizer.lemmatize(&verb, PartOfSpeech::Noun);
        let mut candidates = vec![normalized.clone()];
        if lemma != normalized {
            candidates.push(lemma);
        }
        WordForms { normalized, candidates, depth }
    }

    /// Never fails: words nothing can transcribe are reported to `sink` and come
    /// back as the unknown marker.
    pub fn resolve(&self, word: &str, sink: &mut dyn UnknownSink) -> PhonemeSequence {
        self.resolve_at(word, 0, sink)
    }

    fn resolve_at(&self, word: &str, depth: usize, sink: &mut dyn UnknownSink) -> PhonemeSequence {
        let forms = self.word_forms(word, depth);
        let mut scope = ResolveScope { resolver: self, sink };

        for stage in &self.stages {
            match stage.attempt(&forms, &mut scope) {
                Attempt::Resolved(phonemes) if !phonemes.is_empty() => {
                    trace!(word = %forms.normalized, stage = stage.name(), "resolved");
                    return phonemes;
                }
                Attempt::Resolved(_) | Attempt::Pass => continue,
                Attempt::GiveUp => break,
            }
        }

        debug!(word = %forms.normalized, "no pronunciation found");
        scope.sink.record(&forms.normalized);
        unknown_sequence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{parse_sequence, UNKNOWN_MARKER};
    use crate::lexicon::{
        EmptySource, GraphemeToPhoneme, IdentityLemmatizer, SilentG2p, SuffixLemmatizer,
    };
    use crate::unknown::UnknownWords;
    use std::collections::HashMap;

    struct FixedG2p(Vec<&'static str>);

    impl GraphemeToPhoneme for FixedG2p {
        fn generate(&self, word: &str) -> Vec<String> {
            if word.is_empty() {
                return Vec::new();
            }
            self.0.iter().map(|s| s.to_string()).collect()
        }
    }

    fn dict(entries: &[(&str, &str)]) -> HashMap<String, Vec<PhonemeSequence>> {
        let mut map: HashMap<String, Vec<PhonemeSequence>> = HashMap::new();
        for (word, transcription) in entries {
            map.entry(word.to_string())
                .or_default()
                .push(parse_sequence(transcription));
        }
        map
    }

    fn resolver_with(
        primary: HashMap<String, Vec<PhonemeSequence>>,
        secondary: HashMap<String, Vec<PhonemeSequence>>,
        generator: Box<dyn GraphemeToPhoneme>,
        strict: bool,
    ) -> PhoneticResolver {
        let lemmatizer = SuffixLemmatizer::new(primary.keys().cloned().collect());
        let oracle = LexicalOracle::new(Box::new(primary), Box::new(secondary), generator);
        PhoneticResolver::new(
            Arc::new(oracle),
            Arc::new(lemmatizer),
            ResolverOptions { strict_generative: strict },
        )
    }

    fn basic_resolver() -> PhoneticResolver {
        resolver_with(
            dict(&[
                ("cats", "K AE1 T S"),
                ("cat", "K AE1 T"),
                ("did", "D IH1 D"),
                ("not", "N AA1 T"),
                ("read", "R IY1 D"),
                ("read", "R EH1 D"),
                ("walk", "W AO1 K"),
                ("john", "JH AA1 N"),
            ]),
            dict(&[("gif", "JH IH1 F"), ("cat", "K AA1 T")]),
            Box::new(SilentG2p),
            false,
        )
    }

    #[test]
    fn dictionary_hit_returns_first_pronunciation() {
        let r = basic_resolver();
        let mut unknown = UnknownWords::new();
        assert_eq!(r.resolve("cats", &mut unknown), parse_sequence("K AE1 T S"));
        assert_eq!(r.resolve("read", &mut unknown), parse_sequence("R IY1 D"));
        assert!(unknown.is_empty());
    }

    #[test]
    fn normalization_folds_case_and_quotes() {
        assert_eq!(PhoneticResolver::normalize("  Didn\u{2019}t "), "didn't");
        let r = basic_resolver();
        assert_eq!(r.resolve("CATS", &mut UnknownWords::new()), parse_sequence("K AE1 T S"));
    }

    #[test]
    fn lemma_is_tried_after_surface_form() {
        let r = basic_resolver();
        let forms = r.word_forms("walked", 0);
        assert_eq!(forms.candidates, vec!["walked", "walk"]);
        assert_eq!(r.resolve("walked", &mut UnknownWords::new()), parse_sequence("W AO1 K"));
    }

    #[test]
    fn primary_dictionary_outranks_secondary() {
        let r = basic_resolver();
        assert_eq!(r.resolve("cat", &mut UnknownWords::new()), parse_sequence("K AE1 T"));
        assert_eq!(r.resolve("gif", &mut UnknownWords::new()), parse_sequence("JH IH1 F"));
    }

    #[test]
    fn contraction_concatenates_parts_in_order() {
        let r = basic_resolver();
        let mut unknown = UnknownWords::new();
        assert_eq!(
            r.resolve("didn't", &mut unknown),
            parse_sequence("D IH1 D N AA1 T")
        );
        assert!(unknown.is_empty());
    }

    #[test]
    fn possessive_maps_to_z() {
        let r = basic_resolver();
        assert_eq!(
            r.resolve("john's", &mut UnknownWords::new()),
            parse_sequence("JH AA1 N Z")
        );
    }

    #[test]
    fn split_contraction_patterns() {
        assert_eq!(split_contraction("didn't"), Some(("did", ContractionPart::Word("not"))));
        assert_eq!(split_contraction("we'll"), Some(("we", ContractionPart::Word("will"))));
        assert_eq!(split_contraction("it's"), Some(("it", ContractionPart::Possessive)));
        assert_eq!(split_contraction("'s"), None);
        assert_eq!(split_contraction("cats"), None);
    }

    #[test]
    fn generative_output_is_filtered_to_valid_symbols() {
        let r = resolver_with(
            dict(&[]),
            dict(&[]),
            Box::new(FixedG2p(vec!["Z", "ˈ", "AY1", "B"])),
            false,
        );
        assert_eq!(r.resolve("zyb", &mut UnknownWords::new()), parse_sequence("Z AY1 B"));
    }

    #[test]
    fn malformed_generative_output_kept_raw_unless_strict() {
        let junk = || Box::new(FixedG2p(vec!["?", "ə"]));
        let lenient = resolver_with(dict(&[]), dict(&[]), junk(), false);
        let raw = lenient.resolve("ab", &mut UnknownWords::new());
        assert_eq!(raw, vec![Phoneme::from("?"), Phoneme::from("ə")]);

        let strict = resolver_with(dict(&[]), dict(&[]), junk(), true);
        assert_eq!(
            strict.resolve("ab", &mut UnknownWords::new()),
            parse_sequence("EY1 B IY1")
        );
    }

    #[test]
    fn letter_names_spell_out_unknown_words() {
        let r = resolver_with(dict(&[]), dict(&[]), Box::new(SilentG2p), false);
        let mut unknown = UnknownWords::new();
        assert_eq!(r.resolve("xw", &mut unknown), parse_sequence("EH1 K S D AH1 B AH0 L Y UW0"));
        assert!(unknown.is_empty());
    }

    #[test]
    fn unresolvable_word_is_recorded_once() {
        let r = resolver_with(dict(&[]), dict(&[]), Box::new(SilentG2p), false);
        let mut unknown = UnknownWords::new();
        let first = r.resolve("'''", &mut unknown);
        assert_eq!(first, vec![Phoneme::from(UNKNOWN_MARKER)]);
        r.resolve("'''", &mut unknown);
        assert_eq!(unknown.snapshot(), vec!["'''".to_string()]);
    }

    #[test]
    fn resolve_is_total_on_empty_input() {
        let oracle = Arc::new(LexicalOracle::new(
            Box::new(EmptySource),
            Box::new(EmptySource),
            Box::new(SilentG2p),
        ));
        let r = PhoneticResolver::new(oracle, Arc::new(IdentityLemmatizer), ResolverOptions::default());
        let mut unknown = UnknownWords::new();
        for word in ["", "   ", "\u{2019}", "é"] {
            let phonemes = r.resolve(word, &mut unknown);
            assert!(!phonemes.is_empty());
        }
        assert!(!unknown.contains(""));
    }

    #[test]
    fn resolved_words_never_enter_unknown_set() {
        let r = basic_resolver();
        let mut unknown = UnknownWords::new();
        let mut seen = 0;
        for word in ["cats", "'''", "did", "-", "walked", "'''"] {
            r.resolve(word, &mut unknown);
            assert!(unknown.len() >= seen);
            seen = unknown.len();
        }
        assert!(!unknown.contains("cats"));
        assert!(!unknown.contains("walked"));
        assert_eq!(unknown.len(), 2);
    }

    #[test]
    fn default_chain_order() {
        assert_eq!(
            basic_resolver().stage_names(),
            vec!["dictionary", "secondary-dictionary", "contraction", "generative", "letter-names"]
        );
    }
}
