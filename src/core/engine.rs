use crate::config::Config;
use crate::core::resolver::{PhoneticResolver, ResolverOptions};
use crate::core::stats::{StatisticsAggregator, TextStatistics};
use crate::core::syllabifier::Syllabifier;
use crate::core::types::{Phoneme, PhonemeSequence, Syllable};
use crate::error::Result;
use crate::lexicon::{
    EmptySource, IdentityLemmatizer, Lemmatizer, LexicalOracle, PronunciationSource, RuleG2p,
    SuffixLemmatizer,
};
use crate::persistence::load_dictionary;
use crate::reader::TextSource;
use crate::unknown::{UnknownSink, UnknownWords};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// One word carried through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct WordAnalysis {
    pub word: String,
    pub phonemes: PhonemeSequence,
    pub syllables: Vec<Syllable>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAnalysis {
    pub name: String,
    pub words: Vec<WordAnalysis>,
    pub statistics: TextStatistics,
}

#[derive(Debug, Clone, Default)]
pub struct CorpusAnalysis {
    pub texts: Vec<TextAnalysis>,
    pub unknown: UnknownWords,
}

impl CorpusAnalysis {
    pub fn statistics(&self) -> Vec<TextStatistics> {
        self.texts.iter().map(|t| t.statistics.clone()).collect()
    }
}

/// Drives resolver, syllabifier and aggregator over words, texts and corpora.
pub struct AnalysisEngine {
    resolver: PhoneticResolver,
    syllabifier: Syllabifier,
    aggregator: StatisticsAggregator,
}

impl AnalysisEngine {
    pub fn new(
        resolver: PhoneticResolver,
        syllabifier: Syllabifier,
        aggregator: StatisticsAggregator,
    ) -> Self {
        Self { resolver, syllabifier, aggregator }
    }

    /// Loads the configured dictionaries and wires the default chain. A missing
    /// primary dictionary leaves the generative and letter-name stages only.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache_dir = config.lexicon.cache_dir.as_deref();

        let (primary, lemmatizer): (Box<dyn PronunciationSource>, Arc<dyn Lemmatizer>) =
            match &config.lexicon.dictionary {
                Some(path) => {
                    let dictionary = load_dictionary(path, cache_dir)?;
                    info!(path = %path.display(), words = dictionary.len(), "primary dictionary loaded");
                    let lemmatizer = SuffixLemmatizer::new(dictionary.vocabulary());
                    (Box::new(dictionary), Arc::new(lemmatizer))
                }
                None => {
                    warn!("no pronouncing dictionary configured; relying on generative fallback");
                    (Box::new(EmptySource), Arc::new(IdentityLemmatizer))
                }
            };

        let secondary: Box<dyn PronunciationSource> = match &config.lexicon.secondary_dictionary {
            Some(path) => {
                let dictionary = load_dictionary(path, cache_dir)?;
                info!(path = %path.display(), words = dictionary.len(), "secondary dictionary loaded");
                Box::new(dictionary)
            }
            None => Box::new(EmptySource),
        };

        let oracle = LexicalOracle::new(primary, secondary, Box::new(RuleG2p::new()));
        let resolver = PhoneticResolver::new(
            Arc::new(oracle),
            lemmatizer,
            ResolverOptions { strict_generative: config.resolver.strict_generative },
        );
        let stats = &config.statistics;
        let aggregator = StatisticsAggregator::new(
            stats.phoneme_frequencies,
            stats.ratio_precision,
            stats.frequency_precision,
        );
        Ok(Self::new(resolver, Syllabifier::new(), aggregator))
    }

    pub fn resolver(&self) -> &PhoneticResolver {
        &self.resolver
    }

    pub fn syllabifier(&self) -> &Syllabifier {
        &self.syllabifier
    }

    pub fn aggregator(&self) -> &StatisticsAggregator {
        &self.aggregator
    }

    pub fn analyze_word(&self, word: &str, sink: &mut dyn UnknownSink) -> WordAnalysis {
        let phonemes = self.resolver.resolve(word, sink);
        let syllables = self.syllabifier.syllabify(&phonemes);
        WordAnalysis { word: word.to_string(), phonemes, syllables }
    }

    /// Analyzes every token of a text and builds its statistics record.
    /// Repeated tokens are resolved once.
    pub fn analyze_text(&self, name: &str, words: &[String], sink: &mut dyn UnknownSink) -> TextAnalysis {
        let mut cache: HashMap<&str, WordAnalysis> = HashMap::new();
        let mut analyses = Vec::with_capacity(words.len());
        for word in words {
            let analysis = cache
                .entry(word.as_str())
                .or_insert_with(|| self.analyze_word(word, &mut *sink))
                .clone();
            analyses.push(analysis);
        }

        let all_phonemes: Vec<Phoneme> = analyses.iter().flat_map(|a| a.phonemes.iter().cloned()).collect();
        let all_syllables: Vec<Syllable> = analyses.iter().flat_map(|a| a.syllables.iter().cloned()).collect();
        let by_word: Vec<Vec<Syllable>> = analyses.iter().map(|a| a.syllables.clone()).collect();
        let length = words.iter().map(|w| w.chars().count() as u64).sum();

        let statistics = self
            .aggregator
            .text_statistics(name, length, &all_phonemes, &all_syllables, &by_word);
        TextAnalysis { name: name.to_string(), words: analyses, statistics }
    }

    /// Analyzes texts in parallel. Each worker collects unknown words on its own
    /// and the sets are merged; output keeps the input order.
    pub fn analyze_corpus(&self, sources: &[TextSource]) -> CorpusAnalysis {
        let results: Vec<(TextAnalysis, UnknownWords)> = sources
            .par_iter()
            .map(|source| {
                let mut unknown = UnknownWords::new();
                let analysis = self.analyze_text(&source.name, &source.words, &mut unknown);
                info!(text = %source.name, words = source.words.len(), "text analyzed");
                (analysis, unknown)
            })
            .collect();

        let mut corpus = CorpusAnalysis::default();
        for (analysis, unknown) in results {
            corpus.texts.push(analysis);
            corpus.unknown.merge(unknown);
        }
        corpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::parse_sequence;
    use crate::lexicon::{PronouncingDictionary, SilentG2p};

    fn engine() -> AnalysisEngine {
        let dictionary = PronouncingDictionary::parse(
            "CATS  K AE1 T S\nDID  D IH1 D\nNOT  N AA1 T\nBACON  B EY1 K AH0 N\n",
        );
        let lemmatizer = SuffixLemmatizer::new(dictionary.vocabulary());
        let oracle = LexicalOracle::new(Box::new(dictionary), Box::new(EmptySource), Box::new(SilentG2p));
        let resolver = PhoneticResolver::new(Arc::new(oracle), Arc::new(lemmatizer), ResolverOptions::default());
        AnalysisEngine::new(resolver, Syllabifier::new(), StatisticsAggregator::default())
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn single_word_text_statistics() {
        let text = engine().analyze_text("cats", &words(&["cats"]), &mut UnknownWords::new());
        assert_eq!(text.words[0].syllables, vec![parse_sequence("K AE1 T S")]);
        let stats = &text.statistics;
        assert_eq!(stats.length, 4);
        assert_eq!(stats.phoneme_count, 4);
        assert_eq!(stats.syllable_count, 1);
        assert_eq!(stats.phonemes_per_syllable, 4.0);
        assert_eq!(stats.phonology.cv_ratio, 3.0);
        assert_eq!(stats.phonology.first_shapes.get("first_CVCC"), Some(&1));
    }

    #[test]
    fn repeated_words_count_every_occurrence() {
        let text = engine().analyze_text("t", &words(&["cats", "Cats", "cats"]), &mut UnknownWords::new());
        assert_eq!(text.words.len(), 3);
        assert_eq!(text.statistics.phonology.shapes.get("CVCC"), Some(&3));
        assert_eq!(text.statistics.phonology.first_shapes.get("first_CVCC"), Some(&3));
    }

    #[test]
    fn corpus_merges_unknowns_and_keeps_order() {
        let sources = vec![
            TextSource::new("one", words(&["bacon", "'"])),
            TextSource::new("two", words(&["didn't", "-"])),
            TextSource::new("three", words(&["'"])),
        ];
        let corpus = engine().analyze_corpus(&sources);
        let names: Vec<&str> = corpus.texts.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
        assert_eq!(corpus.unknown.snapshot(), vec!["'".to_string(), "-".to_string()]);
        assert_eq!(
            corpus.texts[1].words[0].phonemes,
            parse_sequence("D IH1 D N AA1 T")
        );
    }
}
