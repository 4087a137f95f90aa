// File: src/core/stats.rs
use crate::core::ipa::{to_ipa, TARGET_ALPHABET};
use crate::core::types::{is_open, shape, Phoneme, Syllable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const FIRST_SYLLABLE_PREFIX: &str = "first_";
pub const TOTAL_ROW: &str = "TOTAL";

/// Rounds to `places` decimal digits.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// `numerator / denominator` rounded, or 0 when the denominator is 0.
pub fn guarded_ratio(numerator: u64, denominator: u64, places: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        round_to(numerator as f64 / denominator as f64, places)
    }
}

/// Phonological metrics of one text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhonologyStats {
    pub total_consonants: u64,
    pub total_vowels: u64,
    pub cv_ratio: f64,
    pub opened: u64,
    pub closed: u64,
    pub opened_closed_ratio: f64,
    /// Shape string → count over all syllables.
    pub shapes: BTreeMap<String, u64>,
    /// `first_`-prefixed shape string → count over first syllables of words.
    pub first_shapes: BTreeMap<String, u64>,
    /// IPA symbol → share of all phonemes, when frequency tables are enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phoneme_frequencies: Option<BTreeMap<String, f64>>,
}

/// A single cell of a flattened statistics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Ratio(f64),
    Text(String),
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Ratio(r) => write!(f, "{}", r),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// The statistics record of one text: caller-supplied scalars plus the
/// aggregated phonology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub text: String,
    pub length: u64,
    pub phoneme_count: u64,
    pub syllable_count: u64,
    pub phonemes_per_syllable: f64,
    #[serde(flatten)]
    pub phonology: PhonologyStats,
}

impl TextStatistics {
    /// Flattens the record into (metric, value) pairs: scalars, then shapes,
    /// then first-syllable shapes, then phoneme frequencies, each group sorted.
    pub fn to_record(&self) -> Vec<(String, MetricValue)> {
        let p = &self.phonology;
        let mut record = vec![
            ("Text".to_string(), MetricValue::Text(self.text.clone())),
            ("Length".to_string(), MetricValue::Count(self.length)),
            ("PhonemesCount".to_string(), MetricValue::Count(self.phoneme_count)),
            ("SyllablesCount".to_string(), MetricValue::Count(self.syllable_count)),
            ("PhonemesPerSyllable".to_string(), MetricValue::Ratio(self.phonemes_per_syllable)),
            ("Total C".to_string(), MetricValue::Count(p.total_consonants)),
            ("Total V".to_string(), MetricValue::Count(p.total_vowels)),
            ("C/V".to_string(), MetricValue::Ratio(p.cv_ratio)),
            ("Opened".to_string(), MetricValue::Count(p.opened)),
            ("Closed".to_string(), MetricValue::Count(p.closed)),
            ("Opened/Closed".to_string(), MetricValue::Ratio(p.opened_closed_ratio)),
        ];
        record.extend(p.shapes.iter().map(|(k, v)| (k.clone(), MetricValue::Count(*v))));
        record.extend(p.first_shapes.iter().map(|(k, v)| (k.clone(), MetricValue::Count(*v))));
        if let Some(freqs) = &p.phoneme_frequencies {
            record.extend(freqs.iter().map(|(k, v)| (k.clone(), MetricValue::Ratio(*v))));
        }
        record
    }
}

/// Folds phoneme and syllable data of one text into [`PhonologyStats`].
#[derive(Debug, Clone, Copy)]
pub struct StatisticsAggregator {
    include_frequencies: bool,
    ratio_precision: u32,
    frequency_precision: u32,
}

impl Default for StatisticsAggregator {
    fn default() -> Self {
        Self::new(true, 4, 5)
    }
}

impl StatisticsAggregator {
    pub fn new(include_frequencies: bool, ratio_precision: u32, frequency_precision: u32) -> Self {
        Self { include_frequencies, ratio_precision, frequency_precision }
    }

    pub fn ratio_precision(&self) -> u32 {
        self.ratio_precision
    }

    pub fn compute(
        &self,
        phonemes: &[Phoneme],
        syllables: &[Syllable],
        syllables_by_word: &[Vec<Syllable>],
    ) -> PhonologyStats {
        let total_vowels = phonemes.iter().filter(|p| p.is_vowel()).count() as u64;
        let total_consonants = phonemes.len() as u64 - total_vowels;

        let opened = syllables.iter().filter(|s| is_open(s)).count() as u64;
        let closed = syllables.len() as u64 - opened;

        let mut shapes = BTreeMap::new();
        for syllable in syllables {
            *shapes.entry(shape(syllable)).or_insert(0) += 1;
        }

        let mut first_shapes = BTreeMap::new();
        for first in syllables_by_word.iter().filter_map(|word| word.first()) {
            let key = format!("{}{}", FIRST_SYLLABLE_PREFIX, shape(first));
            *first_shapes.entry(key).or_insert(0) += 1;
        }

        let phoneme_frequencies = self
            .include_frequencies
            .then(|| self.phoneme_frequencies(phonemes));

        PhonologyStats {
            total_consonants,
            total_vowels,
            cv_ratio: guarded_ratio(total_consonants, total_vowels, self.ratio_precision),
            opened,
            closed,
            opened_closed_ratio: guarded_ratio(opened, closed, self.ratio_precision),
            shapes,
            first_shapes,
            phoneme_frequencies,
        }
    }

    /// Share of each target-alphabet symbol among all phonemes. Phonemes with
    /// no IPA rendering count toward the total only.
    fn phoneme_frequencies(&self, phonemes: &[Phoneme]) -> BTreeMap<String, f64> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for phoneme in phonemes {
            if let Some(ipa) = to_ipa(phoneme.base()) {
                *counts.entry(ipa).or_insert(0) += 1;
            }
        }
        let total = phonemes.len().max(1) as f64;
        TARGET_ALPHABET
            .iter()
            .map(|symbol| {
                let count = counts.get(symbol).copied().unwrap_or(0);
                (symbol.to_string(), round_to(count as f64 / total, self.frequency_precision))
            })
            .collect()
    }

    /// Merges per-text scalars with the aggregated phonology into one record.
    pub fn text_statistics(
        &self,
        text: &str,
        length: u64,
        phonemes: &[Phoneme],
        syllables: &[Syllable],
        syllables_by_word: &[Vec<Syllable>],
    ) -> TextStatistics {
        let phoneme_count = phonemes.len() as u64;
        let syllable_count = syllables.len() as u64;
        TextStatistics {
            text: text.to_string(),
            length,
            phoneme_count,
            syllable_count,
            phonemes_per_syllable: guarded_ratio(phoneme_count, syllable_count, self.ratio_precision),
            phonology: self.compute(phonemes, syllables, syllables_by_word),
        }
    }

    /// Sums per-text records into corpus totals. Ratios are recomputed from the
    /// summed counts and frequencies are weighted by each text's phoneme count.
    pub fn fold_corpus(&self, texts: &[TextStatistics]) -> TextStatistics {
        let mut total = TextStatistics {
            text: TOTAL_ROW.to_string(),
            ..TextStatistics::default()
        };
        let mut weighted: Option<BTreeMap<String, f64>> = None;

        for t in texts {
            total.length += t.length;
            total.phoneme_count += t.phoneme_count;
            total.syllable_count += t.syllable_count;

            let p = &t.phonology;
            let acc = &mut total.phonology;
            acc.total_consonants += p.total_consonants;
            acc.total_vowels += p.total_vowels;
            acc.opened += p.opened;
            acc.closed += p.closed;
            for (k, v) in &p.shapes {
                *acc.shapes.entry(k.clone()).or_insert(0) += v;
            }
            for (k, v) in &p.first_shapes {
                *acc.first_shapes.entry(k.clone()).or_insert(0) += v;
            }
            if let Some(freqs) = &p.phoneme_frequencies {
                let sums = weighted.get_or_insert_with(BTreeMap::new);
                for (symbol, share) in freqs {
                    *sums.entry(symbol.clone()).or_insert(0.0) += share * t.phoneme_count as f64;
                }
            }
        }

        let acc = &mut total.phonology;
        acc.cv_ratio = guarded_ratio(acc.total_consonants, acc.total_vowels, self.ratio_precision);
        acc.opened_closed_ratio = guarded_ratio(acc.opened, acc.closed, self.ratio_precision);
        total.phonemes_per_syllable =
            guarded_ratio(total.phoneme_count, total.syllable_count, self.ratio_precision);

        let denominator = total.phoneme_count.max(1) as f64;
        acc.phoneme_frequencies = weighted.map(|sums| {
            sums.into_iter()
                .map(|(symbol, sum)| (symbol, round_to(sum / denominator, self.frequency_precision)))
                .collect()
        });
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::parse_sequence;

    #[test]
    fn empty_input_has_zero_ratios() {
        let stats = StatisticsAggregator::default().compute(&[], &[], &[]);
        assert_eq!(stats.cv_ratio, 0.0);
        assert_eq!(stats.opened_closed_ratio, 0.0);
        assert!(stats.shapes.is_empty());
        let freqs = stats.phoneme_frequencies.unwrap();
        assert_eq!(freqs.len(), TARGET_ALPHABET.len());
        assert!(freqs.values().all(|&f| f == 0.0));
    }

    #[test]
    fn single_closed_word() {
        let cats = parse_sequence("K AE1 T S");
        let syllables = vec![cats.clone()];
        let stats = StatisticsAggregator::default().compute(&cats, &syllables, &[syllables.clone()]);
        assert_eq!(stats.total_consonants, 3);
        assert_eq!(stats.total_vowels, 1);
        assert_eq!(stats.cv_ratio, 3.0);
        assert_eq!(stats.opened, 0);
        assert_eq!(stats.closed, 1);
        assert_eq!(stats.opened_closed_ratio, 0.0);
        assert_eq!(stats.shapes.get("CVCC"), Some(&1));
        assert_eq!(stats.first_shapes.get("first_CVCC"), Some(&1));
    }

    #[test]
    fn first_shapes_count_only_word_initial_syllables() {
        let word = vec![parse_sequence("B EY1"), parse_sequence("K AH0 N")];
        let flat: Vec<Syllable> = word.clone();
        let phonemes: Vec<Phoneme> = flat.concat();
        let stats = StatisticsAggregator::default().compute(&phonemes, &flat, &[word, vec![]]);
        assert_eq!(stats.shapes.len(), 2);
        assert_eq!(stats.first_shapes.len(), 1);
        assert_eq!(stats.first_shapes.get("first_CV"), Some(&1));
        assert_eq!(stats.opened, 1);
        assert_eq!(stats.opened_closed_ratio, 1.0);
    }

    #[test]
    fn frequencies_use_ipa_and_count_unknowns_in_total() {
        let phonemes = parse_sequence("T AH0 T UNK");
        let stats = StatisticsAggregator::default().compute(&phonemes, &[], &[]);
        let freqs = stats.phoneme_frequencies.unwrap();
        assert_eq!(freqs["t"], 0.5);
        assert_eq!(freqs["ʌ"], 0.25);
        assert!(!freqs.contains_key("UNK"));
    }

    #[test]
    fn ratios_are_rounded() {
        assert_eq!(guarded_ratio(2, 3, 4), 0.6667);
        assert_eq!(guarded_ratio(5, 0, 4), 0.0);
    }

    #[test]
    fn record_groups_are_ordered() {
        let agg = StatisticsAggregator::new(false, 4, 5);
        let syllables = vec![parse_sequence("K AE1 T S"), parse_sequence("AH0")];
        let phonemes = syllables.concat();
        let stats = agg.text_statistics("t", 4, &phonemes, &syllables, &[syllables.clone()]);
        let keys: Vec<String> = stats.to_record().into_iter().map(|(k, _)| k).collect();
        let tail = &keys[keys.len() - 3..];
        assert_eq!(tail, ["CVCC", "V", "first_CVCC"]);
        assert_eq!(stats.phonemes_per_syllable, 2.5);
    }

    #[test]
    fn corpus_fold_sums_counts_and_recomputes_ratios() {
        let agg = StatisticsAggregator::default();
        let a_syl = vec![parse_sequence("K AE1 T S")];
        let b_syl = vec![parse_sequence("B IY1")];
        let a = agg.text_statistics("a", 4, &a_syl.concat(), &a_syl, &[a_syl.clone()]);
        let b = agg.text_statistics("b", 2, &b_syl.concat(), &b_syl, &[b_syl.clone()]);
        let total = agg.fold_corpus(&[a, b]);
        assert_eq!(total.text, TOTAL_ROW);
        assert_eq!(total.phoneme_count, 6);
        assert_eq!(total.phonology.total_consonants, 4);
        assert_eq!(total.phonology.total_vowels, 2);
        assert_eq!(total.phonology.cv_ratio, 2.0);
        assert_eq!(total.phonology.opened_closed_ratio, 1.0);
        let freqs = total.phonology.phoneme_frequencies.unwrap();
        assert!((freqs["k"] - round_to(1.0 / 6.0, 5)).abs() < 1e-9);
    }
}
