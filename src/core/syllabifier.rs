// File: src/core/syllabifier.rs
use crate::core::sonority::phoneme_rank;
use crate::core::types::{join_phonemes, Phoneme, Syllable};

/// Splits phoneme sequences into syllables by the Maximal Onset Principle,
/// constrained by sonority sequencing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Syllabifier;

impl Syllabifier {
    pub fn new() -> Self {
        Self
    }

    /// An onset is valid when sonority strictly rises from left to right.
    pub fn is_valid_onset(&self, onset: &[Phoneme]) -> bool {
        onset
            .windows(2)
            .all(|pair| phoneme_rank(&pair[0]) < phoneme_rank(&pair[1]))
    }

    /// Returns how many phonemes of an intervocalic cluster stay in the coda of
    /// the left syllable; the rest become the onset of the right one.
    ///
    /// A single consonant always goes to the onset. Longer clusters give the
    /// largest valid onset of at least two phonemes; with none, all of the
    /// cluster is coda.
    pub fn find_onset_split(&self, cluster: &[Phoneme]) -> usize {
        if cluster.len() <= 1 {
            return 0;
        }
        (0..cluster.len() - 1)
            .find(|&split| self.is_valid_onset(&cluster[split..]))
            .unwrap_or(cluster.len())
    }

    /// Partitions `phonemes` into syllables whose concatenation is the input.
    ///
    /// Nuclei are the stress-marked phonemes. Input without a nucleus comes back
    /// as one syllable; empty input gives no syllables.
    pub fn syllabify(&self, phonemes: &[Phoneme]) -> Vec<Syllable> {
        if phonemes.is_empty() {
            return Vec::new();
        }
        let nuclei: Vec<usize> = phonemes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_nucleus())
            .map(|(i, _)| i)
            .collect();
        if nuclei.is_empty() {
            return vec![phonemes.to_vec()];
        }

        let mut syllables = Vec::with_capacity(nuclei.len());
        let mut start = 0;
        for (idx, &nucleus) in nuclei.iter().enumerate() {
            let end = match nuclei.get(idx + 1) {
                Some(&next_nucleus) => {
                    let cluster = &phonemes[nucleus + 1..next_nucleus];
                    nucleus + 1 + self.find_onset_split(cluster)
                }
                None => phonemes.len(),
            };
            syllables.push(phonemes[start..end].to_vec());
            start = end;
        }
        syllables
    }

    /// Renders each syllable with hyphen-joined phonemes, e.g. `K-AE1-T`.
    pub fn format_syllables(&self, phonemes: &[Phoneme]) -> Vec<String> {
        self.syllabify(phonemes)
            .iter()
            .map(|s| join_phonemes(s, "-"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{parse_sequence, unknown_sequence};

    fn syllables(transcription: &str) -> Vec<String> {
        Syllabifier::new().format_syllables(&parse_sequence(transcription))
    }

    #[test]
    fn rising_cluster_is_whole_onset() {
        let s = Syllabifier::new();
        assert_eq!(s.find_onset_split(&parse_sequence("T R")), 0);
    }

    #[test]
    fn falling_cluster_is_whole_coda() {
        let s = Syllabifier::new();
        assert_eq!(s.find_onset_split(&parse_sequence("R T")), 2);
    }

    #[test]
    fn single_consonant_goes_to_onset() {
        let s = Syllabifier::new();
        assert_eq!(s.find_onset_split(&parse_sequence("K")), 0);
        assert_eq!(s.find_onset_split(&[]), 0);
        assert_eq!(syllables("B EY1 K AH0 N"), vec!["B-EY1", "K-AH0-N"]);
    }

    #[test]
    fn largest_rising_suffix_wins() {
        let s = Syllabifier::new();
        // S T R: S>T falls, T<R rises.
        assert_eq!(s.find_onset_split(&parse_sequence("S T R")), 1);
        assert_eq!(
            syllables("EH0 K S T R AH1"),
            vec!["EH0-K-S", "T-R-AH1"]
        );
    }

    #[test]
    fn equal_sonority_is_not_a_valid_onset() {
        let s = Syllabifier::new();
        assert!(!s.is_valid_onset(&parse_sequence("P T")));
        assert_eq!(s.find_onset_split(&parse_sequence("P T")), 2);
    }

    #[test]
    fn adjacent_nuclei_split_between_vowels() {
        assert_eq!(syllables("K EY1 AA2 S"), vec!["K-EY1", "AA2-S"]);
    }

    #[test]
    fn single_nucleus_keeps_everything() {
        assert_eq!(syllables("K AE1 T S"), vec!["K-AE1-T-S"]);
    }

    #[test]
    fn degenerate_inputs() {
        let s = Syllabifier::new();
        assert!(s.syllabify(&[]).is_empty());
        assert_eq!(s.syllabify(&unknown_sequence()), vec![unknown_sequence()]);
        let consonants = parse_sequence("S SH T");
        assert_eq!(s.syllabify(&consonants), vec![consonants.clone()]);
    }

    #[test]
    fn concatenation_reconstructs_input() {
        let s = Syllabifier::new();
        for transcription in [
            "AH0 B AW1 T",
            "IH2 N T ER0 N AE1 SH AH0 N AH0 L",
            "S T R EH1 NG K TH S",
            "W IH1 N T ER0",
            "D AH1 B AH0 L Y UW0",
        ] {
            let phonemes = parse_sequence(transcription);
            let parts = s.syllabify(&phonemes);
            assert!(parts.iter().all(|syl| !syl.is_empty()));
            assert_eq!(parts.concat(), phonemes);
        }
    }
}
