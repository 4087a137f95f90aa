// File: src/lexicon/g2p.rs
use crate::lexicon::GraphemeToPhoneme;

/// A letter-to-sound rule engine for English spelling.
///
/// Walks the word left to right, preferring two-letter graphemes over single
/// letters. The first vowel gets primary stress, later vowels are unstressed.
/// Characters outside `a-z` are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleG2p;

impl RuleG2p {
    pub fn new() -> Self {
        Self
    }

    /// Transcribes a full word into stressed ARPAbet symbols.
    pub fn transcribe(&self, word: &str) -> Vec<String> {
        let letters: Vec<char> = word
            .chars()
            .map(|c| c.to_ascii_lowercase())
            .filter(|c| c.is_ascii_lowercase())
            .collect();
        let mut result: Vec<String> = Vec::new();
        let mut stressed = false;
        let mut i = 0;

        while i < letters.len() {
            let c = letters[i];
            let next = letters.get(i + 1).copied();

            if is_silent_final_e(&letters, i) {
                i += 1;
                continue;
            }

            if let Some(n) = next {
                if let Some(vowel) = self.vowel_digraph(c, n) {
                    push_vowel(&mut result, vowel, &mut stressed);
                    i += 2;
                    continue;
                }
                if let Some(cons) = self.consonant_digraph(c, n, i == 0) {
                    result.extend(cons.iter().map(|s| s.to_string()));
                    i += 2;
                    continue;
                }
            }

            match c {
                'a' => push_vowel(&mut result, "AE", &mut stressed),
                'e' => push_vowel(&mut result, "EH", &mut stressed),
                'i' => push_vowel(&mut result, "IH", &mut stressed),
                'o' => push_vowel(&mut result, "AA", &mut stressed),
                'u' => push_vowel(&mut result, "AH", &mut stressed),
                'y' => {
                    if i == 0 || next.map_or(false, is_vowel_letter) {
                        result.push("Y".to_string());
                    } else {
                        push_vowel(&mut result, "IY", &mut stressed);
                    }
                }
                'c' => {
                    let soft = matches!(next, Some('e' | 'i' | 'y'));
                    result.push(if soft { "S" } else { "K" }.to_string());
                }
                'x' => {
                    result.push("K".to_string());
                    result.push("S".to_string());
                }
                _ => {
                    if let Some(cons) = self.get_consonant(c) {
                        result.push(cons.to_string());
                    }
                }
            }
            i += 1;
        }

        result
    }

    fn vowel_digraph(&self, c: char, n: char) -> Option<&'static str> {
        match (c, n) {
            ('e', 'e') | ('e', 'a') | ('i', 'e') => Some("IY"),
            ('o', 'o') | ('u', 'e') | ('e', 'w') => Some("UW"),
            ('o', 'u') | ('o', 'w') => Some("AW"),
            ('o', 'i') | ('o', 'y') => Some("OY"),
            ('a', 'i') | ('a', 'y') | ('e', 'i') => Some("EY"),
            ('a', 'u') | ('a', 'w') => Some("AO"),
            ('o', 'a') => Some("OW"),
            ('e', 'r') | ('i', 'r') | ('u', 'r') => Some("ER"),
            _ => None,
        }
    }

    fn consonant_digraph(&self, c: char, n: char, initial: bool) -> Option<&'static [&'static str]> {
        let phonemes: &'static [&'static str] = match (c, n) {
            ('c', 'h') => &["CH"],
            ('s', 'h') => &["SH"],
            ('t', 'h') => &["TH"],
            ('p', 'h') => &["F"],
            ('n', 'g') => &["NG"],
            ('c', 'k') => &["K"],
            ('q', 'u') => &["K", "W"],
            ('w', 'h') => &["W"],
            ('g', 'h') => &[],
            ('k', 'n') if initial => &["N"],
            ('w', 'r') if initial => &["R"],
            _ => return None,
        };
        Some(phonemes)
    }

    fn get_consonant(&self, c: char) -> Option<&'static str> {
        match c {
            'b' => Some("B"), 'd' => Some("D"), 'f' => Some("F"),
            'g' => Some("G"), 'h' => Some("HH"), 'j' => Some("JH"),
            'k' => Some("K"), 'l' => Some("L"), 'm' => Some("M"),
            'n' => Some("N"), 'p' => Some("P"), 'q' => Some("K"),
            'r' => Some("R"), 's' => Some("S"), 't' => Some("T"),
            'v' => Some("V"), 'w' => Some("W"), 'z' => Some("Z"),
            _ => None,
        }
    }
}

impl GraphemeToPhoneme for RuleG2p {
    fn generate(&self, word: &str) -> Vec<String> {
        self.transcribe(word)
    }
}

fn is_vowel_letter(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// A word-final `e` after a consonant, in words with an earlier vowel.
fn is_silent_final_e(letters: &[char], i: usize) -> bool {
    i + 1 == letters.len()
        && i >= 2
        && letters[i] == 'e'
        && !is_vowel_letter(letters[i - 1])
        && letters[..i - 1].iter().any(|&c| is_vowel_letter(c) || c == 'y')
}

fn push_vowel(result: &mut Vec<String>, base: &str, stressed: &mut bool) {
    let digit = if *stressed { '0' } else { '1' };
    *stressed = true;
    result.push(format!("{}{}", base, digit));
}
