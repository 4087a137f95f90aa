// src/core/ipa.rs
use once_cell::sync::Lazy;

/// IPA rendering of an ARPAbet base.
pub fn to_ipa(base: &str) -> Option<&'static str> {
    let ipa = match base {
        "AA" => "ɑ", "AE" => "æ", "AH" => "ʌ", "AO" => "ɔ",
        "AW" => "aʊ", "AY" => "aɪ", "EH" => "ɛ", "ER" => "ɝ",
        "EY" => "eɪ", "IH" => "ɪ", "IY" => "i", "OW" => "oʊ",
        "OY" => "ɔɪ", "UH" => "ʊ", "UW" => "u",

        "B" => "b", "CH" => "tʃ", "D" => "d", "DH" => "ð",
        "F" => "f", "G" => "g", "HH" => "h", "JH" => "dʒ",
        "K" => "k", "L" => "l", "M" => "m", "N" => "n",
        "NG" => "ŋ", "P" => "p", "R" => "ɹ", "S" => "s",
        "SH" => "ʃ", "T" => "t", "TH" => "θ", "V" => "v",
        "W" => "w", "Y" => "j", "Z" => "z", "ZH" => "ʒ",
        _ => return None,
    };
    Some(ipa)
}

const ARPABET_BASES: [&str; 39] = [
    "AA", "AE", "AH", "AO", "AW", "AY", "EH", "ER", "EY", "IH", "IY", "OW", "OY", "UH", "UW",
    "B", "CH", "D", "DH", "F", "G", "HH", "JH", "K", "L", "M", "N", "NG", "P", "R", "S", "SH",
    "T", "TH", "V", "W", "Y", "Z", "ZH",
];

/// Target alphabet of the phoneme-frequency table, sorted by code point.
pub static TARGET_ALPHABET: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut symbols: Vec<&'static str> = ARPABET_BASES.iter().filter_map(|b| to_ipa(b)).collect();
    symbols.sort_unstable();
    symbols.dedup();
    symbols
});
