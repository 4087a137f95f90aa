// src/core/sonority.rs
use crate::core::types::Phoneme;

/// ARPAbet vowel bases (stress digits stripped).
pub const VOWEL_BASES: [&str; 15] = [
    "AA", "AE", "AH", "AO", "AW", "AY", "EH", "ER", "EY", "IH", "IY", "OW", "OY", "UH", "UW",
];

/// Manner classes ordered from least to most sonorous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SonorityClass {
    Stop,
    Fricative,
    Nasal,
    Liquid,
    Glide,
    Vowel,
}

impl SonorityClass {
    pub fn rank(self) -> u8 {
        match self {
            SonorityClass::Stop => 0,
            SonorityClass::Fricative => 1,
            SonorityClass::Nasal => 2,
            SonorityClass::Liquid => 3,
            SonorityClass::Glide => 4,
            SonorityClass::Vowel => 5,
        }
    }
}

/// Unlisted bases fall into the lowest class.
pub fn classify(base: &str) -> SonorityClass {
    match base {
        "AA" | "AE" | "AH" | "AO" | "AW" | "AY" | "EH" | "ER" | "EY" | "IH" | "IY" | "OW"
        | "OY" | "UH" | "UW" => SonorityClass::Vowel,
        "Y" | "W" => SonorityClass::Glide,
        "L" | "R" => SonorityClass::Liquid,
        "M" | "N" | "NG" => SonorityClass::Nasal,
        "F" | "V" | "TH" | "DH" | "S" | "Z" | "SH" | "ZH" | "HH" | "CH" | "JH" => {
            SonorityClass::Fricative
        }
        _ => SonorityClass::Stop,
    }
}

pub fn rank(base: &str) -> u8 {
    classify(base).rank()
}

pub fn phoneme_rank(phoneme: &Phoneme) -> u8 {
    rank(phoneme.base())
}

pub fn is_vowel_base(base: &str) -> bool {
    VOWEL_BASES.contains(&base)
}
