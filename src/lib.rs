// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod lexicon;
pub mod persistence;
pub mod reader;
pub mod report;
pub mod unknown;

pub use crate::core::engine::{AnalysisEngine, CorpusAnalysis, TextAnalysis, WordAnalysis};
pub use crate::core::resolver::PhoneticResolver;
pub use crate::core::stats::{StatisticsAggregator, TextStatistics};
pub use crate::core::syllabifier::Syllabifier;
pub use crate::error::{Error, Result};
pub use crate::unknown::{UnknownSink, UnknownWords};
