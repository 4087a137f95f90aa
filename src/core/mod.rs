// src/core/mod.rs
pub mod engine;
pub mod ipa;
pub mod resolver;
pub mod sonority;
pub mod stats;
pub mod syllabifier;
pub mod types;
