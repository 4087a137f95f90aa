// File: src/report.rs
use crate::core::engine::{CorpusAnalysis, TextAnalysis};
use crate::core::stats::{MetricValue, TextStatistics};
use crate::core::types::{join_phonemes, shape};
use crate::error::Result;
use crate::persistence::write_atomic;
use crate::unknown::UnknownWords;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;

pub const STATISTICS_CSV: &str = "Statistics.csv";
pub const STATISTICS_JSON: &str = "Statistics.json";

/// Columns written first, in this order; the rest follow sorted.
const LEADING_COLUMNS: [&str; 3] = ["Text", "Length", "SyllablesCount"];

/// Writes analysis results below an output folder.
pub struct ReportWriter {
    root: PathBuf,
}

impl ReportWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn text_file(&self, folder: &str, name: &str) -> PathBuf {
        self.root.join(folder).join(format!("{}.txt", name))
    }

    /// Space-separated phonemes of every word.
    pub fn write_transcription(&self, text: &TextAnalysis) -> Result<()> {
        let line = text
            .words
            .iter()
            .map(|w| join_phonemes(&w.phonemes, " "))
            .collect::<Vec<_>>()
            .join(" ");
        write_atomic(&self.text_file("Transcribed", &text.name), line.as_bytes())
    }

    /// Words as `K-AE1-T/S-IY1`, separated by spaces.
    pub fn write_syllables(&self, text: &TextAnalysis) -> Result<()> {
        let line = text
            .words
            .iter()
            .map(|w| {
                w.syllables
                    .iter()
                    .map(|s| join_phonemes(s, "-"))
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect::<Vec<_>>()
            .join(" ");
        write_atomic(&self.text_file("Syllables", &text.name), line.as_bytes())
    }

    /// Words as `CVC/CV`.
    pub fn write_syllables_cvv(&self, text: &TextAnalysis) -> Result<()> {
        let line = text
            .words
            .iter()
            .map(|w| w.syllables.iter().map(|s| shape(s)).collect::<Vec<_>>().join("/"))
            .collect::<Vec<_>>()
            .join(" ");
        write_atomic(&self.text_file("SyllablesCVV", &text.name), line.as_bytes())
    }

    pub fn write_first_syllables(&self, text: &TextAnalysis) -> Result<()> {
        let line = text
            .words
            .iter()
            .map(|w| w.syllables.first().map(|s| join_phonemes(s, "-")).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ");
        write_atomic(&self.text_file("FirstSyllables", &text.name), line.as_bytes())
    }

    pub fn write_first_syllables_cvv(&self, text: &TextAnalysis) -> Result<()> {
        let line = text
            .words
            .iter()
            .map(|w| w.syllables.first().map(|s| shape(s)).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ");
        write_atomic(&self.text_file("FirstSyllablesCVV", &text.name), line.as_bytes())
    }

    pub fn write_word_files(&self, text: &TextAnalysis) -> Result<()> {
        self.write_transcription(text)?;
        self.write_syllables(text)?;
        self.write_syllables_cvv(text)?;
        self.write_first_syllables(text)?;
        self.write_first_syllables_cvv(text)
    }

    /// One row per record. Missing cells are left empty.
    pub fn write_statistics_csv(&self, rows: &[TextStatistics]) -> Result<PathBuf> {
        let path = self.root.join(STATISTICS_CSV);
        let records: Vec<HashMap<String, MetricValue>> =
            rows.iter().map(|r| r.to_record().into_iter().collect()).collect();
        let header = statistics_header(&records);

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&header)?;
        for record in &records {
            writer.write_record(
                header
                    .iter()
                    .map(|column| record.get(column).map(|v| v.to_string()).unwrap_or_default()),
            )?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        write_atomic(&path, &bytes)?;
        Ok(path)
    }

    pub fn write_statistics_json(&self, rows: &[TextStatistics]) -> Result<PathBuf> {
        let path = self.root.join(STATISTICS_JSON);
        let bytes = serde_json::to_vec_pretty(rows)?;
        write_atomic(&path, &bytes)?;
        Ok(path)
    }

    /// Sorted unknown words, one per line.
    pub fn write_unknown(&self, run_name: &str, unknown: &UnknownWords) -> Result<PathBuf> {
        let path = self
            .root
            .join("UnknownWords")
            .join(format!("{}_unknown.txt", run_name));
        let mut content = String::new();
        for word in unknown.iter() {
            content.push_str(word);
            content.push('\n');
        }
        write_atomic(&path, content.as_bytes())?;
        Ok(path)
    }

    /// Writes every report for a corpus run, with a corpus total row appended
    /// to the statistics table.
    pub fn write_corpus(
        &self,
        run_name: &str,
        corpus: &CorpusAnalysis,
        totals: Option<&TextStatistics>,
        word_files: bool,
        json: bool,
    ) -> Result<()> {
        if word_files {
            for text in &corpus.texts {
                self.write_word_files(text)?;
            }
        }
        let mut rows = corpus.statistics();
        if let Some(totals) = totals {
            rows.push(totals.clone());
        }
        if !rows.is_empty() {
            let csv = self.write_statistics_csv(&rows)?;
            info!(path = %csv.display(), rows = rows.len(), "statistics written");
            if json {
                self.write_statistics_json(&rows)?;
            }
        }
        let unknown = self.write_unknown(run_name, &corpus.unknown)?;
        info!(path = %unknown.display(), words = corpus.unknown.len(), "unknown words written");
        Ok(())
    }
}

/// `Text, Length, SyllablesCount`, then every other key sorted.
pub fn statistics_header(records: &[HashMap<String, MetricValue>]) -> Vec<String> {
    let rest: BTreeSet<&String> = records
        .iter()
        .flat_map(|r| r.keys())
        .filter(|k| !LEADING_COLUMNS.contains(&k.as_str()))
        .collect();
    LEADING_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(rest.into_iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::WordAnalysis;
    use crate::core::stats::StatisticsAggregator;
    use crate::core::types::parse_sequence;
    use std::fs;
    use tempfile::TempDir;

    fn sample_text() -> TextAnalysis {
        let bacon = vec![parse_sequence("B EY1"), parse_sequence("K AH0 N")];
        let cats = vec![parse_sequence("K AE1 T S")];
        let words = vec![
            WordAnalysis { word: "bacon".into(), phonemes: bacon.concat(), syllables: bacon.clone() },
            WordAnalysis { word: "cats".into(), phonemes: cats.concat(), syllables: cats.clone() },
        ];
        let flat: Vec<_> = bacon.iter().chain(cats.iter()).cloned().collect();
        let statistics = StatisticsAggregator::new(false, 4, 5).text_statistics(
            "sample",
            9,
            &flat.concat(),
            &flat,
            &[bacon, cats],
        );
        TextAnalysis { name: "sample".into(), words, statistics }
    }

    #[test]
    fn word_files_use_expected_separators() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path());
        writer.write_word_files(&sample_text()).unwrap();

        let read = |folder: &str| fs::read_to_string(dir.path().join(folder).join("sample.txt")).unwrap();
        assert_eq!(read("Transcribed"), "B EY1 K AH0 N K AE1 T S");
        assert_eq!(read("Syllables"), "B-EY1/K-AH0-N K-AE1-T-S");
        assert_eq!(read("SyllablesCVV"), "CV/CVC CVCC");
        assert_eq!(read("FirstSyllables"), "B-EY1 K-AE1-T-S");
        assert_eq!(read("FirstSyllablesCVV"), "CV CVCC");
    }

    #[test]
    fn csv_header_leads_with_fixed_columns() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path());
        let path = writer.write_statistics_csv(&[sample_text().statistics]).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let header = content.lines().next().unwrap();
        assert!(header.starts_with("Text,Length,SyllablesCount,"));
        assert!(header.contains("first_CV"));
        let row = content.lines().nth(1).unwrap();
        assert!(row.starts_with("sample,9,3,"));
    }

    #[test]
    fn unknown_words_are_listed_one_per_line() {
        use crate::unknown::UnknownSink;
        let dir = TempDir::new().unwrap();
        let mut unknown = UnknownWords::new();
        unknown.record("zzyzx");
        unknown.record("aaq");
        let path = ReportWriter::new(dir.path()).write_unknown("run", &unknown).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "aaq\nzzyzx\n");
    }
}
