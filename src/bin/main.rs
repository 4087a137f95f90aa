use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use phono_core::config::Config;
use phono_core::persistence::write_atomic;
use phono_core::reader::{load_sources, TextSource};
use phono_core::report::ReportWriter;
use phono_core::{AnalysisEngine, CorpusAnalysis, TextStatistics};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const MANUAL_INPUT_NAME: &str = "manual_input";

/// Phonemic transcription, syllabification and phonotactic statistics for
/// English texts.
#[derive(Parser, Debug)]
#[command(name = "phonostat", version, about)]
struct Args {
    /// A text file or a folder of .txt files
    input: Option<PathBuf>,

    /// Analyze this passage instead of files
    #[arg(long, conflicts_with = "input")]
    text: Option<String>,

    /// Output folder (overrides the configured one)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, env = "PHONOSTAT_CONFIG")]
    config: Option<PathBuf>,

    /// CMUdict-format primary dictionary
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Secondary pronunciation dictionary
    #[arg(long)]
    secondary_dictionary: Option<PathBuf>,

    /// Leave phoneme-frequency columns out of the statistics
    #[arg(long)]
    no_frequencies: bool,

    /// Treat generative output without any valid phoneme as a miss
    #[arg(long)]
    strict_generative: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(output) = &args.output {
        config.output.directory = output.clone();
    }
    if let Some(path) = &args.dictionary {
        config.lexicon.dictionary = Some(path.clone());
    }
    if let Some(path) = &args.secondary_dictionary {
        config.lexicon.secondary_dictionary = Some(path.clone());
    }
    if args.no_frequencies {
        config.statistics.phoneme_frequencies = false;
    }
    if args.strict_generative {
        config.resolver.strict_generative = true;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Collects the texts to analyze and the name of the run.
fn gather_sources(args: &Args, config: &Config) -> Result<(String, Vec<TextSource>)> {
    if let Some(passage) = &args.text {
        let path = config.output.directory.join(format!("{}.txt", MANUAL_INPUT_NAME));
        write_atomic(&path, passage.as_bytes())
            .with_context(|| format!("saving passage to {}", path.display()))?;
        return Ok((
            MANUAL_INPUT_NAME.to_string(),
            vec![TextSource::from_passage(MANUAL_INPUT_NAME, passage)],
        ));
    }

    let Some(input) = &args.input else {
        bail!("no input given: pass a file, a folder or --text");
    };
    let (sources, skipped) =
        load_sources(input).with_context(|| format!("reading {}", input.display()))?;
    for (path, error) in &skipped {
        warn!(path = %path.display(), %error, "text excluded from analysis");
    }
    let run_name = phono_core::reader::text_name(input);
    Ok((run_name, sources))
}

fn print_summary(corpus: &CorpusAnalysis, totals: &TextStatistics, output: &std::path::Path) {
    println!("{}", "phonostat".bold());
    println!("---------------------------------------------------------------");
    for text in &corpus.texts {
        let s = &text.statistics;
        println!(
            "  {:<24} words {:>6}  phonemes {:>7}  syllables {:>6}  C/V {:>7}",
            text.name.as_str().cyan(),
            text.words.len(),
            s.phoneme_count,
            s.syllable_count,
            s.phonology.cv_ratio,
        );
    }
    println!("---------------------------------------------------------------");
    println!(
        "  {:<24} phonemes {:>7}  syllables {:>6}  opened/closed {}",
        "total".bold(),
        totals.phoneme_count,
        totals.syllable_count,
        totals.phonology.opened_closed_ratio,
    );
    if corpus.unknown.is_empty() {
        println!("  {}", "every word was transcribed".green());
    } else {
        println!(
            "  {}",
            format!("{} word(s) could not be transcribed", corpus.unknown.len()).yellow()
        );
    }
    println!("  results in {}", output.display());
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    apply_overrides(&mut config, &args);
    init_tracing(&config.logging.level);

    info!("Starting phonostat {}", env!("CARGO_PKG_VERSION"));
    let (run_name, sources) = gather_sources(&args, &config)?;
    if sources.is_empty() {
        bail!("no readable texts found");
    }

    let engine = AnalysisEngine::from_config(&config).context("building analysis engine")?;
    let corpus = engine.analyze_corpus(&sources);
    let totals = engine.aggregator().fold_corpus(&corpus.statistics());

    let writer = ReportWriter::new(&config.output.directory);
    writer
        .write_corpus(&run_name, &corpus, Some(&totals), config.output.word_files, config.output.json)
        .context("writing reports")?;

    print_summary(&corpus, &totals, writer.root());
    Ok(())
}
