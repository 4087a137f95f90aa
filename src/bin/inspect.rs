use anyhow::Result;
use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use phono_core::config::Config;
use phono_core::core::types::{is_open, join_phonemes, shape};
use phono_core::reader::tokenize;
use phono_core::{AnalysisEngine, UnknownWords, WordAnalysis};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Interactive word inspector: type words, see how they are transcribed and
/// syllabified.
#[derive(Parser, Debug)]
#[command(name = "phono_inspect", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, env = "PHONOSTAT_CONFIG")]
    config: Option<PathBuf>,

    /// CMUdict-format primary dictionary
    #[arg(long)]
    dictionary: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(path) = args.dictionary {
        config.lexicon.dictionary = Some(path);
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let engine = AnalysisEngine::from_config(&config)?;
    let mut unknown = UnknownWords::new();
    let mut history: Vec<WordAnalysis> = Vec::new();

    loop {
        print_ui(&history, &unknown)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        match input.trim() {
            "exit" => break,
            ":clear" => history.clear(),
            line => {
                for word in tokenize(line) {
                    history.push(engine.analyze_word(&word, &mut unknown));
                }
            }
        }
    }

    if !unknown.is_empty() {
        println!("\nUnknown words: {}", unknown.snapshot().join(", "));
    }
    Ok(())
}

fn print_ui(history: &[WordAnalysis], unknown: &UnknownWords) -> Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", "Phonetic Inspector".bold());
    println!("---------------------------------------------------------------");
    println!("Type words and press [Enter]. ':clear' empties the list, 'exit' quits.\n");

    if history.is_empty() {
        println!("No words yet.");
    }
    for analysis in history.iter().rev().take(12) {
        let syllables: Vec<String> = analysis.syllables.iter().map(|s| join_phonemes(s, "-")).collect();
        let shapes: Vec<String> = analysis
            .syllables
            .iter()
            .map(|s| format!("{}{}", shape(s), if is_open(s) { "°" } else { "" }))
            .collect();
        println!("  {}", analysis.word.as_str().cyan());
        println!("    phonemes  : {}", join_phonemes(&analysis.phonemes, " "));
        println!("    syllables : {}", syllables.join(" / "));
        println!("    shapes    : {}", shapes.join(" / "));
    }

    if !unknown.is_empty() {
        let list = unknown.snapshot().join(", ");
        println!("\n{} {}", "Unknown:".yellow(), list);
    }
    print!("\n> ");
    out.flush()?;
    Ok(())
}
