use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use fio_core::{Engine, NameResult, NoCache, ResultCache};
use fio_dict::{JsonFileCache, NameDictionaries, bundled_dir};
use fio_fuzzy::IndexOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Pulls given name, patronymic and family name out of free-form phrases.
///
/// Phrases come from the arguments, or one per line from stdin when none are given
/// (`:q` ends the session).
#[derive(Debug, Parser)]
#[command(name = "fio", version)]
struct Args {
    /// Directory with given_names.txt, patronymics.txt and family_names.txt
    #[arg(long, value_name = "DIR")]
    dict_dir: Option<PathBuf>,

    /// JSON file used as a persistent result cache
    #[arg(long, value_name = "FILE")]
    cache: Option<PathBuf>,

    /// Documented minimum confidence (informational, does not filter)
    #[arg(long, default_value_t = fio_core::engine::DEFAULT_EDGE)]
    edge: f64,

    /// Dictionary matches below this similarity are ignored (0 to 1)
    #[arg(long, default_value_t = IndexOptions::default().min_similarity, value_parser = parse_similarity)]
    min_similarity: f64,

    /// Ignore persisted indices and rebuild them from the word lists
    #[arg(long)]
    rebuild_index: bool,

    /// Print one JSON object per phrase
    #[arg(long)]
    json: bool,

    /// Phrases to analyze
    phrases: Vec<String>,
}

fn parse_similarity(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{s:?} is not a number: {e}"))?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(format!("{s} is outside 0..=1"))
    }
}

type CliEngine = Engine<NameDictionaries, Box<dyn ResultCache>>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let engine = build_engine(&args)?;

    let mut out = io::stdout().lock();
    let mut failed = 0usize;
    if args.phrases.is_empty() {
        failed += repl(&engine, args.json, &mut out)?;
    } else {
        for phrase in &args.phrases {
            if !analyze(&engine, phrase, args.json, &mut out)? {
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} phrase(s) could not be analyzed");
    }
    Ok(())
}

fn build_engine(args: &Args) -> Result<CliEngine> {
    let dict_dir = args.dict_dir.clone().unwrap_or_else(bundled_dir);
    let options = IndexOptions {
        min_similarity: args.min_similarity,
        ..IndexOptions::default()
    };
    let dicts = if args.rebuild_index {
        NameDictionaries::rebuild(&dict_dir, options)
    } else {
        NameDictionaries::open(&dict_dir, options)
    }
    .with_context(|| format!("cannot load dictionaries from {}", dict_dir.display()))?;

    let cache: Box<dyn ResultCache> = match &args.cache {
        Some(path) => Box::new(JsonFileCache::open(path)),
        None => Box::new(NoCache),
    };
    info!(dict_dir = %dict_dir.display(), cache = ?args.cache, "engine ready");

    Ok(Engine::new(dicts).with_cache(cache).with_edge(args.edge))
}

/// Reads phrases line by line until EOF or `:q`; returns how many failed.
fn repl(engine: &CliEngine, json: bool, out: &mut impl Write) -> Result<usize> {
    let stdin = io::stdin();
    let mut failed = 0usize;
    for line in stdin.lock().lines() {
        let line = line.context("cannot read stdin")?;
        let phrase = line.trim();
        if phrase.is_empty() {
            continue;
        }
        if phrase == ":q" || phrase == ":quit" || phrase == ":exit" {
            break;
        }
        if !analyze(engine, phrase, json, out)? {
            failed += 1;
        }
    }
    Ok(failed)
}

/// Prints the result for one phrase; `Ok(false)` when the engine refused it.
fn analyze(engine: &CliEngine, phrase: &str, json: bool, out: &mut impl Write) -> Result<bool> {
    match engine.break_apart(phrase) {
        Ok(result) => {
            if json {
                print_json(phrase, &result, out)?;
            } else {
                print_text(phrase, &result, out)?;
            }
            Ok(true)
        }
        Err(e) => {
            eprintln!("{phrase}: {e}");
            Ok(false)
        }
    }
}

fn print_text(phrase: &str, result: &NameResult, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{phrase}")?;
    if result.is_empty() {
        writeln!(out, "  (no name found)")?;
        return Ok(());
    }
    writeln!(out, "  => {result}")?;
    for part in result {
        writeln!(
            out,
            "  {:<10} {} -> {} ({:.2})",
            part.role.as_str(),
            part.src,
            part.found,
            part.percent
        )?;
    }
    Ok(())
}

fn print_json(phrase: &str, result: &NameResult, out: &mut impl Write) -> Result<()> {
    let line = serde_json::json!({
        "phrase": phrase,
        "display": result.to_title_string(),
        "parts": result,
    });
    writeln!(out, "{line}")?;
    Ok(())
}
