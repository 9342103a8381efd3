//! SVO CLI - Command-line interface
//!
//! Usage:
//!   svo extract <input> [--output <path> | --phase <n>] [--by-sentence]
//!   svo phrases <input>
//!   svo evaluate <input> --gold <path>
//!
//! Inputs are JSON or YAML files holding one parsed document or a list of
//! them. Relative inputs that do not exist are looked up in `<data>/raw`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use svo_core::{data, AppConfig, CorpusRecord, DataDirs, LoggingConfig, ParsedDocument, Triple};
use svo_extractor::{EvaluationReport, SvoPipeline};

#[derive(Parser)]
#[command(name = "svo")]
#[command(about = "Subject-verb-object triple extraction from dependency parses")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract triples from parsed documents
    Extract {
        /// Parsed corpus (JSON or YAML)
        input: PathBuf,
        /// Output file; format follows the extension
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write into the output directory of this phase (1-4)
        #[arg(long, conflicts_with = "output")]
        phase: Option<u8>,
        /// Group triples per sentence
        #[arg(long)]
        by_sentence: bool,
    },
    /// Show noun phrases found in each document
    Phrases {
        /// Parsed corpus (JSON or YAML)
        input: PathBuf,
    },
    /// Score extracted triples against gold triples
    Evaluate {
        /// Parsed corpus (JSON or YAML)
        input: PathBuf,
        /// Gold triples: one list per document
        #[arg(long)]
        gold: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    init_tracing(&config.logging);

    let dirs = DataDirs::from_config(&config.data);
    let pipeline = Arc::new(SvoPipeline::with_rules(config.extraction.clone()));

    match cli.command {
        Commands::Extract {
            input,
            output,
            phase,
            by_sentence,
        } => {
            let input = resolve_input(&dirs, input);
            let documents = load_corpus(&input)?;
            let target = match (output, phase) {
                (Some(path), _) => Some(path),
                (None, Some(p)) => Some(dirs.phase_output(p, &input, &config.output)?),
                (None, None) => None,
            };

            if by_sentence {
                let results =
                    extract_all(pipeline, documents, |p, d| p.extract_by_sentence(d)).await?;
                write_output(&results, target.as_deref())?;
            } else {
                let results =
                    extract_all(pipeline, documents, |p, d| p.extract_document(d)).await?;
                let total: usize = results.iter().map(Vec::len).sum();
                info!("Extracted {} triples from {} documents", total, results.len());
                write_output(&results, target.as_deref())?;
            }
        }
        Commands::Phrases { input } => {
            let documents = load_corpus(&resolve_input(&dirs, input))?;
            for (index, document) in documents.iter().enumerate() {
                let name = document
                    .id()
                    .map(str::to_string)
                    .unwrap_or_else(|| index.to_string());
                println!("# {name}");
                for (id, phrase) in pipeline.noun_phrases(document).iter() {
                    println!("{}\t{}\t{}", id.index(), document.token(id).text, phrase);
                }
            }
        }
        Commands::Evaluate { input, gold } => {
            let documents = load_corpus(&resolve_input(&dirs, input))?;
            let gold_triples: Vec<Vec<Triple>> = data::load_auto(&gold)
                .with_context(|| format!("Failed to load gold triples from {}", gold.display()))?;

            let predicted =
                extract_all(pipeline, documents, |p, d| p.extract_document(d)).await?;
            let report = EvaluationReport::from_corpus(&predicted, &gold_triples);

            println!("{}", report.summary());
            for (verb, metrics) in &report.by_verb {
                println!(
                    "  {:<24} p={:.3} r={:.3} f1={:.3}",
                    verb,
                    metrics.precision(),
                    metrics.recall(),
                    metrics.f1_score()
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "svo={0},svo_extractor={0},svo_core={0}",
            config.level
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Fall back to the raw data directory for relative inputs not found as given
fn resolve_input(dirs: &DataDirs, input: PathBuf) -> PathBuf {
    if input.is_relative() && !input.exists() {
        let candidate = dirs.raw_dir().join(&input);
        if candidate.exists() {
            debug!("Resolved {} to {}", input.display(), candidate.display());
            return candidate;
        }
    }
    input
}

fn load_corpus(path: &Path) -> Result<Vec<ParsedDocument>> {
    let corpus: CorpusRecord = data::load_auto(path)
        .with_context(|| format!("Failed to load parsed corpus from {}", path.display()))?;

    let documents = corpus
        .into_documents()
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            ParsedDocument::from_records(record)
                .with_context(|| format!("Invalid document {} in {}", i, path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    info!("Loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

/// Run `extract` over every document on the blocking pool, keeping input order
async fn extract_all<T: Send + 'static>(
    pipeline: Arc<SvoPipeline>,
    documents: Vec<ParsedDocument>,
    extract: fn(&SvoPipeline, &ParsedDocument) -> T,
) -> Result<Vec<T>> {
    let mut tasks = JoinSet::new();
    for (index, document) in documents.into_iter().enumerate() {
        let pipeline = Arc::clone(&pipeline);
        tasks.spawn_blocking(move || (index, extract(&pipeline, &document)));
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.context("Extraction task failed")?);
    }
    results.sort_by_key(|(index, _)| *index);

    Ok(results.into_iter().map(|(_, r)| r).collect())
}

fn write_output<T: Serialize + ?Sized>(value: &T, target: Option<&Path>) -> Result<()> {
    match target {
        Some(path) => {
            data::save_auto(value, path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
