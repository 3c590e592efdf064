//! Train command implementation.

use super::TrainingArgs;
use clap::{Parser, ValueEnum};

/// Report format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    #[command(flatten)]
    pub training: TrainingArgs,

    /// Output format of the report
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Number of merges listed in the text report
    #[arg(long, default_value_t = 20)]
    pub show_merges: usize,
}

use anyhow::Result as AnyhowResult;
use charpair_training::{MergeRecord, SpecialTokens, TrainerArtifacts};
use serde::Serialize;
use std::time::Instant;

#[derive(Serialize)]
struct MergeEntry<'a> {
    rank: usize,
    #[serde(flatten)]
    record: MergeRecord,
    symbol: &'a str,
}

#[derive(Serialize)]
struct SymbolEntry<'a> {
    id: u32,
    symbol: &'a str,
    special: bool,
}

#[derive(Serialize)]
struct TrainReport<'a> {
    documents: usize,
    vocab_size: usize,
    stop_reason: String,
    special_tokens: SpecialTokens,
    vocab: Vec<SymbolEntry<'a>>,
    merges: Vec<MergeEntry<'a>>,
}

impl<'a> TrainReport<'a> {
    fn new(documents: usize, artifacts: &'a TrainerArtifacts) -> Self {
        let vocab = &artifacts.vocab;
        Self {
            documents,
            vocab_size: vocab.size(),
            stop_reason: artifacts.stop_reason.to_string(),
            special_tokens: *vocab.special(),
            vocab: vocab
                .iter()
                .map(|(id, symbol)| SymbolEntry {
                    id,
                    symbol,
                    special: vocab.is_special(id),
                })
                .collect(),
            merges: artifacts
                .merges
                .iter()
                .enumerate()
                .map(|(rank, record)| MergeEntry {
                    rank,
                    record: *record,
                    symbol: vocab.get_symbol(record.new_id).unwrap_or_default(),
                })
                .collect(),
        }
    }
}

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    let corpus = cmd.training.load_corpus()?;
    let trainer = cmd.training.trainer()?;

    let start = Instant::now();
    let artifacts = trainer.train_corpus(&corpus)?;
    let elapsed = start.elapsed();

    let report = TrainReport::new(corpus.len(), &artifacts);
    match cmd.format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Text => {
            println!("Trained on {} documents in {:.2}s", report.documents, elapsed.as_secs_f64());
            print!("{}", artifacts);
            println!();
            for entry in report.merges.iter().take(cmd.show_merges) {
                println!(
                    "  {:>5}: ({}, {}) -> {} {:?}",
                    entry.rank,
                    entry.record.pair.0,
                    entry.record.pair.1,
                    entry.record.new_id,
                    entry.symbol
                );
            }
            if report.merges.len() > cmd.show_merges {
                println!("  ... {} more", report.merges.len() - cmd.show_merges);
            }
        }
    }

    Ok(())
}
