//! CLI commands for the charpair trainer.

pub mod benchmark;
pub mod encode;
pub mod train;

pub use benchmark::BenchmarkCommand;
pub use encode::EncodeCommand;
pub use train::TrainCommand;

use anyhow::{Context, Result as AnyhowResult};
use charpair_training::{BpeTrainer, Corpus, CorpusUnit, TrainingConfig};
use clap::Args;
use log::info;
use std::path::PathBuf;

/// Corpus and training arguments shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct TrainingArgs {
    /// Training files or directories (every regular file in a directory is read)
    #[arg(short, long = "input", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Target vocabulary size, special tokens included
    #[arg(long, default_value_t = 30_000)]
    pub vocab_size: usize,

    /// Minimum pair frequency for a merge
    #[arg(short, long, default_value_t = 2)]
    pub min_frequency: u64,

    /// Treat every line as a separate document
    #[arg(long, default_value_t = false)]
    pub lines: bool,

    /// Do not reserve the <unk>, <s> and </s> special tokens
    #[arg(long, default_value_t = false)]
    pub no_special_tokens: bool,

    /// Count pairs in parallel
    #[arg(short, long, default_value_t = false)]
    pub parallel: bool,
}

impl TrainingArgs {
    pub fn load_corpus(&self) -> AnyhowResult<Corpus> {
        let unit = if self.lines {
            CorpusUnit::Line
        } else {
            CorpusUnit::Document
        };
        let corpus = Corpus::from_paths(&self.inputs, unit).context("failed to load corpus")?;
        info!(
            "Loaded {} documents ({} characters)",
            corpus.len(),
            corpus.total_chars()
        );
        Ok(corpus)
    }

    pub fn trainer(&self) -> AnyhowResult<BpeTrainer> {
        let builder = TrainingConfig::builder()
            .vocab_size(self.vocab_size)
            .min_frequency(self.min_frequency)
            .parallel(self.parallel);
        let builder = if self.no_special_tokens {
            builder.without_special_tokens()
        } else {
            builder
        };
        Ok(BpeTrainer::new(builder.build()?))
    }
}
