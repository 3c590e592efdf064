//! Benchmark command implementation.

use super::TrainingArgs;
use clap::Parser;

/// Benchmark command arguments.
#[derive(Parser)]
pub struct BenchmarkCommand {
    #[command(flatten)]
    pub training: TrainingArgs,

    /// Number of training runs
    #[arg(long, default_value_t = 5)]
    pub iterations: usize,
}

use anyhow::{ensure, Result as AnyhowResult};
use std::time::Instant;

pub fn run(cmd: BenchmarkCommand) -> AnyhowResult<()> {
    ensure!(cmd.iterations > 0, "iterations must be positive");

    let corpus = cmd.training.load_corpus()?;
    let trainer = cmd.training.trainer()?;

    println!("Benchmarking training...");
    println!("  Documents: {}", corpus.len());
    println!("  Characters: {}", corpus.total_chars());
    println!("  Iterations: {}", cmd.iterations);
    println!();

    let start = Instant::now();
    let mut merges = 0;
    for _ in 0..cmd.iterations {
        merges = trainer.train_corpus(&corpus)?.merges.len();
    }
    let elapsed = start.elapsed();

    let avg_time_ms = elapsed.as_secs_f64() * 1000.0 / cmd.iterations as f64;

    println!("Results:");
    println!("  Total time: {:.2}s", elapsed.as_secs_f64());
    println!("  Average time: {:.3}ms", avg_time_ms);
    println!("  Merges per run: {}", merges);
    if merges > 0 {
        println!("  Throughput: {:.0} merges/s", merges as f64 * 1000.0 / avg_time_ms);
    }

    Ok(())
}
