//! BPE trainer implementation.
//!
//! Every iteration recounts all adjacent pairs over the current encoding,
//! picks the most frequent pair (ties broken by symbol strings), grows the
//! vocabulary by the merged symbol and rewrites every document before the
//! next count. Training stops when the best pair falls below the minimum
//! frequency or when the vocabulary reaches its target size.

use super::config::TrainingConfig;
use super::corpus::Corpus;
use super::counter::{internal_encode_error, PairCounter, PairCounts};
use charpair_core::{
    CharPairError, CharLevelEncoder, MergeCandidate, MergeRules, Result, Vocabulary,
};
use log::{debug, info, trace};
use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

/// Log a progress line every this many merges.
const PROGRESS_INTERVAL: usize = 1_000;

/// Why the merge loop ended. Both are successful outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The vocabulary reached the configured size
    TargetVocabReached,
    /// No pair occurs at least `min_frequency` times
    BelowMinFrequency,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TargetVocabReached => f.write_str("target vocabulary size reached"),
            StopReason::BelowMinFrequency => f.write_str("no pair meets the minimum frequency"),
        }
    }
}

/// Everything a training run produces.
#[derive(Debug, Clone)]
pub struct TrainerArtifacts {
    /// Final vocabulary
    pub vocab: Vocabulary,
    /// Merge rules in learn order
    pub merges: MergeRules,
    /// The corpus as encoded after the last merge, one entry per document
    pub encoded: Vec<Vec<u32>>,
    /// Which stop condition ended training
    pub stop_reason: StopReason,
}

impl TrainerArtifacts {
    /// The trained vocabulary and merge rules.
    pub fn into_parts(self) -> (Vocabulary, MergeRules) {
        (self.vocab, self.merges)
    }

    /// Encoder replaying the learned merges.
    pub fn encoder(&self) -> CharLevelEncoder<'_> {
        CharLevelEncoder::new(&self.vocab, &self.merges)
    }
}

impl fmt::Display for TrainerArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BPE vocabulary with {} symbols", self.vocab.size())?;
        writeln!(f, "Merges learned: {}", self.merges.len())?;
        writeln!(f, "Stop reason: {}", self.stop_reason)?;
        Ok(())
    }
}

/// BPE trainer.
///
/// Trains a vocabulary from text data by iteratively merging the most
/// frequent adjacent symbol pairs.
#[derive(Debug, Clone, Default)]
pub struct BpeTrainer {
    /// Configuration
    config: TrainingConfig,
}

impl BpeTrainer {
    /// Create a new BPE trainer with the given configuration.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train on a loaded corpus.
    pub fn train_corpus(&self, corpus: &Corpus) -> Result<TrainerArtifacts> {
        self.train(corpus.documents())
    }

    /// Train on in-memory documents.
    ///
    /// # Errors
    ///
    /// - [`CharPairError::EmptyCorpus`] if the documents hold no characters
    /// - [`CharPairError::InvalidConfig`] if the parameters are invalid or the
    ///   target size does not exceed the initial vocabulary
    pub fn train<S: AsRef<str>>(&self, documents: &[S]) -> Result<TrainerArtifacts> {
        let config = &self.config;
        config.validate()?;

        let mut vocab = Vocabulary::from_documents(documents, config.special_tokens.as_ref())?;
        let initial_size = vocab.size();
        if config.vocab_size <= initial_size {
            return Err(CharPairError::InvalidConfig(format!(
                "vocab_size {} must exceed the initial vocabulary size {}",
                config.vocab_size, initial_size
            )));
        }

        let mut counter =
            PairCounter::from_documents(documents, &vocab).map_err(internal_encode_error)?;

        info!(
            "Starting BPE training: {} documents, {} symbols, initial vocab {}, target {}",
            counter.document_count(),
            counter.total_len(),
            initial_size,
            config.vocab_size
        );
        let start = Instant::now();

        let mut merges = MergeRules::with_capacity(config.vocab_size - initial_size);
        let stop_reason = loop {
            let pair_counts = counter.count_pairs(config.parallel);
            trace!("Counted {} distinct pairs", pair_counts.len());

            let candidate = match select_candidate(&pair_counts, &vocab)? {
                Some(c) if c.count >= config.min_frequency => c,
                best => {
                    debug!(
                        "Best pair count {} below minimum frequency {}",
                        best.map_or(0, |c| c.count),
                        config.min_frequency
                    );
                    break StopReason::BelowMinFrequency;
                }
            };

            // Every merge introduces a new symbol
            let symbol = candidate.merged_symbol(&vocab)?;
            let new_id = vocab.add_symbol(&symbol);

            let rank = merges.push(candidate.pair, new_id);
            let replaced = counter.merge_pair(candidate.pair, new_id);
            debug!(
                "Merge {}: {:?} -> {} {:?} (count {}, replaced {})",
                rank, candidate.pair, new_id, symbol, candidate.count, replaced
            );

            if merges.len() % PROGRESS_INTERVAL == 0 {
                info!(
                    "Progress: {} merges, vocab {}/{}, {} symbols in corpus",
                    merges.len(),
                    vocab.size(),
                    config.vocab_size,
                    counter.total_len()
                );
            }

            if vocab.size() >= config.vocab_size {
                break StopReason::TargetVocabReached;
            }
        };

        info!(
            "Finished training in {:.2}s: {} merges, vocab {}, {}",
            start.elapsed().as_secs_f64(),
            merges.len(),
            vocab.size(),
            stop_reason
        );

        Ok(TrainerArtifacts {
            vocab,
            merges,
            encoded: counter.into_documents(),
            stop_reason,
        })
    }
}

/// Pick the most frequent pair, breaking ties by the smallest
/// `(left symbol, right symbol)` tuple.
///
/// Returns `None` if there are no pairs at all.
pub fn select_candidate(
    pair_counts: &PairCounts,
    vocab: &Vocabulary,
) -> Result<Option<MergeCandidate>> {
    let mut best: Option<MergeCandidate> = None;

    for (&pair, &count) in pair_counts {
        let candidate = MergeCandidate::new(pair, count);
        best = match best {
            Some(current) if candidate.priority_cmp(&current, vocab)? != Ordering::Greater => {
                Some(current)
            }
            _ => Some(candidate),
        };
    }

    Ok(best)
}

/// Train on a single text with the default special symbols.
///
/// Returns the vocabulary and the merge rules in learn order.
pub fn train(
    corpus_text: &str,
    target_vocab_size: usize,
    min_pair_frequency: u64,
) -> Result<(Vocabulary, MergeRules)> {
    let config = TrainingConfig::builder()
        .vocab_size(target_vocab_size)
        .min_frequency(min_pair_frequency)
        .build()?;
    Ok(BpeTrainer::new(config).train(&[corpus_text])?.into_parts())
}
