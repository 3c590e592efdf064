//! Charpair-training - BPE training infrastructure
//!
//! This crate provides the training loop that learns a character-pair-encoding
//! vocabulary and its merge rules from text data.
//!
//! # Features
//!
//! - Corpus loading from files and directories, per document or per line
//! - Full pair recount on every iteration, optionally on the rayon pool
//! - Deterministic tie-breaking by symbol strings
//! - Configurable target size, minimum frequency and special symbols
//!
//! # Example
//!
//! ```rust
//! use charpair_training::{BpeTrainer, StopReason, TrainingConfig};
//!
//! let config = TrainingConfig::builder()
//!     .vocab_size(3)
//!     .min_frequency(1)
//!     .without_special_tokens()
//!     .build()?;
//!
//! let artifacts = BpeTrainer::new(config).train(&["ababab"])?;
//! assert_eq!(artifacts.vocab.get_symbol(2), Some("ab"));
//! assert_eq!(artifacts.encoded, vec![vec![2, 2, 2]]);
//! assert_eq!(artifacts.stop_reason, StopReason::TargetVocabReached);
//! # Ok::<(), charpair_training::CharPairError>(())
//! ```

pub use charpair_core::{
    CharPairError, MergeRecord, MergeRules, Result, SpecialTokens, SpecialTokensConfig, Vocabulary,
};

// Training infrastructure
pub mod training;
pub use training::{
    select_candidate, train, BpeTrainer, Corpus, CorpusUnit, PairCounter, PairCounts, StopReason,
    TrainerArtifacts, TrainingConfig, TrainingConfigBuilder,
};
