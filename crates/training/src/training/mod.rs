//! Training infrastructure for BPE vocabularies.
//!
//! This module provides corpus loading, pair counting and the merge loop that
//! learns merge rules from text data.

pub mod config;
pub mod corpus;
pub mod counter;
pub mod trainer;

pub use config::{TrainingConfig, TrainingConfigBuilder};
pub use corpus::{Corpus, CorpusUnit};
pub use counter::{PairCounter, PairCounts};
pub use trainer::{select_candidate, train, BpeTrainer, StopReason, TrainerArtifacts};
