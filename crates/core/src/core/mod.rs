//! Core BPE data structures.
//!
//! This module contains the vocabulary, the ordered merge rules and the merge
//! candidate ordering shared by training and encoding.

pub mod candidate;
pub mod merges;
pub mod vocab;

pub use candidate::MergeCandidate;
pub use merges::{merge_pair, MergeMap, MergeRecord, MergeRules, Pair};
pub use vocab::{SpecialTokens, SpecialTokensConfig, Vocab, VocabR, Vocabulary};
