//! Charpair-core - Core data structures for character-pair encoding
//!
//! This crate provides the vocabulary, merge rules and character-level encoder
//! used to train and validate a character-pair-encoding (BPE) vocabulary.
//!
//! # Features
//!
//! - Append-only symbol <-> ID bijection backed by `AHashMap` and compact strings
//! - Reserved `unknown`, `sequence-start` and `sequence-end` symbols
//! - Ordered merge rules that can be replayed on new text
//! - Error handling with detailed diagnostics
//!
//! # Example
//!
//! ```rust
//! use charpair_core::{CharLevelEncoder, MergeRules, Vocabulary};
//!
//! let mut vocab = Vocabulary::initialize("abab")?;
//! let mut merges = MergeRules::new();
//! let ab = vocab.add_symbol("ab");
//! merges.push((vocab.encode_char('a')?, vocab.encode_char('b')?), ab);
//!
//! let encoder = CharLevelEncoder::new(&vocab, &merges);
//! assert_eq!(encoder.encode("abab")?, vec![ab, ab]);
//! # Ok::<(), charpair_core::CharPairError>(())
//! ```

pub mod error;
pub use error::{CharPairError, Result};

// Core BPE data structures
pub mod core;
pub use crate::core::{
    MergeCandidate, MergeMap, MergeRecord, MergeRules, Pair, SpecialTokens, SpecialTokensConfig,
    Vocab, VocabR, Vocabulary,
};

// Encoding
pub mod encoding;
pub use encoding::CharLevelEncoder;
