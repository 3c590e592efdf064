//! Merge candidates and their ordering.
//!
//! A candidate wins over another when its pair is more frequent. Equal counts
//! are broken by comparing the pairs as `(left symbol, right symbol)` string
//! tuples, smallest first. Symbol strings are used instead of raw IDs because
//! merged symbols get IDs in creation order, not in string order.

use crate::core::merges::Pair;
use crate::core::vocab::Vocabulary;
use crate::error::Result;
use std::cmp::Ordering;

/// A merge candidate during BPE training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeCandidate {
    /// The pair of token IDs to merge
    pub pair: Pair,
    /// The frequency/count of this pair
    pub count: u64,
}

impl MergeCandidate {
    /// Create a new merge candidate.
    pub fn new(pair: Pair, count: u64) -> Self {
        Self { pair, count }
    }

    /// Compare two candidates; `Ordering::Greater` means `self` should be merged first.
    pub fn priority_cmp(&self, other: &Self, vocab: &Vocabulary) -> Result<Ordering> {
        match self.count.cmp(&other.count) {
            Ordering::Equal => Ok(symbol_order(other.pair, self.pair, vocab)?),
            ord => Ok(ord),
        }
    }

    /// The string form of the merged symbol.
    pub fn merged_symbol(&self, vocab: &Vocabulary) -> Result<String> {
        let (left, right) = symbols_of(self.pair, vocab)?;
        let mut merged = String::with_capacity(left.len() + right.len());
        merged.push_str(left);
        merged.push_str(right);
        Ok(merged)
    }
}

/// Order two pairs by their symbol strings.
pub fn symbol_order(a: Pair, b: Pair, vocab: &Vocabulary) -> Result<Ordering> {
    if a == b {
        return Ok(Ordering::Equal);
    }
    Ok(symbols_of(a, vocab)?.cmp(&symbols_of(b, vocab)?))
}

#[inline]
fn symbols_of(pair: Pair, vocab: &Vocabulary) -> Result<(&str, &str)> {
    Ok((vocab.symbol_of(pair.0)?, vocab.symbol_of(pair.1)?))
}
