//! Pair counting for BPE training.
//!
//! The counter owns the encoded corpus: one ID sequence per document. Pair
//! counts are recomputed from scratch over every document on each call, so
//! they always reflect the corpus after the latest merge.

use ahash::AHashMap;
use charpair_core::core::merge_pair;
use charpair_core::{CharPairError, Pair, Result, Vocabulary};
use rayon::prelude::*;

/// Pair -> number of adjacent occurrences.
pub type PairCounts = AHashMap<Pair, u64>;

/// Counter for BPE pair frequencies over an encoded corpus.
#[derive(Debug, Clone, Default)]
pub struct PairCounter {
    /// Document -> current ID sequence
    documents: Vec<Vec<u32>>,
}

impl PairCounter {
    /// Create a new empty pair counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode documents one character at a time.
    ///
    /// Fails with [`CharPairError::UnknownSymbol`] if a character is missing
    /// from `vocab`.
    pub fn from_documents<S: AsRef<str>>(documents: &[S], vocab: &Vocabulary) -> Result<Self> {
        let mut counter = Self {
            documents: Vec::with_capacity(documents.len()),
        };
        for doc in documents {
            counter.add_document(doc.as_ref(), vocab)?;
        }
        Ok(counter)
    }

    /// Encode and append a single document.
    pub fn add_document(&mut self, text: &str, vocab: &Vocabulary) -> Result<()> {
        let ids = text
            .chars()
            .map(|ch| vocab.encode_char(ch))
            .collect::<Result<Vec<u32>>>()?;
        self.documents.push(ids);
        Ok(())
    }

    /// Count pairs, in parallel or sequentially.
    pub fn count_pairs(&self, parallel: bool) -> PairCounts {
        if parallel {
            self.count_pairs_parallel()
        } else {
            self.count_pairs_sequential()
        }
    }

    /// Count all pairs in parallel.
    ///
    /// Per-document tables are summed into one table before returning, so the
    /// result is identical to [`PairCounter::count_pairs_sequential`].
    pub fn count_pairs_parallel(&self) -> PairCounts {
        self.documents
            .par_iter()
            .fold(PairCounts::new, |mut acc, doc| {
                count_into(&mut acc, doc);
                acc
            })
            .reduce(PairCounts::new, |mut acc, pair_counts| {
                for (pair, count) in pair_counts {
                    *acc.entry(pair).or_insert(0) += count;
                }
                acc
            })
    }

    /// Count all pairs sequentially.
    pub fn count_pairs_sequential(&self) -> PairCounts {
        let mut pair_counts = PairCounts::new();
        for doc in &self.documents {
            count_into(&mut pair_counts, doc);
        }
        pair_counts
    }

    /// Merge a pair in all documents (mutates them in place).
    ///
    /// Returns the total number of replacements.
    pub fn merge_pair(&mut self, pair: Pair, new_token_id: u32) -> usize {
        self.documents
            .iter_mut()
            .map(|doc| merge_pair(doc, pair, new_token_id))
            .sum()
    }

    /// Get the number of documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Total number of IDs over all documents.
    pub fn total_len(&self) -> usize {
        self.documents.iter().map(Vec::len).sum()
    }

    /// Get a reference to the encoded documents.
    pub fn documents(&self) -> &[Vec<u32>] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Vec<u32>> {
        self.documents
    }
}

#[inline]
fn count_into(pair_counts: &mut PairCounts, doc: &[u32]) {
    for window in doc.windows(2) {
        *pair_counts.entry((window[0], window[1])).or_insert(0) += 1;
    }
}

/// Turn a lookup failure during the initial encode into an internal error.
///
/// The vocabulary is built from the same documents, so a miss means the two
/// passes disagree.
pub(crate) fn internal_encode_error(err: CharPairError) -> CharPairError {
    match err {
        CharPairError::UnknownSymbol(ch) => CharPairError::Internal(format!(
            "character {ch:?} missing from the vocabulary built from the same corpus"
        )),
        other => other,
    }
}
