//! Merge rule management for BPE.
//!
//! Merge rules are kept in the order they were learned. The position of a
//! rule in that order is its rank, and replaying rules by ascending rank
//! reproduces the training-time segmentation.

use ahash::AHashMap;
use serde::Serialize;

/// A pair of token IDs that can be merged.
pub type Pair = (u32, u32);

/// Merge lookup: pair -> (rank, new_token_id).
pub type MergeMap = AHashMap<Pair, (u32, u32)>;

/// A single learned merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MergeRecord {
    /// The adjacent IDs that were merged
    pub pair: Pair,
    /// The ID of the merged symbol
    pub new_id: u32,
}

impl MergeRecord {
    pub fn new(pair: Pair, new_id: u32) -> Self {
        Self { pair, new_id }
    }
}

/// Ordered collection of BPE merge rules with pair lookup.
#[derive(Debug, Clone, Default)]
pub struct MergeRules {
    records: Vec<MergeRecord>,
    merges: MergeMap,
}

impl MergeRules {
    /// Create a new empty collection of merge rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new collection with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            merges: MergeMap::with_capacity(capacity),
        }
    }

    /// Append a merge rule and return its rank.
    ///
    /// A second rule for the same pair keeps the earlier rank in the lookup.
    pub fn push(&mut self, pair: Pair, new_id: u32) -> u32 {
        let rank = self.records.len() as u32;
        self.records.push(MergeRecord::new(pair, new_id));
        self.merges.entry(pair).or_insert((rank, new_id));
        rank
    }

    /// Get the merge rule for a pair.
    ///
    /// Returns Some((rank, new_token_id)) if this pair should be merged,
    /// None otherwise.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, u32)> {
        self.merges.get(&pair).copied()
    }

    /// Rules in learn order.
    #[inline]
    pub fn records(&self) -> &[MergeRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MergeRecord> {
        self.records.iter()
    }

    /// Get the number of merge rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no merge rules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PartialEq for MergeRules {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl Eq for MergeRules {}

impl<'a> IntoIterator for &'a MergeRules {
    type Item = &'a MergeRecord;
    type IntoIter = std::slice::Iter<'a, MergeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<MergeRecord> for MergeRules {
    fn from_iter<T: IntoIterator<Item = MergeRecord>>(iter: T) -> Self {
        let mut rules = Self::new();
        for record in iter {
            rules.push(record.pair, record.new_id);
        }
        rules
    }
}

/// Replace every non-overlapping occurrence of `pair` in `ids` with `new_id`.
///
/// The scan runs left to right in a single pass. A pair formed by a freshly
/// emitted `new_id` and its right neighbour is not merged again in the same
/// pass. Returns the number of replacements.
pub fn merge_pair(ids: &mut Vec<u32>, pair: Pair, new_id: u32) -> usize {
    if ids.len() < 2 {
        return 0;
    }

    let mut read = 0;
    let mut write = 0;
    let mut replaced = 0;

    while read < ids.len() {
        if read + 1 < ids.len() && ids[read] == pair.0 && ids[read + 1] == pair.1 {
            ids[write] = new_id;
            read += 2;
            replaced += 1;
        } else {
            ids[write] = ids[read];
            read += 1;
        }
        write += 1;
    }

    ids.truncate(write);
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_ranks() {
        let mut rules = MergeRules::new();
        assert_eq!(rules.push((0, 1), 100), 0);
        assert_eq!(rules.push((1, 2), 101), 1);

        assert_eq!(rules.get((0, 1)), Some((0, 100)));
        assert_eq!(rules.get((1, 2)), Some((1, 101)));
        assert_eq!(rules.get((2, 3)), None);
        assert_eq!(rules.records()[1], MergeRecord::new((1, 2), 101));
    }

    #[test]
    fn test_repeated_pair_keeps_first_rank() {
        let mut rules = MergeRules::new();
        rules.push((0, 1), 100);
        rules.push((0, 1), 101);

        assert_eq!(rules.get((0, 1)), Some((0, 100)));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_records_keep_learn_order() {
        let rules: MergeRules = [
            MergeRecord::new((5, 6), 9),
            MergeRecord::new((0, 1), 10),
            MergeRecord::new((9, 10), 11),
        ]
        .into_iter()
        .collect();

        let pairs: Vec<Pair> = rules.iter().map(|r| r.pair).collect();
        assert_eq!(pairs, vec![(5, 6), (0, 1), (9, 10)]);
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn test_merge_pair_non_overlapping() {
        let mut ids = vec![0, 0, 0];
        assert_eq!(merge_pair(&mut ids, (0, 0), 7), 1);
        assert_eq!(ids, vec![7, 0]);

        let mut ids = vec![0, 1, 0, 1, 0, 1];
        assert_eq!(merge_pair(&mut ids, (0, 1), 2), 3);
        assert_eq!(ids, vec![2, 2, 2]);
    }

    #[test]
    fn test_merge_pair_keeps_trailing_symbol() {
        let mut ids = vec![0, 1, 2, 0, 1, 0];
        assert_eq!(merge_pair(&mut ids, (0, 1), 9), 2);
        assert_eq!(ids, vec![9, 2, 9, 0]);
    }

    #[test]
    fn test_merge_pair_does_not_remerge_in_same_pass() {
        let mut ids = vec![1, 1, 1, 1, 1];
        assert_eq!(merge_pair(&mut ids, (1, 1), 9), 2);
        assert_eq!(ids, vec![9, 9, 1]);

        // (9, 9) is new adjacency, left for the next counting pass
        assert_eq!(merge_pair(&mut ids, (9, 9), 10), 1);
        assert_eq!(ids, vec![10, 1]);
    }

    #[test]
    fn test_merge_pair_short_sequences() {
        let mut empty: Vec<u32> = Vec::new();
        assert_eq!(merge_pair(&mut empty, (0, 1), 2), 0);
        assert!(empty.is_empty());

        let mut single = vec![0];
        assert_eq!(merge_pair(&mut single, (0, 0), 2), 0);
        assert_eq!(single, vec![0]);
    }
}
