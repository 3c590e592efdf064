//! Character-level BPE encoding.
//!
//! Text is first mapped one character at a time through the vocabulary. The
//! lowest-ranked learned pair present in the sequence is then rewritten with
//! the same single-pass rewrite used during training, until no learned pair
//! is left. A merged symbol only takes part in rules learned after it, so
//! this visits the rules present in the text in rank order and encoding a
//! training document yields exactly the IDs the trainer ended up with.

use crate::core::merges::merge_pair;
use crate::core::{MergeRules, Pair, Vocabulary};
use crate::{CharPairError, Result};

/// Character-level BPE encoder.
#[derive(Debug, Clone, Copy)]
pub struct CharLevelEncoder<'a> {
    vocab: &'a Vocabulary,
    merges: &'a MergeRules,
}

impl<'a> CharLevelEncoder<'a> {
    /// Create a new character-level encoder.
    pub fn new(vocab: &'a Vocabulary, merges: &'a MergeRules) -> Self {
        Self { vocab, merges }
    }

    /// Encode text to symbol IDs.
    ///
    /// Fails with [`CharPairError::UnknownSymbol`] on characters absent from
    /// the vocabulary.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let mut ids = text
            .chars()
            .map(|ch| self.vocab.encode_char(ch))
            .collect::<Result<Vec<u32>>>()?;

        while let Some((_, pair, new_id)) = self.lowest_ranked_pair(&ids) {
            merge_pair(&mut ids, pair, new_id);
        }

        Ok(ids)
    }

    /// Find the adjacent pair with the lowest merge rank.
    fn lowest_ranked_pair(&self, ids: &[u32]) -> Option<(u32, Pair, u32)> {
        ids.windows(2)
            .filter_map(|w| {
                let pair = (w[0], w[1]);
                self.merges
                    .get(pair)
                    .map(|(rank, new_id)| (rank, pair, new_id))
            })
            .min_by_key(|&(rank, _, _)| rank)
    }

    /// Encode text and wrap it in the sequence-start and sequence-end symbols.
    ///
    /// Missing specials are simply not emitted.
    pub fn encode_with_specials(&self, text: &str) -> Result<Vec<u32>> {
        let special = self.vocab.special();
        let mut ids = Vec::with_capacity(text.len() + 2);

        ids.extend(special.bos);
        ids.extend(self.encode(text)?);
        ids.extend(special.eos);

        Ok(ids)
    }

    /// Decode IDs back to text. Special symbols are skipped.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        let mut text = String::with_capacity(ids.len() * 2);

        for &id in ids {
            if self.vocab.is_special(id) {
                continue;
            }
            let symbol = self
                .vocab
                .get_symbol(id)
                .ok_or(CharPairError::UnknownTokenId(id))?;
            text.push_str(symbol);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SpecialTokensConfig;

    fn trained() -> (Vocabulary, MergeRules) {
        // a:0 b:1 c:2, ab:3, abab:4
        let mut vocab = Vocabulary::from_documents(["abc"], None).unwrap();
        let mut merges = MergeRules::new();
        let ab = vocab.add_symbol("ab");
        merges.push((0, 1), ab);
        let abab = vocab.add_symbol("abab");
        merges.push((ab, ab), abab);
        (vocab, merges)
    }

    #[test]
    fn test_encode_replays_merges_in_order() {
        let (vocab, merges) = trained();
        let encoder = CharLevelEncoder::new(&vocab, &merges);

        assert_eq!(encoder.encode("ababab").unwrap(), vec![4, 3]);
        assert_eq!(encoder.encode("abcab").unwrap(), vec![3, 2, 3]);
        assert_eq!(encoder.encode("c").unwrap(), vec![2]);
        assert!(encoder.encode("").unwrap().is_empty());
    }

    #[test]
    fn test_encode_skips_rules_absent_from_text() {
        // a:0 b:1 c:2, bc:3, ab:4, abc:5
        let mut vocab = Vocabulary::from_documents(["abc"], None).unwrap();
        let mut merges = MergeRules::new();
        let bc = vocab.add_symbol("bc");
        merges.push((1, 2), bc);
        let ab = vocab.add_symbol("ab");
        merges.push((0, 1), ab);
        let abc = vocab.add_symbol("abc");
        merges.push((ab, 2), abc);
        let encoder = CharLevelEncoder::new(&vocab, &merges);

        // (b, c) outranks (a, b), so "abc" never becomes ab + c
        assert_eq!(encoder.encode("abc").unwrap(), vec![0, bc]);
        assert_eq!(encoder.encode("abab").unwrap(), vec![ab, ab]);
        assert_eq!(encoder.encode("cab").unwrap(), vec![2, ab]);
    }

    #[test]
    fn test_encode_unknown_char() {
        let (vocab, merges) = trained();
        let encoder = CharLevelEncoder::new(&vocab, &merges);

        assert!(matches!(
            encoder.encode("abz"),
            Err(CharPairError::UnknownSymbol('z'))
        ));
    }

    #[test]
    fn test_decode() {
        let (vocab, merges) = trained();
        let encoder = CharLevelEncoder::new(&vocab, &merges);

        let ids = encoder.encode("cababc").unwrap();
        assert_eq!(encoder.decode(&ids).unwrap(), "cababc");
        assert!(matches!(
            encoder.decode(&[0, 99]),
            Err(CharPairError::UnknownTokenId(99))
        ));
    }

    #[test]
    fn test_encode_with_specials() {
        let vocab =
            Vocabulary::from_documents(["ab"], Some(&SpecialTokensConfig::default())).unwrap();
        let merges = MergeRules::new();
        let encoder = CharLevelEncoder::new(&vocab, &merges);

        let ids = encoder.encode_with_specials("ba").unwrap();
        assert_eq!(ids, vec![1, 4, 3, 2]);
        assert_eq!(encoder.decode(&ids).unwrap(), "ba");

        // Without reserved specials nothing is added
        let (vocab, merges) = trained();
        let encoder = CharLevelEncoder::new(&vocab, &merges);
        assert_eq!(encoder.encode_with_specials("ab").unwrap(), vec![3]);
    }
}
