//! Vocabulary storage and lookup.
//!
//! The vocabulary is an append-only bijection between symbols and ids. Ids are
//! handed out in creation order starting at zero, so the reverse mapping is a
//! plain vector indexed by id and the id range never has gaps.
//!
//! Reserved specials occupy the lowest ids of the reverse mapping but are not
//! entered in the forward mapping. Corpus text may contain their surface
//! forms, and a learned symbol may spell one, without clashing.

use crate::error::{CharPairError, Result};
use ahash::AHashMap;
use compact_str::CompactString;
use serde::Serialize;
use std::collections::BTreeSet;

/// Forward mapping: symbol string -> ID, specials excluded
pub type Vocab = AHashMap<CompactString, u32>;

/// Reverse mapping: ID -> symbol string, indexed by ID
pub type VocabR = Vec<CompactString>;

/// Vocabulary with forward and reverse mappings.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    vocab: Vocab,
    vocab_r: VocabR,
    special: SpecialTokens,
}

impl Vocabulary {
    /// Create a new empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new vocabulary with capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vocab: Vocab::with_capacity(capacity),
            vocab_r: VocabR::with_capacity(capacity),
            special: SpecialTokens::default(),
        }
    }

    /// Build the character-level vocabulary of a single text, reserving the
    /// default special symbols at ids 0, 1 and 2.
    pub fn initialize(corpus_text: &str) -> Result<Self> {
        Self::from_documents([corpus_text], Some(&SpecialTokensConfig::default()))
    }

    /// Build the character-level vocabulary of a set of documents.
    ///
    /// Special symbols, when given, take the lowest ids. The distinct
    /// characters of all documents follow in code point order.
    pub fn from_documents<I, S>(documents: I, special: Option<&SpecialTokensConfig>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chars = BTreeSet::new();
        for doc in documents {
            chars.extend(doc.as_ref().chars());
        }

        if chars.is_empty() {
            return Err(CharPairError::EmptyCorpus);
        }

        let mut vocab = Self::with_capacity(chars.len() + SpecialTokens::RESERVED);
        if let Some(special) = special {
            vocab.add_special_tokens(special)?;
        }

        let mut buf = [0u8; 4];
        for ch in chars {
            vocab.add_symbol(ch.encode_utf8(&mut buf));
        }

        Ok(vocab)
    }

    /// Reserve the special symbols. Only valid on an empty vocabulary.
    pub fn add_special_tokens(&mut self, config: &SpecialTokensConfig) -> Result<()> {
        if !self.is_empty() {
            return Err(CharPairError::InvalidConfig(
                "special tokens must be added before any other symbol".to_string(),
            ));
        }
        config.validate()?;

        self.special = SpecialTokens {
            unk: Some(self.push_reserved(&config.unk)),
            bos: Some(self.push_reserved(&config.bos)),
            eos: Some(self.push_reserved(&config.eos)),
        };

        Ok(())
    }

    fn push_reserved(&mut self, form: &str) -> u32 {
        let id = self.next_id();
        self.vocab_r.push(CompactString::new(form));
        id
    }

    /// Append a new symbol and return its ID.
    ///
    /// # Panics
    ///
    /// Panics if the symbol is already present. Special surface forms do not
    /// count as present.
    pub fn add_symbol(&mut self, symbol: &str) -> u32 {
        assert!(
            !self.vocab.contains_key(symbol),
            "symbol {symbol:?} is already in the vocabulary"
        );

        let id = self.next_id();
        let symbol = CompactString::new(symbol);
        self.vocab_r.push(symbol.clone());
        self.vocab.insert(symbol, id);
        id
    }

    /// Look up a single character seen during initialization.
    ///
    /// There is no fallback to the `unknown` special here.
    #[inline]
    pub fn encode_char(&self, ch: char) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.get_id(ch.encode_utf8(&mut buf))
            .ok_or(CharPairError::UnknownSymbol(ch))
    }

    /// Get the ID for a symbol string. Specials are looked up through
    /// [`Vocabulary::special`] instead.
    #[inline]
    pub fn get_id(&self, symbol: &str) -> Option<u32> {
        self.vocab.get(symbol).copied()
    }

    /// Get the symbol string for an ID.
    #[inline]
    pub fn get_symbol(&self, id: u32) -> Option<&str> {
        self.vocab_r.get(id as usize).map(|s| s.as_str())
    }

    /// Get the symbol string for an ID, failing on unknown IDs.
    #[inline]
    pub fn symbol_of(&self, id: u32) -> Result<&str> {
        self.get_symbol(id).ok_or(CharPairError::UnknownTokenId(id))
    }

    /// Check whether a symbol is known.
    #[inline]
    pub fn contains(&self, symbol: &str) -> bool {
        self.vocab.contains_key(symbol)
    }

    /// Number of distinct symbols, equal to the next ID to be assigned.
    #[inline]
    pub fn size(&self) -> usize {
        self.vocab_r.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocab_r.is_empty()
    }

    /// The ID the next added symbol will receive.
    #[inline]
    pub fn next_id(&self) -> u32 {
        self.vocab_r.len() as u32
    }

    /// Reserved special IDs.
    #[inline]
    pub fn special(&self) -> &SpecialTokens {
        &self.special
    }

    #[inline]
    pub fn is_special(&self, id: u32) -> bool {
        self.special.is_special(id)
    }

    /// Iterate over `(id, symbol)` in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.vocab_r
            .iter()
            .enumerate()
            .map(|(id, s)| (id as u32, s.as_str()))
    }

    /// Forward mapping, without the specials.
    pub fn symbol_to_id(&self) -> &Vocab {
        &self.vocab
    }

    /// Reverse mapping, indexed by ID.
    pub fn id_to_symbol(&self) -> &[CompactString] {
        &self.vocab_r
    }
}

// The forward map is derived from the reverse one, so comparing IDs is enough.
impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.vocab_r == other.vocab_r && self.special == other.special
    }
}

impl Eq for Vocabulary {}

/// Reserved special symbol IDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpecialTokens {
    /// Unknown symbol ID
    pub unk: Option<u32>,
    /// Sequence-start ID
    pub bos: Option<u32>,
    /// Sequence-end ID
    pub eos: Option<u32>,
}

impl SpecialTokens {
    /// Number of reserved IDs when specials are enabled.
    pub const RESERVED: usize = 3;

    /// Check if an ID is a special symbol.
    #[inline]
    pub fn is_special(&self, id: u32) -> bool {
        Some(id) == self.unk || Some(id) == self.bos || Some(id) == self.eos
    }

    /// Whether any specials are reserved.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.unk.is_none() && self.bos.is_none() && self.eos.is_none()
    }
}

/// Surface forms of the reserved special symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTokensConfig {
    pub unk: String,
    pub bos: String,
    pub eos: String,
}

impl Default for SpecialTokensConfig {
    fn default() -> Self {
        Self {
            unk: "<unk>".to_string(),
            bos: "<s>".to_string(),
            eos: "</s>".to_string(),
        }
    }
}

impl SpecialTokensConfig {
    /// Surface forms in ID order.
    pub fn as_array(&self) -> [&str; 3] {
        [&self.unk, &self.bos, &self.eos]
    }

    /// Specials must be non-empty and pairwise distinct.
    pub fn validate(&self) -> Result<()> {
        let forms = self.as_array();
        if forms.iter().any(|s| s.is_empty()) {
            return Err(CharPairError::InvalidConfig(
                "special tokens must not be empty".to_string(),
            ));
        }
        if forms[0] == forms[1] || forms[0] == forms[2] || forms[1] == forms[2] {
            return Err(CharPairError::InvalidConfig(format!(
                "special tokens must be distinct, got {:?}",
                forms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bijection(vocab: &Vocabulary) {
        let reserved = vocab.iter().filter(|&(id, _)| vocab.is_special(id)).count();
        assert_eq!(vocab.symbol_to_id().len(), vocab.size() - reserved);
        for (id, symbol) in vocab.iter().filter(|&(id, _)| !vocab.is_special(id)) {
            assert_eq!(vocab.get_id(symbol), Some(id));
        }
        for (symbol, &id) in vocab.symbol_to_id() {
            assert_eq!(vocab.get_symbol(id), Some(symbol.as_str()));
        }
    }

    #[test]
    fn test_initialize_reserves_specials() {
        let vocab = Vocabulary::initialize("banana").unwrap();

        assert_eq!(vocab.get_symbol(0), Some("<unk>"));
        assert_eq!(vocab.get_symbol(1), Some("<s>"));
        assert_eq!(vocab.get_symbol(2), Some("</s>"));
        assert_eq!(vocab.special().bos, Some(1));
        assert_eq!(vocab.get_id("<s>"), None);
        assert_eq!(vocab.get_id("a"), Some(3));
        assert_eq!(vocab.get_id("b"), Some(4));
        assert_eq!(vocab.get_id("n"), Some(5));
        assert_eq!(vocab.size(), 6);
        assert!(vocab.is_special(1));
        assert!(!vocab.is_special(3));
        assert_bijection(&vocab);
    }

    #[test]
    fn test_initialize_sorts_by_code_point() {
        let vocab = Vocabulary::from_documents(["zé a", "Z"], None).unwrap();
        let symbols: Vec<&str> = vocab.iter().map(|(_, s)| s).collect();

        assert_eq!(symbols, vec![" ", "Z", "a", "z", "é"]);
        assert!(vocab.special().is_empty());
    }

    #[test]
    fn test_initialize_empty_corpus() {
        assert!(matches!(
            Vocabulary::initialize(""),
            Err(CharPairError::EmptyCorpus)
        ));
        assert!(matches!(
            Vocabulary::from_documents(["", ""], None),
            Err(CharPairError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_add_symbol() {
        let mut vocab = Vocabulary::from_documents(["ab"], None).unwrap();
        let id = vocab.add_symbol("ab");

        assert_eq!(id, 2);
        assert_eq!(vocab.next_id(), 3);
        assert_eq!(vocab.symbol_of(2).unwrap(), "ab");
        assert_bijection(&vocab);
    }

    #[test]
    #[should_panic(expected = "already in the vocabulary")]
    fn test_add_duplicate_symbol_panics() {
        let mut vocab = Vocabulary::from_documents(["ab"], None).unwrap();
        vocab.add_symbol("a");
    }

    #[test]
    fn test_encode_char() {
        let vocab = Vocabulary::from_documents(["hello"], None).unwrap();

        assert_eq!(vocab.encode_char('e').unwrap(), 0);
        assert_eq!(vocab.encode_char('o').unwrap(), 3);
        assert!(matches!(
            vocab.encode_char('x'),
            Err(CharPairError::UnknownSymbol('x'))
        ));
    }

    #[test]
    fn test_unknown_id() {
        let vocab = Vocabulary::from_documents(["a"], None).unwrap();
        assert_eq!(vocab.get_symbol(7), None);
        assert!(matches!(
            vocab.symbol_of(7),
            Err(CharPairError::UnknownTokenId(7))
        ));
    }

    #[test]
    fn test_special_tokens_after_symbols_rejected() {
        let mut vocab = Vocabulary::from_documents(["a"], None).unwrap();
        let result = vocab.add_special_tokens(&SpecialTokensConfig::default());
        assert!(matches!(result, Err(CharPairError::InvalidConfig(_))));
    }

    #[test]
    fn test_single_char_special_is_also_a_corpus_character() {
        let config = SpecialTokensConfig {
            unk: "?".to_string(),
            ..Default::default()
        };
        let vocab = Vocabulary::from_documents(["why?"], Some(&config)).unwrap();

        // "?" < "h" < "w" < "y"
        assert_eq!(vocab.get_symbol(0), Some("?"));
        assert_eq!(vocab.get_id("?"), Some(3));
        assert_eq!(vocab.size(), 7);
        assert_bijection(&vocab);
    }

    #[test]
    fn test_symbol_spelling_a_special_gets_its_own_id() {
        let mut vocab = Vocabulary::initialize("<s>").unwrap();
        let id = vocab.add_symbol("<s>");

        assert_eq!(id, 6);
        assert_eq!(vocab.get_id("<s>"), Some(6));
        assert_eq!(vocab.special().bos, Some(1));
        assert!(!vocab.is_special(id));
        assert_bijection(&vocab);
    }

    #[test]
    fn test_special_tokens_validation() {
        let config = SpecialTokensConfig {
            unk: "<x>".to_string(),
            bos: "<x>".to_string(),
            eos: "</s>".to_string(),
        };
        assert!(config.validate().is_err());

        let config = SpecialTokensConfig {
            eos: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(SpecialTokensConfig::default().validate().is_ok());
    }
}
