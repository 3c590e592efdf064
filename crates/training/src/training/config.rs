//! Training configuration.

use charpair_core::{CharPairError, Result, SpecialTokensConfig};

/// Configuration for BPE training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingConfig {
    /// Target vocabulary size, specials included
    pub vocab_size: usize,
    /// Minimum frequency for a pair to be merged
    pub min_frequency: u64,
    /// Reserved special symbols, `None` to train without them
    pub special_tokens: Option<SpecialTokensConfig>,
    /// Whether to count pairs on the rayon thread pool
    pub parallel: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vocab_size: 30_000,
            min_frequency: 2,
            special_tokens: Some(SpecialTokensConfig::default()),
            parallel: false,
        }
    }
}

impl TrainingConfig {
    /// Returns a [`TrainingConfigBuilder`] with default settings.
    pub fn builder() -> TrainingConfigBuilder {
        TrainingConfigBuilder::default()
    }

    /// Check parameters that do not depend on the corpus.
    pub fn validate(&self) -> Result<()> {
        if self.vocab_size == 0 {
            return Err(CharPairError::InvalidConfig(
                "vocab_size must be positive".to_string(),
            ));
        }
        if self.min_frequency < 1 {
            return Err(CharPairError::InvalidConfig(
                "min_frequency must be at least 1".to_string(),
            ));
        }
        if let Some(special) = &self.special_tokens {
            special.validate()?;
        }
        Ok(())
    }
}

/// Builder for [`TrainingConfig`].
#[derive(Debug, Clone, Default)]
pub struct TrainingConfigBuilder {
    config: TrainingConfig,
}

impl TrainingConfigBuilder {
    /// Set the target vocabulary size.
    pub fn vocab_size(mut self, size: usize) -> Self {
        self.config.vocab_size = size;
        self
    }

    /// Set the minimum frequency for merges.
    pub fn min_frequency(mut self, freq: u64) -> Self {
        self.config.min_frequency = freq;
        self
    }

    /// Set the special symbols.
    pub fn special_tokens(mut self, tokens: SpecialTokensConfig) -> Self {
        self.config.special_tokens = Some(tokens);
        self
    }

    /// Train without reserved special symbols.
    pub fn without_special_tokens(mut self) -> Self {
        self.config.special_tokens = None;
        self
    }

    /// Enable or disable parallel pair counting.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<TrainingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::builder().build().unwrap();
        assert_eq!(config.vocab_size, 30_000);
        assert_eq!(config.min_frequency, 2);
        assert_eq!(config.special_tokens, Some(SpecialTokensConfig::default()));
        assert!(!config.parallel);
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = TrainingConfig::builder()
            .vocab_size(300)
            .min_frequency(5)
            .without_special_tokens()
            .parallel(true)
            .build()
            .unwrap();

        assert_eq!(config.vocab_size, 300);
        assert_eq!(config.min_frequency, 5);
        assert!(config.special_tokens.is_none());
        assert!(config.parallel);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(matches!(
            TrainingConfig::builder().min_frequency(0).build(),
            Err(CharPairError::InvalidConfig(_))
        ));
        assert!(matches!(
            TrainingConfig::builder().vocab_size(0).build(),
            Err(CharPairError::InvalidConfig(_))
        ));

        let clashing = SpecialTokensConfig {
            bos: "<unk>".to_string(),
            ..Default::default()
        };
        assert!(TrainingConfig::builder()
            .special_tokens(clashing)
            .build()
            .is_err());
    }
}
