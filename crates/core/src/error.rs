//! Error types for the charpair libraries.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vocabulary, encoding and training operations.
#[derive(Error, Debug)]
pub enum CharPairError {
    /// The corpus contains no characters at all
    #[error("Corpus contains no characters")]
    EmptyCorpus,

    /// A character that was never seen while building the vocabulary
    #[error("Unknown symbol: {0:?}")]
    UnknownSymbol(char),

    /// Unknown token ID
    #[error("Unknown token ID: {0}")]
    UnknownTokenId(u32),

    /// Invalid configuration or training parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Inconsistent internal state, never caused by user input
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}

/// Result type alias for charpair operations.
pub type Result<T> = std::result::Result<T, CharPairError>;
