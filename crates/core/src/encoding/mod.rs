//! Encoding of raw text into symbol IDs.
//!
//! Only character-level encoding is provided: every character maps to one
//! initial symbol and learned merges are replayed on top.

pub mod char_level;

pub use char_level::CharLevelEncoder;
