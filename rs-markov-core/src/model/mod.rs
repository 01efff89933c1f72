//! Top-level module for the Markov chain.
//!
//! - Tokenization of raw sources (`tokenizer`)
//! - The chain itself and its training (`chain`)
//! - Per-prefix follower multisets (`suffixes`)
//! - Sentence and paragraph generation (`generator`)

/// Raw text to word tokens.
pub mod tokenizer;

/// Prefix to followers mapping, built once from a corpus.
///
/// Handles sequential and parallel training and read-only lookups.
pub mod chain;

/// Multiset of followers observed after one prefix.
///
/// Supports frequency-weighted random sampling.
pub mod suffixes;

/// Random walks over a chain.
///
/// Starting-prefix selection, sentence extension and paragraph assembly,
/// with an injectable random source.
pub mod generator;
