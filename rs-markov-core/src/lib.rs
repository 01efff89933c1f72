//! Word-level Markov-chain text generation library.
//!
//! This crate learns word transitions from a corpus of sentences and
//! synthesizes new sentences and paragraphs from them:
//! - Tokenization of raw text into word tokens
//! - Training of an immutable n-gram chain (sequential or parallel)
//! - Random-walk generation of sentences, paragraphs and multi-paragraph text
//! - Small helpers to read corpora from local text files
//!
//! ```no_run
//! use rs_markov_core::{Chain, Generator};
//!
//! let chain = Chain::train(&["The cat sat. The cat ran."], 3)?;
//! let text = Generator::new(&chain).paragraphs(1, 3, 1, 7, "\n\n")?;
//! # Ok::<(), rs_markov_core::Error>(())
//! ```

/// Chain model, training and generation logic.
pub mod model;

/// Generation parameters and their defaults.
pub mod config;

/// Local corpus files (listing, loading).
pub mod corpus;

/// Error type shared by every operation.
pub mod error;

pub use config::GenerationConfig;
pub use error::{Error, Result};
pub use model::chain::{Chain, DEFAULT_GRAM_SIZE};
pub use model::generator::Generator;
