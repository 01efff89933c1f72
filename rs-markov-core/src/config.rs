use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::chain::DEFAULT_GRAM_SIZE;

/// Default per-sentence token cap.
pub const DEFAULT_MAX_LENGTH: usize = 25;
pub const DEFAULT_MIN_SENTENCES: usize = 1;
pub const DEFAULT_MAX_SENTENCES: usize = 7;
pub const DEFAULT_MIN_PARAGRAPHS: usize = 1;
pub const DEFAULT_MAX_PARAGRAPHS: usize = 3;
/// Default string placed between paragraphs.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Parameters for training a chain and generating text from it.
///
/// Every field has a default, so a partial JSON object or query string
/// deserializes into a complete configuration.
///
/// # Notes
/// - Counts are drawn from `[min, min + max - 1]`, not `[min, max]`.
/// - `gram_size` only matters for training.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationConfig {
	/// Total window length used to build transitions (must be > 2).
	pub gram_size: usize,

	pub min_paragraphs: usize,
	pub max_paragraphs: usize,

	pub min_sentences: usize,
	pub max_sentences: usize,

	/// Token count after which a sentence is cut.
	pub max_length: usize,

	/// Paragraph join string.
	pub separator: String,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			gram_size: DEFAULT_GRAM_SIZE,
			min_paragraphs: DEFAULT_MIN_PARAGRAPHS,
			max_paragraphs: DEFAULT_MAX_PARAGRAPHS,
			min_sentences: DEFAULT_MIN_SENTENCES,
			max_sentences: DEFAULT_MAX_SENTENCES,
			max_length: DEFAULT_MAX_LENGTH,
			separator: DEFAULT_SEPARATOR.to_owned(),
		}
	}
}

impl GenerationConfig {
	/// Checks every parameter at once.
	///
	/// # Errors
	/// - [`Error::InvalidGramSize`] if `gram_size <= 2`
	/// - [`Error::InvalidRange`] if a maximum is below its minimum
	pub fn validate(&self) -> Result<()> {
		if self.gram_size <= 2 {
			return Err(Error::InvalidGramSize(self.gram_size));
		}
		check_range("paragraphs", self.min_paragraphs, self.max_paragraphs)?;
		check_range("sentences", self.min_sentences, self.max_sentences)
	}
}

/// Fails with [`Error::InvalidRange`] when `max < min`.
pub(crate) fn check_range(unit: &'static str, min: usize, max: usize) -> Result<()> {
	if max < min {
		return Err(Error::InvalidRange { unit, min, max });
	}
	Ok(())
}
