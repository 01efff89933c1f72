use std::path::PathBuf;

/// Errors raised by training, generation and the corpus helpers.
///
/// Every variant is detected before any work is done, so an `Err` never
/// comes with partial output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The gram size must be strictly greater than 2.
	#[error("gram size must be greater than 2, was {0}")]
	InvalidGramSize(usize),

	/// A `max_*` bound is smaller than its `min_*` counterpart.
	#[error("maximum number of {unit} ({max}) must not be less than the minimum number ({min})")]
	InvalidRange {
		/// What is being counted (`"sentences"` or `"paragraphs"`).
		unit: &'static str,
		/// The requested minimum.
		min: usize,
		/// The requested maximum.
		max: usize,
	},

	/// Two chains of different orders cannot be merged.
	#[error("cannot merge a chain of gram size {found} into one of gram size {expected}")]
	GramSizeMismatch {
		/// Gram size of the receiving chain.
		expected: usize,
		/// Gram size of the merged chain.
		found: usize,
	},

	/// The chain has no prefix to start a sentence from.
	#[error("chain is empty, no starting prefix available")]
	EmptyChain,

	/// A corpus file or directory could not be read.
	#[error("failed to read corpus at {}: {source}", path.display())]
	Io {
		/// The file or directory being read.
		path: PathBuf,
		/// The underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
}

impl Error {
	/// Returns `true` for precondition failures on caller supplied parameters.
	pub fn is_invalid_argument(&self) -> bool {
		matches!(self, Error::InvalidGramSize(_) | Error::InvalidRange { .. })
	}
}

/// Result type for chain operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_argument_taxonomy() {
		assert!(Error::InvalidGramSize(2).is_invalid_argument());
		assert!(Error::InvalidRange { unit: "sentences", min: 3, max: 1 }.is_invalid_argument());
		assert!(!Error::EmptyChain.is_invalid_argument());
		assert!(!Error::GramSizeMismatch { expected: 3, found: 4 }.is_invalid_argument());
	}

	#[test]
	fn messages_name_the_offending_values() {
		assert_eq!(Error::InvalidGramSize(1).to_string(), "gram size must be greater than 2, was 1");
		let range = Error::InvalidRange { unit: "paragraphs", min: 4, max: 2 };
		assert_eq!(
			range.to_string(),
			"maximum number of paragraphs (2) must not be less than the minimum number (4)"
		);
		let mismatch = Error::GramSizeMismatch { expected: 3, found: 4 };
		assert_eq!(mismatch.to_string(), "cannot merge a chain of gram size 4 into one of gram size 3");
	}

	#[test]
	fn io_error_names_the_path_and_keeps_its_source() {
		use std::error::Error as _;

		let err = Error::Io {
			path: PathBuf::from("data/missing.txt"),
			source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
		};
		assert_eq!(err.to_string(), "failed to read corpus at data/missing.txt: no such file");
		assert!(!err.is_invalid_argument());
		assert_eq!(err.source().map(|s| s.to_string()), Some("no such file".to_owned()));
	}
}
