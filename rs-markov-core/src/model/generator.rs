use log::debug;
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;

use super::chain::Chain;
use super::suffixes::Suffixes;
use crate::config::{DEFAULT_MAX_LENGTH, GenerationConfig, check_range};
use crate::error::{Error, Result};

/// Marks that end a sentence when they end a token.
pub const TERMINAL_MARKS: [char; 3] = ['.', '!', '?'];

/// Returns `true` if `token` ends with `.`, `!` or `?`.
pub fn is_terminal(token: &str) -> bool {
	token.ends_with(TERMINAL_MARKS)
}

/// Predicate over a chain entry deciding whether it may start a sentence.
type StartRule = fn(&[String], &Suffixes) -> bool;

/// Starting-prefix rules, most preferred first.
///
/// The first rule matching at least one prefix provides the candidate set.
/// The last rule accepts anything, so a non-empty chain always has candidates,
/// possibly a prefix whose first token already ends a sentence.
const START_RULES: [(&str, StartRule); 4] = [
	("capitalized branching", capitalized_branching),
	("branching", branching),
	("open", open),
	("any", any),
];

fn open(prefix: &[String], _: &Suffixes) -> bool {
	prefix.first().is_some_and(|first| !is_terminal(first))
}

fn branching(prefix: &[String], suffixes: &Suffixes) -> bool {
	open(prefix, suffixes) && suffixes.len() > 1
}

fn capitalized_branching(prefix: &[String], suffixes: &Suffixes) -> bool {
	branching(prefix, suffixes)
		&& prefix
			.first()
			.and_then(|first| first.chars().next())
			.is_some_and(char::is_uppercase)
}

fn any(_: &[String], _: &Suffixes) -> bool {
	true
}

/// Applies the starting-prefix rules in order and returns the first
/// non-empty candidate set with the index of the rule that produced it.
///
/// Candidates are sorted so a seeded generator is reproducible.
/// Returns `None` for an empty chain.
pub fn starting_candidates(chain: &Chain) -> Option<(usize, Vec<&[String]>)> {
	START_RULES.iter().enumerate().find_map(|(index, &(_, rule))| {
		let mut candidates: Vec<&[String]> = chain
			.iter()
			.filter(|&(prefix, suffixes)| rule(prefix, suffixes))
			.map(|(prefix, _)| prefix.as_slice())
			.collect();
		if candidates.is_empty() {
			return None;
		}
		candidates.sort_unstable();
		Some((index, candidates))
	})
}

/// Name of the starting-prefix rule at `index`, as returned by [`starting_candidates`].
pub fn start_rule_name(index: usize) -> Option<&'static str> {
	START_RULES.get(index).map(|(name, _)| *name)
}

/// Sentence and paragraph generator over a trained [`Chain`].
///
/// # Responsibilities
/// - Pick a plausible sentence start
/// - Random-walk the chain until a terminal mark, a dead end or the length cap
/// - Assemble sentences into paragraphs and paragraphs into text
///
/// The chain is only borrowed: any number of generators, on any number of
/// threads, can read the same chain. Each generator owns its random source,
/// `ThreadRng` by default or any seeded `Rng` for reproducible output.
#[derive(Debug)]
pub struct Generator<'a, R = ThreadRng> {
	chain: &'a Chain,

	/// Candidate starting prefixes, sorted
	starts: Vec<&'a [String]>,

	/// Index in `START_RULES` of the rule that produced `starts`
	start_rule: Option<usize>,

	rng: R,
}

impl<'a> Generator<'a, ThreadRng> {
	/// Creates a generator drawing from the thread-local random source.
	pub fn new(chain: &'a Chain) -> Self {
		Self::with_rng(chain, rand::rng())
	}
}

impl<'a, R: Rng> Generator<'a, R> {
	/// Creates a generator drawing from `rng`.
	///
	/// Starting candidates are computed once here, the chain never changes.
	pub fn with_rng(chain: &'a Chain, rng: R) -> Self {
		let (start_rule, starts) = match starting_candidates(chain) {
			Some((rule, starts)) => (Some(rule), starts),
			None => (None, Vec::new()),
		};
		Self { chain, starts, start_rule, rng }
	}

	/// The chain this generator walks.
	pub fn chain(&self) -> &'a Chain {
		self.chain
	}

	/// Name of the starting-prefix rule in use, `None` for an empty chain.
	pub fn start_rule(&self) -> Option<&'static str> {
		self.start_rule.and_then(start_rule_name)
	}

	/// Generates one sentence of at most about `max_length` tokens.
	///
	/// # Behavior
	/// - Starts from a random candidate prefix
	/// - Appends a random follower of the last `gram_size - 1` tokens, again and again
	/// - Stops after a token ending with a terminal mark, once more than
	///   `max_length` tokens were produced, or when the prefix has no follower
	/// - Appends `.` if the result does not end with a terminal mark
	///
	/// At least one follower is attempted, so a sentence has at most
	/// `max(max_length, gram_size - 1) + 1` tokens.
	///
	/// # Errors
	/// Returns [`Error::EmptyChain`] if the chain has no entries.
	pub fn sentence(&mut self, max_length: usize) -> Result<String> {
		let chain = self.chain;
		let start = self.starts.choose(&mut self.rng).copied().ok_or(Error::EmptyChain)?;

		let mut prefix: Vec<String> = start.to_vec();
		let mut sentence = prefix.join(" ");
		let mut length = prefix.len();

		while let Some(next) = chain.suffixes(&prefix).and_then(|suffixes| suffixes.choose(&mut self.rng)) {
			sentence.push(' ');
			sentence.push_str(next);
			length += 1;

			if is_terminal(next) || length > max_length {
				break;
			}

			prefix.remove(0);
			prefix.push(next.to_owned());
		}

		if !is_terminal(&sentence) {
			sentence.push('.');
		}

		Ok(sentence)
	}

	/// Generates a paragraph of sentences joined by a single space.
	///
	/// The sentence count is drawn from `[min_sentences, min_sentences + max_sentences - 1]`.
	///
	/// # Errors
	/// - [`Error::InvalidRange`] if `max_sentences < min_sentences`
	/// - [`Error::EmptyChain`] if the chain has no entries
	pub fn paragraph(&mut self, min_sentences: usize, max_sentences: usize) -> Result<String> {
		check_range("sentences", min_sentences, max_sentences)?;
		self.build_paragraph(min_sentences, max_sentences, DEFAULT_MAX_LENGTH)
	}

	/// Generates paragraphs joined by `separator`.
	///
	/// The paragraph count is drawn from `[min_paragraphs, min_paragraphs + max_paragraphs - 1]`,
	/// each paragraph follows the contract of [`Generator::paragraph`].
	///
	/// # Errors
	/// - [`Error::InvalidRange`] if either maximum is below its minimum,
	///   checked before anything is generated
	/// - [`Error::EmptyChain`] if the chain has no entries
	pub fn paragraphs(
		&mut self,
		min_paragraphs: usize,
		max_paragraphs: usize,
		min_sentences: usize,
		max_sentences: usize,
		separator: &str,
	) -> Result<String> {
		let config = GenerationConfig {
			min_paragraphs,
			max_paragraphs,
			min_sentences,
			max_sentences,
			max_length: DEFAULT_MAX_LENGTH,
			separator: separator.to_owned(),
			..Default::default()
		};
		self.generate(&config)
	}

	/// Generates paragraphs as described by `config`.
	///
	/// `config.gram_size` is ignored, the chain already has its own.
	///
	/// # Errors
	/// Same as [`Generator::paragraphs`].
	pub fn generate(&mut self, config: &GenerationConfig) -> Result<String> {
		check_range("paragraphs", config.min_paragraphs, config.max_paragraphs)?;
		check_range("sentences", config.min_sentences, config.max_sentences)?;

		let count = self.draw_count(config.min_paragraphs, config.max_paragraphs);
		debug!("generating {} paragraphs with rule {:?}", count, self.start_rule());

		let paragraphs = (0..count)
			.map(|_| self.build_paragraph(config.min_sentences, config.max_sentences, config.max_length))
			.collect::<Result<Vec<_>>>()?;
		Ok(paragraphs.join(config.separator.as_str()))
	}

	fn build_paragraph(&mut self, min_sentences: usize, max_sentences: usize, max_length: usize) -> Result<String> {
		let count = self.draw_count(min_sentences, max_sentences);
		debug!("generating a paragraph of {} sentences", count);

		let sentences = (0..count).map(|_| self.sentence(max_length)).collect::<Result<Vec<_>>>()?;
		Ok(sentences.join(" "))
	}

	/// Draws `min + offset` with `offset` uniform in `[0, max)`.
	///
	/// `max == 0` gives an offset of zero, the sum saturates at `usize::MAX`.
	fn draw_count(&mut self, min: usize, max: usize) -> usize {
		if max == 0 {
			return min;
		}
		min.saturating_add(self.rng.random_range(0..max))
	}
}
