use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::{debug, info, warn};

use super::suffixes::Suffixes;
use super::tokenizer::tokenize_all;
use crate::error::{Error, Result};

/// Default total window length (prefix + next token).
pub const DEFAULT_GRAM_SIZE: usize = 3;

/// Token streams at least this long are trained on several threads.
pub const PARALLEL_MIN_TOKENS: usize = 200_000;

/// Word-level Markov chain.
///
/// Maps every prefix of `gram_size - 1` consecutive tokens seen in the corpus
/// to the multiset of tokens that followed it.
///
/// # Invariants
/// - `gram_size` is always > 2
/// - Every key has exactly `gram_size - 1` tokens
/// - Every value is non-empty
///
/// A chain is built once by [`Chain::train`] and only read afterwards, so it
/// can be shared between threads (`&Chain` or `Arc<Chain>`) without locking.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
	/// The order of the chain (prefix length + 1)
	gram_size: usize,

	/// Mapping from a prefix to the tokens observed after it
	links: HashMap<Vec<String>, Suffixes>,
}

impl Chain {
	/// Trains a chain from raw source strings.
	///
	/// Every source is tokenized and the token streams are concatenated in
	/// input order before a window of `gram_size - 1` tokens slides over them.
	///
	/// # Errors
	/// Returns [`Error::InvalidGramSize`] if `gram_size <= 2`.
	///
	/// # Notes
	/// - A corpus with no more than `gram_size` tokens yields an empty chain.
	/// - Training is deterministic: same sources, same chain.
	pub fn train<S: AsRef<str>>(sources: &[S], gram_size: usize) -> Result<Self> {
		Self::check_gram_size(gram_size)?;
		let tokens = tokenize_all(sources);
		Self::from_tokens(&tokens, gram_size)
	}

	/// Builds a chain from an already tokenized stream.
	///
	/// # Errors
	/// Returns [`Error::InvalidGramSize`] if `gram_size <= 2`.
	pub fn from_tokens(tokens: &[String], gram_size: usize) -> Result<Self> {
		Self::check_gram_size(gram_size)?;

		let mut chain = Self::empty(gram_size);
		if tokens.len() <= gram_size {
			warn!("corpus too short to train: {} tokens for a gram size of {}", tokens.len(), gram_size);
			return Ok(chain);
		}

		if tokens.len() >= PARALLEL_MIN_TOKENS {
			chain = Self::train_parallel(tokens, gram_size)?;
		} else {
			chain.links = build_links(tokens, gram_size - 1);
		}

		info!(
			"trained chain: {} tokens, {} prefixes, gram size {}",
			tokens.len(),
			chain.len(),
			gram_size
		);
		Ok(chain)
	}

	/// Splits the transitions into chunks, builds partial chains on worker
	/// threads and merges them back in chunk order.
	///
	/// # Notes
	/// - Each chunk window starts `gram_size - 1` tokens before its first
	///   transition, so no transition is lost or counted twice.
	/// - Partial chains are tagged with their chunk index, the result is the
	///   same as sequential training, suffix order included.
	fn train_parallel(tokens: &[String], gram_size: usize) -> Result<Self> {
		let prefix_len = gram_size - 1;
		let transitions = tokens.len() - prefix_len;
		let chunks = num_cpus::get().max(1);
		let chunk_size = transitions.div_ceil(chunks);

		let mut partials: Vec<(usize, HashMap<Vec<String>, Suffixes>)> = thread::scope(|scope| {
			let (tx, rx) = mpsc::channel();
			for (index, start) in (0..transitions).step_by(chunk_size).enumerate() {
				let tx = tx.clone();
				let end = (start + chunk_size).min(transitions);
				let window = &tokens[start..end + prefix_len];
				scope.spawn(move || {
					// The receiver only goes away once every sender is dropped
					let _ = tx.send((index, build_links(window, prefix_len)));
				});
			}
			drop(tx);
			rx.iter().collect()
		});
		partials.sort_by_key(|(index, _)| *index);
		debug!("merging {} partial chains", partials.len());

		let mut chain = Self::empty(gram_size);
		for (_, links) in partials {
			chain.merge(Self { gram_size, links })?;
		}
		Ok(chain)
	}

	fn check_gram_size(gram_size: usize) -> Result<()> {
		if gram_size <= 2 {
			return Err(Error::InvalidGramSize(gram_size));
		}
		Ok(())
	}

	fn empty(gram_size: usize) -> Self {
		Self { gram_size, links: HashMap::new() }
	}

	/// The order of the chain.
	pub fn gram_size(&self) -> usize {
		self.gram_size
	}

	/// Number of tokens in every prefix (`gram_size - 1`).
	pub fn prefix_len(&self) -> usize {
		self.gram_size - 1
	}

	/// Number of distinct prefixes.
	pub fn len(&self) -> usize {
		self.links.len()
	}

	pub fn is_empty(&self) -> bool {
		self.links.is_empty()
	}

	/// Total number of recorded transitions.
	pub fn transitions(&self) -> usize {
		self.links.values().map(Suffixes::len).sum()
	}

	/// Returns the tokens observed after `prefix`, if the prefix is known.
	pub fn suffixes(&self, prefix: &[String]) -> Option<&Suffixes> {
		self.links.get(prefix)
	}

	/// Iterates over `(prefix, suffixes)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&Vec<String>, &Suffixes)> {
		self.links.iter()
	}

	/// Appends the transitions of `other` to this chain.
	///
	/// # Errors
	/// Returns [`Error::GramSizeMismatch`] if the orders differ.
	pub(crate) fn merge(&mut self, other: Self) -> Result<()> {
		if self.gram_size != other.gram_size {
			return Err(Error::GramSizeMismatch { expected: self.gram_size, found: other.gram_size });
		}

		for (prefix, suffixes) in other.links {
			self.links.entry(prefix).or_default().merge(suffixes);
		}
		Ok(())
	}
}

/// Slides a `prefix_len` window over `tokens`, recording each following token.
fn build_links(tokens: &[String], prefix_len: usize) -> HashMap<Vec<String>, Suffixes> {
	let mut links: HashMap<Vec<String>, Suffixes> = HashMap::new();
	if tokens.len() <= prefix_len {
		return links;
	}

	let mut prefix: Vec<String> = tokens[..prefix_len].to_vec();
	for next in &tokens[prefix_len..] {
		links.entry(prefix.clone()).or_default().push(next);

		prefix.remove(0);
		prefix.push(next.clone());
	}
	links
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(tokens: &[&str]) -> Vec<String> {
		tokens.iter().map(|t| t.to_string()).collect()
	}

	fn suffix_list(chain: &Chain, prefix: &[&str]) -> Vec<String> {
		chain
			.suffixes(&key(prefix))
			.map(|s| s.iter().map(str::to_owned).collect())
			.unwrap_or_default()
	}

	#[test]
	fn rejects_small_gram_sizes() {
		for gram_size in 0..=2 {
			let err = Chain::train(&["The cat sat on the mat."], gram_size).unwrap_err();
			assert!(matches!(err, Error::InvalidGramSize(g) if g == gram_size));
		}
	}

	#[test]
	fn cat_sat_cat_ran() {
		let chain = Chain::train(&["The cat sat. The cat ran."], 3).unwrap();

		assert_eq!(chain.len(), 3);
		assert_eq!(suffix_list(&chain, &["The", "cat"]), vec!["sat.", "ran."]);
		assert_eq!(suffix_list(&chain, &["cat", "sat."]), vec!["The"]);
		assert_eq!(suffix_list(&chain, &["sat.", "The"]), vec!["cat"]);
		// the final prefix has nothing after it
		assert!(chain.suffixes(&key(&["cat", "ran."])).is_none());
	}

	#[test]
	fn short_corpus_gives_empty_chain() {
		assert!(Chain::train::<&str>(&[], 3).unwrap().is_empty());
		assert!(Chain::train(&["   "], 3).unwrap().is_empty());
		// exactly gram_size tokens is still not enough
		assert!(Chain::train(&["one two three"], 3).unwrap().is_empty());
		assert_eq!(Chain::train(&["one two three four"], 3).unwrap().len(), 2);
	}

	#[test]
	fn sources_are_concatenated() {
		let chain = Chain::train(&["a b", "c d"], 3).unwrap();
		assert_eq!(suffix_list(&chain, &["a", "b"]), vec!["c"]);
		assert_eq!(suffix_list(&chain, &["b", "c"]), vec!["d"]);
	}

	#[test]
	fn keys_have_prefix_length() {
		let chain = Chain::train(&["w1 w2 w3 w4 w5 w6 w7 w1 w2 w3 w9"], 4).unwrap();
		assert_eq!(chain.prefix_len(), 3);
		for (prefix, suffixes) in chain.iter() {
			assert_eq!(prefix.len(), 3);
			assert!(!suffixes.is_empty());
		}
		assert_eq!(suffix_list(&chain, &["w1", "w2", "w3"]), vec!["w4", "w9"]);
		assert_eq!(chain.transitions(), 8);
	}

	#[test]
	fn parallel_training_matches_sequential() {
		let words = ["alpha", "beta", "gamma.", "Delta", "beta", "alpha", "gamma!"];
		let tokens: Vec<String> = (0..PARALLEL_MIN_TOKENS + 17).map(|i| words[(i * i + i / 3) % words.len()].to_owned()).collect();

		let parallel = Chain::from_tokens(&tokens, 3).unwrap();
		let sequential = Chain { gram_size: 3, links: build_links(&tokens, 2) };

		assert_eq!(parallel, sequential);
		assert_eq!(parallel.transitions(), tokens.len() - 2);
	}

	#[test]
	fn merge_requires_same_order() {
		let mut left = Chain::train(&["a b c d e"], 3).unwrap();
		let right = Chain::train(&["a b c d e"], 4).unwrap();
		assert!(matches!(left.merge(right), Err(Error::GramSizeMismatch { expected: 3, found: 4 })));

		let again = Chain::train(&["a b c d e"], 3).unwrap();
		left.merge(again).unwrap();
		assert_eq!(suffix_list(&left, &["a", "b"]), vec!["c", "c"]);
	}
}
