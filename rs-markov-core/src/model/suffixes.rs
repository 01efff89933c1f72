use rand::Rng;
use rand::seq::IndexedRandom;

/// Multiset of the tokens observed right after one prefix.
///
/// Conceptually, this is the set of outgoing edges of a node in the Markov
/// chain. Repeated observations are stored repeatedly, so a uniform draw over
/// the stored tokens is a draw weighted by observation count.
///
/// ## Invariants
/// - Insertion (corpus) order is kept
/// - Never empty once it belongs to a `Chain`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Suffixes {
	/// Observed followers, one entry per observation.
	/// Example: ["sat.", "ran.", "sat."]
	tokens: Vec<String>,
}

impl Suffixes {
	/// Creates an empty multiset.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one more observation of `token`.
	pub fn push(&mut self, token: &str) {
		self.tokens.push(token.to_owned());
	}

	/// Number of observations, duplicates included.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// How many times `token` was observed.
	pub fn occurrences(&self, token: &str) -> usize {
		self.tokens.iter().filter(|t| *t == token).count()
	}

	/// Observations in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(String::as_str)
	}

	/// Draws one observation uniformly at random.
	///
	/// A token seen `k` times is `k` times as likely as a token seen once.
	/// Returns `None` only for an empty multiset.
	pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		self.tokens.choose(rng).map(String::as_str)
	}

	/// Appends all observations of `other` after the current ones.
	///
	/// Used to combine partial chains built in parallel.
	pub fn merge(&mut self, other: Self) {
		self.tokens.extend(other.tokens);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn suffixes(tokens: &[&str]) -> Suffixes {
		let mut s = Suffixes::new();
		for t in tokens {
			s.push(t);
		}
		s
	}

	#[test]
	fn keeps_duplicates_and_order() {
		let s = suffixes(&["sat.", "ran.", "sat."]);
		assert_eq!(s.len(), 3);
		assert_eq!(s.occurrences("sat."), 2);
		assert_eq!(s.occurrences("ran."), 1);
		assert_eq!(s.occurrences("flew."), 0);
		assert_eq!(s.iter().collect::<Vec<_>>(), vec!["sat.", "ran.", "sat."]);
	}

	#[test]
	fn empty_multiset_has_nothing_to_choose() {
		let mut rng = StdRng::seed_from_u64(7);
		assert!(Suffixes::new().is_empty());
		assert_eq!(Suffixes::new().choose(&mut rng), None);
	}

	#[test]
	fn draws_are_weighted_by_frequency() {
		let s = suffixes(&["a", "a", "a", "b"]);
		let mut rng = StdRng::seed_from_u64(42);
		let draws = 8_000;
		let a = (0..draws).filter(|_| s.choose(&mut rng) == Some("a")).count();
		// expected 6000
		assert!((5_600..=6_400).contains(&a), "got {a} draws of 'a'");
	}

	#[test]
	fn merge_appends_after_existing() {
		let mut left = suffixes(&["x"]);
		left.merge(suffixes(&["y", "x"]));
		assert_eq!(left.iter().collect::<Vec<_>>(), vec!["x", "y", "x"]);
	}
}
