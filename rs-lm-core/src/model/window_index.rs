use std::collections::{HashMap, HashSet};
use std::fmt;

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::distribution::FrequencyDistribution;
use crate::error::{LmError, LmResult};

/// The trained model: maps every context window seen in the corpus to the
/// distribution of characters that followed it.
///
/// # Responsibilities
/// - Slide a fixed-length window over a corpus and record each next character
/// - Keep every distribution normalized once training returns
/// - Answer lookups for the generator
///
/// # Invariants
/// - `window_length` is always >= 1
/// - Every key is exactly `window_length` characters long
/// - Every distribution is non-empty
/// - Contexts are never removed
#[derive(Clone, Debug)]
pub struct WindowIndex {
	window_length: usize,
	/// Context window to its next-character distribution.
	/// Example: { "ab" => (('c' 2 1 1)) }
	distributions: HashMap<String, FrequencyDistribution>,
}

impl WindowIndex {
	/// Creates an empty index for windows of `window_length` characters.
	///
	/// # Errors
	/// Returns `LmError::InvalidWindowLength` if `window_length == 0`.
	pub fn new(window_length: usize) -> LmResult<Self> {
		if window_length == 0 {
			return Err(LmError::InvalidWindowLength(window_length));
		}
		Ok(Self { window_length, distributions: HashMap::new() })
	}

	/// Learns from `corpus`.
	///
	/// For every offset `i` with a full window and a following character,
	/// the context is `corpus[i..i + window_length]` and the observed next
	/// character is `corpus[i + window_length]`. Offsets are counted in
	/// characters, and the text is used as-is (case, punctuation and
	/// whitespace are all significant).
	///
	/// A corpus shorter than `window_length + 1` characters adds nothing.
	///
	/// # Notes
	/// - Probabilities are refreshed once per touched context after the scan
	///   rather than after every single observation. The final values are the same.
	/// - Calling `train` again keeps accumulating into the same index.
	pub fn train(&mut self, corpus: &str) {
		let chars: Vec<char> = corpus.chars().collect();
		if chars.len() <= self.window_length {
			debug!(
				"Corpus of {} characters is too short for window length {}",
				chars.len(),
				self.window_length
			);
			return;
		}

		let mut touched: HashSet<String> = HashSet::new();
		let observations = chars.len() - self.window_length;
		for i in 0..observations {
			let context: String = chars[i..i + self.window_length].iter().collect();
			let next_char = chars[i + self.window_length];

			self.distributions.entry(context.clone()).or_default().update(next_char);
			touched.insert(context);
		}

		for context in &touched {
			if let Some(distribution) = self.distributions.get_mut(context) {
				distribution.compute_probabilities();
			}
		}

		debug!(
			"Trained on {} observations, {} contexts touched, {} contexts total",
			observations,
			touched.len(),
			self.distributions.len()
		);
	}

	/// Records a single observation of `next_char` after `context` and
	/// refreshes the probabilities of that context right away.
	///
	/// # Errors
	/// Returns `LmError::ContextLength` if `context` is not exactly
	/// `window_length` characters long.
	pub fn observe(&mut self, context: &str, next_char: char) -> LmResult<()> {
		let found = context.chars().count();
		if found != self.window_length {
			return Err(LmError::ContextLength { expected: self.window_length, found });
		}

		let distribution = self.distributions.entry(context.to_owned()).or_default();
		distribution.update(next_char);
		distribution.compute_probabilities();
		Ok(())
	}

	/// Number of characters in every context window.
	pub fn window_length(&self) -> usize {
		self.window_length
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.distributions.len()
	}

	/// Returns `true` if no context was learned yet (untrained, or corpus too short).
	pub fn is_empty(&self) -> bool {
		self.distributions.is_empty()
	}

	/// Returns the distribution for `context`, or `None` if it was never seen.
	pub fn get(&self, context: &str) -> Option<&FrequencyDistribution> {
		self.distributions.get(context)
	}

	/// Returns `true` if `context` was seen during training.
	///
	/// The generator stops as soon as its window is not contained.
	pub fn contains(&self, context: &str) -> bool {
		self.distributions.contains_key(context)
	}

	/// All contexts, sorted.
	pub fn contexts(&self) -> Vec<&str> {
		let mut keys: Vec<&str> = self.distributions.keys().map(String::as_str).collect();
		keys.sort_unstable();
		keys
	}

	/// Returns a uniformly chosen context, useful as a starting text.
	///
	/// Keys are sorted before choosing so a seeded `rng` always gives the
	/// same answer. Returns `None` if the index is empty.
	pub fn random_context<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
		self.contexts().choose(rng).map(|context| (*context).to_owned())
	}
}

impl fmt::Display for WindowIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for context in self.contexts() {
			if let Some(distribution) = self.distributions.get(context) {
				writeln!(f, "{} : {}", context, distribution)?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn test_zero_window_is_rejected() {
		assert!(matches!(WindowIndex::new(0), Err(LmError::InvalidWindowLength(0))));
	}

	#[test]
	fn test_train_repeating_corpus() {
		let mut index = WindowIndex::new(2).unwrap();
		index.train("abcabcabc");

		assert_eq!(index.contexts(), vec!["ab", "bc", "ca"]);

		let ab = index.get("ab").unwrap();
		assert_eq!(ab.len(), 1);
		let entry = ab.get(0).unwrap();
		assert_eq!(entry.chr, 'c');
		assert_eq!(entry.count, 3);
		assert!((entry.p - 1.0).abs() < 1e-9);

		let bc = index.get("bc").unwrap().get(0).unwrap();
		assert_eq!(bc.chr, 'a');
		assert_eq!(bc.count, 2);
	}

	#[test]
	fn test_last_window_has_no_observation() {
		// "abc" with window 2: only "ab" -> 'c'; "bc" is never a context.
		let mut index = WindowIndex::new(2).unwrap();
		index.train("abc");
		assert_eq!(index.len(), 1);
		assert!(index.contains("ab"));
		assert!(!index.contains("bc"));
	}

	#[test]
	fn test_short_corpus_gives_empty_index() {
		let mut index = WindowIndex::new(3).unwrap();
		index.train("abc");
		assert!(index.is_empty());
		index.train("");
		assert!(index.is_empty());
	}

	#[test]
	fn test_text_is_not_normalized() {
		let mut index = WindowIndex::new(1).unwrap();
		index.train("aA a");
		assert!(index.contains("a"));
		assert!(index.contains("A"));
		assert!(index.contains(" "));
		assert_eq!(index.get("A").unwrap().first().unwrap().chr, ' ');
	}

	#[test]
	fn test_windows_count_characters_not_bytes() {
		let mut index = WindowIndex::new(2).unwrap();
		index.train("éàéàé");
		assert_eq!(index.contexts(), vec!["àé", "éà"]);
		assert_eq!(index.get("éà").unwrap().first().unwrap().chr, 'é');
	}

	#[test]
	fn test_observe_matches_train() {
		let mut trained = WindowIndex::new(2).unwrap();
		trained.train("abacab");

		let mut observed = WindowIndex::new(2).unwrap();
		for (context, next_char) in [("ab", 'a'), ("ba", 'c'), ("ac", 'a'), ("ca", 'b')] {
			observed.observe(context, next_char).unwrap();
		}

		assert_eq!(trained.to_string(), observed.to_string());
	}

	#[test]
	fn test_observe_rejects_wrong_context_length() {
		let mut index = WindowIndex::new(2).unwrap();
		match index.observe("abc", 'd') {
			Err(err @ LmError::ContextLength { expected: 2, found: 3 }) => {
				assert_eq!(err.to_string(), "Context of 3 characters, expected 2");
			}
			other => panic!("unexpected result: {:?}", other),
		}
		assert!(matches!(index.observe("a", 'd'), Err(LmError::ContextLength { expected: 2, found: 1 })));
		assert!(index.is_empty());
	}

	#[test]
	fn test_random_context_is_reproducible() {
		let mut index = WindowIndex::new(1).unwrap();
		index.train("the quick brown fox");

		let first = index.random_context(&mut StdRng::seed_from_u64(3));
		let second = index.random_context(&mut StdRng::seed_from_u64(3));
		assert!(first.is_some());
		assert_eq!(first, second);
		assert!(index.contains(&first.unwrap()));

		let empty = WindowIndex::new(1).unwrap();
		assert_eq!(empty.random_context(&mut StdRng::seed_from_u64(3)), None);
	}

	#[test]
	fn test_display_is_sorted() {
		let mut index = WindowIndex::new(1).unwrap();
		index.train("aab");
		assert_eq!(index.to_string(), "a : (('b' 1 0.5 0.5) ('a' 1 0.5 1))\n");
	}
}
