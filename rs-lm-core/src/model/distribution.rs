use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{LmError, LmResult};

/// One observed next character after a given context.
///
/// `p` and `cp` are derived from the counts of the owning distribution
/// and are only meaningful after [`FrequencyDistribution::compute_probabilities`].
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct FrequencyEntry {
	/// The observed character.
	pub chr: char,
	/// Number of times `chr` followed the context. Starts at 1.
	pub count: usize,
	/// Probability of `chr` given the context.
	pub p: f64,
	/// Running sum of `p` over the distribution, up to and including this entry.
	pub cp: f64,
}

impl FrequencyEntry {
	fn new(chr: char) -> Self {
		Self { chr, count: 1, p: 0.0, cp: 0.0 }
	}
}

impl fmt::Display for FrequencyEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({:?} {} {} {})", self.chr, self.count, self.p, self.cp)
	}
}

/// Observed distribution of next characters for one context window.
///
/// Traversal order is the order of first occurrence, newest first: a
/// character seen for the first time goes to the front. This order drives
/// cumulative probabilities and therefore sampling, so it is part of the
/// observable behavior of the model.
///
/// Entries are stored in an append-only `Vec` and traversed in reverse,
/// which keeps "insert at the front" O(1). A `char -> slot` map keeps
/// updates O(1) as well.
///
/// # Invariants
/// - Each character appears at most once
/// - Every count is >= 1
/// - After `compute_probabilities`, the `p` values sum to 1.0 and `cp` is
///   non-decreasing in traversal order, ending at 1.0
#[derive(Clone, Debug, Default)]
pub struct FrequencyDistribution {
	/// Entries in first-seen order (oldest first). Traversal is reversed.
	entries: Vec<FrequencyEntry>,
	/// Character to its slot in `entries`.
	slots: HashMap<char, usize>,
}

impl FrequencyDistribution {
	/// Creates an empty distribution.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of distinct characters observed.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` if no character was recorded. Never the case for trained contexts.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Sum of all occurrence counts.
	pub fn total_count(&self) -> usize {
		self.entries.iter().map(|entry| entry.count).sum()
	}

	/// Records an occurrence of `chr`.
	///
	/// - If `chr` is already present, its count is increased.
	/// - Otherwise a new entry with a count of 1 is placed first in traversal order.
	///
	/// Probabilities are not refreshed here; call `compute_probabilities`
	/// before sampling.
	pub fn update(&mut self, chr: char) {
		match self.slots.get(&chr) {
			Some(&slot) => self.entries[slot].count += 1,
			None => {
				self.slots.insert(chr, self.entries.len());
				self.entries.push(FrequencyEntry::new(chr));
			}
		}
	}

	/// Returns the traversal position of `chr`, or `None` if it was never observed.
	pub fn index_of(&self, chr: char) -> Option<usize> {
		self.slots.get(&chr).map(|&slot| self.entries.len() - 1 - slot)
	}

	/// Returns the entry at traversal position `index`.
	///
	/// # Errors
	/// Returns `LmError::IndexOutOfBounds` if `index >= len()`.
	pub fn get(&self, index: usize) -> LmResult<&FrequencyEntry> {
		let len = self.entries.len();
		if index >= len {
			return Err(LmError::IndexOutOfBounds { index, len });
		}
		Ok(&self.entries[len - 1 - index])
	}

	/// First entry in traversal order (the most recently first-seen character).
	pub fn first(&self) -> Option<&FrequencyEntry> {
		self.entries.last()
	}

	/// Last entry in traversal order. Its `cp` is 1.0 once normalized.
	pub fn last(&self) -> Option<&FrequencyEntry> {
		self.entries.first()
	}

	/// Iterates over the entries in traversal order.
	pub fn iter(&self) -> impl DoubleEndedIterator<Item = &FrequencyEntry> + ExactSizeIterator {
		self.entries.iter().rev()
	}

	/// Derives `p` and `cp` for every entry from the raw counts.
	///
	/// `p = count / total` and `cp` is the running sum of `p` in traversal
	/// order. Must be called again whenever counts change.
	///
	/// An empty distribution is left untouched.
	pub fn compute_probabilities(&mut self) {
		let total = self.total_count();
		if total == 0 {
			return;
		}

		let mut cp = 0.0;
		for entry in self.entries.iter_mut().rev() {
			entry.p = entry.count as f64 / total as f64;
			cp += entry.p;
			entry.cp = cp;
		}
	}
}

impl fmt::Display for FrequencyDistribution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "(")?;
		for (i, entry) in self.iter().enumerate() {
			if i > 0 {
				write!(f, " ")?;
			}
			write!(f, "{}", entry)?;
		}
		write!(f, ")")
	}
}
