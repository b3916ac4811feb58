use std::fmt;
use std::path::Path;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::generator::Generator;
use super::window_index::WindowIndex;
use crate::error::LmResult;
use crate::io::read_corpus;

/// Seed used by [`Mode::default_seeded`].
pub const DEFAULT_SEED: u64 = 20;

/// How the random source of a [`LanguageModel`] is initialized.
///
/// # Variants
/// - `Seeded(u64)`: fixed seed, the same corpus and parameters always give
///   the same text. Good for debugging and tests.
/// - `Random`: seeded from the operating system. Good for production.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	Seeded(u64),
	Random,
}

impl Mode {
	/// Seeded mode with [`DEFAULT_SEED`].
	pub fn default_seeded() -> Self {
		Mode::Seeded(DEFAULT_SEED)
	}

	fn rng(self) -> StdRng {
		match self {
			Mode::Seeded(seed) => StdRng::seed_from_u64(seed),
			Mode::Random => StdRng::from_os_rng(),
		}
	}
}

/// Character-level language model: a [`WindowIndex`] plus the random
/// source used to generate from it.
///
/// The random source is created once, when the model is built, and every
/// call to `generate` keeps consuming the same sequence.
#[derive(Debug)]
pub struct LanguageModel {
	index: WindowIndex,
	mode: Mode,
	rng: StdRng,
}

impl LanguageModel {
	/// Creates an untrained model.
	///
	/// # Errors
	/// Returns `LmError::InvalidWindowLength` if `window_length == 0`.
	pub fn new(window_length: usize, mode: Mode) -> LmResult<Self> {
		Ok(Self { index: WindowIndex::new(window_length)?, mode, rng: mode.rng() })
	}

	/// Learns from a corpus held in memory.
	pub fn train(&mut self, corpus: &str) {
		self.index.train(corpus);
		info!(
			"Model trained: window length {}, {} contexts",
			self.index.window_length(),
			self.index.len()
		);
	}

	/// Reads the whole file at `path` and learns from it.
	///
	/// # Errors
	/// Returns `LmError::Io` if the file cannot be read.
	pub fn train_file<P: AsRef<Path>>(&mut self, path: P) -> LmResult<()> {
		let corpus = read_corpus(&path)?;
		info!("Read corpus {} ({} bytes)", path.as_ref().display(), corpus.len());
		self.train(&corpus);
		Ok(())
	}

	/// Generates text starting from `initial_text`, see [`Generator::generate`].
	pub fn generate(&mut self, initial_text: &str, text_length: usize) -> String {
		let mut generator = Generator::new(&self.index, &mut self.rng);
		generator.generate(initial_text, text_length)
	}

	/// Picks a random known context with the model's random source.
	pub fn random_context(&mut self) -> Option<String> {
		self.index.random_context(&mut self.rng)
	}

	/// Read-only access to the trained index, e.g. to inspect distributions
	/// or to run a [`Generator`] with another random source.
	pub fn index(&self) -> &WindowIndex {
		&self.index
	}

	/// Number of characters in a context window.
	pub fn window_length(&self) -> usize {
		self.index.window_length()
	}

	/// How the random source was seeded.
	pub fn mode(&self) -> Mode {
		self.mode
	}
}

impl fmt::Display for LanguageModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.index)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::LmError;

	const CORPUS: &str = "the theory of the thermal thesis is that these themes thrive";

	#[test]
	fn test_invalid_window_length() {
		assert!(matches!(LanguageModel::new(0, Mode::Random), Err(LmError::InvalidWindowLength(0))));
	}

	#[test]
	fn test_same_seed_same_text() {
		let mut first = LanguageModel::new(2, Mode::Seeded(42)).unwrap();
		let mut second = LanguageModel::new(2, Mode::Seeded(42)).unwrap();
		first.train(CORPUS);
		second.train(CORPUS);

		for _ in 0..5 {
			assert_eq!(first.generate("th", 80), second.generate("th", 80));
		}
	}

	#[test]
	fn test_rng_is_consumed_across_calls() {
		let mut model = LanguageModel::new(1, Mode::default_seeded()).unwrap();
		model.train(CORPUS);

		let mut replay = StdRng::seed_from_u64(DEFAULT_SEED);
		let expected_first = Generator::new(model.index(), &mut replay).generate("t", 40);
		let expected_second = Generator::new(model.index(), &mut replay).generate("t", 40);

		assert_eq!(model.generate("t", 40), expected_first);
		assert_eq!(model.generate("t", 40), expected_second);
	}

	#[test]
	fn test_display_dumps_index() {
		let mut model = LanguageModel::new(2, Mode::Random).unwrap();
		model.train("abcabcabc");
		assert_eq!(
			model.to_string(),
			"ab : (('c' 3 1 1))\nbc : (('a' 2 1 1))\nca : (('b' 2 1 1))\n"
		);
		assert_eq!(model.mode(), Mode::Random);
		assert_eq!(model.window_length(), 2);
	}
}
