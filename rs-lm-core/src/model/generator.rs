use log::debug;
use rand::Rng;

use super::sampler;
use super::window_index::WindowIndex;

/// Walks a trained [`WindowIndex`] to produce new text.
///
/// The random source is owned by the generator and consumed one draw per
/// generated character, so a seeded `rng` gives reproducible output.
///
/// # Responsibilities
/// - Keep a window over the last `window_length` characters of the text
/// - Sample the next character from the window's distribution
/// - Stop at the target length or at the first unknown window
#[derive(Debug)]
pub struct Generator<'a, R: Rng> {
	index: &'a WindowIndex,
	rng: R,
}

impl<'a, R: Rng> Generator<'a, R> {
	/// Creates a generator over `index` drawing from `rng`.
	pub fn new(index: &'a WindowIndex, rng: R) -> Self {
		Self { index, rng }
	}

	/// Gives back the random source, e.g. to continue the same sequence elsewhere.
	pub fn into_rng(self) -> R {
		self.rng
	}

	/// Extends `initial_text` with `text_length` characters beyond the
	/// initial window.
	///
	/// # Behavior
	/// - If `initial_text` is shorter than the window, or already at least
	///   `text_length` characters long, it is returned unchanged.
	/// - Otherwise the last `window_length` characters form the window. Each
	///   step samples a character from the window's distribution, appends it
	///   and slides the window by one.
	/// - If the window is not a known context, generation stops and the text
	///   produced so far is returned. This is a normal outcome, not an error.
	///
	/// # Notes
	/// - Lengths are counted in characters.
	/// - Generation runs while `len(text) - window_length < text_length`, so a
	///   complete run returns `text_length + window_length` characters.
	/// - The result can be shorter when generation stops early.
	pub fn generate(&mut self, initial_text: &str, text_length: usize) -> String {
		let window_length = self.index.window_length();
		let initial_length = initial_text.chars().count();
		if window_length > initial_length || initial_length >= text_length {
			return initial_text.to_owned();
		}

		let mut generated = initial_text.to_owned();
		let mut generated_length = initial_length;
		let mut window: String = initial_text.chars().skip(initial_length - window_length).collect();

		// `generated_length >= window_length` holds from the check above.
		while generated_length - window_length < text_length {
			let next_char = match self.index.get(&window).and_then(|distribution| sampler::draw(distribution, &mut self.rng)) {
				Some(c) => c,
				None => {
					debug!("Unknown window {:?}, stopping after {} characters", window, generated_length);
					return generated;
				}
			};

			generated.push(next_char);
			generated_length += 1;

			window.remove(0);
			window.push(next_char);
		}

		debug!("Generated {} characters", generated_length);
		generated
	}
}
