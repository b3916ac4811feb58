use rand::Rng;

use super::distribution::FrequencyDistribution;

/// Picks a character from `distribution` for the uniform value `r` in `[0, 1)`.
///
/// Scans the entries in traversal order and returns the first one whose
/// cumulative probability strictly exceeds `r`. If rounding leaves the last
/// `cp` at or below `r`, the last entry is returned instead.
///
/// Returns `None` only for an empty distribution.
pub fn pick(distribution: &FrequencyDistribution, r: f64) -> Option<char> {
	let mut fallback = None;
	for entry in distribution.iter() {
		if entry.cp > r {
			return Some(entry.chr);
		}
		fallback = Some(entry.chr);
	}
	fallback
}

/// Draws a character from `distribution` using a fresh value from `rng`.
pub fn draw<R: Rng + ?Sized>(distribution: &FrequencyDistribution, rng: &mut R) -> Option<char> {
	let r: f64 = rng.random();
	pick(distribution, r)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn distribution_of(text: &str) -> FrequencyDistribution {
		let mut distribution = FrequencyDistribution::new();
		for chr in text.chars() {
			distribution.update(chr);
		}
		distribution.compute_probabilities();
		distribution
	}

	#[test]
	fn test_pick_boundaries() {
		// Traversal: 'b' (cp 0.25), 'a' (cp 1.0)
		let distribution = distribution_of("aaab");
		assert_eq!(pick(&distribution, 0.0), Some('b'));
		assert_eq!(pick(&distribution, 0.2499), Some('b'));
		assert_eq!(pick(&distribution, 0.25), Some('a'));
		assert_eq!(pick(&distribution, 0.9999), Some('a'));
	}

	#[test]
	fn test_pick_falls_back_to_last_entry() {
		let distribution = distribution_of("ab");
		assert_eq!(pick(&distribution, 1.0), Some('a'));
		assert_eq!(pick(&distribution, 2.0), Some('a'));
	}

	#[test]
	fn test_pick_empty() {
		assert_eq!(pick(&FrequencyDistribution::new(), 0.5), None);
	}

	#[test]
	fn test_draw_single_entry_is_certain() {
		let distribution = distribution_of("zzz");
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..100 {
			assert_eq!(draw(&distribution, &mut rng), Some('z'));
		}
	}
}
