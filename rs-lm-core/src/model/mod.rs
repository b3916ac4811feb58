//! The n-gram model and the generation procedure.
//!
//! - Per-context next-character statistics (`FrequencyDistribution`)
//! - The trained context map (`WindowIndex`)
//! - Cumulative-probability sampling (`sampler`)
//! - Text generation over a trained index (`Generator`)
//! - A facade owning an index and its random source (`LanguageModel`)

/// Insertion-ordered next-character counts and their probabilities.
pub mod distribution;

/// Context window to distribution map, built by training on a corpus.
pub mod window_index;

/// Weighted random choice of a character from a distribution.
pub mod sampler;

/// Sliding-window text generation.
///
/// Stops at the requested length or at the first unknown context.
pub mod generator;

/// Trained index bundled with a seeded or OS-seeded random source.
pub mod language_model;
