//! Character-level n-gram language model.
//!
//! This crate learns, from a text corpus, which characters follow each
//! fixed-length context window, and generates new text by weighted random
//! sampling over those observations:
//! - Insertion-ordered frequency distributions with derived probabilities
//! - A window index built in a single pass over the corpus
//! - Cumulative-probability sampling driven by an explicit random source
//! - A generator that slides its window over the text it produces

/// The model: distributions, window index, sampler and generator.
pub mod model;

/// Corpus loading helpers.
pub mod io;

/// Error type shared by the crate.
pub mod error;

pub use error::{LmError, LmResult};
pub use model::language_model::{DEFAULT_SEED, LanguageModel, Mode};
