use thiserror::Error;

/// Errors raised by the language model.
///
/// A missing context during generation is not an error: generation simply
/// stops and returns the text produced so far.
#[derive(Debug, Error)]
pub enum LmError {
	/// The window length must be at least 1.
	#[error("Invalid window length: {0} (must be >= 1)")]
	InvalidWindowLength(usize),

	/// A context whose length differs from the model's window length.
	#[error("Context of {found} characters, expected {expected}")]
	ContextLength { expected: usize, found: usize },

	/// Access outside a distribution's entries.
	#[error("Index {index} out of bounds for length {len}")]
	IndexOutOfBounds { index: usize, len: usize },

	/// The corpus could not be read.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

pub type LmResult<T> = Result<T, LmError>;
