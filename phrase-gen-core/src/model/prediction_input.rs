use crate::error::{ChainError, Result};
use super::phrase::DEFAULT_MAX_TOKENS;

/// Input parameters for generating a phrase with a [`Generator`].
///
/// # Responsibilities
/// - Track the duplicate-avoidance budget (`nb_try`)
/// - Track the optional seed of the random source (`seed`)
/// - Keep the token cap (`max_tokens`) within a usable range
///
/// [`Generator`]: super::generator::Generator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictionInput {
	/// Number of regenerations allowed when the result equals a training phrase.
	pub nb_try: usize,

	/// Seed of the random source. `None` uses the thread-local generator.
	pub seed: Option<u64>,

	/// Maximum number of tokens of a generated phrase (>= 2).
	max_tokens: usize,
}

impl Default for PredictionInput {
	fn default() -> Self {
		Self {
			nb_try: 0,
			seed: None,
			max_tokens: DEFAULT_MAX_TOKENS,
		}
	}
}

impl PredictionInput {
	/// Returns the current token cap.
	pub fn max_tokens(&self) -> usize {
		self.max_tokens
	}

	/// Sets the token cap.
	///
	/// # Errors
	/// Returns `InvalidInput` if the value is lower than 2 (a start pair).
	pub fn set_max_tokens(&mut self, max_tokens: usize) -> Result<()> {
		if max_tokens < 2 {
			return Err(ChainError::InvalidInput(format!(
				"max_tokens must be at least 2, got {}",
				max_tokens
			)));
		}
		self.max_tokens = max_tokens;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn token_cap_is_validated() {
		let mut input = PredictionInput::default();
		assert_eq!(input.max_tokens(), DEFAULT_MAX_TOKENS);

		assert!(input.set_max_tokens(2).is_ok());
		assert_eq!(input.max_tokens(), 2);

		assert!(matches!(input.set_max_tokens(1), Err(ChainError::InvalidInput(_))));
		assert!(matches!(input.set_max_tokens(0), Err(ChainError::InvalidInput(_))));
		assert_eq!(input.max_tokens(), 2);
	}
}
