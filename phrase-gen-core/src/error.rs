use thiserror::Error;

/// Errors raised while building a chain or generating from it.
#[derive(Error, Debug)]
pub enum ChainError {
	/// Input data or an option value is not usable.
	#[error("Invalid input: {0}")]
	InvalidInput(String),

	/// Generation was requested on a chain that never learned a transition.
	#[error("Chain is empty: no transitions were learned")]
	EmptyChain,

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChainError>;
