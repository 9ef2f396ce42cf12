//! Word-pair Markov chain phrase generation library.
//!
//! This crate provides:
//! - Second-order Markov chains conditioned on word pairs
//! - Exact incremental probability updates as observations arrive
//! - Weighted random sampling of new phrases, reproducible with a seed
//! - Corpus loading helpers
//!
//! ```
//! use phrase_gen_core::{ChainOptions, generate_chain, generate_phrase_from_chain};
//!
//! let chain = generate_chain(["the cat sat."], &ChainOptions::default());
//! let phrase = generate_phrase_from_chain(&chain).unwrap();
//! assert!(phrase.starts_with("The cat"));
//! ```

/// Chain model, builder and generation logic.
pub mod model;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (corpus loading, path helpers).
pub mod io;

pub use error::{ChainError, Result};
pub use model::branch::Branch;
pub use model::chain::{Chain, ChainOptions, generate_chain};
pub use model::generator::Generator;
pub use model::phrase::{generate_phrase_from_chain, generate_phrase_with_rng};
pub use model::prediction_input::PredictionInput;
pub use model::tokenizer::{END_TOKEN, tokenize};
