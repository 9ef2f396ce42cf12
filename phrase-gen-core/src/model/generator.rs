use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ChainError, Result};
use crate::io;
use super::chain::{Chain, ChainOptions, generate_chain};
use super::phrase::{format_phrase, sample_tokens};
use super::prediction_input::PredictionInput;
use super::tokenizer::tokenize;

/// High-level generator built from one or more phrase corpora.
///
/// # Responsibilities
/// - Load corpora (`.dat` files, one phrase per line) and build a single chain
/// - Remember the training phrases to avoid reproducing them verbatim
/// - Generate phrases with an optional seed and a retry budget
#[derive(Debug)]
pub struct Generator {
	chain: Chain,
	/// Training phrases as space-joined token sequences.
	phrases: HashSet<String>,
	model_names: Vec<String>,
}

impl Generator {
	/// Creates a generator by loading all `.dat` corpora from a directory.
	///
	/// # Parameters
	/// - `filepath`: Path to a directory containing corpus files.
	///   Both `"folder"` and `"folder/"` are accepted.
	/// - `options`: Chain construction options.
	///
	/// # Behavior
	/// - Lists all files with the `.dat` extension in the given directory.
	/// - Builds one chain from the phrases of every file.
	/// - The model name is derived from the file name (without extension).
	///
	/// # Errors
	/// - Returns an error if the path does not exist or is not a directory.
	/// - Returns an error if a corpus fails to load.
	pub fn new<P: AsRef<Path>>(filepath: P, options: &ChainOptions) -> Result<Self> {
		let string_path = filepath
			.as_ref()
			.to_str()
			.ok_or_else(|| ChainError::InvalidInput("Invalid filepath".to_owned()))?;
		// Normalize "folder" / "folder/"
		let folder = io::normalize_folder(string_path);

		if !folder.is_dir() {
			return Err(ChainError::InvalidInput(format!(
				"Expected a directory, got: {}",
				folder.display()
			)));
		}

		let paths = io::list_files(&folder, "dat")?
			.into_iter()
			.map(|file| folder.join(file));
		Self::from_files(paths, options)
	}

	/// Creates a generator from explicit corpus files.
	///
	/// # Errors
	/// Returns an error if two files share a model name or a file cannot be read.
	pub fn from_files<I, P>(paths: I, options: &ChainOptions) -> Result<Self>
	where
		I: IntoIterator<Item = P>,
		P: AsRef<Path>,
	{
		let mut model_names = Vec::new();
		let mut phrases = Vec::new();

		for path in paths {
			let name = io::get_filename(&path)?;
			if model_names.contains(&name) {
				return Err(ChainError::InvalidInput(format!("Model {} already loaded", name)));
			}
			let lines = io::read_file(&path)?;
			info!("loaded model {} ({} phrases)", name, lines.len());
			phrases.extend(lines);
			model_names.push(name);
		}

		let mut generator = Self::from_phrases("", phrases, options);
		generator.model_names = model_names;
		Ok(generator)
	}

	/// Creates a generator from in-memory phrases, registered under `name`.
	///
	/// An empty `name` registers no model name.
	pub fn from_phrases<I, S>(name: &str, phrases: I, options: &ChainOptions) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let phrases: Vec<S> = phrases.into_iter().collect();
		let chain = generate_chain(&phrases, options);
		let known = phrases
			.iter()
			.map(|phrase| tokenize(phrase.as_ref()))
			.filter(|tokens| !tokens.is_empty())
			.map(|tokens| tokens.join(" "))
			.collect();

		Self {
			chain,
			phrases: known,
			model_names: if name.is_empty() { Vec::new() } else { vec![name.to_owned()] },
		}
	}

	/// Returns the list of loaded model names, in loading order.
	pub fn model_names(&self) -> &[String] {
		&self.model_names
	}

	/// The chain every prediction samples from.
	pub fn chain(&self) -> &Chain {
		&self.chain
	}

	/// Creates a new `PredictionInput` with default values.
	pub fn make_prediction_input(&self) -> PredictionInput {
		PredictionInput::default()
	}

	/// Generates a phrase, seeding the random source from `input.seed` if set.
	///
	/// # Errors
	/// Returns `EmptyChain` if no transition was learned.
	pub fn predict(&self, input: &PredictionInput) -> Result<String> {
		let mut rng = match input.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_rng(&mut rand::rng()),
		};
		self.predict_with_rng(input, &mut rng)
	}

	/// Generates a phrase while avoiding training phrases.
	///
	/// # Behavior
	/// - Generates a phrase from the chain.
	/// - While it equals a training phrase (token for token) and `nb_try`
	///   is not exhausted, generates again.
	/// - Returns the last attempt if all retries produced known phrases.
	pub fn predict_with_rng<R: Rng>(&self, input: &PredictionInput, rng: &mut R) -> Result<String> {
		let mut generated = sample_tokens(&self.chain, rng, input.max_tokens())?;
		let mut nb_try = input.nb_try;

		while nb_try > 0 && self.is_known(&generated.tokens) {
			debug!("generated a training phrase, {} tries left", nb_try);
			generated = sample_tokens(&self.chain, rng, input.max_tokens())?;
			nb_try -= 1;
		}

		Ok(format_phrase(&generated.tokens))
	}

	fn is_known(&self, tokens: &[String]) -> bool {
		self.phrases.contains(&tokens.join(" "))
	}
}
