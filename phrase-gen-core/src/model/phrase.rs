use std::sync::LazyLock;

use log::warn;
use rand::Rng;
use regex::Regex;

use crate::error::{ChainError, Result};
use super::chain::Chain;
use super::tokenizer::{END_TOKEN, pair_key, split_pair};

/// Default upper bound on the number of tokens of a generated phrase.
pub const DEFAULT_MAX_TOKENS: usize = 100;

static COMMA_SPACING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +, +").unwrap());
static PERIOD_SPACING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +\. *").unwrap());

/// Why a walk through the chain stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
	/// The last word pair was never seen during training.
	NoContinuation,
	/// The end sentinel was sampled.
	ExplicitEnd,
	/// The walk would have grown past the token cap.
	Truncated,
}

/// Raw result of a walk through the chain, before formatting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedTokens {
	/// Sampled tokens, without the closing period.
	pub tokens: Vec<String>,
	pub termination: Termination,
}

/// Walks the chain from a sampled start until a terminal state.
///
/// # Behavior
/// - The start pair comes from the starts branch when the chain has one,
///   otherwise from a uniform pick over all word pairs.
/// - Each step looks up the branch of the last two tokens and samples it.
/// - Stops on an unknown pair, on the end sentinel, or when a sampled token
///   would grow the phrase past `max_tokens` (never fewer than the two
///   start tokens).
///
/// # Errors
/// Returns `EmptyChain` if the chain has no transitions.
pub fn sample_tokens<R: Rng>(chain: &Chain, rng: &mut R, max_tokens: usize) -> Result<GeneratedTokens> {
	if chain.is_empty() {
		return Err(ChainError::EmptyChain);
	}

	let start = match chain.starts() {
		Some(starts) => starts.sample(rng),
		None => {
			let index = rng.random_range(0..chain.len());
			chain.transitions().keys().nth(index).map(String::as_str)
		}
	};
	let (first, second) = start.and_then(split_pair).ok_or(ChainError::EmptyChain)?;

	let mut tokens = vec![first.to_owned(), second.to_owned()];
	let termination = loop {
		let key = pair_key(&tokens[tokens.len() - 2], &tokens[tokens.len() - 1]);
		let Some(branch) = chain.branch(&key) else {
			break Termination::NoContinuation;
		};

		match branch.sample(rng) {
			Some(END_TOKEN) | None => break Termination::ExplicitEnd,
			Some(_) if tokens.len() >= max_tokens => break Termination::Truncated,
			Some(next) => tokens.push(next.to_owned()),
		}
	};

	if termination == Termination::Truncated {
		warn!("phrase generation truncated after {} tokens", tokens.len());
	}

	Ok(GeneratedTokens { tokens, termination })
}

/// Turns sampled tokens into a readable phrase.
///
/// Appends a closing period, joins tokens with spaces, tightens the spacing
/// around commas and periods, then capitalizes the first character.
///
/// Example: `["the", "cat", ",", "sat"]` → `"The cat, sat."`
pub fn format_phrase<S: AsRef<str>>(tokens: &[S]) -> String {
	let mut joined = tokens
		.iter()
		.map(|token| token.as_ref())
		.chain(std::iter::once("."))
		.collect::<Vec<&str>>()
		.join(" ");

	joined = COMMA_SPACING.replace_all(&joined, ", ").into_owned();
	joined = PERIOD_SPACING.replace_all(&joined, ". ").into_owned();
	let phrase = joined.trim_end();

	let mut chars = phrase.chars();
	match chars.next() {
		Some(c) => c.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Generates a phrase using the given random source.
///
/// A fixed seeded `rng` over a fixed chain always yields the same phrase.
///
/// # Errors
/// Returns `EmptyChain` if the chain has no transitions.
pub fn generate_phrase_with_rng<R: Rng>(chain: &Chain, rng: &mut R, max_tokens: usize) -> Result<String> {
	let generated = sample_tokens(chain, rng, max_tokens)?;
	Ok(format_phrase(&generated.tokens))
}

/// Generates a phrase with the thread-local random source.
///
/// # Errors
/// Returns `EmptyChain` if the chain has no transitions.
pub fn generate_phrase_from_chain(chain: &Chain) -> Result<String> {
	generate_phrase_with_rng(chain, &mut rand::rng(), DEFAULT_MAX_TOKENS)
}
