use std::collections::BTreeMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::branch::Branch;
use super::tokenizer::{END_TOKEN, pair_key, tokenize};

/// Options controlling how a chain is built.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ChainOptions {
	/// When `true`, only word pairs that opened a training phrase are used
	/// as generation starting points. When `false`, generation starts from
	/// any pair of the chain.
	pub limit_starting_words: bool,
}

impl Default for ChainOptions {
	fn default() -> Self {
		Self { limit_starting_words: true }
	}
}

/// A second-order Markov chain over word and punctuation tokens.
///
/// Each state is a word pair (`"the cat"`); its branch holds the probability
/// of every token observed right after that pair, including [`END_TOKEN`]
/// when the pair closed a phrase.
///
/// # Invariants
/// - Every transition branch has `count >= 1`
/// - `starts` is `Some` only if the chain was built with
///   `limit_starting_words`, and its outcomes are transition keys
/// - The chain is never mutated once built
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Chain {
	/// Word-pair key → branch of next tokens. Ordered by key so that a
	/// uniform pick over keys is reproducible for a seeded generator.
	transitions: BTreeMap<String, Branch>,
	/// Word-pair keys eligible to open a generated phrase.
	starts: Option<Branch>,
}

impl Chain {
	/// Creates an empty chain.
	pub fn new(options: &ChainOptions) -> Self {
		Self {
			transitions: BTreeMap::new(),
			starts: options.limit_starting_words.then(Branch::new),
		}
	}

	/// Returns the branch of the given word pair, if it was ever observed.
	pub fn branch(&self, key: &str) -> Option<&Branch> {
		self.transitions.get(key)
	}

	/// All transitions, ordered by key.
	pub fn transitions(&self) -> &BTreeMap<String, Branch> {
		&self.transitions
	}

	/// The starts branch, present when starting words are limited.
	pub fn starts(&self) -> Option<&Branch> {
		self.starts.as_ref()
	}

	/// Number of distinct word pairs.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Adds a phrase to the chain.
	///
	/// Returns `false` if the phrase holds no token and was skipped.
	///
	/// # Notes
	/// - A starting pair is recorded in `starts` only the first time it opens
	///   a phrase. Later phrases opening with the same pair do not raise its
	///   weight, whereas transition branches count every occurrence.
	/// - A phrase with a single token produces no pair.
	pub fn add_phrase(&mut self, phrase: &str) -> bool {
		let tokens = tokenize(phrase);
		if tokens.is_empty() {
			trace!("skipping phrase without tokens: {phrase:?}");
			return false;
		}

		for (i, window) in tokens.windows(2).enumerate() {
			let pair = pair_key(&window[0], &window[1]);

			if i == 0 {
				if let Some(starts) = self.starts.as_mut() {
					if !starts.contains(&pair) {
						starts.record(&pair);
					}
				}
			}

			let continuation = tokens.get(i + 2).map_or(END_TOKEN, String::as_str);
			self.transitions.entry(pair).or_default().record(continuation);
		}

		true
	}
}

/// Builds a chain from a batch of phrases.
///
/// Phrases are lowercased and tokenized; those without any word or
/// punctuation token are skipped.
pub fn generate_chain<I, S>(phrases: I, options: &ChainOptions) -> Chain
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut chain = Chain::new(options);
	let mut seen = 0usize;
	let mut skipped = 0usize;

	for phrase in phrases {
		seen += 1;
		if !chain.add_phrase(phrase.as_ref()) {
			skipped += 1;
		}
	}

	debug!(
		"chain built from {} phrases ({} skipped): {} word pairs, {} starting pairs",
		seen,
		skipped,
		chain.len(),
		chain.starts().map_or(0, Branch::len)
	);
	chain
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_continuations_evenly() {
		let chain = generate_chain(["the cat sat", "the cat ran"], &ChainOptions::default());
		let branch = chain.branch("the cat").unwrap();
		assert_eq!(branch.count(), 2);
		assert_eq!(branch.probability("sat"), Some(0.5));
		assert_eq!(branch.probability("ran"), Some(0.5));
	}

	#[test]
	fn last_pair_ends_with_sentinel() {
		let chain = generate_chain(["the cat sat"], &ChainOptions::default());
		assert_eq!(chain.len(), 2);
		assert_eq!(chain.branch("cat sat").unwrap().probability(END_TOKEN), Some(1.0));
		assert!(chain.branch(END_TOKEN).is_none());
	}

	#[test]
	fn starts_only_when_limited() {
		let phrases = ["the cat sat", "a dog ran"];

		let limited = generate_chain(phrases, &ChainOptions::default());
		let starts = limited.starts().unwrap();
		assert_eq!(starts.count(), 2);
		assert_eq!(starts.probability("the cat"), Some(0.5));
		assert_eq!(starts.probability("a dog"), Some(0.5));
		assert!(!starts.contains("cat sat"));

		let free = generate_chain(phrases, &ChainOptions { limit_starting_words: false });
		assert!(free.starts().is_none());
		assert_eq!(free.transitions(), limited.transitions());
	}

	#[test]
	fn repeated_starting_pair_counted_once() {
		let chain = generate_chain(
			["the cat sat", "the cat ran", "a dog ran"],
			&ChainOptions::default(),
		);
		let starts = chain.starts().unwrap();
		// "the cat" opens two phrases but weighs the same as "a dog"
		assert_eq!(starts.count(), 2);
		assert_eq!(starts.probability("the cat"), Some(0.5));
		assert_eq!(starts.probability("a dog"), Some(0.5));
		// Transition branches still count every occurrence
		assert_eq!(chain.branch("the cat").unwrap().count(), 2);
	}

	#[test]
	fn skips_phrases_without_tokens() {
		let chain = generate_chain(["", "   ", "1234 %%", "hi"], &ChainOptions::default());
		assert!(chain.is_empty());
		assert_eq!(chain.starts().unwrap().count(), 0);
	}

	#[test]
	fn lowercases_and_keeps_punctuation() {
		let chain = generate_chain(["Hello, World!"], &ChainOptions::default());
		assert_eq!(chain.branch("hello ,").unwrap().probability("world"), Some(1.0));
		assert_eq!(chain.branch(", world").unwrap().probability("!"), Some(1.0));
		assert_eq!(chain.branch("world !").unwrap().probability(END_TOKEN), Some(1.0));
		assert_eq!(chain.starts().unwrap().probability("hello ,"), Some(1.0));
	}

	#[test]
	fn every_branch_sums_to_one() {
		let chain = generate_chain(
			[
				"the cat sat on the mat.",
				"the cat sat on the hat.",
				"on the mat, the dog slept.",
				"the dog sat on the cat!",
			],
			&ChainOptions::default(),
		);
		for branch in chain.transitions().values().chain(chain.starts()) {
			let total: f64 = branch.outcomes().map(|(_, p)| p).sum();
			assert!((total - 1.0).abs() < 1e-9);
		}
		let branch = chain.branch("on the").unwrap();
		assert_eq!(branch.count(), 4);
		assert!((branch.probability("mat").unwrap() - 0.5).abs() < 1e-9);
	}
}
