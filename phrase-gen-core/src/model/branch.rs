use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, Result};

/// A probability branch of the chain.
///
/// A `Branch` is conditioned on a fixed context (a word pair, or "phrase start"
/// for the starts branch) and stores, for every outcome observed after that
/// context, its current relative frequency.
///
/// Raw occurrence tallies are never kept: each new observation re-normalizes
/// the existing probabilities using only the previous values and the count.
///
/// ## Invariants
/// - `count` is the number of observations folded into the branch
/// - When `count > 0`, the probabilities sum to 1.0 (within float tolerance)
/// - `distribution` keeps outcomes in insertion order, which makes sampling
///   reproducible for a fixed random stream
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Branch {
	/// Number of observations recorded so far.
	count: u64,
	/// Outcomes and their probability, in first-seen order.
	/// Example: [("sat", 0.5), ("ran", 0.5)]
	distribution: Vec<(String, f64)>,
}

impl Branch {
	/// Creates a new empty branch.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of observations folded into this branch.
	pub fn count(&self) -> u64 {
		self.count
	}

	/// Number of distinct outcomes.
	pub fn len(&self) -> usize {
		self.distribution.len()
	}

	pub fn is_empty(&self) -> bool {
		self.distribution.is_empty()
	}

	/// Returns `true` if `outcome` has been observed at least once.
	pub fn contains(&self, outcome: &str) -> bool {
		self.distribution.iter().any(|(o, _)| o == outcome)
	}

	/// Current probability of `outcome`, `None` if it was never observed.
	pub fn probability(&self, outcome: &str) -> Option<f64> {
		self.distribution.iter().find(|(o, _)| o == outcome).map(|(_, p)| *p)
	}

	/// Iterates over `(outcome, probability)` in insertion order.
	pub fn outcomes(&self) -> impl Iterator<Item = (&str, f64)> {
		self.distribution.iter().map(|(o, p)| (o.as_str(), *p))
	}

	/// Records one observation of `outcome`.
	///
	/// Increments the count, then re-normalizes as [`Branch::update`] does.
	pub fn record(&mut self, outcome: &str) {
		self.count += 1;
		self.renormalize(outcome);
	}

	/// Folds a new observation of `new_outcome` into the distribution.
	///
	/// The caller must have incremented the count for this observation
	/// beforehand. With `old_total = count - 1`, every probability becomes:
	/// - `(p * old_total + 1) / count` for `new_outcome`
	/// - `(p * old_total) / count` for every other outcome
	///
	/// This yields exactly `occurrences(outcome) / count` for each outcome.
	/// An unseen outcome is first inserted with probability 0.
	///
	/// # Errors
	/// Returns `InvalidInput` if the count is still 0.
	pub fn update(&mut self, new_outcome: &str) -> Result<()> {
		if self.count == 0 {
			return Err(ChainError::InvalidInput(
				"branch count must be incremented before update".to_owned(),
			));
		}

		self.renormalize(new_outcome);
		Ok(())
	}

	/// Applies the update formula. Requires `count >= 1`.
	fn renormalize(&mut self, new_outcome: &str) {
		let old_total = (self.count - 1) as f64;
		let total = self.count as f64;

		if !self.contains(new_outcome) {
			self.distribution.push((new_outcome.to_owned(), 0.0));
		}

		for (outcome, probability) in &mut self.distribution {
			let amount = *probability * old_total;
			*probability = if outcome.as_str() == new_outcome {
				(amount + 1.0) / total
			} else {
				amount / total
			};
		}
	}

	/// Samples an outcome using the branch probabilities.
	///
	/// Returns `None` if the branch has no outcomes.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		self.pick(rng.random::<f64>())
	}

	/// Selects the outcome whose cumulative interval contains `r`.
	///
	/// Walks the outcomes in insertion order and returns the first one with
	/// `cumulative <= r < cumulative + p`. Rounding can leave the total
	/// slightly under 1.0; in that case the last outcome is returned.
	pub fn pick(&self, r: f64) -> Option<&str> {
		let mut cumulative = 0.0;
		for (outcome, probability) in &self.distribution {
			if r >= cumulative && r < cumulative + probability {
				return Some(outcome.as_str());
			}
			cumulative += probability;
		}

		self.distribution.last().map(|(outcome, _)| outcome.as_str())
	}
}
