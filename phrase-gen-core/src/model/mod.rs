//! Top-level module for the word-pair Markov chain.
//!
//! This module provides:
//! - Probability branches with incremental updates (`Branch`)
//! - Word and punctuation tokenization (`tokenizer`)
//! - Chain construction from phrases (`Chain`, `generate_chain`)
//! - Phrase generation from a chain (`generate_phrase_from_chain`)
//! - A high-level generation interface over corpus files (`Generator`)

/// Probability branch: observation count and ordered outcome distribution.
///
/// Supports exact incremental re-normalization and weighted random sampling.
pub mod branch;

/// Lowercase word / punctuation tokenizer and word-pair keys.
pub mod tokenizer;

/// Second-order chain keyed by word pairs, and its builder.
pub mod chain;

/// Walk through a chain and phrase formatting.
pub mod phrase;

/// Generation parameters used by `Generator`.
pub mod prediction_input;

/// High-level interface loading corpora and generating phrases
/// that avoid reproducing training phrases.
pub mod generator;
