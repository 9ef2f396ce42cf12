use std::sync::LazyLock;

use regex::Regex;

/// Outcome marking that a word pair closed a training phrase.
pub const END_TOKEN: &str = "[end]";

/// Latin-script words (with interior apostrophes / hyphens) or one of `,.!?`.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	// Literal pattern, cannot fail to compile
	Regex::new(r"\p{Latin}+['-]*\p{Latin}*|[,.!?]").unwrap()
});

/// Splits a phrase into lowercase word and punctuation tokens.
///
/// Numbers, symbols and whitespace are dropped.
///
/// Example: `"Hello, world!"` → `["hello", ",", "world", "!"]`
pub fn tokenize(phrase: &str) -> Vec<String> {
	let lower = phrase.to_lowercase();
	TOKEN_PATTERN
		.find_iter(&lower)
		.map(|m| m.as_str().to_owned())
		.collect()
}

/// Builds the key of a word pair: both tokens separated by a single space.
pub fn pair_key(first: &str, second: &str) -> String {
	let mut key = String::with_capacity(first.len() + second.len() + 1);
	key.push_str(first);
	key.push(' ');
	key.push_str(second);
	key
}

/// Splits a word-pair key back into its two tokens.
///
/// Tokens never contain spaces, so the first space is the separator.
pub fn split_pair(key: &str) -> Option<(&str, &str)> {
	key.split_once(' ')
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn words_and_punctuation() {
		assert_eq!(tokenize("Hello, world!"), vec!["hello", ",", "world", "!"]);
	}

	#[test]
	fn apostrophes_and_hyphens_stay_inside_words() {
		assert_eq!(
			tokenize("It's a well-known fact?"),
			vec!["it's", "a", "well-known", "fact", "?"]
		);
	}

	#[test]
	fn accented_latin_letters() {
		assert_eq!(tokenize("Ça a l'air GÉNIAL."), vec!["ça", "a", "l'air", "génial", "."]);
		assert_eq!(tokenize("Straße"), vec!["straße"]);
	}

	#[test]
	fn drops_numbers_symbols_and_whitespace() {
		assert_eq!(tokenize("  42 cats & 3 dogs;  "), vec!["cats", "dogs"]);
		assert!(tokenize("   ").is_empty());
		assert!(tokenize("123 #$% 456").is_empty());
		assert!(tokenize("").is_empty());
	}

	#[test]
	fn each_punctuation_mark_is_its_own_token() {
		assert_eq!(tokenize("wait...!"), vec!["wait", ".", ".", ".", "!"]);
	}

	#[test]
	fn pair_keys() {
		let key = pair_key("the", "cat");
		assert_eq!(key, "the cat");
		assert_eq!(split_pair(&key), Some(("the", "cat")));
		assert_eq!(split_pair("single"), None);
	}
}
