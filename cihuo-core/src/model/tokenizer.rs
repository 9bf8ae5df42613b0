use std::sync::LazyLock;

use regex::Regex;

use super::ngram_size::NGramSize;

/// Runs of two or more ASCII whitespace characters.
///
/// A single non-space whitespace character is left inside its token.
static WHITESPACE_RUN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[ \t\n\x0B\x0C\r]{2,}").expect("static pattern is valid"));

/// Splits normalized document text into lowercase tokens.
///
/// Steps, in order:
/// - Drop the first character if it is an ASCII letter (or a hyphen for unigrams)
/// - Lowercase the remaining text
/// - Collapse whitespace runs into a single space
/// - Trim and split on single spaces
///
/// # Notes
/// - Empty or blank text yields an empty sequence, never an empty token.
/// - The first-character rule is a single check, not a general strip.
pub fn tokenize(text: &str, size: NGramSize) -> Vec<String> {
	let text = strip_leading_marker(text, size);
	let lowered = text.to_lowercase();
	let collapsed = WHITESPACE_RUN.replace_all(&lowered, " ");
	let trimmed = collapsed.trim_matches(|c: char| c <= ' ');

	if trimmed.is_empty() {
		return Vec::new();
	}
	trimmed.split(' ').map(str::to_owned).collect()
}

fn strip_leading_marker(text: &str, size: NGramSize) -> &str {
	match text.chars().next() {
		Some(c) if c.is_ascii_alphabetic() || (c == '-' && size.strips_leading_hyphen()) => &text[1..],
		_ => text,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn leading_letter_is_dropped() {
		assert_eq!(tokenize("XThe Quick  brown", NGramSize::Two), vec!["the", "quick", "brown"]);
	}

	#[test]
	fn only_one_leading_character_is_dropped() {
		// "Hello" loses its "H"
		assert_eq!(tokenize("Hello world", NGramSize::Two), vec!["ello", "world"]);
	}

	#[test]
	fn leading_hyphen_is_dropped_for_unigrams_only() {
		assert_eq!(tokenize("- fox", NGramSize::One), vec!["fox"]);
		assert_eq!(tokenize("-fox den", NGramSize::Two), vec!["-fox", "den"]);
	}

	#[test]
	fn leading_space_or_digit_is_kept() {
		assert_eq!(tokenize(" the fox", NGramSize::Three), vec!["the", "fox"]);
		assert_eq!(tokenize("1 fox", NGramSize::One), vec!["1", "fox"]);
	}

	#[test]
	fn whitespace_runs_are_collapsed() {
		assert_eq!(tokenize(" a\t\t b \n\n c  ", NGramSize::One), vec!["a", "b", "c"]);
	}

	#[test]
	fn single_newline_stays_inside_token() {
		assert_eq!(tokenize(" end\nnext word", NGramSize::One), vec!["end\nnext", "word"]);
	}

	#[test]
	fn blank_text_yields_no_tokens() {
		assert!(tokenize("", NGramSize::One).is_empty());
		assert!(tokenize("   \n\n  ", NGramSize::Two).is_empty());
		assert!(tokenize("A", NGramSize::Four).is_empty());
	}

	#[test]
	fn non_ascii_first_character_is_kept() {
		assert_eq!(tokenize("Élan vital", NGramSize::Two), vec!["élan", "vital"]);
	}
}
