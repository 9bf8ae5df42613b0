use std::fmt;

use crate::error::ConfigError;

/// Number of consecutive words forming one counted unit.
///
/// Only unigrams through 4-grams are supported; any other size is rejected
/// when the configuration is loaded, before a document is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NGramSize {
	One,
	Two,
	Three,
	Four,
}

impl NGramSize {
	/// All supported sizes, smallest first.
	pub const ALL: [NGramSize; 4] = [NGramSize::One, NGramSize::Two, NGramSize::Three, NGramSize::Four];

	/// Width of the sliding window, in tokens.
	pub fn window(self) -> usize {
		match self {
			NGramSize::One => 1,
			NGramSize::Two => 2,
			NGramSize::Three => 3,
			NGramSize::Four => 4,
		}
	}

	/// Whether a leading hyphen is stripped along with a leading letter.
	///
	/// Only the unigram variant treats `-` as a stray extraction artifact.
	pub(crate) fn strips_leading_hyphen(self) -> bool {
		self == NGramSize::One
	}
}

impl TryFrom<i64> for NGramSize {
	type Error = ConfigError;

	fn try_from(n: i64) -> Result<Self, Self::Error> {
		match n {
			1 => Ok(NGramSize::One),
			2 => Ok(NGramSize::Two),
			3 => Ok(NGramSize::Three),
			4 => Ok(NGramSize::Four),
			other => Err(ConfigError::UnsupportedNGramSize(other)),
		}
	}
}

impl fmt::Display for NGramSize {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.window())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn windows_match_sizes() {
		let windows: Vec<usize> = NGramSize::ALL.iter().map(|s| s.window()).collect();
		assert_eq!(windows, vec![1, 2, 3, 4]);
	}

	#[test]
	fn out_of_range_sizes_are_rejected() {
		for n in [0, 5, -1, 42] {
			assert!(matches!(NGramSize::try_from(n), Err(ConfigError::UnsupportedNGramSize(v)) if v == n));
		}
		assert_eq!(NGramSize::try_from(3).unwrap(), NGramSize::Three);
	}
}
