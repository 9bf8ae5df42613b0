use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ngram_size::NGramSize;
use super::tokenizer::tokenize;

/// One n-gram and its number of occurrences.
///
/// Serialized as a `cihuo,frequency` CSV row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NGramCount {
	/// Words of the n-gram joined by single spaces.
	#[serde(rename = "cihuo")]
	pub key: String,

	/// Occurrences across the whole corpus.
	#[serde(rename = "frequency")]
	pub count: u64,
}

impl NGramCount {
	pub fn new(key: impl Into<String>, count: u64) -> Self {
		Self { key: key.into(), count }
	}
}

/// Corpus-wide mapping from n-gram to occurrence count.
///
/// Entries keep the order in which their key was first encountered, so
/// a stable sort on counts yields reproducible output across runs.
///
/// # Responsibilities
/// - Accumulate occurrences across every document of a batch
/// - Merge partial maps (ex. one per document) into a single one
///
/// # Invariants
/// - `index[key]` is the position of `key` in `entries`
/// - Every count is strictly positive
#[derive(Clone, Debug, Default)]
pub struct FrequencyMap {
	/// Position of each key in `entries`.
	index: HashMap<String, usize>,

	/// Keys and counts in first-encountered order.
	entries: Vec<NGramCount>,
}

impl FrequencyMap {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `occurrences` more observations of `key`.
	///
	/// - If the key already exists, its count is increased.
	/// - Otherwise, it is appended with a count of `occurrences`.
	pub fn add(&mut self, key: &str, occurrences: u64) {
		if occurrences == 0 {
			return;
		}
		if let Some(&position) = self.index.get(key) {
			self.entries[position].count += occurrences;
		} else {
			self.index.insert(key.to_owned(), self.entries.len());
			self.entries.push(NGramCount::new(key, occurrences));
		}
	}

	/// Tokenizes a document and counts its n-grams into this map.
	///
	/// Returns the number of n-gram occurrences recorded.
	pub fn ingest(&mut self, text: &str, size: NGramSize) -> usize {
		let tokens = tokenize(text, size);
		count_ngrams(&tokens, size, self)
	}

	/// Returns the count of `key`, if it was seen.
	pub fn get(&self, key: &str) -> Option<u64> {
		self.index.get(key).map(|&position| self.entries[position].count)
	}

	/// Number of distinct n-grams.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates over the entries in first-encountered order.
	pub fn iter(&self) -> impl Iterator<Item = &NGramCount> {
		self.entries.iter()
	}

	/// Entries in first-encountered order, as a slice.
	pub fn as_slice(&self) -> &[NGramCount] {
		&self.entries
	}

	/// Consumes the map, returning its entries in first-encountered order.
	pub fn into_entries(self) -> Vec<NGramCount> {
		self.entries
	}

	/// Merges another map into this one.
	///
	/// Counts of shared keys are summed. Keys unknown to `self` are appended
	/// in the order `other` first encountered them.
	pub fn merge(&mut self, other: &Self) {
		for entry in &other.entries {
			self.add(&entry.key, entry.count);
		}
	}
}

/// Counts every n-gram of `tokens` into `into`.
///
/// A window of `size.window()` tokens slides one token per step; each window
/// is joined with single spaces to form its key.
///
/// Returns the number of windows counted (`len - n + 1`, or 0 when the
/// sequence is shorter than the window).
pub fn count_ngrams(tokens: &[String], size: NGramSize, into: &mut FrequencyMap) -> usize {
	let window = size.window();
	if tokens.len() < window {
		// Too short, no n-gram to count
		return 0;
	}

	let mut counted = 0;
	for gram in tokens.windows(window) {
		into.add(&gram.join(" "), 1);
		counted += 1;
	}
	counted
}
