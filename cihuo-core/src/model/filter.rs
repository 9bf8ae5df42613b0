use std::str::FromStr;
use std::sync::mpsc;
use std::thread;

use regex::Regex;

use super::frequency_map::{FrequencyMap, NGramCount};
use crate::error::ConfigError;

/// Shortest word length kept by the alphabetic predicate.
pub const MIN_WORD_LEN: usize = 3;

/// What the special-word pattern is matched against.
///
/// # Variants
/// - `Key`: the whole joined n-gram must match `^(pattern)$` to be excluded.
///   A multi-word key containing a special word is therefore kept.
/// - `Word`: the key is excluded as soon as one of its words matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialWordScope {
	#[default]
	Key,
	Word,
}

impl FromStr for SpecialWordScope {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"key" => Ok(SpecialWordScope::Key),
			"word" => Ok(SpecialWordScope::Word),
			_ => Err(ConfigError::InvalidScope(s.to_owned())),
		}
	}
}

/// Predicates deciding which counted n-grams reach the output.
///
/// An entry survives when:
/// - every word is at least `MIN_WORD_LEN` ASCII lowercase letters
/// - it does not match the special-word pattern (see `SpecialWordScope`)
/// - its count is at least `min_count`
///
/// Survivors are sorted by count ascending. The sort is stable, so equal
/// counts keep the first-encountered order of the `FrequencyMap`.
#[derive(Debug, Clone)]
pub struct FilterPipeline {
	min_count: u64,
	special_words: Regex,
	scope: SpecialWordScope,
}

impl FilterPipeline {
	/// Builds a pipeline from a special-word alternation such as `"the|and|of"`.
	///
	/// # Errors
	/// Returns `ConfigError::InvalidPattern` if the anchored pattern does not compile.
	pub fn new(min_count: u64, special_words: &str, scope: SpecialWordScope) -> Result<Self, ConfigError> {
		let anchored = format!("^({special_words})$");
		let special_words = Regex::new(&anchored).map_err(|source| ConfigError::InvalidPattern {
			pattern: special_words.to_owned(),
			source,
		})?;
		Ok(Self { min_count, special_words, scope })
	}

	pub fn min_count(&self) -> u64 {
		self.min_count
	}

	pub fn scope(&self) -> SpecialWordScope {
		self.scope
	}

	/// True when every space-separated word is `[a-z]+` and longer than two letters.
	pub fn is_all_alpha(key: &str) -> bool {
		key.split(' ')
			.all(|word| word.len() >= MIN_WORD_LEN && word.bytes().all(|b| b.is_ascii_lowercase()))
	}

	/// True when the key is excluded by the special-word pattern.
	pub fn has_special_word(&self, key: &str) -> bool {
		match self.scope {
			SpecialWordScope::Key => self.special_words.is_match(key),
			SpecialWordScope::Word => key.split(' ').any(|word| self.special_words.is_match(word)),
		}
	}

	/// Applies the three predicates to a single entry.
	pub fn accepts(&self, key: &str, count: u64) -> bool {
		Self::is_all_alpha(key) && !self.has_special_word(key) && count >= self.min_count
	}

	/// Filters and sorts the whole map on the current thread.
	pub fn apply(&self, map: &FrequencyMap) -> Vec<NGramCount> {
		let mut result: Vec<NGramCount> = map
			.iter()
			.filter(|entry| self.accepts(&entry.key, entry.count))
			.cloned()
			.collect();
		sort_ascending(&mut result);
		result
	}

	/// Filters the map on worker threads, then sorts.
	///
	/// Produces exactly the same result as `apply`.
	///
	/// # Behavior
	/// - Splits the entries into chunks (based on CPU cores * factor).
	/// - Spawns a thread filtering each chunk.
	/// - Restores chunk order before the stable sort.
	pub fn apply_parallel(&self, map: &FrequencyMap) -> Vec<NGramCount> {
		let entries = map.as_slice();
		if entries.is_empty() {
			return Vec::new();
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = entries.len().div_ceil(chunks).max(1);

		let (tx, rx) = mpsc::channel();
		let mut spawned = 0;
		for (position, chunk) in entries.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let chunk: Vec<NGramCount> = chunk.to_vec();
			let pipeline = self.clone();

			thread::spawn(move || {
				let kept: Vec<NGramCount> = chunk
					.into_iter()
					.filter(|entry| pipeline.accepts(&entry.key, entry.count))
					.collect();
				// The receiver outlives every worker
				let _ = tx.send((position, kept));
			});
			spawned += 1;
		}
		drop(tx);

		let mut partials: Vec<(usize, Vec<NGramCount>)> = rx.iter().collect();
		if partials.len() != spawned {
			tracing::warn!(received = partials.len(), spawned, "filter worker lost, filtering sequentially");
			return self.apply(map);
		}
		partials.sort_by_key(|(position, _)| *position);

		let mut result: Vec<NGramCount> = partials.into_iter().flat_map(|(_, kept)| kept).collect();
		sort_ascending(&mut result);
		result
	}
}

/// Stable ascending sort on counts.
pub fn sort_ascending(rows: &mut [NGramCount]) {
	rows.sort_by_key(|row| row.count);
}
