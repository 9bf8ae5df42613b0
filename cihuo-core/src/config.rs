use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::io::{extension_of, normalize_folder};
use crate::model::{FilterPipeline, NGramSize, SpecialWordScope};

/// Configuration file used when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "config.properties";

const SOURCE_FOLDER: &str = "SOURCEFOLDER";
const SPECIAL_WORDS: &str = "SPECIALWORDS";
const SPECIAL_WORDS_SCOPE: &str = "SPECIALWORDS_SCOPE";
const OUTPUT_FOLDER: &str = "OUTPUTFOLDER";
const MIN_COUNT: &str = "MINCOUNT";
const COUNT_OF_WORDS: &str = "COUNT_OF_WORDS";

/// Validated settings of one analysis batch.
///
/// # Invariants
/// - `size` is one of the supported n-gram sizes
/// - `filter` holds a compiled special-word pattern
#[derive(Debug, Clone)]
pub struct Config {
	/// Folder whose files are analyzed.
	pub source_folder: PathBuf,

	/// Folder receiving `resultOf<N>word.csv`. `None` prints to the console.
	pub output_folder: Option<PathBuf>,

	/// Number of words per counted n-gram.
	pub size: NGramSize,

	/// Result predicates (minimum count, special words).
	pub filter: FilterPipeline,
}

impl Config {
	/// Loads and validates a configuration file.
	///
	/// Files ending in `.toml` are read as TOML; anything else as a
	/// `key=value` properties file. Both use the same upper-case keys.
	///
	/// # Errors
	/// Returns a `ConfigError` if the file is unreadable, a key is missing,
	/// or a value is malformed.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = fs::read_to_string(path).map_err(|source| ConfigError::Missing { path: path.to_path_buf(), source })?;

		match extension_of(path).as_deref() {
			Some("toml") => Self::from_toml(&text),
			_ => Self::from_properties(&text),
		}
	}

	/// Parses a properties document.
	///
	/// - `key=value`, `key: value` or `key value`, one entry per logical line
	/// - Lines starting with `#` or `!` are comments
	/// - Backslash escapes and line continuations as in Java properties files
	/// - The last duplicate wins
	pub fn from_properties(text: &str) -> Result<Self, ConfigError> {
		let mut properties = parse_properties(text)?;
		let raw = RawConfig {
			source_folder: properties.remove(SOURCE_FOLDER),
			special_words: properties.remove(SPECIAL_WORDS),
			special_words_scope: properties.remove(SPECIAL_WORDS_SCOPE),
			output_folder: properties.remove(OUTPUT_FOLDER),
			min_count: properties.remove(MIN_COUNT).map(RawInteger::Text),
			count_of_words: properties.remove(COUNT_OF_WORDS).map(RawInteger::Text),
		};
		raw.validate()
	}

	/// Parses a TOML document with top-level upper-case keys.
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		let raw: RawConfig = toml::from_str(text)?;
		raw.validate()
	}
}

/// Integer settings as written: a TOML integer or text to parse.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInteger {
	Number(i64),
	Text(String),
}

/// Unvalidated settings, straight from the file.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
	#[serde(rename = "SOURCEFOLDER")]
	source_folder: Option<String>,
	#[serde(rename = "SPECIALWORDS")]
	special_words: Option<String>,
	#[serde(rename = "SPECIALWORDS_SCOPE")]
	special_words_scope: Option<String>,
	#[serde(rename = "OUTPUTFOLDER")]
	output_folder: Option<String>,
	#[serde(rename = "MINCOUNT")]
	min_count: Option<RawInteger>,
	#[serde(rename = "COUNT_OF_WORDS")]
	count_of_words: Option<RawInteger>,
}

impl RawConfig {
	fn validate(self) -> Result<Config, ConfigError> {
		let source_folder = self.source_folder.ok_or(ConfigError::MissingKey(SOURCE_FOLDER))?;
		let special_words = self.special_words.ok_or(ConfigError::MissingKey(SPECIAL_WORDS))?;
		let min_count = integer(MIN_COUNT, self.min_count)?;
		let min_count = u64::try_from(min_count).map_err(|_| ConfigError::InvalidInteger {
			key: MIN_COUNT,
			value: min_count.to_string(),
		})?;
		let size = NGramSize::try_from(integer(COUNT_OF_WORDS, self.count_of_words)?)?;

		let scope = match self.special_words_scope.as_deref() {
			None | Some("") => SpecialWordScope::default(),
			Some(scope) => scope.parse()?,
		};

		let output_folder = self
			.output_folder
			.filter(|folder| !folder.trim().is_empty())
			.map(normalize_folder);

		Ok(Config {
			source_folder: normalize_folder(source_folder),
			output_folder,
			size,
			filter: FilterPipeline::new(min_count, &special_words, scope)?,
		})
	}
}

fn integer(key: &'static str, value: Option<RawInteger>) -> Result<i64, ConfigError> {
	match value.ok_or(ConfigError::MissingKey(key))? {
		RawInteger::Number(n) => Ok(n),
		RawInteger::Text(text) => text.trim().parse().map_err(|_| ConfigError::InvalidInteger { key, value: text }),
	}
}

/// Whitespace recognized by the properties format.
fn is_blank(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\x0C')
}

/// Reads a properties document following the `java.util.Properties` load rules.
///
/// - A line ending in an odd number of backslashes continues on the next line,
///   whose leading whitespace is dropped
/// - The key ends at the first unescaped `=`, `:` or whitespace; whitespace
///   around the separator is skipped
/// - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded, any other
///   escaped character stands for itself
/// - Trailing whitespace of a value is kept
fn parse_properties(text: &str) -> Result<HashMap<String, String>, ConfigError> {
	let mut properties = HashMap::new();
	let mut logical = String::new();
	let mut continued = false;

	let text = text.replace("\r\n", "\n");
	for natural in text.split(['\n', '\r']) {
		let line = natural.trim_start_matches(is_blank);
		if !continued && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
			continue;
		}

		let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
		if trailing % 2 == 1 {
			logical.push_str(&line[..line.len() - 1]);
			continued = true;
			continue;
		}
		logical.push_str(line);
		continued = false;

		let (key, value) = split_entry(&logical);
		properties.insert(unescape(key)?, unescape(value)?);
		logical.clear();
	}

	if continued {
		let (key, value) = split_entry(&logical);
		properties.insert(unescape(key)?, unescape(value)?);
	}
	Ok(properties)
}

/// Splits a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
	let mut escaped = false;
	let mut split = None;
	for (at, c) in line.char_indices() {
		if escaped {
			escaped = false;
			continue;
		}
		match c {
			'\\' => escaped = true,
			'=' | ':' => {
				split = Some((at, true));
				break;
			}
			c if is_blank(c) => {
				split = Some((at, false));
				break;
			}
			_ => {}
		}
	}

	let Some((at, explicit)) = split else {
		return (line, "");
	};
	let key = &line[..at];
	let mut value = line[at + 1..].trim_start_matches(is_blank);
	if !explicit {
		if let Some(rest) = value.strip_prefix(['=', ':']) {
			value = rest.trim_start_matches(is_blank);
		}
	}
	(key, value)
}

/// Decodes backslash escapes; `\uXXXX` units are combined as UTF-16.
fn unescape(raw: &str) -> Result<String, ConfigError> {
	let mut units: Vec<u16> = Vec::with_capacity(raw.len());
	let mut chars = raw.chars();
	let mut buffer = [0u16; 2];

	while let Some(c) = chars.next() {
		let decoded = if c == '\\' {
			match chars.next() {
				Some('t') => '\t',
				Some('n') => '\n',
				Some('r') => '\r',
				Some('f') => '\x0C',
				Some('u') => {
					let hex: String = chars.by_ref().take(4).collect();
					let unit = (hex.len() == 4)
						.then(|| u16::from_str_radix(&hex, 16).ok())
						.flatten()
						.ok_or_else(|| ConfigError::MalformedEscape(format!("\\u{hex}")))?;
					units.push(unit);
					continue;
				}
				Some(other) => other,
				None => break,
			}
		} else {
			c
		};
		units.extend_from_slice(decoded.encode_utf16(&mut buffer));
	}

	Ok(String::from_utf16_lossy(&units))
}
