use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the configuration.
///
/// All of them are fatal and happen before any document is read.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("cannot read configuration file {path}")]
	Missing {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("malformed escape `{0}` in properties file")]
	MalformedEscape(String),

	#[error("missing required configuration key `{0}`")]
	MissingKey(&'static str),

	#[error("configuration key `{key}` is not a valid integer: `{value}`")]
	InvalidInteger { key: &'static str, value: String },

	#[error("support only 1/2/3/4 word/words analysis, got {0}")]
	UnsupportedNGramSize(i64),

	#[error("invalid special-word pattern `{pattern}`")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("invalid special-word scope `{0}`, expected `key` or `word`")]
	InvalidScope(String),

	#[error("malformed TOML configuration")]
	Toml(#[from] toml::de::Error),
}

/// Errors raised while extracting text from a single document.
///
/// These never abort a batch: the document contributes nothing.
#[derive(Debug, Error)]
pub enum DocumentError {
	#[error("cannot read {path}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("cannot extract PDF text from {path}: {reason}")]
	Pdf { path: PathBuf, reason: String },

	#[error("no extractor available for {0}")]
	UnsupportedFormat(PathBuf),
}

/// Errors raised by a renderer.
#[derive(Debug, Error)]
pub enum RenderError {
	#[error("cannot write results")]
	Io(#[from] io::Error),

	#[error("cannot write CSV results")]
	Csv(#[from] csv::Error),
}

/// Errors aborting a whole batch.
#[derive(Debug, Error)]
pub enum AnalyzerError {
	#[error("cannot find the source folder: {0}")]
	SourceFolderNotFound(PathBuf),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("cannot list the source folder")]
	Io(#[from] io::Error),

	#[error(transparent)]
	Render(#[from] RenderError),
}
