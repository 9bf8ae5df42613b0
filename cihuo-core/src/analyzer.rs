use tracing::{debug, error, info};

use crate::config::Config;
use crate::document::{AutoSource, DocumentSource};
use crate::error::AnalyzerError;
use crate::io;
use crate::model::{FrequencyMap, NGramCount};
use crate::render::{ConsoleRenderer, CsvRenderer, Renderer};

/// Number of distinct n-grams from which filtering runs on worker threads.
pub const PARALLEL_THRESHOLD: usize = 50_000;

/// Summary of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
	/// Files whose text was extracted and counted.
	pub documents: usize,

	/// Files skipped because extraction failed.
	pub skipped: usize,

	/// Distinct n-grams counted across the corpus.
	pub distinct: usize,

	/// Rows handed to the renderer.
	pub rendered: usize,
}

/// Runs the whole pipeline over the source folder of a `Config`.
///
/// # Responsibilities
/// - Enumerate the documents of the source folder
/// - Count every document's n-grams into one corpus-wide `FrequencyMap`
/// - Filter and sort the counts, then hand them to a `Renderer`
///
/// Documents are processed one at a time. A document that cannot be read
/// is logged and contributes nothing; the batch continues.
#[derive(Debug)]
pub struct Analyzer<S: DocumentSource = AutoSource> {
	config: Config,
	source: S,
}

impl Analyzer<AutoSource> {
	/// Creates an analyzer choosing the extractor from each file extension.
	pub fn new(config: Config) -> Self {
		Self { config, source: AutoSource }
	}
}

impl<S: DocumentSource> Analyzer<S> {
	/// Creates an analyzer with a custom document source.
	pub fn with_source(config: Config, source: S) -> Self {
		Self { config, source }
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Builds the renderer selected by the configuration.
	///
	/// - `OUTPUTFOLDER` set → CSV file in that folder (created if needed)
	/// - otherwise → console
	pub fn renderer(&self) -> Result<Box<dyn Renderer>, AnalyzerError> {
		match &self.config.output_folder {
			Some(folder) => Ok(Box::new(CsvRenderer::to_folder(folder, self.config.size)?)),
			None => Ok(Box::new(ConsoleRenderer::stdout())),
		}
	}

	/// Counts the n-grams of every file of the source folder.
	///
	/// Returns the corpus-wide map and a report without rendered rows.
	///
	/// # Errors
	/// - `SourceFolderNotFound` if the folder does not exist or is not a directory
	/// - `Io` if the folder cannot be listed
	pub fn count(&self) -> Result<(FrequencyMap, BatchReport), AnalyzerError> {
		let folder = &self.config.source_folder;
		if !folder.is_dir() {
			return Err(AnalyzerError::SourceFolderNotFound(folder.clone()));
		}

		let files = io::list_files(folder)?;
		info!(folder = %folder.display(), files = files.len(), size = %self.config.size, "counting n-grams");

		let mut corpus = FrequencyMap::new();
		let mut report = BatchReport::default();
		for path in files {
			let text = match self.source.extract(&path) {
				Ok(text) => text,
				Err(err) => {
					error!(path = %path.display(), error = ?err, "cannot extract document, skipping");
					report.skipped += 1;
					continue;
				}
			};

			let mut document = FrequencyMap::new();
			let occurrences = document.ingest(&text, self.config.size);
			debug!(path = %path.display(), occurrences, distinct = document.len(), "document counted");
			corpus.merge(&document);
			report.documents += 1;
		}

		report.distinct = corpus.len();
		Ok((corpus, report))
	}

	/// Filters and sorts a counted map with the configured predicates.
	///
	/// Large maps are filtered on worker threads; the result is identical.
	pub fn filter(&self, corpus: &FrequencyMap) -> Vec<NGramCount> {
		if corpus.len() >= PARALLEL_THRESHOLD {
			self.config.filter.apply_parallel(corpus)
		} else {
			self.config.filter.apply(corpus)
		}
	}

	/// Counts, filters and renders the whole batch with the configured renderer.
	///
	/// The output folder is only created once the source folder was counted.
	pub fn run(&self) -> Result<BatchReport, AnalyzerError> {
		let (corpus, report) = self.count()?;
		let mut renderer = self.renderer()?;
		self.finish(&corpus, report, renderer.as_mut())
	}

	/// Counts, filters and renders the whole batch with a caller-supplied renderer.
	pub fn run_with(&self, renderer: &mut dyn Renderer) -> Result<BatchReport, AnalyzerError> {
		let (corpus, report) = self.count()?;
		self.finish(&corpus, report, renderer)
	}

	fn finish(&self, corpus: &FrequencyMap, mut report: BatchReport, renderer: &mut dyn Renderer) -> Result<BatchReport, AnalyzerError> {
		let rows = self.filter(corpus);
		info!(distinct = corpus.len(), kept = rows.len(), "filtering done");

		renderer.render(&rows)?;

		report.rendered = rows.len();
		Ok(report)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::DocumentError;
	use crate::model::{FilterPipeline, NGramSize, SpecialWordScope};
	use std::fs;
	use std::path::{Path, PathBuf};

	fn config(folder: &Path, size: NGramSize, min_count: u64, special: &str) -> Config {
		Config {
			source_folder: folder.to_path_buf(),
			output_folder: None,
			size,
			filter: FilterPipeline::new(min_count, special, SpecialWordScope::Key).unwrap(),
		}
	}

	/// Returns the rows a renderer received.
	#[derive(Default)]
	struct Capture(Vec<NGramCount>);

	impl Renderer for Capture {
		fn render(&mut self, rows: &[NGramCount]) -> Result<(), crate::error::RenderError> {
			self.0 = rows.to_vec();
			Ok(())
		}
	}

	/// Fails on files whose name starts with "bad".
	struct Flaky;

	impl DocumentSource for Flaky {
		fn extract(&self, path: &Path) -> Result<String, DocumentError> {
			let name = path.file_name().unwrap().to_string_lossy();
			if name.starts_with("bad") {
				return Err(DocumentError::UnsupportedFormat(path.to_path_buf()));
			}
			Ok(fs::read_to_string(path).unwrap())
		}
	}

	/// Distinct four-letter lowercase word for each index below 26^4.
	fn word(mut index: usize) -> String {
		let mut letters = [b'a'; 4];
		for letter in letters.iter_mut().rev() {
			*letter = b'a' + (index % 26) as u8;
			index /= 26;
		}
		String::from_utf8(letters.to_vec()).unwrap()
	}

	#[test]
	fn counts_accumulate_across_documents() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("a.txt"), " quick brown fox\n").unwrap();
		fs::write(dir.path().join("b.txt"), " lazy brown fox. quick brown fox").unwrap();

		let analyzer = Analyzer::new(config(dir.path(), NGramSize::Two, 1, "zzz"));
		let (corpus, report) = analyzer.count().unwrap();

		assert_eq!(report.skipped, 0);
		assert_eq!(report.documents, 2);
		assert_eq!(corpus.get("brown fox"), Some(3));
		assert_eq!(corpus.get("quick brown"), Some(2));
		assert_eq!(corpus.get("lazy brown"), Some(1));
	}

	#[test]
	fn unreadable_documents_are_skipped() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("bad.txt"), " ignored words here").unwrap();
		fs::write(dir.path().join("good.txt"), " kept words here").unwrap();

		let analyzer = Analyzer::with_source(config(dir.path(), NGramSize::One, 1, "zzz"), Flaky);
		let mut capture = Capture::default();
		let report = analyzer.run_with(&mut capture).unwrap();

		assert_eq!(report, BatchReport { documents: 1, skipped: 1, distinct: 3, rendered: 3 });
		let keys: Vec<&str> = capture.0.iter().map(|r| r.key.as_str()).collect();
		assert_eq!(keys, vec!["kept", "words", "here"]);
	}

	#[test]
	fn run_filters_and_sorts() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("doc.txt"), " the cat and the dog and the cat 42 ox").unwrap();

		let analyzer = Analyzer::new(config(dir.path(), NGramSize::One, 2, "the|and"));
		let mut capture = Capture::default();
		analyzer.run_with(&mut capture).unwrap();

		assert_eq!(capture.0, vec![NGramCount::new("cat", 2)]);
	}

	#[test]
	fn missing_source_folder_aborts() {
		let analyzer = Analyzer::new(config(&PathBuf::from("/definitely/not/here"), NGramSize::One, 1, "x"));
		assert!(matches!(analyzer.count(), Err(AnalyzerError::SourceFolderNotFound(_))));
	}

	#[test]
	fn empty_folder_renders_nothing() {
		let dir = tempfile::tempdir().unwrap();
		let analyzer = Analyzer::new(config(dir.path(), NGramSize::Three, 1, "x"));
		let mut capture = Capture::default();

		let report = analyzer.run_with(&mut capture).unwrap();
		assert_eq!(report, BatchReport::default());
		assert!(capture.0.is_empty());
	}

	#[test]
	fn csv_renderer_selected_by_output_folder() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("doc.txt"), " alpha beta gamma").unwrap();
		let out = dir.path().join("out");

		let mut cfg = config(dir.path(), NGramSize::Two, 1, "x");
		cfg.output_folder = Some(out.clone());
		let analyzer = Analyzer::new(cfg);

		analyzer.run().unwrap();

		let written = fs::read_to_string(out.join("resultOf2word.csv")).unwrap();
		assert_eq!(written, "cihuo,frequency\nalpha beta,1\nbeta gamma,1\n");
	}

	#[cfg(feature = "pdf")]
	#[test]
	fn pdf_documents_are_counted() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(
			dir.path().join("paper.pdf"),
			crate::document::single_page_pdf("The brown fox jumps. The brown fox sleeps"),
		)
		.unwrap();

		let analyzer = Analyzer::new(config(dir.path(), NGramSize::Two, 1, "zzz"));
		let (corpus, report) = analyzer.count().unwrap();

		assert_eq!(report.documents, 1);
		assert_eq!(report.skipped, 0);
		assert_eq!(corpus.get("brown fox"), Some(2));
		assert_eq!(corpus.get("fox jumps"), Some(1));
		assert_eq!(corpus.get("fox sleeps"), Some(1));
	}

	#[test]
	fn large_corpus_is_filtered_on_worker_threads() {
		let dir = tempfile::tempdir().unwrap();
		let mut text = String::from(" ");
		for i in 0..60_000 {
			text.push_str(&word(i));
			text.push(' ');
			if i % 3 == 0 {
				text.push_str(&word(i));
				text.push(' ');
			}
		}
		fs::write(dir.path().join("big.txt"), text).unwrap();

		let analyzer = Analyzer::new(config(dir.path(), NGramSize::One, 2, "aaaa|aaad|bbbb"));
		let (corpus, _) = analyzer.count().unwrap();
		assert!(corpus.len() >= PARALLEL_THRESHOLD);

		let filtered = analyzer.filter(&corpus);
		assert_eq!(filtered, analyzer.config().filter.apply(&corpus));
		assert_eq!(filtered.len(), 20_000 - 3);
		assert!(filtered.iter().all(|row| row.count == 2));
		assert_eq!(filtered.first().map(|row| row.key.as_str()), Some("aaag"));
	}
}
