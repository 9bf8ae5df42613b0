use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::io::build_result_path;
use crate::model::{NGramCount, NGramSize};

/// Writes a filtered, sorted result table somewhere.
pub trait Renderer {
	/// Renders every row, in order.
	///
	/// # Errors
	/// Returns a `RenderError` if the destination cannot be written.
	fn render(&mut self, rows: &[NGramCount]) -> Result<(), RenderError>;
}

/// Prints one `<ngram>=<count>` line per row.
#[derive(Debug)]
pub struct ConsoleRenderer<W: Write> {
	out: W,
}

impl ConsoleRenderer<io::Stdout> {
	/// Renderer printing to standard output.
	pub fn stdout() -> Self {
		Self { out: io::stdout() }
	}
}

impl<W: Write> ConsoleRenderer<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
	fn render(&mut self, rows: &[NGramCount]) -> Result<(), RenderError> {
		let mut out = io::BufWriter::new(&mut self.out);
		for row in rows {
			writeln!(out, "{}={}", row.key, row.count)?;
		}
		out.flush()?;
		Ok(())
	}
}

/// Writes a `cihuo,frequency` CSV table.
///
/// The destination is either a file path (created or truncated on render)
/// or any writer supplied by the caller.
#[derive(Debug)]
pub struct CsvRenderer<W: Write = File> {
	target: CsvTarget<W>,
}

#[derive(Debug)]
enum CsvTarget<W: Write> {
	Path(PathBuf),
	Writer(W),
}

impl CsvRenderer<File> {
	/// Targets `<folder>/resultOf<N>word.csv`, creating the folder if needed.
	///
	/// # Errors
	/// Returns an error if the folder cannot be created.
	pub fn to_folder<P: AsRef<Path>>(folder: P, size: NGramSize) -> Result<Self, RenderError> {
		let folder = folder.as_ref();
		if !folder.exists() {
			fs::create_dir_all(folder)?;
		}
		Ok(Self { target: CsvTarget::Path(build_result_path(folder, size.window())) })
	}

	/// Path of the CSV file, when the renderer targets one.
	pub fn path(&self) -> Option<&Path> {
		match &self.target {
			CsvTarget::Path(path) => Some(path),
			CsvTarget::Writer(_) => None,
		}
	}
}

impl<W: Write> CsvRenderer<W> {
	pub fn to_writer(writer: W) -> Self {
		Self { target: CsvTarget::Writer(writer) }
	}

	/// Returns the wrapped writer, if the renderer was built with one.
	pub fn into_writer(self) -> Option<W> {
		match self.target {
			CsvTarget::Writer(writer) => Some(writer),
			CsvTarget::Path(_) => None,
		}
	}

	fn write_rows<T: Write>(writer: T, rows: &[NGramCount]) -> Result<(), RenderError> {
		let mut csv_writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
		if rows.is_empty() {
			// serde only emits the header along with the first record
			csv_writer.write_record(["cihuo", "frequency"])?;
		}
		for row in rows {
			csv_writer.serialize(row)?;
		}
		csv_writer.flush()?;
		Ok(())
	}
}

impl<W: Write> Renderer for CsvRenderer<W> {
	fn render(&mut self, rows: &[NGramCount]) -> Result<(), RenderError> {
		match &mut self.target {
			CsvTarget::Path(path) => {
				tracing::info!(path = %path.display(), rows = rows.len(), "writing CSV results");
				Self::write_rows(File::create(path)?, rows)
			}
			CsvTarget::Writer(writer) => Self::write_rows(writer, rows),
		}
	}
}

/// Parses a `cihuo,frequency` CSV table back into rows, in file order.
///
/// # Errors
/// Returns an error if a row is malformed or the header is missing.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<NGramCount>, RenderError> {
	let mut csv_reader = csv::Reader::from_reader(reader);
	let mut rows = Vec::new();
	for record in csv_reader.deserialize() {
		rows.push(record?);
	}
	Ok(rows)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Vec<NGramCount> {
		vec![NGramCount::new("quick fox", 2), NGramCount::new("lazy dog", 2), NGramCount::new("brown", 7)]
	}

	#[test]
	fn console_lines_are_key_equals_count() {
		let mut renderer = ConsoleRenderer::new(Vec::new());
		renderer.render(&sample()).unwrap();

		let printed = String::from_utf8(renderer.into_inner()).unwrap();
		assert_eq!(printed, "quick fox=2\nlazy dog=2\nbrown=7\n");
	}

	#[test]
	fn csv_has_header_and_rows() {
		let mut renderer = CsvRenderer::to_writer(Vec::new());
		renderer.render(&sample()).unwrap();

		let written = String::from_utf8(renderer.into_writer().unwrap()).unwrap();
		assert_eq!(written, "cihuo,frequency\nquick fox,2\nlazy dog,2\nbrown,7\n");
	}

	#[test]
	fn empty_csv_still_has_header() {
		let mut renderer = CsvRenderer::to_writer(Vec::new());
		renderer.render(&[]).unwrap();

		let written = String::from_utf8(renderer.into_writer().unwrap()).unwrap();
		assert_eq!(written, "cihuo,frequency\n");
	}

	#[test]
	fn csv_reads_back_in_order() {
		let mut renderer = CsvRenderer::to_writer(Vec::new());
		renderer.render(&sample()).unwrap();

		let bytes = renderer.into_writer().unwrap();
		assert_eq!(read_csv(bytes.as_slice()).unwrap(), sample());
	}

	#[test]
	fn folder_renderer_creates_missing_folders() {
		let dir = tempfile::tempdir().unwrap();
		let folder = dir.path().join("nested").join("out");

		let mut renderer = CsvRenderer::to_folder(&folder, NGramSize::Two).unwrap();
		assert!(folder.is_dir());
		assert_eq!(renderer.path(), Some(folder.join("resultOf2word.csv").as_path()));

		renderer.render(&sample()).unwrap();
		let file = File::open(folder.join("resultOf2word.csv")).unwrap();
		assert_eq!(read_csv(file).unwrap(), sample());
	}
}
