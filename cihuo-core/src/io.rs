use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Builds the CSV result path for an n-gram size inside an output folder.
///
/// Example:
/// `out` + `2` → `out/resultOf2word.csv`
pub(crate) fn build_result_path<P: AsRef<Path>>(output_folder: P, window: usize) -> PathBuf {
	output_folder.as_ref().join(format!("resultOf{window}word.csv"))
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all regular files in a directory, sorted by file name.
///
/// Returns full paths. Subdirectories and other entries are skipped.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() {
			files.push(path);
		} else {
			tracing::debug!(path = %path.display(), "skipping non-file entry");
		}
	}

	files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
	Ok(files)
}

/// Returns the lowercase extension of a path, if any.
pub(crate) fn extension_of<P: AsRef<Path>>(path: P) -> Option<String> {
	path.as_ref()
		.extension()
		.map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
