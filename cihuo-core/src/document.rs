use std::fs;
use std::path::Path;

use crate::error::DocumentError;
use crate::io::extension_of;

/// Produces the normalized text of one document.
///
/// Implementations read the file, extract its raw text and pass it through
/// [`normalize`] so that sentences end up on separate lines.
pub trait DocumentSource {
	/// Extracts the normalized text of the document at `path`.
	///
	/// # Errors
	/// Returns a `DocumentError` if the file cannot be read or decoded.
	fn extract(&self, path: &Path) -> Result<String, DocumentError>;
}

/// Removes line breaks, then turns every period into a line break.
///
/// Extracted text wraps lines arbitrarily; sentence boundaries are the only
/// breaks worth keeping.
pub fn normalize(raw: &str) -> String {
	raw.replace('\n', "").replace('.', "\n")
}

/// Leading bytes of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF-";

fn read_bytes(path: &Path) -> Result<Vec<u8>, DocumentError> {
	fs::read(path).map_err(|source| DocumentError::Io { path: path.to_path_buf(), source })
}

/// Reads documents as plain UTF-8 text (invalid sequences are replaced).
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSource;

impl TextSource {
	fn decode(bytes: &[u8]) -> String {
		normalize(&String::from_utf8_lossy(bytes))
	}
}

impl DocumentSource for TextSource {
	fn extract(&self, path: &Path) -> Result<String, DocumentError> {
		Ok(Self::decode(&read_bytes(path)?))
	}
}

/// Extracts the text of every page of a PDF document.
#[cfg(feature = "pdf")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfSource;

#[cfg(feature = "pdf")]
impl PdfSource {
	fn decode(path: &Path, bytes: &[u8]) -> Result<String, DocumentError> {
		let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Pdf {
			path: path.to_path_buf(),
			reason: e.to_string(),
		})?;
		Ok(normalize(&raw))
	}
}

#[cfg(feature = "pdf")]
impl DocumentSource for PdfSource {
	fn extract(&self, path: &Path) -> Result<String, DocumentError> {
		Self::decode(path, &read_bytes(path)?)
	}
}

/// Picks an extractor for each file.
///
/// - `.pdf` extension or `%PDF-` header → PDF extraction (requires the `pdf` feature)
/// - anything else → plain text
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoSource;

impl DocumentSource for AutoSource {
	fn extract(&self, path: &Path) -> Result<String, DocumentError> {
		let bytes = read_bytes(path)?;
		if bytes.starts_with(PDF_MAGIC) || extension_of(path).as_deref() == Some("pdf") {
			decode_pdf(path, &bytes)
		} else {
			Ok(TextSource::decode(&bytes))
		}
	}
}

#[cfg(feature = "pdf")]
fn decode_pdf(path: &Path, bytes: &[u8]) -> Result<String, DocumentError> {
	PdfSource::decode(path, bytes)
}

#[cfg(not(feature = "pdf"))]
fn decode_pdf(path: &Path, _bytes: &[u8]) -> Result<String, DocumentError> {
	Err(DocumentError::UnsupportedFormat(path.to_path_buf()))
}

/// Builds a one-page PDF showing `text` in Helvetica.
///
/// Cross-reference offsets are computed, so the file loads without repair.
#[cfg(test)]
pub(crate) fn single_page_pdf(text: &str) -> Vec<u8> {
	let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
	let objects = [
		"<< /Type /Catalog /Pages 2 0 R >>".to_owned(),
		"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_owned(),
		"<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
			.to_owned(),
		"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_owned(),
		format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
	];

	let mut pdf = b"%PDF-1.4\n".to_vec();
	let mut offsets = Vec::with_capacity(objects.len());
	for (number, body) in objects.iter().enumerate() {
		offsets.push(pdf.len());
		pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", number + 1).as_bytes());
	}

	let xref = pdf.len();
	pdf.extend_from_slice(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes());
	for offset in offsets {
		pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
	}
	pdf.extend_from_slice(
		format!("trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n", objects.len() + 1).as_bytes(),
	);
	pdf
}
