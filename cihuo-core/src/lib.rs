//! Word n-gram frequency analysis over a folder of documents.
//!
//! This crate provides the whole batch pipeline:
//! - Document text extraction (PDF or plain text) and normalization
//! - Tokenization and word n-gram counting (unigram through 4-gram)
//! - Filtering (alphabetic words, special words, minimum count) and sorting
//! - Rendering to the console or to a CSV table
//!
//! The counting core is deliberately small. The `Analyzer` is the entry point
//! used by the command line front-end.

/// Batch orchestration: folder scan, counting, filtering and rendering.
pub mod analyzer;

/// Configuration loading (properties or TOML) and validation.
pub mod config;

/// Document sources producing normalized text from files.
pub mod document;

/// Error types shared by the pipeline stages.
pub mod error;

/// Tokenizer, n-gram counter and filter pipeline.
pub mod model;

/// Output renderers (console, CSV).
pub mod render;

/// I/O utilities (folder listing, path helpers).
///
/// Not exposed
pub(crate) mod io;
