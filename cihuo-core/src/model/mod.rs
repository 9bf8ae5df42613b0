//! Top-level module for the n-gram counting core.
//!
//! This module provides the text-to-frequency pipeline, including:
//! - Tokenization of normalized document text (`tokenizer`)
//! - The supported n-gram sizes (`NGramSize`)
//! - Corpus-wide, insertion-ordered counting (`FrequencyMap`)
//! - Result filtering and sorting (`FilterPipeline`)

/// Conversion of normalized document text into a lowercase token sequence.
pub mod tokenizer;

/// Supported n-gram sizes (1 to 4) and their sliding-window width.
pub mod ngram_size;

/// Insertion-ordered n-gram → count mapping accumulated across documents.
///
/// Supports sliding-window counting and merging of partial maps.
pub mod frequency_map;

/// Predicates applied to counted n-grams and the ascending sort.
///
/// Offers a sequential and a multithreaded evaluation with identical output.
pub mod filter;

pub use filter::{FilterPipeline, SpecialWordScope};
pub use frequency_map::{FrequencyMap, NGramCount, count_ngrams};
pub use ngram_size::NGramSize;
pub use tokenizer::tokenize;
