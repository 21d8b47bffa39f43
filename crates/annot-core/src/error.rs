//! Error types for the annot-core library.

use thiserror::Error;

/// Main error type for the annot library.
#[derive(Error, Debug)]
pub enum AnnotError {
    /// Annotation extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to pattern-driven record extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A pattern is not a valid regular expression.
    ///
    /// `index` is the position in the pattern set: 0 is the master pattern,
    /// field patterns start at 1.
    #[error("invalid pattern at index {index}: {message}")]
    PatternSyntax { index: usize, message: String },

    /// Extraction was requested with a schema that defines no fields.
    #[error("annotation type defines no fields")]
    EmptySchema,

    /// Any other failure inside an extraction task.
    #[error("unexpected extraction failure: {0}")]
    Unexpected(String),
}

/// Result type for the annot library.
pub type Result<T> = std::result::Result<T, AnnotError>;
