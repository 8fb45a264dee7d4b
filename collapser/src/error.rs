//! Error types for the tasting-note collapsing pipeline.
//!
//! Each layer has its own error enum:
//!
//! - [`CsvError`] - Table loading and CSV parsing errors
//! - [`SchemaError`] - Header layout does not match the attribute groups
//! - [`DictionaryError`] - Substitution dictionary loading errors
//! - [`OutputError`] - Serialization and output file errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Conversion into [`PipelineError`] is automatic via `From`,
//! so `?` works across layer boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Table Loading Errors
// =============================================================================

/// Errors while loading the source table.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Source file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed or short row.
    #[error("Parse error on line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// No header row found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl CsvError {
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}

// =============================================================================
// Schema Errors
// =============================================================================

/// The header row does not fit the expected group boundaries.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Fewer columns than the attribute groups need.
    #[error("Expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },

    /// Indicator header differs from the declared one.
    #[error("Column {position}: expected '{expected}', found '{found}'")]
    HeaderMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    /// Passthrough column absent from the header row.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Group ranges overlap or are out of order.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

// =============================================================================
// Dictionary Errors
// =============================================================================

/// Errors while loading a substitution dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// IO error.
    #[error("Dictionary IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error.
    #[error("Dictionary JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Entry with an empty source token.
    #[error("Dictionary entry {0} has an empty source token")]
    EmptyToken(usize),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while serializing or writing the output table.
#[derive(Debug, Error)]
pub enum OutputError {
    /// CSV writer error.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialized text is not valid UTF-8.
    #[error("Serialized output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Delimiter is not a single-byte character.
    #[error("Delimiter '{0}' is not a single-byte character")]
    InvalidDelimiter(char),

    /// Failed to write the destination file.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run`].
/// Any of these aborts the whole run before the output file is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Table loading error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Schema error.
    #[error("Schema mismatch: {0}")]
    Schema(#[from] SchemaError),

    /// Dictionary error.
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Output error.
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Report serialization error.
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table loading.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for schema binding.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for dictionary loading.
pub type DictionaryResult<T> = Result<T, DictionaryError>;

/// Result type for serialization.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
