//! Error types for the repoload transformation pipeline.
//!
//! This module defines one error type per concern:
//!
//! - [`CsvError`] - repoDB CSV reading and decoding errors
//! - [`LookupError`] - mychem.info annotation client errors
//! - [`VocabError`] - local vocabulary file errors
//! - [`TransformError`] - name revision and grouping errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during repoDB CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the detected encoding.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Invalid CSV format or a row that does not match the repoDB columns.
    #[error("Invalid CSV format: {0}")]
    ParseError(#[from] csv::Error),

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,
}

// =============================================================================
// Annotation Lookup Errors
// =============================================================================

/// Errors from the mychem.info annotation client.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP transport failure or a non-success status from the API.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response body did not match the annotation shape.
    #[error("Invalid annotation response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Vocabulary Errors
// =============================================================================

/// Errors while loading a local vocabulary file.
#[derive(Debug, Error)]
pub enum VocabError {
    /// Failed to read file.
    #[error("Failed to read vocabulary file: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid vocabulary CSV.
    #[error("Invalid vocabulary CSV: {0}")]
    ParseError(#[from] csv::Error),
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Errors during name revision and grouping.
#[derive(Debug, Error)]
pub enum TransformError {
    /// `drug_name` and `drugbank_id` are not one-to-one after revision.
    #[error("drug_name and drugbank_id are not 1-to-1 after revision: {0}")]
    NameConflict(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::transform_csv`].
/// It wraps all lower-level errors via `From`.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Annotation lookup error.
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Vocabulary error.
    #[error("Vocabulary error: {0}")]
    Vocab(#[from] VocabError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for annotation lookups.
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type for vocabulary operations.
pub type VocabResult<T> = Result<T, VocabError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // CsvError -> PipelineError
        let csv_err = CsvError::EmptyFile;
        let pipeline_err: PipelineError = csv_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // TransformError -> PipelineError
        let transform_err = TransformError::NameConflict("DB00002".into());
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("DB00002"));
    }

    #[test]
    fn test_name_conflict_format() {
        let err = TransformError::NameConflict("drug_name maps to 2 ids".into());
        let msg = err.to_string();
        assert!(msg.contains("1-to-1"));
        assert!(msg.contains("drug_name maps to 2 ids"));
    }
}
