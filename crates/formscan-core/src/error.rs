//! Error types for the formscan-core library.
//!
//! The extraction pipeline itself never fails: unresolved concepts, missing
//! templates and domain mismatches are reported as data. Errors only come
//! from the I/O boundary, when loading records, template libraries or config.

use thiserror::Error;

/// Main error type for the formscan library.
#[derive(Error, Debug)]
pub enum FormscanError {
    /// Template library error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// OCR record error.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to loading a template library.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The library file could not be parsed.
    #[error("failed to parse template library: {0}")]
    Parse(String),

    /// Two templates share the same id.
    #[error("duplicate template id: {0}")]
    DuplicateId(String),
}

/// Errors related to reading an OCR record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The record could not be parsed.
    #[error("failed to parse OCR record: {0}")]
    Parse(String),

    /// Unknown document type discriminator.
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),
}

/// Result type for the formscan library.
pub type Result<T> = std::result::Result<T, FormscanError>;
