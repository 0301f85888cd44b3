//! Error types for spot color extraction.
//!
//! Only conditions that abort a whole run (unreadable input, unwritable
//! output, a document the model cannot load) are surfaced as [`Error`] from
//! the top-level API. Per-page and per-name failures are collected into a
//! [`RunReport`](crate::extractor::RunReport) instead.

use crate::object::ObjectRef;

/// Result type alias for spot extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while cataloguing or rewriting a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Content stream could not be tokenized
    #[error("Failed to parse content stream at byte {offset}: {reason}")]
    ParseError {
        /// Byte offset where tokenizing stopped
        offset: usize,
        /// Reason for parse failure
        reason: String,
    },

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Referenced object not present in the document
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectRef),

    /// Page reference does not belong to the document
    #[error("Page not found: {0}")]
    PageNotFound(ObjectRef),

    /// Error reported by the underlying document model
    #[error("Document error: {0}")]
    Document(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input path cannot be turned into output file names
    #[error("Invalid input path: {0}")]
    InvalidPath(String),
}
