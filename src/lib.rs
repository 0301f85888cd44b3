#![allow(clippy::too_many_arguments)]
#![allow(clippy::match_like_matches_macro)]

//! # PDF Spots
//!
//! Separates spot colors (named Separation colorants) out of PDF pages.
//!
//! For each requested colorant a derived document is written that keeps
//! only the vector paths painted with it. A final "remaining" document has
//! those paths removed and keeps everything else: process color artwork,
//! text and images.
//!
//! ## Pipeline
//!
//! ```text
//! input.pdf
//!     ↓
//! [LopdfDocument] (load, resolve objects, enumerate pages)
//!     ↓
//! [ColorantCatalog] (Separation color spaces, per-page key mapping)
//!     ↓
//! [parse_content_stream] (bytes → typed tokens)
//!     ↓
//! [rewrite_page] (keep or remove operator groups)
//!     ↓
//! [serialize_content] (tokens → bytes)
//!     ↓
//! input.<colorant>.pdf, input.remaining.pdf
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_spots::{ExtractorConfig, SpotExtractor};
//! use std::path::Path;
//!
//! let extractor = SpotExtractor::new(ExtractorConfig::default());
//! let report = extractor.run(Path::new("job.pdf"), &["PANTONE 123 C"])?;
//! print!("{}", report);
//! # Ok::<(), pdf_spots::Error>(())
//! ```
//!
//! Names are compared after resolving `#XX` escapes and ignoring case, so
//! a colorant stored as `/PANTONE#20123#20C` answers to `pantone 123 c`.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Tokenizing
pub mod lexer;
pub mod object;
pub mod parser;

// Content streams
pub mod content;
pub mod writer;

// Document model
pub mod document;

// Spot extraction
pub mod catalog;
pub mod config;
pub mod extractor;
pub mod output;
pub mod rewrite;

pub use catalog::{ColorantCatalog, ColorantEntry, PageView, Resolution, Selection};
pub use config::ExtractorConfig;
pub use content::{ContentToken, Operator, OperatorCategory, parse_content_stream};
pub use document::{DocumentModel, LopdfDocument};
pub use error::{Error, Result};
pub use extractor::{PageFailure, RunReport, SpotExtractor};
pub use object::{Object, ObjectRef};
pub use output::OutputNames;
pub use rewrite::{PageRewriteState, RewriteRequest, rewrite_content, rewrite_page};
pub use writer::serialize_content;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(VERSION.starts_with("0."));
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "pdf_spots");
    }
}
