//! PDF content stream tokenizing.
//!
//! Content streams contain sequences of operators that define page
//! appearance. This module turns them into [`ContentToken`]s with every
//! operator keyword resolved to a typed [`Operator`].

pub mod operators;
pub mod parser;
pub mod token;

pub use operators::{Operator, OperatorCategory};
pub use parser::parse_content_stream;
pub use token::{ContentToken, InlineImage};
