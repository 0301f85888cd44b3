//! Content stream writing.
//!
//! Turns rewritten token sequences back into content stream bytes. Document
//! level serialization (cross-reference tables, compression) is left to the
//! document model.

mod content_stream;

pub use content_stream::{ContentWriter, serialize_content};
