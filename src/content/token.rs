//! Tokens of a content stream.

use crate::content::operators::Operator;
use crate::object::{Dictionary, Object};

/// One event of a tokenized content stream.
///
/// Operands accumulate until the next [`ContentToken::Operator`]; an inline
/// image is a self-contained `BI … ID … EI` sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentToken {
    /// Operand value
    Operand(Object),
    /// Inline image (BI … ID … EI)
    InlineImage(InlineImage),
    /// Operator keyword
    Operator(Operator),
}

impl ContentToken {
    /// The operator, if this token is one.
    pub fn as_operator(&self) -> Option<&Operator> {
        match self {
            ContentToken::Operator(op) => Some(op),
            _ => None,
        }
    }
}

impl From<Operator> for ContentToken {
    fn from(op: Operator) -> Self {
        ContentToken::Operator(op)
    }
}

impl From<Object> for ContentToken {
    fn from(obj: Object) -> Self {
        ContentToken::Operand(obj)
    }
}

/// An inline image: abbreviated image dictionary plus raw sample bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Image dictionary entries in source order (W, H, CS, BPC, F, ...)
    pub dict: Dictionary,
    /// Raw image data between `ID` and `EI`
    pub data: bytes::Bytes,
}
