//! Content stream tokenizer.
//!
//! Content streams use postfix notation where operands precede the operator:
//!
//! ```text
//! /CS0 cs 1 scn
//! 10 10 100 50 re f
//! ```
//!
//! The tokenizer turns decoded stream bytes into a flat sequence of
//! [`ContentToken`]s, resolving each operator keyword to an [`Operator`]
//! on the way. Unlike a text extractor it does not try to recover from
//! damaged input: the first syntax error aborts the stream, so a rewritten
//! page is only ever built from a stream that was fully understood.

use crate::content::operators::Operator;
use crate::content::token::{ContentToken, InlineImage};
use crate::error::{Error, Result};
use crate::lexer::{Token, is_whitespace, is_delimiter, skip_ws, token};
use crate::object::Dictionary;
use crate::parser::parse_object;

/// Tokenize a content stream.
///
/// # Arguments
///
/// * `data` - The decoded content stream bytes
///
/// # Examples
///
/// ```
/// use pdf_spots::content::{parse_content_stream, ContentToken, Operator};
///
/// let tokens = parse_content_stream(b"/CS0 cs 1 scn 0 0 10 10 re f").unwrap();
/// assert_eq!(tokens.len(), 10);
/// assert_eq!(tokens[1], ContentToken::Operator(Operator::SetFillColorSpace));
/// ```
///
/// # Errors
///
/// Returns [`Error::ParseError`] with the byte offset of the first token
/// that could not be read: unterminated strings, unclosed arrays or
/// dictionaries, stray delimiters, or an inline image without `EI`.
pub fn parse_content_stream(data: &[u8]) -> Result<Vec<ContentToken>> {
    let mut tokens = Vec::new();
    let mut input = data;

    loop {
        let (rest, _) = skip_ws(input).map_err(|_| parse_error(data, input, "bad whitespace"))?;
        input = rest;
        if input.is_empty() {
            break;
        }

        let (rest, tok) = token(input).map_err(|_| parse_error(data, input, "unreadable token"))?;
        match tok {
            Token::Keyword(b"BI") => {
                let (rest, image) = parse_inline_image(data, rest)?;
                tokens.push(ContentToken::InlineImage(image));
                input = rest;
            },
            Token::Keyword(keyword) => {
                tokens.push(ContentToken::Operator(Operator::from_keyword(keyword)));
                input = rest;
            },
            Token::ArrayEnd | Token::DictEnd => {
                return Err(parse_error(data, input, "unbalanced closing delimiter"));
            },
            _ => {
                let (rest, obj) =
                    parse_object(input).map_err(|_| parse_error(data, input, "malformed operand"))?;
                tokens.push(ContentToken::Operand(obj));
                input = rest;
            },
        }
    }

    Ok(tokens)
}

fn parse_error(data: &[u8], at: &[u8], reason: &str) -> Error {
    Error::ParseError {
        offset: data.len() - at.len(),
        reason: reason.to_string(),
    }
}

/// Parse an inline image after its `BI` keyword.
///
/// PDF Spec: ISO 32000-1:2008, Section 8.9.7 - Inline Images.
/// Layout: `BI <key value>* ID <single whitespace> <data> <whitespace> EI`.
/// The data end is the first `EI` preceded by whitespace and followed by
/// whitespace, a delimiter or the end of the stream.
fn parse_inline_image<'a>(data: &'a [u8], input: &'a [u8]) -> Result<(&'a [u8], InlineImage)> {
    let mut dict = Dictionary::new();
    let mut remaining = input;

    loop {
        let (rest, tok) =
            token(remaining).map_err(|_| parse_error(data, remaining, "unterminated inline image"))?;
        match tok {
            Token::Keyword(b"ID") => {
                remaining = rest;
                break;
            },
            Token::Name(key) => {
                let (rest, value) = parse_object(rest)
                    .map_err(|_| parse_error(data, rest, "malformed inline image entry"))?;
                dict.insert(key, value);
                remaining = rest;
            },
            _ => return Err(parse_error(data, remaining, "malformed inline image dictionary")),
        }
    }

    // Exactly one whitespace byte separates ID from the data
    if let Some(&b) = remaining.first() {
        if is_whitespace(b) {
            remaining = &remaining[1..];
        }
    }

    let end = find_ei_operator(remaining)
        .ok_or_else(|| parse_error(data, remaining, "inline image without EI"))?;
    let image = InlineImage {
        dict,
        data: bytes::Bytes::copy_from_slice(&remaining[..end]),
    };

    // Skip the whitespace before EI and the keyword itself
    Ok((&remaining[end + 3..], image))
}

/// Position of the whitespace byte preceding the terminating `EI`.
fn find_ei_operator(input: &[u8]) -> Option<usize> {
    (0..input.len().saturating_sub(2)).find(|&i| {
        is_whitespace(input[i])
            && &input[i + 1..i + 3] == b"EI"
            && input
                .get(i + 3)
                .map_or(true, |&b| is_whitespace(b) || is_delimiter(b))
    })
}
