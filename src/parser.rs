//! Operand parser.
//!
//! Combines lexer tokens into complete operand values (arrays, dictionaries,
//! decoded strings). Content streams never contain indirect references or
//! streams, so neither is recognized here.
//!
//! Parsing is strict: an unclosed array or dictionary is an error rather
//! than a truncated value, because a rewritten stream must never be built
//! from a guess. Arrays and dictionaries nest at most [`MAX_NESTING_DEPTH`]
//! levels deep.

use crate::error::{Error, Result};
use crate::lexer::{Token, token};
use crate::object::{Dictionary, Object};
use nom::IResult;

/// Decode escape sequences in PDF literal strings.
///
/// Handles the escapes of ISO 32000-1:2008, Section 7.3.4.2: `\n \r \t \b \f
/// \( \) \\`, octal `\ddd` and line continuation. An unknown escape keeps the
/// backslash.
///
/// ```
/// # use pdf_spots::parser::decode_literal_string_escapes;
/// assert_eq!(decode_literal_string_escapes(b"a\\(b\\)"), b"a(b)");
/// assert_eq!(decode_literal_string_escapes(b"\\247"), b"\xa7");
/// ```
pub fn decode_literal_string_escapes(raw: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        if raw[i] != b'\\' || i + 1 >= raw.len() {
            result.push(raw[i]);
            i += 1;
            continue;
        }

        let escaped = raw[i + 1];
        i += 2;
        match escaped {
            b'n' => result.push(b'\n'),
            b'r' => result.push(b'\r'),
            b't' => result.push(b'\t'),
            b'b' => result.push(0x08),
            b'f' => result.push(0x0C),
            b'(' | b')' | b'\\' => result.push(escaped),
            // Line continuation
            b'\n' => {},
            b'\r' => {
                if raw.get(i) == Some(&b'\n') {
                    i += 1;
                }
            },
            b'0'..=b'7' => {
                let mut octal = u32::from(escaped - b'0');
                let mut digits = 1;
                while digits < 3 {
                    match raw.get(i) {
                        Some(&d @ b'0'..=b'7') => {
                            octal = octal * 8 + u32::from(d - b'0');
                            digits += 1;
                            i += 1;
                        },
                        _ => break,
                    }
                }
                result.push((octal & 0xFF) as u8);
            },
            other => {
                result.push(b'\\');
                result.push(other);
            },
        }
    }

    result
}

/// Decode a hex string to bytes.
///
/// Whitespace is ignored. An odd trailing digit is padded with 0.
///
/// ```
/// # use pdf_spots::parser::decode_hex;
/// assert_eq!(decode_hex(b"48656C6C6F").unwrap(), b"Hello");
/// assert_eq!(decode_hex(b"7").unwrap(), vec![0x70]);
/// ```
pub fn decode_hex(hex_bytes: &[u8]) -> Result<Vec<u8>> {
    let digits: Vec<u8> = hex_bytes
        .iter()
        .filter(|c| !c.is_ascii_whitespace())
        .copied()
        .collect();

    let mut result = Vec::with_capacity(digits.len() / 2 + 1);
    for chunk in digits.chunks(2) {
        let pair = [chunk[0], chunk.get(1).copied().unwrap_or(b'0')];
        let byte = std::str::from_utf8(&pair)
            .ok()
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(|| Error::ParseError {
                offset: 0,
                reason: format!("Invalid hex digit in {:?}", String::from_utf8_lossy(&pair)),
            })?;
        result.push(byte);
    }

    Ok(result)
}

/// Deepest array/dictionary nesting accepted in one operand.
pub const MAX_NESTING_DEPTH: usize = 256;

fn fail(input: &[u8]) -> nom::Err<nom::error::Error<&[u8]>> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag))
}

/// Parse one operand value from input bytes.
///
/// # Errors
///
/// Returns `Err` if the input does not start with a value: an operator
/// keyword, a stray closing delimiter, a malformed string, or an unclosed
/// array or dictionary, or containers nested deeper than
/// [`MAX_NESTING_DEPTH`].
pub fn parse_object(input: &[u8]) -> IResult<&[u8], Object> {
    parse_nested(input, 0)
}

fn parse_nested(input: &[u8], depth: usize) -> IResult<&[u8], Object> {
    let (rest, tok) = token(input)?;
    object_from_token(input, rest, tok, depth)
}

fn object_from_token<'a>(
    start: &'a [u8],
    rest: &'a [u8],
    tok: Token<'a>,
    depth: usize,
) -> IResult<&'a [u8], Object> {
    match tok {
        Token::Null => Ok((rest, Object::Null)),
        Token::True => Ok((rest, Object::Boolean(true))),
        Token::False => Ok((rest, Object::Boolean(false))),
        Token::Integer(i) => Ok((rest, Object::Integer(i))),
        Token::Real(r) => Ok((rest, Object::Real(r))),
        Token::LiteralString(raw) => {
            Ok((rest, Object::String(decode_literal_string_escapes(raw))))
        },
        Token::HexString(raw) => match decode_hex(raw) {
            Ok(bytes) => Ok((rest, Object::String(bytes))),
            Err(_) => Err(nom::Err::Failure(nom::error::Error::new(
                start,
                nom::error::ErrorKind::HexDigit,
            ))),
        },
        Token::Name(name) => Ok((rest, Object::Name(name))),
        Token::ArrayStart | Token::DictStart if depth >= MAX_NESTING_DEPTH => Err(
            nom::Err::Failure(nom::error::Error::new(start, nom::error::ErrorKind::TooLarge)),
        ),
        Token::ArrayStart => parse_array(rest, depth + 1),
        Token::DictStart => parse_dictionary(rest, depth + 1),
        Token::ArrayEnd | Token::DictEnd | Token::Keyword(_) => Err(fail(start)),
    }
}

/// Parse the remainder of an array after `[`.
fn parse_array(input: &[u8], depth: usize) -> IResult<&[u8], Object> {
    let mut objects = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, tok) = token(remaining)?;
        if tok == Token::ArrayEnd {
            return Ok((rest, Object::Array(objects)));
        }
        let (rest, obj) = object_from_token(remaining, rest, tok, depth)?;
        objects.push(obj);
        remaining = rest;
    }
}

/// Parse the remainder of a dictionary after `<<`.
fn parse_dictionary(input: &[u8], depth: usize) -> IResult<&[u8], Object> {
    let mut dict = Dictionary::new();
    let mut remaining = input;

    loop {
        let (rest, tok) = token(remaining)?;
        match tok {
            Token::DictEnd => return Ok((rest, Object::Dictionary(dict))),
            Token::Name(key) => {
                let (rest, value) = parse_nested(rest, depth)?;
                dict.insert(key, value);
                remaining = rest;
            },
            _ => return Err(fail(remaining)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let (rest, obj) = parse_object(b"[1 2.5 /Name (str)] TJ").unwrap();
        assert_eq!(rest, b" TJ");
        let arr = obj.as_array().unwrap();
        assert_eq!(arr.len(), 4);
        assert_eq!(arr[0], Object::Integer(1));
        assert_eq!(arr[1], Object::Real(2.5));
        assert_eq!(arr[2], Object::Name("Name".into()));
        assert_eq!(arr[3], Object::String(b"str".to_vec()));
    }

    #[test]
    fn test_parse_nested_array() {
        let (_, obj) = parse_object(b"[[3 2] 0]").unwrap();
        let arr = obj.as_array().unwrap();
        assert_eq!(arr[0].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_dictionary() {
        let (rest, obj) = parse_object(b"<< /MCID 3 /Lang (en) >> BDC").unwrap();
        assert_eq!(rest, b" BDC");
        let dict = obj.as_dict().unwrap();
        assert_eq!(dict.get("MCID"), Some(&Object::Integer(3)));
        assert_eq!(dict.get_index(1).map(|(k, _)| k.as_str()), Some("Lang"));
    }

    #[test]
    fn test_parse_hex_string_object() {
        let (_, obj) = parse_object(b"<48656C6C6F>").unwrap();
        assert_eq!(obj, Object::String(b"Hello".to_vec()));
    }

    #[test]
    fn test_unclosed_array_is_error() {
        assert!(parse_object(b"[1 2 3").is_err());
    }

    #[test]
    fn test_unclosed_dictionary_is_error() {
        assert!(parse_object(b"<< /A 1").is_err());
    }

    #[test]
    fn test_keyword_is_not_an_object() {
        assert!(parse_object(b"re").is_err());
        assert!(parse_object(b"[1 re]").is_err());
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let at_limit = format!("{}{}", "[".repeat(MAX_NESTING_DEPTH), "]".repeat(MAX_NESTING_DEPTH));
        assert!(parse_object(at_limit.as_bytes()).is_ok());

        let too_deep = "[".repeat(MAX_NESTING_DEPTH + 1);
        assert!(matches!(parse_object(too_deep.as_bytes()), Err(nom::Err::Failure(_))));

        let dicts = "<< /A ".repeat(100_000);
        assert!(parse_object(dicts.as_bytes()).is_err());
    }

    #[test]
    fn test_decode_literal_string_escapes() {
        assert_eq!(decode_literal_string_escapes(b"Line1\\nLine2"), b"Line1\nLine2");
        assert_eq!(decode_literal_string_escapes(b"a\\\nb"), b"ab");
        assert_eq!(decode_literal_string_escapes(b"\\0053"), b"\x053");
        assert_eq!(decode_literal_string_escapes(b"\\q"), b"\\q");
    }

    #[test]
    fn test_decode_hex_invalid() {
        assert!(decode_hex(b"4G").is_err());
    }
}
