//! Content stream lexer (tokenizer).
//!
//! This module provides low-level tokenization of decoded content stream
//! bytes. It recognizes numbers, strings, names, the `true`/`false`/`null`
//! keywords, array and dictionary delimiters, and bare keywords, which in a
//! content stream are operators.
//!
//! Whitespace (space, \t, \r, \n, \0, \f) and comments (% to EOL) are skipped.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{map, opt, value},
    sequence::{delimited, preceded},
};

/// Token types recognized by the content lexer.
#[derive(Debug, PartialEq, Clone)]
pub enum Token<'a> {
    /// Integer number (e.g., 42, -123)
    Integer(i64),

    /// Real (floating-point) number (e.g., 3.14, -2.5, .5)
    Real(f64),

    /// Literal string bytes (e.g., content of "(Hello)")
    /// Note: Escape sequences are NOT decoded at lexer level
    LiteralString(&'a [u8]),

    /// Hexadecimal string bytes (e.g., content of "<48656C6C6F>")
    HexString(&'a [u8]),

    /// Name (e.g., "CS0" from "/CS0"), # escapes decoded
    Name(String),

    /// Boolean true keyword
    True,

    /// Boolean false keyword
    False,

    /// Null keyword
    Null,

    /// Array start delimiter [
    ArrayStart,

    /// Array end delimiter ]
    ArrayEnd,

    /// Dictionary start delimiter <<
    DictStart,

    /// Dictionary end delimiter >>
    DictEnd,

    /// Any other run of regular characters (an operator in content streams)
    Keyword(&'a [u8]),
}

/// PDF whitespace characters (ISO 32000-1:2008, Table 1).
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | 0x00 | 0x0C)
}

/// PDF delimiter characters (ISO 32000-1:2008, Table 2).
pub fn is_delimiter(byte: u8) -> bool {
    matches!(byte, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

/// Regular characters are everything that is neither whitespace nor a delimiter.
pub fn is_regular(byte: u8) -> bool {
    !is_whitespace(byte) && !is_delimiter(byte)
}

fn whitespace(input: &[u8]) -> IResult<&[u8], ()> {
    value((), take_while1(is_whitespace))(input)
}

fn comment(input: &[u8]) -> IResult<&[u8], ()> {
    value((), preceded(char('%'), take_till(|c| c == b'\r' || c == b'\n')))(input)
}

/// Skip all whitespace and comments.
pub fn skip_ws(input: &[u8]) -> IResult<&[u8], ()> {
    let mut remaining = input;

    loop {
        if let Ok((rest, _)) = whitespace(remaining) {
            remaining = rest;
            continue;
        }
        if let Ok((rest, _)) = comment(remaining) {
            remaining = rest;
            continue;
        }
        break;
    }

    Ok((remaining, ()))
}

/// Parse an integer or real number.
///
/// PDF numbers can be:
/// - Integers: 42, -123, +17
/// - Reals: 3.14, -2.5, .5, 0., -.002
fn parse_number(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let err = |i| nom::Err::Error(nom::error::Error::new(i, nom::error::ErrorKind::Digit));

    let (input, sign) = opt(one_of("+-"))(input)?;
    let (input, int_part) = opt(digit1)(input)?;
    let (input, frac_part) = opt(preceded(char('.'), opt(digit1)))(input)?;

    if int_part.is_none() && frac_part.is_none() {
        return Err(err(input));
    }

    let digits = |bytes: &[u8]| std::str::from_utf8(bytes).map(str::to_owned);

    if let Some(frac) = frac_part {
        let mut num_str = String::new();
        if sign == Some('-') {
            num_str.push('-');
        }
        match int_part {
            Some(int) => num_str.push_str(&digits(int).map_err(|_| err(input))?),
            None => num_str.push('0'),
        }
        num_str.push('.');
        match frac {
            Some(frac) => num_str.push_str(&digits(frac).map_err(|_| err(input))?),
            None => num_str.push('0'),
        }
        let num: f64 = num_str.parse().map_err(|_| err(input))?;
        Ok((input, Token::Real(num)))
    } else {
        let int_bytes = int_part.ok_or_else(|| err(input))?;
        let int_str = digits(int_bytes).map_err(|_| err(input))?;
        let mut num: i64 = int_str.parse().map_err(|_| err(input))?;
        if sign == Some('-') {
            num = -num;
        }
        Ok((input, Token::Integer(num)))
    }
}

/// Parse a literal string enclosed in parentheses.
///
/// Handles balanced nested parentheses and backslash escapes. The raw bytes
/// are returned; decoding happens at the parser level.
fn parse_literal_string(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (remaining, _) = char('(')(input)?;
    let mut depth = 1;
    let mut pos = 0;

    while depth > 0 && pos < remaining.len() {
        match remaining[pos] {
            b'\\' => pos += 2,
            b'(' => {
                depth += 1;
                pos += 1;
            },
            b')' => {
                depth -= 1;
                pos += 1;
            },
            _ => pos += 1,
        }
    }

    if depth != 0 || pos > remaining.len() {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)));
    }

    Ok((&remaining[pos..], Token::LiteralString(&remaining[..pos - 1])))
}

/// Parse a hexadecimal string enclosed in angle brackets.
fn parse_hex_string(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    if input.starts_with(b"<<") {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)));
    }

    delimited(
        char('<'),
        map(
            take_while(|c: u8| c.is_ascii_hexdigit() || is_whitespace(c)),
            Token::HexString,
        ),
        char('>'),
    )(input)
}

/// Decode #XX escape sequences in raw PDF name bytes.
///
/// PDF Spec: ISO 32000-1:2008, Section 7.3.5 - Name Objects.
/// Invalid sequences are kept literally.
///
/// ```
/// # use pdf_spots::lexer::decode_name_bytes;
/// assert_eq!(decode_name_bytes(b"PANTONE#20123"), b"PANTONE 123");
/// assert_eq!(decode_name_bytes(b"A#zz"), b"A#zz");
/// ```
pub fn decode_name_bytes(raw: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        if raw[i] == b'#' && i + 2 < raw.len() {
            let hex = &raw[i + 1..i + 3];
            if let Some(byte) = std::str::from_utf8(hex)
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok())
            {
                result.push(byte);
                i += 3;
                continue;
            }
        }
        result.push(raw[i]);
        i += 1;
    }

    result
}

/// Parse a name starting with /.
///
/// The decoded bytes are mapped one-to-one onto chars so that the writer can
/// reproduce them exactly.
fn parse_name(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    preceded(
        char('/'),
        map(take_while(is_regular), |bytes: &[u8]| {
            Token::Name(decode_name_bytes(bytes).into_iter().map(char::from).collect())
        }),
    )(input)
}

fn parse_delimiter(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    alt((
        value(Token::DictStart, tag(b"<<")),
        value(Token::DictEnd, tag(b">>")),
        value(Token::ArrayStart, tag(b"[")),
        value(Token::ArrayEnd, tag(b"]")),
    ))(input)
}

/// Parse a run of regular characters: a number, `true`/`false`/`null`, or an
/// operator keyword.
fn parse_regular(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (rest, run) = take_while1(is_regular)(input)?;

    let tok = match run {
        b"true" => Token::True,
        b"false" => Token::False,
        b"null" => Token::Null,
        _ => match parse_number(run) {
            Ok((b"", number)) => number,
            _ => Token::Keyword(run),
        },
    };

    Ok((rest, tok))
}

/// Parse a single token.
///
/// Skips whitespace and comments, then recognizes one token.
pub fn token(input: &[u8]) -> IResult<&[u8], Token<'_>> {
    let (input, _) = skip_ws(input)?;

    alt((parse_delimiter, parse_name, parse_literal_string, parse_hex_string, parse_regular))(
        input,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integers() {
        assert_eq!(token(b"42"), Ok((&b""[..], Token::Integer(42))));
        assert_eq!(token(b"-123"), Ok((&b""[..], Token::Integer(-123))));
        assert_eq!(token(b"+17"), Ok((&b""[..], Token::Integer(17))));
    }

    #[test]
    fn test_parse_reals() {
        assert_eq!(token(b"-2.5"), Ok((&b""[..], Token::Real(-2.5))));
        assert_eq!(token(b".5"), Ok((&b""[..], Token::Real(0.5))));
        assert_eq!(token(b"5."), Ok((&b""[..], Token::Real(5.0))));
        assert_eq!(token(b"-.002"), Ok((&b""[..], Token::Real(-0.002))));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(token(b"re"), Ok((&b""[..], Token::Keyword(b"re"))));
        assert_eq!(token(b"f*"), Ok((&b""[..], Token::Keyword(b"f*"))));
        assert_eq!(token(b"T*"), Ok((&b""[..], Token::Keyword(b"T*"))));
        assert_eq!(token(b"'"), Ok((&b""[..], Token::Keyword(b"'"))));
        assert_eq!(token(b"true"), Ok((&b""[..], Token::True)));
        assert_eq!(token(b"null"), Ok((&b""[..], Token::Null)));
    }

    #[test]
    fn test_keyword_stops_at_delimiter() {
        assert_eq!(token(b"cs/CS1"), Ok((&b"/CS1"[..], Token::Keyword(b"cs"))));
    }

    #[test]
    fn test_parse_literal_string_nested() {
        let result = token(b"(Hello (nested) World)");
        assert_eq!(result, Ok((&b""[..], Token::LiteralString(b"Hello (nested) World"))));
    }

    #[test]
    fn test_parse_literal_string_escaped_paren() {
        let result = token(b"(a\\)b) Tj");
        assert_eq!(result, Ok((&b" Tj"[..], Token::LiteralString(b"a\\)b"))));
    }

    #[test]
    fn test_parse_unterminated_string() {
        assert!(token(b"(never closed").is_err());
    }

    #[test]
    fn test_parse_hex_string() {
        assert_eq!(token(b"<48 65>"), Ok((&b""[..], Token::HexString(b"48 65"))));
    }

    #[test]
    fn test_parse_name_with_escape() {
        assert_eq!(token(b"/PANTONE#20123"), Ok((&b""[..], Token::Name("PANTONE 123".into()))));
    }

    #[test]
    fn test_parse_delimiters() {
        assert_eq!(token(b"<<"), Ok((&b""[..], Token::DictStart)));
        assert_eq!(token(b">>"), Ok((&b""[..], Token::DictEnd)));
        assert_eq!(token(b"["), Ok((&b""[..], Token::ArrayStart)));
        assert_eq!(token(b"]"), Ok((&b""[..], Token::ArrayEnd)));
    }

    #[test]
    fn test_skip_comments() {
        assert_eq!(token(b"% comment\n  m"), Ok((&b""[..], Token::Keyword(b"m"))));
    }

    #[test]
    fn test_decode_name_bytes() {
        assert_eq!(decode_name_bytes(b"A#20B#23C"), b"A B#C");
        assert_eq!(decode_name_bytes(b"Type"), b"Type");
        assert_eq!(decode_name_bytes(b"A#"), b"A#");
        assert_eq!(decode_name_bytes(b"A#2"), b"A#2");
    }
}
