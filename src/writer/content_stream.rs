//! Content stream serialization.
//!
//! Writes operand values and operators back to content stream syntax
//! (ISO 32000-1:2008, Section 7.3 and 8.2). Output is compact: operands are
//! separated by single spaces and every operator ends its line.

use crate::content::{ContentToken, InlineImage, Operator};
use crate::object::Object;

/// Incremental writer for content stream bytes.
#[derive(Debug, Clone, Default)]
pub struct ContentWriter {
    buf: Vec<u8>,
}

impl ContentWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one operator group: its operands, then the operator keyword.
    ///
    /// With `op == None` only the operands are written, terminated by a
    /// newline. This is used for operands left over at the end of a stream.
    pub fn write_group(&mut self, operands: &[Object], op: Option<&Operator>) {
        for (i, operand) in operands.iter().enumerate() {
            if i > 0 {
                self.buf.push(b' ');
            }
            write_object(&mut self.buf, operand);
        }

        match op {
            Some(op) => {
                if !operands.is_empty() {
                    self.buf.push(b' ');
                }
                write_raw_chars(&mut self.buf, op.keyword());
                self.buf.push(b'\n');
            },
            None if !operands.is_empty() => self.buf.push(b'\n'),
            None => {},
        }
    }

    /// Write an inline image as `BI <entries> ID <data> EI`.
    pub fn write_inline_image(&mut self, image: &InlineImage) {
        self.buf.extend_from_slice(b"BI");
        for (key, value) in &image.dict {
            self.buf.push(b' ');
            write_name(&mut self.buf, key);
            self.buf.push(b' ');
            write_object(&mut self.buf, value);
        }
        self.buf.extend_from_slice(b" ID ");
        self.buf.extend_from_slice(&image.data);
        self.buf.extend_from_slice(b"\nEI\n");
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the stream bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Serialize a token sequence into content stream bytes.
///
/// ```
/// use pdf_spots::content::parse_content_stream;
/// use pdf_spots::writer::serialize_content;
///
/// let tokens = parse_content_stream(b"/CS0   cs\n1 scn  0 0 5 5 re f").unwrap();
/// assert_eq!(serialize_content(&tokens), b"/CS0 cs\n1 scn\n0 0 5 5 re\nf\n");
/// ```
pub fn serialize_content(tokens: &[ContentToken]) -> Vec<u8> {
    let mut writer = ContentWriter::new();
    let mut operands: Vec<Object> = Vec::new();

    for tok in tokens {
        match tok {
            ContentToken::Operand(obj) => operands.push(obj.clone()),
            ContentToken::Operator(op) => {
                writer.write_group(&operands, Some(op));
                operands.clear();
            },
            ContentToken::InlineImage(image) => {
                writer.write_group(&operands, None);
                operands.clear();
                writer.write_inline_image(image);
            },
        }
    }
    writer.write_group(&operands, None);

    writer.finish()
}

/// Write an object in content stream syntax.
pub(crate) fn write_object(buf: &mut Vec<u8>, obj: &Object) {
    match obj {
        Object::Null => buf.extend_from_slice(b"null"),
        Object::Boolean(b) => buf.extend_from_slice(if *b { &b"true"[..] } else { &b"false"[..] }),
        Object::Integer(i) => buf.extend_from_slice(i.to_string().as_bytes()),
        Object::Real(r) => write_real(buf, *r),
        Object::String(s) => write_string(buf, s),
        Object::Name(n) => write_name(buf, n),
        Object::Array(arr) => {
            buf.push(b'[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    buf.push(b' ');
                }
                write_object(buf, item);
            }
            buf.push(b']');
        },
        Object::Dictionary(dict) => {
            buf.extend_from_slice(b"<<");
            for (key, value) in dict {
                write_name(buf, key);
                buf.push(b' ');
                write_object(buf, value);
            }
            buf.extend_from_slice(b">>");
        },
        Object::Reference(r) => buf.extend_from_slice(r.to_string().as_bytes()),
    }
}

/// Write a real number in the shortest form that parses back to the same
/// value. `f64`'s `Display` never uses exponent notation, which content
/// stream syntax does not allow.
fn write_real(buf: &mut Vec<u8>, value: f64) {
    if value.is_finite() {
        buf.extend_from_slice(value.to_string().as_bytes());
    } else {
        buf.push(b'0');
    }
}

/// Write a string as a literal `( … )` when printable, otherwise as hex.
fn write_string(buf: &mut Vec<u8>, data: &[u8]) {
    let is_printable = data
        .iter()
        .all(|&b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

    if is_printable {
        buf.push(b'(');
        for &byte in data {
            match byte {
                b'(' => buf.extend_from_slice(b"\\("),
                b')' => buf.extend_from_slice(b"\\)"),
                b'\\' => buf.extend_from_slice(b"\\\\"),
                b'\n' => buf.extend_from_slice(b"\\n"),
                b'\r' => buf.extend_from_slice(b"\\r"),
                b'\t' => buf.extend_from_slice(b"\\t"),
                _ => buf.push(byte),
            }
        }
        buf.push(b')');
    } else {
        buf.push(b'<');
        for byte in data {
            buf.extend_from_slice(format!("{:02X}", byte).as_bytes());
        }
        buf.push(b'>');
    }
}

/// Write a name, escaping `#`, delimiters, whitespace and non-printable bytes.
fn write_name(buf: &mut Vec<u8>, name: &str) {
    buf.push(b'/');
    for ch in name.chars() {
        let byte = ch as u32 as u8;
        if (0x21..=0x7E).contains(&byte) && byte != b'#' && !crate::lexer::is_delimiter(byte) {
            buf.push(byte);
        } else {
            buf.extend_from_slice(format!("#{:02X}", byte).as_bytes());
        }
    }
}

/// Write chars that each stand for one byte.
fn write_raw_chars(buf: &mut Vec<u8>, s: &str) {
    buf.extend(s.chars().map(|c| c as u32 as u8));
}
