//! Content stream operand values.
//!
//! Operands in a content stream are a subset of PDF objects: there are no
//! streams and no indirect references. [`Object::Reference`] is kept so that
//! the colorant catalog can talk about shared color-space objects with the
//! same vocabulary.

use indexmap::IndexMap;

/// Dictionary with insertion-ordered keys, so re-serialized operands keep the
/// key order of the source stream.
pub type Dictionary = IndexMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array, escapes already decoded)
    String(Vec<u8>),
    /// Name without the leading `/`, `#XX` escapes decoded.
    ///
    /// Every `char` is a single byte of the raw name (Latin-1 mapping), so the
    /// writer can restore the exact bytes.
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dictionary),
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl From<lopdf::ObjectId> for ObjectRef {
    fn from((id, gen): lopdf::ObjectId) -> Self {
        Self { id, gen }
    }
}

impl From<ObjectRef> for lopdf::ObjectId {
    fn from(r: ObjectRef) -> Self {
        (r.id, r.gen)
    }
}

impl Object {
    /// Get the type name of this object (without data).
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "Null",
            Object::Boolean(_) => "Boolean",
            Object::Integer(_) => "Integer",
            Object::Real(_) => "Real",
            Object::String(_) => "String",
            Object::Name(_) => "Name",
            Object::Array(_) => "Array",
            Object::Dictionary(_) => "Dictionary",
            Object::Reference(_) => "Reference",
        }
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to a number, accepting integers and reals.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Object::Integer(i) => Some(*i as f64),
            Object::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary.
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to cast to reference.
    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            Object::Reference(r) => Some(*r),
            _ => None,
        }
    }

    /// Try to cast to string (bytes).
    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if object is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    /// Convert a document-model object into an operand value.
    ///
    /// Streams have no operand form and become [`Object::Null`]. Name bytes
    /// are taken as stored by the document model; no escape decoding is done
    /// here.
    pub fn from_lopdf(obj: &lopdf::Object) -> Self {
        match obj {
            lopdf::Object::Null => Object::Null,
            lopdf::Object::Boolean(b) => Object::Boolean(*b),
            lopdf::Object::Integer(i) => Object::Integer(*i),
            lopdf::Object::Real(r) => Object::Real(*r as f64),
            lopdf::Object::Name(n) => Object::Name(n.iter().map(|&b| b as char).collect()),
            lopdf::Object::String(s, _) => Object::String(s.clone()),
            lopdf::Object::Array(arr) => Object::Array(arr.iter().map(Object::from_lopdf).collect()),
            lopdf::Object::Dictionary(dict) => Object::Dictionary(
                dict.iter()
                    .map(|(k, v)| (k.iter().map(|&b| b as char).collect(), Object::from_lopdf(v)))
                    .collect(),
            ),
            lopdf::Object::Stream(_) => Object::Null,
            lopdf::Object::Reference(id) => Object::Reference(ObjectRef::from(*id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_integer() {
        let obj = Object::Integer(42);
        assert_eq!(obj.as_integer(), Some(42));
        assert_eq!(obj.as_number(), Some(42.0));
        assert!(obj.as_name().is_none());
        assert!(!obj.is_null());
    }

    #[test]
    fn test_object_name() {
        let obj = Object::Name("CS0".to_string());
        assert_eq!(obj.as_name(), Some("CS0"));
        assert!(obj.as_integer().is_none());
    }

    #[test]
    fn test_object_array() {
        let obj = Object::Array(vec![Object::Name("Separation".into()), Object::Integer(2)]);
        let arr = obj.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0].as_name(), Some("Separation"));
    }

    #[test]
    fn test_dictionary_keeps_insertion_order() {
        let mut dict = Dictionary::new();
        dict.insert("W".to_string(), Object::Integer(4));
        dict.insert("H".to_string(), Object::Integer(2));
        dict.insert("BPC".to_string(), Object::Integer(8));
        let keys: Vec<_> = dict.keys().cloned().collect();
        assert_eq!(keys, vec!["W", "H", "BPC"]);
    }

    #[test]
    fn test_object_ref_display() {
        assert_eq!(format!("{}", ObjectRef::new(10, 0)), "10 0 R");
    }

    #[test]
    fn test_object_ref_from_lopdf_id() {
        let r = ObjectRef::from((7u32, 1u16));
        assert_eq!(r, ObjectRef::new(7, 1));
        let back: lopdf::ObjectId = r.into();
        assert_eq!(back, (7, 1));
    }

    #[test]
    fn test_from_lopdf_separation_array() {
        let src = lopdf::Object::Array(vec![
            lopdf::Object::Name(b"Separation".to_vec()),
            lopdf::Object::Name(b"PANTONE 123".to_vec()),
            lopdf::Object::Name(b"DeviceCMYK".to_vec()),
            lopdf::Object::Reference((12, 0)),
        ]);
        let obj = Object::from_lopdf(&src);
        let arr = obj.as_array().unwrap();
        assert_eq!(arr[0].as_name(), Some("Separation"));
        assert_eq!(arr[1].as_name(), Some("PANTONE 123"));
        assert_eq!(arr[3].as_reference(), Some(ObjectRef::new(12, 0)));
    }
}
