//! Borrowed JSON values.
//!
//! A [`Value`] is a view into the arena of the [`Parser`](crate::Parser) that
//! produced it. Strings, arrays and objects are slices into that arena, so a
//! `Value` is `Copy` and cannot outlive the next call to
//! [`Parser::parse`](crate::Parser::parse) or
//! [`Parser::reset`](crate::Parser::reset).

use core::fmt::{self, Write as _};

use bstr::{BStr, ByteSlice};

/// A JSON value as defined by [RFC 8259].
///
/// # Examples
///
/// ```
/// use bumpjson::{Parser, Value};
///
/// let mut parser = Parser::from_slice(br#"{"key": [1, true, null]}"#);
/// let value = parser.parse().unwrap();
/// let array = value.object().get("key").unwrap().array();
/// assert_eq!(array, &[Value::Number(1.0), Value::Boolean(true), Value::Null]);
/// assert_eq!(value.to_string(), r#"{"key":[1,true,null]}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    /// `null`
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// Any number, converted to the nearest `f64` (see the crate docs for
    /// out-of-range values).
    Number(f64),
    /// Decoded string contents. Always valid UTF-8.
    String(&'a BStr),
    /// Elements in document order.
    Array(&'a [Value<'a>]),
    /// Members in document order, duplicates included.
    Object(Object<'a>),
}

/// The variant of a [`Value`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum JsonType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Lowercase name of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'a> Value<'a> {
    /// The variant tag.
    #[must_use]
    pub fn json_type(&self) -> JsonType {
        match self {
            Value::Null => JsonType::Null,
            Value::Boolean(_) => JsonType::Boolean,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns `true` if the value is [`Number`].
    ///
    /// [`Number`]: Value::Number
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// The boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// The number, if this is one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The decoded string bytes, if this is a string.
    #[must_use]
    pub fn as_bstr(&self) -> Option<&'a BStr> {
        match *self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The string as `str`, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        self.as_bstr().and_then(|s| s.to_str().ok())
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&'a [Value<'a>]> {
        match *self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The members, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<Object<'a>> {
        match *self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The number.
    ///
    /// # Panics
    ///
    /// If the value is not a number.
    #[must_use]
    #[track_caller]
    pub fn number(&self) -> f64 {
        self.as_f64().unwrap_or_else(|| self.mismatch(JsonType::Number))
    }

    /// The boolean.
    ///
    /// # Panics
    ///
    /// If the value is not a boolean.
    #[must_use]
    #[track_caller]
    pub fn boolean(&self) -> bool {
        self.as_bool().unwrap_or_else(|| self.mismatch(JsonType::Boolean))
    }

    /// The decoded string bytes.
    ///
    /// # Panics
    ///
    /// If the value is not a string.
    #[must_use]
    #[track_caller]
    pub fn string(&self) -> &'a BStr {
        self.as_bstr().unwrap_or_else(|| self.mismatch(JsonType::String))
    }

    /// The elements.
    ///
    /// # Panics
    ///
    /// If the value is not an array.
    #[must_use]
    #[track_caller]
    pub fn array(&self) -> &'a [Value<'a>] {
        self.as_array().unwrap_or_else(|| self.mismatch(JsonType::Array))
    }

    /// The members.
    ///
    /// # Panics
    ///
    /// If the value is not an object.
    #[must_use]
    #[track_caller]
    pub fn object(&self) -> Object<'a> {
        self.as_object().unwrap_or_else(|| self.mismatch(JsonType::Object))
    }

    #[track_caller]
    fn mismatch(&self, expected: JsonType) -> ! {
        panic!("expected {expected}, found {}", self.json_type())
    }
}

/// The members of a JSON object, as parallel key and value slices.
///
/// Members keep their document order. Duplicate keys are all retained;
/// [`get`](Object::get) finds the first.
#[derive(Clone, Copy, PartialEq)]
pub struct Object<'a> {
    keys: &'a [&'a BStr],
    values: &'a [Value<'a>],
}

impl<'a> Object<'a> {
    pub(crate) fn new(keys: &'a [&'a BStr], values: &'a [Value<'a>]) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self { keys, values }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the object has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in document order.
    #[must_use]
    pub fn keys(&self) -> &'a [&'a BStr] {
        self.keys
    }

    /// Values in document order.
    #[must_use]
    pub fn values(&self) -> &'a [Value<'a>] {
        self.values
    }

    /// `(key, value)` pairs in document order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'a BStr, Value<'a>)> + use<'a> {
        self.keys
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// The value of the first member whose key equals `key` byte for byte.
    ///
    /// ```
    /// use bumpjson::{Parser, Value};
    ///
    /// let mut parser = Parser::from_slice(br#"{"a": 1, "a": 2}"#);
    /// let object = parser.parse().unwrap().object();
    /// assert_eq!(object.len(), 2);
    /// assert_eq!(object.get("a"), Some(Value::Number(1.0)));
    /// assert_eq!(object.get("b"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<Value<'a>> {
        let key = key.as_ref();
        self.iter()
            .find(|(k, _)| k.as_bytes() == key)
            .map(|(_, v)| v)
    }
}

impl fmt::Debug for Object<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Writes `src` as the body of a JSON string literal, escaping quotes,
/// backslashes, control characters and the Unicode line separators.
pub(crate) fn write_escaped_string<W: fmt::Write>(src: &BStr, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            // Pre-2019 JSON parsers reject raw line separators.
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_ascii_control() || c.is_control() && c as u32 <= 0xFFFF => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

/// Compact JSON text, objects in document order.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            Value::Array(arr) => {
                f.write_char('[')?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_char(']')
            }
            Value::Object(obj) => {
                f.write_char('{')?;
                for (i, (k, v)) in obj.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    f.write_char('"')?;
                    write_escaped_string(k, f)?;
                    write!(f, "\":{v}")?;
                }
                f.write_char('}')
            }
        }
    }
}

#[cfg(any(test, feature = "serde"))]
mod ser {
    use bstr::{BStr, ByteSlice};
    use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};

    use super::{Object, Value};

    struct Key<'a>(&'a BStr);

    impl Serialize for Key<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let key = self
                .0
                .to_str()
                .map_err(|_| S::Error::custom("object key is not valid UTF-8"))?;
            serializer.serialize_str(key)
        }
    }

    impl Serialize for Object<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (k, v) in self.iter() {
                map.serialize_entry(&Key(k), &v)?;
            }
            map.end()
        }
    }

    impl Serialize for Value<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Value::Null => serializer.serialize_unit(),
                Value::Boolean(b) => serializer.serialize_bool(*b),
                Value::Number(n) => serializer.serialize_f64(*n),
                Value::String(s) => match s.to_str() {
                    Ok(s) => serializer.serialize_str(s),
                    Err(_) => serializer.serialize_bytes(s),
                },
                Value::Array(a) => serializer.collect_seq(a.iter()),
                Value::Object(o) => o.serialize(serializer),
            }
        }
    }
}
