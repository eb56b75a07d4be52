use core::fmt;

use thiserror::Error;

use crate::arena::OutOfMemory;

/// A failed parse, with the position of the cursor when it stopped.
///
/// Lines and columns are zero-based: a line feed bumps `line` and resets
/// `column`, every other byte bumps `column`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at {line}:{column}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Line of the offending byte.
    pub line: usize,
    /// Column of the offending byte.
    pub column: usize,
}

/// Every way a document can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum ErrorKind {
    /// An object did not open with `{`.
    ObjectCurlyStart,
    /// An object key was not a string.
    KeyNotString,
    /// More than one `:` between a key and its value.
    MultipleColons,
    /// No `:` between a key and its value.
    ColonNotFound,
    /// The input ran out in the middle of a value.
    UnexpectedEnd,
    /// An object value was followed by something other than `,` or `}`.
    ObjectValueEnd,
    /// An array element was followed by something other than `,` or `]`.
    ArrayValueEnd,
    /// `,` directly before `}`.
    ObjectTrailingComma,
    /// `,` directly before `]`, or an element slot left empty.
    ArrayTrailingComma,
    /// A value started with a byte that cannot begin any value.
    InvalidStart,
    /// Bytes other than whitespace followed the top-level value.
    TrailingContent,
    /// A value starting with `n` was not `null`.
    ExpectedNull,
    /// A value starting with `t` was not `true`.
    ExpectedTrue,
    /// A value starting with `f` was not `false`.
    ExpectedFalse,
    /// A string contained bytes that are not well-formed UTF-8.
    InvalidUtf8,
    /// A string contained a raw byte below `0x20`.
    ControlCharacter,
    /// `\` followed by a byte that is not a JSON escape.
    InvalidEscape,
    /// `\u` not followed by four hex digits.
    InvalidUnicodeEscape,
    /// A `\u` escape named a low surrogate with no high surrogate before it.
    LoneSurrogate,
    /// A high surrogate escape not followed by a low surrogate escape.
    UnpairedSurrogate,
    /// A number with a redundant leading `0`.
    LeadingZeros,
    /// A number starting with `+`.
    PlusSign,
    /// A number with no digit before its `.`.
    NoDigitBeforePoint,
    /// A number with no digit before its exponent marker.
    NoDigitBeforeExponent,
    /// Some other malformed number.
    NotANumber,
    /// A number with two `.`.
    DoublePoint,
    /// A number with two exponent markers.
    DoubleExponent,
    /// A transition the grammar does not define.
    Unreachable,
    /// The allocator refused a region, or the depth limit was reached.
    OutOfMemory,
}

impl ErrorKind {
    const MESSAGES: [&'static str; Self::OutOfMemory as usize + 1] = [
        "objects must start with '{'",
        "object key is not a string",
        "multiple colons between key and value",
        "colon not found between key and value",
        "unexpected end of input",
        "object values can only be followed by ',' or '}'",
        "array elements can only be followed by ',' or ']'",
        "trailing commas are not allowed in objects",
        "trailing commas are not allowed in arrays",
        "unexpected starting character",
        "unexpected content after the value",
        "expected 'null'",
        "expected 'true'",
        "expected 'false'",
        "invalid UTF-8 in string",
        "control characters must be escaped in strings",
        "invalid escape character",
        "only hexadecimal digits are allowed after \\u",
        "lone low surrogate",
        "unpaired high surrogate",
        "leading zeros are not allowed in numbers",
        "numbers cannot start with '+'",
        "at least one digit is required before the decimal point",
        "at least one digit is required before the exponent",
        "malformed number",
        "more than one decimal point in a number",
        "more than one exponent in a number",
        "unreachable parser state",
        "out of memory or nesting too deep",
    ];

    /// Static description of this kind.
    #[must_use]
    pub const fn message(self) -> &'static str {
        Self::MESSAGES[self as usize]
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl core::error::Error for ErrorKind {}

impl From<OutOfMemory> for ErrorKind {
    fn from(_: OutOfMemory) -> Self {
        ErrorKind::OutOfMemory
    }
}
