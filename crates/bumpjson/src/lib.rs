//! A table-driven JSON parser that builds its value tree in bump-allocated
//! arenas.
//!
//! Bytes are pulled one at a time from a [`ByteSource`]. Scalars are read by
//! a finite automaton whose transition table is computed at compile time;
//! objects and arrays are parsed by recursive descent around it. Every
//! string, array and object of the resulting [`Value`] lives in an arena
//! pool owned by the [`Parser`], whose regions come from a pluggable
//! [`Allocator`] and are only ever released in bulk.
//!
//! ```
//! use bumpjson::{Parser, ParserOptions};
//!
//! let text = r#"{"name": "café", "tags": ["a", "b"]}"#;
//! let mut parser = Parser::from_slice(text.as_bytes())
//!     .with_options(ParserOptions {
//!         max_depth: Some(8),
//!         ..ParserOptions::default()
//!     });
//! let doc = parser.parse()?;
//! let object = doc.object();
//! assert_eq!(object.get("name").and_then(|v| v.as_str()), Some("café"));
//! assert_eq!(object.get("tags").map(|v| v.array().len()), Some(2));
//! # Ok::<(), bumpjson::ParseError>(())
//! ```
//!
//! # Numbers
//!
//! Numbers are converted without library float parsing. A number whose
//! digits overflow 64-bit accumulators, whose exponent exceeds 308, or whose
//! magnitude falls outside the finite `f64` range parses as a zero with the
//! number's sign (`1e400` is `0.0`, `-1e400` is `-0.0`) rather than failing.
//! The ends of the finite range, `f64::MAX` and `f64::MIN_POSITIVE`, convert
//! exactly.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod allocator;
mod arena;
mod escape_buffer;
mod number_builder;
mod source;
mod string_builder;
mod tokenizer;
mod value;

mod parser;

#[cfg(test)]
mod tests;

pub use allocator::{Allocator, MAX_ALIGN, SystemAllocator};
pub use arena::ArenaStats;
pub use parser::{ErrorKind, ParseError, Parser, ParserOptions};
pub use source::{ByteSource, IterSource, SliceSource};
pub use value::{JsonType, Object, Value};
