//! Recursive-descent parsing of objects and arrays on top of the scalar
//! tokenizer.
//!
//! Overview
//! - [`Parser`] owns a byte source wrapped in a [`Cursor`], an arena pool,
//!   and its [`ParserOptions`]. Each call to [`Parser::parse`] rewinds the
//!   pool and reads one value; the returned [`Value`] borrows the parser, so
//!   it cannot be held across the next `parse`, `reset` or `destroy`.
//! - Objects and arrays are handled here; every other value is handed to the
//!   tokenizer, which stops on the byte that terminated the scalar.
//!
//! Cursor discipline
//! - After a string, a literal, an object or an array, the cursor sits on
//!   the last byte of that value and must be stepped past.
//! - After a number it already sits on the byte following the last digit,
//!   since numbers are only recognized as finished when that byte is seen.
//!   [`Session::finish_value`] encodes this asymmetry.
//!
//! Depth
//! - Only containers consume depth. The budget is restored when a container
//!   is closed, so siblings never add up.

mod error;
mod options;

pub use error::{ErrorKind, ParseError};
pub use options::ParserOptions;

use crate::{
    allocator::{Allocator, SystemAllocator},
    arena::{ArenaPool, ArenaStats, ArenaVec},
    source::{ByteSource, SliceSource},
    tokenizer::{self, Scalar},
    value::{Object, Value},
};

/// A [`ByteSource`] that counts lines and columns as it advances.
#[derive(Debug)]
struct Cursor<S> {
    source: S,
    line: usize,
    column: usize,
}

impl<S: ByteSource> Cursor<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            line: 0,
            column: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.has_next().then(|| self.source.current())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.advance();
        }
    }
}

impl<S: ByteSource> ByteSource for Cursor<S> {
    #[inline]
    fn has_next(&self) -> bool {
        self.source.has_next()
    }

    #[inline]
    fn current(&self) -> u8 {
        self.source.current()
    }

    #[inline]
    fn advance(&mut self) {
        if self.source.current() == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        self.source.advance();
    }
}

/// A JSON parser over a [`ByteSource`], allocating through `A`.
///
/// # Examples
///
/// ```
/// use bumpjson::{ErrorKind, Parser};
///
/// let mut parser = Parser::from_slice(b"[1, 2,]");
/// let err = parser.parse().unwrap_err();
/// assert_eq!(err.kind, ErrorKind::ArrayTrailingComma);
/// assert_eq!((err.line, err.column), (0, 6));
/// ```
#[derive(Debug)]
pub struct Parser<S, A: Allocator = SystemAllocator> {
    cursor: Cursor<S>,
    pool: ArenaPool<A>,
    options: ParserOptions,
}

impl<'s> Parser<SliceSource<'s>> {
    /// Parser over an in-memory document.
    #[must_use]
    pub fn from_slice(bytes: &'s [u8]) -> Self {
        Self::new(SliceSource::new(bytes))
    }
}

impl<S: ByteSource> Parser<S> {
    /// Parser over `source`, allocating from the global allocator.
    pub fn new(source: S) -> Self {
        Self::with_allocator(source, SystemAllocator)
    }
}

impl<S: ByteSource, A: Allocator> Parser<S, A> {
    /// Parser over `source`, taking every arena region from `allocator`.
    pub fn with_allocator(source: S, allocator: A) -> Self {
        Self {
            cursor: Cursor::new(source),
            pool: ArenaPool::new(allocator),
            options: ParserOptions::default(),
        }
    }

    /// Replaces the options, builder style.
    #[must_use]
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the options for subsequent parses.
    pub fn set_options(&mut self, options: ParserOptions) {
        self.options = options;
    }

    /// The options in effect.
    #[must_use]
    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Sets the size of arena regions acquired from now on. A request larger
    /// than this gets a region of its own size plus `bytes`.
    pub fn set_region_size(&mut self, bytes: usize) {
        self.pool.set_region_size(bytes);
    }

    /// Parses one value from the current position of the source.
    ///
    /// Arena regions from the previous parse are reused, which is why the
    /// previous value must be gone before this is called. Without
    /// [`streaming`](ParserOptions::streaming), anything but whitespace after
    /// the value is an error; with it, the next call continues right after
    /// the value.
    ///
    /// # Errors
    ///
    /// The first problem found, with the position of the cursor at that
    /// point. Nothing of a partially parsed document is returned.
    pub fn parse(&mut self) -> Result<Value<'_>, ParseError> {
        self.pool.rewind();
        let Self {
            cursor,
            pool,
            options,
        } = self;
        let options = *options;

        let mut session = Session {
            cursor: &mut *cursor,
            pool,
            remaining_depth: options.max_depth,
        };
        session.parse_document(options.streaming).map_err(|kind| {
            let err = ParseError {
                kind,
                line: cursor.line,
                column: cursor.column,
            };
            log::debug!("parse failed: {err}");
            #[cfg(any(test, feature = "fuzzing"))]
            if options.panic_on_error {
                panic!("{err}");
            }
            err
        })
    }

    /// Zero-based line of the cursor.
    #[must_use]
    pub fn line(&self) -> usize {
        self.cursor.line
    }

    /// Zero-based column of the cursor.
    #[must_use]
    pub fn column(&self) -> usize {
        self.cursor.column
    }

    /// The underlying source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.cursor.source
    }

    /// Memory currently held by the arena pool.
    #[must_use]
    pub fn arena_stats(&self) -> ArenaStats {
        self.pool.stats()
    }

    /// Returns every arena region to the allocator and zeroes the line and
    /// column counters. The source and options are kept.
    pub fn reset(&mut self) {
        log::trace!("resetting parser at {}:{}", self.line(), self.column());
        self.pool.release_all();
        self.cursor.line = 0;
        self.cursor.column = 0;
    }

    /// Resets the parser and drops it.
    pub fn destroy(mut self) {
        self.reset();
    }
}

/// State of one call to [`Parser::parse`].
struct Session<'p, 'a, S, A: Allocator> {
    cursor: &'p mut Cursor<S>,
    pool: &'a ArenaPool<A>,
    remaining_depth: Option<usize>,
}

impl<'a, S: ByteSource, A: Allocator> Session<'_, 'a, S, A> {
    fn parse_document(&mut self, streaming: bool) -> Result<Value<'a>, ErrorKind> {
        let value = self.parse_value()?;
        self.finish_value(&value);
        if !streaming {
            self.cursor.skip_whitespace();
            if self.cursor.has_next() {
                return Err(ErrorKind::TrailingContent);
            }
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<Value<'a>, ErrorKind> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Err(ErrorKind::UnexpectedEnd),
            Some(b'{') => self.nested(Self::parse_object),
            Some(b'[') => self.nested(Self::parse_array),
            Some(_) => Ok(match tokenizer::scan(&mut *self.cursor, self.pool)? {
                Scalar::Null => Value::Null,
                Scalar::Boolean(b) => Value::Boolean(b),
                Scalar::Number(n) => Value::Number(n),
                Scalar::String(s) => Value::String(s),
            }),
        }
    }

    /// Steps past the last byte of `value`, unless it was a number.
    fn finish_value(&mut self, value: &Value<'a>) {
        if !value.is_number() {
            self.cursor.advance();
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Value<'a>, ErrorKind>,
    ) -> Result<Value<'a>, ErrorKind> {
        let saved = self.remaining_depth;
        if let Some(depth) = saved {
            if depth == 0 {
                return Err(ErrorKind::OutOfMemory);
            }
            self.remaining_depth = Some(depth - 1);
        }
        let result = parse(self);
        self.remaining_depth = saved;
        result
    }

    fn parse_object(&mut self) -> Result<Value<'a>, ErrorKind> {
        if self.cursor.peek() != Some(b'{') {
            return Err(ErrorKind::ObjectCurlyStart);
        }
        self.cursor.advance();
        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some(b'}') {
            return Ok(Value::Object(Object::new(&[], &[])));
        }

        let mut keys = ArenaVec::new();
        let mut values = ArenaVec::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => return Err(ErrorKind::UnexpectedEnd),
                Some(b'"') => {}
                // Only reachable right after a comma.
                Some(b'}') => return Err(ErrorKind::ObjectTrailingComma),
                Some(_) => return Err(ErrorKind::KeyNotString),
            }
            let Scalar::String(key) = tokenizer::scan(&mut *self.cursor, self.pool)? else {
                return Err(ErrorKind::Unreachable);
            };
            self.cursor.advance();

            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => return Err(ErrorKind::UnexpectedEnd),
                Some(b':') => self.cursor.advance(),
                Some(_) => return Err(ErrorKind::ColonNotFound),
            }
            self.cursor.skip_whitespace();
            if self.cursor.peek() == Some(b':') {
                return Err(ErrorKind::MultipleColons);
            }

            let value = self.parse_value()?;
            self.finish_value(&value);
            keys.push(self.pool, key)?;
            values.push(self.pool, value)?;

            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => return Err(ErrorKind::UnexpectedEnd),
                Some(b',') => self.cursor.advance(),
                Some(b'}') => break,
                Some(_) => return Err(ErrorKind::ObjectValueEnd),
            }
        }
        Ok(Value::Object(Object::new(
            keys.into_slice(),
            values.into_slice(),
        )))
    }

    fn parse_array(&mut self) -> Result<Value<'a>, ErrorKind> {
        self.cursor.advance();
        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some(b']') {
            return Ok(Value::Array(&[]));
        }

        let mut elements = ArenaVec::new();
        loop {
            self.cursor.skip_whitespace();
            if matches!(self.cursor.peek(), Some(b',' | b']')) {
                return Err(ErrorKind::ArrayTrailingComma);
            }
            let value = self.parse_value()?;
            self.finish_value(&value);
            elements.push(self.pool, value)?;

            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => return Err(ErrorKind::UnexpectedEnd),
                Some(b',') => self.cursor.advance(),
                Some(b']') => break,
                Some(_) => return Err(ErrorKind::ArrayValueEnd),
            }
        }
        Ok(Value::Array(elements.into_slice()))
    }
}
