//! Pull-style byte sources with one byte of lookahead.

/// A forward-only cursor over the input bytes.
///
/// The parser only ever looks at the byte under the cursor; there is no
/// seeking and no rewinding. [`advance`](ByteSource::advance) is called only
/// after [`has_next`](ByteSource::has_next) returned `true` at the current
/// position, and [`current`](ByteSource::current) likewise.
pub trait ByteSource {
    /// Whether a byte is available at the cursor.
    fn has_next(&self) -> bool;

    /// The byte at the cursor.
    fn current(&self) -> u8;

    /// Moves the cursor one byte forward.
    fn advance(&mut self);
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    #[inline]
    fn current(&self) -> u8 {
        (**self).current()
    }

    #[inline]
    fn advance(&mut self) {
        (**self).advance();
    }
}

/// In-memory source over a byte slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'s> {
    bytes: &'s [u8],
    position: usize,
}

impl<'s> SliceSource<'s> {
    /// Starts reading at the beginning of `bytes`.
    #[must_use]
    pub fn new(bytes: &'s [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'s [u8] {
        &self.bytes[self.position..]
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn has_next(&self) -> bool {
        self.position < self.bytes.len()
    }

    #[inline]
    fn current(&self) -> u8 {
        self.bytes[self.position]
    }

    #[inline]
    fn advance(&mut self) {
        self.position += 1;
    }
}

/// Source over any byte iterator, holding the next byte as lookahead.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
    lookahead: Option<u8>,
}

impl<I: Iterator<Item = u8>> IterSource<I> {
    /// Wraps `iter`, pulling its first byte immediately.
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        let mut iter = iter.into_iter();
        let lookahead = iter.next();
        Self { iter, lookahead }
    }
}

impl<I: Iterator<Item = u8>> ByteSource for IterSource<I> {
    #[inline]
    fn has_next(&self) -> bool {
        self.lookahead.is_some()
    }

    #[inline]
    fn current(&self) -> u8 {
        self.lookahead
            .expect("`current` called on an exhausted source")
    }

    #[inline]
    fn advance(&mut self) {
        self.lookahead = self.iter.next();
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn drain(mut source: impl ByteSource) -> Vec<u8> {
        let mut out = Vec::new();
        while source.has_next() {
            out.push(source.current());
            source.advance();
        }
        out
    }

    #[test]
    fn slice_source_yields_every_byte() {
        assert_eq!(drain(SliceSource::new(b"[1, 2]")), b"[1, 2]");
    }

    #[test]
    fn slice_source_tracks_position() {
        let mut source = SliceSource::new(b"abc");
        source.advance();
        assert_eq!(source.position(), 1);
        assert_eq!(source.remaining(), b"bc");
    }

    #[test]
    fn iter_source_matches_slice_source() {
        let input = b"{\"k\": null}";
        assert_eq!(
            drain(IterSource::new(input.iter().copied())),
            drain(SliceSource::new(input))
        );
    }

    #[test]
    fn empty_iter_source_has_nothing() {
        let source = IterSource::new(core::iter::empty::<u8>());
        assert!(!source.has_next());
    }
}
