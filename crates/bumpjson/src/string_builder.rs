//! Arena-backed accumulator for decoded string bytes.

use core::mem;

use bstr::BStr;

use crate::{
    allocator::Allocator,
    arena::{ArenaPool, OutOfMemory},
};

/// Collects the decoded bytes of one string token.
///
/// The buffer doubles from [`INITIAL_CAPACITY`](Self::INITIAL_CAPACITY) and
/// always keeps a NUL byte after the content, which is not part of the
/// length. [`finish`](Self::finish) hands the bytes over and leaves the
/// builder empty for the next token.
pub(crate) struct StringBuilder<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> StringBuilder<'a> {
    const INITIAL_CAPACITY: usize = 32;

    pub(crate) fn new() -> Self {
        Self {
            buf: Default::default(),
            len: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Appends one byte. On allocation failure the builder resets itself.
    pub(crate) fn push<A: Allocator>(
        &mut self,
        pool: &'a ArenaPool<A>,
        byte: u8,
    ) -> Result<(), OutOfMemory> {
        if self.len + 1 >= self.buf.len() {
            self.grow(pool)?;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        self.buf[self.len] = 0;
        Ok(())
    }

    /// Appends the UTF-8 encoding of `ch`.
    pub(crate) fn push_char<A: Allocator>(
        &mut self,
        pool: &'a ArenaPool<A>,
        ch: char,
    ) -> Result<(), OutOfMemory> {
        let mut utf8 = [0; 4];
        for byte in ch.encode_utf8(&mut utf8).bytes() {
            self.push(pool, byte)?;
        }
        Ok(())
    }

    fn grow<A: Allocator>(&mut self, pool: &'a ArenaPool<A>) -> Result<(), OutOfMemory> {
        let capacity = if self.buf.is_empty() {
            Self::INITIAL_CAPACITY
        } else {
            self.buf.len().checked_mul(2).ok_or(OutOfMemory)?
        };
        let grown = match pool.alloc_zeroed(capacity) {
            Ok(grown) => grown,
            Err(err) => {
                *self = Self::new();
                return Err(err);
            }
        };
        grown[..self.len].copy_from_slice(&self.buf[..self.len]);
        self.buf = grown;
        Ok(())
    }

    /// Transfers the accumulated bytes to the caller.
    pub(crate) fn finish(&mut self) -> &'a BStr {
        let len = mem::take(&mut self.len);
        let buf: &'a mut [u8] = mem::take(&mut self.buf);
        BStr::new(&buf[..len])
    }
}
