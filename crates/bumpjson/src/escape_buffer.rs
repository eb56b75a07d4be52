//! Accumulation of `\uXXXX` escapes, including surrogate pairs.
//!
//! The tokenizer's states already guarantee the shape of every escape: four
//! hex digits, and for a high surrogate (`D800..=DBFF`) an immediately
//! following `\uDC00..=\uDFFF`. This buffer only does the arithmetic: it
//! collects the nibbles of the high (or only) code unit and of the low code
//! unit, then combines them into a [`char`].

#[derive(Debug, Default)]
/// Nibble accumulator for one `\u` escape or one surrogate pair.
pub(crate) struct UnicodeEscapeBuffer {
    high: u16,
    low: u16,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feeds one hex digit of the first code unit.
    pub(crate) fn push_high(&mut self, digit: u8) -> Option<()> {
        self.high = (self.high << 4) | u16::from(hex_value(digit)?);
        Some(())
    }

    /// Feeds one hex digit of the trailing low surrogate.
    pub(crate) fn push_low(&mut self, digit: u8) -> Option<()> {
        self.low = (self.low << 4) | u16::from(hex_value(digit)?);
        Some(())
    }

    /// Decodes a complete non-surrogate code unit and resets the buffer.
    pub(crate) fn take_unit(&mut self) -> Option<char> {
        let unit = core::mem::take(self).high;
        char::from_u32(u32::from(unit))
    }

    /// Decodes a complete surrogate pair and resets the buffer.
    pub(crate) fn take_pair(&mut self) -> Option<char> {
        let Self { high, low } = core::mem::take(self);
        if !(0xD800..=0xDBFF).contains(&high) || !(0xDC00..=0xDFFF).contains(&low) {
            return None;
        }
        let code = 0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
        char::from_u32(code)
    }
}

#[inline]
fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::UnicodeEscapeBuffer;

    fn feed_high(buf: &mut UnicodeEscapeBuffer, digits: &[u8]) {
        for d in digits {
            buf.push_high(*d).unwrap();
        }
    }

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        feed_high(&mut buf, b"0041");
        assert_eq!(buf.take_unit(), Some('A'));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = UnicodeEscapeBuffer::new();
        feed_high(&mut buf, b"AbCd");
        assert_eq!(buf.take_unit(), char::from_u32(0xABCD));
    }

    #[test]
    fn take_resets_the_buffer() {
        let mut buf = UnicodeEscapeBuffer::new();
        feed_high(&mut buf, b"00e9");
        assert_eq!(buf.take_unit(), Some('é'));
        feed_high(&mut buf, b"0062");
        assert_eq!(buf.take_unit(), Some('b'));
    }

    #[test]
    fn surrogate_pair_combines() {
        let mut buf = UnicodeEscapeBuffer::new();
        feed_high(&mut buf, b"d83d");
        for d in b"de00" {
            buf.push_low(*d).unwrap();
        }
        assert_eq!(buf.take_pair(), Some('😀'));
    }

    #[test]
    fn lone_high_unit_does_not_decode() {
        let mut buf = UnicodeEscapeBuffer::new();
        feed_high(&mut buf, b"D800");
        assert_eq!(buf.take_unit(), None);
    }

    #[test]
    fn invalid_hex_is_rejected() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.push_high(b'G'), None);
    }
}
