//! Table-driven scanner for `null`, `true`, `false`, strings and numbers.
//!
//! Each byte is looked up in [`TRANSITIONS`](table::TRANSITIONS) to find the
//! next [`State`]; the side effect of entering that state (appending a byte,
//! accumulating a digit, decoding an escape) then runs in
//! [`Scanner::enter`]. Exactly one byte is consumed per transition.
//!
//! A scan stops on a terminal state with the cursor still on the byte that
//! caused it: the last letter of a literal, the closing quote of a string, or
//! the delimiter after a number. The caller decides whether to step past it.

mod table;

use bstr::BStr;

use crate::{
    allocator::Allocator,
    arena::ArenaPool,
    escape_buffer::UnicodeEscapeBuffer,
    number_builder::NumberBuilder,
    parser::ErrorKind,
    source::ByteSource,
    string_builder::StringBuilder,
};
use table::{TRANSITIONS, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum State {
    Start,

    NullN,
    NullU,
    NullL,
    Null,
    TrueT,
    TrueR,
    TrueU,
    True,
    FalseF,
    FalseA,
    FalseL,
    FalseS,
    False,

    StrBegin,
    /// A byte that completes a character.
    StrChar,
    Utf2Lead,
    Utf3Lead,
    Utf3LeadE0,
    Utf3LeadED,
    Utf3Mid,
    Utf4Lead,
    Utf4LeadF0,
    Utf4LeadF4,
    Utf4Mid1,
    Utf4Mid2,
    EscBegin,
    EscChar,
    EscU,
    Hex1,
    Hex2,
    Hex3,
    Hex4,
    /// `\uD` or `\ud`: a surrogate or a plain `D000..=D7FF` unit.
    SurrogateLead,
    HighHex2,
    HighHex3,
    HighHex4,
    LowBackslash,
    LowU,
    LowHex1,
    LowHex2,
    LowHex3,
    LowHex4,
    StrEnd,

    NumMinus,
    NumZero,
    NumInteger,
    NumPoint,
    NumFraction,
    NumExponent,
    NumExpPlus,
    NumExpMinus,
    NumExpDigit,
    NumEnd,
}

impl State {
    pub(crate) const COUNT: usize = State::NumEnd as usize + 1;

    /// Number states in which the token may legally stop.
    fn is_complete_number(self) -> bool {
        matches!(
            self,
            State::NumZero | State::NumInteger | State::NumFraction | State::NumExpDigit
        )
    }
}

/// A scalar value read by the scanner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Scalar<'a> {
    Null,
    Boolean(bool),
    Number(f64),
    String(&'a BStr),
}

struct Scanner<'a, A: Allocator> {
    pool: &'a ArenaPool<A>,
    string: StringBuilder<'a>,
    number: NumberBuilder,
    escape: UnicodeEscapeBuffer,
}

impl<'a, A: Allocator> Scanner<'a, A> {
    fn new(pool: &'a ArenaPool<A>) -> Self {
        Self {
            pool,
            string: StringBuilder::new(),
            number: NumberBuilder::new(),
            escape: UnicodeEscapeBuffer::new(),
        }
    }

    /// Side effect of entering `state` on `byte`.
    #[allow(clippy::enum_glob_use)]
    fn enter(&mut self, state: State, byte: u8) -> Result<(), ErrorKind> {
        use State::*;

        match state {
            StrChar | Utf2Lead | Utf3Lead | Utf3LeadE0 | Utf3LeadED | Utf3Mid | Utf4Lead
            | Utf4LeadF0 | Utf4LeadF4 | Utf4Mid1 | Utf4Mid2 => self.string.push(self.pool, byte)?,
            EscChar => self.string.push(self.pool, unescape(byte))?,
            Hex1 | Hex2 | Hex3 | SurrogateLead | HighHex2 | HighHex3 | HighHex4 => {
                self.escape
                    .push_high(byte)
                    .ok_or(ErrorKind::InvalidUnicodeEscape)?;
            }
            Hex4 => {
                self.escape
                    .push_high(byte)
                    .ok_or(ErrorKind::InvalidUnicodeEscape)?;
                let ch = self.escape.take_unit().ok_or(ErrorKind::LoneSurrogate)?;
                self.string.push_char(self.pool, ch)?;
            }
            LowHex1 | LowHex2 | LowHex3 => {
                self.escape
                    .push_low(byte)
                    .ok_or(ErrorKind::InvalidUnicodeEscape)?;
            }
            LowHex4 => {
                self.escape
                    .push_low(byte)
                    .ok_or(ErrorKind::InvalidUnicodeEscape)?;
                let ch = self.escape.take_pair().ok_or(ErrorKind::UnpairedSurrogate)?;
                self.string.push_char(self.pool, ch)?;
            }
            NumMinus => self.number.set_negative(),
            NumZero | NumInteger => self.number.push_integer(byte),
            NumFraction => self.number.push_decimal(byte),
            NumExpMinus => self.number.set_exponent_negative(),
            NumExpDigit => self.number.push_exponent(byte),
            _ => {}
        }
        Ok(())
    }

    /// The finished scalar if `state` is terminal.
    fn accept(&mut self, state: State) -> Option<Scalar<'a>> {
        Some(match state {
            State::Null => Scalar::Null,
            State::True => Scalar::Boolean(true),
            State::False => Scalar::Boolean(false),
            State::StrEnd => Scalar::String(self.string.finish()),
            State::NumEnd => Scalar::Number(self.number.to_f64()),
            _ => return None,
        })
    }

    /// Numbers have no closing delimiter, so input may end inside one.
    fn end_of_input(&self, state: State) -> Result<Scalar<'a>, ErrorKind> {
        if state.is_complete_number() {
            Ok(Scalar::Number(self.number.to_f64()))
        } else if self.number.has_digits() {
            Err(ErrorKind::NotANumber)
        } else {
            Err(ErrorKind::UnexpectedEnd)
        }
    }
}

fn unescape(byte: u8) -> u8 {
    match byte {
        b'b' => 0x08,
        b'f' => 0x0C,
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        other => other,
    }
}

/// Reads one scalar starting at the cursor.
///
/// String bytes are copied into `pool`. On success the cursor is left on
/// the terminating byte (see the module docs); on failure it is left on the
/// byte that was rejected.
pub(crate) fn scan<'a, S, A>(source: &mut S, pool: &'a ArenaPool<A>) -> Result<Scalar<'a>, ErrorKind>
where
    S: ByteSource + ?Sized,
    A: Allocator,
{
    let mut scanner = Scanner::new(pool);
    let mut state = State::Start;
    loop {
        if !source.has_next() {
            return scanner.end_of_input(state);
        }
        let byte = source.current();
        state = match TRANSITIONS[state as usize][usize::from(byte)] {
            Transition::To(next) => next,
            Transition::Fail(kind) => return Err(kind),
        };
        if let Some(scalar) = scanner.accept(state) {
            return Ok(scalar);
        }
        scanner.enter(state, byte)?;
        source.advance();
    }
}
