//! The `(state, byte) -> transition` table, computed at compile time.
#![allow(clippy::cast_lossless, clippy::enum_glob_use)]

use super::State::{self, *};
use crate::parser::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    To(State),
    Fail(ErrorKind),
}

type Table = [[Transition; 256]; State::COUNT];

pub(crate) static TRANSITIONS: Table = build();

const fn fill(t: &mut Table, from: State, lo: u8, hi: u8, to: Transition) {
    let mut byte = lo as usize;
    while byte <= hi as usize {
        t[from as usize][byte] = to;
        byte += 1;
    }
}

const fn set(t: &mut Table, from: State, byte: u8, to: Transition) {
    fill(t, from, byte, byte, to);
}

const fn fill_all(t: &mut Table, from: State, to: Transition) {
    fill(t, from, 0x00, 0xFF, to);
}

const fn hex(t: &mut Table, from: State, to: Transition) {
    fill(t, from, b'0', b'9', to);
    fill(t, from, b'a', b'f', to);
    fill(t, from, b'A', b'F', to);
}

const fn digits(t: &mut Table, from: State, to: Transition) {
    fill(t, from, b'0', b'9', to);
}

const fn exponent_marker(t: &mut Table, from: State, to: Transition) {
    set(t, from, b'e', to);
    set(t, from, b'E', to);
}

/// Bytes that may follow a complete number.
const fn number_end(t: &mut Table, from: State) {
    let to = Transition::To(NumEnd);
    set(t, from, b' ', to);
    set(t, from, b'\t', to);
    set(t, from, b'\r', to);
    set(t, from, b'\n', to);
    set(t, from, b',', to);
    set(t, from, b']', to);
    set(t, from, b'}', to);
}

/// Transitions out of a state that sits between two characters of a string.
const fn string_content(t: &mut Table, from: State) {
    use Transition::{Fail, To};

    fill_all(t, from, Fail(ErrorKind::InvalidUtf8));
    fill(t, from, 0x00, 0x1F, Fail(ErrorKind::ControlCharacter));
    fill(t, from, 0x20, 0x7F, To(StrChar));
    set(t, from, b'"', To(StrEnd));
    set(t, from, b'\\', To(EscBegin));

    fill(t, from, 0xC2, 0xDF, To(Utf2Lead));
    set(t, from, 0xE0, To(Utf3LeadE0));
    fill(t, from, 0xE1, 0xEC, To(Utf3Lead));
    set(t, from, 0xED, To(Utf3LeadED));
    fill(t, from, 0xEE, 0xEF, To(Utf3Lead));
    set(t, from, 0xF0, To(Utf4LeadF0));
    fill(t, from, 0xF1, 0xF3, To(Utf4Lead));
    set(t, from, 0xF4, To(Utf4LeadF4));
}

/// One continuation byte in `lo..=hi`, anything else is malformed UTF-8.
const fn continuation(t: &mut Table, from: State, lo: u8, hi: u8, to: State) {
    fill_all(t, from, Transition::Fail(ErrorKind::InvalidUtf8));
    fill(t, from, lo, hi, Transition::To(to));
}

/// An exact spelling step of `null`, `true` or `false`.
const fn literal(t: &mut Table, from: State, byte: u8, to: State, err: ErrorKind) {
    fill_all(t, from, Transition::Fail(err));
    set(t, from, byte, Transition::To(to));
}

const fn build() -> Table {
    use ErrorKind as E;
    use Transition::{Fail, To};

    let mut t = [[Fail(E::Unreachable); 256]; State::COUNT];

    // Dispatch on the first byte of a scalar.
    fill_all(&mut t, Start, Fail(E::InvalidStart));
    set(&mut t, Start, b'n', To(NullN));
    set(&mut t, Start, b't', To(TrueT));
    set(&mut t, Start, b'f', To(FalseF));
    set(&mut t, Start, b'"', To(StrBegin));
    set(&mut t, Start, b'-', To(NumMinus));
    set(&mut t, Start, b'0', To(NumZero));
    fill(&mut t, Start, b'1', b'9', To(NumInteger));
    set(&mut t, Start, b'+', Fail(E::PlusSign));
    set(&mut t, Start, b'.', Fail(E::NoDigitBeforePoint));
    exponent_marker(&mut t, Start, Fail(E::NoDigitBeforeExponent));

    literal(&mut t, NullN, b'u', NullU, E::ExpectedNull);
    literal(&mut t, NullU, b'l', NullL, E::ExpectedNull);
    literal(&mut t, NullL, b'l', Null, E::ExpectedNull);

    literal(&mut t, TrueT, b'r', TrueR, E::ExpectedTrue);
    literal(&mut t, TrueR, b'u', TrueU, E::ExpectedTrue);
    literal(&mut t, TrueU, b'e', True, E::ExpectedTrue);

    literal(&mut t, FalseF, b'a', FalseA, E::ExpectedFalse);
    literal(&mut t, FalseA, b'l', FalseL, E::ExpectedFalse);
    literal(&mut t, FalseL, b's', FalseS, E::ExpectedFalse);
    literal(&mut t, FalseS, b'e', False, E::ExpectedFalse);

    // Strings.
    string_content(&mut t, StrBegin);
    string_content(&mut t, StrChar);
    string_content(&mut t, EscChar);
    string_content(&mut t, Hex4);
    string_content(&mut t, LowHex4);

    continuation(&mut t, Utf2Lead, 0x80, 0xBF, StrChar);
    continuation(&mut t, Utf3Lead, 0x80, 0xBF, Utf3Mid);
    continuation(&mut t, Utf3LeadE0, 0xA0, 0xBF, Utf3Mid);
    continuation(&mut t, Utf3LeadED, 0x80, 0x9F, Utf3Mid);
    continuation(&mut t, Utf3Mid, 0x80, 0xBF, StrChar);
    continuation(&mut t, Utf4Lead, 0x80, 0xBF, Utf4Mid1);
    continuation(&mut t, Utf4LeadF0, 0x90, 0xBF, Utf4Mid1);
    continuation(&mut t, Utf4LeadF4, 0x80, 0x8F, Utf4Mid1);
    continuation(&mut t, Utf4Mid1, 0x80, 0xBF, Utf4Mid2);
    continuation(&mut t, Utf4Mid2, 0x80, 0xBF, StrChar);

    // Escapes.
    fill_all(&mut t, EscBegin, Fail(E::InvalidEscape));
    set(&mut t, EscBegin, b'"', To(EscChar));
    set(&mut t, EscBegin, b'\\', To(EscChar));
    set(&mut t, EscBegin, b'/', To(EscChar));
    set(&mut t, EscBegin, b'b', To(EscChar));
    set(&mut t, EscBegin, b'f', To(EscChar));
    set(&mut t, EscBegin, b'n', To(EscChar));
    set(&mut t, EscBegin, b'r', To(EscChar));
    set(&mut t, EscBegin, b't', To(EscChar));
    set(&mut t, EscBegin, b'u', To(EscU));

    fill_all(&mut t, EscU, Fail(E::InvalidUnicodeEscape));
    hex(&mut t, EscU, To(Hex1));
    set(&mut t, EscU, b'd', To(SurrogateLead));
    set(&mut t, EscU, b'D', To(SurrogateLead));

    fill_all(&mut t, SurrogateLead, Fail(E::InvalidUnicodeEscape));
    fill(&mut t, SurrogateLead, b'0', b'7', To(Hex2));
    fill(&mut t, SurrogateLead, b'8', b'9', To(HighHex2));
    fill(&mut t, SurrogateLead, b'a', b'b', To(HighHex2));
    fill(&mut t, SurrogateLead, b'A', b'B', To(HighHex2));
    fill(&mut t, SurrogateLead, b'c', b'f', Fail(E::LoneSurrogate));
    fill(&mut t, SurrogateLead, b'C', b'F', Fail(E::LoneSurrogate));

    fill_all(&mut t, Hex1, Fail(E::InvalidUnicodeEscape));
    hex(&mut t, Hex1, To(Hex2));
    fill_all(&mut t, Hex2, Fail(E::InvalidUnicodeEscape));
    hex(&mut t, Hex2, To(Hex3));
    fill_all(&mut t, Hex3, Fail(E::InvalidUnicodeEscape));
    hex(&mut t, Hex3, To(Hex4));

    fill_all(&mut t, HighHex2, Fail(E::InvalidUnicodeEscape));
    hex(&mut t, HighHex2, To(HighHex3));
    fill_all(&mut t, HighHex3, Fail(E::InvalidUnicodeEscape));
    hex(&mut t, HighHex3, To(HighHex4));

    // A high surrogate must be followed by `\uDC00`..`\uDFFF`.
    fill_all(&mut t, HighHex4, Fail(E::UnpairedSurrogate));
    set(&mut t, HighHex4, b'\\', To(LowBackslash));
    fill_all(&mut t, LowBackslash, Fail(E::UnpairedSurrogate));
    set(&mut t, LowBackslash, b'u', To(LowU));
    fill_all(&mut t, LowU, Fail(E::UnpairedSurrogate));
    set(&mut t, LowU, b'd', To(LowHex1));
    set(&mut t, LowU, b'D', To(LowHex1));
    fill_all(&mut t, LowHex1, Fail(E::UnpairedSurrogate));
    fill(&mut t, LowHex1, b'c', b'f', To(LowHex2));
    fill(&mut t, LowHex1, b'C', b'F', To(LowHex2));
    fill_all(&mut t, LowHex2, Fail(E::InvalidUnicodeEscape));
    hex(&mut t, LowHex2, To(LowHex3));
    fill_all(&mut t, LowHex3, Fail(E::InvalidUnicodeEscape));
    hex(&mut t, LowHex3, To(LowHex4));

    // Numbers.
    fill_all(&mut t, NumMinus, Fail(E::NotANumber));
    set(&mut t, NumMinus, b'0', To(NumZero));
    fill(&mut t, NumMinus, b'1', b'9', To(NumInteger));
    set(&mut t, NumMinus, b'.', Fail(E::NoDigitBeforePoint));
    exponent_marker(&mut t, NumMinus, Fail(E::NoDigitBeforeExponent));

    fill_all(&mut t, NumZero, Fail(E::NotANumber));
    digits(&mut t, NumZero, Fail(E::LeadingZeros));
    set(&mut t, NumZero, b'.', To(NumPoint));
    exponent_marker(&mut t, NumZero, To(NumExponent));
    number_end(&mut t, NumZero);

    fill_all(&mut t, NumInteger, Fail(E::NotANumber));
    digits(&mut t, NumInteger, To(NumInteger));
    set(&mut t, NumInteger, b'.', To(NumPoint));
    exponent_marker(&mut t, NumInteger, To(NumExponent));
    number_end(&mut t, NumInteger);

    fill_all(&mut t, NumPoint, Fail(E::NotANumber));
    digits(&mut t, NumPoint, To(NumFraction));
    set(&mut t, NumPoint, b'.', Fail(E::DoublePoint));
    exponent_marker(&mut t, NumPoint, Fail(E::NoDigitBeforeExponent));

    fill_all(&mut t, NumFraction, Fail(E::NotANumber));
    digits(&mut t, NumFraction, To(NumFraction));
    set(&mut t, NumFraction, b'.', Fail(E::DoublePoint));
    exponent_marker(&mut t, NumFraction, To(NumExponent));
    number_end(&mut t, NumFraction);

    fill_all(&mut t, NumExponent, Fail(E::NotANumber));
    digits(&mut t, NumExponent, To(NumExpDigit));
    set(&mut t, NumExponent, b'+', To(NumExpPlus));
    set(&mut t, NumExponent, b'-', To(NumExpMinus));
    exponent_marker(&mut t, NumExponent, Fail(E::DoubleExponent));

    fill_all(&mut t, NumExpPlus, Fail(E::NotANumber));
    digits(&mut t, NumExpPlus, To(NumExpDigit));
    exponent_marker(&mut t, NumExpPlus, Fail(E::DoubleExponent));

    fill_all(&mut t, NumExpMinus, Fail(E::NotANumber));
    digits(&mut t, NumExpMinus, To(NumExpDigit));
    exponent_marker(&mut t, NumExpMinus, Fail(E::DoubleExponent));

    fill_all(&mut t, NumExpDigit, Fail(E::NotANumber));
    digits(&mut t, NumExpDigit, To(NumExpDigit));
    exponent_marker(&mut t, NumExpDigit, Fail(E::DoubleExponent));
    number_end(&mut t, NumExpDigit);

    t
}
