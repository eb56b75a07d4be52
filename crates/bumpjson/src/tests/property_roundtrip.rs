use alloc::{string::String, vec::Vec};

use quickcheck::{QuickCheck, TestResult};
use quickcheck_macros::quickcheck;

use super::arbitrary::{Json, escape_all};
use crate::{IterSource, Parser, ParserOptions};

fn tests() -> u64 {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;
    tests
}

/// Property: rendering a tree to JSON text and parsing it back yields the
/// same tree, compact or with whitespace between every token.
#[test]
fn render_then_parse_roundtrip() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(json: Json, pretty: bool) -> bool {
        let text = json.render(pretty);
        let mut parser = Parser::from_slice(text.as_bytes());
        match parser.parse() {
            Ok(value) => json.matches(value),
            Err(_) => false,
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Json, bool) -> bool);
}

/// Property: the pull-based iterator source and the slice source agree.
#[test]
fn iterator_source_matches_slice_source() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(json: Json) -> bool {
        let text = json.render(true);
        let mut parser = Parser::new(IterSource::new(text.bytes()));
        parser.parse().is_ok_and(|value| json.matches(value))
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Json) -> bool);
}

/// Property: with streaming enabled, concatenated documents come back one
/// per call, in order.
#[test]
fn streaming_reads_concatenated_documents() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(docs: Vec<Json>) -> bool {
        let text: String = docs
            .iter()
            .map(|d| d.render(false))
            .collect::<Vec<_>>()
            .join(" ");
        let mut parser = Parser::from_slice(text.as_bytes()).with_options(ParserOptions {
            streaming: true,
            ..ParserOptions::default()
        });
        docs.iter()
            .all(|doc| parser.parse().is_ok_and(|value| doc.matches(value)))
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Vec<Json>) -> bool);
}

/// Property: escaping every character as `\u` units decodes to the same
/// bytes as the direct UTF-8 encoding.
#[quickcheck]
#[allow(clippy::needless_pass_by_value)]
fn unicode_escapes_decode_to_utf8(s: String) -> TestResult {
    let text = escape_all(&s);
    let mut parser = Parser::from_slice(text.as_bytes());
    match parser.parse() {
        Ok(value) => TestResult::from_bool(value.as_str() == Some(s.as_str())),
        Err(err) => TestResult::error(alloc::format!("{err} for {text}")),
    }
}
