#![expect(missing_docs)]

use core::fmt::Write;

use bumpjson::{Parser, ParserOptions};

fn render_errors(inputs: &[&str]) -> String {
    let mut out = String::new();
    for input in inputs {
        let mut parser = Parser::from_slice(input.as_bytes());
        let err = parser.parse().expect_err("input should be rejected");
        writeln!(out, "{input:?} -> {err}").unwrap();
    }
    out
}

fn render_stream(input: &str) -> String {
    let mut parser = Parser::from_slice(input.as_bytes()).with_options(ParserOptions {
        streaming: true,
        ..ParserOptions::default()
    });
    let mut out = String::new();
    loop {
        match parser.parse() {
            Ok(value) => writeln!(out, "{value}").unwrap(),
            Err(err) => {
                writeln!(out, "error: {err}").unwrap();
                break;
            }
        }
    }
    out
}

#[test]
fn snapshot_compact_rendering() {
    let mut parser = Parser::from_slice(
        br#"{
            "name" : "bump\tjson",
            "list": [ 1, -2.5, 3e2, true, false, null ],
            "nested": {"empty": {}, "none": []},
            "quote": "say \"hi\"\n"
        }"#,
    );
    let value = parser.parse().unwrap();
    insta::assert_snapshot!(value.to_string(), @r#"{"name":"bump\tjson","list":[1,-2.5,300,true,false,null],"nested":{"empty":{},"none":[]},"quote":"say \"hi\"\n"}"#);
}

#[test]
fn snapshot_debug_tree() {
    let mut parser = Parser::from_slice(br#"{"a": [null, true], "b": "x", "a": 1}"#);
    let value = parser.parse().unwrap();
    insta::assert_snapshot!(format!("{value:?}"), @r#"Object({"a": Array([Null, Boolean(true)]), "b": String("x"), "a": Number(1.0)})"#);
}

#[test]
fn snapshot_error_reports() {
    let inputs = [
        "",
        "+1",
        "nUll",
        "[1,,2]",
        "[1 2]",
        r#"{"a" 1}"#,
        "1 2",
    ];
    insta::assert_snapshot!(render_errors(&inputs), @r#"
    "" -> unexpected end of input at 0:0
    "+1" -> numbers cannot start with '+' at 0:0
    "nUll" -> expected 'null' at 0:1
    "[1,,2]" -> trailing commas are not allowed in arrays at 0:3
    "[1 2]" -> array elements can only be followed by ',' or ']' at 0:3
    "{\"a\" 1}" -> colon not found between key and value at 0:5
    "1 2" -> unexpected content after the value at 0:2
    "#);
}

#[test]
fn snapshot_streamed_documents() {
    insta::assert_snapshot!(render_stream("{\"k\":[1,2]} \"s\"\n7 [] null"), @r#"
    {"k":[1,2]}
    "s"
    7
    []
    null
    error: unexpected end of input at 1:9
    "#);
}
