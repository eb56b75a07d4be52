#![no_main]

use arbitrary::Arbitrary;
use bumpjson::{IterSource, Parser, ParserOptions, Value};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    streaming: bool,
    max_depth: Option<u8>,
    region_size: u16,
    from_iter: bool,
    data: Vec<u8>,
}

fn options(input: &Input) -> ParserOptions {
    ParserOptions {
        streaming: input.streaming,
        max_depth: input.max_depth.map(usize::from),
        panic_on_error: false,
    }
}

/// Parses every document in the input, returning how many were accepted.
fn drain<S: bumpjson::ByteSource>(mut parser: Parser<S>, streaming: bool) -> usize {
    let mut accepted = 0;
    // A failed parse leaves the cursor where it stopped, so bound the loop.
    for _ in 0..64 {
        match parser.parse() {
            Ok(value) => {
                accepted += 1;
                check(value);
            }
            Err(_) => break,
        }
        if !streaming {
            break;
        }
    }
    parser.destroy();
    accepted
}

fn check(value: Value<'_>) {
    match value {
        Value::String(s) => assert!(core::str::from_utf8(s).is_ok()),
        Value::Number(n) => assert!(n.is_finite()),
        Value::Array(items) => items.iter().copied().for_each(check),
        Value::Object(obj) => {
            assert_eq!(obj.keys().len(), obj.values().len());
            for (key, value) in obj.iter() {
                assert!(core::str::from_utf8(key).is_ok());
                check(value);
            }
        }
        Value::Null | Value::Boolean(_) => {}
    }
    // Rendering must not panic.
    let _ = value.to_string();
}

fuzz_target!(|input: Input| {
    let options = options(&input);
    let accepted = if input.from_iter {
        let mut parser =
            Parser::new(IterSource::new(input.data.iter().copied())).with_options(options);
        parser.set_region_size(usize::from(input.region_size));
        drain(parser, options.streaming)
    } else {
        let mut parser = Parser::from_slice(&input.data).with_options(options);
        parser.set_region_size(usize::from(input.region_size));
        drain(parser, options.streaming)
    };

    // Every document serde_json takes without a depth limit is accepted here.
    if !options.streaming
        && options.max_depth.is_none()
        && serde_json::from_slice::<serde_json::Value>(&input.data).is_ok()
    {
        assert_eq!(
            accepted,
            1,
            "rejected valid JSON: {:?}",
            String::from_utf8_lossy(&input.data)
        );
    }
});
