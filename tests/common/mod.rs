#![allow(dead_code)]

use hcl_lite::format::Format;
use hcl_lite::validate::Diagnostic;
use hcl_lite::{Map, Value};
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;

#[track_caller]
pub fn assert_parse(input: &str, expected: JsonValue) {
    let map = hcl_lite::parse(input).unwrap();
    assert_eq!(serde_json::to_value(map).unwrap(), expected);
}

#[track_caller]
pub fn assert_expr(input: &str, expected: Value) {
    assert_eq!(hcl_lite::parse_expression(input).unwrap(), expected);
}

#[track_caller]
pub fn assert_format<T>(value: T, expected: &str)
where
    T: Format,
{
    assert_eq!(hcl_lite::format::to_string(&value).unwrap(), expected);
}

/// Formats the parse result of `input` and asserts that parsing the output again yields the
/// same map.
#[track_caller]
pub fn assert_roundtrip(input: &str) -> Map<String, Value> {
    let map = hcl_lite::parse(input).unwrap();
    let formatted = hcl_lite::format::to_string(&map).unwrap();
    let reparsed = hcl_lite::parse(&formatted)
        .unwrap_or_else(|err| panic!("failed to parse formatted output:\n{formatted}\n{err}"));
    assert_eq!(reparsed, map);
    map
}

#[track_caller]
pub fn assert_diagnostics(input: &str, expected: &[(&str, usize, usize)]) {
    let diagnostics: Vec<Diagnostic> = hcl_lite::validate(input);
    let found: Vec<_> = diagnostics
        .iter()
        .map(|d| (d.message.as_str(), d.range.from.line, d.range.from.column))
        .collect();
    assert_eq!(found, expected);
}
