use super::*;
use crate::structure::{Attribute, Block, BlockLabel, Structure};
use crate::Number;
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::json;

#[track_caller]
fn expect_kinds(input: &str, expected: &[TokenKind]) {
    let kinds: Vec<_> = tokenize(input).unwrap().iter().map(|t| t.kind).collect();
    assert_eq!(kinds, expected);
}

#[track_caller]
fn expect_expr(input: &str, expected: Value) {
    assert_eq!(parse_expression(input).unwrap(), expected);
}

#[track_caller]
fn expect_json(input: &str, expected: serde_json::Value) {
    let map = parse(input).unwrap();
    assert_eq!(serde_json::to_value(map).unwrap(), expected);
}

fn float(f: f64) -> Value {
    Value::Number(Number::Float(f))
}

fn reference(path: &str) -> Value {
    Value::Reference(path.to_owned())
}

#[test]
fn lex_punctuation_and_operators() {
    use TokenKind::*;

    expect_kinds(
        "{ } [ ] ( ) , . : => ... = + - * / % == != < <= > >= && || ! ?",
        &[
            LeftBrace,
            RightBrace,
            LeftBracket,
            RightBracket,
            LeftParen,
            RightParen,
            Comma,
            Dot,
            Colon,
            Arrow,
            Ellipsis,
            Equals,
            Plus,
            Minus,
            Star,
            Slash,
            Percent,
            EqualEqual,
            NotEqual,
            Less,
            LessEqual,
            Greater,
            GreaterEqual,
            And,
            Or,
            Not,
            Question,
            Eof,
        ],
    );
}

#[test]
fn lex_keywords_and_identifiers() {
    use TokenKind::*;

    expect_kinds(
        "true false null for in if _an-id3nt1fieR",
        &[Bool, Bool, Null, For, In, If, Identifier, Eof],
    );
}

#[test]
fn lex_positions() {
    let tokens = tokenize("a = 1\n  b = \"ü\"\n").unwrap();

    let positions: Vec<_> = tokens.iter().map(|t| (t.kind, t.line, t.column)).collect();

    assert_eq!(
        positions,
        [
            (TokenKind::Identifier, 1, 1),
            (TokenKind::Equals, 1, 3),
            (TokenKind::Number, 1, 5),
            (TokenKind::Newline, 1, 6),
            (TokenKind::Identifier, 2, 3),
            (TokenKind::Equals, 2, 5),
            (TokenKind::String, 2, 7),
            (TokenKind::Newline, 2, 10),
            (TokenKind::Eof, 3, 1),
        ]
    );
}

#[test]
fn lex_numbers() {
    let values = |input: &str| -> Vec<String> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.value)
            .collect()
    };

    assert_eq!(
        values("42, -7, 1.5, 12e+10, 3E-2, 1.2.3"),
        ["42", "-7", "1.5", "12e+10", "3E-2", "1.2.3"]
    );

    // A minus after an operand is the subtraction operator.
    expect_kinds(
        "5-3",
        &[TokenKind::Number, TokenKind::Minus, TokenKind::Number, TokenKind::Eof],
    );
    // The exponent needs at least one digit.
    expect_kinds(
        "1e",
        &[TokenKind::Number, TokenKind::Identifier, TokenKind::Eof],
    );
    // Legacy index access never has a fraction.
    assert_eq!(values("list.0.1"), ["0", "1"]);
}

#[test]
fn lex_strings() {
    let tokens = tokenize(r#""a\n\t\"b\" \$ \q" "x ${var.a} y" "$${literal}""#).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "a\n\t\"b\" $ \\q");
    assert_eq!(tokens[1].kind, TokenKind::Interpolation);
    assert_eq!(tokens[1].value, "x ${var.a} y");
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].value, "$${literal}");
}

#[test]
fn lex_nested_interpolation() {
    let tokens = tokenize(r#""${merge({a = "}"}, {})} done""#).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Interpolation);
    assert_eq!(tokens[0].value, r#"${merge({a = "}"}, {})} done"#);
    assert_eq!(tokens[1].kind, TokenKind::Eof);
}

#[test]
fn lex_comments() {
    let tokens = tokenize("# hash\n// slashes\n/* block\ncomment */ a").unwrap();

    let comments: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Comment)
        .map(|t| t.value.as_str())
        .collect();

    assert_eq!(comments, ["hash", "slashes", "block\ncomment"]);
    assert_eq!(tokens.last().map(|t| t.line), Some(4));
}

#[test]
fn lex_heredocs() {
    let tokens = tokenize("<<EOT\n  Foo\n  Bar\nEOT\n").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Heredoc);
    assert_eq!(tokens[0].value, "  Foo\n  Bar\n");
    assert_eq!(tokens[1].kind, TokenKind::Newline);

    let tokens = tokenize("<<-EOT\n    Foo\n      Bar\n\n    Baz\n  EOT").unwrap();
    assert_eq!(tokens[0].value, "Foo\n  Bar\n\nBaz\n");

    // A line merely starting with the delimiter does not close the heredoc.
    let tokens = tokenize("<<EOT\nEOTX\nEOT").unwrap();
    assert_eq!(tokens[0].value, "EOTX\n");

    let tokens = tokenize("<<EOT\r\nwindows\r\nEOT\r\n").unwrap();
    assert_eq!(tokens[0].value, "windows\n");

    let tokens = tokenize("<<EOT\nEOT").unwrap();
    assert_eq!(tokens[0].value, "");
}

#[test]
fn lex_errors() {
    assert!(matches!(
        tokenize("a = @"),
        Err(Error::UnexpectedCharacter { ch: '@', location }) if location == crate::Location { line: 1, col: 5 }
    ));
    assert!(matches!(
        tokenize("a = \"foo"),
        Err(Error::UnterminatedString { .. })
    ));
    assert!(matches!(
        tokenize("/* foo"),
        Err(Error::UnterminatedComment { .. })
    ));
    assert!(matches!(
        tokenize("a = <<\nfoo\n"),
        Err(Error::MalformedHeredoc { .. })
    ));
    assert!(matches!(
        tokenize("a = <<EOT foo\nEOT"),
        Err(Error::MalformedHeredoc { .. })
    ));
    assert!(matches!(
        tokenize("a = <<EOT\nfoo\n"),
        Err(Error::MalformedHeredoc { .. })
    ));
}

#[test]
fn literals() {
    expect_expr("42", Value::from(42));
    expect_expr("-42", Value::from(-42));
    expect_expr("1.5", float(1.5));
    expect_expr("1e3", float(1000.0));
    expect_expr("true", Value::Bool(true));
    expect_expr("null", Value::Null);
    expect_expr("\"x ${y}\"", Value::from("x ${y}"));
}

#[test]
fn operator_precedence() {
    expect_expr("2 + 3 * 4 > 10 && true || false", Value::Bool(true));
    expect_expr("2 + 3 * 4", float(14.0));
    expect_expr("(2 + 3) * 4", float(20.0));
    expect_expr("10 - 4 - 3", float(3.0));
    expect_expr("7 % 4", float(3.0));
    expect_expr("2 * -3", float(-6.0));
    expect_expr("- 3", float(-3.0));
    expect_expr("!true", Value::Bool(false));
    expect_expr("!!1", Value::Bool(true));
    expect_expr("1 == 1", Value::Bool(true));
    expect_expr("1 == 1.0", Value::Bool(true));
    expect_expr("\"a\" != \"b\"", Value::Bool(true));
    expect_expr("\"abc\" < \"abd\"", Value::Bool(true));
    expect_expr("\"3\" + 4", float(7.0));
    expect_expr("[1] == [1]", Value::Bool(true));
}

#[test]
fn conditionals() {
    expect_expr("true ? 1 : 2", Value::from(1));
    expect_expr("1 > 2 ? \"a\" : \"b\"", Value::from("b"));
    expect_expr("false ? 1 : true ? 2 : 3", Value::from(2));
    expect_expr("false || true ? 1 : 2", Value::from(1));
    expect_expr("true ?\n  1 :\n  2", Value::from(1));
}

#[test]
fn integer_equality() {
    expect_expr("9007199254740993 == 9007199254740992", Value::Bool(false));
    expect_expr("9007199254740993 != 9007199254740992", Value::Bool(true));
    expect_expr("-9007199254740993 == -9007199254740993", Value::Bool(true));
    expect_expr("1 + 1 == 2", Value::Bool(true));
    expect_expr("0 == -0", Value::Bool(true));
}

#[test]
fn division_by_zero() {
    assert!(matches!(
        parse_expression("1 / 0"),
        Err(Error::DivisionByZero { .. })
    ));
    assert!(matches!(
        parse_expression("1 % (2 - 2)"),
        Err(Error::DivisionByZero { .. })
    ));
}

#[test]
fn collections() {
    expect_expr(
        "[1, \"two\",\n  [3],\n]",
        Value::from_iter([Value::from(1), Value::from("two"), Value::from_iter([3])]),
    );

    let value = parse_expression("{\n  a = 1, \"b\": 2\n  3 = true\n  (\"d\") = null\n  a = 4\n}").unwrap();
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        json!({ "a": 4, "b": 2, "3": true, "d": null })
    );

    expect_expr("{}", Value::Object(Map::new()));
    expect_expr("[]", Value::Array(Vec::new()));
}

#[test]
fn function_calls() {
    expect_expr(
        "max(1, 2, x)",
        Value::func_call("max", vec![Value::from(1), Value::from(2), reference("x")]),
    );
    expect_expr("timestamp()", Value::func_call("timestamp", Vec::new()));
    expect_expr(
        "concat(\n  a,\n  b...\n)",
        Value::func_call("concat", vec![reference("a"), reference("b")]),
    );
    expect_expr("upper(\"a\").length", Value::Null);
}

#[test]
fn references() {
    expect_expr("var.region", reference("var.region"));
    expect_expr("aws_instance.web[0].id", reference("aws_instance.web[0].id"));
    expect_expr("local.map[\"key\"]", reference("local.map[\"key\"]"));
    expect_expr("local.map[var.key]", reference("local.map[var.key]"));
    expect_expr("list.0", reference("list[0]"));
    expect_expr("var.list[*].id", Value::from_iter([reference("var.list[*].id")]));
    expect_expr("var.list.*.id", Value::from_iter([reference("var.list.*.id")]));
}

#[test]
fn concrete_access() {
    expect_expr("[1, 2, 3][1]", Value::from(2));
    expect_expr("[1, 2, 3][5]", Value::Null);
    expect_expr("{a = {b = 1}}.a.b", Value::from(1));
    expect_expr("{a = 1}[\"a\"]", Value::from(1));
    expect_expr("{a = 1}.missing", Value::Null);
    expect_expr("[[1, 2], [3]].1", Value::from_iter([3]));
}

#[test]
fn splat_on_concrete_values() {
    expect_expr(
        "[{id = 1}, {id = 2}, {name = \"x\"}][*].id",
        Value::from_iter([Value::from(1), Value::from(2), Value::Null]),
    );
    expect_expr("[1, 2].*", Value::from_iter([1, 2]));
    expect_expr("{id = 1}[*].id", Value::from_iter([1]));
    expect_expr("null[*]", Value::Array(Vec::new()));
}

#[test]
fn for_expressions() {
    expect_expr(
        "[for s in [\"a\", \"b\"] : upper(s)]",
        Value::from_iter([
            Value::func_call("upper", vec![Value::from("a")]),
            Value::func_call("upper", vec![Value::from("b")]),
        ]),
    );
    expect_expr(
        "[for i, v in [10, 20] : i + v]",
        Value::from_iter([float(10.0), float(21.0)]),
    );
    expect_expr(
        "[for k, v in {a = 1, b = 2} : k]",
        Value::from_iter(["a", "b"]),
    );
    expect_expr("[for v in {a = 1, b = 2} : v]", Value::from_iter([1, 2]));
    expect_expr("[for v in var.list : v]", Value::Array(Vec::new()));
    expect_expr("[for v in [] : 1 / v]", Value::Array(Vec::new()));
    expect_expr(
        "[for v in [0, 1, 2] : 10 / v if v != 0]",
        Value::from_iter([float(10.0), float(5.0)]),
    );
    expect_expr(
        "[\n  for x in [1, 2] :\n  [for y in [3, 4] : x * y]\n]",
        Value::from_iter([
            Value::from_iter([float(3.0), float(4.0)]),
            Value::from_iter([float(6.0), float(8.0)]),
        ]),
    );
}

#[test]
fn for_bindings_do_not_leak() {
    expect_expr(
        "[[for x in [1] : x], x]",
        Value::from_iter([Value::from_iter([1]), reference("x")]),
    );
}

#[test]
fn object_for_expressions() {
    let value = parse_expression("{for k, v in {a = 1, b = 2} : v => k}").unwrap();
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        json!({ "1": "a", "2": "b" })
    );

    let value = parse_expression("{for s in [\"x\", \"y\"] : s => s == \"x\" if s != \"z\"}").unwrap();
    assert_eq!(
        serde_json::to_value(value).unwrap(),
        json!({ "x": true, "y": false })
    );

    assert!(matches!(
        parse_expression("{for s in [\"x\"] : s => s...}"),
        Err(Error::UnexpectedToken { .. })
    ));
}

#[test]
fn for_iteration_limit() {
    let parser = Parser::builder().max_for_iterations(2).build();

    assert!(parser.parse_expression("[for x in [1, 2] : x]").is_ok());
    assert!(matches!(
        parser.parse_expression("[for x in [1, 2, 3] : x]"),
        Err(Error::LimitExceeded {
            limit: Limit::ForIterations,
            max: 2,
            ..
        })
    ));
}

#[test]
fn nesting_limit() {
    let deep = format!("a = {}{}", "[".repeat(200), "]".repeat(200));

    assert!(matches!(
        parse(&deep),
        Err(Error::LimitExceeded {
            limit: Limit::NestingDepth,
            ..
        })
    ));

    let parser = Parser::builder().max_nesting_depth(512).build();
    assert!(parser.parse(&deep).is_ok());
}

#[test]
fn parse_body_structures() {
    let input = indoc! {r#"
        # comment
        foo = "bar"

        resource aws_s3_bucket "b" {
          acl = "private"
        }
    "#};

    let body = parse_body(input).unwrap();

    assert_eq!(
        body.into_inner(),
        [
            Structure::Attribute(Attribute::new("foo", "bar")),
            Structure::Block(Block {
                identifier: "resource".into(),
                labels: vec![
                    BlockLabel::Identifier("aws_s3_bucket".into()),
                    BlockLabel::String("b".into()),
                ],
                body: Body::builder().add_attribute(("acl", "private")).build(),
            }),
        ]
    );
}

#[test]
fn label_nesting() {
    expect_json(
        r#"service "http" "web_proxy" { listen_addr = "127.0.0.1:8080" }"#,
        json!({ "service": { "http": { "web_proxy": { "listen_addr": "127.0.0.1:8080" } } } }),
    );
}

#[test]
fn same_type_blocks_merge() {
    let input = indoc! {r#"
        variable "x" {
          default = 1
        }

        variable "y" {
          default = 2
        }

        locals {
          a = 1
        }

        locals {
          b = 2
        }
    "#};

    expect_json(
        input,
        json!({
            "variable": { "x": { "default": 1 }, "y": { "default": 2 } },
            "locals": { "a": 1, "b": 2 }
        }),
    );
}

#[test]
fn keywords_as_names() {
    expect_json(
        "true = 1\nnull = 2\nif = 3\n",
        json!({ "true": 1, "null": 2, "if": 3 }),
    );
}

#[test]
fn quoted_attribute_names() {
    expect_json(
        "\"foo-bar\" = 1\nb {\n  \"with space\" = 2\n}\n",
        json!({ "foo-bar": 1, "b": { "with space": 2 } }),
    );

    assert!(matches!(
        parse("\"quoted\" {}\n"),
        Err(Error::UnexpectedToken { .. })
    ));
}

#[test]
fn heredoc_attribute() {
    expect_json(
        "content = <<-EOT\n    Foo\n    Bar\n  EOT\nnext = 1\n",
        json!({ "content": "Foo\nBar\n", "next": 1 }),
    );
}

#[test]
fn multi_line_expressions() {
    let input = indoc! {r#"
        list = [
          1, # one
          2, // two
        ]
        obj = {
          a = 1
          b = [
            "x",
          ]
        }
        call = merge(
          a,
          b,
        )
    "#};

    expect_json(
        input,
        json!({
            "list": [1, 2],
            "obj": { "a": 1, "b": ["x"] },
            "call": { "__function__": "merge", "__args__": ["${a}", "${b}"] }
        }),
    );
}

#[test]
fn newlines_before_operators_in_brackets() {
    expect_expr("(1\n+ 2)", float(3.0));
    expect_expr("(true\n? 1\n: 2)", Value::from(1));
    expect_expr("[1\n* 2, 3]", Value::from(vec![2.0, 3.0]));
    expect_expr("[10, 20][0\n+ 1]", Value::from(20));
    expect_expr("max(1\n+ 1)", Value::func_call("max", vec![float(2.0)]));
    expect_expr("({ a = 1\n b = 2 })", {
        let mut object = Map::new();
        object.insert("a".to_owned(), Value::from(1));
        object.insert("b".to_owned(), Value::from(2));
        Value::Object(object)
    });

    assert!(matches!(
        parse("a = 1\n+ 2\n"),
        Err(Error::UnexpectedToken { .. })
    ));
}

#[test]
fn empty_input() {
    assert_eq!(parse("").unwrap(), Map::new());
    assert_eq!(parse("\n\n# only a comment\n").unwrap(), Map::new());
}

#[test]
fn structural_errors() {
    assert!(matches!(
        parse(r#"a { b = "foo", c = "bar" }"#),
        Err(Error::UnexpectedToken { ref expected, .. }) if expected == "newline"
    ));
    assert!(matches!(
        parse("a {\n  b = 1\n"),
        Err(Error::UnexpectedEndOfFile { .. })
    ));
    assert!(matches!(
        parse("a \"label\"\nb = 1"),
        Err(Error::UnexpectedToken { ref expected, .. }) if expected == "`{`"
    ));
    assert!(matches!(
        parse("\"a\" 1"),
        Err(Error::UnexpectedToken { ref expected, .. }) if expected == "identifier"
    ));
    assert!(matches!(
        parse("a = 1 b = 2"),
        Err(Error::UnexpectedToken { .. })
    ));
    assert!(matches!(parse("a = "), Err(Error::UnexpectedEndOfFile { .. })));
    assert!(matches!(parse("a = [1, 2"), Err(Error::UnexpectedEndOfFile { .. })));
}

#[test]
fn error_locations() {
    let err = parse("a = 1\nb = ]").unwrap_err();

    assert_eq!(err.location(), Some(&crate::Location { line: 2, col: 5 }));
    assert_eq!(
        err.to_string(),
        "unexpected token `]`, expected expression in line 2, column 5"
    );
}

#[test]
fn unicode() {
    let input = "emoji = \"👩‍👩‍👧‍👦 ünïcödé\"\nafter = 1";

    expect_json(input, json!({ "emoji": "👩‍👩‍👧‍👦 ünïcödé", "after": 1 }));

    let tokens = tokenize("s = \"👍\" x").unwrap();
    assert_eq!(tokens[3].column, 9);
}

#[test]
fn parse_missing_file() {
    let err = parse_file("does/not/exist.hcl").unwrap_err();

    assert!(matches!(err, Error::Io { ref path, .. } if path.ends_with("exist.hcl")));
}
