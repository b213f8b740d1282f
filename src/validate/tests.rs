use super::*;
use indoc::indoc;
use pretty_assertions::assert_eq;

#[track_caller]
fn expect_messages(input: &str, expected: &[&str]) {
    let diagnostics = validate(input);
    let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, expected);
}

fn range(from: (usize, usize, usize), to: (usize, usize, usize)) -> SourceRange {
    SourceRange::new(
        Position::new(from.0, from.1, from.2),
        Position::new(to.0, to.1, to.2),
    )
}

#[test]
fn valid_documents() {
    expect_messages("", &[]);
    expect_messages("# just a comment\n", &[]);

    let input = indoc! {r#"
        name = "x"
        list = [1, 2,
          3]
        obj = { a = 1, b = 2 }
        call = f(1, 2)

        block "label" {
          nested {
            a = 1
          }
        }

        single { a = 1 }
        empty {}
    "#};

    expect_messages(input, &[]);
}

#[test]
fn comma_between_arguments() {
    let diagnostics = validate("a = 1, b = 2\n");

    assert_eq!(
        diagnostics,
        [Diagnostic::error(
            "Each argument must be on its own line",
            range((1, 6, 5), (1, 7, 6))
        )]
    );
}

#[test]
fn single_line_block_with_two_arguments() {
    let diagnostics = validate(r#"a { b = "foo", c = "bar" }"#);

    assert_eq!(
        diagnostics,
        [
            Diagnostic::error(
                "Each argument must be on its own line",
                range((1, 14, 13), (1, 15, 14))
            ),
            Diagnostic::error(
                "Only one argument is allowed in a single-line block definition",
                range((1, 16, 15), (1, 17, 16))
            ),
        ]
    );
}

#[test]
fn single_line_block_with_many_arguments() {
    expect_messages(
        "a { b = 1 c = 2 d = 3 }",
        &[
            "Only one argument is allowed in a single-line block definition",
            "Only one argument is allowed in a single-line block definition",
        ],
    );
}

#[test]
fn single_line_block_with_nested_block() {
    expect_messages(
        "a { b { c = 1 } }",
        &["A single-line block definition cannot contain another block definition"],
    );
    expect_messages(
        "a { b \"label\" { c = 1 } d = 2 }",
        &["A single-line block definition cannot contain another block definition"],
    );
    expect_messages(
        "a { { } }",
        &["A single-line block definition cannot contain another block definition"],
    );
}

#[test]
fn quoted_attribute_names() {
    expect_messages("\"foo-bar\" = 1\nb {\n  \"x y\" = 2\n}\n", &[]);
    expect_messages(
        "b { \"x\" = 1, \"y\" = 2 }\n",
        &[MSG_COMMA, MSG_SINGLE_LINE_ARGUMENTS],
    );
}

#[test]
fn unclosed_block() {
    let diagnostics = validate("a {\n  b = 1\n");

    assert_eq!(
        diagnostics,
        [Diagnostic::error(
            "Unclosed block definition",
            range((1, 3, 2), (1, 4, 3))
        )]
    );
}

#[test]
fn invalid_block_definition() {
    let input = indoc! {r#"
        a "label" = 1
        b = 2, c = 3
    "#};

    let diagnostics = validate(input);

    assert_eq!(
        diagnostics.iter().map(|d| (d.message.as_str(), d.range.from.line)).collect::<Vec<_>>(),
        [
            (
                "Invalid block definition: either a quoted string block label or an opening brace (\"{\") is expected here",
                1
            ),
            ("Each argument must be on its own line", 2),
        ]
    );
}

#[test]
fn nested_multi_line_blocks_are_validated() {
    let input = indoc! {r#"
        outer {
          inner {
            a = 1, b = 2
          }
        }
    "#};

    let diagnostics = validate(input);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].range.from, Position::new(3, 10, 27));
}

#[test]
fn deeply_nested_blocks() {
    let depth = 300;
    let mut input = String::new();

    for level in 0..depth {
        input.push_str(&format!("b{level} {{\n  a = [1, {{ c = 2 }}]\n"));
    }
    input.push_str("inner { x = 1, y = 2 }\n");
    for _ in 0..depth {
        input.push_str("}\n");
    }

    expect_messages(&input, &[MSG_COMMA, MSG_SINGLE_LINE_ARGUMENTS]);

    input.truncate(input.len() - 2);
    let diagnostics = validate(&input);
    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics[0].message, MSG_UNCLOSED_BLOCK);
    assert_eq!(diagnostics[0].range.from.line, 1);
}

#[test]
fn lexer_errors_become_a_single_diagnostic() {
    let diagnostics = validate("a = 1\nb = \"unterminated\n");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_error());
    assert!(diagnostics[0].message.starts_with("unterminated string"));
    assert_eq!(diagnostics[0].range, range((1, 1, 0), (1, 1, 0)));
}

#[test]
fn byte_offsets_follow_utf8() {
    let diagnostics = validate("a = \"ö\"\nb = \"ü\", c = 1\n");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].range.from, Position::new(2, 8, 17));
}

#[test]
fn diagnostics_display() {
    let diagnostic = Diagnostic::error("Unclosed block definition", range((2, 3, 7), (2, 4, 8)));

    assert_eq!(
        diagnostic.to_string(),
        "error: Unclosed block definition in line 2, column 3"
    );
}
