mod common;

use common::assert_diagnostics;
use hcl_lite::validate::{Position, Severity};
use indoc::indoc;

const COMMA: &str = "Each argument must be on its own line";
const SINGLE_LINE_ARGUMENTS: &str = "Only one argument is allowed in a single-line block definition";
const SINGLE_LINE_NESTED: &str =
    "A single-line block definition cannot contain another block definition";
const UNCLOSED: &str = "Unclosed block definition";

#[test]
fn empty_input() {
    assert_diagnostics("", &[]);
}

#[test]
fn valid_terraform() {
    assert_diagnostics(
        indoc! {r#"
            resource "aws_instance" "web" {
              ami   = "ami-123"
              count = var.enabled ? 1 : 0

              tags = {
                Name = "web"
              }

              lifecycle { create_before_destroy = true }
            }

            locals {
              doubled = [for n in var.list : n * 2 if n > 0]
              text    = <<-EOT
                hello
                EOT
            }
        "#},
        &[],
    );
}

#[test]
fn problems_are_collected() {
    assert_diagnostics(
        indoc! {r#"
            a = 1, b = 2
            single { x = 1, y = 2 }
            nested { inner { z = 3 } }
            ok {
              c = 3
            }
        "#},
        &[
            (COMMA, 1, 6),
            (COMMA, 2, 15),
            (SINGLE_LINE_ARGUMENTS, 2, 17),
            (SINGLE_LINE_NESTED, 3, 10),
        ],
    );
}

#[test]
fn unclosed_block_reports_opening_brace() {
    assert_diagnostics("outer {\n  inner {\n    a = 1\n  }\n", &[(UNCLOSED, 1, 7)]);
}

#[test]
fn parser_and_validator_agree() {
    for input in [
        "a = 1, b = 2\n",
        "a { b = 1, c = 2 }\n",
        "a {\n  b = 1\n",
        "a { b = 1 c = 2 }\n",
    ] {
        assert!(!hcl_lite::validate(input).is_empty(), "{input}");
        assert!(hcl_lite::parse(input).is_err(), "{input}");
    }
}

#[test]
fn positions_count_characters() {
    let diagnostics = hcl_lite::validate("emoji = \"😀\", x = 1\n");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].range.from, Position::new(1, 12, 14));
    assert_eq!(diagnostics[0].range.to, Position::new(1, 13, 15));
}
