mod common;

use common::{assert_format, assert_roundtrip};
use hcl_lite::format::Formatter;
use hcl_lite::{Body, Map, Value};
use indoc::indoc;
use pretty_assertions::assert_eq;

#[test]
fn roundtrip_primitives_and_lists() {
    assert_roundtrip(indoc! {r#"
        null_value = null
        yes = true
        no = false
        int = 42
        negative = -7
        float = 1.5
        exp = 1e3
        string = "with \"quotes\", \\ and\nnewlines\ttabs"
        unicode = "größe"
        unclosed = "cost \${"
        "foo-bar" = "quoted name"
        template = "${upper("x")}-$${literal}"
        list = [1, "two", [3.5, null], {}]
        long = ["aaaaaaaaaaaaaaaaaaaaaaaaa", "bbbbbbbbbbbbbbbbbbbbbbbbbbb", "ccccccccccccccccccccccccccc"]
    "#});
}

#[test]
fn roundtrip_objects_and_blocks() {
    let map = assert_roundtrip(indoc! {r#"
        tags = { Name = "web", "with space" = 1 }

        service "http" "web_proxy" {
          listen_addr = "127.0.0.1:8080"

          process "main" {
            command = ["/usr/local/bin/awesome-app", "server"]
          }
        }

        locals {
          region = var.region
          upper = upper(var.name, 1)
        }
    "#});

    assert!(map["locals"].as_object().is_some());
}

#[test]
fn formatting_is_idempotent() {
    let input = indoc! {r#"
        b = 2
        a { x = [1,
          2] }
        c "d" {
          e = { f = { g = 1 } }
        }
    "#};

    let once = hcl_lite::format::to_string(&hcl_lite::parse(input).unwrap()).unwrap();
    let twice = hcl_lite::format::to_string(&hcl_lite::parse(&once).unwrap()).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn structural_body_keeps_blocks() {
    let input = indoc! {r#"
        provider "aws" {
          region = "us-east-1"
        }

        provider "aws" {
          alias = "west"
          region = "us-west-2"
        }
    "#};

    let body: Body = hcl_lite::parse_body(input).unwrap();

    assert_eq!(body.blocks().count(), 2);
    assert_format(&body, input);
}

#[test]
fn json_empty_objects_become_lists() {
    let hcl = hcl_lite::json::json_to_hcl(r#"{"a": {}, "b": {"c": {}}}"#).unwrap();

    assert_eq!(
        hcl,
        indoc! {r#"
            a = []

            b {
              c = []
            }
        "#}
    );
}

#[test]
fn json_strings_with_unclosed_interpolations() {
    let hcl = hcl_lite::json::json_to_hcl(r#"{"s": "cost ${", "t": "${var.a}"}"#).unwrap();

    assert_eq!(hcl, "s = \"cost \\${\"\nt = \"${var.a}\"\n");
    assert_eq!(hcl_lite::parse(&hcl).unwrap()["s"], Value::from("cost ${"));
}

#[test]
fn dense_formatting() {
    let mut map = Map::new();
    map.insert("a".to_owned(), Value::from(1));
    map.insert(
        "b".to_owned(),
        Value::Object(Map::from_iter([("c".to_owned(), Value::from(2))])),
    );
    map.insert(
        "d".to_owned(),
        Value::Object(Map::from_iter([("e".to_owned(), Value::from(3))])),
    );

    let mut buf = Vec::new();
    let mut formatter = Formatter::builder().dense(true).build(&mut buf);
    hcl_lite::format::Format::format(&map, &mut formatter).unwrap();

    assert_eq!(
        String::from_utf8(buf).unwrap(),
        indoc! {r#"
            a = 1
            b {
              c = 2
            }
            d {
              e = 3
            }
        "#}
    );
}
