use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::read_to_string as read;

fn hclconv() -> Command {
    Command::cargo_bin("hclconv").unwrap()
}

#[test]
fn to_json() {
    hclconv()
        .args(["to-json", "tests/fixtures/service.hcl"])
        .assert()
        .success()
        .stdout(read("tests/fixtures/service.json").unwrap());
}

#[test]
fn to_json_pretty_from_stdin() {
    hclconv()
        .args(["to-json", "--pretty"])
        .write_stdin("a = [1, 2]\n")
        .assert()
        .success()
        .stdout("{\n  \"a\": [\n    1,\n    2\n  ]\n}\n");

    hclconv()
        .args(["to-json", "-"])
        .write_stdin("a = 1 + 1\n")
        .assert()
        .success()
        .stdout("{\"a\":2.0}\n");
}

#[test]
fn to_json_parse_error() {
    hclconv()
        .arg("to-json")
        .write_stdin("a {\n  b = 1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected end of file"));
}

#[test]
fn from_json() {
    hclconv()
        .arg("from-json")
        .write_stdin(r#"{"name": "web", "tags": {}, "service": {"http": {"port": 80}}}"#)
        .assert()
        .success()
        .stdout("name = \"web\"\ntags = []\n\nservice \"http\" {\n  port = 80\n}\n");
}

#[test]
fn fmt() {
    hclconv()
        .args(["fmt", "tests/fixtures/service.hcl"])
        .assert()
        .success()
        .stdout(read("tests/fixtures/service.fmt.hcl").unwrap());
}

#[test]
fn validate_valid() {
    hclconv()
        .args(["validate", "tests/fixtures/service.hcl"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn validate_invalid() {
    hclconv()
        .args(["validate", "tests/fixtures/invalid.hcl"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "error: Each argument must be on its own line in line 1, column 14",
        ))
        .stdout(predicate::str::contains(
            "error: Only one argument is allowed in a single-line block definition in line 1, column 16",
        ));
}

#[test]
fn validate_json() {
    hclconv()
        .args(["validate", "--json", "tests/fixtures/invalid.hcl"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(r#""severity": "error""#))
        .stdout(predicate::str::contains(r#""byte": 13"#));
}

#[test]
fn missing_file() {
    hclconv()
        .args(["fmt", "does/not/exist.hcl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read `does/not/exist.hcl`"));
}
