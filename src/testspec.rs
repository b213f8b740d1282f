//! Reader for `.t` test specification files.
//!
//! A test specification is itself an HCL document describing what parsing and validating a
//! sibling `.hcl` file is expected to produce:
//!
//! ```hcl
//! result = {
//!   name = "web"
//! }
//!
//! diagnostics {
//!   error {
//!     from {
//!       line   = 1
//!       column = 14
//!       byte   = 13
//!     }
//!     to {
//!       line   = 1
//!       column = 15
//!       byte   = 14
//!     }
//!   }
//! }
//! ```
//!
//! The file is read with [`parse_body`][crate::parse_body] rather than
//! [`parse`][crate::parse], so that repeated `error` and `warning` blocks stay separate.

use crate::validate::{Diagnostic, Position, Severity, SourceRange};
use crate::{parser, Block, Error, Number, Result, Structure, Value};

/// The expectations read from a `.t` file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestSpec {
    /// The expected parse result, if the file has a `result` attribute.
    pub result: Option<Value>,
    /// The expected type of the parse result as a type expression such as `string`,
    /// `list(number)` or `object({ a = bool })`, if the file has a `result_type` attribute.
    pub result_type: Option<Value>,
    /// The expected validator diagnostics, in order.
    pub diagnostics: Vec<ExpectedDiagnostic>,
}

impl TestSpec {
    /// Reads a test specification from HCL source.
    ///
    /// # Errors
    ///
    /// Fails if `source` is not valid HCL, if the `diagnostics` block holds anything other than
    /// `error` and `warning` blocks, or if a range lacks one of its fields.
    ///
    /// # Example
    ///
    /// ```
    /// use hcl_lite::testspec::TestSpec;
    /// use hcl_lite::validate::Severity;
    ///
    /// let spec = TestSpec::parse(r#"
    /// diagnostics {
    ///   error {
    ///     from {
    ///       line = 1
    ///       column = 3
    ///       byte = 2
    ///     }
    ///     to {
    ///       line = 1
    ///       column = 4
    ///       byte = 3
    ///     }
    ///   }
    /// }
    /// "#)?;
    ///
    /// assert!(spec.result.is_none());
    /// assert_eq!(spec.diagnostics[0].severity, Severity::Error);
    /// assert_eq!(spec.diagnostics[0].range.from.column, 3);
    /// # Ok::<(), hcl_lite::Error>(())
    /// ```
    pub fn parse(source: &str) -> Result<TestSpec> {
        let mut spec = TestSpec::default();

        for structure in parser::parse_body(source)? {
            match structure {
                Structure::Attribute(attr) => match attr.key() {
                    "result" => spec.result = Some(attr.value().clone()),
                    "result_type" => spec.result_type = Some(attr.value().clone()),
                    _ => {}
                },
                Structure::Block(block) if block.identifier() == "diagnostics" => {
                    for diagnostic in block.body().blocks() {
                        spec.diagnostics.push(ExpectedDiagnostic::from_block(diagnostic)?);
                    }
                }
                Structure::Block(_) => {}
            }
        }

        Ok(spec)
    }

    /// Returns `true` if `diagnostics` matches the expected diagnostics one by one.
    pub fn diagnostics_match(&self, diagnostics: &[Diagnostic]) -> bool {
        self.diagnostics.len() == diagnostics.len()
            && self
                .diagnostics
                .iter()
                .zip(diagnostics)
                .all(|(expected, actual)| expected.matches(actual))
    }

    /// Returns `true` if `value` conforms to the expected `result_type`, or if there is none.
    ///
    /// `null` and unresolved references conform to every type.
    ///
    /// # Example
    ///
    /// ```
    /// use hcl_lite::testspec::TestSpec;
    ///
    /// let spec = TestSpec::parse("result_type = object({ a = list(number) })\n")?;
    ///
    /// assert!(spec.result_type_matches(&hcl_lite::parse("a = [1, 2]")?.into()));
    /// assert!(!spec.result_type_matches(&hcl_lite::parse("a = [\"x\"]")?.into()));
    /// # Ok::<(), hcl_lite::Error>(())
    /// ```
    pub fn result_type_matches(&self, value: &Value) -> bool {
        self.result_type.as_ref().map_or(true, |ty| conforms(value, ty))
    }
}

// Checks `value` against a type expression. Primitive types and bare collection types are
// references, parameterized collection types are function call placeholders.
fn conforms(value: &Value, ty: &Value) -> bool {
    if matches!(value, Value::Null | Value::Reference(_)) {
        return true;
    }

    if let Some(name) = ty.as_reference() {
        return match name {
            "any" => true,
            "string" => value.is_string(),
            "number" => value.is_number(),
            "bool" => value.is_boolean(),
            "list" | "set" | "tuple" => value.is_array(),
            "map" | "object" => value.is_object(),
            _ => false,
        };
    }

    let Some((name, [arg])) = ty.as_func_call() else {
        return false;
    };

    match (name, value, arg) {
        ("list" | "set", Value::Array(items), elem) => items.iter().all(|v| conforms(v, elem)),
        ("map", Value::Object(entries), elem) => entries.values().all(|v| conforms(v, elem)),
        ("tuple", Value::Array(items), Value::Array(types)) => {
            items.len() == types.len() && items.iter().zip(types).all(|(v, t)| conforms(v, t))
        }
        ("object", Value::Object(entries), Value::Object(attrs)) => {
            entries.len() == attrs.len()
                && attrs
                    .iter()
                    .all(|(key, t)| entries.get(key).is_some_and(|v| conforms(v, t)))
        }
        _ => false,
    }
}

/// A diagnostic expected by a [`TestSpec`].
///
/// Only severity and range are compared. Messages are not part of the expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedDiagnostic {
    /// The expected severity.
    pub severity: Severity,
    /// The expected source range.
    pub range: SourceRange,
}

impl ExpectedDiagnostic {
    /// Returns `true` if `diagnostic` has the expected severity and range.
    pub fn matches(&self, diagnostic: &Diagnostic) -> bool {
        self.severity == diagnostic.severity && self.range == diagnostic.range
    }

    fn from_block(block: &Block) -> Result<ExpectedDiagnostic> {
        let severity = match block.identifier() {
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            other => {
                return Err(Error::InvalidValue {
                    field: "diagnostics".to_owned(),
                    reason: format!("unknown diagnostic severity `{other}`"),
                })
            }
        };

        let from = position(block, "from")?;
        let to = position(block, "to")?;

        Ok(ExpectedDiagnostic {
            severity,
            range: SourceRange::new(from, to),
        })
    }
}

fn position(block: &Block, name: &str) -> Result<Position> {
    let inner = block
        .body()
        .blocks()
        .find(|inner| inner.identifier() == name)
        .ok_or_else(|| Error::MissingRequiredField {
            field: name.to_owned(),
            block: block.identifier().to_owned(),
        })?;

    let field = |field: &str| -> Result<usize> {
        let value = inner
            .body()
            .attributes()
            .filter(|attr| attr.key() == field)
            .last()
            .map(|attr| attr.value())
            .ok_or_else(|| Error::MissingRequiredField {
                field: field.to_owned(),
                block: name.to_owned(),
            })?;

        value
            .as_number()
            .and_then(Number::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| Error::InvalidValue {
                field: field.to_owned(),
                reason: format!(
                    "expected a non-negative integer, got `{}`",
                    value.to_key_string()
                ),
            })
    };

    Ok(Position::new(field("line")?, field("column")?, field("byte")?))
}
