//! Conversion between HCL and JSON.
//!
//! JSON output is produced via the [`Serialize`][serde::Serialize] implementation of [`Value`],
//! so unresolved references appear as `"${path}"` strings.
//!
//! # Example
//!
//! ```
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let json = hcl_lite::json::hcl_to_json(r#"service "http" { port = 8080 }"#, false)?;
//!
//! assert_eq!(json, r#"{"service":{"http":{"port":8080}}}"#);
//!
//! let hcl = hcl_lite::json::json_to_hcl(r#"{"name": "web", "tags": {}}"#)?;
//!
//! assert_eq!(hcl, "name = \"web\"\ntags = []\n");
//! #   Ok(())
//! # }
//! ```

use crate::{format, parser, Result, Value};

/// Serializes a `Value` as JSON.
///
/// Pretty output is indented with two spaces.
///
/// # Errors
///
/// Returns an error if the value cannot be represented in JSON.
pub fn to_json_string(value: &Value, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    Ok(json)
}

/// Reads a `Value` from JSON text.
///
/// Empty JSON objects become empty arrays, so `{}` reads as `[]`. Key order is preserved.
///
/// # Errors
///
/// Returns an error if `s` is not valid JSON.
pub fn from_json_str(s: &str) -> Result<Value> {
    let mut value: Value = serde_json::from_str(s)?;
    empty_objects_to_arrays(&mut value);
    Ok(value)
}

fn empty_objects_to_arrays(value: &mut Value) {
    match value {
        Value::Object(object) if object.is_empty() => *value = Value::Array(Vec::new()),
        Value::Object(object) => object.values_mut().for_each(empty_objects_to_arrays),
        Value::Array(array) => array.iter_mut().for_each(empty_objects_to_arrays),
        _ => {}
    }
}

/// Converts JSON text into an HCL document.
///
/// A top-level JSON object becomes a document body. Any other JSON value is rendered as a single
/// HCL expression.
///
/// # Errors
///
/// Returns an error if `s` is not valid JSON.
pub fn json_to_hcl(s: &str) -> Result<String> {
    let value = from_json_str(s)?;
    let hcl = format::to_string(&value)?;
    tracing::debug!(input = s.len(), output = hcl.len(), "converted json to hcl");
    Ok(hcl)
}

/// Parses an HCL document and serializes the result as JSON.
///
/// # Errors
///
/// Returns an error if `s` cannot be parsed.
pub fn hcl_to_json(s: &str, pretty: bool) -> Result<String> {
    let value = Value::Object(parser::parse(s)?);
    let json = to_json_string(&value, pretty)?;
    tracing::debug!(input = s.len(), output = json.len(), "converted hcl to json");
    Ok(json)
}
