//! The Value enum, a loosely typed way of representing any parsed HCL value.

mod de;
mod from;
mod ser;

use crate::number::{parse_float_prefix, Number};

/// The map type used for HCL objects.
///
/// Insertion order is preserved so that documents render back in the order they were written.
pub type Map<K, V> = indexmap::IndexMap<K, V>;

/// Object key holding the name of a function call placeholder.
pub const FUNCTION_KEY: &str = "__function__";

/// Object key holding the arguments of a function call placeholder.
pub const ARGS_KEY: &str = "__args__";

/// Represents any value the parser can produce.
///
/// Besides the JSON-compatible variants there is [`Value::Reference`] for identifiers the parser
/// could not resolve to a concrete value. Calls to functions are not evaluated. They are kept as
/// an object of the shape `{"__function__": name, "__args__": [args...]}`, see
/// [`Value::func_call`].
#[derive(Debug, PartialEq, Clone, Default)]
pub enum Value {
    /// Represents a HCL null value.
    #[default]
    Null,
    /// Represents a HCL boolean.
    Bool(bool),
    /// Represents a HCL number, either integer or float.
    Number(Number),
    /// Represents a HCL string.
    String(String),
    /// Represents a HCL array.
    Array(Vec<Value>),
    /// Represents a HCL object.
    Object(Map<String, Value>),
    /// An unresolved reference such as `var.region` or `aws_instance.web[0].id`.
    ///
    /// The path is stored without the `${` and `}` markers.
    Reference(String),
}

impl Value {
    /// Creates the placeholder value for a call to the function `name`.
    pub fn func_call<N>(name: N, args: Vec<Value>) -> Value
    where
        N: Into<String>,
    {
        let mut map = Map::with_capacity(2);
        map.insert(FUNCTION_KEY.to_owned(), Value::String(name.into()));
        map.insert(ARGS_KEY.to_owned(), Value::Array(args));
        Value::Object(map)
    }

    /// If the `Value` is a function call placeholder, returns the function name and its
    /// arguments. Returns None otherwise.
    pub fn as_func_call(&self) -> Option<(&str, &[Value])> {
        let object = self.as_object()?;

        if object.len() != 2 {
            return None;
        }

        let name = object.get(FUNCTION_KEY)?.as_str()?;
        let args = object.get(ARGS_KEY)?.as_array()?;
        Some((name, args))
    }

    /// If the `Value` is an Array, returns the associated vector. Returns None
    /// otherwise.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// If the `Value` is an Array, returns the associated mutable vector.
    /// Returns None otherwise.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// If the `Value` is a Boolean, represent it as bool if possible. Returns
    /// None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// If the `Value` is a Number, represent it as f64 if possible. Returns
    /// None otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    /// If the `Value` is a Number, represent it as i64 if possible. Returns
    /// None otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// If the `Value` is a Number, returns the associated Number. Returns None
    /// otherwise.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(num) => Some(num),
            _ => None,
        }
    }

    /// If the `Value` is an Object, returns the associated Map. Returns None
    /// otherwise.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// If the `Value` is an Object, returns the associated mutable Map.
    /// Returns None otherwise.
    pub fn as_object_mut(&mut self) -> Option<&mut Map<String, Value>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// If the `Value` is a String, returns the associated str. Returns None
    /// otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the `Value` is a Reference, returns the referenced path. Returns None otherwise.
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(path) => Some(path),
            _ => None,
        }
    }

    /// Returns true if the `Value` is an Array. Returns false otherwise.
    pub fn is_array(&self) -> bool {
        self.as_array().is_some()
    }

    /// Returns true if the `Value` is a Boolean. Returns false otherwise.
    pub fn is_boolean(&self) -> bool {
        self.as_bool().is_some()
    }

    /// Returns true if the `Value` is a Number. Returns false otherwise.
    pub fn is_number(&self) -> bool {
        self.as_number().is_some()
    }

    /// Returns true if the `Value` is a Null. Returns false otherwise.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if the `Value` is an Object. Returns false otherwise.
    pub fn is_object(&self) -> bool {
        self.as_object().is_some()
    }

    /// Returns true if the `Value` is a String. Returns false otherwise.
    pub fn is_string(&self) -> bool {
        self.as_str().is_some()
    }

    /// Returns true if the `Value` is an unresolved Reference. Returns false otherwise.
    pub fn is_reference(&self) -> bool {
        self.as_reference().is_some()
    }

    /// Takes the value out of the `Value`, leaving a `Null` in its place.
    pub fn take(&mut self) -> Value {
        std::mem::replace(self, Value::Null)
    }

    /// Coerces the value to a boolean the way conditions and logical operators see it.
    ///
    /// `null`, `false`, zero, the empty string, the string `"0"` and empty collections are
    /// falsy. Everything else, including unresolved references, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() != 0.0,
            Value::String(s) => !s.is_empty() && s != "0",
            Value::Array(array) => !array.is_empty(),
            Value::Object(object) => !object.is_empty(),
            Value::Reference(_) => true,
        }
    }

    /// Coerces the value to a float for arithmetic.
    ///
    /// Numbers convert directly and numeric strings are parsed. Every other value becomes `0.0`.
    pub fn to_float(&self) -> f64 {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_float_prefix(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Renders a scalar value as the string used for object keys and reference indices.
    pub(crate) fn to_key_string(&self) -> String {
        match self {
            Value::Null => "null".to_owned(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Reference(path) => format!("${{{path}}}"),
            other => crate::json::to_json_string(other, false).unwrap_or_default(),
        }
    }
}
