use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};

/// Represents a HCL number.
///
/// Integer literals keep their integer representation. Every arithmetic operation produces a
/// [`Float`][Number::Float].
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Number {
    /// Represents a positive integer.
    PosInt(u64),
    /// Represents a negative integer.
    NegInt(i64),
    /// Represents a float.
    Float(f64),
}

impl Number {
    /// Parses a numeric literal as produced by the lexer.
    ///
    /// Literals without a fraction or exponent become integers. Integers that do not fit into 64
    /// bits and literals with a fractional part are parsed as floats, silently losing precision
    /// where `f64` cannot represent them. Malformed literals such as `1.2.3` are read up to the
    /// longest valid numeric prefix.
    pub fn from_literal(literal: &str) -> Number {
        let is_float = literal.contains(['.', 'e', 'E']);

        if !is_float {
            if let Some(digits) = literal.strip_prefix('-') {
                if let Ok(n) = digits.parse::<u64>() {
                    if n == 0 {
                        return Number::PosInt(0);
                    } else if n <= i64::MAX as u64 + 1 {
                        return Number::NegInt((n as i64).wrapping_neg());
                    }
                }
            } else if let Ok(n) = literal.parse::<u64>() {
                return Number::PosInt(n);
            }
        }

        Number::Float(parse_float_prefix(literal).unwrap_or(0.0))
    }

    /// Represents the `Number` as f64.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::PosInt(n) => n as f64,
            Self::NegInt(n) => n as f64,
            Self::Float(n) => n,
        }
    }

    /// If the `Number` is an integer, represent it as i64 if possible. Returns None otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::PosInt(n) => i64::try_from(n).ok(),
            Self::NegInt(n) => Some(n),
            Self::Float(_) => None,
        }
    }

    /// If the `Number` is an integer, represent it as u64 if possible. Returns None otherwise.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::PosInt(n) => Some(n),
            Self::NegInt(_) | Self::Float(_) => None,
        }
    }

    /// Returns true if the `Number` is a float.
    pub fn is_f64(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Returns true if the `Number` is an integer.
    pub fn is_integer(&self) -> bool {
        !self.is_f64()
    }
}

// Parses the longest prefix of `s` which is a valid float literal.
pub(crate) fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end += 1;
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 || end > digits_start {
            end = frac_end;
        }
    }

    if end == digits_start || (end == digits_start + 1 && bytes[digits_start] == b'.') {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'-' | b'+') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(u: $ty) -> Self {
                    Self::PosInt(u as u64)
                }
            }
        )*
    };
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(i: $ty) -> Self {
                    if i < 0 {
                        Self::NegInt(i as i64)
                    } else {
                        Self::PosInt(i as u64)
                    }
                }
            }
        )*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, usize);
impl_from_signed!(i8, i16, i32, i64, isize);

impl From<f32> for Number {
    fn from(f: f32) -> Self {
        Self::Float(f as f64)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl Display for Number {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::PosInt(i) => Display::fmt(&i, formatter),
            Self::NegInt(i) => Display::fmt(&i, formatter),
            // Floats always keep a fractional part or exponent so that they read back as floats.
            Self::Float(f) if f.is_finite() => formatter.write_str(ryu::Buffer::new().format(*f)),
            Self::Float(f) => Display::fmt(&f, formatter),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Self::PosInt(i) => serializer.serialize_u64(i),
            Self::NegInt(i) => serializer.serialize_i64(i),
            Self::Float(f) => serializer.serialize_f64(f),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D>(deserializer: D) -> Result<Number, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumberVisitor;

        impl<'de> Visitor<'de> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a HCL number")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Number, E> {
                Ok(value.into())
            }

            fn visit_u64<E>(self, value: u64) -> Result<Number, E> {
                Ok(value.into())
            }

            fn visit_f64<E>(self, value: f64) -> Result<Number, E> {
                Ok(value.into())
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}
