//! Format data structures as HCL.
//!
//! This module provides the [`Formatter`] type and the convenience functions [`to_string`],
//! [`to_vec`] and [`to_writer`] for formatting the data structures provided by this crate as HCL.
//!
//! A [`Value::Object`][crate::Value::Object] or [`Map`][crate::Map] at the top level renders as a
//! document body: object values that look like block bodies become blocks, everything else
//! becomes an attribute. Any other value renders as a single expression.
//!
//! # Examples
//!
//! Format an HCL block as string:
//!
//! ```
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let block = hcl_lite::Block::builder("user")
//!     .add_label("johndoe")
//!     .add_attribute(("age", 34))
//!     .add_attribute(("email", "johndoe@example.com"))
//!     .build();
//!
//! let expected = r#"
//! user "johndoe" {
//!   age = 34
//!   email = "johndoe@example.com"
//! }
//! "#.trim_start();
//!
//! let formatted = hcl_lite::format::to_string(&block)?;
//!
//! assert_eq!(formatted, expected);
//! #   Ok(())
//! # }
//! ```
//!
//! Format a parsed document back to HCL:
//!
//! ```
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let value = hcl_lite::parse(r#"service "http" { port = 8080 }"#)?;
//!
//! let expected = r#"
//! service "http" {
//!   port = 8080
//! }
//! "#.trim_start();
//!
//! assert_eq!(hcl_lite::format::to_string(&value)?, expected);
//! #   Ok(())
//! # }
//! ```

mod impls;

use crate::Result;
use std::io;

mod private {
    pub trait Sealed {}
}

/// A trait to format data structures as HCL.
///
/// This trait is sealed to prevent implementation outside of this crate.
pub trait Format: private::Sealed {
    /// Formats a HCL structure using a formatter and writes the result to the provided writer.
    ///
    /// # Errors
    ///
    /// Formatting the data structure or writing to the writer may fail with an `Error`.
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write;
}

#[derive(PartialEq, Clone, Copy)]
enum FormatState {
    Initial,
    AttributeStart,
    AttributeEnd,
    BlockStart,
    BlockEnd,
    BlockBodyStart,
}

#[derive(Clone, Copy)]
struct FormatConfig<'a> {
    indent: &'a [u8],
    dense: bool,
    max_inline_width: usize,
}

impl<'a> Default for FormatConfig<'a> {
    fn default() -> Self {
        FormatConfig {
            indent: b"  ",
            dense: false,
            max_inline_width: 80,
        }
    }
}

/// A pretty printing HCL formatter.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use hcl_lite::format::{Format, Formatter};
///
/// let mut buf = Vec::new();
/// let mut formatter = Formatter::new(&mut buf);
///
/// let block = hcl_lite::Block::builder("user")
///     .add_label("johndoe")
///     .add_attribute(("age", 34))
///     .build();
///
/// block.format(&mut formatter)?;
///
/// assert_eq!(String::from_utf8(buf)?, "user \"johndoe\" {\n  age = 34\n}\n");
/// #   Ok(())
/// # }
/// ```
///
/// The [`builder()`](Formatter::builder) method can be used to construct a custom `Formatter`:
///
/// ```
/// use hcl_lite::format::Formatter;
/// # let mut writer = Vec::new();
///
/// let formatter = Formatter::builder()
///     .indent(b"    ")
///     .dense(true)
///     .max_inline_width(120)
///     .build(&mut writer);
/// ```
pub struct Formatter<'a, W> {
    writer: W,
    config: FormatConfig<'a>,
    state: FormatState,
    current_indent: usize,
    inline_level: u64,
}

/// A builder to create a `Formatter`.
///
/// See the documentation of [`Formatter`] for a usage example.
pub struct FormatterBuilder<'a> {
    config: FormatConfig<'a>,
}

impl<'a> FormatterBuilder<'a> {
    /// Set the indent for indenting nested HCL structures.
    ///
    /// The default indentation is two spaces.
    pub fn indent(mut self, indent: &'a [u8]) -> Self {
        self.config.indent = indent;
        self
    }

    /// If set, blocks are not visually separated by empty lines from attributes and adjacent
    /// blocks.
    ///
    /// Default formatting:
    ///
    /// ```hcl
    /// attr1 = "value1"
    /// attr2 = "value2"
    ///
    /// block1 {}
    ///
    /// block2 {}
    /// ```
    ///
    /// Dense formatting:
    ///
    /// ```hcl
    /// attr1 = "value1"
    /// attr2 = "value2"
    /// block1 {}
    /// block2 {}
    /// ```
    pub fn dense(mut self, yes: bool) -> Self {
        self.config.dense = yes;
        self
    }

    /// Controls when arrays and objects are broken up into multiple lines.
    ///
    /// An array or object whose single-line rendering is shorter than `width` characters stays
    /// on one line:
    ///
    /// ```hcl
    /// array = [1, 2, 3]
    /// ```
    ///
    /// Longer ones get one element per line:
    ///
    /// ```hcl
    /// array = [
    ///   "a rather long string",
    ///   "another rather long string",
    ///   "and a third rather long string",
    /// ]
    /// ```
    ///
    /// The default width is 80.
    pub fn max_inline_width(mut self, width: usize) -> Self {
        self.config.max_inline_width = width;
        self
    }

    /// Consumes the `FormatterBuilder` and turns it into a `Formatter` which writes HCL to the
    /// provided writer.
    pub fn build<W>(self, writer: W) -> Formatter<'a, W>
    where
        W: io::Write,
    {
        Formatter {
            writer,
            config: self.config,
            state: FormatState::Initial,
            current_indent: 0,
            inline_level: 0,
        }
    }
}

// Public API.
impl<'a> Formatter<'a, ()> {
    /// Creates a new [`FormatterBuilder`] to start building a new `Formatter`.
    pub fn builder() -> FormatterBuilder<'a> {
        FormatterBuilder {
            config: FormatConfig::default(),
        }
    }
}

// Public API.
impl<'a, W> Formatter<'a, W>
where
    W: io::Write,
{
    /// Creates a new `Formatter` which writes HCL to the provided writer.
    pub fn new(writer: W) -> Formatter<'a, W> {
        Formatter::builder().build(writer)
    }

    /// Consumes `self` and returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

// Internal formatter API.
impl<'a, W> Formatter<'a, W>
where
    W: io::Write,
{
    /// Writes `null` to the writer.
    fn write_null(&mut self) -> Result<()> {
        self.write_bytes(b"null")
    }

    /// Writes a boolean value to the writer.
    fn write_bool(&mut self, value: bool) -> Result<()> {
        let s = if value {
            b"true" as &[u8]
        } else {
            b"false" as &[u8]
        };
        self.write_bytes(s)
    }

    /// Writes an integer value to the writer.
    fn write_int<T>(&mut self, value: T) -> Result<()>
    where
        T: itoa::Integer,
    {
        let mut buffer = itoa::Buffer::new();
        let s = buffer.format(value);
        self.write_bytes(s.as_bytes())
    }

    /// Writes a quoted and escaped string to the writer.
    fn write_quoted_string(&mut self, s: &str) -> Result<()> {
        self.write_bytes(b"\"")?;
        self.write_escaped_string(s)?;
        self.write_bytes(b"\"")
    }

    /// Writes a string fragment to the writer. No escaping occurs.
    fn write_string_fragment(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Writes a string to the writer and escapes backslashes, quotes, newlines, carriage
    /// returns and tabs.
    ///
    /// Complete `${ ... }` interpolations and `$${` escapes are written verbatim. A `${` that is
    /// never closed is written as `\${` so that it reads back as a literal.
    fn write_escaped_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();

        let mut start = 0;
        let mut i = 0;

        while i < bytes.len() {
            let escaped: &[u8] = match bytes[i] {
                b'\\' => b"\\\\",
                b'"' => b"\\\"",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                b'$' if value[i..].starts_with("$${") => {
                    i += 3;
                    continue;
                }
                b'$' if value[i..].starts_with("${") => match interpolation_len(&value[i..]) {
                    Some(len) => {
                        i += len;
                        continue;
                    }
                    None => b"\\$",
                },
                _ => {
                    i += 1;
                    continue;
                }
            };

            if start < i {
                self.write_string_fragment(&value[start..i])?;
            }

            self.write_bytes(escaped)?;

            i += 1;
            start = i;
        }

        if start != bytes.len() {
            self.write_string_fragment(&value[start..])?;
        }

        Ok(())
    }

    /// Writes an attribute name or object key, quoting it unless it is a plain identifier.
    fn write_key(&mut self, key: &str) -> Result<()> {
        if is_ident(key) {
            self.write_string_fragment(key)
        } else {
            self.write_quoted_string(key)
        }
    }

    /// Signals the start of an attribute to the formatter.
    fn begin_attribute(&mut self) -> Result<()> {
        self.maybe_write_newline(FormatState::AttributeStart)?;
        self.write_indent(self.current_indent)
    }

    /// Signals the start of an attribute value to the formatter.
    fn begin_attribute_value(&mut self) -> Result<()> {
        self.write_bytes(b" = ")
    }

    /// Signals the end of an attribute to the formatter.
    fn end_attribute(&mut self) -> Result<()> {
        self.state = FormatState::AttributeEnd;
        self.write_bytes(b"\n")
    }

    /// Signals the start of a block to the formatter.
    fn begin_block(&mut self) -> Result<()> {
        self.maybe_write_newline(FormatState::BlockStart)?;
        self.write_indent(self.current_indent)
    }

    /// Signals the start of a block body to the formatter.
    fn begin_block_body(&mut self) -> Result<()> {
        self.current_indent += 1;
        self.state = FormatState::BlockBodyStart;
        self.write_bytes(b" {")
    }

    /// Signals the end of a block to the formatter.
    fn end_block(&mut self) -> Result<()> {
        self.state = FormatState::BlockEnd;
        self.current_indent -= 1;
        self.write_indent(self.current_indent)?;
        self.write_bytes(b"}\n")
    }

    // Conditionally writes a newline character depending on the formatter configuration and the
    // current and next state. Updates the state to `next_state`.
    fn maybe_write_newline(&mut self, next_state: FormatState) -> Result<()> {
        let newline = match &self.state {
            FormatState::AttributeEnd if !self.config.dense => {
                matches!(next_state, FormatState::BlockStart)
            }
            FormatState::BlockEnd if !self.config.dense => {
                matches!(
                    next_state,
                    FormatState::BlockStart | FormatState::AttributeStart
                )
            }
            other => matches!(other, FormatState::BlockBodyStart),
        };

        if newline {
            self.write_bytes(b"\n")?;
        }

        self.state = next_state;
        Ok(())
    }

    fn write_indent(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.write_bytes(self.config.indent)?;
        }

        Ok(())
    }

    fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.writer.write_all(buf)?;
        Ok(())
    }

    /// Enables inline mode, runs the closure and disables inline mode again unless it's enabled
    /// via another call to `with_inline_mode`.
    ///
    /// This is used for function arguments, which always stay on one line.
    fn with_inline_mode<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.inline_level += 1;
        let result = f(self);
        self.inline_level -= 1;
        result
    }

    fn in_inline_mode(&self) -> bool {
        self.inline_level > 0
    }

    /// Renders whatever `f` writes on a single line into a separate buffer.
    ///
    /// Returns `None` if the rendering does not fit into the configured maximum width.
    fn render_inline<F>(&self, f: F) -> Result<Option<Vec<u8>>>
    where
        F: FnOnce(&mut Formatter<'a, Vec<u8>>) -> Result<()>,
    {
        let mut fmt = Formatter {
            writer: Vec::with_capacity(64),
            config: self.config,
            state: FormatState::Initial,
            current_indent: 0,
            inline_level: 1,
        };

        f(&mut fmt)?;

        let buf = fmt.into_inner();
        // Counts characters by skipping UTF-8 continuation bytes.
        let width = buf.iter().filter(|&&b| (b & 0xC0) != 0x80).count();

        if width < self.config.max_inline_width {
            Ok(Some(buf))
        } else {
            Ok(None)
        }
    }
}

// Returns the byte length of the `${ ... }` sequence `s` starts with, following nested braces
// and quoted strings the same way the lexer does. Returns `None` if it is never closed.
fn interpolation_len(s: &str) -> Option<usize> {
    let mut chars = s.char_indices().skip(2);
    let mut depth = 1usize;

    while let Some((i, ch)) = chars.next() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            '"' => loop {
                match chars.next()?.1 {
                    '\\' => {
                        chars.next()?;
                    }
                    '"' => break,
                    _ => {}
                }
            },
            _ => {}
        }
    }

    None
}

/// Returns `true` if `s` can be written without quotes as an attribute name, block identifier
/// or object key.
pub(crate) fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();

    match chars.next() {
        Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

/// Format the given value as an HCL byte vector.
///
/// # Errors
///
/// Formatting a value as byte vector cannot fail.
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Format,
{
    let mut vec = Vec::with_capacity(128);
    to_writer(&mut vec, value)?;
    Ok(vec)
}

/// Format the given value as an HCL string.
///
/// # Errors
///
/// Formatting a value as string cannot fail.
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Format,
{
    let vec = to_vec(value)?;
    let string = unsafe {
        // We do not emit invalid UTF-8.
        String::from_utf8_unchecked(vec)
    };
    Ok(string)
}

/// Format the given value as HCL into the IO stream.
///
/// # Errors
///
/// Formatting fails if any operation on the writer fails.
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Format,
{
    let mut formatter = Formatter::new(writer);
    value.format(&mut formatter)
}
