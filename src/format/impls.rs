use super::{is_ident, private, Format, FormatState, Formatter};
use crate::{structure::*, Map, Number, Result, Value};
use std::io;

// Deepest label nesting a block-shaped object value is rendered with.
const MAX_BLOCK_LABELS: usize = 2;

impl<T> private::Sealed for &T where T: Format {}

impl<T> Format for &T
where
    T: Format,
{
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write,
    {
        (*self).format(fmt)
    }
}

impl private::Sealed for Body {}

impl Format for Body {
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write,
    {
        for structure in self.iter() {
            structure.format(fmt)?;
        }

        Ok(())
    }
}

impl private::Sealed for Structure {}

impl Format for Structure {
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write,
    {
        match self {
            Structure::Attribute(attr) => attr.format(fmt),
            Structure::Block(block) => block.format(fmt),
        }
    }
}

impl private::Sealed for Attribute {}

impl Format for Attribute {
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write,
    {
        format_attribute(fmt, self.key(), self.value())
    }
}

impl private::Sealed for Block {}

impl Format for Block {
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write,
    {
        fmt.begin_block()?;
        fmt.write_key(self.identifier())?;

        for label in self.labels() {
            fmt.write_bytes(b" ")?;
            label.format(fmt)?;
        }

        fmt.begin_block_body()?;
        self.body().format(fmt)?;
        fmt.end_block()
    }
}

impl private::Sealed for BlockLabel {}

impl Format for BlockLabel {
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write,
    {
        match self {
            BlockLabel::Identifier(ident) => fmt.write_string_fragment(ident),
            BlockLabel::String(string) => fmt.write_quoted_string(string),
        }
    }
}

impl private::Sealed for Map<String, Value> {}

impl Format for Map<String, Value> {
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write,
    {
        for (key, value) in self {
            match block_shape(key, value) {
                Some(blocks) => {
                    for (labels, body) in blocks {
                        fmt.begin_block()?;
                        fmt.write_string_fragment(key)?;

                        for label in labels {
                            fmt.write_bytes(b" ")?;
                            fmt.write_quoted_string(label)?;
                        }

                        fmt.begin_block_body()?;
                        body.format(fmt)?;
                        fmt.end_block()?;
                    }
                }
                None => format_attribute(fmt, key, value)?,
            }
        }

        Ok(())
    }
}

impl private::Sealed for Value {}

impl Format for Value {
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write,
    {
        match self {
            // Only a document starts out as an object.
            Value::Object(object)
                if fmt.state == FormatState::Initial && self.as_func_call().is_none() =>
            {
                object.format(fmt)
            }
            other => format_expr(fmt, other),
        }
    }
}

impl private::Sealed for Number {}

impl Format for Number {
    fn format<W>(&self, fmt: &mut Formatter<W>) -> Result<()>
    where
        W: io::Write,
    {
        match *self {
            Number::PosInt(n) => fmt.write_int(n),
            Number::NegInt(n) => fmt.write_int(n),
            Number::Float(_) => fmt.write_string_fragment(&self.to_string()),
        }
    }
}

fn format_attribute<W>(fmt: &mut Formatter<W>, key: &str, value: &Value) -> Result<()>
where
    W: io::Write,
{
    fmt.begin_attribute()?;
    fmt.write_key(key)?;
    fmt.begin_attribute_value()?;
    format_expr(fmt, value)?;
    fmt.end_attribute()
}

fn format_expr<W>(fmt: &mut Formatter<W>, value: &Value) -> Result<()>
where
    W: io::Write,
{
    match value {
        Value::Null => fmt.write_null(),
        Value::Bool(b) => fmt.write_bool(*b),
        Value::Number(num) => num.format(fmt),
        Value::String(string) => fmt.write_quoted_string(string),
        Value::Array(array) => format_array(fmt, array),
        Value::Object(object) => match value.as_func_call() {
            Some((name, args)) => format_func_call(fmt, name, args),
            None => format_object(fmt, object),
        },
        Value::Reference(path) => fmt.write_string_fragment(path),
    }
}

fn format_func_call<W>(fmt: &mut Formatter<W>, name: &str, args: &[Value]) -> Result<()>
where
    W: io::Write,
{
    fmt.write_string_fragment(name)?;
    fmt.write_bytes(b"(")?;

    fmt.with_inline_mode(|fmt| {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                fmt.write_bytes(b", ")?;
            }

            format_expr(fmt, arg)?;
        }

        Ok(())
    })?;

    fmt.write_bytes(b")")
}

fn format_array<W>(fmt: &mut Formatter<W>, array: &[Value]) -> Result<()>
where
    W: io::Write,
{
    if array.is_empty() {
        return fmt.write_bytes(b"[]");
    }

    if fmt.in_inline_mode() {
        fmt.write_bytes(b"[")?;

        for (i, value) in array.iter().enumerate() {
            if i > 0 {
                fmt.write_bytes(b", ")?;
            }

            format_expr(fmt, value)?;
        }

        return fmt.write_bytes(b"]");
    }

    if let Some(line) = fmt.render_inline(|fmt| format_array(fmt, array))? {
        return fmt.write_bytes(&line);
    }

    fmt.current_indent += 1;
    fmt.write_bytes(b"[\n")?;

    for value in array {
        fmt.write_indent(fmt.current_indent)?;
        format_expr(fmt, value)?;
        fmt.write_bytes(b",\n")?;
    }

    fmt.current_indent -= 1;
    fmt.write_indent(fmt.current_indent)?;
    fmt.write_bytes(b"]")
}

fn format_object<W>(fmt: &mut Formatter<W>, object: &Map<String, Value>) -> Result<()>
where
    W: io::Write,
{
    if object.is_empty() {
        return fmt.write_bytes(b"{}");
    }

    if fmt.in_inline_mode() {
        fmt.write_bytes(b"{ ")?;

        for (i, (key, value)) in object.iter().enumerate() {
            if i > 0 {
                fmt.write_bytes(b", ")?;
            }

            fmt.write_key(key)?;
            fmt.write_bytes(b" = ")?;
            format_expr(fmt, value)?;
        }

        return fmt.write_bytes(b" }");
    }

    if let Some(line) = fmt.render_inline(|fmt| format_object(fmt, object))? {
        return fmt.write_bytes(&line);
    }

    fmt.current_indent += 1;
    fmt.write_bytes(b"{\n")?;

    for (key, value) in object {
        fmt.write_indent(fmt.current_indent)?;
        fmt.write_key(key)?;
        fmt.write_bytes(b" = ")?;
        format_expr(fmt, value)?;
        fmt.write_bytes(b"\n")?;
    }

    fmt.current_indent -= 1;
    fmt.write_indent(fmt.current_indent)?;
    fmt.write_bytes(b"}")
}

type BlockShape<'v> = Vec<(Vec<&'v str>, &'v Map<String, Value>)>;

/// Decides whether the body entry `key = value` renders as one or more blocks.
///
/// A non-empty object value renders as a block. While every value of such an object is itself
/// a non-empty object, its keys become block labels, up to two levels deep. Returns the labels
/// and body of each resulting block, or `None` if the entry renders as an attribute.
fn block_shape<'v>(key: &str, value: &'v Value) -> Option<BlockShape<'v>> {
    if !is_ident(key) {
        return None;
    }

    let mut blocks = Vec::new();

    if collect_blocks(block_body(value)?, &mut Vec::new(), &mut blocks) {
        Some(blocks)
    } else {
        None
    }
}

// Returns `false` if a block body has a key that cannot be written as an attribute name.
fn collect_blocks<'v>(
    body: &'v Map<String, Value>,
    labels: &mut Vec<&'v str>,
    blocks: &mut BlockShape<'v>,
) -> bool {
    let labelled = labels.len() < MAX_BLOCK_LABELS
        && body.values().all(|value| block_body(value).is_some());

    if !labelled {
        if !body.keys().all(|key| is_ident(key)) {
            return false;
        }

        blocks.push((labels.clone(), body));
        return true;
    }

    for (label, value) in body {
        let Some(inner) = block_body(value) else {
            continue;
        };

        labels.push(label);
        let ok = collect_blocks(inner, labels, blocks);
        labels.pop();

        if !ok {
            return false;
        }
    }

    true
}

// Function call placeholders are objects too, but render as expressions.
fn block_body(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(object) if !object.is_empty() && value.as_func_call().is_none() => {
            Some(object)
        }
        _ => None,
    }
}
