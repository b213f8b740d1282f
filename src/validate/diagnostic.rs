//! Diagnostics reported by the validator.

use serde::Serialize;
use std::fmt;

/// How severe a [`Diagnostic`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The input is not valid HCL.
    Error,
    /// The input is valid but questionable.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A position in the source text.
///
/// Line and column are one-based and count characters. The byte offset is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// The one-based line.
    pub line: usize,
    /// The one-based column, counted in characters.
    pub column: usize,
    /// The zero-based byte offset from the start of the source.
    pub byte: usize,
}

impl Position {
    /// Creates a new `Position`.
    pub fn new(line: usize, column: usize, byte: usize) -> Position {
        Position { line, column, byte }
    }
}

/// A span of source text. `to` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceRange {
    /// The first position in the range.
    pub from: Position,
    /// The position just after the range.
    pub to: Position,
}

impl SourceRange {
    /// Creates a new `SourceRange`.
    pub fn new(from: Position, to: Position) -> SourceRange {
        SourceRange { from, to }
    }
}

/// A problem found in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// The severity of the problem.
    pub severity: Severity,
    /// A human readable description.
    pub message: String,
    /// Where the problem is.
    pub range: SourceRange,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error<M>(message: M, range: SourceRange) -> Diagnostic
    where
        M: Into<String>,
    {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            range,
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning<M>(message: M, range: SourceRange) -> Diagnostic
    where
        M: Into<String>,
    {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            range,
        }
    }

    /// Returns `true` if the diagnostic has [`Severity::Error`].
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} in line {}, column {}",
            self.severity, self.message, self.range.from.line, self.range.from.column
        )
    }
}
