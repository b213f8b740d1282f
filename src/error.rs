//! The `Error` and `Result` types used by this crate.
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// The result type used by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type used by this crate.
///
/// Lexical and grammatical errors are raised by the fail-fast parsing path and carry the
/// [`Location`] where the problem was detected. The schema-oriented variants
/// ([`MissingRequiredField`][Error::MissingRequiredField] and friends) are never produced by the
/// generic parser. They exist for stricter parsers built on top of it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A character that cannot start any token.
    #[error("unexpected character `{ch}` {location}")]
    UnexpectedCharacter {
        /// The offending character.
        ch: char,
        /// Where the character was found.
        location: Location,
    },
    /// A quoted string that is not closed before the end of input.
    #[error("unterminated string starting {location}")]
    UnterminatedString {
        /// Where the string starts.
        location: Location,
    },
    /// A `/* ... */` comment that is not closed before the end of input.
    #[error("unterminated comment starting {location}")]
    UnterminatedComment {
        /// Where the comment starts.
        location: Location,
    },
    /// A heredoc with an invalid introducer or without a closing delimiter.
    #[error("malformed heredoc {location}: {reason}")]
    MalformedHeredoc {
        /// What is wrong with the heredoc.
        reason: String,
        /// Where the heredoc starts.
        location: Location,
    },
    /// A token that does not fit the grammar at this position.
    #[error("unexpected token `{found}`, expected {expected} {location}")]
    UnexpectedToken {
        /// Description of what the parser expected.
        expected: String,
        /// The text of the token that was found instead.
        found: String,
        /// Where the token was found.
        location: Location,
    },
    /// The input ended while the parser still expected more.
    #[error("unexpected end of file, expected {expected} {location}")]
    UnexpectedEndOfFile {
        /// Description of what the parser expected.
        expected: String,
        /// Position of the end of input.
        location: Location,
    },
    /// Arithmetic division or modulo with a zero divisor.
    #[error("division by zero {location}")]
    DivisionByZero {
        /// Where the operator was found.
        location: Location,
    },
    /// A configured parser limit was exceeded.
    #[error("{limit} limit of {max} exceeded {location}")]
    LimitExceeded {
        /// The limit that was hit.
        limit: Limit,
        /// The configured maximum.
        max: usize,
        /// Where the limit was hit.
        location: Location,
    },
    /// A field required by a schema is absent.
    #[error("missing required field `{field}` in `{block}`")]
    MissingRequiredField {
        /// The missing field.
        field: String,
        /// The block the field is missing from.
        block: String,
    },
    /// A value does not satisfy a schema.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// The field holding the value.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A block type a schema does not know about.
    #[error("invalid block type `{block_type}` {location}")]
    InvalidBlockType {
        /// The rejected block type.
        block_type: String,
        /// Where the block starts.
        location: Location,
    },
    /// The same name was defined twice where a schema forbids it.
    #[error("duplicate definition of `{name}` {location}")]
    DuplicateDefinition {
        /// The duplicated name.
        name: String,
        /// Where the second definition starts.
        location: Location,
    },
    /// A reference that could not be resolved against the known declarations.
    #[error("unresolved reference `{reference}` {location}")]
    UnresolvedReference {
        /// The reference path, e.g. `var.region`.
        reference: String,
        /// Where the reference was found.
        location: Location,
    },
    /// Reading an input file failed.
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        /// The path of the file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Writing output failed.
    #[error(transparent)]
    Write(#[from] io::Error),
    /// JSON input could not be decoded or output could not be encoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn unexpected_token<E, F>(expected: E, found: F, location: Location) -> Error
    where
        E: Display,
        F: Display,
    {
        Error::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            location,
        }
    }

    pub(crate) fn unexpected_eof<E>(expected: E, location: Location) -> Error
    where
        E: Display,
    {
        Error::UnexpectedEndOfFile {
            expected: expected.to_string(),
            location,
        }
    }

    /// Returns the `Location` in the input where the error happened, if available.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::UnexpectedCharacter { location, .. }
            | Error::UnterminatedString { location }
            | Error::UnterminatedComment { location }
            | Error::MalformedHeredoc { location, .. }
            | Error::UnexpectedToken { location, .. }
            | Error::UnexpectedEndOfFile { location, .. }
            | Error::DivisionByZero { location }
            | Error::LimitExceeded { location, .. }
            | Error::InvalidBlockType { location, .. }
            | Error::DuplicateDefinition { location, .. }
            | Error::UnresolvedReference { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Returns `true` if the error was raised while turning characters into tokens.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedCharacter { .. }
                | Error::UnterminatedString { .. }
                | Error::UnterminatedComment { .. }
                | Error::MalformedHeredoc { .. }
        )
    }
}

/// One-based line and column at which the error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// The one-based line number of the error.
    pub line: usize,
    /// The one-based column number of the error, counted in characters.
    pub col: usize,
}

impl Location {
    pub(crate) fn new(line: usize, col: usize) -> Location {
        Location { line, col }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in line {}, column {}", self.line, self.col)
    }
}

/// The parser limits that can be configured via [`ParserBuilder`][crate::parser::ParserBuilder].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Maximum nesting of blocks, collections, groupings and function calls.
    NestingDepth,
    /// Maximum number of entries a single for-expression may iterate.
    ForIterations,
}

impl Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::NestingDepth => f.write_str("nesting depth"),
            Limit::ForIterations => f.write_str("for-expression iteration"),
        }
    }
}
