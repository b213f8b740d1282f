//! Parse HCL source text into values.
//!
//! The parser works in a single pass over the token stream produced by the [`Lexer`]. Expressions
//! are evaluated eagerly while they are parsed, so the result is plain data: a [`Map`] of
//! attribute values and nested block bodies, or an ordered [`Body`] when the block structure
//! should be kept.
//!
//! Identifiers that cannot be resolved are kept as [`Value::Reference`] and function calls are
//! kept as placeholder objects (see [`Value::func_call`]).

mod cursor;
mod expr;
mod lexer;
mod structure;
#[cfg(test)]
mod tests;
mod token;

pub use self::lexer::{tokenize, Lexer};
pub use self::token::{Token, TokenKind};
pub(crate) use self::token::{match_brackets, skip_expression};

use self::cursor::Cursor;
use self::expr::Context;
use crate::error::{Error, Limit};
use crate::structure::Body;
use crate::{Map, Result, Value};
use std::fs;
use std::path::Path;

const DEFAULT_MAX_NESTING_DEPTH: usize = 128;
const DEFAULT_MAX_FOR_ITERATIONS: usize = 100_000;

/// A configurable HCL parser.
///
/// The free functions [`parse`], [`parse_body`], [`parse_expression`] and [`parse_file`] use a
/// `Parser` with the default configuration.
///
/// # Example
///
/// ```
/// use hcl_lite::parser::Parser;
///
/// let parser = Parser::builder().max_nesting_depth(8).build();
///
/// assert!(parser.parse("a = [[1]]").is_ok());
/// assert!(parser.parse("a = [[[[[1]]]]]").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    max_nesting_depth: usize,
    max_for_iterations: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Parser {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_for_iterations: DEFAULT_MAX_FOR_ITERATIONS,
        }
    }
}

/// A builder to create a [`Parser`].
#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    parser: Parser,
}

impl ParserBuilder {
    /// Sets how deep blocks, collections, parentheses, function calls and unary operators may
    /// nest before parsing fails with [`Error::LimitExceeded`].
    ///
    /// The default is 128.
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.parser.max_nesting_depth = depth;
        self
    }

    /// Sets how many entries the collection of a single for-expression may have.
    ///
    /// The body of a for-expression is evaluated once per entry. The default is 100000.
    pub fn max_for_iterations(mut self, iterations: usize) -> Self {
        self.parser.max_for_iterations = iterations;
        self
    }

    /// Consumes the builder and returns the configured `Parser`.
    pub fn build(self) -> Parser {
        self.parser
    }
}

impl Parser {
    /// Creates a new [`ParserBuilder`] to start building a new `Parser`.
    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    /// Parses a document into a map with merged blocks.
    ///
    /// # Errors
    ///
    /// Fails with the first lexical or grammatical error.
    pub fn parse(&self, input: &str) -> Result<Map<String, Value>> {
        self.parse_body(input).map(Body::into_map)
    }

    /// Parses a document into its ordered attributes and blocks.
    ///
    /// # Errors
    ///
    /// Fails with the first lexical or grammatical error.
    pub fn parse_body(&self, input: &str) -> Result<Body> {
        let tokens = significant_tokens(input)?;
        tracing::debug!(tokens = tokens.len(), "parsing body");

        let mut state = ParseState::new(&tokens, self);
        state.parse_document()
    }

    /// Parses and evaluates a single expression.
    ///
    /// # Errors
    ///
    /// Fails if the input is not exactly one expression.
    pub fn parse_expression(&self, input: &str) -> Result<Value> {
        let tokens = significant_tokens(input)?;
        tracing::debug!(tokens = tokens.len(), "parsing expression");

        let mut state = ParseState::new(&tokens, self);
        state.cursor.skip_newlines();
        let value = state.parse_expression(&Context::default(), 0)?;
        state.cursor.skip_newlines();
        state.expect(TokenKind::Eof, "end of file")?;
        Ok(value)
    }

    /// Reads the file at `path` and parses it like [`Parser::parse`].
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Io`] if the file cannot be read, and with the first parse error
    /// otherwise.
    pub fn parse_file<P>(&self, path: P) -> Result<Map<String, Value>>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading file");

        let input = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;

        self.parse(&input)
    }
}

// Comments never carry meaning for the parser.
fn significant_tokens(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Lexer::new(input).tokenize()?;
    tokens.retain(|token| token.kind != TokenKind::Comment);
    Ok(tokens)
}

/// Parser state shared by the block and expression parsers.
struct ParseState<'a> {
    cursor: Cursor<'a>,
    options: &'a Parser,
    depth: usize,
    // Newlines before an operator are insignificant inside parentheses and brackets.
    in_brackets: bool,
}

impl<'a> ParseState<'a> {
    fn new(tokens: &'a [Token], options: &'a Parser) -> ParseState<'a> {
        ParseState {
            cursor: Cursor::new(tokens),
            options,
            depth: 0,
            in_brackets: false,
        }
    }

    // Runs `f` one nesting level deeper.
    fn nested<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let max = self.options.max_nesting_depth;

        if self.depth >= max {
            return Err(Error::LimitExceeded {
                limit: Limit::NestingDepth,
                max,
                location: self.cursor.peek().location(),
            });
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // Runs `f` inside (`true`) or outside (`false`) of parentheses and brackets.
    fn with_brackets<T, F>(&mut self, in_brackets: bool, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let outer = std::mem::replace(&mut self.in_brackets, in_brackets);
        let result = f(self);
        self.in_brackets = outer;
        result
    }

    // Builds the error for an unexpected current token.
    fn unexpected(&self, expected: &str) -> Error {
        let token = self.cursor.peek();

        if token.kind == TokenKind::Eof {
            Error::unexpected_eof(expected, token.location())
        } else {
            Error::unexpected_token(expected, token.display_text(), token.location())
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<&'a Token> {
        self.cursor
            .eat(kind)
            .ok_or_else(|| self.unexpected(expected))
    }
}

/// Parses a HCL document into a map of attribute values and merged block bodies.
///
/// Blocks are nested by their labels and blocks sharing type and labels are merged.
///
/// # Example
///
/// ```
/// use hcl_lite::Value;
///
/// let input = r#"
/// service "http" "web_proxy" {
///   listen_addr = "127.0.0.1:8080"
/// }
/// "#;
///
/// let map = hcl_lite::parse(input)?;
///
/// let listen_addr = map["service"]
///     .as_object()
///     .and_then(|service| service["http"].as_object())
///     .and_then(|http| http["web_proxy"].as_object())
///     .map(|proxy| &proxy["listen_addr"]);
///
/// assert_eq!(listen_addr, Some(&Value::from("127.0.0.1:8080")));
/// # Ok::<(), hcl_lite::Error>(())
/// ```
///
/// # Errors
///
/// Fails with the first lexical or grammatical error in `input`.
pub fn parse(input: &str) -> Result<Map<String, Value>> {
    Parser::default().parse(input)
}

/// Parses a HCL document into a [`Body`] which keeps the order and provenance of attributes and
/// blocks.
///
/// # Errors
///
/// Fails with the first lexical or grammatical error in `input`.
pub fn parse_body(input: &str) -> Result<Body> {
    Parser::default().parse_body(input)
}

/// Parses and evaluates a single HCL expression.
///
/// ```
/// use hcl_lite::Value;
///
/// assert_eq!(
///     hcl_lite::parse_expression("2 + 3 * 4 > 10 && true || false")?,
///     Value::Bool(true)
/// );
/// # Ok::<(), hcl_lite::Error>(())
/// ```
///
/// # Errors
///
/// Fails if `input` is not exactly one valid expression.
pub fn parse_expression(input: &str) -> Result<Value> {
    Parser::default().parse_expression(input)
}

/// Reads and parses a HCL file.
///
/// # Errors
///
/// Fails with [`Error::Io`] if the file cannot be read and with the first parse error otherwise.
pub fn parse_file<P>(path: P) -> Result<Map<String, Value>>
where
    P: AsRef<Path>,
{
    Parser::default().parse_file(path)
}
