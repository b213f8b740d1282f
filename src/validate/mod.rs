//! Syntax validation that collects diagnostics instead of failing.
//!
//! The validator lexes the input on its own and walks the token stream with a grammar that is
//! deliberately more forgiving than the parser's: it keeps going after a problem and reports
//! every problem it finds. It checks the structural rules of HCL that are easy to get wrong:
//!
//! - a comma may not separate the arguments of a body,
//! - a single-line block holds at most one argument and no nested blocks,
//! - every opening brace of a block has a matching closing brace.
//!
//! # Example
//!
//! ```
//! use hcl_lite::validate::{validate, Severity};
//!
//! let diagnostics = validate(r#"a { b = "foo", c = "bar" }"#);
//!
//! assert_eq!(diagnostics.len(), 2);
//! assert_eq!(diagnostics[0].severity, Severity::Error);
//! assert_eq!(diagnostics[0].message, "Each argument must be on its own line");
//! assert_eq!(diagnostics[0].range.from.column, 14);
//! ```

mod diagnostic;
#[cfg(test)]
mod tests;

pub use self::diagnostic::{Diagnostic, Position, Severity, SourceRange};
use crate::parser::{match_brackets, skip_expression, Lexer, Token, TokenKind};

const MSG_COMMA: &str = "Each argument must be on its own line";
const MSG_SINGLE_LINE_ARGUMENTS: &str =
    "Only one argument is allowed in a single-line block definition";
const MSG_SINGLE_LINE_NESTED: &str =
    "A single-line block definition cannot contain another block definition";
const MSG_INVALID_BLOCK: &str = "Invalid block definition: either a quoted string block label or an opening brace (\"{\") is expected here";
const MSG_UNCLOSED_BLOCK: &str = "Unclosed block definition";

/// Validates the syntax of `source` and returns all problems found, in the order they were
/// found.
///
/// Validation never fails. If the input cannot be lexed, the lexer error is returned as the
/// only diagnostic, positioned at the start of the input.
pub fn validate(source: &str) -> Vec<Diagnostic> {
    let mut tokens = match Lexer::new(source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => {
            tracing::debug!(error = %err, "input cannot be lexed");
            let start = Position::new(1, 1, 0);
            return vec![Diagnostic::error(
                err.to_string(),
                SourceRange::new(start, start),
            )];
        }
    };

    tokens.retain(|token| token.kind != TokenKind::Comment);

    let mut validator = Validator::new(source, &tokens);
    validator.validate_body();

    tracing::debug!(
        tokens = tokens.len(),
        diagnostics = validator.diagnostics.len(),
        "validated input"
    );

    validator.diagnostics
}

// Byte offsets of line starts, to turn character positions into byte offsets.
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> LineIndex<'a> {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        LineIndex { source, starts }
    }

    fn position(&self, line: usize, column: usize) -> Position {
        let start = self
            .starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(self.source.len());

        let byte = start
            + self.source[start..]
                .chars()
                .take(column.saturating_sub(1))
                .map(char::len_utf8)
                .sum::<usize>();

        Position::new(line, column, byte)
    }
}

// Number of characters a token occupies on its line, as far as it can be told from the token.
fn token_width(token: &Token) -> usize {
    match token.kind {
        TokenKind::Eof => 0,
        TokenKind::Newline => 1,
        TokenKind::String | TokenKind::Interpolation => token.value.chars().count() + 2,
        TokenKind::Heredoc => 2,
        _ => token.value.chars().count(),
    }
}

// Bracket nesting of the token stream, computed once up front.
struct Brackets {
    // Index of the matching closing bracket for every opening bracket.
    closing: Vec<Option<usize>>,
    // Whether a newline appears directly inside the bracket opened at an index.
    multi_line: Vec<bool>,
}

impl Brackets {
    fn new(tokens: &[Token]) -> Brackets {
        let mut multi_line = vec![false; tokens.len()];
        let mut open = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Newline => {
                    if let Some(&start) = open.last() {
                        multi_line[start] = true;
                    }
                }
                kind if kind.is_opening_bracket() => open.push(index),
                kind if kind.is_closing_bracket() => {
                    open.pop();
                }
                _ => {}
            }
        }

        Brackets {
            closing: match_brackets(tokens),
            multi_line,
        }
    }

    fn closing(&self, open: usize) -> Option<usize> {
        self.closing.get(open).copied().flatten()
    }
}

struct Validator<'a> {
    tokens: &'a [Token],
    pos: usize,
    lines: LineIndex<'a>,
    brackets: Brackets,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Validator<'a> {
    fn new(source: &'a str, tokens: &'a [Token]) -> Validator<'a> {
        Validator {
            tokens,
            pos: 0,
            lines: LineIndex::new(source),
            brackets: Brackets::new(tokens),
            diagnostics: Vec::new(),
        }
    }

    fn token(&self, index: usize) -> &'a Token {
        let last = self.tokens.len() - 1;
        &self.tokens[index.min(last)]
    }

    fn peek(&self) -> &'a Token {
        self.token(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn error(&mut self, message: &str, token: &Token) {
        let from = self.lines.position(token.line, token.column);
        let to = self
            .lines
            .position(token.line, token.column + token_width(token));

        self.diagnostics
            .push(Diagnostic::error(message, SourceRange::new(from, to)));
    }

    fn validate_body(&mut self) {
        while self.peek_kind() != TokenKind::Eof {
            self.validate_top_level_element();
        }
    }

    fn validate_top_level_element(&mut self) {
        let token = self.peek();
        self.advance();

        if token.kind.is_quoted() && self.peek_kind() == TokenKind::Equals {
            self.advance();
            self.validate_attribute();
            return;
        }

        if !token.kind.is_identifier_like() {
            return;
        }

        if self.peek_kind() == TokenKind::Equals {
            self.advance();
            self.validate_attribute();
        } else {
            self.validate_block();
        }
    }

    // Expects the cursor on the first token of the attribute value.
    fn validate_attribute(&mut self) {
        self.pos = skip_expression(self.tokens, self.pos);

        let token = self.peek();
        if token.kind == TokenKind::Comma {
            self.error(MSG_COMMA, token);
            self.advance();
        }
    }

    // Expects the cursor on the first token after the block identifier.
    fn validate_block(&mut self) {
        while self.peek_kind().is_label() {
            self.advance();
        }

        let open = self.pos;
        let token = self.peek();

        if token.kind != TokenKind::LeftBrace {
            self.error(MSG_INVALID_BLOCK, token);
            self.skip_line();
            return;
        }

        let Some(close) = self.brackets.closing(open) else {
            self.error(MSG_UNCLOSED_BLOCK, token);
            self.advance();
            return;
        };

        self.pos = open + 1;

        if self.brackets.multi_line[open] {
            self.validate_multi_line_block(close);
        } else {
            self.validate_single_line_block(close);
        }

        self.pos = close + 1;
    }

    // Skips the rest of the line, leaving a closing brace for the enclosing block.
    fn skip_line(&mut self) {
        while !matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::RightBrace | TokenKind::Eof
        ) {
            self.advance();
        }
    }

    fn validate_multi_line_block(&mut self, close: usize) {
        while self.pos < close {
            self.validate_top_level_element();
        }
    }

    fn validate_single_line_block(&mut self, close: usize) {
        let mut arguments = 0;

        while self.pos < close {
            let token = self.peek();
            let next = self.token(self.pos + 1);

            let is_name = token.kind.is_identifier_like() || token.kind.is_quoted();

            if is_name && next.kind == TokenKind::Equals {
                arguments += 1;
                if arguments > 1 {
                    self.error(MSG_SINGLE_LINE_ARGUMENTS, token);
                }

                self.pos += 2;
                self.validate_attribute();
                continue;
            }

            let nested_block = match token.kind {
                TokenKind::LeftBrace | TokenKind::String | TokenKind::Interpolation => true,
                kind if kind.is_identifier_like() => {
                    next.kind.is_label() || next.kind == TokenKind::LeftBrace
                }
                _ => false,
            };

            if nested_block {
                self.error(MSG_SINGLE_LINE_NESTED, token);
                self.skip_nested_block(close);
            } else {
                self.advance();
            }
        }
    }

    // Skips a nested block inside the block closed at `close` without validating it.
    fn skip_nested_block(&mut self, close: usize) {
        let end = (self.pos..close)
            .find(|&index| self.tokens[index].kind == TokenKind::LeftBrace)
            .and_then(|brace| self.brackets.closing(brace));

        self.pos = match end {
            Some(end) if end < close => end + 1,
            _ => close,
        };
    }
}
