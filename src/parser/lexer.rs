//! Turns HCL source text into a flat sequence of [`Token`]s.

use super::token::{Token, TokenKind};
use crate::error::{Error, Location, Result};

/// A hand-written HCL lexer.
///
/// Positions are tracked in characters, not bytes, so columns stay stable for multi-byte UTF-8
/// input.
///
/// # Example
///
/// ```
/// use hcl_lite::parser::{Lexer, TokenKind};
///
/// let tokens = Lexer::new("port = 8080").tokenize()?;
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
///
/// assert_eq!(
///     kinds,
///     [TokenKind::Identifier, TokenKind::Equals, TokenKind::Number, TokenKind::Eof]
/// );
/// # Ok::<(), hcl_lite::Error>(())
/// ```
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    /// Creates a lexer for `source`.
    pub fn new(source: &str) -> Lexer {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    /// Consumes the lexer and returns all tokens. The last token is always
    /// [`TokenKind::Eof`].
    ///
    /// # Errors
    ///
    /// Fails on the first malformed lexeme: an unexpected character, an unterminated string or
    /// block comment, or a malformed heredoc.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        while let Some(ch) = self.peek() {
            let (line, column) = (self.line, self.column);

            match ch {
                ' ' | '\t' | '\r' => self.bump(),
                '\n' => {
                    self.bump();
                    self.push(TokenKind::Newline, "\n", line, column);
                }
                '#' => {
                    self.bump();
                    self.line_comment(line, column);
                }
                '/' if self.peek_at(1) == Some('/') => {
                    self.bump_n(2);
                    self.line_comment(line, column);
                }
                '/' if self.peek_at(1) == Some('*') => self.block_comment(line, column)?,
                '<' if self.peek_at(1) == Some('<') => self.heredoc(line, column)?,
                '"' => self.string(line, column)?,
                c if c.is_ascii_digit() => self.number(line, column),
                '-' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
                    && !self.previous_ends_operand() =>
                {
                    self.number(line, column);
                }
                c if c.is_ascii_alphabetic() || c == '_' => self.identifier(line, column),
                _ => self.operator(ch, line, column)?,
            }
        }

        let (line, column) = (self.line, self.column);
        self.push(TokenKind::Eof, "", line, column);
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn bump(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn push<V>(&mut self, kind: TokenKind, value: V, line: usize, column: usize)
    where
        V: Into<String>,
    {
        self.tokens.push(Token::new(kind, value, line, column));
    }

    fn last_significant(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .map(|token| token.kind)
            .find(|kind| *kind != TokenKind::Comment)
    }

    // A `-` directly followed by a digit is a sign unless it follows an operand, in which case it
    // is the subtraction operator (`5-3`).
    fn previous_ends_operand(&self) -> bool {
        self.last_significant().is_some_and(TokenKind::ends_operand)
    }

    fn line_comment(&mut self, line: usize, column: usize) {
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            text.push(ch);
            self.bump();
        }

        self.push(TokenKind::Comment, text.trim(), line, column);
    }

    fn block_comment(&mut self, line: usize, column: usize) -> Result<()> {
        self.bump_n(2);
        let mut text = String::new();

        loop {
            match self.peek() {
                None => {
                    return Err(Error::UnterminatedComment {
                        location: Location::new(line, column),
                    })
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.bump_n(2);
                    break;
                }
                Some(ch) => {
                    text.push(ch);
                    self.bump();
                }
            }
        }

        tracing::trace!(line, column, "lexed block comment");
        self.push(TokenKind::Comment, text.trim(), line, column);
        Ok(())
    }

    fn string(&mut self, line: usize, column: usize) -> Result<()> {
        let unterminated = || Error::UnterminatedString {
            location: Location::new(line, column),
        };

        self.bump();
        let mut value = String::new();
        let mut interpolated = false;

        loop {
            match self.peek() {
                None => return Err(unterminated()),
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    let escaped = self.peek().ok_or_else(unterminated)?;
                    self.bump();

                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        '$' => value.push('$'),
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                // `$${` is the template escape for a literal `${` and is kept verbatim.
                Some('$') if self.peek_at(1) == Some('$') && self.peek_at(2) == Some('{') => {
                    value.push_str("$${");
                    self.bump_n(3);
                }
                Some('$') if self.peek_at(1) == Some('{') => {
                    interpolated = true;
                    self.interpolation(&mut value).ok_or_else(unterminated)?;
                }
                Some(ch) => {
                    value.push(ch);
                    self.bump();
                }
            }
        }

        let kind = if interpolated {
            TokenKind::Interpolation
        } else {
            TokenKind::String
        };

        self.push(kind, value, line, column);
        Ok(())
    }

    // Copies a `${ ... }` sequence verbatim, including nested braces and quoted strings. Returns
    // `None` if the input ends first.
    fn interpolation(&mut self, value: &mut String) -> Option<()> {
        value.push_str("${");
        self.bump_n(2);
        let mut depth = 1usize;

        while depth > 0 {
            let ch = self.peek()?;
            value.push(ch);
            self.bump();

            match ch {
                '{' => depth += 1,
                '}' => depth -= 1,
                '"' => loop {
                    let ch = self.peek()?;
                    value.push(ch);
                    self.bump();

                    match ch {
                        '\\' => {
                            value.push(self.peek()?);
                            self.bump();
                        }
                        '"' => break,
                        _ => {}
                    }
                },
                _ => {}
            }
        }

        Some(())
    }

    fn heredoc(&mut self, line: usize, column: usize) -> Result<()> {
        let malformed = |reason: String| Error::MalformedHeredoc {
            reason,
            location: Location::new(line, column),
        };

        self.bump_n(2);

        let flush = self.peek() == Some('-');
        if flush {
            self.bump();
        }

        let mut delimiter = String::new();
        while let Some(ch) = self.peek() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            delimiter.push(ch);
            self.bump();
        }

        if delimiter.is_empty() {
            return Err(malformed("missing delimiter identifier".into()));
        }

        if self.peek() == Some('\r') && self.peek_at(1) == Some('\n') {
            self.bump();
        }

        if self.peek() != Some('\n') {
            return Err(malformed(format!(
                "expected newline after delimiter `{delimiter}`"
            )));
        }

        self.bump();
        let mut lines = Vec::new();

        loop {
            if self.peek().is_none() {
                return Err(malformed(format!("missing closing delimiter `{delimiter}`")));
            }

            let mut text = String::new();
            while let Some(ch) = self.peek() {
                if ch == '\n' {
                    break;
                }
                text.push(ch);
                self.bump();
            }

            let text = text.trim_end_matches('\r');
            let candidate = if flush {
                text.trim_start_matches([' ', '\t'])
            } else {
                text
            };

            if candidate == delimiter {
                break;
            }

            lines.push(text.to_owned());

            if self.peek().is_none() {
                return Err(malformed(format!("missing closing delimiter `{delimiter}`")));
            }

            self.bump();
        }

        if flush {
            strip_common_indent(&mut lines);
        }

        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        tracing::trace!(%delimiter, flush, lines = lines.len(), "lexed heredoc");
        self.push(TokenKind::Heredoc, content, line, column);
        Ok(())
    }

    fn number(&mut self, line: usize, column: usize) {
        let mut literal = String::new();

        // A number directly after `.` is a legacy index (`list.0.id`) and never has a fraction.
        let is_index = self.last_significant() == Some(TokenKind::Dot);

        if self.peek() == Some('-') {
            literal.push('-');
            self.bump();
        }

        self.digits(&mut literal);

        while !is_index
            && self.peek() == Some('.')
            && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            literal.push('.');
            self.bump();
            self.digits(&mut literal);
        }

        if !is_index && matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };

            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    literal.extend(self.peek());
                    self.bump();
                }
                self.digits(&mut literal);
            }
        }

        self.push(TokenKind::Number, literal, line, column);
    }

    fn digits(&mut self, literal: &mut String) {
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            literal.push(ch);
            self.bump();
        }
    }

    fn identifier(&mut self, line: usize, column: usize) {
        let mut ident = String::new();

        while let Some(ch) = self.peek() {
            if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-') {
                break;
            }
            ident.push(ch);
            self.bump();
        }

        let kind = match ident.as_str() {
            "true" | "false" => TokenKind::Bool,
            "null" => TokenKind::Null,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "if" => TokenKind::If,
            _ => TokenKind::Identifier,
        };

        self.push(kind, ident, line, column);
    }

    fn operator(&mut self, ch: char, line: usize, column: usize) -> Result<()> {
        if ch == '.' && self.peek_at(1) == Some('.') && self.peek_at(2) == Some('.') {
            self.bump_n(3);
            self.push(TokenKind::Ellipsis, "...", line, column);
            return Ok(());
        }

        let two = match (ch, self.peek_at(1)) {
            ('=', Some('=')) => Some(TokenKind::EqualEqual),
            ('!', Some('=')) => Some(TokenKind::NotEqual),
            ('<', Some('=')) => Some(TokenKind::LessEqual),
            ('>', Some('=')) => Some(TokenKind::GreaterEqual),
            ('&', Some('&')) => Some(TokenKind::And),
            ('|', Some('|')) => Some(TokenKind::Or),
            ('=', Some('>')) => Some(TokenKind::Arrow),
            _ => None,
        };

        if let Some(kind) = two {
            let text: String = self.chars[self.pos..self.pos + 2].iter().collect();
            self.bump_n(2);
            self.push(kind, text, line, column);
            return Ok(());
        }

        let kind = match ch {
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            '=' => TokenKind::Equals,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            '!' => TokenKind::Not,
            '?' => TokenKind::Question,
            _ => {
                return Err(Error::UnexpectedCharacter {
                    ch,
                    location: Location::new(line, column),
                })
            }
        };

        self.bump();
        self.push(kind, ch.to_string(), line, column);
        Ok(())
    }
}

// Removes the shortest leading whitespace run of all non-blank lines from every line.
fn strip_common_indent(lines: &mut [String]) {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| matches!(c, ' ' | '\t')).count())
        .min()
        .unwrap_or(0);

    if indent == 0 {
        return;
    }

    for line in lines.iter_mut() {
        let strip = line
            .chars()
            .take(indent)
            .take_while(|c| matches!(c, ' ' | '\t'))
            .map(char::len_utf8)
            .sum::<usize>();
        line.drain(..strip);
    }
}

/// Tokenizes `source`. Shorthand for `Lexer::new(source).tokenize()`.
///
/// # Errors
///
/// See [`Lexer::tokenize`].
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}
