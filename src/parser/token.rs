//! Tokens produced by the [`Lexer`][super::Lexer].

use std::fmt;

/// The classification of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A quoted string without interpolation markers.
    String,
    /// A quoted string containing at least one `${` interpolation.
    Interpolation,
    /// The content of a `<<DELIM` or `<<-DELIM` heredoc.
    Heredoc,
    /// A numeric literal.
    Number,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
    /// An identifier.
    Identifier,
    /// The `for` keyword.
    For,
    /// The `in` keyword.
    In,
    /// The `if` keyword.
    If,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `=>`
    Arrow,
    /// `...`
    Ellipsis,
    /// `=`
    Equals,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqualEqual,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,
    /// `?`
    Question,
    /// A `#`, `//` or `/* */` comment. The value holds the trimmed comment text.
    Comment,
    /// A line break.
    Newline,
    /// End of input. Always the last token.
    Eof,
}

impl TokenKind {
    /// Returns true for tokens that can name an attribute or block: identifiers and the keywords
    /// that read like identifiers.
    pub fn is_identifier_like(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Bool
                | TokenKind::Null
                | TokenKind::For
                | TokenKind::In
                | TokenKind::If
        )
    }

    /// Returns true for quoted strings, which name an attribute when followed by `=`.
    pub(crate) fn is_quoted(self) -> bool {
        matches!(self, TokenKind::String | TokenKind::Interpolation)
    }

    /// Returns true for tokens that may appear as block labels.
    pub fn is_label(self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::Interpolation | TokenKind::Identifier
        )
    }

    /// Returns true for tokens after which a `-` is a binary operator rather than a sign.
    pub(crate) fn ends_operand(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Interpolation
                | TokenKind::Heredoc
                | TokenKind::Number
                | TokenKind::Bool
                | TokenKind::Null
                | TokenKind::Identifier
                | TokenKind::RightBrace
                | TokenKind::RightBracket
                | TokenKind::RightParen
        )
    }

    // Literals and names. Brackets are left out since they may also continue an operand, as in
    // `f(x)` or `list[0]`.
    fn starts_operand(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Interpolation
                | TokenKind::Heredoc
                | TokenKind::Number
                | TokenKind::Bool
                | TokenKind::Null
                | TokenKind::Identifier
        )
    }

    pub(crate) fn is_opening_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::LeftBrace | TokenKind::LeftBracket | TokenKind::LeftParen
        )
    }

    pub(crate) fn is_closing_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::RightBrace | TokenKind::RightBracket | TokenKind::RightParen
        )
    }

    /// A human readable description used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::String | TokenKind::Interpolation => "string",
            TokenKind::Heredoc => "heredoc",
            TokenKind::Number => "number",
            TokenKind::Bool => "boolean",
            TokenKind::Null => "null",
            TokenKind::Identifier => "identifier",
            TokenKind::For => "`for`",
            TokenKind::In => "`in`",
            TokenKind::If => "`if`",
            TokenKind::LeftBrace => "`{`",
            TokenKind::RightBrace => "`}`",
            TokenKind::LeftBracket => "`[`",
            TokenKind::RightBracket => "`]`",
            TokenKind::LeftParen => "`(`",
            TokenKind::RightParen => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Colon => "`:`",
            TokenKind::Arrow => "`=>`",
            TokenKind::Ellipsis => "`...`",
            TokenKind::Equals => "`=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::EqualEqual => "`==`",
            TokenKind::NotEqual => "`!=`",
            TokenKind::Less => "`<`",
            TokenKind::LessEqual => "`<=`",
            TokenKind::Greater => "`>`",
            TokenKind::GreaterEqual => "`>=`",
            TokenKind::And => "`&&`",
            TokenKind::Or => "`||`",
            TokenKind::Not => "`!`",
            TokenKind::Question => "`?`",
            TokenKind::Comment => "comment",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A lexeme with its classification and the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token classification.
    pub kind: TokenKind,
    /// The token text. For strings and heredocs this is the processed content, for comments the
    /// trimmed comment text.
    pub value: String,
    /// The one-based line of the first character.
    pub line: usize,
    /// The one-based column of the first character, counted in characters.
    pub column: usize,
}

impl Token {
    pub(crate) fn new<V>(kind: TokenKind, value: V, line: usize, column: usize) -> Token
    where
        V: Into<String>,
    {
        Token {
            kind,
            value: value.into(),
            line,
            column,
        }
    }

    /// Returns the token's position as a [`Location`][crate::error::Location].
    pub fn location(&self) -> crate::error::Location {
        crate::error::Location::new(self.line, self.column)
    }

    /// The token text as it is shown in error messages.
    pub(crate) fn display_text(&self) -> &str {
        match self.kind {
            TokenKind::Newline => "\\n",
            TokenKind::Eof => "<eof>",
            _ => &self.value,
        }
    }
}

/// Finds the index of the token closing the bracket opened at `open`.
///
/// All three bracket kinds count towards the nesting depth. Returns `None` if the input ends
/// before the bracket is closed.
pub(crate) fn find_closing(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;

    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token.kind.is_opening_bracket() {
            depth += 1;
        } else if token.kind.is_closing_bracket() {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(index);
            }
        }
    }

    None
}

/// Matches all brackets in one pass.
///
/// Entry `i` of the result is the index of the token closing the bracket opened at `i`. It is
/// `None` if token `i` is not an opening bracket or is never closed. Matching follows the same
/// nesting rules as [`find_closing`].
pub(crate) fn match_brackets(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut closing = vec![None; tokens.len()];
    let mut open = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if token.kind.is_opening_bracket() {
            open.push(index);
        } else if token.kind.is_closing_bracket() {
            if let Some(start) = open.pop() {
                closing[start] = Some(index);
            }
        }
    }

    closing
}

/// Skips an expression starting at `start` and returns the index of the first token after it.
///
/// The scan stops at depth zero on a comma, a newline, an unmatched closing bracket or the end
/// of input. It also stops where a new operand directly follows a complete one without an
/// operator in between, as in `a { b = 1 c = 2 }`.
pub(crate) fn skip_expression(tokens: &[Token], start: usize) -> usize {
    let mut depth = 0usize;
    let mut index = start;
    let mut after_operand = false;

    while let Some(token) = tokens.get(index) {
        match token.kind {
            TokenKind::Eof => break,
            kind if depth == 0 && after_operand && kind.starts_operand() => break,
            kind if kind.is_opening_bracket() => depth += 1,
            kind if kind.is_closing_bracket() => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            TokenKind::Comma | TokenKind::Newline if depth == 0 => break,
            _ => {}
        }

        after_operand = token.kind.ends_operand();
        index += 1;
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Lexer;
    use pretty_assertions::assert_eq;

    #[test]
    fn closing_brackets() {
        let tokens = Lexer::new("a { b = [1, {c = 2}] }").tokenize().unwrap();
        assert_eq!(find_closing(&tokens, 1), Some(13));
        assert_eq!(find_closing(&tokens, 4), Some(12));

        let tokens = Lexer::new("a { b = 1").tokenize().unwrap();
        assert_eq!(find_closing(&tokens, 1), None);
    }

    #[test]
    fn bracket_table() {
        let tokens = Lexer::new("a { b = [1, {c = 2}] }\nd { e = (1").tokenize().unwrap();
        let closing = match_brackets(&tokens);

        assert_eq!(closing[1], Some(13));
        assert_eq!(closing[4], Some(12));
        assert_eq!(closing[7], Some(11));
        assert_eq!(closing.iter().flatten().count(), 3);
    }

    #[test]
    fn expression_skipping() {
        let tokens = Lexer::new("a = [1,\n2], b = 3").tokenize().unwrap();
        let end = skip_expression(&tokens, 2);
        assert_eq!(tokens[end].kind, TokenKind::Comma);
        assert_eq!(end, 8);

        let tokens = Lexer::new("{ a = f(1) }").tokenize().unwrap();
        let end = skip_expression(&tokens, 3);
        assert_eq!(tokens[end].kind, TokenKind::RightBrace);

        let tokens = Lexer::new("b = x.y[0] + 1 c = 2").tokenize().unwrap();
        let end = skip_expression(&tokens, 2);
        assert_eq!(tokens[end].value, "c");
    }
}
