use super::token::{self, Token, TokenKind};

/// A position in a token slice shared by the block parser and the expression parser.
///
/// The slice always ends with a [`TokenKind::Eof`] token. The cursor never moves past it, so
/// `peek` and `advance` can be called on an exhausted cursor any number of times.
pub(super) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(tokens: &'a [Token]) -> Cursor<'a> {
        debug_assert!(matches!(
            tokens.last(),
            Some(Token {
                kind: TokenKind::Eof,
                ..
            })
        ));

        Cursor { tokens, pos: 0 }
    }

    pub(super) fn peek(&self) -> &'a Token {
        self.peek_nth(0)
    }

    pub(super) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub(super) fn peek_nth(&self, n: usize) -> &'a Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    /// Returns the current token and moves past it.
    pub(super) fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it is of `kind`.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<&'a Token> {
        if self.peek_kind() == kind {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Returns the first token that is not a newline without moving.
    pub(super) fn peek_past_newlines(&self) -> &'a Token {
        let skipped = self.tokens[self.pos..]
            .iter()
            .take_while(|token| token.kind == TokenKind::Newline)
            .count();
        self.peek_nth(skipped)
    }

    pub(super) fn skip_newlines(&mut self) {
        while self.eat(TokenKind::Newline).is_some() {}
    }

    pub(super) fn mark(&self) -> usize {
        self.pos
    }

    pub(super) fn reset(&mut self, mark: usize) {
        self.pos = mark.min(self.tokens.len() - 1);
    }

    /// Index of the bracket closing the one opened at `open`.
    pub(super) fn closing(&self, open: usize) -> Option<usize> {
        token::find_closing(self.tokens, open)
    }

    /// Moves forward until one of `stops` is found outside of brackets, an unmatched closing
    /// bracket is reached or the input ends.
    pub(super) fn skip_until(&mut self, stops: &[TokenKind]) {
        let mut depth = 0usize;

        loop {
            let kind = self.peek_kind();

            match kind {
                TokenKind::Eof => break,
                _ if depth == 0 && stops.contains(&kind) => break,
                _ if kind.is_opening_bracket() => depth += 1,
                _ if kind.is_closing_bracket() => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }

            self.advance();
        }
    }
}
