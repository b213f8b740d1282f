use super::expr::Context;
use super::token::TokenKind;
use super::ParseState;
use crate::structure::{Attribute, Block, BlockLabel, Body, Structure};
use crate::Result;

impl<'a> ParseState<'a> {
    /// Parses a complete document. Fails unless all input is consumed.
    pub(super) fn parse_document(&mut self) -> Result<Body> {
        let body = self.parse_body(false)?;
        self.expect(TokenKind::Eof, "end of file")?;
        Ok(body)
    }

    // Parses structures until the end of input or, inside a block, until the closing brace which
    // is left for the caller to consume.
    fn parse_body(&mut self, in_block: bool) -> Result<Body> {
        let mut structures = Vec::new();

        loop {
            self.cursor.skip_newlines();

            match self.cursor.peek_kind() {
                TokenKind::Eof if !in_block => break,
                TokenKind::RightBrace if in_block => break,
                TokenKind::Eof => return Err(self.unexpected("`}`")),
                kind if kind.is_identifier_like() => {}
                kind if kind.is_quoted() && self.cursor.peek_nth(1).kind == TokenKind::Equals => {}
                _ => return Err(self.unexpected("identifier")),
            }

            structures.push(self.parse_structure()?);

            match self.cursor.peek_kind() {
                TokenKind::Newline => {
                    self.cursor.advance();
                }
                TokenKind::Eof => {}
                TokenKind::RightBrace if in_block => {}
                _ => return Err(self.unexpected("newline")),
            }
        }

        Ok(Body(structures))
    }

    fn parse_structure(&mut self) -> Result<Structure> {
        let name = self.cursor.advance();

        if self.cursor.eat(TokenKind::Equals).is_some() {
            let value = self.parse_expression(&Context::default(), 0)?;
            return Ok(Structure::Attribute(Attribute::new(name.value.clone(), value)));
        }

        let mut labels = Vec::new();

        loop {
            let token = self.cursor.peek();

            let label = match token.kind {
                TokenKind::String | TokenKind::Interpolation => {
                    BlockLabel::String(token.value.clone())
                }
                TokenKind::Identifier => BlockLabel::Identifier(token.value.clone()),
                _ => break,
            };

            self.cursor.advance();
            labels.push(label);
        }

        self.expect(TokenKind::LeftBrace, "`{`")?;
        let body = self.nested(|p| p.parse_body(true))?;
        self.expect(TokenKind::RightBrace, "`}`")?;

        Ok(Structure::Block(Block {
            identifier: name.value.clone(),
            labels,
            body,
        }))
    }
}
