//! Evaluating expression parser.
//!
//! Expressions are not turned into an AST. Every expression is evaluated while it is parsed and
//! yields a [`Value`] right away.

use super::token::{Token, TokenKind};
use super::ParseState;
use crate::error::{Error, Limit, Location, Result};
use crate::{Map, Number, Value};
use std::cmp::Ordering;

const TERNARY_PRECEDENCE: u8 = 1;

/// Variables bound by enclosing for-expressions.
///
/// Each for-expression iteration evaluates its body in a child of the context that was active
/// when the for-expression started, so bindings never outlive their iteration.
#[derive(Debug, Default)]
pub(super) struct Context<'a> {
    vars: Map<&'a str, Value>,
    parent: Option<&'a Context<'a>>,
}

impl<'a> Context<'a> {
    fn child(&'a self) -> Context<'a> {
        Context {
            vars: Map::new(),
            parent: Some(self),
        }
    }

    fn define_var(&mut self, name: &'a str, value: Value) {
        self.vars.insert(name, value);
    }

    fn lookup_var(&self, name: &str) -> Option<&Value> {
        self.vars
            .get(name)
            .or_else(|| self.parent.and_then(|parent| parent.lookup_var(name)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOperator {
    Eq,
    NotEq,
    LessEq,
    GreaterEq,
    Less,
    Greater,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    And,
    Or,
}

impl BinaryOperator {
    fn from_token(kind: TokenKind) -> Option<BinaryOperator> {
        let op = match kind {
            TokenKind::EqualEqual => BinaryOperator::Eq,
            TokenKind::NotEqual => BinaryOperator::NotEq,
            TokenKind::LessEqual => BinaryOperator::LessEq,
            TokenKind::GreaterEqual => BinaryOperator::GreaterEq,
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::Plus => BinaryOperator::Plus,
            TokenKind::Minus => BinaryOperator::Minus,
            TokenKind::Star => BinaryOperator::Mul,
            TokenKind::Slash => BinaryOperator::Div,
            TokenKind::Percent => BinaryOperator::Mod,
            TokenKind::And => BinaryOperator::And,
            TokenKind::Or => BinaryOperator::Or,
            _ => return None,
        };

        Some(op)
    }

    // Returns the operator precedence level. Higher numbers mean higher precedence.
    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 2,
            BinaryOperator::And => 3,
            BinaryOperator::Eq | BinaryOperator::NotEq => 4,
            BinaryOperator::Less
            | BinaryOperator::LessEq
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEq => 5,
            BinaryOperator::Plus | BinaryOperator::Minus => 6,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 7,
        }
    }

    fn apply(self, lhs: Value, rhs: Value, location: Location) -> Result<Value> {
        let value = match self {
            BinaryOperator::Or => Value::Bool(lhs.is_truthy() || rhs.is_truthy()),
            BinaryOperator::And => Value::Bool(lhs.is_truthy() && rhs.is_truthy()),
            BinaryOperator::Eq => Value::Bool(values_equal(&lhs, &rhs)),
            BinaryOperator::NotEq => Value::Bool(!values_equal(&lhs, &rhs)),
            BinaryOperator::Less => Value::Bool(compare(&lhs, &rhs) == Some(Ordering::Less)),
            BinaryOperator::LessEq => Value::Bool(matches!(
                compare(&lhs, &rhs),
                Some(Ordering::Less | Ordering::Equal)
            )),
            BinaryOperator::Greater => {
                Value::Bool(compare(&lhs, &rhs) == Some(Ordering::Greater))
            }
            BinaryOperator::GreaterEq => Value::Bool(matches!(
                compare(&lhs, &rhs),
                Some(Ordering::Greater | Ordering::Equal)
            )),
            BinaryOperator::Plus => float(lhs.to_float() + rhs.to_float()),
            BinaryOperator::Minus => float(lhs.to_float() - rhs.to_float()),
            BinaryOperator::Mul => float(lhs.to_float() * rhs.to_float()),
            BinaryOperator::Div | BinaryOperator::Mod => {
                let divisor = rhs.to_float();
                if divisor == 0.0 {
                    return Err(Error::DivisionByZero { location });
                }

                if self == BinaryOperator::Div {
                    float(lhs.to_float() / divisor)
                } else {
                    float(lhs.to_float() % divisor)
                }
            }
        };

        Ok(value)
    }
}

fn float(f: f64) -> Value {
    Value::Number(Number::Float(f))
}

// Integers compare exactly. Arithmetic yields floats, so a float on either side compares by value.
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(lhs), Value::Number(rhs)) if lhs.is_f64() || rhs.is_f64() => {
            lhs.as_f64() == rhs.as_f64()
        }
        (lhs, rhs) => lhs == rhs,
    }
}

fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::String(lhs), Value::String(rhs)) => Some(lhs.cmp(rhs)),
        (lhs, rhs) => lhs.to_float().partial_cmp(&rhs.to_float()),
    }
}

/// Looks up `name` on `value`. Unresolved references grow by the attribute instead.
fn get_attr(value: Value, name: &str) -> Value {
    match value {
        Value::Reference(path) => Value::Reference(format!("{path}.{name}")),
        Value::Object(mut object) => object.swap_remove(name).unwrap_or_default(),
        _ => Value::Null,
    }
}

/// Indexes into `value`. Unresolved references grow by the index instead.
fn get_index(value: Value, index: &Value) -> Value {
    match value {
        Value::Reference(path) => {
            let index = match index {
                Value::Reference(inner) => inner.clone(),
                Value::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
                other => other.to_key_string(),
            };
            Value::Reference(format!("{path}[{index}]"))
        }
        Value::Array(mut array) => match list_index(index) {
            Some(i) if i < array.len() => array.swap_remove(i),
            _ => Value::Null,
        },
        Value::Object(mut object) => match index {
            Value::Reference(_) => Value::Null,
            index => object.swap_remove(&index.to_key_string()).unwrap_or_default(),
        },
        _ => Value::Null,
    }
}

fn list_index(index: &Value) -> Option<usize> {
    match index {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()).or_else(|| {
            let f = n.as_f64();
            (f >= 0.0 && f.fract() == 0.0).then_some(f as usize)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Entries a for-expression iterates: index and element for lists, key and value for objects.
fn for_entries(collection: Value) -> Vec<(Value, Value)> {
    match collection {
        Value::Array(array) => array
            .into_iter()
            .enumerate()
            .map(|(index, value)| (Value::from(index), value))
            .collect(),
        Value::Object(object) => object
            .into_iter()
            .map(|(key, value)| (Value::String(key), value))
            .collect(),
        _ => Vec::new(),
    }
}

struct ForIntro<'a> {
    key_var: Option<&'a str>,
    value_var: &'a str,
    entries: Vec<(Value, Value)>,
}

impl<'a> ForIntro<'a> {
    fn bind<'c>(&self, ctx: &'c Context<'c>, key: Value, value: Value) -> Context<'c>
    where
        'a: 'c,
    {
        let mut ctx = ctx.child();
        if let Some(key_var) = self.key_var {
            ctx.define_var(key_var, key);
        }
        ctx.define_var(self.value_var, value);
        ctx
    }
}

impl<'a> ParseState<'a> {
    /// Parses and evaluates an expression, consuming operators with a precedence of at least
    /// `min_precedence`.
    pub(super) fn parse_expression(
        &mut self,
        ctx: &Context<'_>,
        min_precedence: u8,
    ) -> Result<Value> {
        self.nested(|p| p.parse_binary(ctx, min_precedence))
    }

    fn parse_binary(&mut self, ctx: &Context<'_>, min_precedence: u8) -> Result<Value> {
        let mut lhs = self.parse_unary(ctx)?;

        loop {
            if self.in_brackets {
                let next = self.cursor.peek_past_newlines().kind;
                if next == TokenKind::Question || BinaryOperator::from_token(next).is_some() {
                    self.cursor.skip_newlines();
                }
            }

            let token = self.cursor.peek();

            if token.kind == TokenKind::Question {
                if min_precedence > TERNARY_PRECEDENCE {
                    break;
                }

                self.cursor.advance();
                self.cursor.skip_newlines();
                let true_value = self.parse_expression(ctx, 0)?;
                self.cursor.skip_newlines();
                self.expect(TokenKind::Colon, "`:`")?;
                self.cursor.skip_newlines();
                let false_value = self.parse_expression(ctx, TERNARY_PRECEDENCE)?;

                lhs = if lhs.is_truthy() {
                    true_value
                } else {
                    false_value
                };
                continue;
            }

            let Some(op) = BinaryOperator::from_token(token.kind) else {
                break;
            };

            if op.precedence() < min_precedence {
                break;
            }

            self.cursor.advance();
            self.cursor.skip_newlines();
            let rhs = self.parse_expression(ctx, op.precedence() + 1)?;
            lhs = op.apply(lhs, rhs, token.location())?;
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self, ctx: &Context<'_>) -> Result<Value> {
        match self.cursor.peek_kind() {
            TokenKind::Not => {
                self.cursor.advance();
                let value = self.nested(|p| p.parse_unary(ctx))?;
                Ok(Value::Bool(!value.is_truthy()))
            }
            TokenKind::Minus => {
                self.cursor.advance();
                let value = self.nested(|p| p.parse_unary(ctx))?;
                Ok(float(-value.to_float()))
            }
            _ => self.parse_postfix(ctx),
        }
    }

    fn parse_postfix(&mut self, ctx: &Context<'_>) -> Result<Value> {
        let mut value = self.parse_primary(ctx)?;

        loop {
            match self.cursor.peek_kind() {
                TokenKind::Dot => {
                    let next = self.cursor.peek_nth(1);

                    match next.kind {
                        TokenKind::Star => {
                            self.cursor.advance();
                            self.cursor.advance();
                            value = self.splat(value, ".*");
                        }
                        kind if kind.is_identifier_like() => {
                            self.cursor.advance();
                            self.cursor.advance();
                            value = get_attr(value, &next.value);
                        }
                        // Legacy index syntax: `list.0`.
                        TokenKind::Number => {
                            self.cursor.advance();
                            self.cursor.advance();
                            let index = Value::Number(Number::from_literal(&next.value));
                            value = get_index(value, &index);
                        }
                        _ => {
                            self.cursor.advance();
                            return Err(self.unexpected("attribute name or `*`"));
                        }
                    }
                }
                TokenKind::LeftBracket => {
                    if self.cursor.peek_nth(1).kind == TokenKind::Star
                        && self.cursor.peek_nth(2).kind == TokenKind::RightBracket
                    {
                        for _ in 0..3 {
                            self.cursor.advance();
                        }
                        value = self.splat(value, "[*]");
                        continue;
                    }

                    self.cursor.advance();
                    self.cursor.skip_newlines();
                    let index = self.with_brackets(true, |p| p.parse_expression(ctx, 0))?;
                    self.cursor.skip_newlines();
                    self.expect(TokenKind::RightBracket, "`]`")?;
                    value = get_index(value, &index);
                }
                _ => break,
            }
        }

        Ok(value)
    }

    // Applies a splat operator and an optional single attribute projection following it.
    fn splat(&mut self, value: Value, operator: &str) -> Value {
        let attr = if self.cursor.peek_kind() == TokenKind::Dot
            && self.cursor.peek_nth(1).kind.is_identifier_like()
        {
            self.cursor.advance();
            Some(self.cursor.advance().value.as_str())
        } else {
            None
        };

        let project = |item: Value| match attr {
            Some(name) => get_attr(item, name),
            None => item,
        };

        match value {
            Value::Reference(mut path) => {
                path.push_str(operator);
                if let Some(name) = attr {
                    path.push('.');
                    path.push_str(name);
                }
                Value::Array(vec![Value::Reference(path)])
            }
            Value::Array(array) => Value::Array(array.into_iter().map(project).collect()),
            Value::Null => Value::Array(Vec::new()),
            other => Value::Array(vec![project(other)]),
        }
    }

    fn parse_primary(&mut self, ctx: &Context<'_>) -> Result<Value> {
        let token = self.cursor.peek();

        match token.kind {
            TokenKind::Number => {
                self.cursor.advance();
                Ok(Value::Number(Number::from_literal(&token.value)))
            }
            TokenKind::String | TokenKind::Interpolation | TokenKind::Heredoc => {
                self.cursor.advance();
                Ok(Value::String(token.value.clone()))
            }
            TokenKind::Bool => {
                self.cursor.advance();
                Ok(Value::Bool(token.value == "true"))
            }
            TokenKind::Null => {
                self.cursor.advance();
                Ok(Value::Null)
            }
            TokenKind::LeftBracket => {
                self.nested(|p| p.with_brackets(true, |p| p.parse_array(ctx)))
            }
            TokenKind::LeftBrace => {
                self.nested(|p| p.with_brackets(false, |p| p.parse_object(ctx)))
            }
            TokenKind::LeftParen => {
                self.cursor.advance();
                self.cursor.skip_newlines();
                let value = self.with_brackets(true, |p| p.parse_expression(ctx, 0))?;
                self.cursor.skip_newlines();
                self.expect(TokenKind::RightParen, "`)`")?;
                Ok(value)
            }
            TokenKind::Identifier => {
                self.cursor.advance();

                if self.cursor.peek_kind() == TokenKind::LeftParen {
                    return self
                        .nested(|p| p.with_brackets(true, |p| p.parse_func_call(token, ctx)));
                }

                match ctx.lookup_var(&token.value) {
                    Some(value) => Ok(value.clone()),
                    None => Ok(Value::Reference(token.value.clone())),
                }
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_func_call(&mut self, name: &Token, ctx: &Context<'_>) -> Result<Value> {
        self.expect(TokenKind::LeftParen, "`(`")?;
        let mut args = Vec::new();

        loop {
            self.cursor.skip_newlines();

            if self.cursor.eat(TokenKind::RightParen).is_some() {
                break;
            }

            args.push(self.parse_expression(ctx, 0)?);
            self.cursor.skip_newlines();

            // Argument expansion (`f(list...)`) is accepted; the expanded argument is kept as is.
            if self.cursor.eat(TokenKind::Ellipsis).is_some() {
                self.cursor.skip_newlines();
            }

            if self.cursor.eat(TokenKind::Comma).is_none() {
                self.expect(TokenKind::RightParen, "`,` or `)`")?;
                break;
            }
        }

        Ok(Value::func_call(name.value.clone(), args))
    }

    fn parse_array(&mut self, ctx: &Context<'_>) -> Result<Value> {
        let open = self.cursor.mark();
        self.expect(TokenKind::LeftBracket, "`[`")?;
        self.cursor.skip_newlines();

        if self.cursor.peek_kind() == TokenKind::For {
            return self.parse_for_list(open, ctx);
        }

        let mut array = Vec::new();

        loop {
            self.cursor.skip_newlines();

            if self.cursor.eat(TokenKind::RightBracket).is_some() {
                break;
            }

            array.push(self.parse_expression(ctx, 0)?);
            self.cursor.skip_newlines();

            if self.cursor.eat(TokenKind::Comma).is_none() {
                self.expect(TokenKind::RightBracket, "`,` or `]`")?;
                break;
            }
        }

        Ok(Value::Array(array))
    }

    fn parse_object(&mut self, ctx: &Context<'_>) -> Result<Value> {
        let open = self.cursor.mark();
        self.expect(TokenKind::LeftBrace, "`{`")?;
        self.cursor.skip_newlines();

        if self.cursor.peek_kind() == TokenKind::For
            && self.cursor.peek_nth(1).kind == TokenKind::Identifier
        {
            return self.parse_for_object(open, ctx);
        }

        let mut object = Map::new();

        loop {
            self.cursor.skip_newlines();

            if self.cursor.eat(TokenKind::RightBrace).is_some() {
                break;
            }

            let key = self.parse_object_key(ctx)?;

            match self.cursor.peek_kind() {
                TokenKind::Equals | TokenKind::Colon => {
                    self.cursor.advance();
                }
                _ => return Err(self.unexpected("`=` or `:`")),
            }

            self.cursor.skip_newlines();
            let value = self.parse_expression(ctx, 0)?;
            object.insert(key, value);

            match self.cursor.peek_kind() {
                TokenKind::Comma => {
                    self.cursor.advance();
                }
                TokenKind::Newline | TokenKind::RightBrace => {}
                _ => return Err(self.unexpected("`,`, newline or `}`")),
            }
        }

        Ok(Value::Object(object))
    }

    fn parse_object_key(&mut self, ctx: &Context<'_>) -> Result<String> {
        let token = self.cursor.peek();

        match token.kind {
            TokenKind::String | TokenKind::Interpolation | TokenKind::Number => {
                self.cursor.advance();
                Ok(token.value.clone())
            }
            kind if kind.is_identifier_like() => {
                self.cursor.advance();
                Ok(token.value.clone())
            }
            TokenKind::LeftParen => {
                self.cursor.advance();
                let key = self.parse_expression(ctx, 0)?;
                self.expect(TokenKind::RightParen, "`)`")?;
                Ok(key.to_key_string())
            }
            _ => Err(self.unexpected("object key")),
        }
    }

    // Parses `for [key_var,] value_var in collection :` and evaluates the collection.
    fn parse_for_intro(&mut self, ctx: &Context<'_>) -> Result<ForIntro<'a>> {
        let for_token = self.expect(TokenKind::For, "`for`")?;
        let first = self.expect(TokenKind::Identifier, "identifier")?;

        let (key_var, value_var) = if self.cursor.eat(TokenKind::Comma).is_some() {
            let second = self.expect(TokenKind::Identifier, "identifier")?;
            (Some(first.value.as_str()), second.value.as_str())
        } else {
            (None, first.value.as_str())
        };

        self.expect(TokenKind::In, "`in`")?;
        let collection = self.parse_expression(ctx, 0)?;
        self.expect(TokenKind::Colon, "`:`")?;
        self.cursor.skip_newlines();

        let entries = for_entries(collection);
        let max = self.options.max_for_iterations;

        if entries.len() > max {
            return Err(Error::LimitExceeded {
                limit: Limit::ForIterations,
                max,
                location: for_token.location(),
            });
        }

        Ok(ForIntro {
            key_var,
            value_var,
            entries,
        })
    }

    // Moves the cursor onto the bracket closing the one opened at `open`.
    fn skip_to_closing(&mut self, open: usize) {
        match self.cursor.closing(open) {
            Some(close) => self.cursor.reset(close),
            None => self.cursor.skip_until(&[]),
        }
    }

    // Evaluates one part of a for-expression body. A division by zero is held back until the
    // condition is known, the cursor is moved behind the part instead.
    fn parse_for_part(&mut self, ctx: &Context<'_>, stops: &[TokenKind]) -> Result<Result<Value>> {
        let start = self.cursor.mark();

        match self.parse_expression(ctx, 0) {
            Err(err @ Error::DivisionByZero { .. }) => {
                self.cursor.reset(start);
                self.cursor.skip_until(stops);
                Ok(Err(err))
            }
            Err(err) => Err(err),
            Ok(value) => Ok(Ok(value)),
        }
    }

    fn parse_for_cond(&mut self, ctx: &Context<'_>) -> Result<bool> {
        self.cursor.skip_newlines();

        if self.cursor.eat(TokenKind::If).is_none() {
            return Ok(true);
        }

        let cond = self.parse_expression(ctx, 0)?;
        self.cursor.skip_newlines();
        Ok(cond.is_truthy())
    }

    fn parse_for_list(&mut self, open: usize, ctx: &Context<'_>) -> Result<Value> {
        let intro = self.parse_for_intro(ctx)?;
        let body = self.cursor.mark();
        let mut array = Vec::new();

        if intro.entries.is_empty() {
            self.skip_to_closing(open);
        }

        for (key, value) in intro.entries.iter().cloned() {
            self.cursor.reset(body);
            let ctx = intro.bind(ctx, key, value);
            let value = self.parse_for_part(&ctx, &[TokenKind::If])?;

            if self.parse_for_cond(&ctx)? {
                array.push(value?);
            }
        }

        self.cursor.skip_newlines();
        self.expect(TokenKind::RightBracket, "`]`")?;
        Ok(Value::Array(array))
    }

    fn parse_for_object(&mut self, open: usize, ctx: &Context<'_>) -> Result<Value> {
        let intro = self.parse_for_intro(ctx)?;
        let body = self.cursor.mark();
        let mut object = Map::new();

        if intro.entries.is_empty() {
            self.skip_to_closing(open);
        }

        for (key, value) in intro.entries.iter().cloned() {
            self.cursor.reset(body);
            let ctx = intro.bind(ctx, key, value);

            let key = self.parse_for_part(&ctx, &[TokenKind::Arrow])?;
            self.cursor.skip_newlines();
            self.expect(TokenKind::Arrow, "`=>`")?;
            self.cursor.skip_newlines();
            let value = self.parse_for_part(&ctx, &[TokenKind::If, TokenKind::Ellipsis])?;
            self.cursor.skip_newlines();

            if self.cursor.peek_kind() == TokenKind::Ellipsis {
                return Err(self.unexpected("`if` or `}`"));
            }

            if self.parse_for_cond(&ctx)? {
                object.insert(key?.to_key_string(), value?);
            }
        }

        self.cursor.skip_newlines();
        self.expect(TokenKind::RightBrace, "`}`")?;
        Ok(Value::Object(object))
    }
}
