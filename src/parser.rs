//! Module `parser` implements the µScheme reader: a recursive‑descent parser
//! over the token stream that produces the [`Expression`] tree directly.
//!
//! One token of lookahead is enough for s‑expressions.  The parser can be
//! driven two ways:
//!
//! - `parse()` reads a single expression (the `parse`/`evaluate` CLI modes);
//! - `impl Iterator` yields every top‑level expression in the source in
//!   order, as `Result<Expression>` (the `run` mode and the REPL).

use log::debug;

use crate::error::{Result, SchemeError};
use crate::expr::Expression;
use crate::scanner::Scanner;
use crate::token::{Token, TokenType};

/// Recursive‑descent reader over a [`Scanner`].
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    lookahead: Option<Token<'a>>,
    line: usize, // line of the most recent token, for end-of-input errors
}

impl<'a> Parser<'a> {
    pub fn new(scanner: Scanner<'a>) -> Self {
        Self {
            scanner,
            lookahead: None,
            line: 1,
        }
    }

    /// Ensure `lookahead` holds the next token, pulling from the scanner.
    fn fill(&mut self) -> Result<()> {
        if self.lookahead.is_none() {
            if let Some(result) = self.scanner.next() {
                let token = result?;
                self.line = token.line;
                self.lookahead = Some(token);
            }
        }

        Ok(())
    }

    /// Consume and return the next token.
    fn advance(&mut self) -> Result<Token<'a>> {
        self.fill()?;

        self.lookahead
            .take()
            .ok_or_else(|| SchemeError::parse(self.line, "Unexpected end of input"))
    }

    /// Does the next token have this type?  Does not consume.
    fn check(&mut self, token_type: &TokenType) -> Result<bool> {
        self.fill()?;

        Ok(self
            .lookahead
            .as_ref()
            .is_some_and(|token| token.token_type == *token_type))
    }

    /// Read a single expression from the front of the stream.
    pub fn parse(&mut self) -> Result<Expression> {
        let exp = self.expression()?;
        debug!("Parsed expression: {}", exp);
        Ok(exp)
    }

    fn expression(&mut self) -> Result<Expression> {
        let token = self.advance()?;

        match token.token_type {
            TokenType::NUMBER(n) => Ok(Expression::Number(n)),

            TokenType::SYMBOL => Ok(Expression::Symbol(token.lexeme.to_string())),

            TokenType::LEFT_PAREN => self.list(token.line),

            TokenType::RIGHT_PAREN => Err(SchemeError::parse(token.line, "Unexpected ')'")),

            TokenType::EOF => Err(SchemeError::parse(token.line, "Unexpected end of input")),
        }
    }

    /// Read the elements of a list whose `(` has been consumed.
    fn list(&mut self, open_line: usize) -> Result<Expression> {
        let mut items = Vec::new();

        loop {
            if self.check(&TokenType::RIGHT_PAREN)? {
                self.advance()?;
                return Ok(Expression::List(items));
            }

            if self.check(&TokenType::EOF)? {
                return Err(SchemeError::parse(
                    open_line,
                    "Unterminated list: expected ')'",
                ));
            }

            items.push(self.expression()?);
        }
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<Expression>;

    /// Yield top‑level expressions until EOF.
    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.fill() {
            return Some(Err(e));
        }

        match &self.lookahead {
            None => None,
            Some(token) if token.token_type == TokenType::EOF => None,
            Some(_) => Some(self.expression()),
        }
    }
}
