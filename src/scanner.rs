//! Module `scanner` implements a one‑pass, streaming lexer for µScheme
//! s‑expression syntax.
//!
//! It transforms a byte slice (`&[u8]`) into a sequence of `Token<'a>`s,
//! skipping whitespace and `;` line comments, and emitting exactly one `EOF`
//! token at the end. Designed as a `FusedIterator`, it can be chained safely
//! with other iterator adapters.
//!
//! # Public API
//!
//! - `Scanner::new(src: &'a [u8]) -> Scanner<'a>`
//!   Create a new lexer over the input buffer.
//!
//! - `impl Iterator for Scanner<'a>`
//!   Yields `Result<Token<'a>, SchemeError>` on each `.next()`, where
//!   `Ok(token)` is a scanned token and `Err` reports a lexing error with
//!   line information.
//!
//! # Token recognition
//!
//! - `(` and `)` punctuators.
//! - Numeric literals: optional leading `-`, integer and optional fractional
//!   part.  A lone `-` is the subtraction symbol, not a number.
//! - Symbols: any run of symbol constituents (alphanumerics and
//!   `+ - * / < > = ! ? _`), covering identifiers and operator names alike —
//!   `lambda` and friends are ordinary symbols at this level, the evaluator
//!   gives them meaning.
//! - Comments: `;` to end of line, fast‑forwarded with `memchr`.
//! - Errors: any unexpected byte yields `SchemeError::lex(line, message)`.
//!
//! Lexemes are zero‑allocation slices into the original buffer.

use crate::error::{Result, SchemeError};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use std::iter::FusedIterator;

/// A single pass **scanner / lexer** that converts raw source bytes into a
/// sequence of [`Token`]s.  The lifetime `'a` ties every emitted token’s
/// `lexeme` slice back to the original source buffer.
pub struct Scanner<'a> {
    src: &'a [u8],              // entire source buffer
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
    eof_emitted: bool,          // EOF token already produced?
}

/// Is `b` a constituent byte of a symbol?
#[inline(always)]
fn is_symbol_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'+' | b'-' | b'*' | b'/' | b'<' | b'>' | b'=' | b'!' | b'?' | b'_'
        )
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a [u8]) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            pending: None,
            eof_emitted: false,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Return the length of the input slice.
    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  *Panics* if called at EOF – higher‑
    /// level code always guards with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` if past
    /// EOF to avoid branching at call‑site.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    /// Peek one byte beyond [`peek`].  Safe at EOF.
    #[inline(always)]
    fn peek_next(&self) -> u8 {
        if self.curr + 1 >= self.len() {
            0
        } else {
            self.src[self.curr + 1]
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces
    /// an actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),

            // ── whitespace ────────────────────────────────────────────────
            b' ' | b'\r' | b'\t' => {}
            b'\n' => self.line += 1,

            // ── comments: fast‑forward to next newline using `memchr` ─────
            b';' => {
                if let Some(pos) = memchr(b'\n', &self.src[self.curr..]) {
                    self.curr += pos; // stop *on* the newline, counted above
                } else {
                    self.curr = self.len();
                }
            }

            // ── numbers (a `-` only starts one when a digit follows) ──────
            b'0'..=b'9' => self.number()?,
            b'-' if self.peek().is_ascii_digit() => self.number()?,

            // ── symbols: identifiers and operator names ───────────────────
            _ if is_symbol_byte(b) => {
                while is_symbol_byte(self.peek()) {
                    self.advance();
                }
                self.pending = Some(TokenType::SYMBOL);
            }

            _ => {
                return Err(SchemeError::lex(
                    self.line,
                    format!("Unexpected character: {}", b as char),
                ));
            }
        }

        Ok(())
    }

    /// Scan the remainder of a numeric literal whose first byte has been
    /// consumed.  Accepts one optional fractional part.
    fn number(&mut self) -> Result<()> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance(); // consume '.'
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = std::str::from_utf8(&self.src[self.start..self.curr])
            .expect("numeric lexeme is ASCII");

        let value: f64 = text
            .parse()
            .map_err(|_| SchemeError::lex(self.line, format!("Invalid number: {}", text)))?;

        debug!("Scanned number literal {} => {}", text, value);

        self.pending = Some(TokenType::NUMBER(value));
        Ok(())
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.is_at_end() {
            self.start = self.curr;
            self.pending = None;

            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            if let Some(token_type) = self.pending.take() {
                let lexeme = std::str::from_utf8(&self.src[self.start..self.curr])
                    .unwrap_or_default();

                return Some(Ok(Token::new(token_type, lexeme, self.line)));
            }
        }

        if self.eof_emitted {
            None
        } else {
            self.eof_emitted = true;
            Some(Ok(Token::new(TokenType::EOF, "", self.line)))
        }
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
