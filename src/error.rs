//! Centralised error hierarchy for the **µScheme evaluator**.
//!
//! All subsystems (scanner, reader, evaluator, primitives, CLI) must convert
//! their internal failure modes into one of the variants defined here.  This
//! enables a uniform `Result<T>` alias throughout the crate and ergonomic
//! inter‑operation with `anyhow`, while still preserving rich diagnostic
//! detail.
//!
//! The module **does not** print diagnostics itself.  Every error is fatal to
//! the `evaluate` call that raised it; an outer REPL may report it and carry
//! on with fresh input, but the core never recovers mid‑evaluation.

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the evaluator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemeError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (reader) error.
    #[error("[line {line}] Error: {message}")]
    Parse { message: String, line: usize },

    /// A variable was not found in any frame of the environment chain.
    #[error("Unbound variable '{name}'")]
    UnboundVariable { name: String },

    /// A `letrec` binding was read as a value while it still held the
    /// placeholder sentinel, i.e. before its initializer completed.
    #[error("Variable '{name}' read before its letrec initializer completed")]
    UninitializedBinding { name: String },

    /// Argument count does not match a closure's parameter count or a
    /// primitive's fixed arity.  Raised before any parameter is bound and
    /// before any foreign code runs.
    #[error("'{callee}' expected {expected} arguments but got {got}")]
    Arity {
        callee: String,
        expected: usize,
        got: usize,
    },

    /// A special form's shape does not match its grammar.
    #[error("Malformed {form}: {message}")]
    MalformedSpecialForm {
        form: &'static str,
        message: String,
    },

    /// A `cond` ran out of clauses with no `else` present.
    #[error("cond: no matching clause")]
    NoMatchingClause,

    /// The function position of an application evaluated to a non‑callable.
    #[error("'{0}' is not a function")]
    NotAFunction(String),

    /// Failure reported by a primitive after its arity check passed.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl SchemeError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        SchemeError::Lex { message, line }
    }

    /// Helper constructor for the **reader**.
    pub fn parse<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", line, message);

        SchemeError::Parse { message, line }
    }

    /// Helper constructor for malformed special forms.
    pub fn malformed<S: Into<String>>(form: &'static str, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating MalformedSpecialForm error: form={}, msg={}",
            form, message
        );

        SchemeError::MalformedSpecialForm { form, message }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, SchemeError>;
