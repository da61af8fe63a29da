use serde::Serialize;
use std::fmt;

/// A parsed s‑expression, as handed to the evaluator.
///
/// Expressions are immutable once constructed: the reader builds the tree and
/// the evaluator only ever borrows or clones sub‑trees (a closure body, a
/// quoted form).  There is deliberately no "syntax node" for special forms —
/// `(lambda …)` is an ordinary [`Expression::List`] until the classifier in
/// the interpreter says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    /// A numeric literal.  Self‑evaluating.
    Number(f64),

    /// A symbol: variable reference or special‑form keyword.
    Symbol(String),

    /// An ordered sequence of sub‑expressions, `(a b c)`.
    List(Vec<Expression>),
}

impl Expression {
    /// Convenience constructor for a symbol expression.
    pub fn symbol<S: Into<String>>(name: S) -> Self {
        Expression::Symbol(name.into())
    }

    /// The symbol name, if this expression is one.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expression::Symbol(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }

            Expression::Symbol(s) => write!(f, "{}", s),

            Expression::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}
