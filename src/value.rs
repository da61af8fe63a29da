use crate::environment::Env;
use crate::expr::Expression;
use std::fmt;
use std::rc::Rc;

/// A runtime value produced by the evaluator.
///
/// `Nil` is the empty list.  `Unit` is the result of a binding‑only operation
/// (`define`), deliberately distinct from `Nil` so a REPL can suppress it.
/// `Placeholder` is the sentinel bound during `letrec` setup before the real
/// value is computed; reading it as a value is a hard error.
#[derive(Clone)]
pub enum Value {
    Number(f64),

    /// An unevaluated symbol, produced by `quote`.
    Symbol(String),

    Bool(bool),

    /// The empty list.
    Nil,

    /// The result of a binding‑only operation.  Not `Nil`.
    Unit,

    /// Letrec sentinel.  Never a legitimate value.
    Placeholder,

    /// A proper list of values.  Always non‑empty; the empty list is `Nil`.
    List(Vec<Value>),

    /// A user function: parameters and body paired with the environment that
    /// was current at `lambda` evaluation, captured **by reference**.
    Closure {
        params: Vec<String>,
        body: Expression,
        env: Env,
    },

    /// An opaque foreign procedure supplied by the hosting embedding.
    /// `arity: None` means variadic (`list`); otherwise the argument count is
    /// checked before `func` runs.
    Primitive {
        name: &'static str,
        arity: Option<usize>,
        func: fn(&[Value]) -> Result<Value, String>,
    },
}

impl PartialEq for Value {
    /// Structural equality for data; callables compare by identity
    /// (same captured environment / same function pointer).
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Unit, Value::Unit) => true,
            (Value::List(a), Value::List(b)) => a == b,
            (
                Value::Closure {
                    params: pa,
                    body: ba,
                    env: ea,
                },
                Value::Closure {
                    params: pb,
                    body: bb,
                    env: eb,
                },
            ) => Rc::ptr_eq(ea, eb) && pa == pb && ba == bb,
            (
                Value::Primitive {
                    name: na, func: fa, ..
                },
                Value::Primitive {
                    name: nb, func: fb, ..
                },
            ) => na == nb && *fa as usize == *fb as usize,
            _ => false,
        }
    }
}

// A closure's environment can contain the closure itself (letrec), so the
// derived Debug would recurse forever.  Render callables shallowly instead.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Symbol(s) => f.debug_tuple("Symbol").field(s).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Nil => write!(f, "Nil"),
            Value::Unit => write!(f, "Unit"),
            Value::Placeholder => write!(f, "Placeholder"),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Closure { params, body, .. } => f
                .debug_struct("Closure")
                .field("params", params)
                .field("body", body)
                .finish_non_exhaustive(),
            Value::Primitive { name, arity, .. } => f
                .debug_struct("Primitive")
                .field("name", name)
                .field("arity", arity)
                .finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                // 6.0 → "6", 3.14 → "3.14"  (uses a tiny stack buffer)
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    let mut buf: itoa::Buffer = itoa::Buffer::new();
                    write!(f, "{}", buf.format(*n as i64))
                } else {
                    write!(f, "{}", n)
                }
            }

            Value::Symbol(s) => write!(f, "{}", s),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Nil => write!(f, "nil"),

            Value::Unit => write!(f, "#<unit>"),

            Value::Placeholder => write!(f, "#<uninitialized>"),

            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }

            Value::Closure { params, body, .. } => {
                write!(f, "(closure (")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ") {})", body)
            }

            Value::Primitive { name, .. } => write!(f, "<native fn {}>", name),
        }
    }
}
