//! The primitive bindings supplied by the hosting embedding, and the
//! construction of the initial global environment.
//!
//! The global chain mirrors the original layout of three frames, innermost
//! first: list operations, then arithmetic/comparison, then the boolean
//! literals.  [`global_env`] builds it once at startup; the result is passed
//! explicitly into [`crate::interpreter::evaluate`] — there is no ambient
//! interpreter state.
//!
//! Every primitive is a plain `fn(&[Value]) -> Result<Value, String>`
//! invoked positionally on already‑evaluated arguments.  Arity is checked by
//! the apply step before any of these functions run, so fixed‑arity bodies
//! may index their argument slice directly.

use log::info;
use std::cell::RefCell;
use std::rc::Rc;

use crate::environment::{Env, Environment};
use crate::value::Value;

/// Build the initial global environment: boolean literals outermost, the
/// arithmetic/comparison frame, then the list‑operation frame innermost.
pub fn global_env() -> Env {
    info!("Building global environment");

    let booleans: Env = Rc::new(RefCell::new(Environment::new()));
    booleans.borrow_mut().define("true", Value::Bool(true));
    booleans.borrow_mut().define("false", Value::Bool(false));

    let arithmetic: Env = Rc::new(RefCell::new(Environment::with_enclosing(booleans)));
    define_primitive(&arithmetic, "+", Some(2), prim_add);
    define_primitive(&arithmetic, "-", Some(2), prim_sub);
    define_primitive(&arithmetic, "*", Some(2), prim_mul);
    define_primitive(&arithmetic, ">", Some(2), prim_gt);
    define_primitive(&arithmetic, ">=", Some(2), prim_ge);
    define_primitive(&arithmetic, "<", Some(2), prim_lt);
    define_primitive(&arithmetic, "<=", Some(2), prim_le);
    define_primitive(&arithmetic, "==", Some(2), prim_eq);

    let lists: Env = Rc::new(RefCell::new(Environment::with_enclosing(arithmetic)));
    lists.borrow_mut().define("nil", Value::Nil);
    define_primitive(&lists, "null?", Some(1), prim_null);
    define_primitive(&lists, "cons", Some(2), prim_cons);
    define_primitive(&lists, "car", Some(1), prim_car);
    define_primitive(&lists, "cdr", Some(1), prim_cdr);
    define_primitive(&lists, "list", None, prim_list);

    lists
}

fn define_primitive(
    env: &Env,
    name: &'static str,
    arity: Option<usize>,
    func: fn(&[Value]) -> Result<Value, String>,
) {
    env.borrow_mut()
        .define(name, Value::Primitive { name, arity, func });
}

// ───────────────────────────── arithmetic ───────────────────────────────────

fn expect_number(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(format!("expected a number, got {}", other)),
    }
}

fn prim_add(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Number(
        expect_number(&args[0])? + expect_number(&args[1])?,
    ))
}

fn prim_sub(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Number(
        expect_number(&args[0])? - expect_number(&args[1])?,
    ))
}

fn prim_mul(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Number(
        expect_number(&args[0])? * expect_number(&args[1])?,
    ))
}

fn prim_gt(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Bool(
        expect_number(&args[0])? > expect_number(&args[1])?,
    ))
}

fn prim_ge(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Bool(
        expect_number(&args[0])? >= expect_number(&args[1])?,
    ))
}

fn prim_lt(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Bool(
        expect_number(&args[0])? < expect_number(&args[1])?,
    ))
}

fn prim_le(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Bool(
        expect_number(&args[0])? <= expect_number(&args[1])?,
    ))
}

/// Structural equality on data values; callables compare by identity.
fn prim_eq(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Bool(args[0] == args[1]))
}

// ───────────────────────────── list operations ──────────────────────────────

fn prim_null(args: &[Value]) -> Result<Value, String> {
    let empty = match &args[0] {
        Value::Nil => true,
        Value::List(items) => items.is_empty(),
        _ => false,
    };

    Ok(Value::Bool(empty))
}

fn prim_cons(args: &[Value]) -> Result<Value, String> {
    match &args[1] {
        Value::Nil => Ok(Value::List(vec![args[0].clone()])),

        Value::List(rest) => {
            let mut items = Vec::with_capacity(rest.len() + 1);
            items.push(args[0].clone());
            items.extend_from_slice(rest);
            Ok(Value::List(items))
        }

        other => Err(format!("second argument must be a list, got {}", other)),
    }
}

fn prim_car(args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::List(items) if !items.is_empty() => Ok(items[0].clone()),
        Value::Nil | Value::List(_) => Err("car of empty list".to_string()),
        other => Err(format!("expected a list, got {}", other)),
    }
}

fn prim_cdr(args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::List(items) if items.len() > 1 => Ok(Value::List(items[1..].to_vec())),
        Value::List(items) if items.len() == 1 => Ok(Value::Nil),
        Value::Nil | Value::List(_) => Err("cdr of empty list".to_string()),
        other => Err(format!("expected a list, got {}", other)),
    }
}

fn prim_list(args: &[Value]) -> Result<Value, String> {
    if args.is_empty() {
        Ok(Value::Nil)
    } else {
        Ok(Value::List(args.to_vec()))
    }
}
