//! The eval/apply core: expression classification, special‑form dispatch,
//! closure creation/application, and the letrec/define self‑reference
//! protocols.
//!
//! Evaluation is strictly single‑threaded, synchronous and recursive.  In an
//! application the function position is evaluated before any argument, and
//! arguments are evaluated left‑to‑right, each one fully completing
//! (including side effects from nested `define`s) before the next begins.
//! There is no tail‑call optimization: every nested call grows the host call
//! stack, and exhausting it aborts the process via Rust's stack guard rather
//! than corrupting memory.
//!
//! The global environment is built once (see [`crate::primitives`]) and
//! passed explicitly into [`evaluate`]; the interpreter keeps no ambient
//! state of its own.

use log::{debug, info};
use phf::phf_map;
use std::cell::RefCell;
use std::rc::Rc;

use crate::environment::{Env, Environment};
use crate::error::{Result, SchemeError};
use crate::expr::Expression;
use crate::value::Value;

/// The seven syntactic constructs evaluated by a bespoke rule rather than
/// generic function application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialForm {
    Lambda,
    Let,
    Letrec,
    If,
    Cond,
    Define,
    Quote,
}

/// Category assigned to an expression by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprKind {
    /// A number; evaluates to itself.
    SelfEvaluating,

    /// A symbol; evaluates by environment lookup.
    Variable,

    /// A list whose head is a special‑form keyword.
    Special(SpecialForm),

    /// Any other list: evaluate head and arguments, then apply.
    Application,
}

// Compile‑time perfect hash over the special‑form keywords.
static SPECIAL_FORMS: phf::Map<&'static str, SpecialForm> = phf_map! {
    "lambda" => SpecialForm::Lambda,
    "let"    => SpecialForm::Let,
    "letrec" => SpecialForm::Letrec,
    "if"     => SpecialForm::If,
    "cond"   => SpecialForm::Cond,
    "define" => SpecialForm::Define,
    "quote"  => SpecialForm::Quote,
};

/// Categorize `exp` without evaluating anything.
///
/// A list is special iff its head is one of the seven keywords; the keyword
/// loses its special meaning in any other position.
pub fn classify(exp: &Expression) -> ExprKind {
    match exp {
        Expression::Number(_) => ExprKind::SelfEvaluating,

        Expression::Symbol(_) => ExprKind::Variable,

        Expression::List(items) => match items.first().and_then(Expression::as_symbol) {
            Some(head) => match SPECIAL_FORMS.get(head) {
                Some(form) => ExprKind::Special(*form),
                None => ExprKind::Application,
            },
            None => ExprKind::Application,
        },
    }
}

/// Evaluate `exp` in `env`, the single entry point of the core.
pub fn evaluate(exp: &Expression, env: &Env) -> Result<Value> {
    debug!("Evaluating expression: {}", exp);

    match exp {
        Expression::Number(n) => Ok(Value::Number(*n)),

        Expression::Symbol(name) => {
            debug!("Looking up variable '{}'", name);

            let value = env.borrow().get(name)?;

            // A letrec frame may still hold the sentinel while its
            // initializers run; reading it as a value is a hard error.
            if let Value::Placeholder = value {
                return Err(SchemeError::UninitializedBinding {
                    name: name.clone(),
                });
            }

            debug!("Variable '{}' evaluated to: {}", name, value);
            Ok(value)
        }

        Expression::List(items) => match classify(exp) {
            ExprKind::Special(form) => eval_special_form(form, items, env),
            _ => eval_application(items, env),
        },
    }
}

/// Evaluate every expression in `exps` left‑to‑right, each one fully
/// completing before the next begins.
fn eval_list(exps: &[Expression], env: &Env) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(exps.len());

    for exp in exps {
        let value = evaluate(exp, env)?;
        debug!("Evaluated argument => {}", value);
        values.push(value);
    }

    Ok(values)
}

// ───────────────────────────── special forms ────────────────────────────────

fn eval_special_form(form: SpecialForm, items: &[Expression], env: &Env) -> Result<Value> {
    debug!("Dispatching special form: {:?}", form);

    match form {
        SpecialForm::Lambda => eval_lambda(items, env),
        SpecialForm::Let => eval_let(items, env),
        SpecialForm::Letrec => eval_letrec(items, env),
        SpecialForm::If => eval_if(items, env),
        SpecialForm::Cond => eval_cond(items, env),
        SpecialForm::Define => eval_define(items, env),
        SpecialForm::Quote => eval_quote(items),
    }
}

/// `(lambda (p…) body)` — capture parameters, body and the **current**
/// environment, by reference.
fn eval_lambda(items: &[Expression], env: &Env) -> Result<Value> {
    let [_, params_exp, body] = items else {
        return Err(SchemeError::malformed(
            "lambda",
            "expected (lambda (parameters) body)",
        ));
    };

    let params = parameter_names(params_exp, "lambda")?;

    debug!("Creating closure with parameters {:?}", params);

    Ok(Value::Closure {
        params,
        body: body.clone(),
        env: Rc::clone(env),
    })
}

/// `(let ((p a)…) body)` — all initializers are evaluated in the *outer*
/// environment before any binding exists, so they cannot see each other.
fn eval_let(items: &[Expression], env: &Env) -> Result<Value> {
    let (params, inits, body) = binding_form(items, "let")?;

    let args = eval_list(&inits, env)?;
    let new_env = Environment::extend(&params, args, env);

    evaluate(body, &new_env)
}

/// `(letrec ((p a)…) body)` — the self/mutual recursion protocol:
///
/// 1. one new frame binding every name to the placeholder sentinel;
/// 2. every initializer evaluated in that extended environment (a lambda
///    initializer just captures the still‑placeholder frame by reference);
/// 3. every placeholder overwritten **in that same frame** with its value;
/// 4. the body evaluated in the extended environment.
fn eval_letrec(items: &[Expression], env: &Env) -> Result<Value> {
    let (params, inits, body) = binding_form(items, "letrec")?;

    let ext_env: Env = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(env))));

    for param in &params {
        ext_env.borrow_mut().define(param, Value::Placeholder);
    }

    let values = eval_list(&inits, &ext_env)?;

    for (param, value) in params.iter().zip(values) {
        debug!("Fixing up letrec binding '{}' to {}", param, value);
        ext_env.borrow_mut().define(param, value);
    }

    evaluate(body, &ext_env)
}

/// `(if condition then else)` — the condition is evaluated once and exactly
/// one branch is evaluated; the untaken branch's side effects never occur.
fn eval_if(items: &[Expression], env: &Env) -> Result<Value> {
    let [_, condition, then_branch, else_branch] = items else {
        return Err(SchemeError::malformed(
            "if",
            "expected (if condition then else)",
        ));
    };

    let cond_value = evaluate(condition, env)?;

    if is_truthy(&cond_value) {
        debug!("Condition is truthy; evaluating then branch");
        evaluate(then_branch, env)
    } else {
        debug!("Condition is falsy; evaluating else branch");
        evaluate(else_branch, env)
    }
}

/// `(cond (predicate consequent)…)` — clauses are tried in order and only
/// the chosen consequent is evaluated.  `else` is an always‑true predicate.
/// Running out of clauses is an error, never a silent fallthrough.
fn eval_cond(items: &[Expression], env: &Env) -> Result<Value> {
    for clause in &items[1..] {
        let Expression::List(pair) = clause else {
            return Err(SchemeError::malformed(
                "cond",
                format!("expected (predicate consequent) clause, got {}", clause),
            ));
        };

        let [predicate, consequent] = pair.as_slice() else {
            return Err(SchemeError::malformed(
                "cond",
                format!("expected (predicate consequent) clause, got {}", clause),
            ));
        };

        if predicate.as_symbol() == Some("else") {
            return evaluate(consequent, env);
        }

        if is_truthy(&evaluate(predicate, env)?) {
            return evaluate(consequent, env);
        }
    }

    Err(SchemeError::NoMatchingClause)
}

/// `(define name value)` or the sugar `(define (name p…) body)`.
///
/// The value is evaluated first; an existing binding of `name` anywhere in
/// the chain is then overwritten in place — visible to every holder of that
/// environment, which is what makes top‑level recursion work — and only if
/// no frame binds the name is it added to the innermost frame.
fn eval_define(items: &[Expression], env: &Env) -> Result<Value> {
    let (name, value_exp) = match items {
        // (define (name p…) body)  ≡  (define name (lambda (p…) body))
        [_, Expression::List(header), body] => {
            let Some((name_exp, params)) = header.split_first() else {
                return Err(SchemeError::malformed(
                    "define",
                    "expected a name inside (define (name parameters…) body)",
                ));
            };

            let Some(name) = name_exp.as_symbol() else {
                return Err(SchemeError::malformed(
                    "define",
                    format!("function name must be a symbol, got {}", name_exp),
                ));
            };

            let lambda = Expression::List(vec![
                Expression::symbol("lambda"),
                Expression::List(params.to_vec()),
                body.clone(),
            ]);

            (name.to_string(), lambda)
        }

        [_, Expression::Symbol(name), value_exp] => (name.clone(), value_exp.clone()),

        _ => {
            return Err(SchemeError::malformed(
                "define",
                "expected (define name value) or (define (name parameters…) body)",
            ));
        }
    };

    let value = evaluate(&value_exp, env)?;

    let overwritten = env.borrow_mut().set(&name, value.clone());
    if overwritten {
        info!("Redefined '{}' in place", name);
    } else {
        env.borrow_mut().define(&name, value);
        info!("Defined '{}' in the innermost frame", name);
    }

    Ok(Value::Unit)
}

/// `(quote exp)` — returns the nested sub‑expression completely unevaluated:
/// symbols are not looked up, lists are not treated as applications.
fn eval_quote(items: &[Expression]) -> Result<Value> {
    let [_, quoted] = items else {
        return Err(SchemeError::malformed("quote", "expected (quote exp)"));
    };

    Ok(quote_value(quoted))
}

/// Structural conversion of an expression into data.  The empty list quotes
/// to `Nil`.
fn quote_value(exp: &Expression) -> Value {
    match exp {
        Expression::Number(n) => Value::Number(*n),
        Expression::Symbol(s) => Value::Symbol(s.clone()),
        Expression::List(items) if items.is_empty() => Value::Nil,
        Expression::List(items) => Value::List(items.iter().map(quote_value).collect()),
    }
}

// ───────────────────────────── shape helpers ────────────────────────────────

/// Parse a parameter list `(p1 p2 …)` into names.
fn parameter_names(exp: &Expression, form: &'static str) -> Result<Vec<String>> {
    let Expression::List(items) = exp else {
        return Err(SchemeError::malformed(
            form,
            format!("expected a parameter list, got {}", exp),
        ));
    };

    items
        .iter()
        .map(|item| match item.as_symbol() {
            Some(name) => Ok(name.to_string()),
            None => Err(SchemeError::malformed(
                form,
                format!("parameter must be a symbol, got {}", item),
            )),
        })
        .collect()
}

/// Parse `(form ((name init)…) body)` into names, initializer expressions
/// and body.  Shared by `let` and `letrec`.
fn binding_form<'a>(
    items: &'a [Expression],
    form: &'static str,
) -> Result<(Vec<String>, Vec<Expression>, &'a Expression)> {
    let [_, Expression::List(bindings), body] = items else {
        return Err(SchemeError::malformed(
            form,
            format!("expected ({} ((name init)…) body)", form),
        ));
    };

    let mut params = Vec::with_capacity(bindings.len());
    let mut inits = Vec::with_capacity(bindings.len());

    for binding in bindings {
        let Expression::List(pair) = binding else {
            return Err(SchemeError::malformed(
                form,
                format!("expected a (name init) binding, got {}", binding),
            ));
        };

        match pair.as_slice() {
            [Expression::Symbol(name), init] => {
                params.push(name.clone());
                inits.push(init.clone());
            }
            _ => {
                return Err(SchemeError::malformed(
                    form,
                    format!("expected a (name init) binding, got {}", binding),
                ));
            }
        }
    }

    Ok((params, inits, body))
}

// ───────────────────────────── application ──────────────────────────────────

fn eval_application(items: &[Expression], env: &Env) -> Result<Value> {
    let Some((head, arg_exps)) = items.split_first() else {
        return Err(SchemeError::malformed(
            "application",
            "cannot evaluate the empty list",
        ));
    };

    // Function position first, then arguments left‑to‑right.
    let fun = evaluate(head, env)?;
    let args = eval_list(arg_exps, env)?;

    apply(fun, args)
}

/// Dispatch a function value (closure or foreign primitive) over already
/// evaluated arguments.
pub fn apply(fun: Value, args: Vec<Value>) -> Result<Value> {
    match fun {
        Value::Closure { params, body, env } => {
            debug!("Applying closure with parameters {:?}", params);

            if args.len() != params.len() {
                return Err(SchemeError::Arity {
                    callee: format!("(closure ({}))", params.join(" ")),
                    expected: params.len(),
                    got: args.len(),
                });
            }

            // One fresh frame per call, prepended to the *captured*
            // environment, not the caller's.
            let call_env = Environment::extend(&params, args, &env);

            evaluate(&body, &call_env)
        }

        Value::Primitive { name, arity, func } => {
            debug!("Applying primitive '{}'", name);

            if let Some(expected) = arity {
                if args.len() != expected {
                    return Err(SchemeError::Arity {
                        callee: name.to_string(),
                        expected,
                        got: args.len(),
                    });
                }
            }

            let result =
                func(&args).map_err(|msg| SchemeError::Runtime(format!("{}: {}", name, msg)))?;

            info!("Primitive '{}' returned: {}", name, result);
            Ok(result)
        }

        other => Err(SchemeError::NotAFunction(other.to_string())),
    }
}

/// Truthiness: only the boolean `false` is false; every other value,
/// including `nil` and `0`, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Bool(false))
}
