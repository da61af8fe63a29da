//! Lexical environments: an ordered chain of mutable frames, innermost first.
//!
//! Frames are shared **by reference**: a frame may be held simultaneously by
//! the active call chain and by any number of closures that captured it.
//! `Rc` reachability determines a frame's lifetime; nothing destroys one
//! explicitly.  Only [`Environment::define`] / [`Environment::set`] (and the
//! letrec fix‑up built on them) mutate a frame in place — every holder of the
//! chain observes such a mutation, which is what makes `define`‑based and
//! `letrec`‑based recursion work.

use crate::error::{Result, SchemeError};
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to one level of the environment chain.
pub type Env = Rc<RefCell<Environment>>;

/// One frame plus a non‑owning link to the rest of the chain.
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Env>,
}

impl Environment {
    /// An empty frame with no enclosing chain (an outermost frame).
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    /// An empty frame prepended to `enclosing`.  The prior chain is shared,
    /// never copied or mutated.
    pub fn with_enclosing(enclosing: Env) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind `name` in **this** frame, inserting or overwriting.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up, scanning frames innermost‑first.  The first frame
    /// containing the name wins (shadowing).
    pub fn get(&self, name: &str) -> Result<Value> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(SchemeError::UnboundVariable {
                name: name.to_string(),
            })
        }
    }

    /// Overwrite the existing binding of `name` in whichever frame holds it,
    /// scanning innermost‑first.  Returns `false` if no frame binds `name`;
    /// the caller decides where the fresh binding goes.  An overwrite is
    /// visible to every holder of the affected frame, including closures
    /// that captured it before the write.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), value);
            true
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().set(name, value)
        } else {
            false
        }
    }

    /// Build one new frame binding `params[i] → args[i]` pairwise and prepend
    /// it to `env`.  Prior frames are untouched.  Callers verify the lengths
    /// match (an `Arity` error at the apply site) before extending.
    pub fn extend(params: &[String], args: Vec<Value>, env: &Env) -> Env {
        debug_assert_eq!(params.len(), args.len());

        let mut frame = Environment::with_enclosing(Rc::clone(env));

        for (param, arg) in params.iter().zip(args) {
            debug!("Binding parameter '{}' to {}", param, arg);
            frame.define(param, arg);
        }

        Rc::new(RefCell::new(frame))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
