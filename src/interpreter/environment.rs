//! Runtime environment for variable scopes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::interpreter::value::Value;

/// A runtime environment containing variable bindings, chained to an
/// optional enclosing scope. Environments are shared (`Rc<RefCell<_>>`):
/// a closure keeps its defining environment alive past the lexical exit.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Self {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Declare a variable in the current scope, shadowing any outer binding
    /// of the same name.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Get a variable's value, searching up the scope chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        if let Some(ref enclosing) = self.enclosing {
            return enclosing.borrow().get(name);
        }
        None
    }

    /// Whether any scope on the chain declares `name`.
    pub fn has(&self, name: &str) -> bool {
        if self.values.contains_key(name) {
            return true;
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().has(name),
            None => false,
        }
    }

    /// Assign to the nearest enclosing scope that already declares `name`.
    /// Returns false if no scope does; assignment never declares.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), value);
            return true;
        }
        if let Some(ref enclosing) = self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }
        false
    }
}
