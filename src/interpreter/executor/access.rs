//! Attribute access, index access, and assignment targets.

use crate::ast::Expr;
use crate::interpreter::executor::{raise, value_of, ControlFlow, Env, Interpreter};
use crate::interpreter::hashing::Key;
use crate::interpreter::value::Value;

impl Interpreter {
    pub(crate) fn eval_attr(&mut self, object: &Expr, name: &str, env: &Env) -> ControlFlow {
        let object = value_of!(self.eval_expr(object, env));
        match self.classes.lookup(&object, name) {
            Some(found) => ControlFlow::Normal(found),
            None => raise(format!(
                "no such attribute: {} on {}",
                name,
                object.kind_name()
            )),
        }
    }

    pub(crate) fn eval_index(&mut self, object: &Expr, index: &Expr, env: &Env) -> ControlFlow {
        let object = value_of!(self.eval_expr(object, env));
        let index = value_of!(self.eval_expr(index, env));
        index_value(&object, index)
    }

    /// Assignment is an expression whose value is the assigned value. An
    /// identifier target is resolved *before* the right-hand side runs, so
    /// `x = boom()` on an undeclared `x` never calls `boom`.
    pub(crate) fn eval_assign(&mut self, target: &Expr, value: &Expr, env: &Env) -> ControlFlow {
        match target {
            Expr::Identifier(name) => {
                if !env.borrow().has(name) {
                    return raise(format!("undefined name: {}", name));
                }
                let value = value_of!(self.eval_expr(value, env));
                env.borrow_mut().assign(name, value.clone());
                ControlFlow::Normal(value)
            }
            Expr::Attr { object, name } => {
                let object = value_of!(self.eval_expr(object, env));
                let value = value_of!(self.eval_expr(value, env));
                self.set_attr(&object, name, value)
            }
            Expr::Index { object, index } => {
                let object = value_of!(self.eval_expr(object, env));
                let index = value_of!(self.eval_expr(index, env));
                let value = value_of!(self.eval_expr(value, env));
                set_index(&object, index, value)
            }
            other => raise(format!("cannot assign to {}", other.kind_name())),
        }
    }

    fn set_attr(&mut self, object: &Value, name: &str, value: Value) -> ControlFlow {
        match object {
            Value::Instance(instance) => {
                instance
                    .borrow_mut()
                    .attrs
                    .insert(name.to_string(), value.clone());
                ControlFlow::Normal(value)
            }
            Value::Class(class) => {
                self.classes.set_attr(class.id, name, value.clone());
                ControlFlow::Normal(value)
            }
            other => raise(format!(
                "cannot set attribute {} on {}",
                name,
                other.kind_name()
            )),
        }
    }
}

/// Read `object[index]`. Missing keys and out-of-range reads are Nil, not
/// errors; only an unindexable receiver or an unusable key raises.
fn index_value(object: &Value, index: Value) -> ControlFlow {
    match (object, index) {
        (Value::Array(elements), Value::Number(n)) => {
            let elements = elements.borrow();
            let value = usize_index(n, elements.len())
                .map(|i| elements[i].clone())
                .unwrap_or(Value::Nil);
            ControlFlow::Normal(value)
        }
        (Value::String(s), Value::Number(n)) => {
            let value = usize_index(n, s.chars().count())
                .and_then(|i| s.chars().nth(i))
                .map(|c| Value::string(c.to_string()))
                .unwrap_or(Value::Nil);
            ControlFlow::Normal(value)
        }
        (Value::Dict(table), index) => {
            let kind = index.kind_name();
            match Key::new(index) {
                Some(key) => {
                    ControlFlow::Normal(table.borrow().get(&key).cloned().unwrap_or(Value::Nil))
                }
                None => raise(format!("unusable as dictionary key: {}", kind)),
            }
        }
        (_, index) => raise(format!(
            "operator not supported: {}[{}]",
            object.kind_name(),
            index.kind_name()
        )),
    }
}

/// Write `object[index] = value`. Unlike reads, a write outside an array's
/// bounds is an error: it would otherwise vanish silently.
fn set_index(object: &Value, index: Value, value: Value) -> ControlFlow {
    match (object, index) {
        (Value::Array(elements), Value::Number(n)) => {
            let mut elements = elements.borrow_mut();
            let len = elements.len();
            match usize_index(n, len) {
                Some(i) => {
                    elements[i] = value.clone();
                    ControlFlow::Normal(value)
                }
                None => raise(format!("index out of bounds: {} (len {})", n, len)),
            }
        }
        (Value::Dict(table), index) => {
            let kind = index.kind_name();
            match Key::new(index) {
                Some(key) => {
                    table.borrow_mut().set(key, value.clone());
                    ControlFlow::Normal(value)
                }
                None => raise(format!("unusable as dictionary key: {}", kind)),
            }
        }
        (_, index) => raise(format!(
            "operator not supported: {}[{}] = ...",
            object.kind_name(),
            index.kind_name()
        )),
    }
}

/// A number is a valid index when it is a non-negative integer below `len`.
fn usize_index(n: f64, len: usize) -> Option<usize> {
    if n.fract() != 0.0 || n < 0.0 {
        return None;
    }
    let i = n as usize;
    (i < len).then_some(i)
}
