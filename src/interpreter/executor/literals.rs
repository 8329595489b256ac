//! Composite literals: arrays, dictionaries, and function expressions.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Block, Expr};
use crate::interpreter::executor::{raise, value_of, ControlFlow, Env, Interpreter};
use crate::interpreter::hashing::Key;
use crate::interpreter::hashtable::HashTable;
use crate::interpreter::value::{Function, Value};

impl Interpreter {
    pub(crate) fn eval_array_literal(&mut self, elements: &[Expr], env: &Env) -> ControlFlow {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            values.push(value_of!(self.eval_expr(element, env)));
        }
        ControlFlow::Normal(Value::Array(Rc::new(RefCell::new(values))))
    }

    /// Entries evaluate in source order, key before value; an unhashable key
    /// stops the literal before its value expression runs.
    pub(crate) fn eval_dict_literal(
        &mut self,
        pairs: &[(Expr, Expr)],
        env: &Env,
    ) -> ControlFlow {
        let mut table = HashTable::new();
        for (key_expr, value_expr) in pairs {
            let key = value_of!(self.eval_expr(key_expr, env));
            let kind = key.kind_name();
            let Some(key) = Key::new(key) else {
                return raise(format!("unusable as dictionary key: {}", kind));
            };
            let value = value_of!(self.eval_expr(value_expr, env));
            table.set(key, value);
        }
        ControlFlow::Normal(Value::Dict(Rc::new(RefCell::new(table))))
    }

    pub(crate) fn eval_function_literal(
        &mut self,
        params: &[String],
        body: &Block,
        env: &Env,
    ) -> ControlFlow {
        ControlFlow::Normal(Value::Function(Rc::new(Function {
            name: String::new(),
            params: params.to_vec(),
            body: body.clone(),
            closure: Rc::clone(env),
        })))
    }
}
