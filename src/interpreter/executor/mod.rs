//! Tree-walking evaluator for chime.
//!
//! Evaluation is a pure function of (node, environment). Results are
//! threaded through [`ControlFlow`]: plain values, `return` unwinding to the
//! nearest call boundary, and raised Error values unwinding all the way to
//! the top. There is no catch construct; the first error in left-to-right,
//! depth-first order wins.

mod access;
mod calls;
mod literals;
mod operators;

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Block, ClassDecl, Expr, Program, Stmt};
use crate::error::RuntimeError;
use crate::interpreter::builtins::register_builtins;
use crate::interpreter::classes::{self, ClassRegistry};
use crate::interpreter::environment::Environment;
use crate::interpreter::value::{Function, Value};

pub(crate) type Env = Rc<RefCell<Environment>>;

/// Evaluation result of a single node.
pub(crate) enum ControlFlow {
    Normal(Value),
    Return(Value),
    Raised(Value),
}

/// Unwrap a normal value; Return and Raised propagate to the caller.
macro_rules! value_of {
    ($flow:expr) => {
        match $flow {
            $crate::interpreter::executor::ControlFlow::Normal(value) => value,
            other => return other,
        }
    };
}
pub(crate) use value_of;

pub(crate) fn raise(reason: String) -> ControlFlow {
    ControlFlow::Raised(Value::error(reason))
}

/// The chime interpreter: global scope plus the class registry.
pub struct Interpreter {
    globals: Env,
    pub(crate) classes: ClassRegistry,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut classes = ClassRegistry::new();
        let globals = Rc::new(RefCell::new(Environment::new()));
        register_builtins(&mut globals.borrow_mut(), &mut classes);
        Self { globals, classes }
    }

    /// The global environment, for hosts that want to pre-register values.
    pub fn globals(&self) -> &Env {
        &self.globals
    }

    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Mutable registry access: the host-function registration surface.
    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    /// Evaluate a program. An unhandled Error value is the result, returned
    /// like any other value.
    pub fn eval_program(&mut self, program: &Program) -> Value {
        let env = Rc::clone(&self.globals);
        let mut result = Value::Nil;
        for stmt in &program.statements {
            match self.eval_stmt(stmt, &env) {
                ControlFlow::Normal(value) => result = value,
                ControlFlow::Return(value) => return value,
                ControlFlow::Raised(error) => return error,
            }
        }
        result
    }

    /// Evaluate a program, converting an unhandled Error value into a host
    /// error that renders the wrapped reason.
    pub fn interpret(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        match self.eval_program(program) {
            Value::Error(reason) => Err(RuntimeError::raised(reason.to_string())),
            value => Ok(value),
        }
    }

    pub(crate) fn eval_stmt(&mut self, stmt: &Stmt, env: &Env) -> ControlFlow {
        match stmt {
            Stmt::Expression(expr) => self.eval_expr(expr, env),
            Stmt::Let { name, value } => {
                let value = value_of!(self.eval_expr(value, env));
                env.borrow_mut().define(name.clone(), value);
                ControlFlow::Normal(Value::Nil)
            }
            Stmt::Return(expr) => {
                let value = value_of!(self.eval_expr(expr, env));
                ControlFlow::Return(value)
            }
            Stmt::While { condition, body } => self.eval_while(condition, body, env),
            Stmt::Class(decl) => self.eval_class_decl(decl, env),
        }
    }

    pub(crate) fn eval_expr(&mut self, expr: &Expr, env: &Env) -> ControlFlow {
        match expr {
            Expr::Nil => ControlFlow::Normal(Value::Nil),
            Expr::Bool(b) => ControlFlow::Normal(Value::Bool(*b)),
            Expr::Number(n) => ControlFlow::Normal(Value::Number(*n)),
            Expr::Str(s) => ControlFlow::Normal(Value::string(s.as_str())),
            Expr::Identifier(name) => self.eval_identifier(name, env),
            Expr::Array(elements) => self.eval_array_literal(elements, env),
            Expr::Dict(pairs) => self.eval_dict_literal(pairs, env),
            Expr::Function { params, body } => self.eval_function_literal(params, body, env),
            Expr::Block(block) => self.eval_block(block, env),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => self.eval_if(condition, consequence, alternative.as_ref(), env),
            Expr::Assign { target, value } => self.eval_assign(target, value, env),
            Expr::Or { left, right } => self.eval_or(left, right, env),
            Expr::And { left, right } => self.eval_and(left, right, env),
            Expr::Unary { operator, operand } => self.eval_unary(*operator, operand, env),
            Expr::Binary {
                left,
                operator,
                right,
            } => self.eval_binary(left, *operator, right, env),
            Expr::Call { callee, arguments } => self.eval_call(callee, arguments, env),
            Expr::Attr { object, name } => self.eval_attr(object, name, env),
            Expr::Index { object, index } => self.eval_index(object, index, env),
        }
    }

    fn eval_identifier(&mut self, name: &str, env: &Env) -> ControlFlow {
        match env.borrow().get(name) {
            Some(value) => ControlFlow::Normal(value),
            None => raise(format!("undefined name: {}", name)),
        }
    }

    /// A block's value is its last statement's value, or Nil if empty.
    ///
    /// Block scoping is lazy: a fresh child environment is created at the
    /// block's first `let`, so a declaration-free block shares the enclosing
    /// scope and assignments inside it escape. This is observable, not an
    /// optimization.
    pub(crate) fn eval_block(&mut self, block: &Block, env: &Env) -> ControlFlow {
        let mut block_env = Rc::clone(env);
        let mut has_scope = false;
        let mut result = Value::Nil;
        for stmt in &block.statements {
            if !has_scope && matches!(stmt, Stmt::Let { .. }) {
                block_env = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(env))));
                has_scope = true;
            }
            result = value_of!(self.eval_stmt(stmt, &block_env));
        }
        ControlFlow::Normal(result)
    }

    fn eval_if(
        &mut self,
        condition: &Expr,
        consequence: &Block,
        alternative: Option<&Block>,
        env: &Env,
    ) -> ControlFlow {
        let condition = value_of!(self.eval_expr(condition, env));
        if condition.is_truthy() {
            self.eval_block(consequence, env)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative, env)
        } else {
            ControlFlow::Normal(Value::Nil)
        }
    }

    fn eval_while(&mut self, condition: &Expr, body: &Block, env: &Env) -> ControlFlow {
        loop {
            let condition = value_of!(self.eval_expr(condition, env));
            if !condition.is_truthy() {
                break;
            }
            value_of!(self.eval_block(body, env));
        }
        ControlFlow::Normal(Value::Nil)
    }

    /// Classes are created once at declaration time and live for the
    /// program's duration. Methods close over the declaring environment.
    fn eval_class_decl(&mut self, decl: &ClassDecl, env: &Env) -> ControlFlow {
        let superclass = match &decl.superclass {
            Some(expr) => match value_of!(self.eval_expr(expr, env)) {
                Value::Class(class) => class.id,
                other => {
                    return raise(format!(
                        "superclass must be a class, not {}",
                        other.kind_name()
                    ))
                }
            },
            None => classes::OBJECT,
        };
        let class = self.classes.define(&decl.name, Some(superclass));
        for method in &decl.methods {
            let function = Function {
                name: method.name.clone(),
                params: method.params.clone(),
                body: method.body.clone(),
                closure: Rc::clone(env),
            };
            self.classes
                .add_method(class.id, method.name.clone(), Value::Function(Rc::new(function)));
        }
        let class = Value::Class(class);
        env.borrow_mut().define(decl.name.clone(), class.clone());
        ControlFlow::Normal(class)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
