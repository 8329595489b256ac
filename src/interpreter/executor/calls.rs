//! Call evaluation: user functions, native functions, and instantiation.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::Expr;
use crate::interpreter::classes::ClassId;
use crate::interpreter::executor::{raise, value_of, ControlFlow, Env, Interpreter};
use crate::interpreter::environment::Environment;
use crate::interpreter::value::{Function, Instance, Value};

impl Interpreter {
    /// Evaluate a call. A method-style callee (`obj.name(...)`) resolves the
    /// attribute through the class registry so natives get bound; the object
    /// itself becomes the receiver of a user function.
    pub(crate) fn eval_call(
        &mut self,
        callee: &Expr,
        arguments: &[Expr],
        env: &Env,
    ) -> ControlFlow {
        let (callee, receiver) = match callee {
            Expr::Attr { object, name } => {
                let object = value_of!(self.eval_expr(object, env));
                let found = match self.classes.lookup(&object, name) {
                    Some(found) => found,
                    None => {
                        return raise(format!(
                            "no such attribute: {} on {}",
                            name,
                            object.kind_name()
                        ))
                    }
                };
                (found, Some(object))
            }
            other => (value_of!(self.eval_expr(other, env)), None),
        };
        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(value_of!(self.eval_expr(argument, env)));
        }
        self.call_value(callee, receiver, args)
    }

    pub(crate) fn call_value(
        &mut self,
        callee: Value,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> ControlFlow {
        match callee {
            Value::Function(function) => self.call_function(&function, receiver, args),
            Value::Native(native) => match native.call(&args) {
                // Natives report failure by returning an Error value.
                error @ Value::Error(_) => ControlFlow::Raised(error),
                value => ControlFlow::Normal(value),
            },
            Value::Class(class) => self.instantiate(class.id, args),
            other => raise(format!("not a function: {}", other.kind_name())),
        }
    }

    /// Run a user function in a fresh child of its closure environment.
    /// Parameters bind positionally; missing arguments bind to Nil, extras
    /// are dropped. A `return` unwinds to here.
    fn call_function(
        &mut self,
        function: &Function,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> ControlFlow {
        let mut call_env = Environment::with_enclosing(Rc::clone(&function.closure));
        if let Some(receiver) = receiver {
            call_env.define("this", receiver);
        }
        let mut args = args.into_iter();
        for param in &function.params {
            call_env.define(param.clone(), args.next().unwrap_or(Value::Nil));
        }
        let call_env = Rc::new(RefCell::new(call_env));
        match self.eval_block(&function.body, &call_env) {
            ControlFlow::Return(value) => ControlFlow::Normal(value),
            other => other,
        }
    }

    /// Calling a class creates an instance and runs its `init` method (found
    /// anywhere on the superclass chain) with the instance as receiver. The
    /// instance is the call's value regardless of what `init` returns.
    fn instantiate(&mut self, class: ClassId, args: Vec<Value>) -> ControlFlow {
        let instance = Value::Instance(Rc::new(RefCell::new(Instance::new(
            self.classes.handle(class),
        ))));
        if let Some(init) = self.classes.lookup(&instance, "init") {
            value_of!(self.call_value(init, Some(instance.clone()), args));
        }
        ControlFlow::Normal(instance)
    }
}
