//! Built-in global functions and the native methods on the builtin classes.

use std::rc::Rc;

use crate::interpreter::classes::{self, ClassRef, ClassRegistry};
use crate::interpreter::environment::Environment;
use crate::interpreter::hashing::{hash_value, Key};
use crate::interpreter::value::{NativeFunction, Value};

fn native<F>(name: &str, arity: Option<usize>, func: F) -> Value
where
    F: Fn(Option<&Value>, &[Value]) -> Value + 'static,
{
    Value::Native(Rc::new(NativeFunction::new(name, arity, func)))
}

/// Populate the global scope and the builtin classes. Called once per
/// interpreter, before any user code runs.
pub fn register_builtins(globals: &mut Environment, registry: &mut ClassRegistry) {
    register_globals(globals, registry);
    register_methods(registry);
}

fn register_globals(globals: &mut Environment, registry: &ClassRegistry) {
    // The builtin classes are reachable by name, like any other global.
    for id in [
        classes::OBJECT,
        classes::CLASS,
        classes::NIL,
        classes::BOOLEAN,
        classes::NUMBER,
        classes::STRING,
        classes::ARRAY,
        classes::DICTIONARY,
        classes::FUNCTION,
        classes::ERROR,
    ] {
        let class = registry.handle(id);
        globals.define(class.name.to_string(), Value::Class(class));
    }

    globals.define(
        "puts",
        native("puts", None, |_, args| {
            let line = args
                .iter()
                .map(|arg| arg.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            println!("{}", line);
            Value::Nil
        }),
    );

    globals.define(
        "len",
        native("len", Some(1), |_, args| match &args[0] {
            Value::String(s) => Value::Number(s.chars().count() as f64),
            Value::Array(elements) => Value::Number(elements.borrow().len() as f64),
            Value::Dict(table) => Value::Number(table.borrow().size() as f64),
            other => Value::error(format!(
                "argument to len not supported, got {}",
                other.kind_name()
            )),
        }),
    );

    // `type` answers the class of its argument. The registry cannot be
    // captured by the closure, so the builtin handles are cloned in and
    // instances carry their own class handle.
    let handles: Vec<ClassRef> = [
        classes::NIL,
        classes::BOOLEAN,
        classes::NUMBER,
        classes::STRING,
        classes::ARRAY,
        classes::DICTIONARY,
        classes::CLASS,
        classes::FUNCTION,
        classes::ERROR,
    ]
    .iter()
    .map(|id| registry.handle(*id))
    .collect();
    globals.define(
        "type",
        native("type", Some(1), move |_, args| {
            let handle = match &args[0] {
                Value::Nil => &handles[0],
                Value::Bool(_) => &handles[1],
                Value::Number(_) => &handles[2],
                Value::String(_) => &handles[3],
                Value::Array(_) => &handles[4],
                Value::Dict(_) => &handles[5],
                Value::Class(_) => &handles[6],
                Value::Instance(instance) => return Value::Class(instance.borrow().class.clone()),
                Value::Function(_) | Value::Native(_) => &handles[7],
                Value::Error(_) => &handles[8],
            };
            Value::Class(handle.clone())
        }),
    );

    globals.define(
        "inspect",
        native("inspect", Some(1), |_, args| {
            Value::string(args[0].to_string())
        }),
    );

    globals.define(
        "hashable",
        native("hashable", Some(1), |_, args| {
            Value::Bool(hash_value(&args[0]).is_some())
        }),
    );
}

fn register_methods(registry: &mut ClassRegistry) {
    // Object.inspect renders any receiver; every value inherits it.
    registry.add_method(
        classes::OBJECT,
        "inspect",
        native("inspect", Some(0), |receiver, _| match receiver {
            Some(receiver) => Value::string(receiver.to_string()),
            None => Value::Nil,
        }),
    );

    registry.add_method(
        classes::ARRAY,
        "push",
        native("push", Some(1), |receiver, args| match receiver {
            Some(Value::Array(elements)) => {
                elements.borrow_mut().push(args[0].clone());
                receiver.cloned().unwrap_or(Value::Nil)
            }
            _ => Value::error("push requires an array receiver"),
        }),
    );
    registry.add_method(
        classes::ARRAY,
        "size",
        native("size", Some(0), |receiver, _| match receiver {
            Some(Value::Array(elements)) => Value::Number(elements.borrow().len() as f64),
            _ => Value::error("size requires an array receiver"),
        }),
    );

    registry.add_method(
        classes::DICTIONARY,
        "size",
        native("size", Some(0), |receiver, _| match receiver {
            Some(Value::Dict(table)) => Value::Number(table.borrow().size() as f64),
            _ => Value::error("size requires a dictionary receiver"),
        }),
    );
    // delete answers whether the key was present.
    registry.add_method(
        classes::DICTIONARY,
        "delete",
        native("delete", Some(1), |receiver, args| match receiver {
            Some(Value::Dict(table)) => match Key::new(args[0].clone()) {
                Some(key) => Value::Bool(table.borrow_mut().delete(&key)),
                None => Value::error(format!(
                    "unusable as dictionary key: {}",
                    args[0].kind_name()
                )),
            },
            _ => Value::error("delete requires a dictionary receiver"),
        }),
    );

    registry.add_method(
        classes::STRING,
        "size",
        native("size", Some(0), |receiver, _| match receiver {
            Some(Value::String(s)) => Value::Number(s.chars().count() as f64),
            _ => Value::error("size requires a string receiver"),
        }),
    );
}
