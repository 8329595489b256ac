//! Runtime values for the chime interpreter.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Block;
use crate::interpreter::classes::ClassRef;
use crate::interpreter::environment::Environment;
use crate::interpreter::hashtable::HashTable;

/// A runtime value in chime.
#[derive(Debug, Clone)]
pub enum Value {
    /// nil
    Nil,
    /// Boolean value
    Bool(bool),
    /// Number value
    Number(f64),
    /// String value
    String(Rc<str>),
    /// Array value
    Array(Rc<RefCell<Vec<Value>>>),
    /// Dictionary value, backed by the cuckoo hash table
    Dict(Rc<RefCell<HashTable>>),
    /// Class value
    Class(ClassRef),
    /// Class instance
    Instance(Rc<RefCell<Instance>>),
    /// User-defined function (closure)
    Function(Rc<Function>),
    /// Host-implemented function, optionally bound to a receiver
    Native(Rc<NativeFunction>),
    /// A language-level error carrying its reason. Errors are ordinary
    /// values; the evaluator propagates them, it never unwinds the host.
    Error(Rc<Value>),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    pub fn error(reason: impl Into<Rc<str>>) -> Value {
        Value::Error(Rc::new(Value::String(reason.into())))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Nil and false are falsy; everything else, including 0, "" and [],
    /// is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dictionary",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
            Value::Function(_) => "function",
            Value::Native(_) => "native function",
            Value::Error(_) => "error",
        }
    }

    /// Identity comparison, the `is` operator. Heap values compare by
    /// pointer; the unboxed primitives compare structurally since there is
    /// no interned singleton to point at.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Language equality (`==`): structural for the primitive kinds, identity
/// for everything composite.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            _ => self.is_identical(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Value::Dict(table) => {
                write!(f, "{{")?;
                for (i, (key, value)) in table.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Class(class) => write!(f, "<class {}>", class.name),
            Value::Instance(instance) => {
                write!(f, "<{} instance>", instance.borrow().class.name)
            }
            Value::Function(function) if function.name.is_empty() => write!(f, "<fn>"),
            Value::Function(function) => write!(f, "<fn {}>", function.name),
            Value::Native(native) => write!(f, "<native fn {}>", native.name),
            Value::Error(reason) => write!(f, "error: {}", reason),
        }
    }
}

/// A user-defined function: an AST body plus the environment captured at the
/// point of definition.
#[derive(Debug)]
pub struct Function {
    /// Empty for anonymous function literals.
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
    pub closure: Rc<RefCell<Environment>>,
}

/// The host side of a native function: receives the bound receiver (if any)
/// and the evaluated arguments, returns any Value. Failures are reported as
/// Error values.
pub type NativeFn = Rc<dyn Fn(Option<&Value>, &[Value]) -> Value>;

/// A host-implemented function. May carry a receiver (a bound method) and an
/// attribute table shared across all bindings of the same host function.
#[derive(Clone)]
pub struct NativeFunction {
    pub name: String,
    /// None means variadic.
    pub arity: Option<usize>,
    pub func: NativeFn,
    pub attrs: Rc<RefCell<HashMap<String, Value>>>,
    pub receiver: Option<Value>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, arity: Option<usize>, func: F) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> Value + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Rc::new(func),
            attrs: Rc::new(RefCell::new(HashMap::new())),
            receiver: None,
        }
    }

    /// Bind this function to a receiver: the binding shares the host
    /// function and attribute table. A function that already has a receiver
    /// is returned unchanged (single-bind).
    pub fn bind(&self, receiver: Value) -> NativeFunction {
        if self.receiver.is_some() {
            return self.clone();
        }
        NativeFunction {
            name: self.name.clone(),
            arity: self.arity,
            func: Rc::clone(&self.func),
            attrs: Rc::clone(&self.attrs),
            receiver: Some(receiver),
        }
    }

    /// Invoke the host function, checking arity first for fixed-arity
    /// functions.
    pub fn call(&self, args: &[Value]) -> Value {
        if let Some(want) = self.arity {
            if args.len() != want {
                return Value::error(format!(
                    "wrong number of arguments: got {}, want {}",
                    args.len(),
                    want
                ));
            }
        }
        (self.func)(self.receiver.as_ref(), args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

/// A class instance: a class reference plus its own attribute table.
#[derive(Debug)]
pub struct Instance {
    pub class: ClassRef,
    pub attrs: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: ClassRef) -> Self {
        Self {
            class,
            attrs: HashMap::new(),
        }
    }
}
