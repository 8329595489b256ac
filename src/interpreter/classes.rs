//! The class registry: single-inheritance classes and attribute/method
//! lookup.
//!
//! Classes live in an arena and are addressed by stable index, so the
//! superclass graph has no owning-pointer cycles and walking to the root is
//! a plain index chase. An out-of-range [`ClassId`] means the host corrupted
//! the graph and panics; it is never a language-level error.

use std::collections::HashMap;
use std::rc::Rc;

use crate::interpreter::value::Value;

/// Stable index of a class in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassId(usize);

// The builtin classes, created by `ClassRegistry::new` in this order.
pub const OBJECT: ClassId = ClassId(0);
pub const CLASS: ClassId = ClassId(1);
pub const NIL: ClassId = ClassId(2);
pub const BOOLEAN: ClassId = ClassId(3);
pub const NUMBER: ClassId = ClassId(4);
pub const STRING: ClassId = ClassId(5);
pub const ARRAY: ClassId = ClassId(6);
pub const DICTIONARY: ClassId = ClassId(7);
pub const FUNCTION: ClassId = ClassId(8);
pub const ERROR: ClassId = ClassId(9);

/// A class handle: the arena index plus the class name, so values can render
/// themselves without consulting the registry.
#[derive(Debug, Clone)]
pub struct ClassRef {
    pub id: ClassId,
    pub name: Rc<str>,
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A class: name, own attribute table, own method table, and at most one
/// superclass. The chain is acyclic and finite; the evaluator trusts this
/// and walks to the root.
#[derive(Debug)]
pub struct Class {
    pub name: Rc<str>,
    pub superclass: Option<ClassId>,
    pub attrs: HashMap<String, Value>,
    pub methods: HashMap<String, Value>,
}

/// Arena of every class in the program: the builtins plus one entry per
/// class declaration. Classes are never deleted.
#[derive(Debug)]
pub struct ClassRegistry {
    classes: Vec<Class>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            classes: Vec::new(),
        };
        // Object is the root: no superclass. Everything else, including
        // Class itself, chains up to it. Class is an instance of itself
        // (see `class_of`), which closes the metaclass loop at one level.
        registry.define("Object", None);
        registry.define("Class", Some(OBJECT));
        registry.define("Nil", Some(OBJECT));
        registry.define("Boolean", Some(OBJECT));
        registry.define("Number", Some(OBJECT));
        registry.define("String", Some(OBJECT));
        registry.define("Array", Some(OBJECT));
        registry.define("Dictionary", Some(OBJECT));
        registry.define("Function", Some(OBJECT));
        registry.define("Error", Some(OBJECT));
        registry
    }

    /// Create a new class and return its handle.
    pub fn define(&mut self, name: &str, superclass: Option<ClassId>) -> ClassRef {
        let id = ClassId(self.classes.len());
        self.classes.push(Class {
            name: Rc::from(name),
            superclass,
            attrs: HashMap::new(),
            methods: HashMap::new(),
        });
        self.handle(id)
    }

    pub fn get(&self, id: ClassId) -> &Class {
        &self.classes[id.0]
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.0]
    }

    pub fn handle(&self, id: ClassId) -> ClassRef {
        ClassRef {
            id,
            name: Rc::clone(&self.get(id).name),
        }
    }

    /// Register a method on a class. Methods may be user functions, native
    /// functions, or any other value.
    pub fn add_method(&mut self, id: ClassId, name: impl Into<String>, method: Value) {
        self.get_mut(id).methods.insert(name.into(), method);
    }

    /// Set an attribute on a class.
    pub fn set_attr(&mut self, id: ClassId, name: impl Into<String>, value: Value) {
        self.get_mut(id).attrs.insert(name.into(), value);
    }

    /// The class of any value. Class values answer `Class`, making Class an
    /// instance of itself.
    pub fn class_of(&self, value: &Value) -> ClassId {
        match value {
            Value::Nil => NIL,
            Value::Bool(_) => BOOLEAN,
            Value::Number(_) => NUMBER,
            Value::String(_) => STRING,
            Value::Array(_) => ARRAY,
            Value::Dict(_) => DICTIONARY,
            Value::Class(_) => CLASS,
            Value::Instance(instance) => instance.borrow().class.id,
            Value::Function(_) | Value::Native(_) => FUNCTION,
            Value::Error(_) => ERROR,
        }
    }

    /// Attribute/method lookup. The value's own attribute table wins
    /// (instances and classes only); after that, each class on the
    /// `class_of` chain is checked in order, attributes before methods.
    /// Unbound native functions are bound to the receiver on the way out.
    pub fn lookup(&self, value: &Value, name: &str) -> Option<Value> {
        match value {
            Value::Instance(instance) => {
                if let Some(found) = instance.borrow().attrs.get(name) {
                    return Some(self.maybe_bind(found.clone(), value));
                }
            }
            Value::Class(class) => {
                if let Some(found) = self.get(class.id).attrs.get(name) {
                    return Some(self.maybe_bind(found.clone(), value));
                }
            }
            _ => {}
        }
        let mut current = Some(self.class_of(value));
        while let Some(id) = current {
            let class = self.get(id);
            if let Some(found) = class.attrs.get(name) {
                return Some(self.maybe_bind(found.clone(), value));
            }
            if let Some(found) = class.methods.get(name) {
                return Some(self.maybe_bind(found.clone(), value));
            }
            current = class.superclass;
        }
        None
    }

    /// Bind native functions to their receiver at lookup time. An
    /// already-bound native comes back unchanged (single-bind).
    fn maybe_bind(&self, found: Value, receiver: &Value) -> Value {
        match found {
            Value::Native(native) if native.receiver.is_none() => {
                Value::Native(Rc::new(native.bind(receiver.clone())))
            }
            other => other,
        }
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
