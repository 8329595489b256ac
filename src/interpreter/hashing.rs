//! The hashable contract for dictionary keys.
//!
//! A key needs two capabilities: a structural 64-bit hash and a structural
//! equality predicate. The hash here is independent of the table's probe
//! seeds — the table XORs its own randomized seeds on top — so rehashing
//! never needs to recompute these, and [`Key`] can cache its hash.

use std::rc::Rc;

use crate::interpreter::value::Value;

const NIL_HASH: u64 = 42;
const TRUE_HASH: u64 = 0xDEAD_BEEF;
const FALSE_HASH: u64 = 0xBEEF_DEAD;
// hash mask for numbers
const NUMBER_HASH_MASK: u64 = 0xABBA_ABBA;

/// 64-bit string hash. The seeds are fixed: key hashes must stay stable for
/// the lifetime of the value, while per-table seeds rotate on every rehash.
fn string_hash(s: &str) -> u64 {
    ahash::RandomState::with_seeds(7, 11, 13, 17).hash_one(s)
}

/// Whole numbers hash by integer value, not bit pattern: an integral f64 has
/// an all-zero low mantissa, which would starve the table's power-of-two
/// slot mask of entropy and make every integer key collide in both candidate
/// slots. Equal numbers (including -0.0 == 0.0) must hash alike.
fn number_hash(n: f64) -> u64 {
    let bits = if n.fract() == 0.0 {
        n as i64 as u64
    } else {
        n.to_bits()
    };
    bits ^ NUMBER_HASH_MASK
}

/// The structural hash of a value, or None if the value cannot key a
/// dictionary. Functions have no structural identity and hash by pointer.
pub fn hash_value(value: &Value) -> Option<u64> {
    match value {
        Value::Nil => Some(NIL_HASH),
        Value::Bool(true) => Some(TRUE_HASH),
        Value::Bool(false) => Some(FALSE_HASH),
        Value::Number(n) => Some(number_hash(*n)),
        Value::String(s) => Some(string_hash(s)),
        Value::Function(f) => Some(Rc::as_ptr(f) as u64),
        Value::Native(f) => Some(Rc::as_ptr(f) as u64),
        _ => None,
    }
}

/// Key equality: identity fast path, then same kind plus the kind's
/// structural predicate.
pub fn key_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => Rc::ptr_eq(x, y) || x == y,
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Native(x), Value::Native(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

/// A dictionary key: a value validated as hashable, with its structural hash
/// cached.
#[derive(Debug, Clone)]
pub struct Key {
    value: Value,
    hash: u64,
}

impl Key {
    /// Wrap `value` as a key, or None if it is not hashable.
    pub fn new(value: Value) -> Option<Self> {
        hash_value(&value).map(|hash| Self { value, hash })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && key_eq(&self.value, &other.value)
    }
}
