//! The chime runtime: values, scopes, classes, and the evaluator.

pub mod builtins;
pub mod classes;
pub mod environment;
pub mod executor;
pub mod hashing;
pub mod hashtable;
pub mod value;

pub use executor::Interpreter;
pub use value::Value;

#[cfg(test)]
mod tests;
