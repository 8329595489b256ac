//! chime: a tree-walking runtime for a small dynamically-typed language.
//!
//! The crate takes programs as ASTs ([`ast::Program`]) and evaluates them
//! with [`interpreter::Interpreter`]. Values are dynamically typed and
//! class-based: every value has a class, classes support single inheritance,
//! and attribute lookup walks the superclass chain. Dictionaries are backed
//! by a seeded two-choice hash table.
//!
//! ```
//! use chimelang::ast::{Expr, Program, Stmt};
//! use chimelang::interpreter::{Interpreter, Value};
//!
//! let program = Program {
//!     statements: vec![Stmt::Expression(Expr::Binary {
//!         left: Box::new(Expr::Number(2.0)),
//!         operator: chimelang::ast::BinaryOp::Add,
//!         right: Box::new(Expr::Number(3.0)),
//!     })],
//! };
//! let value = Interpreter::new().interpret(&program).unwrap();
//! assert_eq!(value, Value::Number(5.0));
//! ```

pub mod ast;
pub mod error;
pub mod interpreter;
