//! AST node definitions.
//!
//! The runtime does not include a lexer or parser; an embedding host hands
//! the interpreter a finished [`Program`] built from these nodes. The host
//! front end guarantees that class declarations are acyclic; assignment
//! targets are re-checked at runtime and raise on an invalid target.

mod expr;
mod stmt;

pub use expr::*;
pub use stmt::*;

/// A complete program: a sequence of top-level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}
