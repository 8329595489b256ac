//! Statement AST nodes.

use crate::ast::expr::Expr;

/// All statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable declaration: `let x = expr`
    Let { name: String, value: Expr },
    /// Return from the enclosing function: `return expr`
    Return(Expr),
    /// While loop: `while (cond) { ... }`
    While { condition: Expr, body: Block },
    /// Class declaration: `class Name < Super { ... }`
    Class(ClassDecl),
    /// Bare expression statement
    Expression(Expr),
}

/// A braced sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

impl Block {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}

/// A class declaration: name, optional superclass expression, and methods.
/// With no superclass expression the class derives from `Object`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub superclass: Option<Expr>,
    pub methods: Vec<MethodDecl>,
}

/// A method inside a class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}
