//! Expression AST nodes.

use std::fmt;

use crate::ast::stmt::Block;

/// All expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// nil literal
    Nil,
    /// Boolean literal: true, false
    Bool(bool),
    /// Number literal: 3.14
    Number(f64),
    /// String literal: "hello"
    Str(String),
    /// Variable reference: foo
    Identifier(String),
    /// Array literal: [1, 2, 3]
    Array(Vec<Expr>),
    /// Dictionary literal: { "key": value, ... }
    Dict(Vec<(Expr, Expr)>),
    /// Function literal: fn(a, b) { ... }
    Function { params: Vec<String>, body: Block },
    /// Block expression: { statements }
    Block(Block),

    /// Conditional: if (cond) { ... } else { ... }
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },

    /// Assignment expression: target = value
    Assign { target: Box<Expr>, value: Box<Expr> },

    /// Short-circuit or: a or b
    Or { left: Box<Expr>, right: Box<Expr> },
    /// Short-circuit and: a and b
    And { left: Box<Expr>, right: Box<Expr> },

    /// Unary operation: -x, !x
    Unary { operator: UnaryOp, operand: Box<Expr> },

    /// Binary operation: a + b
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },

    /// Function call: foo(a, b)
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// Attribute access: obj.name
    Attr { object: Box<Expr>, name: String },

    /// Index access: obj[index]
    Index { object: Box<Expr>, index: Box<Expr> },
}

impl Expr {
    /// A short human-readable description of the node kind, used by the
    /// evaluator when re-checking assignment targets.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Nil => "nil literal",
            Expr::Bool(_) => "boolean literal",
            Expr::Number(_) => "number literal",
            Expr::Str(_) => "string literal",
            Expr::Identifier(_) => "identifier",
            Expr::Array(_) => "array literal",
            Expr::Dict(_) => "dictionary literal",
            Expr::Function { .. } => "function literal",
            Expr::Block(_) => "block",
            Expr::If { .. } => "if expression",
            Expr::Assign { .. } => "assignment",
            Expr::Or { .. } => "or expression",
            Expr::And { .. } => "and expression",
            Expr::Unary { .. } => "unary expression",
            Expr::Binary { .. } => "binary expression",
            Expr::Call { .. } => "call expression",
            Expr::Attr { .. } => "attribute access",
            Expr::Index { .. } => "index expression",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation: !x
    Not,
    /// Arithmetic negation: -x
    Negate,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Negate => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// Identity comparison: a is b
    Is,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Is => "is",
        };
        write!(f, "{}", symbol)
    }
}
