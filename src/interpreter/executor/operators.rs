//! Unary, binary, and short-circuit logical operators.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::interpreter::executor::{raise, value_of, ControlFlow, Env, Interpreter};
use crate::interpreter::value::Value;

impl Interpreter {
    /// `or` yields the left operand when it is truthy, without evaluating
    /// the right.
    pub(crate) fn eval_or(&mut self, left: &Expr, right: &Expr, env: &Env) -> ControlFlow {
        let left = value_of!(self.eval_expr(left, env));
        if left.is_truthy() {
            return ControlFlow::Normal(left);
        }
        self.eval_expr(right, env)
    }

    /// `and` yields the left operand when it is falsy, without evaluating
    /// the right.
    pub(crate) fn eval_and(&mut self, left: &Expr, right: &Expr, env: &Env) -> ControlFlow {
        let left = value_of!(self.eval_expr(left, env));
        if !left.is_truthy() {
            return ControlFlow::Normal(left);
        }
        self.eval_expr(right, env)
    }

    pub(crate) fn eval_unary(
        &mut self,
        operator: UnaryOp,
        operand: &Expr,
        env: &Env,
    ) -> ControlFlow {
        let operand = value_of!(self.eval_expr(operand, env));
        match operator {
            UnaryOp::Not => ControlFlow::Normal(Value::Bool(!operand.is_truthy())),
            UnaryOp::Negate => match operand {
                Value::Number(n) => ControlFlow::Normal(Value::Number(-n)),
                other => raise(format!("unknown operator: -{}", other.kind_name())),
            },
        }
    }

    pub(crate) fn eval_binary(
        &mut self,
        left: &Expr,
        operator: BinaryOp,
        right: &Expr,
        env: &Env,
    ) -> ControlFlow {
        let left = value_of!(self.eval_expr(left, env));
        let right = value_of!(self.eval_expr(right, env));
        apply_binary(left, operator, right)
    }
}

/// Apply a binary operator to two already-evaluated operands.
fn apply_binary(left: Value, operator: BinaryOp, right: Value) -> ControlFlow {
    // The comparisons are defined for every pair of values.
    match operator {
        BinaryOp::Is => return ControlFlow::Normal(Value::Bool(left.is_identical(&right))),
        BinaryOp::Equal => return ControlFlow::Normal(Value::Bool(left == right)),
        BinaryOp::NotEqual => return ControlFlow::Normal(Value::Bool(left != right)),
        _ => {}
    }
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => {
            let result = match operator {
                BinaryOp::Add => Value::Number(a + b),
                BinaryOp::Subtract => Value::Number(a - b),
                BinaryOp::Multiply => Value::Number(a * b),
                BinaryOp::Divide => Value::Number(a / b),
                BinaryOp::Less => Value::Bool(a < b),
                BinaryOp::LessEqual => Value::Bool(a <= b),
                BinaryOp::Greater => Value::Bool(a > b),
                BinaryOp::GreaterEqual => Value::Bool(a >= b),
                _ => unreachable!("comparison handled above"),
            };
            ControlFlow::Normal(result)
        }
        (Value::String(a), Value::String(b)) => match operator {
            BinaryOp::Add => ControlFlow::Normal(Value::string(format!("{}{}", a, b))),
            BinaryOp::Less => ControlFlow::Normal(Value::Bool(a < b)),
            BinaryOp::LessEqual => ControlFlow::Normal(Value::Bool(a <= b)),
            BinaryOp::Greater => ControlFlow::Normal(Value::Bool(a > b)),
            BinaryOp::GreaterEqual => ControlFlow::Normal(Value::Bool(a >= b)),
            _ => raise(format!(
                "unknown operator: string {} string",
                operator
            )),
        },
        _ if left.kind_name() != right.kind_name() => raise(format!(
            "type mismatch: {} {} {}",
            left.kind_name(),
            operator,
            right.kind_name()
        )),
        _ => raise(format!(
            "unknown operator: {} {} {}",
            left.kind_name(),
            operator,
            right.kind_name()
        )),
    }
}
