//! Operator semantics over already-evaluated operands.
//!
//! Every primitive lets a pending raise through before it looks at operand
//! kinds, so `raise + true` is a raise and not a type fault.

use crate::list::List;
use crate::{ArithOp, CompareOp, EvalError, EvalResult, Position, Span, Value};

fn type_mismatch(
    operator: &'static str,
    position: Position,
    expected: &'static str,
    found: &Value,
    span: Span,
) -> EvalResult {
    Err(EvalError::TypeMismatch {
        operator,
        position,
        expected,
        found: found.type_name(),
        span,
    })
}

// Extracts the numbers from both operands or returns the matching fault
macro_rules! expect_numbers {
    ($left:expr, $right:expr, $span:expr, $name:expr) => {
        match (&$left, &$right) {
            (Value::Raise, _) | (_, Value::Raise) => return Ok(Value::Raise),
            (Value::Number(l), Value::Number(r)) => (*l, *r),
            (Value::Number(_), other) => {
                return type_mismatch($name, Position::Right, "number", other, $span);
            }
            (other, _) => {
                return type_mismatch($name, Position::Left, "number", other, $span);
            }
        }
    };
}

// Extracts a list from a unary operand, passing raises through
macro_rules! expect_list {
    ($value:expr, $span:expr, $name:expr, $position:expr) => {
        match $value {
            Value::Raise => return Ok(Value::Raise),
            Value::List(list) => list,
            other => return type_mismatch($name, $position, "list", &other, $span),
        }
    };
}

/// `+ - *` on 64-bit integers. Overflow wraps around.
pub fn prim_arith(op: ArithOp, left: Value, right: Value, span: Span) -> EvalResult {
    let (l, r) = expect_numbers!(left, right, span, op.symbol());
    let result = match op {
        ArithOp::Add => l.wrapping_add(r),
        ArithOp::Sub => l.wrapping_sub(r),
        ArithOp::Mul => l.wrapping_mul(r),
    };
    Ok(Value::Number(result))
}

pub fn prim_compare(op: CompareOp, left: Value, right: Value, span: Span) -> EvalResult {
    let (l, r) = expect_numbers!(left, right, span, op.symbol());
    let result = match op {
        CompareOp::Gt => l > r,
        CompareOp::Ge => l >= r,
        CompareOp::Eq => l == r,
        CompareOp::Ne => l != r,
        CompareOp::Le => l <= r,
        CompareOp::Lt => l < r,
    };
    Ok(Value::Bool(result))
}

/// Prepends `head` onto `tail`. The tail's cells are shared, never modified.
pub fn prim_cons(head: Value, tail: Value, span: Span) -> EvalResult {
    if head.is_raise() {
        return Ok(Value::Raise);
    }
    let tail = expect_list!(tail, span, "::", Position::Right);
    Ok(Value::List(tail.cons(head)))
}

pub fn prim_head(list: Value, span: Span) -> EvalResult {
    let list = expect_list!(list, span, "head", Position::Operand);
    Ok(list.first().cloned().unwrap_or(Value::Raise))
}

pub fn prim_tail(list: Value, span: Span) -> EvalResult {
    let list = expect_list!(list, span, "tail", Position::Operand);
    Ok(list.rest().map_or(Value::Raise, Value::List))
}

pub fn prim_is_empty(list: Value, span: Span) -> EvalResult {
    let list = expect_list!(list, span, "isEmpty", Position::Operand);
    Ok(Value::Bool(list.is_empty()))
}

/// Builds a list from evaluated elements, or raises if any element did.
pub fn prim_list(elements: Vec<Value>) -> EvalResult {
    if elements.iter().any(Value::is_raise) {
        return Ok(Value::Raise);
    }
    Ok(Value::List(elements.into_iter().collect::<List>()))
}
