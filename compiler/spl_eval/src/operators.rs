//! Binary operator evaluation.
//!
//! Arithmetic is 32-bit two's complement: overflow wraps, division truncates
//! toward zero and the remainder takes the sign of the dividend.

use spl_ir::{ArithOp, CompareOp, Value};

use crate::errors::{EvalError, EvalResult};

pub fn evaluate_arith(op: ArithOp, left: Value, right: Value) -> EvalResult<Value> {
    let a = left.as_number()?;
    let b = right.as_number()?;
    let n = match op {
        ArithOp::Add => a.wrapping_add(b),
        ArithOp::Sub => a.wrapping_sub(b),
        ArithOp::Mul => a.wrapping_mul(b),
        ArithOp::Div => {
            if b == 0 {
                return Err(EvalError::DivisionByZero);
            }
            a.wrapping_div(b)
        }
        ArithOp::Mod => {
            if b == 0 {
                return Err(EvalError::ModuloByZero);
            }
            a.wrapping_rem(b)
        }
    };
    Ok(Value::Number(n))
}

/// Ordering operators need numbers; `=` and `!=` compare any two values.
pub fn evaluate_compare(op: CompareOp, left: Value, right: Value) -> EvalResult<Value> {
    let result = match op {
        CompareOp::Eq => left == right,
        CompareOp::Ne => left != right,
        CompareOp::Lt | CompareOp::Gt | CompareOp::Le | CompareOp::Ge => {
            let a = left.as_number()?;
            let b = right.as_number()?;
            match op {
                CompareOp::Lt => a < b,
                CompareOp::Gt => a > b,
                CompareOp::Le => a <= b,
                _ => a >= b,
            }
        }
    };
    Ok(Value::Boolean(result))
}
