//! Runtime errors raised while interpreting.
//!
//! None of these abort the run: the session records the error, reports the
//! first one, and evaluation continues with `Value::Unset`.

use spl_ir::TypeMismatch;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),
    #[error("no binding for variable `{0}`")]
    UnboundVariable(String),
    #[error("variable `{0}` is already bound")]
    AlreadyBound(String),
    #[error("can't rebind `{0}`; not yet bound")]
    NotYetBound(String),
    #[error("divide by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("`{0}` is not a function")]
    NotCallable(String),
    #[error("`return` outside of a function")]
    ReturnOutsideFunction,
    #[error("no nested function declarations (`{0}`)")]
    NestedFunction(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type EvalResult<T> = Result<T, EvalError>;
