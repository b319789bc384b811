//! SPL IR: the data shared by every phase.
//!
//! - Spans for source locations
//! - AST nodes (`Expr`, `Stmt`, `Program`)
//! - Runtime `Value`s
//! - Graphviz export of the tree for debugging

pub mod ast;
pub mod dot;
mod span;
mod value;

pub use ast::{
    ArithOp, AstNode, CompareOp, Expr, ExprKind, FunDecl, Ident, LogicOp, Program, Stmt, StmtKind,
    StrLit,
};
pub use span::{Span, SpanError, Spanned};
pub use value::{FunctionId, TypeMismatch, Value, ValueTag};
