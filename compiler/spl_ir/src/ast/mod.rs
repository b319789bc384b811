//! AST node types.
//!
//! Expressions and statements are closed sum types; every consumer matches
//! them exhaustively. Nodes own their children (`Box`/`Vec`), and the tree is
//! immutable once built.

mod expr;
mod operators;
mod stmt;

pub use expr::{unescape, Expr, ExprKind, Ident, StrLit};
pub use operators::{ArithOp, CompareOp, LogicOp};
pub use stmt::{FunDecl, Program, Stmt, StmtKind};

/// Borrowed view of any AST node, for generic tree walks such as the graph
/// export.
#[derive(Copy, Clone, Debug)]
pub enum AstNode<'a> {
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    Ident(&'a Ident),
    Str(&'a StrLit),
}

impl<'a> AstNode<'a> {
    pub fn label(&self) -> String {
        match self {
            AstNode::Stmt(stmt) => stmt.label(),
            AstNode::Expr(expr) => expr.label(),
            AstNode::Ident(ident) => format!("id:{}", ident.name),
            AstNode::Str(lit) => format!("str:{:?}", lit.value),
        }
    }

    pub fn children(&self) -> Vec<AstNode<'a>> {
        match *self {
            AstNode::Stmt(stmt) => stmt.children(),
            AstNode::Expr(expr) => expr.children(),
            AstNode::Ident(_) | AstNode::Str(_) => Vec::new(),
        }
    }
}
