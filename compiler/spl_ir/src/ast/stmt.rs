//! Statement nodes.

use std::fmt;

use super::expr::{Expr, Ident, StrLit};
use super::AstNode;
use crate::{Span, Spanned};

/// Statement node.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// A single-parameter function definition.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunDecl {
    pub name: Ident,
    pub param: Ident,
    pub body: Box<Stmt>,
}

/// Statement kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    /// Introduce a new binding in the current scope.
    New {
        name: Ident,
        value: Expr,
    },
    /// Rebind an existing name.
    Assign {
        name: Ident,
        value: Expr,
    },
    Write {
        value: Expr,
        newline: bool,
    },
    WriteStr {
        text: StrLit,
        newline: bool,
    },
    Fun(FunDecl),
    Return(Expr),
    Expr(Expr),
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    pub fn block(stmts: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Block(stmts), Span::DUMMY)
    }

    pub fn if_else(cond: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Self {
        Self::new(
            StmtKind::If {
                cond,
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            },
            Span::DUMMY,
        )
    }

    pub fn while_loop(cond: Expr, body: Stmt) -> Self {
        Self::new(
            StmtKind::While {
                cond,
                body: Box::new(body),
            },
            Span::DUMMY,
        )
    }

    pub fn new_binding(name: impl Into<String>, value: Expr) -> Self {
        Self::new(
            StmtKind::New {
                name: Ident::dummy(name),
                value,
            },
            Span::DUMMY,
        )
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Self::new(
            StmtKind::Assign {
                name: Ident::dummy(name),
                value,
            },
            Span::DUMMY,
        )
    }

    /// `write e;` followed by a line feed.
    pub fn write(value: Expr) -> Self {
        Self::new(
            StmtKind::Write {
                value,
                newline: true,
            },
            Span::DUMMY,
        )
    }

    pub fn write_str(text: impl Into<String>, newline: bool) -> Self {
        Self::new(
            StmtKind::WriteStr {
                text: StrLit::new(text, Span::DUMMY),
                newline,
            },
            Span::DUMMY,
        )
    }

    pub fn fun(name: impl Into<String>, param: impl Into<String>, body: Stmt) -> Self {
        Self::new(
            StmtKind::Fun(FunDecl {
                name: Ident::dummy(name),
                param: Ident::dummy(param),
                body: Box::new(body),
            }),
            Span::DUMMY,
        )
    }

    pub fn ret(value: Expr) -> Self {
        Self::new(StmtKind::Return(value), Span::DUMMY)
    }

    pub fn expr(value: Expr) -> Self {
        Self::new(StmtKind::Expr(value), Span::DUMMY)
    }

    /// Short label used by the graph export.
    pub fn label(&self) -> String {
        match &self.kind {
            StmtKind::Block(_) => "block".to_string(),
            StmtKind::If { .. } => "if".to_string(),
            StmtKind::While { .. } => "while".to_string(),
            StmtKind::New { .. } => "new".to_string(),
            StmtKind::Assign { .. } => "asn".to_string(),
            StmtKind::Write { newline: true, .. } | StmtKind::WriteStr { newline: true, .. } => {
                "write".to_string()
            }
            StmtKind::Write { .. } | StmtKind::WriteStr { .. } => "print".to_string(),
            StmtKind::Fun(_) => "fun".to_string(),
            StmtKind::Return(_) => "return".to_string(),
            StmtKind::Expr(_) => "exp".to_string(),
        }
    }

    /// Ordered children, for diagnostic export only.
    pub fn children(&self) -> Vec<AstNode<'_>> {
        match &self.kind {
            StmtKind::Block(stmts) => stmts.iter().map(AstNode::Stmt).collect(),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let mut out = vec![AstNode::Expr(cond), AstNode::Stmt(then_branch)];
                if let Some(else_branch) = else_branch {
                    out.push(AstNode::Stmt(else_branch));
                }
                out
            }
            StmtKind::While { cond, body } => vec![AstNode::Expr(cond), AstNode::Stmt(body)],
            StmtKind::New { name, value } | StmtKind::Assign { name, value } => {
                vec![AstNode::Ident(name), AstNode::Expr(value)]
            }
            StmtKind::Write { value, .. } | StmtKind::Return(value) | StmtKind::Expr(value) => {
                vec![AstNode::Expr(value)]
            }
            StmtKind::WriteStr { text, .. } => vec![AstNode::Str(text)],
            StmtKind::Fun(decl) => vec![
                AstNode::Ident(&decl.name),
                AstNode::Ident(&decl.param),
                AstNode::Stmt(&decl.body),
            ],
        }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// A whole program: the top-level statement sequence.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body }
    }
}
