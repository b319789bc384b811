//! Expression nodes.

use std::fmt;

use super::operators::{ArithOp, CompareOp, LogicOp};
use super::AstNode;
use crate::{Span, Spanned};

/// A name as written in the source.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Ident {
            name: name.into(),
            span,
        }
    }

    pub fn dummy(name: impl Into<String>) -> Self {
        Self::new(name, Span::DUMMY)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Expression node.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Expression kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Ident(String),
    Num(i32),
    Bool(bool),
    Arith {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logic {
        op: LogicOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Neg(Box<Expr>),
    Not(Box<Expr>),
    /// Reads one integer from program input.
    Read,
    /// Single-argument function call.
    Call {
        callee: Ident,
        arg: Box<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn num(n: i32) -> Self {
        Self::new(ExprKind::Num(n), Span::DUMMY)
    }

    pub fn bool(b: bool) -> Self {
        Self::new(ExprKind::Bool(b), Span::DUMMY)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident(name.into()), Span::DUMMY)
    }

    pub fn read() -> Self {
        Self::new(ExprKind::Read, Span::DUMMY)
    }

    pub fn arith(op: ArithOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Self::new(
            ExprKind::Arith {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn compare(op: CompareOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Self::new(
            ExprKind::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn logic(op: LogicOp, left: Expr, right: Expr) -> Self {
        let span = left.span.merge(right.span);
        Self::new(
            ExprKind::Logic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn neg(operand: Expr) -> Self {
        let span = operand.span;
        Self::new(ExprKind::Neg(Box::new(operand)), span)
    }

    pub fn not(operand: Expr) -> Self {
        let span = operand.span;
        Self::new(ExprKind::Not(Box::new(operand)), span)
    }

    pub fn call(callee: impl Into<String>, arg: Expr) -> Self {
        let span = arg.span;
        Self::new(
            ExprKind::Call {
                callee: Ident::dummy(callee),
                arg: Box::new(arg),
            },
            span,
        )
    }

    /// True when the expression always produces a boolean, regardless of
    /// what any identifier is bound to.
    pub fn is_statically_boolean(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Bool(_)
                | ExprKind::Compare { .. }
                | ExprKind::Logic { .. }
                | ExprKind::Not(_)
        )
    }

    /// Short label used by the graph export.
    pub fn label(&self) -> String {
        match &self.kind {
            ExprKind::Ident(name) => format!("id:{name}"),
            ExprKind::Num(n) => format!("num:{n}"),
            ExprKind::Bool(b) => format!("bool:{b}"),
            ExprKind::Arith { op, .. } => format!("arop:{}", op.as_symbol()),
            ExprKind::Compare { op, .. } => format!("compop:{}", op.as_symbol()),
            ExprKind::Logic { op, .. } => format!("boolop:{}", op.as_symbol()),
            ExprKind::Neg(_) => "neg".to_string(),
            ExprKind::Not(_) => "not".to_string(),
            ExprKind::Read => "read".to_string(),
            ExprKind::Call { .. } => "call".to_string(),
        }
    }

    /// Ordered children, for diagnostic export only.
    pub fn children(&self) -> Vec<AstNode<'_>> {
        match &self.kind {
            ExprKind::Ident(_) | ExprKind::Num(_) | ExprKind::Bool(_) | ExprKind::Read => {
                Vec::new()
            }
            ExprKind::Arith { left, right, .. }
            | ExprKind::Compare { left, right, .. }
            | ExprKind::Logic { left, right, .. } => {
                vec![AstNode::Expr(left), AstNode::Expr(right)]
            }
            ExprKind::Neg(operand) | ExprKind::Not(operand) => vec![AstNode::Expr(operand)],
            ExprKind::Call { callee, arg } => vec![AstNode::Ident(callee), AstNode::Expr(arg)],
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// A string literal, already unescaped.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StrLit {
    pub value: String,
    pub span: Span,
}

impl StrLit {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        StrLit {
            value: value.into(),
            span,
        }
    }

    /// Build a literal from the text between the quotes as written in source.
    pub fn from_source(raw: &str, span: Span) -> Self {
        Self::new(unescape(raw), span)
    }
}

/// Decode backslash escapes: `\n` and `\t` are control characters, any
/// other escaped character stands for itself, and a trailing lone backslash
/// is kept.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
