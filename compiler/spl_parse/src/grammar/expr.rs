//! Expression productions, lowest precedence first.

use spl_diagnostic::{expected_expression, Diagnostic};
use spl_ir::{ArithOp, CompareOp, Expr, ExprKind, LogicOp};
use spl_lexer::TokenKind;
use spl_stack::ensure_sufficient_stack;

use crate::Parser;

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, Diagnostic> {
        ensure_sufficient_stack(|| self.parse_or())
    }

    fn parse_or(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_and()?;
        while self.cursor.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = Expr::logic(LogicOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_not()?;
        while self.cursor.eat(&TokenKind::And) {
            let right = self.parse_not()?;
            left = Expr::logic(LogicOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, Diagnostic> {
        if self.cursor.check(&TokenKind::Not) {
            let start = self.cursor.advance().span;
            let operand = ensure_sufficient_stack(|| self.parse_not())?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(ExprKind::Not(Box::new(operand)), span));
        }
        self.parse_comparison()
    }

    /// Comparisons do not chain: `a < b < c` is a syntax error.
    fn parse_comparison(&mut self) -> Result<Expr, Diagnostic> {
        let left = self.parse_additive()?;
        let op = match self.cursor.current_kind() {
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::LtEq => CompareOp::Le,
            TokenKind::GtEq => CompareOp::Ge,
            TokenKind::Eq => CompareOp::Eq,
            TokenKind::NotEq => CompareOp::Ne,
            _ => return Ok(left),
        };
        self.cursor.advance();
        let right = self.parse_additive()?;
        Ok(Expr::compare(op, left, right))
    }

    fn parse_additive(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Plus => ArithOp::Add,
                TokenKind::Minus => ArithOp::Sub,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::arith(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => ArithOp::Mul,
                TokenKind::Slash => ArithOp::Div,
                TokenKind::Percent => ArithOp::Mod,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_unary()?;
            left = Expr::arith(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, Diagnostic> {
        if self.cursor.check(&TokenKind::Minus) {
            let start = self.cursor.advance().span;
            let operand = ensure_sufficient_stack(|| self.parse_unary())?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(ExprKind::Neg(Box::new(operand)), span));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        let span = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Int(n) => ExprKind::Num(*n),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Read => ExprKind::Read,
            TokenKind::Ident(_) => return self.parse_ident_or_call(),
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            other => return Err(expected_expression(span, &other.to_string())),
        };
        self.cursor.advance();
        Ok(Expr::new(kind, span))
    }

    fn parse_ident_or_call(&mut self) -> Result<Expr, Diagnostic> {
        let callee = self.parse_ident()?;
        if !self.cursor.eat(&TokenKind::LParen) {
            let span = callee.span;
            return Ok(Expr::new(ExprKind::Ident(callee.name), span));
        }
        let arg = self.parse_expr()?;
        let close = self.cursor.expect(&TokenKind::RParen)?;
        let span = callee.span.merge(close);
        Ok(Expr::new(
            ExprKind::Call {
                callee,
                arg: Box::new(arg),
            },
            span,
        ))
    }
}
