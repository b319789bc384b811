//! Statement productions.

use spl_diagnostic::{expected_identifier, unclosed_delimiter, unexpected_token, Diagnostic};
use spl_ir::{FunDecl, Ident, Span, Stmt, StmtKind, StrLit};
use spl_lexer::TokenKind;
use spl_stack::ensure_sufficient_stack;

use crate::Parser;

impl Parser {
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, Diagnostic> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::New => {
                self.cursor.advance();
                let name = self.parse_ident()?;
                self.expect_binding_op()?;
                let value = self.parse_expr()?;
                self.finish(start, StmtKind::New { name, value })
            }
            TokenKind::Ident(_)
                if matches!(self.cursor.peek_kind(), TokenKind::Eq | TokenKind::ColonEq) =>
            {
                let name = self.parse_ident()?;
                self.expect_binding_op()?;
                let value = self.parse_expr()?;
                self.finish(start, StmtKind::Assign { name, value })
            }
            TokenKind::Write | TokenKind::Print => {
                let newline = self.cursor.advance().kind == TokenKind::Write;
                let kind = if let TokenKind::Str(text) = self.cursor.current_kind() {
                    let text = StrLit::new(text.clone(), self.cursor.current_span());
                    self.cursor.advance();
                    StmtKind::WriteStr { text, newline }
                } else {
                    StmtKind::Write {
                        value: self.parse_expr()?,
                        newline,
                    }
                };
                self.finish(start, kind)
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => {
                self.cursor.advance();
                let cond = self.parse_expr()?;
                let body = Box::new(self.parse_block()?);
                Ok(Stmt::new(
                    StmtKind::While { cond, body },
                    start.merge(self.cursor.previous_span()),
                ))
            }
            TokenKind::Fun => {
                self.cursor.advance();
                let name = self.parse_ident()?;
                self.cursor.expect(&TokenKind::LParen)?;
                let param = self.parse_ident()?;
                self.cursor.expect(&TokenKind::RParen)?;
                let body = Box::new(self.parse_block()?);
                Ok(Stmt::new(
                    StmtKind::Fun(FunDecl { name, param, body }),
                    start.merge(self.cursor.previous_span()),
                ))
            }
            TokenKind::Return => {
                self.cursor.advance();
                let value = self.parse_expr()?;
                self.finish(start, StmtKind::Return(value))
            }
            TokenKind::LBrace => self.parse_block(),
            _ => {
                let value = self.parse_expr()?;
                self.finish(start, StmtKind::Expr(value))
            }
        }
    }

    /// `if cond { ... } (else ({ ... } | if ...))?`
    fn parse_if(&mut self) -> Result<Stmt, Diagnostic> {
        let start = self.cursor.expect(&TokenKind::If)?;
        let cond = self.parse_expr()?;
        let then_branch = Box::new(self.parse_block()?);
        let else_branch = if self.cursor.eat(&TokenKind::Else) {
            let branch = if self.cursor.check(&TokenKind::If) {
                self.parse_if()?
            } else {
                self.parse_block()?
            };
            Some(Box::new(branch))
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            start.merge(self.cursor.previous_span()),
        ))
    }

    fn parse_block(&mut self) -> Result<Stmt, Diagnostic> {
        let open = self.cursor.current_span();
        self.cursor.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(unclosed_delimiter(open, self.cursor.current_span(), '{'));
            }
            stmts.push(self.parse_stmt()?);
        }
        let close = self.cursor.advance().span;
        Ok(Stmt::new(StmtKind::Block(stmts), open.merge(close)))
    }

    pub(crate) fn parse_ident(&mut self) -> Result<Ident, Diagnostic> {
        if let TokenKind::Ident(name) = self.cursor.current_kind() {
            let ident = Ident::new(name.clone(), self.cursor.current_span());
            self.cursor.advance();
            Ok(ident)
        } else {
            Err(expected_identifier(
                self.cursor.current_span(),
                &self.cursor.current_kind().to_string(),
            ))
        }
    }

    /// Bindings accept both `=` and `:=`.
    fn expect_binding_op(&mut self) -> Result<(), Diagnostic> {
        if self.cursor.eat(&TokenKind::Eq) || self.cursor.eat(&TokenKind::ColonEq) {
            Ok(())
        } else {
            Err(unexpected_token(
                self.cursor.current_span(),
                "`=` or `:=`",
                &self.cursor.current_kind().to_string(),
            ))
        }
    }

    /// Consume the terminating `;` and build the statement.
    fn finish(&mut self, start: Span, kind: StmtKind) -> Result<Stmt, Diagnostic> {
        let end = self.cursor.expect(&TokenKind::Semicolon)?;
        Ok(Stmt::new(kind, start.merge(end)))
    }
}
