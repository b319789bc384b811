//! Lowering from the SPL AST to scoped instruction buffers.
//!
//! Expressions leave their result in `eax`. Binary operators park the left
//! operand on the stack while the right one is computed, then combine
//! `eax` (left) with `ebx` (right).

use spl_ir::{
    ArithOp, CompareOp, Expr, ExprKind, FunDecl, Ident, LogicOp, Program, Span, Stmt, StmtKind,
};
use spl_stack::ensure_sufficient_stack;

use crate::context::{CodegenContext, ScopeId};
use crate::emit::RUNTIME_EXTERNS;
use crate::error::{CodegenError, CodegenResult};
use crate::inst::{Cond, Inst, JumpKind, JumpTarget, Location, Reg};

/// Prefixes of generated data symbols.
const RESERVED_PREFIXES: &[&str] = &["SPL_", "SPLLIT_"];

/// Whether `name` would clash with a symbol in the generated assembly.
pub fn is_reserved_name(name: &str) -> bool {
    name == "_start"
        || RUNTIME_EXTERNS.contains(&name)
        || RESERVED_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Walk `program` and build the scope arena.
///
/// Stops at the first static violation.
#[tracing::instrument(level = "debug", skip_all, fields(statements = program.body.len()))]
pub fn generate(program: &Program) -> CodegenResult<CodegenContext> {
    let mut lowerer = Lowerer {
        ctx: CodegenContext::new(),
    };
    for stmt in &program.body {
        lowerer.stmt(ScopeId::ROOT, stmt)?;
    }
    Ok(lowerer.ctx)
}

struct Lowerer {
    ctx: CodegenContext,
}

impl Lowerer {
    fn emit(&mut self, scope: ScopeId, inst: Inst) {
        self.ctx.emit(scope, inst);
    }

    fn stmt(&mut self, scope: ScopeId, stmt: &Stmt) -> CodegenResult<()> {
        ensure_sufficient_stack(|| self.stmt_inner(scope, stmt))
    }

    fn stmt_inner(&mut self, scope: ScopeId, stmt: &Stmt) -> CodegenResult<()> {
        match &stmt.kind {
            StmtKind::Block(stmts) => {
                for s in stmts {
                    self.stmt(scope, s)?;
                }
                Ok(())
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.if_stmt(scope, cond, then_branch, else_branch.as_deref()),
            StmtKind::While { cond, body } => self.while_stmt(scope, cond, body),
            StmtKind::New { name, value } => {
                self.expr(scope, value)?;
                // Functions and variables share one namespace.
                if self.ctx.has_identifier(scope, &name.name) || self.ctx.has_function(&name.name) {
                    return Err(CodegenError::AlreadyBound {
                        name: name.name.clone(),
                        span: name.span,
                    });
                }
                let slot = self.ctx.add_identifier(scope, &name.name);
                let loc = if self.ctx.scope(scope).is_function() {
                    Location::Local(slot)
                } else {
                    Location::Global(name.name.clone())
                };
                self.emit(scope, Inst::Store(loc, Reg::Eax));
                Ok(())
            }
            StmtKind::Assign { name, value } => {
                self.expr(scope, value)?;
                let loc = self.ctx.resolve(scope, &name.name).ok_or_else(|| {
                    CodegenError::AssignToUnbound {
                        name: name.name.clone(),
                        span: name.span,
                    }
                })?;
                self.emit(scope, Inst::Store(loc, Reg::Eax));
                Ok(())
            }
            StmtKind::Write { value, newline } => {
                self.expr(scope, value)?;
                let routine = if value.is_statically_boolean() {
                    "writebool"
                } else {
                    "write"
                };
                self.emit(scope, Inst::Call(routine.to_string()));
                self.line_feed(scope, *newline);
                Ok(())
            }
            StmtKind::WriteStr { text, newline } => {
                let index = self.ctx.push_literal(&text.value);
                self.emit(scope, Inst::LeaLiteral(Reg::Eax, index));
                self.emit(scope, Inst::Call("writestr".to_string()));
                self.line_feed(scope, *newline);
                Ok(())
            }
            StmtKind::Fun(decl) => self.function(scope, decl),
            StmtKind::Return(value) => {
                if !self.ctx.scope(scope).is_function() {
                    return Err(CodegenError::ReturnOutsideFunction { span: stmt.span });
                }
                self.expr(scope, value)?;
                self.emit(scope, Inst::Jump(JumpKind::Jmp, JumpTarget::Return));
                Ok(())
            }
            StmtKind::Expr(value) => self.expr(scope, value),
        }
    }

    fn line_feed(&mut self, scope: ScopeId, newline: bool) {
        if newline {
            self.emit(scope, Inst::Call("writelf".to_string()));
        }
    }

    fn if_stmt(
        &mut self,
        scope: ScopeId,
        cond: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> CodegenResult<()> {
        self.expr(scope, cond)?;
        self.emit(scope, Inst::Test(Reg::Eax, Reg::Eax));
        let skip_then = self.ctx.emit_placeholder(scope, JumpKind::Jz);
        self.stmt(scope, then_branch)?;
        match else_branch {
            Some(else_branch) => {
                let skip_else = self.ctx.emit_placeholder(scope, JumpKind::Jmp);
                self.ctx.patch_jump_here(scope, skip_then)?;
                self.stmt(scope, else_branch)?;
                self.ctx.patch_jump_here(scope, skip_else)
            }
            None => self.ctx.patch_jump_here(scope, skip_then),
        }
    }

    /// The condition is tested after the body; entry jumps straight to it.
    fn while_stmt(&mut self, scope: ScopeId, cond: &Expr, body: &Stmt) -> CodegenResult<()> {
        let to_cond = self.ctx.emit_placeholder(scope, JumpKind::Jmp);
        let body_start = self.ctx.next_index(scope);
        self.stmt(scope, body)?;
        self.ctx.patch_jump_here(scope, to_cond)?;
        self.expr(scope, cond)?;
        self.emit(scope, Inst::Test(Reg::Eax, Reg::Eax));
        self.ctx.emit_jump_to(scope, JumpKind::Jnz, body_start);
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(name = %decl.name.name))]
    fn function(&mut self, scope: ScopeId, decl: &FunDecl) -> CodegenResult<()> {
        let Ident { name, span } = &decl.name;
        if scope != ScopeId::ROOT {
            return Err(CodegenError::NestedFunction {
                name: name.clone(),
                span: *span,
            });
        }
        if self.ctx.has_function(name) {
            return Err(CodegenError::FunctionRedefined {
                name: name.clone(),
                span: *span,
            });
        }
        if self.ctx.has_identifier(ScopeId::ROOT, name) {
            return Err(CodegenError::AlreadyBound {
                name: name.clone(),
                span: *span,
            });
        }
        if is_reserved_name(name) {
            return Err(CodegenError::ReservedFunctionName {
                name: name.clone(),
                span: *span,
            });
        }

        let f = self.ctx.add_function(name, &decl.param.name);
        self.emit(f, Inst::Push(Reg::Ebp));
        self.emit(f, Inst::MovReg(Reg::Ebp, Reg::Esp));
        self.emit(f, Inst::Push(Reg::Eax));
        let frame = self.ctx.emit_frame_placeholder(f);

        self.stmt(f, &decl.body)?;

        let bytes = self.ctx.patch_frame(f, frame)?;
        tracing::debug!(
            frame_bytes = bytes,
            instructions = self.ctx.scope(f).code.len(),
            "generated function"
        );
        Ok(())
    }

    fn expr(&mut self, scope: ScopeId, expr: &Expr) -> CodegenResult<()> {
        ensure_sufficient_stack(|| self.expr_inner(scope, expr))
    }

    fn expr_inner(&mut self, scope: ScopeId, expr: &Expr) -> CodegenResult<()> {
        match &expr.kind {
            ExprKind::Num(n) => self.emit(scope, Inst::MovImm(Reg::Eax, *n)),
            ExprKind::Bool(b) => self.emit(scope, Inst::MovImm(Reg::Eax, i32::from(*b))),
            ExprKind::Ident(name) => {
                let loc = self.lookup(scope, name, expr.span)?;
                self.emit(scope, Inst::Load(Reg::Eax, loc));
            }
            ExprKind::Arith { op, left, right } => {
                self.operands(scope, left, right)?;
                for inst in arith_insts(*op) {
                    self.emit(scope, inst);
                }
            }
            ExprKind::Compare { op, left, right } => {
                self.operands(scope, left, right)?;
                self.emit(scope, Inst::Xor(Reg::Ecx, Reg::Ecx));
                self.emit(scope, Inst::Cmp(Reg::Eax, Reg::Ebx));
                self.emit(scope, Inst::SetCl(compare_cond(*op)));
                self.emit(scope, Inst::MovReg(Reg::Eax, Reg::Ecx));
            }
            ExprKind::Logic { op, left, right } => self.logic(scope, *op, left, right)?,
            ExprKind::Neg(operand) => {
                self.expr(scope, operand)?;
                self.emit(scope, Inst::Neg(Reg::Eax));
            }
            ExprKind::Not(operand) => {
                self.expr(scope, operand)?;
                self.emit(scope, Inst::Neg(Reg::Eax));
                self.emit(scope, Inst::Sbb(Reg::Eax, Reg::Eax));
                self.emit(scope, Inst::Inc(Reg::Eax));
            }
            ExprKind::Read => self.emit(scope, Inst::Call("read".to_string())),
            ExprKind::Call { callee, arg } => {
                if !self.ctx.has_function(&callee.name) {
                    return Err(CodegenError::UndeclaredFunction {
                        name: callee.name.clone(),
                        span: callee.span,
                    });
                }
                self.expr(scope, arg)?;
                self.emit(scope, Inst::CallFunction(callee.name.clone()));
            }
        }
        Ok(())
    }

    fn lookup(&self, scope: ScopeId, name: &str, span: Span) -> CodegenResult<Location> {
        self.ctx
            .resolve(scope, name)
            .ok_or_else(|| CodegenError::UndefinedIdentifier {
                name: name.to_string(),
                span,
            })
    }

    /// Leave `left` in `eax` and `right` in `ebx`.
    fn operands(&mut self, scope: ScopeId, left: &Expr, right: &Expr) -> CodegenResult<()> {
        self.expr(scope, left)?;
        self.emit(scope, Inst::Push(Reg::Eax));
        self.expr(scope, right)?;
        self.emit(scope, Inst::MovReg(Reg::Ebx, Reg::Eax));
        self.emit(scope, Inst::Pop(Reg::Eax));
        Ok(())
    }

    /// Short-circuit, then normalise the result to 0 or 1.
    fn logic(&mut self, scope: ScopeId, op: LogicOp, left: &Expr, right: &Expr) -> CodegenResult<()> {
        self.expr(scope, left)?;
        self.emit(scope, Inst::Test(Reg::Eax, Reg::Eax));
        let kind = match op {
            LogicOp::And => JumpKind::Jz,
            LogicOp::Or => JumpKind::Jnz,
        };
        let short_circuit = self.ctx.emit_placeholder(scope, kind);
        self.expr(scope, right)?;
        self.ctx.patch_jump_here(scope, short_circuit)?;
        self.emit(scope, Inst::Neg(Reg::Eax));
        self.emit(scope, Inst::Sbb(Reg::Eax, Reg::Eax));
        self.emit(scope, Inst::Neg(Reg::Eax));
        Ok(())
    }
}

fn arith_insts(op: ArithOp) -> Vec<Inst> {
    match op {
        ArithOp::Add => vec![Inst::Add(Reg::Eax, Reg::Ebx)],
        ArithOp::Sub => vec![Inst::Sub(Reg::Eax, Reg::Ebx)],
        ArithOp::Mul => vec![Inst::Imul(Reg::Ebx)],
        ArithOp::Div => vec![Inst::Cdq, Inst::Idiv(Reg::Ebx)],
        ArithOp::Mod => vec![Inst::Cdq, Inst::Idiv(Reg::Ebx), Inst::MovReg(Reg::Eax, Reg::Edx)],
    }
}

fn compare_cond(op: CompareOp) -> Cond {
    match op {
        CompareOp::Lt => Cond::L,
        CompareOp::Gt => Cond::G,
        CompareOp::Le => Cond::Le,
        CompareOp::Ge => Cond::Ge,
        CompareOp::Eq => Cond::E,
        CompareOp::Ne => Cond::Ne,
    }
}
