//! Tree-walking evaluation.
//!
//! Errors never abort a run. Each one is recorded in the session, the first
//! is reported on the error stream as `ERROR: <message>`, and the failed
//! expression evaluates to `Value::Unset`.

use spl_ir::{Expr, ExprKind, FunDecl, FunctionId, LogicOp, Program, Stmt, StmtKind, Value};
use spl_stack::ensure_sufficient_stack;

use crate::environment::{AssignError, Environment};
use crate::errors::{EvalError, EvalResult};
use crate::input::InputHandler;
use crate::operators::{evaluate_arith, evaluate_compare};
use crate::print_handler::SharedPrintHandler;

/// How a statement finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Normal,
    Return(Value),
}

/// All state of one interpreter run.
pub struct EvalSession<'a> {
    env: Environment,
    /// Function table; `FunctionId` indexes into it.
    functions: Vec<&'a FunDecl>,
    /// Set once the first error has been reported.
    errored: bool,
    error_count: usize,
    print: SharedPrintHandler,
    input: InputHandler,
}

impl<'a> EvalSession<'a> {
    pub fn new(print: SharedPrintHandler, input: InputHandler) -> Self {
        EvalSession {
            env: Environment::new(),
            functions: Vec::new(),
            errored: false,
            error_count: 0,
            print,
            input,
        }
    }

    /// Whether any error has been raised so far.
    pub fn has_errored(&self) -> bool {
        self.errored
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Current binding of a global, for embedders and tests.
    pub fn global(&self, name: &str) -> Option<Value> {
        if self.env.in_function() {
            return None;
        }
        self.env.lookup(name)
    }

    /// Execute every top-level statement in order.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.body.len()))]
    pub fn run(&mut self, program: &'a Program) {
        self.exec_all(&program.body);
        tracing::debug!(errors = self.error_count, "run finished");
    }

    /// Record an error; report it if it is the first.
    fn raise(&mut self, err: &EvalError) {
        tracing::trace!(error = %err, "raised");
        self.error_count += 1;
        if !self.errored {
            self.errored = true;
            self.print.print_error(&format!("ERROR: {err}"));
        }
    }

    /// An unset operand after an earlier error is fallout from that error
    /// and is not reported again.
    fn is_fallout(&self, value: Value) -> bool {
        value.is_unset() && self.errored
    }

    /// Unwrap a result, raising the error and substituting `Unset`.
    fn settle(&mut self, result: EvalResult<Value>) -> Value {
        result.unwrap_or_else(|err| {
            self.raise(&err);
            Value::Unset
        })
    }

    fn exec_all(&mut self, stmts: &'a [Stmt]) -> Flow {
        for stmt in stmts {
            if let flow @ Flow::Return(_) = self.exec(stmt) {
                return flow;
            }
        }
        Flow::Normal
    }

    fn exec(&mut self, stmt: &'a Stmt) -> Flow {
        ensure_sufficient_stack(|| self.exec_inner(stmt))
    }

    fn exec_inner(&mut self, stmt: &'a Stmt) -> Flow {
        match &stmt.kind {
            StmtKind::Block(stmts) => self.exec_all(stmts),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => match self.condition(cond) {
                Some(true) => self.exec(then_branch),
                Some(false) => match else_branch {
                    Some(else_branch) => self.exec(else_branch),
                    None => Flow::Normal,
                },
                None => Flow::Normal,
            },
            StmtKind::While { cond, body } => {
                while let Some(true) = self.condition(cond) {
                    if let flow @ Flow::Return(_) = self.exec(body) {
                        return flow;
                    }
                }
                Flow::Normal
            }
            StmtKind::New { name, value } => {
                let value = self.eval(value);
                if self.env.is_visible(&name.name) {
                    self.raise(&EvalError::AlreadyBound(name.name.clone()));
                } else {
                    self.env.define(&name.name, value);
                }
                Flow::Normal
            }
            StmtKind::Assign { name, value } => {
                let value = self.eval(value);
                if let Err(AssignError::Undefined) = self.env.assign(&name.name, value) {
                    self.raise(&EvalError::NotYetBound(name.name.clone()));
                }
                Flow::Normal
            }
            StmtKind::Write { value, newline } => {
                let before = self.error_count;
                let value = self.eval(value);
                if self.error_count == before && !self.is_fallout(value) {
                    self.write(&value.to_string(), *newline);
                }
                Flow::Normal
            }
            StmtKind::WriteStr { text, newline } => {
                self.write(&text.value, *newline);
                Flow::Normal
            }
            StmtKind::Fun(decl) => {
                self.define_function(decl);
                Flow::Normal
            }
            StmtKind::Return(value) => {
                let value = self.eval(value);
                if self.env.in_function() {
                    Flow::Return(value)
                } else {
                    self.raise(&EvalError::ReturnOutsideFunction);
                    Flow::Normal
                }
            }
            StmtKind::Expr(value) => {
                self.eval(value);
                Flow::Normal
            }
        }
    }

    fn write(&self, text: &str, newline: bool) {
        if newline {
            self.print.print(&format!("{text}\n"));
        } else {
            self.print.print(text);
        }
    }

    fn define_function(&mut self, decl: &'a FunDecl) {
        let name = &decl.name.name;
        if self.env.in_function() {
            self.raise(&EvalError::NestedFunction(name.clone()));
            return;
        }
        if self.env.is_visible(name) {
            self.raise(&EvalError::AlreadyBound(name.clone()));
            return;
        }
        let Ok(index) = u32::try_from(self.functions.len()) else {
            return;
        };
        let id = FunctionId::new(index);
        self.functions.push(decl);
        self.env.define_global(name, Value::Function(id));
        tracing::trace!(function = %name, "defined");
    }

    /// Evaluate and coerce a condition. `None` if that raised an error.
    fn condition(&mut self, cond: &'a Expr) -> Option<bool> {
        let value = self.eval(cond);
        match value.coerce_to_boolean() {
            Ok(b) => Some(b),
            Err(err) => {
                if !self.is_fallout(value) {
                    self.raise(&err.into());
                }
                None
            }
        }
    }

    fn eval(&mut self, expr: &'a Expr) -> Value {
        ensure_sufficient_stack(|| self.eval_inner(expr))
    }

    fn eval_inner(&mut self, expr: &'a Expr) -> Value {
        match &expr.kind {
            ExprKind::Num(n) => Value::Number(*n),
            ExprKind::Bool(b) => Value::Boolean(*b),
            ExprKind::Ident(name) => match self.env.lookup(name) {
                Some(value) => value,
                None => {
                    self.raise(&EvalError::UnboundVariable(name.clone()));
                    Value::Unset
                }
            },
            ExprKind::Arith { op, left, right } => {
                let left = self.eval(left);
                let right = self.eval(right);
                if self.is_fallout(left) || self.is_fallout(right) {
                    return Value::Unset;
                }
                let result = evaluate_arith(*op, left, right);
                self.settle(result)
            }
            ExprKind::Compare { op, left, right } => {
                let left = self.eval(left);
                let right = self.eval(right);
                if self.is_fallout(left) || self.is_fallout(right) {
                    return Value::Unset;
                }
                let result = evaluate_compare(*op, left, right);
                self.settle(result)
            }
            ExprKind::Logic { op, left, right } => self.eval_logic(*op, left, right),
            ExprKind::Neg(operand) => {
                let value = self.eval(operand);
                if self.is_fallout(value) {
                    return Value::Unset;
                }
                let result = value
                    .as_number()
                    .map(|n| Value::Number(n.wrapping_neg()))
                    .map_err(EvalError::from);
                self.settle(result)
            }
            ExprKind::Not(operand) => {
                let value = self.eval(operand);
                if self.is_fallout(value) {
                    return Value::Unset;
                }
                let result = value
                    .coerce_to_boolean()
                    .map(|b| Value::Boolean(!b))
                    .map_err(EvalError::from);
                self.settle(result)
            }
            ExprKind::Read => {
                let result = self.input.read_int(&self.print).map(Value::Number);
                self.settle(result)
            }
            ExprKind::Call { callee, arg } => self.call(&callee.name, arg),
        }
    }

    /// Short-circuit: the right operand runs only if it decides the result.
    fn eval_logic(&mut self, op: LogicOp, left: &'a Expr, right: &'a Expr) -> Value {
        let Some(l) = self.operand_truth(left) else {
            return Value::Unset;
        };
        let decided = match op {
            LogicOp::And => !l,
            LogicOp::Or => l,
        };
        if decided {
            return Value::Boolean(l);
        }
        match self.operand_truth(right) {
            Some(r) => Value::Boolean(r),
            None => Value::Unset,
        }
    }

    fn operand_truth(&mut self, expr: &'a Expr) -> Option<bool> {
        let value = self.eval(expr);
        if self.is_fallout(value) {
            return None;
        }
        match value.coerce_to_boolean() {
            Ok(b) => Some(b),
            Err(err) => {
                self.raise(&err.into());
                None
            }
        }
    }

    fn call(&mut self, callee: &str, arg: &'a Expr) -> Value {
        let target = match self.env.lookup(callee) {
            Some(Value::Function(id)) => self.functions.get(id.index()).copied(),
            Some(_) => None,
            None => {
                self.raise(&EvalError::UnboundVariable(callee.to_string()));
                return Value::Unset;
            }
        };
        let Some(decl) = target else {
            self.raise(&EvalError::NotCallable(callee.to_string()));
            return Value::Unset;
        };

        let arg = self.eval(arg);
        tracing::trace!(function = %callee, depth = self.env.depth() + 1, "call");
        self.env.push_frame(&decl.param.name, arg);
        let flow = self.exec(&decl.body);
        self.env.pop_frame();
        match flow {
            Flow::Return(value) => value,
            Flow::Normal => Value::Unset,
        }
    }
}
