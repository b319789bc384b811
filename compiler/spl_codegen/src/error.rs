//! Code generation errors.
//!
//! Every static violation aborts generation. The driver turns the error into
//! a [`Diagnostic`] and writes no output file.

use spl_diagnostic::{Diagnostic, ErrorCode};
use spl_ir::Span;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    #[error("undefined identifier `{name}`")]
    UndefinedIdentifier { name: String, span: Span },
    #[error("variable `{name}` is already bound")]
    AlreadyBound { name: String, span: Span },
    #[error("can't assign to `{name}`; not yet bound")]
    AssignToUnbound { name: String, span: Span },
    #[error("function `{name}` is declared inside another function")]
    NestedFunction { name: String, span: Span },
    #[error("function `{name}` is already defined")]
    FunctionRedefined { name: String, span: Span },
    #[error("`return` outside of a function")]
    ReturnOutsideFunction { span: Span },
    #[error("call to undeclared function `{name}`")]
    UndeclaredFunction { name: String, span: Span },
    #[error("`{name}` is reserved and cannot name a function")]
    ReservedFunctionName { name: String, span: Span },
    /// Broken backend invariant; never caused by the input program.
    #[error("internal code generation error: {0}")]
    Internal(String),
}

impl CodegenError {
    pub fn span(&self) -> Span {
        match self {
            CodegenError::UndefinedIdentifier { span, .. }
            | CodegenError::AlreadyBound { span, .. }
            | CodegenError::AssignToUnbound { span, .. }
            | CodegenError::NestedFunction { span, .. }
            | CodegenError::FunctionRedefined { span, .. }
            | CodegenError::ReturnOutsideFunction { span }
            | CodegenError::UndeclaredFunction { span, .. }
            | CodegenError::ReservedFunctionName { span, .. } => *span,
            CodegenError::Internal(_) => Span::DUMMY,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CodegenError::UndefinedIdentifier { .. } => ErrorCode::E2001,
            CodegenError::AlreadyBound { .. } => ErrorCode::E2002,
            CodegenError::AssignToUnbound { .. } => ErrorCode::E2003,
            CodegenError::NestedFunction { .. } => ErrorCode::E2004,
            CodegenError::FunctionRedefined { .. } => ErrorCode::E2005,
            CodegenError::ReturnOutsideFunction { .. } => ErrorCode::E2006,
            CodegenError::UndeclaredFunction { .. } => ErrorCode::E2007,
            CodegenError::ReservedFunctionName { .. } => ErrorCode::E2008,
            CodegenError::Internal(_) => ErrorCode::E9001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::new(self.code(), self.to_string());
        match self {
            CodegenError::UndefinedIdentifier { span, .. } => {
                diag.with_label(*span, "not found in this scope")
            }
            CodegenError::AlreadyBound { span, .. } => diag
                .with_label(*span, "bound again here")
                .with_suggestion("use `=` to assign to an existing variable"),
            CodegenError::AssignToUnbound { span, .. } => diag
                .with_label(*span, "assigned here")
                .with_suggestion("declare it first with `new`"),
            CodegenError::NestedFunction { span, .. } => diag
                .with_label(*span, "nested declaration")
                .with_note("functions may only be declared at the top level"),
            CodegenError::FunctionRedefined { span, .. } => {
                diag.with_label(*span, "defined again here")
            }
            CodegenError::ReturnOutsideFunction { span } => {
                diag.with_label(*span, "not inside a function body")
            }
            CodegenError::UndeclaredFunction { span, .. } => diag
                .with_label(*span, "called here")
                .with_note("functions must be declared before they are called"),
            CodegenError::ReservedFunctionName { span, .. } => diag
                .with_label(*span, "reserved name")
                .with_note("runtime routines and generated symbols cannot be redefined"),
            CodegenError::Internal(_) => diag.with_note("this is a bug in the compiler"),
        }
    }
}

pub type CodegenResult<T> = Result<T, CodegenError>;
