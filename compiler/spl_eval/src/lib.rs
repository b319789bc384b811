//! Tree-walking interpreter for SPL.
//!
//! State lives in an explicit [`EvalSession`]; nothing is process-global.
//! Output goes through a [`PrintHandlerImpl`] and `read` draws from an
//! [`InputHandler`], so runs can be captured in tests.

mod environment;
mod errors;
mod input;
mod interpreter;
mod operators;
mod print_handler;

pub use environment::{AssignError, Environment};
pub use errors::{EvalError, EvalResult};
pub use input::InputHandler;
pub use interpreter::EvalSession;
pub use operators::{evaluate_arith, evaluate_compare};
pub use print_handler::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl, SharedPrintHandler,
    StdoutPrintHandler,
};

use spl_ir::Program;

/// Interpret `program` to completion and return the number of errors raised.
pub fn run_program(program: &Program, print: SharedPrintHandler, input: InputHandler) -> usize {
    let mut session = EvalSession::new(print, input);
    session.run(program);
    session.error_count()
}
