//! Diagnostic emitters.
//!
//! Each emitter implements [`DiagnosticEmitter`]; the terminal emitter is the
//! only output format the driver needs.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

/// Trait for emitting diagnostics in various formats.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Close a run that reported `error_count` errors.
    fn emit_summary(&mut self, error_count: usize);
}
