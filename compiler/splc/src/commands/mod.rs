//! Command handlers for the `splc` CLI.
//!
//! Each handler returns a [`DriverResult`]; diagnostics are printed to
//! stderr here and surface as [`DriverError::Reported`].

use std::io::IsTerminal;
use std::path::Path;

use spl_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use spl_diagnostic::Diagnostic;
use spl_ir::Program;

use crate::error::{DriverError, DriverResult};

mod build;
mod check;
mod dot;
mod run;

pub use build::build_file;
pub use check::check_file;
pub use dot::{dot_file, dot_path};
pub use run::run_file;

pub(crate) fn read_source(path: &Path) -> DriverResult<String> {
    std::fs::read_to_string(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_output(path: &Path, contents: &str) -> DriverResult<()> {
    std::fs::write(path, contents).map_err(|source| DriverError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Print `diagnostic` against `source` and turn it into a reported error.
pub(crate) fn report(
    path: &Path,
    source: &str,
    color: ColorMode,
    diagnostic: &Diagnostic,
) -> DriverError {
    let is_tty = std::io::stderr().is_terminal();
    let mut emitter =
        TerminalEmitter::stderr(color, is_tty).with_source(path.display().to_string(), source);
    emitter.emit(diagnostic);
    emitter.emit_summary(1);
    emitter.flush();
    DriverError::Reported { count: 1 }
}

pub(crate) fn parse_source(path: &Path, source: &str, color: ColorMode) -> DriverResult<Program> {
    spl_parse::parse(source).map_err(|diag| report(path, source, color, &diag))
}
