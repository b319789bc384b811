//! The `run` command: interpret an SPL program.

use std::io::IsTerminal;
use std::path::Path;

use spl_eval::{stdout_handler, InputHandler};

use super::{parse_source, read_source};
use crate::error::{DriverError, DriverResult};
use crate::options::RunOptions;

/// Interpret `path`, reading program input from stdin.
///
/// Runtime errors are printed as they happen; the first one is shown and
/// the run fails if any were raised.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn run_file(path: &Path, options: &RunOptions) -> DriverResult<()> {
    let source = read_source(path)?;
    let program = parse_source(path, &source, options.color)?;
    let prompt = options
        .prompt
        .unwrap_or_else(|| std::io::stdin().is_terminal());
    let count = spl_eval::run_program(&program, stdout_handler(), InputHandler::stdin(prompt));
    if count > 0 {
        return Err(DriverError::Reported { count });
    }
    Ok(())
}
