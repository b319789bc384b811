//! The `check` command: run every static check without writing output.

use std::path::Path;

use spl_diagnostic::emitter::ColorMode;

use super::{parse_source, read_source, report};
use crate::error::DriverResult;

pub fn check_file(path: &Path, color: ColorMode) -> DriverResult<()> {
    let source = read_source(path)?;
    let program = parse_source(path, &source, color)?;
    spl_codegen::generate(&program)
        .and_then(|ctx| ctx.emit_assembly())
        .map_err(|err| report(path, &source, color, &err.to_diagnostic()))?;
    Ok(())
}
