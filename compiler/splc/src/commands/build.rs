//! The `build` command: compile an SPL program to NASM assembly.

use std::path::{Path, PathBuf};

use spl_codegen::asm_path;

use super::{parse_source, read_source, report, write_output};
use crate::error::DriverResult;
use crate::options::BuildOptions;

/// Compile `path` and write the listing. Returns the path written.
///
/// Nothing is written when parsing or code generation fails.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn build_file(path: &Path, options: &BuildOptions) -> DriverResult<PathBuf> {
    let source = read_source(path)?;
    let program = parse_source(path, &source, options.color)?;
    let asm = spl_codegen::compile(&program)
        .map_err(|err| report(path, &source, options.color, &err.to_diagnostic()))?;

    let output = options.output.clone().unwrap_or_else(|| asm_path(path));
    write_output(&output, &asm)?;
    tracing::debug!(output = %output.display(), bytes = asm.len(), "wrote assembly");
    Ok(output)
}
