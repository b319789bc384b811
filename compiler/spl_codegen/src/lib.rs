//! 32-bit NASM code generation for SPL.
//!
//! # Architecture
//!
//! ```text
//! Program (AST)
//!      ↓
//!   generate        (scope arena: per-scope instructions, labels, slots)
//!      ↓
//!  emit_assembly    (consistency checks + NASM text)
//! ```
//!
//! The generated program links against a small runtime providing `exit`,
//! `write`, `writestr`, `writebool`, `writelf` and `read`. Arguments and
//! results travel in `eax`.

mod context;
mod emit;
mod error;
mod inst;
mod lower;

use std::path::{Path, PathBuf};

pub use context::{CodegenContext, Scope, ScopeId};
pub use emit::{escape_nasm, RUNTIME_EXTERNS};
pub use error::{CodegenError, CodegenResult};
pub use inst::{Cond, Inst, JumpKind, JumpTarget, Location, Reg};
pub use lower::{generate, is_reserved_name};

use spl_ir::Program;

/// Generate and serialise `program` in one step.
pub fn compile(program: &Program) -> CodegenResult<String> {
    generate(program)?.emit_assembly()
}

/// Output file for a source path: `foo.spl` becomes `foo.asm`, anything
/// else gets `.asm` appended.
pub fn asm_path(source: &Path) -> PathBuf {
    if source.extension().is_some_and(|ext| ext == "spl") {
        source.with_extension("asm")
    } else {
        let mut name = source.as_os_str().to_os_string();
        name.push(".asm");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests;
