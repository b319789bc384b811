//! NASM serialisation of a populated [`CodegenContext`].

use std::fmt::{self, Write};

use crate::context::{CodegenContext, Scope};
use crate::error::{CodegenError, CodegenResult};
use crate::inst::{Inst, JumpTarget};

/// Externally linked runtime routines, in declaration order.
pub const RUNTIME_EXTERNS: [&str; 6] = ["exit", "write", "writestr", "writebool", "writelf", "read"];

impl CodegenContext {
    /// Render the whole program as a NASM listing.
    pub fn emit_assembly(&self) -> CodegenResult<String> {
        check_scope(self.root(), "_start")?;
        for f in self.functions() {
            check_scope(f, f.function.as_deref().unwrap_or_default())?;
        }

        let mut out = String::new();
        self.write_listing(&mut out)
            .map_err(|e| CodegenError::Internal(e.to_string()))?;
        tracing::debug!(
            functions = self.functions().count(),
            globals = self.root().slot_count(),
            literals = self.literals().len(),
            bytes = out.len(),
            "emitted assembly"
        );
        Ok(out)
    }

    fn write_listing(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "[BITS 32]")?;
        for name in RUNTIME_EXTERNS {
            writeln!(out, "extern {name}")?;
        }
        writeln!(out, "global _start")?;

        writeln!(out, "\nsection .rodata")?;
        for (i, text) in self.literals().iter().enumerate() {
            writeln!(out, "SPLLIT_{i}: db `{}\\0`", escape_nasm(text))?;
        }

        writeln!(out, "\nsection .bss")?;
        for name in self.root().identifiers() {
            writeln!(out, "SPL_{name}: resb 4")?;
        }

        writeln!(out, "\nsection .text")?;
        for f in self.functions() {
            let name = f.function.as_deref().unwrap_or_default();
            writeln!(out, "\nglobal ${name}")?;
            writeln!(out, "${name}:")?;
            write_code(out, f)?;
            writeln!(out, ".RET:")?;
            writeln!(out, "\tmov esp, ebp")?;
            writeln!(out, "\tpop ebp")?;
            writeln!(out, "\tret")?;
        }

        writeln!(out, "\n_start:")?;
        write_code(out, self.root())?;
        writeln!(out, "\txor eax, eax")?;
        writeln!(out, "\tcall exit")
    }
}

/// Instructions with their `.L<index>` markers; a marker at the end of the
/// buffer lands before whatever the caller appends.
fn write_code(out: &mut String, scope: &Scope) -> fmt::Result {
    for (i, inst) in scope.code.iter().enumerate() {
        if scope.labels.contains(&i) {
            writeln!(out, ".L{i}:")?;
        }
        writeln!(out, "\t{inst}")?;
    }
    if scope.labels.contains(&scope.code.len()) {
        writeln!(out, ".L{}:", scope.code.len())?;
    }
    Ok(())
}

fn check_scope(scope: &Scope, owner: &str) -> CodegenResult<()> {
    if scope.has_pending() {
        return Err(CodegenError::Internal(format!(
            "unpatched placeholder in `{owner}`"
        )));
    }
    if let Some(&last) = scope.labels.last() {
        if last > scope.code.len() {
            return Err(CodegenError::Internal(format!(
                "label .L{last} in `{owner}` is past the end of its code"
            )));
        }
    }
    for (i, inst) in scope.code.iter().enumerate() {
        if inst.is_placeholder() {
            return Err(CodegenError::Internal(format!(
                "instruction {i} in `{owner}` was never patched"
            )));
        }
        if let Inst::Jump(_, JumpTarget::Label(target)) = inst {
            if !scope.labels.contains(target) {
                return Err(CodegenError::Internal(format!(
                    "jump at {i} in `{owner}` targets .L{target}, which has no marker"
                )));
            }
        }
    }
    Ok(())
}

/// Escape `text` for a NASM backquoted string.
pub fn escape_nasm(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '`' => escaped.push_str("\\`"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            c if c.is_ascii_control() => escaped.push_str(&format!("\\x{:02X}", u32::from(c))),
            c => escaped.push(c),
        }
    }
    escaped
}
