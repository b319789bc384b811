//! Code generation context and scope arena.
//!
//! Scopes live in one arena indexed by [`ScopeId`]. The root (global) scope
//! is always index 0; each function gets one child scope whose parent is the
//! root. Function scopes never nest.
//!
//! Forward jumps are emitted as placeholders and patched once the target
//! index is known. Every patch and every backward jump records a label
//! marker at its target, so emission knows where to print `.L<index>`.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{CodegenError, CodegenResult};
use crate::inst::{Inst, JumpKind, JumpTarget, Location};

/// Index of a scope in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScopeId(u32);

impl ScopeId {
    /// The global scope.
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One lexical scope: the program root or a single function body.
#[derive(Debug, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    /// Set for function scopes only.
    pub function: Option<String>,
    /// Name to slot; slots are assigned 0, 1, 2, ... in insertion order.
    identifiers: FxHashMap<String, u32>,
    /// Names in slot order.
    slots: Vec<String>,
    pub code: Vec<Inst>,
    /// Function scopes defined under this one, in definition order.
    pub children: Vec<ScopeId>,
    /// Instruction indices that need a `.L<index>` marker.
    pub labels: BTreeSet<usize>,
    /// Placeholders awaiting a patch.
    pending: FxHashSet<usize>,
}

impl Scope {
    /// Names bound in this scope, in slot order.
    pub fn identifiers(&self) -> &[String] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_function(&self) -> bool {
        self.function.is_some()
    }
}

/// Code generation context.
///
/// Owns the scope arena and the literal pool.
#[derive(Debug)]
pub struct CodegenContext {
    scopes: Vec<Scope>,
    /// String literals in first-use order; entry `i` is `SPLLIT_<i>`.
    literals: Vec<String>,
}

impl Default for CodegenContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CodegenContext {
    pub fn new() -> Self {
        CodegenContext {
            scopes: vec![Scope::default()],
            literals: Vec::new(),
        }
    }

    #[inline]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    #[inline]
    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.index()]
    }

    pub fn root(&self) -> &Scope {
        self.scope(ScopeId::ROOT)
    }

    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// Function scopes in definition order.
    pub fn functions(&self) -> impl Iterator<Item = &Scope> {
        self.root().children.iter().map(|id| self.scope(*id))
    }

    // Identifiers

    /// Whether `name` is visible from `scope`, walking up to the root.
    pub fn has_identifier(&self, scope: ScopeId, name: &str) -> bool {
        self.resolve(scope, name).is_some()
    }

    /// Storage for `name` as seen from `scope`.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<Location> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(&slot) = s.identifiers.get(name) {
                return Some(if s.is_function() {
                    Location::Local(slot)
                } else {
                    Location::Global(name.to_string())
                });
            }
            current = s.parent;
        }
        None
    }

    /// Bind `name` in `scope` and return its slot. Rebinding an existing
    /// name in the same scope returns the existing slot.
    pub fn add_identifier(&mut self, scope: ScopeId, name: &str) -> u32 {
        let s = self.scope_mut(scope);
        if let Some(&slot) = s.identifiers.get(name) {
            return slot;
        }
        let slot = u32::try_from(s.slots.len()).unwrap_or(u32::MAX);
        s.identifiers.insert(name.to_string(), slot);
        s.slots.push(name.to_string());
        slot
    }

    // Functions

    /// Whether a function called `name` has been defined.
    pub fn has_function(&self, name: &str) -> bool {
        self.functions().any(|s| s.function.as_deref() == Some(name))
    }

    /// Create the scope for function `name` with `param` in slot 0.
    ///
    /// The scope is registered under the root before its body is generated,
    /// so the body may call the function recursively.
    pub fn add_function(&mut self, name: &str, param: &str) -> ScopeId {
        let id = ScopeId(u32::try_from(self.scopes.len()).unwrap_or(u32::MAX));
        self.scopes.push(Scope {
            parent: Some(ScopeId::ROOT),
            function: Some(name.to_string()),
            ..Scope::default()
        });
        self.add_identifier(id, param);
        self.scope_mut(ScopeId::ROOT).children.push(id);
        id
    }

    // Instructions

    /// Append an instruction and return its index.
    pub fn emit(&mut self, scope: ScopeId, inst: Inst) -> usize {
        let code = &mut self.scope_mut(scope).code;
        code.push(inst);
        code.len() - 1
    }

    /// Index the next emitted instruction will get.
    pub fn next_index(&self, scope: ScopeId) -> usize {
        self.scope(scope).code.len()
    }

    /// Emit a jump whose target is not known yet.
    pub fn emit_placeholder(&mut self, scope: ScopeId, kind: JumpKind) -> usize {
        let index = self.emit(scope, Inst::Jump(kind, JumpTarget::Pending));
        self.scope_mut(scope).pending.insert(index);
        index
    }

    /// Point the placeholder at `index` to instruction `target`.
    pub fn patch_jump(&mut self, scope: ScopeId, index: usize, target: usize) -> CodegenResult<()> {
        let s = self.scope_mut(scope);
        if !s.pending.remove(&index) {
            return Err(CodegenError::Internal(format!(
                "instruction {index} is not a pending jump"
            )));
        }
        match s.code.get_mut(index) {
            Some(Inst::Jump(_, slot @ JumpTarget::Pending)) => *slot = JumpTarget::Label(target),
            other => {
                return Err(CodegenError::Internal(format!(
                    "instruction {index} is not a jump placeholder: {other:?}"
                )));
            }
        }
        s.labels.insert(target);
        tracing::trace!(scope = scope.index(), index, target, "patched jump");
        Ok(())
    }

    /// Point the placeholder at `index` to the next instruction.
    pub fn patch_jump_here(&mut self, scope: ScopeId, index: usize) -> CodegenResult<()> {
        let here = self.next_index(scope);
        self.patch_jump(scope, index, here)
    }

    /// Emit a jump to an already emitted instruction.
    pub fn emit_jump_to(&mut self, scope: ScopeId, kind: JumpKind, target: usize) -> usize {
        self.scope_mut(scope).labels.insert(target);
        tracing::trace!(scope = scope.index(), target, "label marker");
        self.emit(scope, Inst::Jump(kind, JumpTarget::Label(target)))
    }

    /// Emit `sub esp, <pending>` for the function prologue.
    pub fn emit_frame_placeholder(&mut self, scope: ScopeId) -> usize {
        let index = self.emit(scope, Inst::ReserveFrame(None));
        self.scope_mut(scope).pending.insert(index);
        index
    }

    /// Fill in the frame size: every slot except the parameter, which the
    /// prologue already pushed.
    pub fn patch_frame(&mut self, scope: ScopeId, index: usize) -> CodegenResult<u32> {
        let s = self.scope_mut(scope);
        let locals = u32::try_from(s.slots.len().saturating_sub(1))
            .map_err(|_| CodegenError::Internal("too many locals".to_string()))?;
        let bytes = 4 * locals;
        if !s.pending.remove(&index) {
            return Err(CodegenError::Internal(format!(
                "instruction {index} is not a pending frame reservation"
            )));
        }
        match s.code.get_mut(index) {
            Some(slot @ Inst::ReserveFrame(None)) => *slot = Inst::ReserveFrame(Some(bytes)),
            other => {
                return Err(CodegenError::Internal(format!(
                    "instruction {index} is not a frame placeholder: {other:?}"
                )));
            }
        }
        Ok(bytes)
    }

    // Literals

    /// Add a string to the pool and return its index. Repeats are not merged.
    pub fn push_literal(&mut self, text: &str) -> usize {
        self.literals.push(text.to_string());
        self.literals.len() - 1
    }
}
