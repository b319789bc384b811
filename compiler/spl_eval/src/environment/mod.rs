//! Variable bindings for the interpreter.
//!
//! Two levels only: the global table and, while a function runs, the call
//! frame of that function. Lookup sees the innermost frame, then globals.
//! Frames of callers are not visible to callees.

use rustc_hash::FxHashMap;

use spl_ir::Value;

/// Error returned by [`Environment::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// Variable not found in any visible scope.
    Undefined,
}

/// Bindings of one scope.
#[derive(Default, Debug)]
struct Frame {
    bindings: FxHashMap<String, Value>,
}

/// Environment for the interpreter using a frame stack.
#[derive(Default, Debug)]
pub struct Environment {
    globals: Frame,
    frames: Vec<Frame>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active call frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn in_function(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Enter a function: push a frame holding only its parameter.
    pub fn push_frame(&mut self, param: &str, arg: Value) {
        let mut frame = Frame::default();
        frame.bindings.insert(param.to_string(), arg);
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    fn current(&self) -> &Frame {
        self.frames.last().unwrap_or(&self.globals)
    }

    fn current_mut(&mut self) -> &mut Frame {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.globals,
        }
    }

    /// Look up a variable by name.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.current()
            .bindings
            .get(name)
            .or_else(|| self.globals.bindings.get(name))
            .copied()
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Bind a variable in the innermost scope, replacing any binding there.
    pub fn define(&mut self, name: &str, value: Value) {
        self.current_mut().bindings.insert(name.to_string(), value);
    }

    /// Bind a variable in the global scope.
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.globals.bindings.insert(name.to_string(), value);
    }

    /// Rebind an existing variable where it is found.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        if let Some(slot) = self.current_mut().bindings.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match self.globals.bindings.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(AssignError::Undefined),
        }
    }
}
