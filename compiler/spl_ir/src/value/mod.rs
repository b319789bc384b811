//! Runtime values shared by the interpreter and the code generator.
//!
//! `Value` is a closed tagged union. `Unset` is both the default and the
//! sentinel produced after an error; it is never silently read as zero.

use std::fmt;

/// Handle to a function definition, indexing the interpreter's function
/// table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionId(u32);

impl FunctionId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        FunctionId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The discriminant of a [`Value`], used in type errors.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ValueTag {
    Number,
    Boolean,
    Function,
    Unset,
}

impl ValueTag {
    pub const fn name(self) -> &'static str {
        match self {
            ValueTag::Number => "number",
            ValueTag::Boolean => "boolean",
            ValueTag::Function => "function",
            ValueTag::Unset => "unset",
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value of the wrong type was used where another was required.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("type mismatch: expected {expected}, found {found}")]
pub struct TypeMismatch {
    pub expected: ValueTag,
    pub found: ValueTag,
}

/// Runtime value.
///
/// Equality compares the tag first, then the payload. Values with different
/// tags are simply unequal; two `Unset` values are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Value {
    Number(i32),
    Boolean(bool),
    Function(FunctionId),
    #[default]
    Unset,
}

impl Value {
    pub const fn tag(self) -> ValueTag {
        match self {
            Value::Number(_) => ValueTag::Number,
            Value::Boolean(_) => ValueTag::Boolean,
            Value::Function(_) => ValueTag::Function,
            Value::Unset => ValueTag::Unset,
        }
    }

    pub const fn is_unset(self) -> bool {
        matches!(self, Value::Unset)
    }

    fn mismatch(self, expected: ValueTag) -> TypeMismatch {
        TypeMismatch {
            expected,
            found: self.tag(),
        }
    }

    pub fn as_number(self) -> Result<i32, TypeMismatch> {
        match self {
            Value::Number(n) => Ok(n),
            other => Err(other.mismatch(ValueTag::Number)),
        }
    }

    pub fn as_boolean(self) -> Result<bool, TypeMismatch> {
        match self {
            Value::Boolean(b) => Ok(b),
            other => Err(other.mismatch(ValueTag::Boolean)),
        }
    }

    pub fn as_function(self) -> Result<FunctionId, TypeMismatch> {
        match self {
            Value::Function(id) => Ok(id),
            other => Err(other.mismatch(ValueTag::Function)),
        }
    }

    /// Truthiness for conditions and logic operators.
    ///
    /// Numbers are true when nonzero. Functions and unset values cannot be
    /// used as conditions.
    pub fn coerce_to_boolean(self) -> Result<bool, TypeMismatch> {
        match self {
            Value::Number(n) => Ok(n != 0),
            Value::Boolean(b) => Ok(b),
            other => Err(other.mismatch(ValueTag::Boolean)),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<FunctionId> for Value {
    fn from(id: FunctionId) -> Self {
        Value::Function(id)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Function(_) => f.write_str("<function>"),
            Value::Unset => f.write_str("UNSET"),
        }
    }
}

#[cfg(test)]
mod tests;
