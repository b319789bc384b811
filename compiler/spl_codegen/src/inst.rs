//! Instruction model for the 32-bit x86 subset the backend emits.
//!
//! Each [`Inst`] renders as one line of NASM. Jump targets and the frame
//! size may be left open while generating and patched once known.

use std::fmt;

/// General-purpose 32-bit registers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Reg {
    Eax,
    Ebx,
    Ecx,
    Edx,
    Esp,
    Ebp,
}

impl Reg {
    pub const fn name(self) -> &'static str {
        match self {
            Reg::Eax => "eax",
            Reg::Ebx => "ebx",
            Reg::Ecx => "ecx",
            Reg::Edx => "edx",
            Reg::Esp => "esp",
            Reg::Ebp => "ebp",
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage of one SPL variable.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Location {
    /// Root binding, a 4-byte cell `SPL_<name>` in `.bss`.
    Global(String),
    /// Function binding at `[ebp - 4 * (slot + 1)]`; slot 0 is the parameter.
    Local(u32),
}

impl Location {
    /// Byte offset below `ebp` of a local slot.
    pub const fn frame_offset(slot: u32) -> u32 {
        4 * (slot + 1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Global(name) => write!(f, "[SPL_{name}]"),
            Location::Local(slot) => write!(f, "[ebp - {}]", Location::frame_offset(*slot)),
        }
    }
}

/// Condition codes used by `set<cc>`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cond {
    L,
    G,
    Le,
    Ge,
    E,
    Ne,
}

impl Cond {
    pub const fn suffix(self) -> &'static str {
        match self {
            Cond::L => "l",
            Cond::G => "g",
            Cond::Le => "le",
            Cond::Ge => "ge",
            Cond::E => "e",
            Cond::Ne => "ne",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum JumpKind {
    Jmp,
    /// Jump if zero.
    Jz,
    /// Jump if not zero.
    Jnz,
}

impl JumpKind {
    pub const fn mnemonic(self) -> &'static str {
        match self {
            JumpKind::Jmp => "jmp",
            JumpKind::Jz => "jz",
            JumpKind::Jnz => "jnz",
        }
    }
}

/// Where a jump goes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum JumpTarget {
    /// Not known yet; must be patched before emission.
    Pending,
    /// The instruction at this index in the same scope (`.L<index>`).
    Label(usize),
    /// The shared function epilogue (`.RET`).
    Return,
}

/// One emitted instruction.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Inst {
    /// `mov r, imm`
    MovImm(Reg, i32),
    /// `mov dst, src`
    MovReg(Reg, Reg),
    /// `mov r, [loc]`
    Load(Reg, Location),
    /// `mov [loc], r`
    Store(Location, Reg),
    Push(Reg),
    Pop(Reg),
    Add(Reg, Reg),
    Sub(Reg, Reg),
    /// `imul r`: `edx:eax = eax * r`
    Imul(Reg),
    /// Sign-extend `eax` into `edx`.
    Cdq,
    /// `idiv r`: quotient in `eax`, remainder in `edx`
    Idiv(Reg),
    Xor(Reg, Reg),
    Cmp(Reg, Reg),
    Test(Reg, Reg),
    /// `set<cc> cl`
    SetCl(Cond),
    Neg(Reg),
    Sbb(Reg, Reg),
    Inc(Reg),
    Jump(JumpKind, JumpTarget),
    /// `call <routine>` into the runtime.
    Call(String),
    /// `call $<name>`; user symbols are `$`-escaped so a name such as
    /// `add` or `eax` is never read as a mnemonic or register.
    CallFunction(String),
    /// `lea r, [SPLLIT_<index>]`
    LeaLiteral(Reg, usize),
    /// `sub esp, <bytes>`; `None` until the frame size is known.
    ReserveFrame(Option<u32>),
}

impl Inst {
    /// Whether this instruction still waits for a patch.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            Inst::Jump(_, JumpTarget::Pending) | Inst::ReserveFrame(None)
        )
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::MovImm(r, n) => write!(f, "mov {r}, {n}"),
            Inst::MovReg(dst, src) => write!(f, "mov {dst}, {src}"),
            Inst::Load(r, loc) => write!(f, "mov {r}, {loc}"),
            Inst::Store(loc, r) => write!(f, "mov {loc}, {r}"),
            Inst::Push(r) => write!(f, "push {r}"),
            Inst::Pop(r) => write!(f, "pop {r}"),
            Inst::Add(a, b) => write!(f, "add {a}, {b}"),
            Inst::Sub(a, b) => write!(f, "sub {a}, {b}"),
            Inst::Imul(r) => write!(f, "imul {r}"),
            Inst::Cdq => f.write_str("cdq"),
            Inst::Idiv(r) => write!(f, "idiv {r}"),
            Inst::Xor(a, b) => write!(f, "xor {a}, {b}"),
            Inst::Cmp(a, b) => write!(f, "cmp {a}, {b}"),
            Inst::Test(a, b) => write!(f, "test {a}, {b}"),
            Inst::SetCl(cond) => write!(f, "set{} cl", cond.suffix()),
            Inst::Neg(r) => write!(f, "neg {r}"),
            Inst::Sbb(a, b) => write!(f, "sbb {a}, {b}"),
            Inst::Inc(r) => write!(f, "inc {r}"),
            Inst::Jump(kind, target) => {
                write!(f, "{} ", kind.mnemonic())?;
                match target {
                    JumpTarget::Pending => f.write_str("<pending>"),
                    JumpTarget::Label(index) => write!(f, ".L{index}"),
                    JumpTarget::Return => f.write_str(".RET"),
                }
            }
            Inst::Call(name) => write!(f, "call {name}"),
            Inst::CallFunction(name) => write!(f, "call ${name}"),
            Inst::LeaLiteral(r, index) => write!(f, "lea {r}, [SPLLIT_{index}]"),
            Inst::ReserveFrame(Some(bytes)) => write!(f, "sub esp, {bytes}"),
            Inst::ReserveFrame(None) => f.write_str("sub esp, <pending>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_locations() {
        assert_eq!(Location::Global("x".into()).to_string(), "[SPL_x]");
        assert_eq!(Location::Local(0).to_string(), "[ebp - 4]");
        assert_eq!(Location::Local(2).to_string(), "[ebp - 12]");
    }

    #[test]
    fn test_rendering() {
        let cases = [
            (Inst::MovImm(Reg::Eax, -5), "mov eax, -5"),
            (Inst::Load(Reg::Eax, Location::Local(1)), "mov eax, [ebp - 8]"),
            (Inst::Store(Location::Global("n".into()), Reg::Eax), "mov [SPL_n], eax"),
            (Inst::SetCl(Cond::Le), "setle cl"),
            (Inst::Jump(JumpKind::Jz, JumpTarget::Label(7)), "jz .L7"),
            (Inst::Jump(JumpKind::Jmp, JumpTarget::Return), "jmp .RET"),
            (Inst::LeaLiteral(Reg::Eax, 2), "lea eax, [SPLLIT_2]"),
            (Inst::Call("writelf".into()), "call writelf"),
            (Inst::CallFunction("add".into()), "call $add"),
            (Inst::ReserveFrame(Some(8)), "sub esp, 8"),
        ];
        for (inst, text) in cases {
            assert_eq!(inst.to_string(), text);
        }
    }

    #[test]
    fn test_placeholders() {
        assert!(Inst::Jump(JumpKind::Jmp, JumpTarget::Pending).is_placeholder());
        assert!(Inst::ReserveFrame(None).is_placeholder());
        assert!(!Inst::Jump(JumpKind::Jmp, JumpTarget::Return).is_placeholder());
        assert!(!Inst::ReserveFrame(Some(0)).is_placeholder());
    }
}
