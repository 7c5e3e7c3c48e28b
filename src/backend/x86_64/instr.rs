//! x86-64 Instruction Definitions
//!
//! The subset of instructions the code generator emits, rendered in NASM
//! Intel syntax through `Display`.

use super::regs::{GpRegister, SizedRegister, Width};
use std::fmt;

/// Condition codes for `jcc` and `setcc`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Equal (ZF=1)
    E,
    /// Not Equal (ZF=0)
    Ne,
    /// Less Than (SF!=OF)
    L,
    /// Less or Equal (ZF=1 or SF!=OF)
    Le,
    /// Greater Than (ZF=0 and SF=OF)
    G,
    /// Greater or Equal (SF=OF)
    Ge,
}

impl Condition {
    /// Source-level comparison operator for this condition.
    pub fn symbol(self) -> &'static str {
        match self {
            Condition::E => "==",
            Condition::Ne => "!=",
            Condition::L => "<",
            Condition::Le => "<=",
            Condition::G => ">",
            Condition::Ge => ">=",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::E => "e",
            Condition::Ne => "ne",
            Condition::L => "l",
            Condition::Le => "le",
            Condition::G => "g",
            Condition::Ge => "ge",
        };
        write!(f, "{}", name)
    }
}

/// Memory operand `[base+disp]`, optionally carrying a size keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemOperand {
    pub base: GpRegister,
    pub disp: i64,
    pub width: Option<Width>,
}

impl MemOperand {
    pub fn base_disp(base: GpRegister, disp: i64) -> Self {
        Self {
            base,
            disp,
            width: None,
        }
    }

    /// `[rbp-offset]`
    pub fn frame_slot(offset: u32) -> Self {
        Self::base_disp(GpRegister::BASE_PTR, -i64::from(offset))
    }

    pub fn with_width(self, width: Width) -> Self {
        Self {
            width: Some(width),
            ..self
        }
    }
}

impl fmt::Display for MemOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(width) = self.width {
            write!(f, "{} ", width)?;
        }
        write!(f, "[{}", self.base)?;
        if self.disp > 0 {
            write!(f, "+{}", self.disp)?;
        } else if self.disp < 0 {
            write!(f, "{}", self.disp)?;
        }
        write!(f, "]")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Reg(GpRegister),
    Sized(SizedRegister),
    Imm(u64),
    Mem(MemOperand),
}

impl From<GpRegister> for Operand {
    fn from(reg: GpRegister) -> Self {
        Operand::Reg(reg)
    }
}

impl From<SizedRegister> for Operand {
    fn from(reg: SizedRegister) -> Self {
        Operand::Sized(reg)
    }
}

impl From<MemOperand> for Operand {
    fn from(mem: MemOperand) -> Self {
        Operand::Mem(mem)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{}", reg),
            Operand::Sized(reg) => write!(f, "{}", reg),
            Operand::Imm(value) => write!(f, "{}", value),
            Operand::Mem(mem) => write!(f, "{}", mem),
        }
    }
}

/// Two-operand arithmetic mnemonics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Imul,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Imul => "imul",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum X86Instr {
    // === Data Movement ===
    Mov { dst: Operand, src: Operand },
    /// Sign-extending load: `movsx` for byte/word sources, `movsxd` for dword
    MovSx { dst: GpRegister, src: MemOperand },
    /// Zero-extend a byte register into its full register
    MovZx { dst: GpRegister, src: SizedRegister },

    // === Arithmetic ===
    Arith {
        op: ArithOp,
        dst: GpRegister,
        src: Operand,
    },
    /// Sign-extend rax into rdx:rax
    Cqo,
    Idiv { src: GpRegister },

    // === Comparison ===
    Cmp { lhs: GpRegister, rhs: GpRegister },
    Test { lhs: GpRegister, rhs: GpRegister },
    SetCc { cond: Condition, dst: SizedRegister },

    // === Control Flow ===
    Jmp { target: String },
    Jcc { cond: Condition, target: String },
    Call { target: String },
    Ret,

    // === Stack ===
    Push { src: GpRegister },
    Pop { dst: GpRegister },

    // === System ===
    Syscall,

    // === Pseudo-instructions ===
    Label { name: String },
    Comment { text: String },
}

impl fmt::Display for X86Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            X86Instr::Mov { dst, src } => write!(f, "mov {}, {}", dst, src),
            X86Instr::MovSx { dst, src } => match src.width {
                Some(Width::Dword) => write!(f, "movsxd {}, {}", dst, src),
                Some(Width::Qword) | None => write!(f, "mov {}, {}", dst, src),
                Some(Width::Byte) | Some(Width::Word) => write!(f, "movsx {}, {}", dst, src),
            },
            X86Instr::MovZx { dst, src } => write!(f, "movzx {}, {}", dst, src),

            X86Instr::Arith { op, dst, src } => write!(f, "{} {}, {}", op, dst, src),
            X86Instr::Cqo => write!(f, "cqo"),
            X86Instr::Idiv { src } => write!(f, "idiv {}", src),

            X86Instr::Cmp { lhs, rhs } => write!(f, "cmp {}, {}", lhs, rhs),
            X86Instr::Test { lhs, rhs } => write!(f, "test {}, {}", lhs, rhs),
            X86Instr::SetCc { cond, dst } => write!(f, "set{} {}", cond, dst),

            X86Instr::Jmp { target } => write!(f, "jmp {}", target),
            X86Instr::Jcc { cond, target } => write!(f, "j{} {}", cond, target),
            X86Instr::Call { target } => write!(f, "call {}", target),
            X86Instr::Ret => write!(f, "ret"),

            X86Instr::Push { src } => write!(f, "push {}", src),
            X86Instr::Pop { dst } => write!(f, "pop {}", dst),

            X86Instr::Syscall => write!(f, "syscall"),

            X86Instr::Label { name } => write!(f, "{}:", name),
            X86Instr::Comment { text } => write!(f, "; {}", text),
        }
    }
}
