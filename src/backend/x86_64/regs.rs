//! x86-64 General Purpose Registers
//!
//! Register order matches the bit order of
//! [`GpRegisterSet`](super::register_set::GpRegisterSet).

use std::fmt;

/// Operand width, used to pick the sub-register name and the memory size
/// keyword in NASM syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    Byte,
    Word,
    Dword,
    Qword,
}

impl Width {
    /// Width of a value occupying `byte_size` bytes; sizes that do not map
    /// to a machine width are treated as full 64-bit values.
    pub fn from_byte_size(byte_size: u32) -> Width {
        match byte_size {
            1 => Width::Byte,
            2 => Width::Word,
            4 => Width::Dword,
            _ => Width::Qword,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Width::Byte => "byte",
            Width::Word => "word",
            Width::Dword => "dword",
            Width::Qword => "qword",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GpRegister {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rsi,
    Rdi,
    Rbp,
    Rsp,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

impl GpRegister {
    pub const ALL: [GpRegister; 16] = [
        GpRegister::Rax,
        GpRegister::Rbx,
        GpRegister::Rcx,
        GpRegister::Rdx,
        GpRegister::Rsi,
        GpRegister::Rdi,
        GpRegister::Rbp,
        GpRegister::Rsp,
        GpRegister::R8,
        GpRegister::R9,
        GpRegister::R10,
        GpRegister::R11,
        GpRegister::R12,
        GpRegister::R13,
        GpRegister::R14,
        GpRegister::R15,
    ];

    /// Argument registers (System V AMD64 ABI order)
    pub const ARG_REGS: [GpRegister; 6] = [
        GpRegister::Rdi,
        GpRegister::Rsi,
        GpRegister::Rdx,
        GpRegister::Rcx,
        GpRegister::R8,
        GpRegister::R9,
    ];

    /// Return value register
    pub const RETURN_REG: GpRegister = GpRegister::Rax;

    pub const STACK_PTR: GpRegister = GpRegister::Rsp;

    pub const BASE_PTR: GpRegister = GpRegister::Rbp;

    /// Position in [`GpRegister::ALL`], also the bit in a register set.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse a 64-bit register name as written in inline assembly bindings.
    pub fn from_name(name: &str) -> Option<GpRegister> {
        GpRegister::ALL
            .into_iter()
            .find(|reg| reg.name(Width::Qword) == name)
    }

    /// NASM name of the register viewed at `width`.
    pub fn name(self, width: Width) -> &'static str {
        use GpRegister::*;
        match (self, width) {
            (Rax, Width::Qword) => "rax",
            (Rax, Width::Dword) => "eax",
            (Rax, Width::Word) => "ax",
            (Rax, Width::Byte) => "al",
            (Rbx, Width::Qword) => "rbx",
            (Rbx, Width::Dword) => "ebx",
            (Rbx, Width::Word) => "bx",
            (Rbx, Width::Byte) => "bl",
            (Rcx, Width::Qword) => "rcx",
            (Rcx, Width::Dword) => "ecx",
            (Rcx, Width::Word) => "cx",
            (Rcx, Width::Byte) => "cl",
            (Rdx, Width::Qword) => "rdx",
            (Rdx, Width::Dword) => "edx",
            (Rdx, Width::Word) => "dx",
            (Rdx, Width::Byte) => "dl",
            (Rsi, Width::Qword) => "rsi",
            (Rsi, Width::Dword) => "esi",
            (Rsi, Width::Word) => "si",
            (Rsi, Width::Byte) => "sil",
            (Rdi, Width::Qword) => "rdi",
            (Rdi, Width::Dword) => "edi",
            (Rdi, Width::Word) => "di",
            (Rdi, Width::Byte) => "dil",
            (Rbp, Width::Qword) => "rbp",
            (Rbp, Width::Dword) => "ebp",
            (Rbp, Width::Word) => "bp",
            (Rbp, Width::Byte) => "bpl",
            (Rsp, Width::Qword) => "rsp",
            (Rsp, Width::Dword) => "esp",
            (Rsp, Width::Word) => "sp",
            (Rsp, Width::Byte) => "spl",
            (R8, Width::Qword) => "r8",
            (R8, Width::Dword) => "r8d",
            (R8, Width::Word) => "r8w",
            (R8, Width::Byte) => "r8b",
            (R9, Width::Qword) => "r9",
            (R9, Width::Dword) => "r9d",
            (R9, Width::Word) => "r9w",
            (R9, Width::Byte) => "r9b",
            (R10, Width::Qword) => "r10",
            (R10, Width::Dword) => "r10d",
            (R10, Width::Word) => "r10w",
            (R10, Width::Byte) => "r10b",
            (R11, Width::Qword) => "r11",
            (R11, Width::Dword) => "r11d",
            (R11, Width::Word) => "r11w",
            (R11, Width::Byte) => "r11b",
            (R12, Width::Qword) => "r12",
            (R12, Width::Dword) => "r12d",
            (R12, Width::Word) => "r12w",
            (R12, Width::Byte) => "r12b",
            (R13, Width::Qword) => "r13",
            (R13, Width::Dword) => "r13d",
            (R13, Width::Word) => "r13w",
            (R13, Width::Byte) => "r13b",
            (R14, Width::Qword) => "r14",
            (R14, Width::Dword) => "r14d",
            (R14, Width::Word) => "r14w",
            (R14, Width::Byte) => "r14b",
            (R15, Width::Qword) => "r15",
            (R15, Width::Dword) => "r15d",
            (R15, Width::Word) => "r15w",
            (R15, Width::Byte) => "r15b",
        }
    }
}

impl fmt::Display for GpRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(Width::Qword))
    }
}

/// A register viewed at a given width, e.g. `eax` or `r9b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizedRegister {
    pub reg: GpRegister,
    pub width: Width,
}

impl fmt::Display for SizedRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reg.name(self.width))
    }
}
