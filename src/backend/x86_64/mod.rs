//! x86-64 target description: registers, the physical register allocator
//! and the instruction subset rendered into NASM syntax.

pub mod instr;
pub mod register_set;
pub mod regs;

pub use instr::{ArithOp, Condition, MemOperand, Operand, X86Instr};
pub use register_set::{GpRegisterSet, RegisterLease};
pub use regs::{GpRegister, SizedRegister, Width};
