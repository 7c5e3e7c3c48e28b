//! NASM Text Emitter
//!
//! Accumulates assembly text in per-section buffers while functions are
//! lowered, then renders them in a fixed order. The emitter also owns the
//! physical register set and the label counter, so one emitter corresponds
//! to one output file.

use crate::backend::codegen::error::{CodegenError, Result};
use crate::backend::x86_64::{
    ArithOp, Condition, GpRegister, GpRegisterSet, MemOperand, Operand, RegisterLease,
    SizedRegister, Width, X86Instr,
};
use crate::common::types::LocationDescription;
use std::fmt::Write;

const INDENT: &str = "    ";

/// Name of the process entry symbol synthesized around the entry function.
pub const START_SYMBOL: &str = "_start";

/// Linux `exit` syscall number.
const SYS_EXIT: u64 = 60;

pub struct NasmEmitter {
    data: String,
    rodata: String,
    bss: String,
    text_title: String,
    externs: String,
    globals: String,
    pre_body: String,
    body: String,

    registers: GpRegisterSet,
    entry_point: String,
    entry_point_emitted: bool,
    label_counter: usize,
}

impl NasmEmitter {
    pub fn new(entry_point: &str) -> Self {
        Self {
            data: "section .data\n".to_string(),
            rodata: "section .rodata\n".to_string(),
            bss: "section .bss\n".to_string(),
            text_title: "section .text\n".to_string(),
            externs: String::new(),
            globals: String::new(),
            pre_body: String::new(),
            body: String::new(),
            registers: GpRegisterSet::new(),
            entry_point: entry_point.to_string(),
            entry_point_emitted: false,
            label_counter: 0,
        }
    }

    // ========================================================================
    // Registers
    // ========================================================================

    pub fn registers(&self) -> &GpRegisterSet {
        &self.registers
    }

    /// Lease a scratch register, failing with `RegistersExhausted`.
    pub fn acquire_register(&self, context: &'static str) -> Result<RegisterLease> {
        self.registers
            .acquire_guard()
            .ok_or(CodegenError::RegistersExhausted { context })
    }

    // ========================================================================
    // Raw output
    // ========================================================================

    pub fn emit(&mut self, instr: X86Instr) {
        match instr {
            X86Instr::Label { .. } => {
                let _ = writeln!(self.body, "{}", instr);
            }
            _ => {
                let _ = writeln!(self.body, "{}{}", INDENT, instr);
            }
        }
    }

    pub fn emit_comment(&mut self, text: &str) {
        self.emit(X86Instr::Comment {
            text: text.to_string(),
        });
    }

    /// Copy user-written assembly verbatim between marker comments.
    pub fn emit_inline_asm(&mut self, asm_block: &str) {
        self.emit_comment("-- START -- user defined");
        for line in asm_block.lines() {
            let _ = writeln!(self.body, "{}{}", INDENT, line.trim());
        }
        self.emit_comment("-- END -- user defined");
    }

    // ========================================================================
    // Symbols and labels
    // ========================================================================

    pub fn emit_global_directive(&mut self, name: &str) {
        let _ = writeln!(self.globals, "global {}", name);
    }

    pub fn emit_extern_directive(&mut self, name: &str) {
        let _ = writeln!(self.externs, "extern {}", name);
    }

    pub fn emit_function_label(&mut self, name: &str) {
        if name == self.entry_point {
            self.entry_point_emitted = true;
        }
        self.emit_label(name);
    }

    pub fn emit_label(&mut self, name: &str) {
        self.emit(X86Instr::Label {
            name: name.to_string(),
        });
    }

    /// Local label unique within this emitter, e.g. `.L3_while_end`.
    pub fn generate_unique_label(&mut self, suffix: &str) -> String {
        let label = format!(".L{}_{}", self.label_counter, suffix);
        self.label_counter += 1;
        label
    }

    pub fn emit_unique_label(&mut self, suffix: &str) -> String {
        let label = self.generate_unique_label(suffix);
        self.emit_label(&label);
        label
    }

    // ========================================================================
    // Frame
    // ========================================================================

    pub fn emit_save_base_pointer(&mut self) {
        self.emit_push(GpRegister::BASE_PTR);
    }

    pub fn emit_set_base_pointer_to_current_stack_pointer(&mut self) {
        self.emit_move(GpRegister::BASE_PTR, GpRegister::STACK_PTR);
    }

    /// Discard the frame and pop the caller's base pointer.
    pub fn emit_restore_base_pointer(&mut self) {
        self.emit_move(GpRegister::STACK_PTR, GpRegister::BASE_PTR);
        self.emit_pop(GpRegister::BASE_PTR);
    }

    pub fn emit_ret(&mut self) {
        self.emit(X86Instr::Ret);
    }

    /// Make room on the stack for a freshly declared variable.
    pub fn emit_declaration(&mut self, location: &LocationDescription) -> Result<()> {
        match location {
            LocationDescription::LocalStackOffset { byte_size, .. } => {
                self.emit_stack_growth(*byte_size);
                Ok(())
            }
            LocationDescription::GlobalStackOffset { .. } => {
                Err(CodegenError::unimplemented("global variable declarations"))
            }
            LocationDescription::Register(_) => {
                Err(CodegenError::unimplemented("register-resident variables"))
            }
        }
    }

    pub fn emit_stack_growth(&mut self, bytes: u32) {
        if bytes > 0 {
            self.emit_binary_op(ArithOp::Sub, GpRegister::STACK_PTR, Operand::Imm(bytes.into()));
        }
    }

    pub fn emit_stack_release(&mut self, bytes: u32) {
        if bytes > 0 {
            self.emit_binary_op(ArithOp::Add, GpRegister::STACK_PTR, Operand::Imm(bytes.into()));
        }
    }

    pub fn emit_push(&mut self, src: GpRegister) {
        self.emit(X86Instr::Push { src });
    }

    pub fn emit_pop(&mut self, dst: GpRegister) {
        self.emit(X86Instr::Pop { dst });
    }

    // ========================================================================
    // Data movement
    // ========================================================================

    pub fn emit_load_number_literal(&mut self, reg: GpRegister, value: u64) {
        self.emit(X86Instr::Mov {
            dst: reg.into(),
            src: Operand::Imm(value),
        });
    }

    pub fn emit_move(&mut self, dst: GpRegister, src: GpRegister) {
        if dst != src {
            self.emit(X86Instr::Mov {
                dst: dst.into(),
                src: src.into(),
            });
        }
    }

    /// Sign-extending load of a variable into the full 64-bit register.
    pub fn emit_load_from_memory(
        &mut self,
        reg: GpRegister,
        location: &LocationDescription,
    ) -> Result<()> {
        match location {
            LocationDescription::LocalStackOffset {
                byte_size,
                byte_offset,
            } => {
                let src =
                    MemOperand::frame_slot(*byte_offset).with_width(Width::from_byte_size(*byte_size));
                self.emit(X86Instr::MovSx { dst: reg, src });
                Ok(())
            }
            LocationDescription::GlobalStackOffset { .. } => {
                Err(CodegenError::unimplemented("loads from global variables"))
            }
            LocationDescription::Register(_) => {
                Err(CodegenError::unimplemented("loads from register-resident variables"))
            }
        }
    }

    /// Store the low bytes of `reg` matching the location's size.
    pub fn emit_store_in_memory(
        &mut self,
        location: &LocationDescription,
        reg: GpRegister,
    ) -> Result<()> {
        match location {
            LocationDescription::LocalStackOffset {
                byte_size,
                byte_offset,
            } => {
                let src = SizedRegister {
                    reg,
                    width: Width::from_byte_size(*byte_size),
                };
                self.emit(X86Instr::Mov {
                    dst: MemOperand::frame_slot(*byte_offset).into(),
                    src: src.into(),
                });
                Ok(())
            }
            LocationDescription::GlobalStackOffset { .. } => {
                Err(CodegenError::unimplemented("stores to global variables"))
            }
            LocationDescription::Register(_) => {
                Err(CodegenError::unimplemented("stores to register-resident variables"))
            }
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    pub fn emit_binary_op(&mut self, op: ArithOp, dst: GpRegister, src: Operand) {
        self.emit(X86Instr::Arith { op, dst, src });
    }

    pub fn emit_add(&mut self, dst: GpRegister, src: GpRegister) {
        self.emit_binary_op(ArithOp::Add, dst, src.into());
    }

    pub fn emit_sub(&mut self, dst: GpRegister, src: GpRegister) {
        self.emit_binary_op(ArithOp::Sub, dst, src.into());
    }

    pub fn emit_mul(&mut self, dst: GpRegister, src: GpRegister) {
        self.emit_binary_op(ArithOp::Imul, dst, src.into());
    }

    /// Signed `dst / src` through `rdx:rax`; neither operand may be `rax`
    /// or `rdx`, which the register set never hands out.
    pub fn emit_div(&mut self, dst: GpRegister, src: GpRegister) {
        self.emit_move(GpRegister::Rax, dst);
        self.emit(X86Instr::Cqo);
        self.emit(X86Instr::Idiv { src });
        self.emit_move(dst, GpRegister::Rax);
    }

    // ========================================================================
    // Comparison and jumps
    // ========================================================================

    pub fn emit_cmp(&mut self, lhs: GpRegister, rhs: GpRegister) {
        self.emit(X86Instr::Cmp { lhs, rhs });
    }

    pub fn emit_test(&mut self, reg: GpRegister) {
        self.emit(X86Instr::Test { lhs: reg, rhs: reg });
    }

    /// Materialize the flags of the last comparison as 0 or 1 in `target`.
    pub fn emit_set_cc(&mut self, target: GpRegister, cond: Condition) {
        let low_byte = SizedRegister {
            reg: target,
            width: Width::Byte,
        };
        self.emit(X86Instr::SetCc {
            cond,
            dst: low_byte,
        });
        self.emit(X86Instr::MovZx {
            dst: target,
            src: low_byte,
        });
    }

    pub fn emit_jump(&mut self, label: &str) {
        self.emit(X86Instr::Jmp {
            target: label.to_string(),
        });
    }

    /// Jump to `label` when `reg` is zero.
    pub fn emit_conditional_jump(&mut self, label: &str, reg: GpRegister) {
        self.emit_test(reg);
        self.emit(X86Instr::Jcc {
            cond: Condition::E,
            target: label.to_string(),
        });
    }

    pub fn emit_conditional_jump_non_zero(&mut self, label: &str, reg: GpRegister) {
        self.emit_test(reg);
        self.emit(X86Instr::Jcc {
            cond: Condition::Ne,
            target: label.to_string(),
        });
    }

    pub fn emit_call(&mut self, name: &str) {
        self.emit(X86Instr::Call {
            target: name.to_string(),
        });
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn entry_point_emitted(&self) -> bool {
        self.entry_point_emitted
    }

    /// Render every section in order, adding the `_start` stub when the
    /// entry function was emitted.
    pub fn generate_asm_code(mut self) -> String {
        if self.entry_point_emitted {
            self.emit_global_directive(START_SYMBOL);
            let entry_point = std::mem::take(&mut self.entry_point);
            let stub = [
                X86Instr::Call {
                    target: entry_point,
                },
                X86Instr::Mov {
                    dst: GpRegister::Rdi.into(),
                    src: GpRegister::RETURN_REG.into(),
                },
                X86Instr::Mov {
                    dst: GpRegister::Rax.into(),
                    src: Operand::Imm(SYS_EXIT),
                },
                X86Instr::Syscall,
            ];
            let _ = writeln!(self.pre_body, "{}:", START_SYMBOL);
            for instr in stub {
                let _ = writeln!(self.pre_body, "{}{}", INDENT, instr);
            }
        }

        [
            self.data,
            self.rodata,
            self.bss,
            self.text_title,
            self.externs,
            self.globals,
            self.pre_body,
            self.body,
        ]
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
    }
}
