//! Tests for the NASM emitter

use crate::backend::codegen::CodegenError;
use crate::backend::emit::NasmEmitter;
use crate::backend::x86_64::{Condition, GpRegister};
use crate::common::types::LocationDescription;
use std::collections::HashSet;

fn local(byte_size: u32, byte_offset: u32) -> LocationDescription {
    LocationDescription::LocalStackOffset {
        byte_size,
        byte_offset,
    }
}

#[test]
fn test_sections_render_in_order() {
    let mut emitter = NasmEmitter::new("main");
    emitter.emit_extern_directive("printnum");
    emitter.emit_global_directive("helper");
    emitter.emit_function_label("helper");
    emitter.emit_ret();
    let asm = emitter.generate_asm_code();

    let positions: Vec<usize> = [
        "section .data",
        "section .rodata",
        "section .bss",
        "section .text",
        "extern printnum",
        "global helper",
        "helper:",
    ]
    .iter()
    .map(|needle| asm.find(needle).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", asm);
}

#[test]
fn test_start_stub_only_with_entry_point() {
    let mut emitter = NasmEmitter::new("main");
    emitter.emit_function_label("helper");
    let asm = emitter.generate_asm_code();
    assert!(!asm.contains("_start"));

    let mut emitter = NasmEmitter::new("main");
    emitter.emit_function_label("main");
    assert!(emitter.entry_point_emitted());
    let asm = emitter.generate_asm_code();
    assert!(asm.contains("global _start"));
    assert!(asm.contains("_start:\n    call main\n    mov rdi, rax\n    mov rax, 60\n    syscall\n"));
}

#[test]
fn test_custom_entry_point() {
    let mut emitter = NasmEmitter::new("begin");
    emitter.emit_function_label("main");
    emitter.emit_function_label("begin");
    let asm = emitter.generate_asm_code();
    assert!(asm.contains("call begin"));
}

#[test]
fn test_unique_labels() {
    let mut emitter = NasmEmitter::new("main");
    let labels: Vec<String> = (0..50)
        .map(|i| emitter.generate_unique_label(if i % 2 == 0 { "top" } else { "end" }))
        .collect();
    let distinct: HashSet<&String> = labels.iter().collect();
    assert_eq!(distinct.len(), labels.len());
    assert_eq!(labels[0], ".L0_top");
}

#[test]
fn test_sized_loads_and_stores() {
    let mut emitter = NasmEmitter::new("main");
    emitter
        .emit_store_in_memory(&local(4, 4), GpRegister::Rbx)
        .unwrap();
    emitter
        .emit_load_from_memory(GpRegister::Rcx, &local(4, 4))
        .unwrap();
    emitter
        .emit_load_from_memory(GpRegister::Rcx, &local(1, 5))
        .unwrap();
    emitter
        .emit_store_in_memory(&local(8, 16), GpRegister::R8)
        .unwrap();
    let asm = emitter.generate_asm_code();
    assert!(asm.contains("mov [rbp-4], ebx"));
    assert!(asm.contains("movsxd rcx, dword [rbp-4]"));
    assert!(asm.contains("movsx rcx, byte [rbp-5]"));
    assert!(asm.contains("mov [rbp-16], r8"));
}

#[test]
fn test_non_local_locations_are_unimplemented() {
    let mut emitter = NasmEmitter::new("main");
    let global = LocationDescription::GlobalStackOffset {
        byte_size: 4,
        byte_offset: 0,
    };
    let in_register = LocationDescription::Register(GpRegister::Rbx);
    assert!(matches!(
        emitter.emit_load_from_memory(GpRegister::Rcx, &global),
        Err(CodegenError::Unimplemented { .. })
    ));
    assert!(matches!(
        emitter.emit_store_in_memory(&in_register, GpRegister::Rcx),
        Err(CodegenError::Unimplemented { .. })
    ));
    assert!(matches!(
        emitter.emit_declaration(&global),
        Err(CodegenError::Unimplemented { .. })
    ));
}

#[test]
fn test_declaration_grows_stack() {
    let mut emitter = NasmEmitter::new("main");
    emitter.emit_declaration(&local(4, 4)).unwrap();
    emitter.emit_stack_release(4);
    let asm = emitter.generate_asm_code();
    assert!(asm.contains("sub rsp, 4"));
    assert!(asm.contains("add rsp, 4"));
}

#[test]
fn test_division_goes_through_rax() {
    let mut emitter = NasmEmitter::new("main");
    emitter.emit_div(GpRegister::Rbx, GpRegister::Rcx);
    let asm = emitter.generate_asm_code();
    assert!(asm.contains("mov rax, rbx\n    cqo\n    idiv rcx\n    mov rbx, rax"));
}

#[test]
fn test_set_cc_and_jumps() {
    let mut emitter = NasmEmitter::new("main");
    emitter.emit_cmp(GpRegister::Rbx, GpRegister::Rcx);
    emitter.emit_set_cc(GpRegister::Rbx, Condition::Le);
    emitter.emit_conditional_jump(".L0_else", GpRegister::Rbx);
    emitter.emit_conditional_jump_non_zero(".L1_top", GpRegister::Rbx);
    let asm = emitter.generate_asm_code();
    assert!(asm.contains("cmp rbx, rcx\n    setle bl\n    movzx rbx, bl"));
    assert!(asm.contains("test rbx, rbx\n    je .L0_else"));
    assert!(asm.contains("jne .L1_top"));
}

#[test]
fn test_inline_asm_is_copied_between_markers() {
    let mut emitter = NasmEmitter::new("main");
    emitter.emit_inline_asm("mov rax, 1\nsyscall");
    let asm = emitter.generate_asm_code();
    assert!(asm.contains(
        "; -- START -- user defined\n    mov rax, 1\n    syscall\n    ; -- END -- user defined"
    ));
}

#[test]
fn test_acquire_register_reports_exhaustion() {
    let emitter = NasmEmitter::new("main");
    let held: Vec<_> = (0..emitter.registers().capacity())
        .map(|_| emitter.acquire_register("testing").unwrap())
        .collect();
    assert_eq!(
        emitter.acquire_register("testing").unwrap_err(),
        CodegenError::RegistersExhausted { context: "testing" }
    );
    drop(held);
    assert_eq!(emitter.registers().taken_count(), 0);
}
