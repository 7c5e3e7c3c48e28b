//! Code generation tests over decorated trees
//!
//! Sources are parsed and decorated through the front end, then lowered
//! directly so the emitter state can be inspected afterwards.

use crate::backend::codegen::{generate_function, generate_translation_unit, CodegenContext, CodegenError};
use crate::frontend::decorator::{decorate_translation_unit, ScopeStack};
use crate::pipeline::parse;

fn lower(source: &str) -> Result<String, CodegenError> {
    let mut unit = parse(source).unwrap();
    let mut scopes = ScopeStack::new();
    decorate_translation_unit(&mut scopes, &mut unit).unwrap();
    generate_translation_unit(&unit, &scopes, "main")
}

fn lower_ok(source: &str) -> String {
    let result = lower(source);
    assert!(result.is_ok(), "Code generation failed: {:?}", result.err());
    result.unwrap()
}

/// `1 + (1 + (1 + ...))` nested `depth` levels deep
fn right_nested_sum(depth: usize) -> String {
    let mut expr = "1".to_string();
    for _ in 0..depth {
        expr = format!("1 + ({})", expr);
    }
    expr
}

#[test]
fn test_registers_balanced_after_function() {
    let source = "int f(int a, int b) { int c = a * b + a / b; if (c > 3) { c = c - 1; } return c; }";
    let mut unit = parse(source).unwrap();
    let mut scopes = ScopeStack::new();
    decorate_translation_unit(&mut scopes, &mut unit).unwrap();

    let mut ctx = CodegenContext::new(&scopes, "main");
    generate_function(&mut ctx, &unit.functions[0]).unwrap();
    assert_eq!(ctx.emitter.registers().taken_count(), 0);
}

#[test]
fn test_registers_balanced_after_error() {
    let source = format!("int main() {{ int x = {}; return x; }}", right_nested_sum(12));
    let mut unit = parse(&source).unwrap();
    let mut scopes = ScopeStack::new();
    decorate_translation_unit(&mut scopes, &mut unit).unwrap();

    let mut ctx = CodegenContext::new(&scopes, "main");
    let result = generate_function(&mut ctx, &unit.functions[0]);
    assert!(matches!(result, Err(CodegenError::RegistersExhausted { .. })));
    assert_eq!(ctx.emitter.registers().taken_count(), 0);
}

#[test]
fn test_moderate_nesting_fits() {
    let source = format!("int main() {{ return {}; }}", right_nested_sum(4));
    lower_ok(&source);
}

#[test]
fn test_undecorated_function() {
    let unit = parse("int main() { return 0; }").unwrap();
    let scopes = ScopeStack::new();
    let result = generate_translation_unit(&unit, &scopes, "main");
    assert_eq!(
        result,
        Err(CodegenError::Undecorated {
            node: "function",
            name: "main".to_string()
        })
    );
}

#[test]
fn test_too_many_parameters() {
    let result = lower("int f(int a, int b, int c, int d, int e, int g, int h) { return a; }");
    assert!(matches!(result, Err(CodegenError::Unimplemented { .. })));
}

#[test]
fn test_too_many_arguments() {
    let source = "extern int many(int, int, int, int, int, int, int); int main() { return many(1, 2, 3, 4, 5, 6, 7); }";
    assert!(matches!(lower(source), Err(CodegenError::Unimplemented { .. })));
}

#[test]
fn test_six_parameters_use_argument_registers() {
    let asm = lower_ok("int f(int a, int b, int c, int d, int e, int g) { return g; }");
    for (reg, offset) in [("edi", 4), ("esi", 8), ("edx", 12), ("ecx", 16), ("r8d", 20), ("r9d", 24)] {
        assert!(asm.contains(&format!("mov [rbp-{}], {}", offset, reg)), "missing {}", reg);
    }
}

#[test]
fn test_call_arguments_pop_in_reverse() {
    let asm = lower_ok("extern int add(int, int); int main() { int r = add(1, 2); return r; }");
    let pop_rsi = asm.find("pop rsi").unwrap();
    let pop_rdi = asm.find("pop rdi").unwrap();
    let call = asm.find("call add").unwrap();
    assert!(pop_rsi < pop_rdi);
    assert!(pop_rdi < call);
    // the declaration's register receives the result and is not saved
    assert!(asm.contains("call add\n    mov rbx, rax"));
    assert!(!asm.contains("push rbx"));
}

#[test]
fn test_labels_are_unique() {
    let source = r#"
        int main() {
            int i = 0;
            while (i < 3) { i = i + 1; }
            while (i > 0) { i = i - 1; }
            if (i == 0) { i = 5; } else { i = 6; }
            return i;
        }
    "#;
    let asm = lower_ok(source);
    let labels: Vec<&str> = asm
        .lines()
        .filter(|line| line.starts_with(".L") && line.ends_with(':'))
        .collect();
    let mut unique = labels.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(labels.len(), unique.len());
    assert!(labels.len() >= 6);
}

#[test]
fn test_if_else_layout() {
    let asm = lower_ok("int main() { int x = 1; if (x) { x = 2; } else { x = 3; } return x; }");
    assert!(asm.contains("je .L1_else"));
    assert!(asm.contains("jmp .L0_if_end"));
    let else_label = asm.find(".L1_else:").unwrap();
    let end_label = asm.find(".L0_if_end:").unwrap();
    assert!(else_label < end_label);
}

#[test]
fn test_do_while_body_runs_before_test() {
    let asm = lower_ok("int main() { int i = 0; do { i = i + 1; } while (i < 5); return i; }");
    let top = asm.find(".L0_do_top:").unwrap();
    let add = asm[top..].find("add").unwrap() + top;
    let test = asm[top..].find("je .L1_do_end").unwrap() + top;
    assert!(add < test);
    assert!(asm.contains("jmp .L0_do_top\n.L1_do_end:"));
}

#[test]
fn test_block_releases_its_locals() {
    let asm = lower_ok("int main() { int x = 0; while (x < 2) { int y = x; x = y + 1; } return x; }");
    assert!(asm.contains("sub rsp, 4"));
    assert!(asm.contains("add rsp, 4\n    jmp .L0_while_top"));
}

#[test]
fn test_for_releases_init_after_loop() {
    let asm = lower_ok("int main() { int t = 0; for (int i = 0; i < 3; i = i + 1) { t = t + i; } return t; }");
    assert!(asm.contains(".L0_for_test:"));
    assert!(asm.contains(".L1_for_end:\n    add rsp, 4"));
}

#[test]
fn test_char_variables_use_byte_moves() {
    let asm = lower_ok("int main() { char c = 65; return c; }");
    assert!(asm.contains("sub rsp, 1"));
    assert!(asm.contains("mov [rbp-1], bl"));
    assert!(asm.contains("movsx rax, byte [rbp-1]"));
}

#[test]
fn test_assignment_value_is_the_narrowed_store() {
    let asm = lower_ok("int main() { char c; int y = (c = 300); return y; }");
    assert!(asm.contains("mov rcx, 300\n    mov [rbp-1], cl\n    movsx rbx, byte [rbp-1]"));
    assert!(!asm.contains("mov rbx, rcx"));
}

#[test]
fn test_division_goes_through_rax() {
    let asm = lower_ok("int main() { return 9 / 3; }");
    assert!(asm.contains("mov rax, rbx\n    cqo\n    idiv rcx\n    mov rbx, rax"));
}

#[test]
fn test_extern_emitted_once() {
    let asm = lower_ok("extern void f(); extern void f(); int main() { f(); return 0; }");
    assert_eq!(asm.matches("extern f").count(), 1);
}

#[test]
fn test_output_is_deterministic() {
    let source = "int g(int n) { return n + 1; } int main() { int a = g(1); return g(a); }";
    assert_eq!(lower_ok(source), lower_ok(source));
}
