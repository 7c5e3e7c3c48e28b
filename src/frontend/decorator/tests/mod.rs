use crate::common::ast::{Expression, Instruction, Statement, TranslationUnit};
use crate::common::types::{LocationDescription, ScopeId, CHAR_TYPE, INT_TYPE, VOID_TYPE};
use crate::frontend::decorator::{decorate_translation_unit, ResolveError, ScopeStack};
use crate::pipeline::parse;

fn decorate(source: &str) -> Result<(TranslationUnit<'_>, ScopeStack), ResolveError> {
    let mut unit = parse(source).unwrap();
    let mut scopes = ScopeStack::new();
    decorate_translation_unit(&mut scopes, &mut unit)?;
    Ok((unit, scopes))
}

fn local_offset(scopes: &ScopeStack, name: &str) -> Vec<u32> {
    scopes
        .variables()
        .iter()
        .filter(|v| v.name == name)
        .map(|v| match v.location {
            LocationDescription::LocalStackOffset { byte_offset, .. } => byte_offset,
            other => panic!("Expected a local slot, got {:?}", other),
        })
        .collect()
}

#[test]
fn test_root_scope_has_primitives() {
    let scopes = ScopeStack::new();
    let span = (0..0).into();
    assert_eq!(scopes.find_type(ScopeId::ROOT, "void", span), Ok(VOID_TYPE));
    assert_eq!(scopes.find_type(ScopeId::ROOT, "char", span), Ok(CHAR_TYPE));
    assert_eq!(scopes.find_type(ScopeId::ROOT, "int", span), Ok(INT_TYPE));
    assert_eq!(scopes.type_description(INT_TYPE).byte_size, 4);
    assert_eq!(scopes.type_description(CHAR_TYPE).byte_size, 1);
    assert_eq!(scopes.scope_count(), 1);
}

#[test]
fn test_lookup_walks_parents() {
    let mut scopes = ScopeStack::new();
    let span = (0..0).into();
    let outer = scopes.create_child_scope(ScopeId::ROOT);
    let inner = scopes.create_child_scope(outer);
    let x = scopes.add_local_variable(outer, "x", INT_TYPE);
    assert_eq!(scopes.find_variable(inner, "x", span), Ok(x));
    assert!(scopes.find_variable(ScopeId::ROOT, "x", span).is_err());
}

#[test]
fn test_child_scope_starts_at_parent_offset() {
    let mut scopes = ScopeStack::new();
    let outer = scopes.create_child_scope(ScopeId::ROOT);
    scopes.add_local_variable(outer, "a", INT_TYPE);
    scopes.add_local_variable(outer, "c", CHAR_TYPE);
    let inner = scopes.create_child_scope(outer);
    assert_eq!(scopes.scope(inner).base_offset, 5);
    let b = scopes.add_local_variable(inner, "b", INT_TYPE);
    assert_eq!(
        scopes.variable(b).location,
        LocationDescription::LocalStackOffset {
            byte_size: 4,
            byte_offset: 9
        }
    );
    assert_eq!(scopes.scope(inner).local_bytes(), 4);
    assert_eq!(scopes.scope(outer).local_bytes(), 5);
}

#[test]
fn test_pointer_types_are_shared_and_address_sized() {
    let mut scopes = ScopeStack::new();
    let span = (0..0).into();
    let inner = scopes.create_child_scope(ScopeId::ROOT);
    let first = scopes.resolve_type(inner, "char", 2, span).unwrap();
    let second = scopes.resolve_type(ScopeId::ROOT, "char", 2, span).unwrap();
    assert_eq!(first, second);
    assert_eq!(scopes.type_description(first).name, "char**");
    assert_eq!(scopes.type_description(first).byte_size, 8);
    assert!(scopes.find_type(ScopeId::ROOT, "char*", span).is_ok());
}

#[test]
fn test_every_variable_is_decorated() {
    let (unit, _) = decorate("int main() { int a = 1; int b = a + 2; return b; }").unwrap();
    let body = &unit.functions[0].body;
    for statement in &body.statements {
        match statement {
            Statement::Instruction(Instruction::Declaration(decl)) => {
                assert!(decl.variable.description.is_some());
                assert!(decl.ty.description.is_some());
            }
            Statement::Instruction(Instruction::Return(ret)) => match &ret.expression {
                Some(Expression::Variable(v)) => assert!(v.description.is_some()),
                other => panic!("Expected variable, got {:?}", other),
            },
            other => panic!("Unexpected statement {:?}", other),
        }
    }
    assert!(unit.functions[0].description.is_some());
    assert!(body.scope.is_some());
    assert_eq!(body.local_bytes, 8);
}

#[test]
fn test_variable_ids_increase_in_declaration_order() {
    let (unit, _) = decorate("int main() { int a; int b; int c; return 0; }").unwrap();
    let ids: Vec<usize> = unit.functions[0]
        .body
        .statements
        .iter()
        .filter_map(|s| match s {
            Statement::Instruction(Instruction::Declaration(d)) => d.variable.description,
            _ => None,
        })
        .map(|id| id.0)
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_parameters_are_first_locals() {
    let (_, scopes) = decorate("int f(int a, char c) { int x = 0; return x; }").unwrap();
    assert_eq!(local_offset(&scopes, "a"), vec![4]);
    assert_eq!(local_offset(&scopes, "c"), vec![5]);
    assert_eq!(local_offset(&scopes, "x"), vec![9]);
}

#[test]
fn test_shadowing_in_nested_block_gets_new_slot() {
    let (_, scopes) = decorate("int main() { int x = 1; { int x = 2; } return x; }").unwrap();
    assert_eq!(local_offset(&scopes, "x"), vec![4, 8]);
}

#[test]
fn test_sibling_blocks_reuse_slots() {
    let (_, scopes) = decorate("int main() { { int a = 1; } { int b = 2; } return 0; }").unwrap();
    assert_eq!(local_offset(&scopes, "a"), local_offset(&scopes, "b"));
}

#[test]
fn test_initializer_sees_outer_binding() {
    let source = "int main() { int x = 1; { int x = x + 1; return x; } }";
    let (unit, _) = decorate(source).unwrap();
    let Statement::CodeBlock(inner) = &unit.functions[0].body.statements[1] else {
        panic!("Expected nested block");
    };
    let Statement::Instruction(Instruction::Declaration(decl)) = &inner.statements[0] else {
        panic!("Expected declaration");
    };
    let Some(Expression::BinaryOperation(op)) = &decl.initializer else {
        panic!("Expected binary initializer");
    };
    let Expression::Variable(outer_x) = op.lhs.as_ref() else {
        panic!("Expected variable");
    };
    assert_ne!(outer_x.description, decl.variable.description);
}

#[test]
fn test_for_scope_and_init_bytes() {
    let source = "int main() { int t = 0; for (int i = 0; i < 3; i = i + 1) { int sq = i * i; t = t + sq; } return t; }";
    let (unit, scopes) = decorate(source).unwrap();
    let Statement::For(for_statement) = &unit.functions[0].body.statements[1] else {
        panic!("Expected for loop");
    };
    assert_eq!(for_statement.init_bytes, 4);
    assert_eq!(for_statement.body.local_bytes, 4);
    assert_eq!(for_statement.scope, for_statement.body.scope);
    assert_eq!(local_offset(&scopes, "i"), vec![8]);
    assert_eq!(local_offset(&scopes, "sq"), vec![12]);
}

#[test]
fn test_use_outside_scope_fails() {
    let result = decorate("int main() { { int inner = 1; } return inner; }");
    match result {
        Err(ResolveError::VariableNotFound { name, scope, span }) => {
            assert_eq!(name, "inner");
            assert_ne!(scope, ScopeId::ROOT);
            assert!(span.start > 0);
        }
        other => panic!("Expected VariableNotFound, got {:?}", other.err()),
    }
}

#[test]
fn test_unknown_type() {
    let result = decorate("int main() { widget w; return 0; }");
    assert!(matches!(result, Err(ResolveError::TypeNotFound { ref name, .. }) if name == "widget"));
}

#[test]
fn test_unknown_function() {
    let result = decorate("int main() { return missing(1); }");
    assert!(matches!(result, Err(ResolveError::FunctionNotFound { ref name, .. }) if name == "missing"));
}

#[test]
fn test_call_before_definition_needs_prototype() {
    assert!(decorate("int main() { return later(); } int later() { return 1; }").is_err());
    assert!(decorate("int later(); int main() { return later(); } int later() { return 1; }").is_ok());
}

#[test]
fn test_recursion_resolves() {
    assert!(decorate("int f(int n) { return f(n - 1); }").is_ok());
}

#[test]
fn test_argument_count() {
    let result = decorate("extern int put(int); int main() { put(1, 2); return 0; }");
    assert!(matches!(
        result,
        Err(ResolveError::ArgumentCountMismatch { expected: 1, found: 2, .. })
    ));
}

#[test]
fn test_void_variable_rejected() {
    let result = decorate("int main() { void v; return 0; }");
    assert!(matches!(result, Err(ResolveError::VoidVariable { ref name, .. }) if name == "v"));
}

#[test]
fn test_void_pointer_allowed() {
    let (_, scopes) = decorate("int main() { void* p; return 0; }").unwrap();
    assert_eq!(local_offset(&scopes, "p"), vec![8]);
}

#[test]
fn test_inline_asm_bindings_resolve() {
    assert!(decorate(r#"int main() { int a = 1; asm("nop" : "=rdi"(a)); return 0; }"#).is_ok());
    let result = decorate(r#"int main() { asm("nop" : "=rdi"(b)); return 0; }"#);
    assert!(matches!(result, Err(ResolveError::VariableNotFound { .. })));
}

#[test]
fn test_class_members_resolve_types() {
    assert!(decorate("class A { public: int x; char* name; };").is_ok());
    let result = decorate("class A { mystery m; };");
    assert!(matches!(result, Err(ResolveError::TypeNotFound { .. })));
}

#[test]
fn test_error_codes_are_distinct() {
    let span = (0..0).into();
    let errors = [
        ResolveError::TypeNotFound { name: "a".into(), scope: ScopeId::ROOT, span },
        ResolveError::VariableNotFound { name: "a".into(), scope: ScopeId::ROOT, span },
        ResolveError::FunctionNotFound { name: "a".into(), scope: ScopeId::ROOT, span },
        ResolveError::ArgumentCountMismatch { function: "a".into(), expected: 0, found: 1, span },
        ResolveError::VoidVariable { name: "a".into(), span },
    ];
    let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn test_scope_dump_lists_declarations() {
    let (_, scopes) = decorate("int main() { int answer = 42; return answer; }").unwrap();
    let dump = scopes.dump();
    assert!(dump.contains("scope 0 (parent none"));
    assert!(dump.contains("fn F0 main() -> int"));
    assert!(dump.contains("answer: int"));
}
