//! The decoration pass: resolves every name in the tree against the scope
//! stack and fills in the handle slots the code generator reads.

use super::error::ResolveError;
use super::scope::ScopeStack;
use crate::common::ast::{
    Class, CodeBlock, Declaration, Expression, ForStatement, Function, FunctionDeclaration,
    FunctionParameter, InlineAsmStatement, Instruction, Statement, TranslationUnit, Type,
    Variable,
};
use crate::common::types::{ScopeId, TypeId, VOID_TYPE};
use log::trace;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Decorate a whole translation unit: prototypes first, then function
/// definitions in source order, then class members.
pub fn decorate_translation_unit(
    scopes: &mut ScopeStack,
    unit: &mut TranslationUnit<'_>,
) -> Result<()> {
    for declaration in &mut unit.function_declarations {
        decorate_function_declaration(scopes, ScopeId::ROOT, declaration)?;
    }
    for function in &mut unit.functions {
        decorate_function(scopes, ScopeId::ROOT, function)?;
    }
    for class in &mut unit.classes {
        decorate_class(scopes, ScopeId::ROOT, class)?;
    }
    Ok(())
}

fn decorate_type(scopes: &mut ScopeStack, scope: ScopeId, ty: &mut Type<'_>) -> Result<TypeId> {
    let id = scopes.resolve_type(scope, ty.name, ty.pointer_depth, ty.span)?;
    ty.description = Some(id);
    Ok(id)
}

/// Resolve a type that will back storage, rejecting `void`.
fn decorate_storage_type(
    scopes: &mut ScopeStack,
    scope: ScopeId,
    ty: &mut Type<'_>,
    name: &str,
) -> Result<TypeId> {
    let id = decorate_type(scopes, scope, ty)?;
    if id == VOID_TYPE {
        return Err(ResolveError::VoidVariable {
            name: name.to_string(),
            span: ty.span,
        });
    }
    Ok(id)
}

pub fn decorate_function_declaration(
    scopes: &mut ScopeStack,
    scope: ScopeId,
    declaration: &mut FunctionDeclaration<'_>,
) -> Result<()> {
    let return_type = decorate_type(scopes, scope, &mut declaration.return_type)?;
    let mut parameters = Vec::with_capacity(declaration.parameters.len());
    for parameter in &mut declaration.parameters {
        let name = parameter.variable.as_ref().map_or("<unnamed>", |v| v.name);
        parameters.push(decorate_storage_type(scopes, scope, &mut parameter.ty, name)?);
    }
    let id = scopes.add_function(scope, declaration.name, parameters, return_type);
    declaration.description = Some(id);
    trace!("declared function {} as {}", declaration.name, id);
    Ok(())
}

/// Parameters become the first locals of the function scope. The signature
/// is registered in the enclosing scope before the body is decorated, so a
/// function may call itself.
pub fn decorate_function(
    scopes: &mut ScopeStack,
    parent: ScopeId,
    function: &mut Function<'_>,
) -> Result<()> {
    let return_type = decorate_type(scopes, parent, &mut function.return_type)?;
    let scope = scopes.create_child_scope(parent);
    function.scope = Some(scope);

    let mut parameters = Vec::with_capacity(function.parameters.len());
    for parameter in &mut function.parameters {
        parameters.push(decorate_parameter(scopes, scope, parameter)?);
    }

    let id = scopes.add_function(parent, function.name, parameters, return_type);
    function.description = Some(id);
    trace!("decorating function {} ({}) in scope {}", function.name, id, scope);

    decorate_code_block(scopes, parent, Some(scope), &mut function.body)
}

fn decorate_parameter(
    scopes: &mut ScopeStack,
    scope: ScopeId,
    parameter: &mut FunctionParameter<'_>,
) -> Result<TypeId> {
    let name = parameter.variable.as_ref().map_or("<unnamed>", |v| v.name);
    let type_id = decorate_storage_type(scopes, scope, &mut parameter.ty, name)?;
    if let Some(variable) = &mut parameter.variable {
        variable.description = Some(scopes.add_local_variable(scope, variable.name, type_id));
    }
    Ok(type_id)
}

/// Decorate a block in `existing` if given, otherwise in a fresh child of
/// `parent`. Records how many stack bytes the block itself declares.
pub fn decorate_code_block(
    scopes: &mut ScopeStack,
    parent: ScopeId,
    existing: Option<ScopeId>,
    block: &mut CodeBlock<'_>,
) -> Result<()> {
    let scope = existing.unwrap_or_else(|| scopes.create_child_scope(parent));
    block.scope = Some(scope);
    let offset_before = scopes.scope(scope).stack_offset;
    for statement in &mut block.statements {
        decorate_statement(scopes, scope, statement)?;
    }
    block.local_bytes = scopes.scope(scope).stack_offset - offset_before;
    Ok(())
}

pub fn decorate_statement(
    scopes: &mut ScopeStack,
    scope: ScopeId,
    statement: &mut Statement<'_>,
) -> Result<()> {
    match statement {
        Statement::Instruction(instruction) => decorate_instruction(scopes, scope, instruction),
        Statement::Conditional(conditional) => {
            decorate_expression(scopes, scope, &mut conditional.condition)?;
            decorate_code_block(scopes, scope, None, &mut conditional.if_body)?;
            if let Some(else_body) = &mut conditional.else_body {
                decorate_code_block(scopes, scope, None, else_body)?;
            }
            Ok(())
        }
        Statement::CodeBlock(block) => decorate_code_block(scopes, scope, None, block),
        Statement::While(while_statement) => {
            decorate_expression(scopes, scope, &mut while_statement.condition)?;
            decorate_code_block(scopes, scope, None, &mut while_statement.body)
        }
        Statement::Do(do_statement) => {
            decorate_code_block(scopes, scope, None, &mut do_statement.body)?;
            decorate_expression(scopes, scope, &mut do_statement.condition)
        }
        Statement::For(for_statement) => decorate_for(scopes, scope, for_statement),
    }
}

// The init declaration, condition, increment and body all share one scope.
fn decorate_for(
    scopes: &mut ScopeStack,
    parent: ScopeId,
    for_statement: &mut ForStatement<'_>,
) -> Result<()> {
    let scope = scopes.create_child_scope(parent);
    for_statement.scope = Some(scope);
    decorate_declaration(scopes, scope, &mut for_statement.init)?;
    for_statement.init_bytes = scopes.scope(scope).local_bytes();
    if let Some(condition) = &mut for_statement.condition {
        decorate_expression(scopes, scope, condition)?;
    }
    if let Some(increment) = &mut for_statement.increment {
        decorate_expression(scopes, scope, increment)?;
    }
    decorate_code_block(scopes, parent, Some(scope), &mut for_statement.body)
}

fn decorate_instruction(
    scopes: &mut ScopeStack,
    scope: ScopeId,
    instruction: &mut Instruction<'_>,
) -> Result<()> {
    match instruction {
        Instruction::Return(ret) => match &mut ret.expression {
            Some(expression) => decorate_expression(scopes, scope, expression),
            None => Ok(()),
        },
        Instruction::InlineAsm(asm) => decorate_inline_asm(scopes, scope, asm),
        Instruction::Declaration(declaration) => decorate_declaration(scopes, scope, declaration),
        Instruction::Expression(expression) => decorate_expression(scopes, scope, expression),
    }
}

fn decorate_inline_asm(
    scopes: &mut ScopeStack,
    scope: ScopeId,
    asm: &mut InlineAsmStatement<'_>,
) -> Result<()> {
    for request in &mut asm.requests {
        decorate_variable(scopes, scope, &mut request.variable)?;
    }
    Ok(())
}

/// The initializer is resolved before the new name is visible, so
/// `int x = x;` refers to an outer `x`.
pub fn decorate_declaration(
    scopes: &mut ScopeStack,
    scope: ScopeId,
    declaration: &mut Declaration<'_>,
) -> Result<()> {
    if let Some(initializer) = &mut declaration.initializer {
        decorate_expression(scopes, scope, initializer)?;
    }
    let name = declaration.variable.name;
    let type_id = decorate_storage_type(scopes, scope, &mut declaration.ty, name)?;
    declaration.variable.description = Some(scopes.add_local_variable(scope, name, type_id));
    Ok(())
}

fn decorate_variable(
    scopes: &ScopeStack,
    scope: ScopeId,
    variable: &mut Variable<'_>,
) -> Result<()> {
    variable.description = Some(scopes.find_variable(scope, variable.name, variable.span)?);
    Ok(())
}

pub fn decorate_expression(
    scopes: &mut ScopeStack,
    scope: ScopeId,
    expression: &mut Expression<'_>,
) -> Result<()> {
    match expression {
        Expression::NumberLiteral(_) => Ok(()),
        Expression::Variable(variable) => decorate_variable(scopes, scope, variable),
        Expression::FunctionCall(call) => {
            for argument in &mut call.arguments {
                decorate_expression(scopes, scope, argument)?;
            }
            let id = scopes.find_function(scope, call.name, call.span)?;
            let expected = scopes.function(id).parameters.len();
            if expected != call.arguments.len() {
                return Err(ResolveError::ArgumentCountMismatch {
                    function: call.name.to_string(),
                    expected,
                    found: call.arguments.len(),
                    span: call.span,
                });
            }
            call.description = Some(id);
            Ok(())
        }
        Expression::BinaryOperation(operation) => {
            decorate_expression(scopes, scope, &mut operation.lhs)?;
            decorate_expression(scopes, scope, &mut operation.rhs)
        }
        Expression::Assign(assign) => {
            decorate_expression(scopes, scope, &mut assign.rhs)?;
            decorate_variable(scopes, scope, &mut assign.lhs)
        }
    }
}

/// Classes only get their member types resolved; their methods are never
/// lowered.
fn decorate_class(scopes: &mut ScopeStack, scope: ScopeId, class: &mut Class<'_>) -> Result<()> {
    for (attribute, _) in &mut class.attributes {
        decorate_storage_type(scopes, scope, &mut attribute.ty, attribute.name)?;
    }
    for (method, _) in &mut class.methods {
        decorate_type(scopes, scope, &mut method.return_type)?;
        for parameter in &mut method.parameters {
            let name = parameter.variable.as_ref().map_or("<unnamed>", |v| v.name);
            decorate_storage_type(scopes, scope, &mut parameter.ty, name)?;
        }
    }
    Ok(())
}
