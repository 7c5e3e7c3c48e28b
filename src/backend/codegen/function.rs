//! Function and translation unit lowering

use super::context::CodegenContext;
use super::error::{CodegenError, Result};
use super::stmt::generate_block;
use crate::backend::x86_64::GpRegister;
use crate::common::ast::{Function, TranslationUnit};
use crate::frontend::decorator::ScopeStack;
use log::trace;
use std::collections::BTreeSet;

/// Global directive, label, prologue, parameter spills, body and a closing
/// epilogue for functions that fall off their end.
pub fn generate_function(ctx: &mut CodegenContext<'_>, function: &Function<'_>) -> Result<()> {
    if function.description.is_none() {
        return Err(CodegenError::undecorated("function", function.name));
    }
    if function.parameters.len() > GpRegister::ARG_REGS.len() {
        return Err(CodegenError::unimplemented(format!(
            "function `{}` with {} parameters (at most {} are passed in registers)",
            function.name,
            function.parameters.len(),
            GpRegister::ARG_REGS.len()
        )));
    }
    trace!("emitting function {}", function.name);

    ctx.emitter.emit_global_directive(function.name);
    ctx.emitter.emit_function_label(function.name);
    ctx.emitter.emit_save_base_pointer();
    ctx.emitter.emit_set_base_pointer_to_current_stack_pointer();

    for (parameter, reg) in function.parameters.iter().zip(GpRegister::ARG_REGS) {
        // Unnamed parameters have no slot
        let Some(variable) = &parameter.variable else {
            continue;
        };
        let location = ctx.location_of(variable)?;
        ctx.emitter.emit_declaration(&location)?;
        ctx.emitter.emit_store_in_memory(&location, reg)?;
    }

    generate_block(ctx, &function.body)?;

    ctx.emitter.emit_restore_base_pointer();
    ctx.emitter.emit_ret();
    Ok(())
}

/// Lower a decorated translation unit into one NASM listing.
pub fn generate_translation_unit(
    unit: &TranslationUnit<'_>,
    scopes: &ScopeStack,
    entry_point: &str,
) -> Result<String> {
    let mut ctx = CodegenContext::new(scopes, entry_point);

    // Prototypes of functions defined here need no extern symbol
    let defined: BTreeSet<&str> = unit.functions.iter().map(|f| f.name).collect();
    let mut declared = BTreeSet::new();
    for declaration in &unit.function_declarations {
        if !defined.contains(declaration.name) && declared.insert(declaration.name) {
            ctx.emitter.emit_extern_directive(declaration.name);
        }
    }

    for function in &unit.functions {
        generate_function(&mut ctx, function)?;
    }

    if let Some(class) = unit.classes.first() {
        return Err(CodegenError::unimplemented(format!(
            "code generation for class `{}`",
            class.name
        )));
    }

    Ok(ctx.finish())
}
