//! Statement lowering
//!
//! Control flow uses emitter-unique local labels. Blocks give back the stack
//! bytes they declared when they end, so loops do not grow the frame.

use super::context::CodegenContext;
use super::error::Result;
use super::expr::load_value_in_register;
use crate::backend::x86_64::GpRegister;
use crate::common::ast::{
    CodeBlock, ConditionalStatement, Declaration, DoStatement, Expression, ForStatement,
    InlineAsmStatement, Instruction, ReturnStatement, Statement, WhileStatement,
};

pub fn generate_statement(ctx: &mut CodegenContext<'_>, statement: &Statement<'_>) -> Result<()> {
    match statement {
        Statement::Instruction(instruction) => generate_instruction(ctx, instruction),
        Statement::Conditional(conditional) => generate_conditional(ctx, conditional),
        Statement::CodeBlock(block) => generate_block(ctx, block),
        Statement::While(while_statement) => generate_while(ctx, while_statement),
        Statement::Do(do_statement) => generate_do(ctx, do_statement),
        Statement::For(for_statement) => generate_for(ctx, for_statement),
    }
}

pub fn generate_block(ctx: &mut CodegenContext<'_>, block: &CodeBlock<'_>) -> Result<()> {
    for statement in &block.statements {
        generate_statement(ctx, statement)?;
    }
    ctx.emitter.emit_stack_release(block.local_bytes);
    Ok(())
}

fn generate_instruction(ctx: &mut CodegenContext<'_>, instruction: &Instruction<'_>) -> Result<()> {
    match instruction {
        Instruction::Return(ret) => generate_return(ctx, ret),
        Instruction::InlineAsm(asm) => generate_inline_asm(ctx, asm),
        Instruction::Declaration(declaration) => generate_declaration(ctx, declaration),
        Instruction::Expression(expression) => {
            // Evaluated for its side effects only
            let scratch = ctx.emitter.acquire_register("evaluating an expression statement")?;
            load_value_in_register(ctx, expression, scratch.reg())
        }
    }
}

fn generate_return(ctx: &mut CodegenContext<'_>, ret: &ReturnStatement<'_>) -> Result<()> {
    if let Some(expression) = &ret.expression {
        load_value_in_register(ctx, expression, GpRegister::RETURN_REG)?;
    }
    ctx.emitter.emit_restore_base_pointer();
    ctx.emitter.emit_ret();
    Ok(())
}

fn generate_inline_asm(ctx: &mut CodegenContext<'_>, asm: &InlineAsmStatement<'_>) -> Result<()> {
    for request in &asm.requests {
        let location = ctx.location_of(&request.variable)?;
        ctx.emitter.emit_load_from_memory(request.register, &location)?;
    }
    ctx.emitter.emit_inline_asm(&asm.asm_block);
    Ok(())
}

pub fn generate_declaration(ctx: &mut CodegenContext<'_>, declaration: &Declaration<'_>) -> Result<()> {
    let location = ctx.location_of(&declaration.variable)?;
    ctx.emitter.emit_declaration(&location)?;
    if let Some(initializer) = &declaration.initializer {
        let value = ctx.emitter.acquire_register("initializing a declaration")?;
        load_value_in_register(ctx, initializer, value.reg())?;
        ctx.emitter.emit_store_in_memory(&location, value.reg())?;
    }
    Ok(())
}

/// Evaluate `condition` and jump to `label` when it is zero.
fn jump_if_false(ctx: &mut CodegenContext<'_>, condition: &Expression<'_>, label: &str) -> Result<()> {
    let value = ctx.emitter.acquire_register("evaluating a condition")?;
    load_value_in_register(ctx, condition, value.reg())?;
    ctx.emitter.emit_conditional_jump(label, value.reg());
    Ok(())
}

fn generate_conditional(
    ctx: &mut CodegenContext<'_>,
    conditional: &ConditionalStatement<'_>,
) -> Result<()> {
    let end_label = ctx.emitter.generate_unique_label("if_end");
    match &conditional.else_body {
        Some(else_body) => {
            let else_label = ctx.emitter.generate_unique_label("else");
            jump_if_false(ctx, &conditional.condition, &else_label)?;
            generate_block(ctx, &conditional.if_body)?;
            ctx.emitter.emit_jump(&end_label);
            ctx.emitter.emit_label(&else_label);
            generate_block(ctx, else_body)?;
        }
        None => {
            jump_if_false(ctx, &conditional.condition, &end_label)?;
            generate_block(ctx, &conditional.if_body)?;
        }
    }
    ctx.emitter.emit_label(&end_label);
    Ok(())
}

fn generate_while(ctx: &mut CodegenContext<'_>, while_statement: &WhileStatement<'_>) -> Result<()> {
    let top_label = ctx.emitter.emit_unique_label("while_top");
    let end_label = ctx.emitter.generate_unique_label("while_end");
    jump_if_false(ctx, &while_statement.condition, &end_label)?;
    generate_block(ctx, &while_statement.body)?;
    ctx.emitter.emit_jump(&top_label);
    ctx.emitter.emit_label(&end_label);
    Ok(())
}

fn generate_do(ctx: &mut CodegenContext<'_>, do_statement: &DoStatement<'_>) -> Result<()> {
    let top_label = ctx.emitter.emit_unique_label("do_top");
    let end_label = ctx.emitter.generate_unique_label("do_end");
    generate_block(ctx, &do_statement.body)?;
    jump_if_false(ctx, &do_statement.condition, &end_label)?;
    ctx.emitter.emit_jump(&top_label);
    ctx.emitter.emit_label(&end_label);
    Ok(())
}

fn generate_for(ctx: &mut CodegenContext<'_>, for_statement: &ForStatement<'_>) -> Result<()> {
    generate_declaration(ctx, &for_statement.init)?;
    let test_label = ctx.emitter.emit_unique_label("for_test");
    let end_label = ctx.emitter.generate_unique_label("for_end");
    if let Some(condition) = &for_statement.condition {
        jump_if_false(ctx, condition, &end_label)?;
    }
    generate_block(ctx, &for_statement.body)?;
    if let Some(increment) = &for_statement.increment {
        let scratch = ctx.emitter.acquire_register("evaluating a loop increment")?;
        load_value_in_register(ctx, increment, scratch.reg())?;
    }
    ctx.emitter.emit_jump(&test_label);
    ctx.emitter.emit_label(&end_label);
    ctx.emitter.emit_stack_release(for_statement.init_bytes);
    Ok(())
}
