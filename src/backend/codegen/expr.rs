//! Expression lowering
//!
//! Every expression is evaluated into a caller-chosen target register.
//! Temporaries are leases, so every register taken here is back in the
//! pool when the call returns, on success and on error alike.

use super::context::CodegenContext;
use super::error::{CodegenError, Result};
use crate::backend::x86_64::GpRegister;
use crate::common::ast::{Assign, BinaryOperation, BinaryOperator, Expression, FunctionCall};

/// Leave the value of `expression` in `target`.
pub fn load_value_in_register(
    ctx: &mut CodegenContext<'_>,
    expression: &Expression<'_>,
    target: GpRegister,
) -> Result<()> {
    match expression {
        Expression::NumberLiteral(literal) => {
            ctx.emitter.emit_load_number_literal(target, literal.value);
            Ok(())
        }
        Expression::Variable(variable) => {
            let location = ctx.location_of(variable)?;
            ctx.emitter.emit_load_from_memory(target, &location)
        }
        Expression::FunctionCall(call) => load_call(ctx, call, target),
        Expression::BinaryOperation(operation) => load_binary_operation(ctx, operation, target),
        Expression::Assign(assign) => load_assign(ctx, assign, target),
    }
}

fn load_binary_operation(
    ctx: &mut CodegenContext<'_>,
    operation: &BinaryOperation<'_>,
    target: GpRegister,
) -> Result<()> {
    let lhs = ctx.emitter.acquire_register("evaluating a binary operation")?;
    load_value_in_register(ctx, &operation.lhs, lhs.reg())?;
    let rhs = ctx.emitter.acquire_register("evaluating a binary operation")?;
    load_value_in_register(ctx, &operation.rhs, rhs.reg())?;

    let (l, r) = (lhs.reg(), rhs.reg());
    match operation.op {
        BinaryOperator::Add => ctx.emitter.emit_add(l, r),
        BinaryOperator::Subtract => ctx.emitter.emit_sub(l, r),
        BinaryOperator::Multiply => ctx.emitter.emit_mul(l, r),
        BinaryOperator::Divide => ctx.emitter.emit_div(l, r),
        BinaryOperator::Compare(cond) => {
            ctx.emitter.emit_cmp(l, r);
            ctx.emitter.emit_set_cc(l, cond);
        }
    }
    ctx.emitter.emit_move(target, l);
    Ok(())
}

fn load_assign(
    ctx: &mut CodegenContext<'_>,
    assign: &Assign<'_>,
    target: GpRegister,
) -> Result<()> {
    let location = ctx.location_of(&assign.lhs)?;
    let value = ctx.emitter.acquire_register("evaluating an assignment")?;
    load_value_in_register(ctx, &assign.rhs, value.reg())?;
    ctx.emitter.emit_store_in_memory(&location, value.reg())?;
    // The expression's value is what the slot now holds, narrowed to its width
    ctx.emitter.emit_load_from_memory(target, &location)
}

/// System V call: live registers other than `target` are saved around the
/// call, arguments travel through the stack into the argument registers.
fn load_call(
    ctx: &mut CodegenContext<'_>,
    call: &FunctionCall<'_>,
    target: GpRegister,
) -> Result<()> {
    let id = call
        .description
        .ok_or_else(|| CodegenError::undecorated("function call", call.name))?;
    if call.arguments.len() > GpRegister::ARG_REGS.len() {
        return Err(CodegenError::unimplemented(format!(
            "call to `{}` with {} arguments (at most {} are passed in registers)",
            call.name,
            call.arguments.len(),
            GpRegister::ARG_REGS.len()
        )));
    }
    let name = ctx.scopes().function(id).name.as_str();

    let saved: Vec<GpRegister> = ctx
        .emitter
        .registers()
        .taken_registers()
        .into_iter()
        .filter(|reg| *reg != target)
        .collect();
    for reg in &saved {
        ctx.emitter.emit_push(*reg);
    }

    for argument in &call.arguments {
        let value = ctx.emitter.acquire_register("evaluating a call argument")?;
        load_value_in_register(ctx, argument, value.reg())?;
        ctx.emitter.emit_push(value.reg());
    }
    for reg in GpRegister::ARG_REGS[..call.arguments.len()].iter().rev() {
        ctx.emitter.emit_pop(*reg);
    }

    ctx.emitter.emit_call(name);
    ctx.emitter.emit_move(target, GpRegister::RETURN_REG);

    for reg in saved.iter().rev() {
        ctx.emitter.emit_pop(*reg);
    }
    Ok(())
}
