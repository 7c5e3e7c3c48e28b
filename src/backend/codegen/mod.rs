//! Decorated AST to NASM code generation
//!
//! # Overview
//!
//! Lowering is a single walk over the decorated tree:
//! 1. Extern directives for prototypes without a local definition
//! 2. Each function: prologue, parameter spills, body, epilogue
//! 3. Expressions evaluated into leased physical registers
//!
//! There is no spilling. Running out of registers is reported as
//! [`CodegenError::RegistersExhausted`].

pub mod context;
pub mod error;
pub mod expr;
pub mod function;
pub mod stmt;

#[cfg(test)]
mod tests;

pub use context::CodegenContext;
pub use error::CodegenError;
pub use function::{generate_function, generate_translation_unit};
