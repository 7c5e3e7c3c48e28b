//! Compiler backend
//!
//! Lowers a decorated syntax tree straight to NASM assembly text.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ Decorated AST   │────▶│    codegen      │────▶│   NasmEmitter   │────▶ String
//! │ + ScopeStack    │     │ (leased regs)   │     │ (section bufs)  │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - `x86_64`: registers, the physical register set and instructions
//! - `emit`: the section-buffered NASM emitter
//! - `codegen`: expression, statement and function lowering

pub mod codegen;
pub mod emit;
pub mod x86_64;

pub use codegen::{generate_translation_unit, CodegenError};
pub use emit::NasmEmitter;
