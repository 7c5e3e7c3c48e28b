//! NASM Text Emitter
//!
//! Section buffers, label generation and the `_start` stub.

mod emitter;

#[cfg(test)]
mod tests;

pub use emitter::{NasmEmitter, START_SYMBOL};
