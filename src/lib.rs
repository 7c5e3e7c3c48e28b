//! zpp: a small C-like language compiled to x86-64 NASM assembly.

pub mod backend;
pub mod common;
pub mod frontend;
pub mod pipeline;
pub mod report;
