pub mod ast;
pub mod span;
pub mod types;
