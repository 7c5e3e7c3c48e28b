//! Front end: lexing, parsing, debug dumps and the decoration pass.

pub mod decorator;
pub mod dump;
pub mod lexer;
pub mod parser;

#[cfg(test)]
mod tests;
