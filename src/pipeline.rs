//! zpp Compiler Pipeline
//!
//! End-to-end compilation from source text to NASM assembly.
//!
//! # Pipeline Stages
//!
//! ```text
//! Source Code (&str)
//!     │
//!     ▼ lexer
//! Tokens (Vec<Spanned<Token>>)
//!     │
//!     ▼ parser
//! AST (TranslationUnit)
//!     │
//!     ▼ decorate
//! Decorated AST + ScopeStack
//!     │
//!     ▼ codegen
//! NASM assembly (String)
//! ```
//!
//! Every stage either succeeds completely or returns a [`CompileError`];
//! no partial assembly is ever produced.

use crate::backend::codegen::{generate_translation_unit, CodegenError};
use crate::common::ast::TranslationUnit;
use crate::common::span::Span;
use crate::frontend::decorator::{decorate_translation_unit, ResolveError, ScopeStack};
use crate::frontend::dump::dump_translation_unit;
use crate::frontend::lexer::lexer;
use crate::frontend::parser::program_parser;
use crate::report::report_compile_error;
use chumsky::prelude::*;
use log::{debug, info};
use std::fmt::Display;

/// Name of the function `_start` calls when none is configured.
pub const DEFAULT_ENTRY_POINT: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Function that receives control from the synthesized `_start`
    pub entry_point: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

/// A lexer or parser diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

impl SyntaxError {
    fn from_rich<T: Display>(error: &Rich<'_, T, Span>) -> Self {
        Self {
            message: error.to_string(),
            span: *error.span(),
        }
    }
}

fn join_messages(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Compilation error types
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("lexer error: {}", join_messages(.0))]
    Lex(Vec<SyntaxError>),

    #[error("parse error: {}", join_messages(.0))]
    Parse(Vec<SyntaxError>),

    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("code generation error: {0}")]
    Codegen(#[from] CodegenError),
}

/// Result of a successful compilation
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The generated NASM assembly
    pub assembly: String,
    /// Indented dump of the decorated tree
    pub ast_dump: String,
    /// Every scope with its declarations
    pub scope_dump: String,
}

/// Lex and parse `source` into an undecorated translation unit.
pub fn parse(source: &str) -> Result<TranslationUnit<'_>, CompileError> {
    // Stage 1: Lexical analysis
    let tokens = lexer().parse(source).into_result().map_err(|errors| {
        CompileError::Lex(errors.iter().map(SyntaxError::from_rich).collect())
    })?;
    debug!("lexed {} tokens", tokens.len());

    // Stage 2: Parsing
    let eoi = (source.len()..source.len()).into();
    let token_stream = tokens.as_slice().map(eoi, |(t, s)| (t, s));
    program_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errors| CompileError::Parse(errors.iter().map(SyntaxError::from_rich).collect()))
}

/// Compile source code to NASM assembly
///
/// # Example
///
/// ```
/// use zpp::pipeline::{compile, CompileOptions};
///
/// let source = "int main() { return 41 + 1; }";
/// let output = compile(source, &CompileOptions::default()).unwrap();
/// assert!(output.assembly.contains("main:"));
/// assert!(output.assembly.contains("_start:"));
/// ```
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
    info!("parsing");
    let mut unit = parse(source)?;
    info!(
        "parsed {} declarations, {} functions, {} classes",
        unit.function_declarations.len(),
        unit.functions.len(),
        unit.classes.len()
    );

    // Stage 3: Decoration
    let mut scopes = ScopeStack::new();
    decorate_translation_unit(&mut scopes, &mut unit)?;
    let ast_dump = dump_translation_unit(&unit);
    let scope_dump = scopes.dump();
    debug!("decorated tree:\n{}", ast_dump);
    debug!("scopes:\n{}", scope_dump);

    // Stage 4: Code generation
    info!("generating code (entry point `{}`)", options.entry_point);
    let assembly = generate_translation_unit(&unit, &scopes, &options.entry_point)?;

    Ok(CompileOutput {
        assembly,
        ast_dump,
        scope_dump,
    })
}

/// Compile source code and report errors with source context
///
/// # Returns
///
/// * `Ok(CompileOutput)` - The generated assembly and dumps
/// * `Err(())` - Compilation failed (errors printed to stderr)
#[allow(clippy::result_unit_err)]
pub fn compile_and_report(
    filename: &str,
    source: &str,
    options: &CompileOptions,
) -> Result<CompileOutput, ()> {
    compile(source, options).map_err(|error| report_compile_error(filename, source, &error))
}
