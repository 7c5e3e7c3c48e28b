// Pretty error reporting with source highlighting using ariadne

use crate::backend::codegen::CodegenError;
use crate::common::span::Span;
use crate::frontend::decorator::ResolveError;
use crate::pipeline::{CompileError, SyntaxError};
use ariadne::{Color, Label, Report, ReportKind, Source};
use log::error;
use std::ops::Range;

type SourceReport = Report<'static, Range<usize>>;

/// Print every diagnostic carried by `error` to stderr.
pub fn report_compile_error(filename: &str, source: &str, error: &CompileError) {
    let reports = build_reports(error);
    for report in reports {
        if let Err(io_error) = report.eprint(Source::from(source)) {
            error!("failed to print diagnostic: {}", io_error);
        }
    }
    match error_span(error) {
        Some(span) => eprintln!("  --> {}:{}", filename, get_line_col(source, span.start)),
        None => eprintln!("  --> {}", filename),
    }
}

fn error_span(error: &CompileError) -> Option<Span> {
    match error {
        CompileError::Lex(errors) | CompileError::Parse(errors) => errors.first().map(|e| e.span),
        CompileError::Resolve(e) => Some(e.span()),
        CompileError::Codegen(_) => None,
    }
}

fn get_line_col(source: &str, offset: usize) -> String {
    let mut line = 1;
    let mut col = 1;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    format!("{}:{}", line, col)
}

fn build_reports(error: &CompileError) -> Vec<SourceReport> {
    match error {
        CompileError::Lex(errors) => errors
            .iter()
            .map(|e| syntax_report(e, "E001", "Unrecognized input"))
            .collect(),
        CompileError::Parse(errors) => errors
            .iter()
            .map(|e| syntax_report(e, "E002", "Syntax error"))
            .collect(),
        CompileError::Resolve(e) => vec![resolve_report(e)],
        CompileError::Codegen(e) => vec![codegen_report(e)],
    }
}

fn syntax_report(error: &SyntaxError, code: &str, title: &str) -> SourceReport {
    let range = error.span.start..error.span.end;
    Report::build(ReportKind::Error, range.clone())
        .with_code(code)
        .with_message(title)
        .with_label(
            Label::new(range)
                .with_message(&error.message)
                .with_color(Color::Red),
        )
        .finish()
}

/// Build an ariadne Report from a ResolveError
fn resolve_report(error: &ResolveError) -> SourceReport {
    let span = error.span();
    let range = span.start..span.end;
    let builder = Report::build(ReportKind::Error, range.clone()).with_code(error.code());
    match error {
        ResolveError::TypeNotFound { name, .. } => builder
            .with_message(format!("Cannot find type `{}`", name))
            .with_label(
                Label::new(range)
                    .with_message("unknown type")
                    .with_color(Color::Red),
            )
            .with_help("Built-in types are `void`, `char` and `int`")
            .finish(),

        ResolveError::VariableNotFound { name, .. } => builder
            .with_message(format!("Cannot find variable `{}` in this scope", name))
            .with_label(
                Label::new(range)
                    .with_message("not found in this scope")
                    .with_color(Color::Red),
            )
            .with_help("Make sure the variable is declared before use")
            .finish(),

        ResolveError::FunctionNotFound { name, .. } => builder
            .with_message(format!("Cannot find function `{}`", name))
            .with_label(
                Label::new(range)
                    .with_message("not declared before this call")
                    .with_color(Color::Red),
            )
            .with_help("Define the function earlier or add a prototype such as `extern int f(int);`")
            .finish(),

        ResolveError::ArgumentCountMismatch {
            function,
            expected,
            found,
            ..
        } => builder
            .with_message(format!("Wrong number of arguments to `{}`", function))
            .with_label(
                Label::new(range)
                    .with_message(format!("expected {} arguments, found {}", expected, found))
                    .with_color(Color::Red),
            )
            .finish(),

        ResolveError::VoidVariable { name, .. } => builder
            .with_message(format!("`{}` cannot have type `void`", name))
            .with_label(
                Label::new(range)
                    .with_message("`void` has no storage")
                    .with_color(Color::Red),
            )
            .finish(),
    }
}

// Codegen errors carry no span, so the report has no label
fn codegen_report(error: &CodegenError) -> SourceReport {
    let code = match error {
        CodegenError::RegistersExhausted { .. } => "E201",
        CodegenError::Unimplemented { .. } => "E202",
        CodegenError::Undecorated { .. } => "E203",
    };
    let builder = Report::build(ReportKind::Error, 0..0)
        .with_code(code)
        .with_message(error.to_string());
    match error {
        CodegenError::RegistersExhausted { .. } => builder
            .with_help("Split the expression into smaller statements using temporaries")
            .finish(),
        _ => builder.finish(),
    }
}
