use crate::common::ast::{Expression, Statement, Token, TranslationUnit, Type};
use crate::common::span::Spanned;
use crate::frontend::lexer::lexer;
use crate::frontend::parser::{block_parser, expr_parser, program_parser, stmt_parser, type_parser};
use chumsky::prelude::*;

pub fn parse_tokens(src: &str) -> Vec<Spanned<Token<'_>>> {
    lexer().parse(src).into_result().unwrap()
}

pub fn parse_expr(src: &str) -> Option<Expression<'_>> {
    let tokens = parse_tokens(src);
    expr_parser()
        .parse(tokens.as_slice().map((src.len()..src.len()).into(), |(t, s)| (t, s)))
        .into_result()
        .ok()
}

pub fn parse_statement(src: &str) -> Option<Statement<'_>> {
    let tokens = parse_tokens(src);
    stmt_parser(block_parser())
        .parse(tokens.as_slice().map((src.len()..src.len()).into(), |(t, s)| (t, s)))
        .into_result()
        .ok()
}

pub fn parse_type(src: &str) -> Option<Type<'_>> {
    let tokens = parse_tokens(src);
    type_parser()
        .parse(tokens.as_slice().map((src.len()..src.len()).into(), |(t, s)| (t, s)))
        .into_result()
        .ok()
}

pub fn parse_program(src: &str) -> Option<TranslationUnit<'_>> {
    let tokens = parse_tokens(src);
    program_parser()
        .parse(tokens.as_slice().map((src.len()..src.len()).into(), |(t, s)| (t, s)))
        .into_result()
        .ok()
}
