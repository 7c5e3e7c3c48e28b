use super::expr::expr_parser;
use super::types::type_parser;
use crate::backend::x86_64::GpRegister;
use crate::common::ast::{
    BindingRequest, CodeBlock, ConditionalStatement, Declaration, DoStatement, ForStatement,
    InlineAsmStatement, Instruction, ReturnStatement, Statement, Token, Variable,
    WhileStatement,
};
use crate::common::span::Span;
use crate::frontend::lexer::unescape;
use chumsky::{input::ValueInput, prelude::*};

// Declaration: `type name` with an optional initializer
pub fn declaration_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Declaration<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    type_parser()
        .then(select! { Token::Ident(name) => name }.map_with(|name, e| Variable::new(name, e.span())))
        .then(just(Token::Op("=")).ignore_then(expr_parser()).or_not())
        .map(|((ty, variable), initializer)| Declaration {
            ty,
            variable,
            initializer,
        })
        .labelled("declaration")
        .boxed()
}

// `asm("..." "..." : "=rsi"(str), ...);`
fn inline_asm_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, InlineAsmStatement<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    let string = select! { Token::Str(raw) => raw };

    // Adjacent literals concatenate
    let asm_block = string
        .clone()
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|parts| parts.into_iter().map(unescape).collect::<String>());

    let register = string.try_map(|raw, span| {
        raw.strip_prefix('=')
            .and_then(GpRegister::from_name)
            .ok_or_else(|| {
                Rich::custom(
                    span,
                    format!("`{}` does not name a 64-bit register binding like \"=rsi\"", raw),
                )
            })
    });

    let binding = register
        .then(
            select! { Token::Ident(name) => name }
                .map_with(|name, e| Variable::new(name, e.span()))
                .delimited_by(just(Token::Ctrl('(')), just(Token::Ctrl(')'))),
        )
        .map(|(register, variable)| BindingRequest { register, variable });

    let bindings = just(Token::Ctrl(':'))
        .ignore_then(
            binding
                .separated_by(just(Token::Ctrl(',')))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .or_not()
        .map(Option::unwrap_or_default);

    just(Token::Asm)
        .ignore_then(
            asm_block
                .then(bindings)
                .delimited_by(just(Token::Ctrl('(')), just(Token::Ctrl(')'))),
        )
        .then_ignore(just(Token::Ctrl(';')))
        .map(|(asm_block, requests)| InlineAsmStatement {
            asm_block,
            requests,
        })
        .labelled("inline assembly")
        .boxed()
}

// Block parser: `{ statement* }`
pub fn block_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, CodeBlock<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    recursive(|block| {
        let statement = stmt_parser(block.clone());
        statement
            .repeated()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::Ctrl('{')), just(Token::Ctrl('}')))
            .map(CodeBlock::new)
            .labelled("block")
    })
    .boxed()
}

// Statement parser
pub fn stmt_parser<'tokens, 'src: 'tokens, I>(
    block: impl Parser<'tokens, I, CodeBlock<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>>
        + Clone
        + 'tokens,
) -> impl Parser<'tokens, I, Statement<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    recursive(|statement| {
        let expr = expr_parser();
        let semicolon = just(Token::Ctrl(';'));

        let condition = expr
            .clone()
            .delimited_by(just(Token::Ctrl('(')), just(Token::Ctrl(')')));

        // `else` takes a block or a single statement, which gets wrapped in a block
        let else_body = block.clone().or(statement.map(|s| match s {
            Statement::CodeBlock(block) => block,
            other => CodeBlock::new(vec![other]),
        }));

        let if_stmt = just(Token::If)
            .ignore_then(condition.clone())
            .then(block.clone())
            .then(just(Token::Else).ignore_then(else_body).or_not())
            .map(|((condition, if_body), else_body)| {
                Statement::Conditional(ConditionalStatement {
                    condition,
                    if_body,
                    else_body,
                })
            });

        let while_stmt = just(Token::While)
            .ignore_then(condition.clone())
            .then(block.clone())
            .map(|(condition, body)| Statement::While(WhileStatement { condition, body }));

        let do_stmt = just(Token::Do)
            .ignore_then(block.clone())
            .then_ignore(just(Token::While))
            .then(condition)
            .then_ignore(semicolon.clone())
            .map(|(body, condition)| Statement::Do(DoStatement { condition, body }));

        let for_stmt = just(Token::For)
            .ignore_then(
                declaration_parser()
                    .then_ignore(semicolon.clone())
                    .then(expr.clone().or_not())
                    .then_ignore(semicolon.clone())
                    .then(expr.clone().or_not())
                    .delimited_by(just(Token::Ctrl('(')), just(Token::Ctrl(')'))),
            )
            .then(block.clone())
            .map(|(((init, condition), increment), body)| {
                Statement::For(ForStatement {
                    init,
                    condition,
                    increment,
                    body,
                    scope: None,
                    init_bytes: 0,
                })
            });

        let return_stmt = just(Token::Return)
            .ignore_then(expr.clone().or_not())
            .then_ignore(semicolon.clone())
            .map(|expression| Instruction::Return(ReturnStatement { expression }));

        let asm_stmt = inline_asm_parser().map(Instruction::InlineAsm);

        let declaration_stmt = declaration_parser()
            .then_ignore(semicolon.clone())
            .map(Instruction::Declaration);

        let expr_stmt = expr
            .then_ignore(semicolon)
            .map(Instruction::Expression);

        let instruction = choice((return_stmt, asm_stmt, declaration_stmt, expr_stmt))
            .map(Statement::Instruction);

        choice((
            block.map(Statement::CodeBlock),
            if_stmt,
            while_stmt,
            do_stmt,
            for_stmt,
            instruction,
        ))
        .labelled("statement")
    })
    .boxed()
}
