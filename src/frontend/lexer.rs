use crate::common::ast::Token;
use crate::common::span::{Span, Spanned};
use chumsky::prelude::*;

// Lexer
pub fn lexer<'src>()
-> impl Parser<'src, &'src str, Vec<Spanned<Token<'src>>>, extra::Err<Rich<'src, char, Span>>> {
    // Decimal numbers, rejected when they overflow 64 bits
    let num = text::int(10)
        .to_slice()
        .try_map(|digits: &str, span| {
            digits
                .parse::<u64>()
                .map(Token::Num)
                .map_err(|_| Rich::custom(span, "number literal does not fit in 64 bits"))
        });

    // String literal bodies are kept raw; escapes are processed by the parser
    let escape = just('\\').then(any()).ignored();
    let string = none_of("\\\"")
        .ignored()
        .or(escape)
        .repeated()
        .to_slice()
        .delimited_by(just('"'), just('"'))
        .map(Token::Str);

    // A parser for operators
    let op = choice((
        just("=="),
        just("!="),
        just("<="),
        just(">="),
        just("<"),
        just(">"),
        just("+"),
        just("-"),
        just("*"),
        just("/"),
        just("="),
    ))
    .map(Token::Op);

    // A parser for control characters
    let ctrl = one_of("(){};,:").map(Token::Ctrl);

    // A parser for identifiers and keywords
    let ident = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
                .repeated(),
        )
        .to_slice()
        .map(|ident: &str| match ident {
            "return" => Token::Return,
            "if" => Token::If,
            "else" => Token::Else,
            "while" => Token::While,
            "do" => Token::Do,
            "for" => Token::For,
            "asm" => Token::Asm,
            "extern" => Token::Extern,
            "class" => Token::Class,
            "public" => Token::Public,
            "protected" => Token::Protected,
            "private" => Token::Private,
            _ => Token::Ident(ident),
        });

    let token = choice((num, string, op, ctrl, ident));

    let line_comment = just("//")
        .then(any().and_is(just('\n').not()).repeated())
        .ignored();
    let block_comment = just("/*")
        .then(any().and_is(just("*/").not()).repeated())
        .then(just("*/"))
        .ignored();
    let comment = line_comment.or(block_comment).padded();

    let tokens = token
        .map_with(|tok, e| (tok, e.span()))
        .padded_by(comment.clone().repeated())
        .padded()
        // If we encounter an error, skip and attempt to lex the next character as a token instead
        .recover_with(skip_then_retry_until(any().ignored(), end()))
        .repeated()
        .collect::<Vec<_>>();

    // Sources made only of comments and whitespace lex to no tokens
    comment.repeated().ignore_then(tokens)
}

/// Process the escape sequences of a raw string literal body.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
