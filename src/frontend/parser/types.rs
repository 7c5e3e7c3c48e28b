use crate::common::ast::{Token, Type};
use crate::common::span::Span;
use chumsky::{input::ValueInput, prelude::*};

// Type parser: a type name followed by any number of `*`
pub fn type_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Type<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    select! { Token::Ident(name) => name }
        .then(just(Token::Op("*")).repeated().count())
        .map_with(|(name, pointer_depth), e| Type::new(name, pointer_depth, e.span()))
        .labelled("type")
        .boxed()
}
