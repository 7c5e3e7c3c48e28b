use super::stmt::block_parser;
use super::types::type_parser;
use crate::common::ast::{
    Attribute, Class, Function, FunctionDeclaration, FunctionParameter, Method, Token,
    TranslationUnit, Variable, Visibility,
};
use crate::common::span::Span;
use chumsky::{input::ValueInput, prelude::*};

enum Item<'src> {
    Declaration(FunctionDeclaration<'src>),
    Function(Function<'src>),
    Class(Class<'src>),
}

enum Member<'src> {
    Access(Visibility),
    Attribute(Attribute<'src>),
    Method(Method<'src>),
}

// Parameter list; `named` requires every parameter to carry a name
fn parameters_parser<'tokens, 'src: 'tokens, I>(
    named: bool,
) -> impl Parser<'tokens, I, Vec<FunctionParameter<'src>>, extra::Err<Rich<'tokens, Token<'src>, Span>>>
       + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    let name = select! { Token::Ident(name) => name }.map_with(|name, e| Variable::new(name, e.span()));
    let name = if named {
        name.map(Some).boxed()
    } else {
        name.or_not().boxed()
    };

    type_parser()
        .then(name)
        .map(|(ty, variable)| FunctionParameter { ty, variable })
        .separated_by(just(Token::Ctrl(',')))
        .collect::<Vec<_>>()
        .delimited_by(just(Token::Ctrl('(')), just(Token::Ctrl(')')))
        .labelled("parameters")
        .boxed()
}

// Function definition parser
pub fn function_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Function<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    type_parser()
        .then(select! { Token::Ident(name) => name }.map_with(|name, e| (name, e.span())))
        .then(parameters_parser(true))
        .then(block_parser())
        .map(|(((return_type, (name, span)), parameters), body)| Function {
            return_type,
            name,
            span,
            parameters,
            body,
            description: None,
            scope: None,
        })
        .labelled("function")
        .boxed()
}

// Prototype parser: `extern int f(int);` or `int f(int x);`
pub fn function_declaration_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, FunctionDeclaration<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>>
       + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    just(Token::Extern)
        .or_not()
        .then(type_parser())
        .then(select! { Token::Ident(name) => name }.map_with(|name, e| (name, e.span())))
        .then(parameters_parser(false))
        .then_ignore(just(Token::Ctrl(';')))
        .map(
            |(((is_extern, return_type), (name, span)), parameters)| FunctionDeclaration {
                is_extern: is_extern.is_some(),
                return_type,
                name,
                span,
                parameters,
                description: None,
            },
        )
        .labelled("function declaration")
        .boxed()
}

// Class parser; members are private until an access specifier says otherwise
pub fn class_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Class<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    let access = select! {
        Token::Public => Visibility::Public,
        Token::Protected => Visibility::Protected,
        Token::Private => Visibility::Private,
    }
    .then_ignore(just(Token::Ctrl(':')))
    .map(Member::Access);

    let method = type_parser()
        .then(select! { Token::Ident(name) => name })
        .then(parameters_parser(true))
        .then(block_parser())
        .map(|(((return_type, name), parameters), body)| {
            Member::Method(Method {
                return_type,
                name,
                parameters,
                body,
            })
        });

    let attribute = type_parser()
        .then(select! { Token::Ident(name) => name })
        .then_ignore(just(Token::Ctrl(';')))
        .map(|(ty, name)| Member::Attribute(Attribute { ty, name }));

    let members = choice((access, method, attribute))
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::Ctrl('{')), just(Token::Ctrl('}')));

    just(Token::Class)
        .ignore_then(select! { Token::Ident(name) => name }.map_with(|name, e| (name, e.span())))
        .then(members)
        .then_ignore(just(Token::Ctrl(';')))
        .map(|((name, span), members)| {
            let mut class = Class {
                name,
                span,
                attributes: Vec::new(),
                methods: Vec::new(),
            };
            let mut visibility = Visibility::Private;
            for member in members {
                match member {
                    Member::Access(v) => visibility = v,
                    Member::Attribute(attribute) => class.attributes.push((attribute, visibility)),
                    Member::Method(method) => class.methods.push((method, visibility)),
                }
            }
            class
        })
        .labelled("class")
        .boxed()
}

// Translation unit parser
pub fn program_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, TranslationUnit<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>>
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    let item = choice((
        class_parser().map(Item::Class),
        function_parser().map(Item::Function),
        function_declaration_parser().map(Item::Declaration),
    ));

    item.repeated()
        .collect::<Vec<_>>()
        .map(|items| {
            let mut unit = TranslationUnit::default();
            for item in items {
                match item {
                    Item::Declaration(declaration) => unit.function_declarations.push(declaration),
                    Item::Function(function) => unit.functions.push(function),
                    Item::Class(class) => unit.classes.push(class),
                }
            }
            unit
        })
        .then_ignore(end())
        .boxed()
}
