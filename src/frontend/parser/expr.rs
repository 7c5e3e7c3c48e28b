use crate::backend::x86_64::Condition;
use crate::common::ast::{BinaryOperator, Expression, FunctionCall, Token, Variable};
use crate::common::span::Span;
use chumsky::{input::ValueInput, prelude::*};

// Expression parser
pub fn expr_parser<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Expression<'src>, extra::Err<Rich<'tokens, Token<'src>, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token<'src>, Span = Span>,
{
    recursive(|expr| {
        let ident = select! { Token::Ident(name) => name }.labelled("identifier");

        // Literals
        let lit = select! { Token::Num(n) => Expression::number(n) }.labelled("number");

        // Variables
        let var = ident
            .map_with(|name, e| Expression::Variable(Variable::new(name, e.span())))
            .labelled("variable");

        // Parenthesized expression
        let paren = expr
            .clone()
            .delimited_by(just(Token::Ctrl('(')), just(Token::Ctrl(')')));

        // Function call
        let call = ident
            .then(
                expr.clone()
                    .separated_by(just(Token::Ctrl(',')))
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::Ctrl('(')), just(Token::Ctrl(')'))),
            )
            .map_with(|(name, arguments), e| {
                Expression::FunctionCall(FunctionCall::new(name, arguments, e.span()))
            });

        let atom = choice((call, lit, var, paren)).boxed();

        // Multiplication and division
        let op_mul = just(Token::Op("*")).to(BinaryOperator::Multiply);
        let op_div = just(Token::Op("/")).to(BinaryOperator::Divide);
        let product = atom.clone().foldl(
            choice((op_mul, op_div)).then(atom).repeated(),
            |lhs, (op, rhs)| Expression::binary(op, lhs, rhs),
        );

        // Addition and subtraction
        let op_add = just(Token::Op("+")).to(BinaryOperator::Add);
        let op_sub = just(Token::Op("-")).to(BinaryOperator::Subtract);
        let sum = product.clone().foldl(
            choice((op_add, op_sub)).then(product).repeated(),
            |lhs, (op, rhs)| Expression::binary(op, lhs, rhs),
        );

        // Comparisons
        let cmp = |symbol: &'static str, cond| {
            just(Token::Op(symbol)).to(BinaryOperator::Compare(cond))
        };
        let op_cmp = choice((
            cmp("==", Condition::E),
            cmp("!=", Condition::Ne),
            cmp("<=", Condition::Le),
            cmp(">=", Condition::Ge),
            cmp("<", Condition::L),
            cmp(">", Condition::G),
        ));
        let comparison = sum.clone().foldl(op_cmp.then(sum).repeated(), |lhs, (op, rhs)| {
            Expression::binary(op, lhs, rhs)
        });

        // Assignment is right associative and only targets a plain variable
        let assign = ident
            .map_with(|name, e| Variable::new(name, e.span()))
            .then_ignore(just(Token::Op("=")))
            .then(expr)
            .map(|(lhs, rhs)| Expression::assign(lhs, rhs));

        assign.or(comparison).labelled("expression").as_context()
    })
    .boxed()
}
