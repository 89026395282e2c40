//! Parser implementation using chumsky
//!
//! Grammar (loosest binding first):
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary)*
//! unary   := '-' unary | power
//! power   := primary (('^' | '**') unary)?      (right associative)
//! primary := number | symbol | function '(' sum ')' | '(' sum ')'
//! ```

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::expr::ast::{BinaryOp, Expr, Function, UnaryOp};
use crate::expr::lexer::Token;

/// Parse equation text into an expression tree
pub fn parse(input: &str) -> Result<Expr, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::expr::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    expr_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

fn expr_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|expr| {
        let number = select! {
            Token::Number(n) => Expr::Number(n),
        };

        // An identifier followed by a parenthesized argument is a function
        // call; otherwise it is a symbol looked up in the variable binding.
        let call_or_symbol = select! { Token::Ident(name) => name }
            .then(
                expr.clone()
                    .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
                    .or_not(),
            )
            .try_map(|(name, arg), span| match arg {
                Some(arg) => match Function::from_name(&name) {
                    Some(func) => Ok(Expr::Call(func, Box::new(arg))),
                    None => Err(Rich::custom(
                        span,
                        format!("unknown function '{}'", name),
                    )),
                },
                None => Ok(Expr::Symbol(name)),
            });

        let primary = choice((
            number,
            call_or_symbol,
            expr.clone()
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        ));

        // Exponentiation is right-associative and its exponent may carry a
        // unary minus, so `unary` and `power` are folded into one level.
        let unary = recursive(|unary| {
            let power = primary
                .clone()
                .then(
                    choice((just(Token::Caret), just(Token::DoubleStar)))
                        .ignore_then(unary.clone())
                        .or_not(),
                )
                .map(|(base, exponent)| match exponent {
                    Some(exponent) => {
                        Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent))
                    }
                    None => base,
                });

            just(Token::Minus)
                .ignore_then(unary)
                .map(|inner| Expr::Unary(UnaryOp::Neg, Box::new(inner)))
                .or(power)
        });

        let product_op = choice((
            just(Token::Star).to(BinaryOp::Mul),
            just(Token::Slash).to(BinaryOp::Div),
        ));
        let product = unary.clone().foldl(
            product_op.then(unary).repeated(),
            |lhs, (op, rhs)| Expr::Binary(op, Box::new(lhs), Box::new(rhs)),
        );

        let sum_op = choice((
            just(Token::Plus).to(BinaryOp::Add),
            just(Token::Minus).to(BinaryOp::Sub),
        ));
        product.clone().foldl(
            sum_op.then(product).repeated(),
            |lhs, (op, rhs)| Expr::Binary(op, Box::new(lhs), Box::new(rhs)),
        )
    })
}
