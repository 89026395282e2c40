//! Lexer for the equation mini-language using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Operators (order matters - longer patterns first)
    #[token("**")]
    DoubleStar,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,

    // Delimiters
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,

    // Literals
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        let tokens: Vec<_> = lex("+ - * / ^ **").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
                Token::Caret,
                Token::DoubleStar,
            ]
        );
    }

    #[test]
    fn test_double_star_not_split() {
        let tokens: Vec<_> = lex("x**2").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("x".to_string()),
                Token::DoubleStar,
                Token::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens: Vec<_> = lex("42 3.14 0.5").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Number(42.0),
                Token::Number(3.14),
                Token::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_negative_number_lexes_as_minus() {
        // Unary minus is handled by the parser, not the lexer.
        let tokens: Vec<_> = lex("-10").map(|(t, _)| t).collect();
        assert_eq!(tokens, vec![Token::Minus, Token::Number(10.0)]);
    }

    #[test]
    fn test_identifiers() {
        let tokens: Vec<_> = lex("x_panel__center y1").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("x_panel__center".to_string()),
                Token::Ident("y1".to_string()),
            ]
        );
    }

    #[test]
    fn test_function_call() {
        let tokens: Vec<_> = lex("sqrt(x - 5)").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("sqrt".to_string()),
                Token::ParenOpen,
                Token::Ident("x".to_string()),
                Token::Minus,
                Token::Number(5.0),
                Token::ParenClose,
            ]
        );
    }

    #[test]
    fn test_complete_equation() {
        let input = "sqrt((x_a - x_b) ^ 2 + (y_a - y_b) ^ 2) - 100.00000000";
        let tokens: Vec<_> = lex(input).map(|(t, _)| t).collect();
        assert!(tokens.contains(&Token::Ident("x_a".to_string())));
        assert!(tokens.contains(&Token::Caret));
        assert!(tokens.contains(&Token::Number(100.0)));
    }
}
