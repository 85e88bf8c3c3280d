//! Lexer for `OpenQASM` 2.

use logos::Logos;
use std::ops::Range;

use crate::error::{ParseError, ParseResult};

/// Tokens for `OpenQASM` 2.
///
/// Gate keywords (`h`, `cx`, `u3`, ...) lex as [`Token::Identifier`] and are
/// classified against the static gate table by the parser, so user-defined
/// gate names and register names share one namespace.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qreg")]
    Qreg,

    #[token("creg")]
    Creg,

    #[token("gate")]
    Gate,

    #[token("opaque")]
    Opaque,

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    #[token("barrier")]
    Barrier,

    #[token("if")]
    If,

    // Constants
    #[token("pi")]
    Pi,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Real(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    Integer(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("^")]
    Caret,

    #[token("==")]
    EqEq,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenQasm => write!(f, "OPENQASM"),
            Token::Include => write!(f, "include"),
            Token::Qreg => write!(f, "qreg"),
            Token::Creg => write!(f, "creg"),
            Token::Gate => write!(f, "gate"),
            Token::Opaque => write!(f, "opaque"),
            Token::Measure => write!(f, "measure"),
            Token::Reset => write!(f, "reset"),
            Token::Barrier => write!(f, "barrier"),
            Token::If => write!(f, "if"),
            Token::Pi => write!(f, "pi"),
            Token::Real(v) => write!(f, "{v}"),
            Token::Integer(v) => write!(f, "{v}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::EqEq => write!(f, "=="),
            Token::Arrow => write!(f, "->"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with its span information.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Range<usize>,
}

/// Tokenize a QASM2 source string.
///
/// Invalid input is reported in place, so callers can decide whether to stop
/// at the first bad token.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, (Range<usize>, String)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        if let Ok(token) = result {
            tokens.push(Ok(SpannedToken { token, span }));
        } else {
            let slice = &source[span.clone()];
            tokens.push(Err((span, format!("Invalid token: '{slice}'"))));
        }
    }

    tokens
}

/// Tokenize a source string, failing on the first unrecognized input.
pub fn lex(source: &str) -> ParseResult<Vec<SpannedToken>> {
    tokenize(source)
        .into_iter()
        .map(|result| result.map_err(|(span, message)| ParseError::LexError { span, message }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        lex(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_version_pragma() {
        let tokens = kinds("OPENQASM 2.0;");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::OpenQasm);
        assert!(matches!(tokens[1], Token::Real(v) if (v - 2.0).abs() < 1e-12));
        assert_eq!(tokens[2], Token::Semicolon);
    }

    #[test]
    fn test_register_declaration() {
        let tokens = kinds("qreg q[3];");
        assert_eq!(
            tokens,
            vec![
                Token::Qreg,
                Token::Identifier("q".into()),
                Token::LBracket,
                Token::Integer(3),
                Token::RBracket,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_measure_arrow() {
        let tokens = kinds("measure q -> c;");
        assert_eq!(tokens[0], Token::Measure);
        assert_eq!(tokens[2], Token::Arrow);
    }

    #[test]
    fn test_gate_keywords_are_identifiers() {
        let tokens = kinds("u3(pi/2, 0, -pi) q[0];");
        assert_eq!(tokens[0], Token::Identifier("u3".into()));
        assert_eq!(tokens[2], Token::Pi);
        assert_eq!(tokens[3], Token::Slash);
        assert_eq!(tokens[8], Token::Minus);
    }

    #[test]
    fn test_pi_prefix_is_identifier() {
        let tokens = kinds("pi pie");
        assert_eq!(tokens, vec![Token::Pi, Token::Identifier("pie".into())]);
    }

    #[test]
    fn test_real_forms() {
        let tokens = kinds("0.5 .25 1e-3 3.");
        assert!(matches!(tokens[0], Token::Real(v) if (v - 0.5).abs() < 1e-12));
        assert!(matches!(tokens[1], Token::Real(v) if (v - 0.25).abs() < 1e-12));
        assert!(matches!(tokens[2], Token::Real(v) if (v - 0.001).abs() < 1e-12));
        assert!(matches!(tokens[3], Token::Real(v) if (v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_include_string() {
        let tokens = kinds(r#"include "qelib1.inc";"#);
        assert_eq!(tokens[0], Token::Include);
        assert_eq!(tokens[1], Token::StringLiteral("qelib1.inc".into()));
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = r"
            // line comment
            qreg q[1];
            /* block
               comment */
            h q;
        ";
        assert_eq!(kinds(source).len(), 9);
    }

    #[test]
    fn test_spans_point_into_source() {
        let tokens = lex("h  q[0];").unwrap();
        assert_eq!(tokens[0].span, 0..1);
        assert_eq!(tokens[1].span, 3..4);
    }

    #[test]
    fn test_unrecognized_character() {
        let err = lex("qreg q[2];\nh q[0] $;").unwrap_err();
        match err {
            ParseError::LexError { span, message } => {
                assert_eq!(span.start, 18);
                assert!(message.contains('$'));
            }
            other => panic!("expected LexError, got {other:?}"),
        }
    }
}
