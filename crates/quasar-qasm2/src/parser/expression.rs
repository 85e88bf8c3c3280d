//! Evaluation of gate parameter expressions.

use std::f64::consts::PI;
use std::ops::Range;

use tracing::trace;

use super::Parser;
use crate::error::{Construct, ParseError, ParseResult};
use crate::gates::GateSpec;
use crate::lexer::Token;

/// Unary functions allowed in parameter expressions.
const FUNCTIONS: &[&str] = &["sin", "cos", "tan", "exp", "ln", "sqrt"];

/// Check whether `name` is a built-in expression function.
pub(crate) fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

fn apply_function(name: &str, arg: f64) -> f64 {
    match name {
        "sin" => arg.sin(),
        "cos" => arg.cos(),
        "tan" => arg.tan(),
        "exp" => arg.exp(),
        "ln" => arg.ln(),
        "sqrt" => arg.sqrt(),
        _ => f64::NAN,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div => 2,
            BinOp::Pow => 3,
        }
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinOp::Add => left + right,
            BinOp::Sub => left - right,
            BinOp::Mul => left * right,
            BinOp::Div => left / right,
            BinOp::Pow => left.powf(right),
        }
    }
}

fn invalid(span: Range<usize>, message: impl Into<String>) -> ParseError {
    ParseError::InvalidExpression {
        span,
        message: message.into(),
    }
}

impl Parser {
    /// Parse a parenthesized parameter list for `spec`.
    ///
    /// Fewer parameters than the gate reads is accepted; the gate builder
    /// fills the rest with zero. More is a syntax error at the extra comma.
    pub(super) fn parse_parameters(
        &mut self,
        spec: &GateSpec,
        construct: Construct,
    ) -> ParseResult<Vec<f64>> {
        self.cursor.expect(Token::LParen, construct)?;
        let mut params = Vec::with_capacity(spec.num_params);
        loop {
            let (value, next) = self.eval_parameter()?;
            trace!(gate = spec.keyword, value, cursor = next, "evaluated parameter");
            params.push(value);
            if self.cursor.check(&Token::RParen) {
                break;
            }
            if params.len() == spec.num_params {
                return Err(self.cursor.unexpected(construct, "')'"));
            }
            self.cursor.expect(Token::Comma, construct)?;
        }
        self.cursor.expect(Token::RParen, construct)?;
        Ok(params)
    }

    /// Evaluate one parameter expression, stopping before the `,` or `)`
    /// that ends it. Returns the value and the cursor of that terminator.
    pub(super) fn eval_parameter(&mut self) -> ParseResult<(f64, usize)> {
        let start = self.cursor.position();
        let value = self.parse_binary_expr(0)?;

        match self.cursor.peek() {
            Some(Token::Comma | Token::RParen) => {}
            Some(other) => {
                return Err(invalid(
                    self.cursor.current_span(),
                    format!("unexpected '{other}' in expression"),
                ));
            }
            None => {
                return Err(invalid(
                    self.cursor.current_span(),
                    "unexpected end of input in expression",
                ));
            }
        }
        if !value.is_finite() {
            return Err(invalid(
                self.cursor.span_from(start),
                format!("expression evaluates to {value}"),
            ));
        }
        Ok((value, self.cursor.position()))
    }

    /// Parse binary expression with precedence climbing.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<f64> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            let op_span = self.cursor.current_span();
            self.cursor.advance();

            // `^` is right-associative
            let next_min = if op == BinOp::Pow { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_min)?;
            if op == BinOp::Div && right == 0.0 {
                return Err(invalid(op_span, "division by zero"));
            }
            left = op.apply(left, right);
        }

        Ok(left)
    }

    /// Parse unary expression. Negation binds tighter than `*` but looser
    /// than `^`, so `-2^2` is `-4`.
    fn parse_unary_expr(&mut self) -> ParseResult<f64> {
        if self.cursor.consume(&Token::Minus) {
            let operand = self.parse_binary_expr(BinOp::Pow.precedence())?;
            return Ok(-operand);
        }
        self.parse_primary_expr()
    }

    #[allow(clippy::cast_precision_loss)]
    fn parse_primary_expr(&mut self) -> ParseResult<f64> {
        let span = self.cursor.current_span();
        let value = match self.cursor.peek() {
            Some(Token::Integer(v)) => *v as f64,
            Some(Token::Real(v)) => *v,
            Some(Token::Pi) => PI,
            Some(Token::LParen) => {
                self.cursor.advance();
                let value = self.parse_binary_expr(0)?;
                self.expect_close_paren()?;
                return Ok(value);
            }
            Some(Token::Identifier(name)) if is_function(name) => {
                let name = name.clone();
                self.cursor.advance();
                if !self.cursor.consume(&Token::LParen) {
                    return Err(invalid(
                        self.cursor.current_span(),
                        format!("expected '(' after '{name}'"),
                    ));
                }
                let arg = self.parse_binary_expr(0)?;
                self.expect_close_paren()?;
                return Ok(apply_function(&name, arg));
            }
            Some(Token::Comma | Token::RParen) => {
                return Err(invalid(span, "missing expression"));
            }
            Some(other) => {
                return Err(invalid(span, format!("unexpected '{other}' in expression")));
            }
            None => return Err(invalid(span, "unexpected end of input in expression")),
        };
        self.cursor.advance();
        Ok(value)
    }

    fn expect_close_paren(&mut self) -> ParseResult<()> {
        if self.cursor.consume(&Token::RParen) {
            Ok(())
        } else {
            Err(invalid(self.cursor.current_span(), "expected ')'"))
        }
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.cursor.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Caret => Some(BinOp::Pow),
            _ => None,
        }
    }
}
