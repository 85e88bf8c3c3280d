//! Forward-only cursor over a token sequence.

use std::ops::Range;

use crate::error::{Construct, ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token};

/// Cursor over the tokens of one source document.
///
/// Only moves forward; lookahead is limited to peeking.
pub(crate) struct TokenCursor {
    tokens: Vec<SpannedToken>,
    pos: usize,
    source_len: usize,
}

#[allow(clippy::needless_pass_by_value)]
impl TokenCursor {
    pub(crate) fn new(tokens: Vec<SpannedToken>, source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            source_len,
        }
    }

    /// Check if we've reached the end.
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Index of the current token.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Peek at the current token.
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    /// Peek `n` tokens past the current one.
    pub(crate) fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.token)
    }

    /// Span of the current token, or an empty span at end of input.
    pub(crate) fn current_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map_or(self.source_len..self.source_len, |t| t.span.clone())
    }

    /// Span of the most recently consumed token.
    pub(crate) fn previous_span(&self) -> Range<usize> {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(t) => t.span.clone(),
            None => 0..0,
        }
    }

    /// Span covering the tokens from index `start` up to the last consumed one.
    pub(crate) fn span_from(&self, start: usize) -> Range<usize> {
        let begin = self
            .tokens
            .get(start)
            .map_or(self.source_len, |t| t.span.start);
        let end = self.previous_span().end.max(begin);
        begin..end
    }

    /// Advance and return the current token.
    pub(crate) fn advance(&mut self) -> Option<&SpannedToken> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Check if current token matches.
    pub(crate) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(crate) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token, returning its span.
    pub(crate) fn expect(&mut self, expected: Token, construct: Construct) -> ParseResult<Range<usize>> {
        if !self.check(&expected) {
            return Err(self.unexpected(construct, format!("'{expected}'")));
        }
        let span = self.current_span();
        self.advance();
        Ok(span)
    }

    /// Expect an identifier.
    pub(crate) fn expect_identifier(
        &mut self,
        construct: Construct,
    ) -> ParseResult<(String, Range<usize>)> {
        match self.peek() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                let span = self.current_span();
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.unexpected(construct, "identifier")),
        }
    }

    /// Expect an integer literal.
    pub(crate) fn expect_integer(&mut self, construct: Construct) -> ParseResult<(u64, Range<usize>)> {
        match self.peek() {
            Some(Token::Integer(value)) => {
                let value = *value;
                let span = self.current_span();
                self.advance();
                Ok((value, span))
            }
            _ => Err(self.unexpected(construct, "integer")),
        }
    }

    /// Build a syntax error for the current token.
    pub(crate) fn unexpected(&self, construct: Construct, expected: impl Into<String>) -> ParseError {
        let found = self
            .peek()
            .map_or_else(|| "end of input".to_string(), ToString::to_string);
        ParseError::SyntaxError {
            construct,
            cursor: self.pos,
            span: self.current_span(),
            expected: expected.into(),
            found,
        }
    }
}
