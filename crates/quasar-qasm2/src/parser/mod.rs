//! Parser for `OpenQASM` 2.
//!
//! The parser walks the token sequence of a preprocessed document once. The
//! header and an optional leading `qreg` are read first, then every statement
//! is routed by its leading token to one routine per construct, each of which
//! appends to the circuit being built.

mod expression;
mod gate;
mod statement;

pub(crate) use expression::is_function;

use quasar_ir::Circuit;
use tracing::{debug, instrument};

use crate::config::ParserConfig;
use crate::cursor::TokenCursor;
use crate::error::ParseResult;
use crate::lexer::{Token, lex};
use crate::preprocess::{Preprocessed, preprocess};

/// Parse a QASM2 source string into a Circuit, with the default
/// configuration.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    parse_with_config(source, &ParserConfig::default())
}

/// Parse a QASM2 source string into a Circuit.
///
/// Includes are resolved through `config`. On failure no circuit is
/// returned; error spans point into `source`, or into an included file
/// through [`ParseError::InInclude`](crate::ParseError::InInclude).
#[instrument(skip_all, fields(bytes = source.len()))]
pub fn parse_with_config(source: &str, config: &ParserConfig) -> ParseResult<Circuit> {
    let preprocessed = preprocess(source, config)?;
    parse_preprocessed(&preprocessed)
}

/// Parse text that has already been through [`preprocess`].
pub fn parse_preprocessed(preprocessed: &Preprocessed) -> ParseResult<Circuit> {
    let circuit = Parser::new(preprocessed.text())
        .and_then(Parser::parse_program)
        .map_err(|e| preprocessed.relocate(e))?;
    debug!(
        qubits = circuit.num_qubits(),
        clbits = circuit.num_clbits(),
        instructions = circuit.len(),
        "parsed circuit"
    );
    Ok(circuit)
}

/// Parser state for one document.
pub(super) struct Parser {
    pub(super) cursor: TokenCursor,
    pub(super) circuit: Circuit,
}

impl Parser {
    /// Create a new parser from preprocessed source.
    fn new(source: &str) -> ParseResult<Self> {
        Ok(Self {
            cursor: TokenCursor::new(lex(source)?, source.len()),
            circuit: Circuit::new(),
        })
    }

    /// Parse the entire program.
    fn parse_program(mut self) -> ParseResult<Circuit> {
        self.parse_header()?;
        if self.cursor.check(&Token::Qreg) {
            self.parse_qreg()?;
        }

        while !self.cursor.is_eof() {
            self.parse_statement()?;
        }

        Ok(self.circuit)
    }
}
