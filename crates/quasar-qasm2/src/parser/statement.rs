//! Statement dispatch and the register, measurement and barrier parsers.

use tracing::debug;

use quasar_ir::{ClbitId, Instruction, QubitId};

use super::Parser;
use crate::error::{Construct, ParseError, ParseResult};
use crate::lexer::Token;

/// Which register an indexed reference is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RegisterKind {
    Quantum,
    Classical,
}

#[allow(clippy::cast_possible_truncation)]
impl Parser {
    /// Parse one top-level statement, returning the cursor just past its `;`.
    ///
    /// The statement kind is decided by the leading token alone.
    pub(super) fn parse_statement(&mut self) -> ParseResult<usize> {
        let start = self.cursor.position();
        let construct = match self.cursor.peek() {
            Some(Token::Creg) => {
                self.parse_creg()?;
                Construct::ClassicalRegister
            }
            Some(Token::Qreg) => {
                self.parse_late_qreg()?;
                Construct::QuantumRegister
            }
            Some(Token::Measure) => {
                self.parse_measure()?;
                Construct::Measurement
            }
            Some(Token::Barrier) => {
                self.parse_barrier()?;
                Construct::Barrier
            }
            Some(Token::Identifier(_)) => {
                self.parse_gate()?;
                Construct::Gate
            }
            Some(Token::If) => return Err(self.unsupported("classical control ('if')")),
            Some(Token::Reset) => return Err(self.unsupported("reset")),
            Some(Token::Opaque) => return Err(self.unsupported("opaque gate declaration")),
            _ => return Err(self.cursor.unexpected(Construct::Statement, "a statement")),
        };
        debug!(construct = %construct, cursor = start, "parsed statement");
        Ok(self.cursor.position())
    }

    fn unsupported(&self, construct: &str) -> ParseError {
        ParseError::UnsupportedConstruct {
            construct: construct.to_string(),
            span: self.cursor.current_span(),
        }
    }

    /// Parse `OPENQASM 2.0;`.
    pub(super) fn parse_header(&mut self) -> ParseResult<()> {
        self.cursor.expect(Token::OpenQasm, Construct::Header)?;
        let supported = match self.cursor.peek() {
            Some(Token::Real(v)) => (*v - 2.0).abs() < f64::EPSILON,
            Some(Token::Integer(v)) => *v == 2,
            _ => false,
        };
        if !supported {
            return Err(self.cursor.unexpected(Construct::Header, "version 2.0"));
        }
        self.cursor.advance();
        self.cursor.expect(Token::Semicolon, Construct::Header)?;
        Ok(())
    }

    /// Parse `qreg ID[INT];` and set the qubit count.
    pub(super) fn parse_qreg(&mut self) -> ParseResult<()> {
        let start = self.cursor.position();
        let size = self.parse_register(Token::Qreg, Construct::QuantumRegister)?;
        self.circuit
            .set_qubit_count(size)
            .map_err(|_| ParseError::DuplicateDeclaration {
                construct: Construct::QuantumRegister,
                span: self.cursor.span_from(start),
            })
    }

    /// A `qreg` anywhere but right after the header. Only a second
    /// declaration gets this far; it is rejected as a duplicate.
    fn parse_late_qreg(&mut self) -> ParseResult<()> {
        if !self.circuit.has_qubit_register() {
            return Err(self.cursor.unexpected(
                Construct::QuantumRegister,
                "the quantum register directly after the version header",
            ));
        }
        self.parse_qreg()
    }

    /// Parse `creg ID[INT];` and set the classical bit count.
    fn parse_creg(&mut self) -> ParseResult<()> {
        let start = self.cursor.position();
        let size = self.parse_register(Token::Creg, Construct::ClassicalRegister)?;
        self.circuit
            .set_classical_bit_count(size)
            .map_err(|_| ParseError::DuplicateDeclaration {
                construct: Construct::ClassicalRegister,
                span: self.cursor.span_from(start),
            })
    }

    /// Shape `<KEYWORD> ID [ INT ] ;`, returning the size.
    fn parse_register(&mut self, keyword: Token, construct: Construct) -> ParseResult<u32> {
        self.cursor.expect(keyword, construct)?;
        self.cursor.expect_identifier(construct)?;
        self.cursor.expect(Token::LBracket, construct)?;
        let cursor = self.cursor.position();
        let (size, span) = self.cursor.expect_integer(construct)?;
        self.cursor.expect(Token::RBracket, construct)?;
        self.cursor.expect(Token::Semicolon, construct)?;

        u32::try_from(size).map_err(|_| ParseError::SyntaxError {
            construct,
            cursor,
            span,
            expected: format!("a register size of at most {}", u32::MAX),
            found: size.to_string(),
        })
    }

    /// Parse `ID[INT]`, checking the index against the register size.
    ///
    /// A program has one register of each kind, so the name is not compared
    /// with the declared one: `h r[0];` after `qreg q[2];` targets qubit 0.
    pub(super) fn parse_indexed(
        &mut self,
        construct: Construct,
        kind: RegisterKind,
    ) -> ParseResult<u32> {
        let (register, name_span) = self.cursor.expect_identifier(construct)?;
        self.cursor.expect(Token::LBracket, construct)?;
        let (index, _) = self.cursor.expect_integer(construct)?;
        let end = self.cursor.expect(Token::RBracket, construct)?.end;

        let size = match kind {
            RegisterKind::Quantum => self.circuit.num_qubits(),
            RegisterKind::Classical => self.circuit.num_clbits(),
        };
        if index >= u64::from(size) {
            return Err(ParseError::IndexOutOfBounds {
                register,
                index,
                size,
                span: name_span.start..end,
            });
        }
        Ok(index as u32)
    }

    /// Check for a bare register reference (`ID` not followed by `[`).
    pub(super) fn at_bare_register(&self) -> bool {
        matches!(self.cursor.peek(), Some(Token::Identifier(_)))
            && !matches!(self.cursor.peek_nth(1), Some(Token::LBracket))
    }

    /// Either a bare register (`None`: the whole register) or one or more
    /// comma-separated indexed references.
    fn parse_target_list(
        &mut self,
        construct: Construct,
        kind: RegisterKind,
    ) -> ParseResult<Option<Vec<u32>>> {
        if self.at_bare_register() {
            self.cursor.advance();
            return Ok(None);
        }
        let mut indices = vec![self.parse_indexed(construct, kind)?];
        while self.cursor.consume(&Token::Comma) {
            indices.push(self.parse_indexed(construct, kind)?);
        }
        Ok(Some(indices))
    }

    /// Parse `measure <qubits> [-> <clbits>];`.
    fn parse_measure(&mut self) -> ParseResult<()> {
        self.cursor.expect(Token::Measure, Construct::Measurement)?;
        let qubits = self.parse_target_list(Construct::Measurement, RegisterKind::Quantum)?;
        let clbits = if self.cursor.consume(&Token::Arrow) {
            self.parse_target_list(Construct::Measurement, RegisterKind::Classical)?
        } else {
            None
        };
        self.cursor.expect(Token::Semicolon, Construct::Measurement)?;

        self.circuit.append(Instruction::measure(
            qubits.map(|q| q.into_iter().map(QubitId).collect()),
            clbits.map(|c| c.into_iter().map(ClbitId).collect()),
        ));
        Ok(())
    }

    /// Parse `barrier ID;`. Subsets of qubits are not supported.
    fn parse_barrier(&mut self) -> ParseResult<()> {
        let start = self.cursor.expect(Token::Barrier, Construct::Barrier)?.start;
        self.cursor.expect_identifier(Construct::Barrier)?;
        if self.cursor.check(&Token::LBracket) || self.cursor.check(&Token::Comma) {
            return Err(ParseError::UnsupportedConstruct {
                construct: "barrier over a subset of qubits".into(),
                span: start..self.cursor.current_span().end,
            });
        }
        self.cursor.expect(Token::Semicolon, Construct::Barrier)?;

        self.circuit.append(Instruction::barrier());
        Ok(())
    }
}
