//! Gate application parsers, one per arity category.

use quasar_ir::{Instruction, QubitId};

use super::Parser;
use super::statement::RegisterKind;
use crate::error::{Construct, ParseError, ParseResult};
use crate::gates::{self, GateArity, GateSpec};
use crate::lexer::Token;

impl Parser {
    /// Parse a gate application, routed by the keyword's arity category.
    pub(super) fn parse_gate(&mut self) -> ParseResult<()> {
        let cursor = self.cursor.position();
        let (name, span) = self.cursor.expect_identifier(Construct::Gate)?;
        let Some(spec) = gates::lookup(&name) else {
            return Err(ParseError::SyntaxError {
                construct: Construct::Gate,
                cursor,
                span,
                expected: "a known gate".into(),
                found: name,
            });
        };

        match spec.arity {
            GateArity::Single => self.parse_single_qubit_gate(spec),
            GateArity::TwoQubit => self.parse_two_qubit_gate(spec),
            GateArity::OneParameter | GateArity::UFamily => self.parse_parameterized_gate(spec),
        }
    }

    /// `g q[i] (, q[j])* ;`, or `g q;` to apply `g` to every qubit.
    fn parse_single_qubit_gate(&mut self, spec: &GateSpec) -> ParseResult<()> {
        let gate = spec.build(&[]);

        if self.at_bare_register() {
            self.cursor.advance();
            self.cursor.expect(Token::Semicolon, Construct::Gate)?;
            for q in 0..self.circuit.num_qubits() {
                self.circuit
                    .append(Instruction::single_qubit_gate(gate.clone(), QubitId(q)));
            }
            return Ok(());
        }

        let mut targets = vec![self.parse_indexed(Construct::Gate, RegisterKind::Quantum)?];
        while self.cursor.consume(&Token::Comma) {
            targets.push(self.parse_indexed(Construct::Gate, RegisterKind::Quantum)?);
        }
        self.cursor.expect(Token::Semicolon, Construct::Gate)?;

        for q in targets {
            self.circuit
                .append(Instruction::single_qubit_gate(gate.clone(), QubitId(q)));
        }
        Ok(())
    }

    /// `g q[i], q[j];`, exactly one pair.
    fn parse_two_qubit_gate(&mut self, spec: &GateSpec) -> ParseResult<()> {
        let control = self.parse_indexed(Construct::Gate, RegisterKind::Quantum)?;
        self.cursor.expect(Token::Comma, Construct::Gate)?;
        let target = self.parse_indexed(Construct::Gate, RegisterKind::Quantum)?;
        self.cursor.expect(Token::Semicolon, Construct::Gate)?;

        self.circuit.append(Instruction::two_qubit_gate(
            spec.build(&[]),
            QubitId(control),
            QubitId(target),
        ));
        Ok(())
    }

    /// `g(expr, ...) q[i];` for rotations and the U family.
    fn parse_parameterized_gate(&mut self, spec: &GateSpec) -> ParseResult<()> {
        let params = self.parse_parameters(spec, Construct::Gate)?;
        let target = self.parse_indexed(Construct::Gate, RegisterKind::Quantum)?;
        self.cursor.expect(Token::Semicolon, Construct::Gate)?;

        self.circuit
            .append(Instruction::single_qubit_gate(spec.build(&params), QubitId(target)));
        Ok(())
    }
}
