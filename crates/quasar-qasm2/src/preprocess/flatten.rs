//! Gate definition flattening.
//!
//! Every `gate` definition is parsed into a list of primitive applications,
//! with calls of earlier definitions already expanded. The definition text is
//! then blanked, and each later top-level call of the gate is replaced by its
//! body with parameters and qubit arguments substituted.

use std::fmt;
use std::ops::Range;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::source_map::{MAIN, OffsetMap};
use crate::cursor::TokenCursor;
use crate::error::{Construct, ParseError, ParseResult};
use crate::gates;
use crate::lexer::{SpannedToken, Token, lex};
use crate::parser::is_function;

/// Piece of a parameter expression.
#[derive(Debug, Clone, PartialEq)]
enum Fragment {
    /// Literal source text.
    Text(String),
    /// Reference to the enclosing definition's parameter.
    Param(usize),
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Text(text) => f.write_str(text),
            Fragment::Param(index) => write!(f, "${index}"),
        }
    }
}

/// One gate statement. `Q` is a qubit index inside a definition body and the
/// qubit argument text at a call site.
#[derive(Debug, Clone, PartialEq)]
struct Application<Q> {
    name: String,
    params: Vec<Vec<Fragment>>,
    qubits: Vec<Q>,
}

impl fmt::Display for Application<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            f.write_str("(")?;
            for (i, expr) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                for fragment in expr {
                    write!(f, "{fragment}")?;
                }
            }
            f.write_str(")")?;
        }
        if !self.qubits.is_empty() {
            write!(f, " {}", self.qubits.join(", "))?;
        }
        f.write_str(";")
    }
}

/// A flattened user gate.
#[derive(Debug, Clone)]
struct GateDefinition {
    num_params: usize,
    num_qubits: usize,
    body: Vec<Application<usize>>,
}

impl GateDefinition {
    /// Substitute arguments into the body. Callers check the argument counts.
    fn instantiate<Q: Clone>(&self, params: &[Vec<Fragment>], qubits: &[Q]) -> Vec<Application<Q>> {
        self.body
            .iter()
            .map(|app| Application {
                name: app.name.clone(),
                params: app.params.iter().map(|expr| substitute(expr, params)).collect(),
                qubits: app.qubits.iter().map(|&q| qubits[q].clone()).collect(),
            })
            .collect()
    }
}

/// Replace parameter references with the parenthesized argument.
fn substitute(expr: &[Fragment], args: &[Vec<Fragment>]) -> Vec<Fragment> {
    let mut out = Vec::with_capacity(expr.len());
    for fragment in expr {
        match fragment {
            Fragment::Text(text) => out.push(Fragment::Text(text.clone())),
            Fragment::Param(index) => {
                out.push(Fragment::Text("(".into()));
                out.extend(args[*index].iter().cloned());
                out.push(Fragment::Text(")".into()));
            }
        }
    }
    out
}

fn malformed(gate: &str, span: Range<usize>, message: impl Into<String>) -> ParseError {
    ParseError::MalformedGateDefinition {
        gate: gate.to_string(),
        span,
        message: message.into(),
    }
}

/// Remove gate definitions from `source` and expand calls of them.
///
/// The returned map sends each expansion back to the call it replaced.
pub(crate) fn flatten_gates(source: &str) -> ParseResult<(String, OffsetMap)> {
    let cursor = TokenCursor::new(lex(source)?, source.len());
    Flattener {
        source,
        cursor,
        definitions: FxHashMap::default(),
    }
    .run()
}

struct Flattener<'a> {
    source: &'a str,
    cursor: TokenCursor,
    definitions: FxHashMap<String, GateDefinition>,
}

/// Gate head and argument lists, as read from source.
struct Statement<Q> {
    application: Application<Q>,
    head_span: Range<usize>,
}

impl Flattener<'_> {
    fn run(mut self) -> ParseResult<(String, OffsetMap)> {
        let mut out = String::with_capacity(self.source.len());
        let mut map = OffsetMap::default();
        let mut copied = 0;
        let mut statement_start = true;

        while let Some(token) = self.cursor.peek() {
            let start = self.cursor.current_span().start;
            match token {
                Token::Gate if statement_start => {
                    self.definition()?;
                    let end = self.cursor.previous_span().end;
                    out.push_str(&self.source[copied..start]);
                    out.extend(
                        self.source[start..end]
                            .chars()
                            .map(|c| if c == '\n' { '\n' } else { ' ' }),
                    );
                    copied = end;
                }
                Token::Identifier(name) if statement_start && self.definitions.contains_key(name) => {
                    let expansion = self.call()?;
                    let end = self.cursor.previous_span().end;
                    out.push_str(&self.source[copied..start]);
                    map.replaced(out.len(), MAIN, start..end);
                    out.push_str(&expansion);
                    map.copied(out.len(), MAIN, end);
                    copied = end;
                }
                Token::Semicolon | Token::RBrace => {
                    self.cursor.advance();
                    statement_start = true;
                }
                _ => {
                    self.cursor.advance();
                    statement_start = false;
                }
            }
        }

        out.push_str(&self.source[copied..]);
        Ok((out, map))
    }

    /// Parse one `gate` definition and register it.
    fn definition(&mut self) -> ParseResult<()> {
        self.cursor.expect(Token::Gate, Construct::GateDefinition)?;
        let (name, name_span) = self.cursor.expect_identifier(Construct::GateDefinition)?;

        if gates::is_primitive(&name) {
            debug!(gate = %name, "skipping definition of primitive gate");
            return self.skip_body();
        }
        if self.definitions.contains_key(&name) {
            return Err(malformed(&name, name_span, "gate is already defined"));
        }

        let mut params = Vec::new();
        if self.cursor.consume(&Token::LParen) && !self.cursor.consume(&Token::RParen) {
            params = self.identifier_list(&name)?;
            self.cursor.expect(Token::RParen, Construct::GateDefinition)?;
        }
        let qubits = self.identifier_list(&name)?;
        self.cursor.expect(Token::LBrace, Construct::GateDefinition)?;

        let mut body = Vec::new();
        while !self.cursor.check(&Token::RBrace) {
            if self.cursor.is_eof() {
                return Err(self.cursor.unexpected(Construct::GateDefinition, "'}'"));
            }
            let statement = self.body_statement(&name, &params, &qubits)?;
            self.resolve_body_call(&name, statement, &mut body)?;
        }
        self.cursor.expect(Token::RBrace, Construct::GateDefinition)?;

        trace!(
            gate = %name,
            params = params.len(),
            qubits = qubits.len(),
            ops = body.len(),
            "flattened gate definition"
        );
        self.definitions.insert(
            name,
            GateDefinition {
                num_params: params.len(),
                num_qubits: qubits.len(),
                body,
            },
        );
        Ok(())
    }

    /// Skip to the end of a definition that is not registered.
    fn skip_body(&mut self) -> ParseResult<()> {
        while !self.cursor.check(&Token::LBrace) {
            if self.cursor.advance().is_none() {
                return Err(self.cursor.unexpected(Construct::GateDefinition, "'{'"));
            }
        }
        while !self.cursor.check(&Token::RBrace) {
            if self.cursor.advance().is_none() {
                return Err(self.cursor.unexpected(Construct::GateDefinition, "'}'"));
            }
        }
        self.cursor.advance();
        Ok(())
    }

    /// Comma-separated list of distinct identifiers.
    fn identifier_list(&mut self, gate: &str) -> ParseResult<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        loop {
            let (ident, span) = self.cursor.expect_identifier(Construct::GateDefinition)?;
            if names.contains(&ident) {
                return Err(malformed(gate, span, format!("duplicate argument '{ident}'")));
            }
            names.push(ident);
            if !self.cursor.consume(&Token::Comma) {
                return Ok(names);
            }
        }
    }

    /// One statement of a definition body, in terms of the definition's
    /// parameter and qubit indices.
    fn body_statement(
        &mut self,
        gate: &str,
        params: &[String],
        qubits: &[String],
    ) -> ParseResult<Statement<usize>> {
        let head_span = self.cursor.current_span();
        let name = match self.cursor.peek() {
            Some(Token::Identifier(name)) => name.clone(),
            Some(Token::Barrier) => "barrier".to_string(),
            Some(other) => {
                return Err(malformed(gate, head_span, format!("unexpected '{other}' in gate body")));
            }
            None => return Err(self.cursor.unexpected(Construct::GateDefinition, "'}'")),
        };
        self.cursor.advance();

        let mut exprs = Vec::new();
        if self.cursor.consume(&Token::LParen) && !self.cursor.consume(&Token::RParen) {
            loop {
                let tokens = self.expression(Construct::GateDefinition)?;
                if tokens.is_empty() {
                    return Err(malformed(
                        gate,
                        self.cursor.current_span(),
                        "empty parameter expression",
                    ));
                }
                exprs.push(self.body_expression(gate, params, &tokens)?);
                if !self.cursor.consume(&Token::Comma) {
                    break;
                }
            }
            self.cursor.expect(Token::RParen, Construct::GateDefinition)?;
        }

        let mut args = Vec::new();
        loop {
            let (ident, span) = self.cursor.expect_identifier(Construct::GateDefinition)?;
            let Some(index) = qubits.iter().position(|q| *q == ident) else {
                return Err(malformed(gate, span, format!("undefined qubit argument '{ident}'")));
            };
            if self.cursor.check(&Token::LBracket) {
                return Err(malformed(
                    gate,
                    self.cursor.current_span(),
                    "qubit arguments in a gate body cannot be indexed",
                ));
            }
            args.push(index);
            if !self.cursor.consume(&Token::Comma) {
                break;
            }
        }
        self.cursor.expect(Token::Semicolon, Construct::GateDefinition)?;

        Ok(Statement {
            application: Application {
                name,
                params: exprs,
                qubits: args,
            },
            head_span,
        })
    }

    /// Split a body expression into text and parameter references.
    fn body_expression(
        &self,
        gate: &str,
        params: &[String],
        tokens: &[SpannedToken],
    ) -> ParseResult<Vec<Fragment>> {
        let mut fragments = Vec::new();
        let mut text_start = tokens.first().map_or(0, |t| t.span.start);
        let end = tokens.last().map_or(text_start, |t| t.span.end);

        for t in tokens {
            let Token::Identifier(ident) = &t.token else {
                continue;
            };
            if let Some(index) = params.iter().position(|p| p == ident) {
                if text_start < t.span.start {
                    fragments.push(Fragment::Text(self.source[text_start..t.span.start].to_string()));
                }
                fragments.push(Fragment::Param(index));
                text_start = t.span.end;
            } else if !is_function(ident) {
                return Err(malformed(gate, t.span.clone(), format!("undefined parameter '{ident}'")));
            }
        }
        if text_start < end {
            fragments.push(Fragment::Text(self.source[text_start..end].to_string()));
        }
        Ok(fragments)
    }

    /// Append a body statement, expanding calls of earlier definitions.
    fn resolve_body_call(
        &self,
        gate: &str,
        statement: Statement<usize>,
        body: &mut Vec<Application<usize>>,
    ) -> ParseResult<()> {
        let Statement {
            application,
            head_span,
        } = statement;
        let callee = application.name.as_str();

        if callee == "barrier" || gates::is_primitive(callee) {
            body.push(application);
            return Ok(());
        }
        if callee == gate {
            return Err(malformed(gate, head_span, "gate cannot call itself"));
        }
        let Some(definition) = self.definitions.get(callee) else {
            return Err(malformed(gate, head_span, format!("call of undefined gate '{callee}'")));
        };
        if application.params.len() != definition.num_params {
            return Err(malformed(
                gate,
                head_span,
                format!(
                    "'{callee}' takes {} parameters, {} given",
                    definition.num_params,
                    application.params.len()
                ),
            ));
        }
        if application.qubits.len() != definition.num_qubits {
            return Err(malformed(
                gate,
                head_span,
                format!(
                    "'{callee}' takes {} qubit arguments, {} given",
                    definition.num_qubits,
                    application.qubits.len()
                ),
            ));
        }
        body.extend(definition.instantiate(&application.params, &application.qubits));
        Ok(())
    }

    /// Tokens of one parameter expression, up to a top-level `,` or `)`.
    fn expression(&mut self, construct: Construct) -> ParseResult<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        loop {
            match self.cursor.peek() {
                None | Some(Token::Semicolon | Token::LBrace | Token::RBrace) => {
                    return Err(self.cursor.unexpected(construct, "')'"));
                }
                Some(Token::Comma | Token::RParen) if depth == 0 => return Ok(tokens),
                Some(Token::LParen) => depth += 1,
                Some(Token::RParen) => depth -= 1,
                _ => {}
            }
            if let Some(token) = self.cursor.advance() {
                tokens.push(token.clone());
            }
        }
    }

    /// Parse a top-level call of a user gate and render its expansion.
    fn call(&mut self) -> ParseResult<String> {
        let call_index = self.cursor.position();
        let (name, _) = self.cursor.expect_identifier(Construct::GateCall)?;

        let mut params = Vec::new();
        if self.cursor.consume(&Token::LParen) && !self.cursor.consume(&Token::RParen) {
            loop {
                let tokens = self.expression(Construct::GateCall)?;
                let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
                    return Err(self.cursor.unexpected(Construct::GateCall, "an expression"));
                };
                let text = &self.source[first.span.start..last.span.end];
                params.push(vec![Fragment::Text(text.to_string())]);
                if !self.cursor.consume(&Token::Comma) {
                    break;
                }
            }
            self.cursor.expect(Token::RParen, Construct::GateCall)?;
        }

        let mut qubits = Vec::new();
        loop {
            let (_, span) = self.cursor.expect_identifier(Construct::GateCall)?;
            let mut end = span.end;
            if self.cursor.consume(&Token::LBracket) {
                self.cursor.expect_integer(Construct::GateCall)?;
                end = self.cursor.expect(Token::RBracket, Construct::GateCall)?.end;
            }
            qubits.push(self.source[span.start..end].to_string());
            if !self.cursor.consume(&Token::Comma) {
                break;
            }
        }
        self.cursor.expect(Token::Semicolon, Construct::GateCall)?;

        let span = self.cursor.span_from(call_index);
        let Some(definition) = self.definitions.get(&name) else {
            return Err(ParseError::SyntaxError {
                construct: Construct::GateCall,
                cursor: call_index,
                span,
                expected: "a defined gate".into(),
                found: name,
            });
        };
        if params.len() != definition.num_params {
            return Err(ParseError::SyntaxError {
                construct: Construct::GateCall,
                cursor: call_index,
                span,
                expected: format!("{} parameters for '{name}'", definition.num_params),
                found: params.len().to_string(),
            });
        }
        if qubits.len() != definition.num_qubits {
            return Err(ParseError::SyntaxError {
                construct: Construct::GateCall,
                cursor: call_index,
                span,
                expected: format!("{} qubit arguments for '{name}'", definition.num_qubits),
                found: qubits.len().to_string(),
            });
        }

        let expansion: Vec<String> = definition
            .instantiate(&params, &qubits)
            .iter()
            .map(ToString::to_string)
            .collect();
        trace!(gate = %name, ops = expansion.len(), "expanded gate call");
        Ok(expansion.join(" "))
    }
}
