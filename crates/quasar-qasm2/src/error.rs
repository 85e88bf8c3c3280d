//! Error types for the QASM2 front end.

use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// The grammar construct a syntax error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    /// `OPENQASM 2.0;`
    Header,
    /// `qreg q[n];`
    QuantumRegister,
    /// `creg c[n];`
    ClassicalRegister,
    /// `measure ... [-> ...];`
    Measurement,
    /// `barrier q;`
    Barrier,
    /// Application of a primitive gate.
    Gate,
    /// Application of a user-defined gate.
    GateCall,
    /// `gate name(params) qubits { body }`
    GateDefinition,
    /// `include "file";`
    Include,
    /// A top-level statement whose kind is not known yet.
    Statement,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Construct::Header => "version header",
            Construct::QuantumRegister => "quantum register declaration",
            Construct::ClassicalRegister => "classical register declaration",
            Construct::Measurement => "measurement",
            Construct::Barrier => "barrier",
            Construct::Gate => "gate application",
            Construct::GateCall => "user gate call",
            Construct::GateDefinition => "gate definition",
            Construct::Include => "include directive",
            Construct::Statement => "statement",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during parsing.
///
/// Every variant carries the byte span of the smallest token run responsible
/// for the failure, in the text given to the entry point that returned it.
/// Failures inside an included file come wrapped in
/// [`ParseError::InInclude`], whose inner span is relative to that file. A
/// failure inside the expansion of a user gate call points at the call.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Unrecognized character or token.
    #[error("Lexer error at position {}: {message}", span.start)]
    LexError { span: Range<usize>, message: String },

    /// Token sequence does not match the expected construct shape. `cursor`
    /// is the token index in the preprocessed text.
    #[error(
        "Syntax error in {construct} at position {} (token {cursor}): expected {expected}, found {found}",
        span.start
    )]
    SyntaxError {
        construct: Construct,
        cursor: usize,
        span: Range<usize>,
        expected: String,
        found: String,
    },

    /// Non-numeric content in a parameter expression.
    #[error("Invalid expression at position {}: {message}", span.start)]
    InvalidExpression { span: Range<usize>, message: String },

    /// A gate definition could not be flattened.
    #[error("Malformed definition of gate '{gate}' at position {}: {message}", span.start)]
    MalformedGateDefinition {
        gate: String,
        span: Range<usize>,
        message: String,
    },

    /// Grammatically valid, but deliberately not supported.
    #[error("Unsupported construct at position {}: {construct}", span.start)]
    UnsupportedConstruct { construct: String, span: Range<usize> },

    /// A register index is not below the register size.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: u64,
        size: u32,
        span: Range<usize>,
    },

    /// A register kind was declared twice.
    #[error("Duplicate {construct} at position {}", span.start)]
    DuplicateDeclaration {
        construct: Construct,
        span: Range<usize>,
    },

    /// An include could not be resolved.
    #[error("Cannot resolve include \"{path}\" at position {}", span.start)]
    UnresolvedInclude { path: String, span: Range<usize> },

    /// Failure inside an included file. `span` is the `include` directive
    /// in the including file.
    #[error("In included file \"{path}\": {error}")]
    InInclude {
        path: String,
        span: Range<usize>,
        error: Box<ParseError>,
    },
}

impl ParseError {
    /// The byte span responsible for this error.
    pub fn span(&self) -> Range<usize> {
        match self {
            ParseError::LexError { span, .. }
            | ParseError::SyntaxError { span, .. }
            | ParseError::InvalidExpression { span, .. }
            | ParseError::MalformedGateDefinition { span, .. }
            | ParseError::UnsupportedConstruct { span, .. }
            | ParseError::IndexOutOfBounds { span, .. }
            | ParseError::DuplicateDeclaration { span, .. }
            | ParseError::UnresolvedInclude { span, .. }
            | ParseError::InInclude { span, .. } => span.clone(),
        }
    }

    /// Replace the span this error points at.
    pub(crate) fn with_span(mut self, new: Range<usize>) -> Self {
        match &mut self {
            ParseError::LexError { span, .. }
            | ParseError::SyntaxError { span, .. }
            | ParseError::InvalidExpression { span, .. }
            | ParseError::MalformedGateDefinition { span, .. }
            | ParseError::UnsupportedConstruct { span, .. }
            | ParseError::IndexOutOfBounds { span, .. }
            | ParseError::DuplicateDeclaration { span, .. }
            | ParseError::UnresolvedInclude { span, .. }
            | ParseError::InInclude { span, .. } => *span = new,
        }
        self
    }

    /// The error with every include wrapper removed.
    pub fn innermost(&self) -> &ParseError {
        match self {
            ParseError::InInclude { error, .. } => error.innermost(),
            other => other,
        }
    }

    /// The construct a syntax error was raised in.
    pub fn construct(&self) -> Option<Construct> {
        match self.innermost() {
            ParseError::SyntaxError { construct, .. }
            | ParseError::DuplicateDeclaration { construct, .. } => Some(*construct),
            _ => None,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A 1-based line and column in a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    /// Locate a byte offset. Offsets past the end map to the end of input.
    pub fn locate(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let mut line = 1;
        let mut column = 1;
        for (i, ch) in source.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate() {
        let source = "OPENQASM 2.0;\nqreg q 3];";
        assert_eq!(SourceLocation::locate(source, 0), SourceLocation { line: 1, column: 1 });
        assert_eq!(SourceLocation::locate(source, 21), SourceLocation { line: 2, column: 8 });
        assert_eq!(SourceLocation::locate(source, 999).line, 2);
    }

    #[test]
    fn test_syntax_error_message() {
        let err = ParseError::SyntaxError {
            construct: Construct::QuantumRegister,
            cursor: 5,
            span: 21..22,
            expected: "'['".into(),
            found: "3".into(),
        };
        assert_eq!(err.span(), 21..22);
        assert_eq!(err.construct(), Some(Construct::QuantumRegister));
        assert_eq!(
            err.to_string(),
            "Syntax error in quantum register declaration at position 21 (token 5): expected '[', found 3"
        );
    }

    #[test]
    fn test_include_wrapper() {
        let inner = ParseError::DuplicateDeclaration {
            construct: Construct::ClassicalRegister,
            span: 3..9,
        };
        let err = ParseError::InInclude {
            path: "regs.inc".into(),
            span: 14..34,
            error: Box::new(inner.clone()),
        };
        assert_eq!(err.span(), 14..34);
        assert_eq!(err.innermost(), &inner);
        assert_eq!(err.construct(), Some(Construct::ClassicalRegister));
        assert_eq!(
            err.to_string(),
            "In included file \"regs.inc\": Duplicate classical register declaration at position 3"
        );
        assert_eq!(inner.with_span(0..1).span(), 0..1);
    }
}
