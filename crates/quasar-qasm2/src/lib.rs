//! `OpenQASM` 2 front end for Quasar
//!
//! This crate turns `OpenQASM` 2.0 source text into a [`quasar_ir::Circuit`].
//!
//! # Pipeline
//!
//! 1. **Preprocessing**: `include` directives are inlined through an
//!    [`IncludeResolver`], and user `gate` definitions are flattened into
//!    primitive gate statements at every call site. The result keeps a map
//!    back to the original files, so error spans always point into the text
//!    that was written: the caller's source, or an included file through
//!    [`ParseError::InInclude`].
//! 2. **Lexing**: the text becomes a flat token sequence.
//! 3. **Parsing**: the version header and an optional leading `qreg` are
//!    read, then each statement is routed by its first token to the parser
//!    for its construct, which appends to the circuit.
//!
//! # Supported Statements
//!
//! | Statement | Example |
//! |-----------|---------|
//! | Version header | `OPENQASM 2.0;` |
//! | Registers | `qreg q[5];`, `creg c[5];` |
//! | Single-qubit gates | `h q[0];`, `x q[0], q[1];` |
//! | Broadcast | `h q;` applies `h` to every qubit |
//! | Two-qubit gates | `cx q[0], q[1];` |
//! | Rotations | `rz(pi/4) q[0];` |
//! | U family | `u1(λ)`, `u2(φ, λ)`, `u3(θ, φ, λ)`; missing trailing angles are 0 |
//! | Measurement | `measure q;`, `measure q[0] -> c[0];` |
//! | Barrier | `barrier q;` |
//! | Includes | `include "qelib1.inc";` (built in) |
//! | Gate definitions | `gate bell a, b { h a; cx a, b; }` |
//!
//! Classical control (`if`), `reset`, `opaque` and barriers over a subset of
//! qubits are rejected with [`ParseError::UnsupportedConstruct`].
//!
//! A program declares at most one register of each kind, and indexed
//! references are checked against its size only: the register name in
//! `h r[0];` is not compared with the declared `qreg` name.
//!
//! # Example
//!
//! ```rust
//! use quasar_qasm2::parse;
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[3];
//!     creg c[3];
//!     h q[0];
//!     cx q[0], q[1];
//!     ccx q[0], q[1], q[2];
//!     measure q -> c;
//! "#;
//!
//! let circuit = parse(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 3);
//! assert!(circuit.instructions().last().unwrap().is_measure());
//! ```
//!
//! # Example: Custom Includes
//!
//! ```rust
//! use quasar_qasm2::{MapResolver, ParserConfig, parse_with_config};
//!
//! let resolver = MapResolver::new().with_file("bell.inc", "gate bell a, b { h a; cx a, b; }");
//! let config = ParserConfig::new().with_resolver(resolver);
//!
//! let qasm = "OPENQASM 2.0;\nqreg q[2];\ninclude \"bell.inc\";\nbell q[0], q[1];";
//! let circuit = parse_with_config(qasm, &config).unwrap();
//! assert_eq!(circuit.len(), 2);
//! ```

mod config;
mod cursor;
mod error;
pub mod gates;
mod lexer;
mod parser;
mod preprocess;

pub use config::{IncludeResolver, MapResolver, NoIncludes, ParserConfig, QELIB1};
pub use error::{Construct, ParseError, ParseResult, SourceLocation};
pub use parser::{parse, parse_preprocessed, parse_with_config};
pub use preprocess::{Preprocessed, preprocess};

/// Token-level access for tooling.
pub mod syntax {
    pub use crate::lexer::{SpannedToken, Token, lex, tokenize};
}
