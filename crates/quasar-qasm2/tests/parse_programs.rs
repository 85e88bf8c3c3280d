//! End-to-end parsing of complete QASM2 programs.

use std::f64::consts::PI;

use quasar_ir::{ClbitId, Instruction, QubitId, StandardGate};
use quasar_qasm2::{
    Construct, MapResolver, ParseError, ParserConfig, SourceLocation, parse, parse_with_config,
    preprocess,
};

#[test]
fn test_minimal_program() {
    let circuit = parse("OPENQASM 2.0; qreg q[4]; x q[2];").unwrap();
    assert_eq!(circuit.num_qubits(), 4);
    assert_eq!(
        circuit.instructions(),
        &[Instruction::single_qubit_gate(StandardGate::X, QubitId(2))]
    );
}

#[test]
fn test_broadcast_emits_one_gate_per_qubit() {
    let circuit = parse("OPENQASM 2.0;\nqreg q[5];\nh q;").unwrap();
    assert_eq!(circuit.len(), 5);
    assert!(
        circuit
            .instructions()
            .iter()
            .all(|inst| inst.as_gate() == Some(&StandardGate::H))
    );
}

#[test]
fn test_measure_without_arrow_keeps_none() {
    let circuit = parse("OPENQASM 2.0;\nqreg q[2];\nmeasure q;").unwrap();
    assert_eq!(
        circuit.instructions()[0],
        Instruction::Measure {
            qubits: None,
            clbits: None,
        }
    );
}

#[test]
fn test_measure_with_explicit_lists() {
    let source = "OPENQASM 2.0;\nqreg q[2];\ncreg c[2];\nmeasure q[0],q[1] -> c[0],c[1];";
    let circuit = parse(source).unwrap();
    assert_eq!(
        circuit.instructions()[0],
        Instruction::measure(
            Some(vec![QubitId(0), QubitId(1)]),
            Some(vec![ClbitId(0), ClbitId(1)])
        )
    );
}

#[test]
fn test_u1_pads_to_three_parameters() {
    let circuit = parse("OPENQASM 2.0;\nqreg q[1];\nu1(pi/2) q[0];").unwrap();
    let gate = circuit.instructions()[0].as_gate().unwrap();
    assert_eq!(gate.parameters(), vec![PI / 2.0, 0.0, 0.0]);
}

#[test]
fn test_reparse_is_structurally_equal() {
    let source = r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[3];
        creg c[3];
        h q;
        crz(pi/3) q[0], q[2];
        barrier q;
        measure q -> c;
    "#;
    assert_eq!(parse(source).unwrap(), parse(source).unwrap());
}

#[test]
fn test_missing_bracket_in_register_declaration() {
    let source = "OPENQASM 2.0;\nqreg q 3];";
    let err = parse(source).unwrap_err();
    match &err {
        ParseError::SyntaxError {
            construct, cursor, ..
        } => {
            assert_eq!(*construct, Construct::QuantumRegister);
            assert_eq!(*cursor, 5);
        }
        other => panic!("expected SyntaxError, got {other:?}"),
    }
    let location = SourceLocation::locate(source, err.span().start);
    assert_eq!(location.to_string(), "2:8");
}

#[test]
fn test_unknown_gate_keyword() {
    let err = parse("OPENQASM 2.0;\nqreg q[1];\nfoo q[0];").unwrap_err();
    match err {
        ParseError::SyntaxError {
            construct, found, ..
        } => {
            assert_eq!(construct, Construct::Gate);
            assert_eq!(found, "foo");
        }
        other => panic!("expected SyntaxError, got {other:?}"),
    }
}

#[test]
fn test_user_gate_definition() {
    let source = r"
        OPENQASM 2.0;
        qreg q[2];
        gate entangle(theta) a, b {
            ry(theta) a;
            cx a, b;
        }
        entangle(pi/2) q[0], q[1];
        entangle(pi) q[1], q[0];
    ";
    let circuit = parse(source).unwrap();
    assert_eq!(
        circuit.instructions(),
        &[
            Instruction::single_qubit_gate(StandardGate::Ry(PI / 2.0), QubitId(0)),
            Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)),
            Instruction::single_qubit_gate(StandardGate::Ry(PI), QubitId(1)),
            Instruction::two_qubit_gate(StandardGate::CX, QubitId(1), QubitId(0)),
        ]
    );
}

#[test]
fn test_parameter_substitution_respects_precedence() {
    let source = r"
        OPENQASM 2.0;
        qreg q[1];
        gate half(t) a { rz(t/2) a; }
        half(1 + 1) q[0];
    ";
    let circuit = parse(source).unwrap();
    assert_eq!(circuit.instructions()[0].as_gate(), Some(&StandardGate::Rz(1.0)));
}

#[test]
fn test_qelib1_composites() {
    let source = r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[3];
        cswap q[0], q[1], q[2];
        rzz(0.25) q[0], q[1];
    "#;
    let circuit = parse(source).unwrap();
    let ops = circuit.count_ops();
    // cswap: cx, ccx (6 cx), cx; rzz: cx, p, cx
    assert_eq!(ops["cx"], 10);
    assert_eq!(ops["p"], 1);
}

#[test]
fn test_include_from_resolver() {
    let resolver = MapResolver::new()
        .with_file("lib.inc", "include \"inner.inc\";\ngate flip a { x a; }")
        .with_file("inner.inc", "gate flop a { flip_missing a; }");
    let config = ParserConfig::new().with_resolver(resolver);
    let err = parse_with_config("OPENQASM 2.0;\ninclude \"lib.inc\";", &config).unwrap_err();
    assert!(matches!(err, ParseError::InInclude { ref path, .. } if path == "lib.inc"));
    assert!(matches!(
        err.innermost(),
        ParseError::MalformedGateDefinition { gate, span, .. } if gate == "flop" && *span == (14..26)
    ));
}

#[test]
fn test_unresolved_include() {
    let config = ParserConfig::new().without_builtin_qelib1();
    let err = parse_with_config("OPENQASM 2.0;\ninclude \"qelib1.inc\";", &config).unwrap_err();
    assert!(matches!(err, ParseError::UnresolvedInclude { ref path, .. } if path == "qelib1.inc"));
}

#[test]
fn test_preprocess_output_is_plain_qasm() {
    let source = "OPENQASM 2.0;\nqreg q[2];\ngate bell a, b { h a; cx a, b; }\nbell q[0], q[1];\n";
    let text = preprocess(source, &ParserConfig::new()).unwrap().into_text();
    assert!(!text.contains("gate"));
    assert!(text.contains("h q[0]; cx q[0], q[1];"));
    assert_eq!(text.lines().count(), source.lines().count());
}

#[test]
fn test_lex_error_position() {
    let err = parse("OPENQASM 2.0;\nqreg q[1];\nh q[0] @;").unwrap_err();
    assert!(matches!(err, ParseError::LexError { .. }));
    assert_eq!(err.span().start, 32);
}

#[test]
fn test_invalid_expression() {
    let err = parse("OPENQASM 2.0;\nqreg q[1];\nrz(theta) q[0];").unwrap_err();
    assert!(matches!(err, ParseError::InvalidExpression { .. }));
}

#[test]
fn test_comments_are_ignored() {
    let source = r"
        // Bell pair
        OPENQASM 2.0;
        qreg q[2]; /* two qubits */
        h q[0]; // superpose
        cx q[0], q[1];
    ";
    assert_eq!(parse(source).unwrap().len(), 2);
}

#[test]
fn test_concurrent_parses() {
    let source = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\nccx q[0], q[1], q[2];";
    let expected = parse(source).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || parse(source).unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_lex_error_in_included_file() {
    let resolver = MapResolver::new().with_file("bad.inc", "$");
    let config = ParserConfig::new().with_resolver(resolver);
    let source = "OPENQASM 2.0;\nqreg q[1];\ninclude \"bad.inc\";\n";
    let err = parse_with_config(source, &config).unwrap_err();
    match &err {
        ParseError::InInclude { path, span, error } => {
            assert_eq!(path, "bad.inc");
            assert_eq!(SourceLocation::locate(source, span.start).to_string(), "3:1");
            assert!(matches!(**error, ParseError::LexError { ref span, .. } if *span == (0..1)));
        }
        other => panic!("expected InInclude, got {other:?}"),
    }
}

#[test]
fn test_statement_error_in_included_file() {
    let resolver = MapResolver::new().with_file("regs.inc", "qreg q[2];\ncreg c[2];\ncreg d[2];\n");
    let config = ParserConfig::new().with_resolver(resolver);
    let err = parse_with_config("OPENQASM 2.0;\ninclude \"regs.inc\";\n", &config).unwrap_err();
    assert_eq!(err.span(), 14..33);
    assert_eq!(
        err.innermost(),
        &ParseError::DuplicateDeclaration {
            construct: Construct::ClassicalRegister,
            span: 22..32,
        }
    );
}

#[test]
fn test_error_line_after_qelib1_include() {
    let source = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[1];\nfoo q[0];\n";
    let err = parse(source).unwrap_err();
    assert_eq!(SourceLocation::locate(source, err.span().start).to_string(), "4:1");
}

#[test]
fn test_register_name_is_not_checked() {
    // Indexed references are checked against the declared size only.
    let circuit = parse("OPENQASM 2.0;\nqreg q[2];\nh r[1];").unwrap();
    assert_eq!(circuit.instructions()[0].qubits(), Some(&[QubitId(1)][..]));
}
