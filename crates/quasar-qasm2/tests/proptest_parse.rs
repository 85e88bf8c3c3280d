//! Property-based tests for parsing generated QASM2 programs.

use quasar_ir::QubitId;
use quasar_qasm2::parse;
use proptest::prelude::*;

/// Statements that can appear in a generated program.
#[derive(Debug, Clone)]
enum Op {
    Single(&'static str, u32),
    Rotation(&'static str, f64, u32),
    U(Vec<f64>, u32),
    Two(&'static str, u32, u32),
    Measure(u32, u32),
    Barrier,
}

impl Op {
    fn to_qasm(&self) -> String {
        match self {
            Op::Single(name, q) => format!("{name} q[{q}];"),
            Op::Rotation(name, angle, q) => format!("{name}({angle:?}) q[{q}];"),
            Op::U(params, q) => {
                let keyword = match params.len() {
                    1 => "u1",
                    2 => "u2",
                    _ => "u3",
                };
                let list: Vec<String> = params.iter().map(|p| format!("{p:?}")).collect();
                format!("{keyword}({}) q[{q}];", list.join(", "))
            }
            Op::Two(name, a, b) => format!("{name} q[{a}], q[{b}];"),
            Op::Measure(q, c) => format!("measure q[{q}] -> c[{c}];"),
            Op::Barrier => "barrier q;".to_string(),
        }
    }
}

fn arb_op(num_qubits: u32) -> impl Strategy<Value = Op> {
    let single = prop::sample::select(vec!["id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx"]);
    let rotation = prop::sample::select(vec!["rx", "ry", "rz", "p"]);
    let two = prop::sample::select(vec!["cx", "cy", "cz", "ch", "swap"]);
    let angle = -10.0_f64..10.0;

    let base = prop_oneof![
        (single, 0..num_qubits).prop_map(|(g, q)| Op::Single(g, q)),
        (rotation, angle.clone(), 0..num_qubits).prop_map(|(g, a, q)| Op::Rotation(g, a, q)),
        (prop::collection::vec(angle, 1..=3), 0..num_qubits).prop_map(|(p, q)| Op::U(p, q)),
        (0..num_qubits, 0..num_qubits).prop_map(|(q, c)| Op::Measure(q, c)),
        Just(Op::Barrier),
    ];
    if num_qubits < 2 {
        base.boxed()
    } else {
        prop_oneof![
            base,
            (two, 0..num_qubits, 0..num_qubits)
                .prop_filter("Control and target must differ", |(_, a, b)| a != b)
                .prop_map(|(g, a, b)| Op::Two(g, a, b)),
        ]
        .boxed()
    }
}

/// A valid program with `n` qubits and `n` classical bits.
fn arb_program() -> impl Strategy<Value = (u32, Vec<Op>, String)> {
    (1_u32..=6).prop_flat_map(|n| {
        prop::collection::vec(arb_op(n), 0..=20).prop_map(move |ops| {
            let mut source = format!("OPENQASM 2.0;\nqreg q[{n}];\ncreg c[{n}];\n");
            for op in &ops {
                source.push_str(&op.to_qasm());
                source.push('\n');
            }
            (n, ops, source)
        })
    })
}

proptest! {
    /// Every generated statement becomes exactly one instruction.
    #[test]
    fn test_instruction_count_matches_statements((n, ops, source) in arb_program()) {
        let circuit = parse(&source).expect("generated program should parse");
        prop_assert_eq!(circuit.num_qubits(), n);
        prop_assert_eq!(circuit.num_clbits(), n);
        prop_assert_eq!(circuit.len(), ops.len());
    }

    /// U-family instructions always carry three parameters.
    #[test]
    fn test_u_family_has_three_parameters((_, _, source) in arb_program()) {
        let circuit = parse(&source).expect("generated program should parse");
        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                if gate.name() == "u" {
                    prop_assert_eq!(gate.parameters().len(), 3);
                }
            }
        }
    }

    /// Parsing the same text twice yields equal circuits.
    #[test]
    fn test_parse_is_deterministic((_, _, source) in arb_program()) {
        let first = parse(&source).expect("first parse failed");
        let second = parse(&source).expect("second parse failed");
        prop_assert_eq!(first, second);
    }

    /// A bare single-qubit gate covers the register in order.
    #[test]
    fn test_broadcast_covers_register(n in 1_u32..=32) {
        let source = format!("OPENQASM 2.0;\nqreg q[{n}];\nh q;");
        let circuit = parse(&source).expect("broadcast should parse");
        prop_assert_eq!(circuit.len(), n as usize);
        for (i, inst) in circuit.instructions().iter().enumerate() {
            prop_assert_eq!(inst.qubits(), Some(&[QubitId(i as u32)][..]));
        }
    }

    /// Any index at or past the register size is rejected.
    #[test]
    fn test_out_of_range_index_is_rejected(n in 1_u32..=16, extra in 0_u32..8) {
        let source = format!("OPENQASM 2.0;\nqreg q[{n}];\nx q[{}];", n + extra);
        prop_assert!(parse(&source).is_err());
    }

    /// A minimal program targets exactly the written index.
    #[test]
    fn test_minimal_program(n in 1_u32..=16, pick in 0_u32..16) {
        let i = pick % n;
        let source = format!("OPENQASM 2.0;\nqreg q[{n}];\nx q[{i}];");
        let circuit = parse(&source).expect("minimal program should parse");
        prop_assert_eq!(circuit.num_qubits(), n);
        prop_assert_eq!(circuit.instructions().len(), 1);
        let inst = &circuit.instructions()[0];
        prop_assert!(inst.is_gate());
        prop_assert_eq!(inst.qubits(), Some(&[QubitId(i)][..]));
    }
}
