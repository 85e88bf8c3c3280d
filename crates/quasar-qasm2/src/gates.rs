//! The primitive gate table.
//!
//! Maps each gate keyword to its arity category and the constructor of the
//! resulting [`StandardGate`]. Built once on first use and only read after
//! that, so concurrent parses share it without locking.

use std::sync::LazyLock;

use quasar_ir::StandardGate;
use rustc_hash::FxHashMap;

/// How a gate keyword is applied in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateArity {
    /// `g q[i], q[j], ...;` or the broadcast form `g q;`.
    Single,
    /// `g q[i], q[j];`, exactly one pair.
    TwoQubit,
    /// `g(expr) q[i];`
    OneParameter,
    /// `g(expr[, expr[, expr]]) q[i];`, a generalized U gate.
    UFamily,
}

/// Dispatch entry for one gate keyword.
#[derive(Debug, Clone, Copy)]
pub struct GateSpec {
    /// The keyword as written in source.
    pub keyword: &'static str,
    /// Arity category, which selects the statement parser.
    pub arity: GateArity,
    /// Number of parameters the keyword reads from source.
    pub num_params: usize,
    build: fn(&[f64]) -> StandardGate,
}

impl GateSpec {
    const fn new(
        keyword: &'static str,
        arity: GateArity,
        num_params: usize,
        build: fn(&[f64]) -> StandardGate,
    ) -> Self {
        Self {
            keyword,
            arity,
            num_params,
            build,
        }
    }

    /// Build the gate. Parameters that were not supplied read as zero.
    pub fn build(&self, params: &[f64]) -> StandardGate {
        (self.build)(params)
    }
}

/// Parameter `i`, or zero when it was omitted.
fn param(params: &[f64], i: usize) -> f64 {
    params.get(i).copied().unwrap_or(0.0)
}

fn u_gate(p: &[f64]) -> StandardGate {
    StandardGate::U(param(p, 0), param(p, 1), param(p, 2))
}

const PRIMITIVES: &[GateSpec] = &[
    // Zero-parameter, single target
    GateSpec::new("id", GateArity::Single, 0, |_| StandardGate::I),
    GateSpec::new("x", GateArity::Single, 0, |_| StandardGate::X),
    GateSpec::new("y", GateArity::Single, 0, |_| StandardGate::Y),
    GateSpec::new("z", GateArity::Single, 0, |_| StandardGate::Z),
    GateSpec::new("h", GateArity::Single, 0, |_| StandardGate::H),
    GateSpec::new("s", GateArity::Single, 0, |_| StandardGate::S),
    GateSpec::new("sdg", GateArity::Single, 0, |_| StandardGate::Sdg),
    GateSpec::new("t", GateArity::Single, 0, |_| StandardGate::T),
    GateSpec::new("tdg", GateArity::Single, 0, |_| StandardGate::Tdg),
    GateSpec::new("sx", GateArity::Single, 0, |_| StandardGate::SX),
    GateSpec::new("sxdg", GateArity::Single, 0, |_| StandardGate::SXdg),
    // Two-qubit
    GateSpec::new("cx", GateArity::TwoQubit, 0, |_| StandardGate::CX),
    GateSpec::new("CX", GateArity::TwoQubit, 0, |_| StandardGate::CX),
    GateSpec::new("cy", GateArity::TwoQubit, 0, |_| StandardGate::CY),
    GateSpec::new("cz", GateArity::TwoQubit, 0, |_| StandardGate::CZ),
    GateSpec::new("ch", GateArity::TwoQubit, 0, |_| StandardGate::CH),
    GateSpec::new("swap", GateArity::TwoQubit, 0, |_| StandardGate::Swap),
    // One parameter, single target
    GateSpec::new("rx", GateArity::OneParameter, 1, |p| {
        StandardGate::Rx(param(p, 0))
    }),
    GateSpec::new("ry", GateArity::OneParameter, 1, |p| {
        StandardGate::Ry(param(p, 0))
    }),
    GateSpec::new("rz", GateArity::OneParameter, 1, |p| {
        StandardGate::Rz(param(p, 0))
    }),
    GateSpec::new("p", GateArity::OneParameter, 1, |p| StandardGate::P(param(p, 0))),
    // U family; all of them produce U(θ, φ, λ)
    GateSpec::new("u1", GateArity::UFamily, 1, u_gate),
    GateSpec::new("u2", GateArity::UFamily, 2, u_gate),
    GateSpec::new("u3", GateArity::UFamily, 3, u_gate),
    GateSpec::new("u", GateArity::UFamily, 3, u_gate),
    GateSpec::new("U", GateArity::UFamily, 3, u_gate),
];

static GATE_TABLE: LazyLock<FxHashMap<&'static str, GateSpec>> =
    LazyLock::new(|| PRIMITIVES.iter().map(|spec| (spec.keyword, *spec)).collect());

/// Look up a gate keyword.
pub fn lookup(keyword: &str) -> Option<&'static GateSpec> {
    GATE_TABLE.get(keyword)
}

/// Check whether a name is a primitive gate keyword.
pub fn is_primitive(keyword: &str) -> bool {
    GATE_TABLE.contains_key(keyword)
}

/// All primitive gates, in table order.
pub fn primitives() -> &'static [GateSpec] {
    PRIMITIVES
}
