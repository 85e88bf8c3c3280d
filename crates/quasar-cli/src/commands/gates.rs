//! Gates command implementation.

use console::style;

use quasar_qasm2::gates::{self, GateArity};

fn category(arity: GateArity) -> &'static str {
    match arity {
        GateArity::Single => "single-qubit",
        GateArity::TwoQubit => "two-qubit",
        GateArity::OneParameter => "one-parameter",
        GateArity::UFamily => "U family",
    }
}

/// Execute the gates command.
pub fn execute() {
    println!("{} Primitive gates:\n", style("Quasar").cyan().bold());
    println!(
        "  {:<8} {:<14} {}",
        style("keyword").bold(),
        style("category").bold(),
        style("params").bold()
    );
    for spec in gates::primitives() {
        println!(
            "  {:<8} {:<14} {}",
            style(spec.keyword).green(),
            category(spec.arity),
            spec.num_params
        );
    }
    println!();
    println!(
        "  {}",
        style("Composite gates come from include \"qelib1.inc\";").dim()
    );
}
