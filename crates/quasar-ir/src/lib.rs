//! Quasar Circuit Program Representation
//!
//! This crate holds the value produced by the Quasar front end: a circuit
//! program made of register sizes and an ordered instruction list.
//!
//! # Core Components
//!
//! - **Indices**: [`QubitId`], [`ClbitId`] for addressing the quantum and
//!   classical registers
//! - **Gates**: [`StandardGate`], the primitive gate set with evaluated angles
//! - **Instructions**: [`Instruction`], a gate application, a measurement or a barrier
//! - **Circuit**: [`Circuit`], the append-only accumulator
//!
//! # Example
//!
//! ```rust
//! use quasar_ir::{Circuit, Instruction, QubitId, StandardGate};
//!
//! let mut circuit = Circuit::new();
//! circuit.set_qubit_count(2).unwrap();
//! circuit
//!     .append(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
//!     .append(Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1)))
//!     .append(Instruction::measure_all());
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.len(), 3);
//! ```
//!
//! Measurements keep `None` target lists as written: "all qubits" is a
//! different instruction from an explicit list covering every qubit.

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use qubit::{ClbitId, QubitId};
