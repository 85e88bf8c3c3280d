//! Circuit instructions.

use serde::{Deserialize, Serialize};

use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// A single entry in a circuit program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instruction {
    /// A gate applied to explicit qubits.
    Gate {
        /// The gate, with its evaluated parameters.
        gate: StandardGate,
        /// Target qubits, controls first.
        qubits: Vec<QubitId>,
    },
    /// Computational-basis measurement.
    ///
    /// `None` means "the whole register" (for `qubits`) or "no explicit
    /// classical mapping" (for `clbits`). This is not the same as an explicit
    /// list that happens to cover every index.
    Measure {
        /// Measured qubits, or `None` for all of them.
        qubits: Option<Vec<QubitId>>,
        /// Destination bits, or `None` when no mapping was written.
        clbits: Option<Vec<ClbitId>>,
    },
    /// Barrier over every qubit.
    Barrier,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::Gate {
            gate,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a measurement instruction.
    pub fn measure(qubits: Option<Vec<QubitId>>, clbits: Option<Vec<ClbitId>>) -> Self {
        Self::Measure { qubits, clbits }
    }

    /// Create a measurement of every qubit with no classical mapping.
    pub fn measure_all() -> Self {
        Self::measure(None, None)
    }

    /// Create a barrier instruction.
    pub fn barrier() -> Self {
        Self::Barrier
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self, Self::Gate { .. })
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self, Self::Measure { .. })
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self, Self::Barrier)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match self {
            Self::Gate { gate, .. } => Some(gate),
            _ => None,
        }
    }

    /// Get the explicit qubit targets, if any.
    pub fn qubits(&self) -> Option<&[QubitId]> {
        match self {
            Self::Gate { qubits, .. } => Some(qubits),
            Self::Measure { qubits, .. } => qubits.as_deref(),
            Self::Barrier => None,
        }
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match self {
            Self::Gate { gate, .. } => gate.name(),
            Self::Measure { .. } => "measure",
            Self::Barrier => "barrier",
        }
    }
}
