//! The circuit program accumulator.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;

/// A quantum circuit program.
///
/// This is an ordered store: register sizes plus the instruction list in
/// program order. It performs no semantic validation of what is appended;
/// index bounds and grammar rules are the producer's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Number of qubits in the quantum register.
    qubit_count: u32,
    /// Number of bits in the classical register.
    classical_bit_count: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
    #[serde(skip)]
    qubits_declared: bool,
    #[serde(skip)]
    clbits_declared: bool,
}

impl Circuit {
    /// Create an empty circuit with no qubits and no classical bits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a circuit with both register sizes already established.
    pub fn with_size(num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            qubit_count: num_qubits,
            classical_bit_count: num_clbits,
            instructions: vec![],
            qubits_declared: true,
            clbits_declared: true,
        }
    }

    /// Set the qubit count. Fails if it was already set.
    pub fn set_qubit_count(&mut self, count: u32) -> IrResult<()> {
        if self.qubits_declared {
            return Err(IrError::QubitCountAlreadySet {
                current: self.qubit_count,
            });
        }
        self.qubit_count = count;
        self.qubits_declared = true;
        Ok(())
    }

    /// Set the classical bit count. Fails if it was already set.
    pub fn set_classical_bit_count(&mut self, count: u32) -> IrResult<()> {
        if self.clbits_declared {
            return Err(IrError::ClbitCountAlreadySet {
                current: self.classical_bit_count,
            });
        }
        self.classical_bit_count = count;
        self.clbits_declared = true;
        Ok(())
    }

    /// Append an instruction at the end of the program.
    pub fn append(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.qubit_count
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> u32 {
        self.classical_bit_count
    }

    /// Whether a quantum register has been declared.
    pub fn has_qubit_register(&self) -> bool {
        self.qubits_declared
    }

    /// Whether a classical register has been declared.
    pub fn has_classical_register(&self) -> bool {
        self.clbits_declared
    }

    /// Get the instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Consume the circuit and return its instructions.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Get the number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Count instructions by name.
    pub fn count_ops(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;
    use crate::qubit::QubitId;

    #[test]
    fn test_new_circuit_is_empty() {
        let circuit = Circuit::new();
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert!(circuit.is_empty());
        assert!(!circuit.has_qubit_register());
    }

    #[test]
    fn test_counts_set_once() {
        let mut circuit = Circuit::new();
        circuit.set_qubit_count(3).unwrap();
        circuit.set_classical_bit_count(2).unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);

        assert_eq!(
            circuit.set_qubit_count(5),
            Err(IrError::QubitCountAlreadySet { current: 3 })
        );
        assert_eq!(
            circuit.set_classical_bit_count(1),
            Err(IrError::ClbitCountAlreadySet { current: 2 })
        );
        assert_eq!(circuit.num_qubits(), 3);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut circuit = Circuit::with_size(2, 0);
        circuit
            .append(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .append(Instruction::two_qubit_gate(
                StandardGate::CX,
                QubitId(0),
                QubitId(1),
            ))
            .append(Instruction::barrier());

        let names: Vec<_> = circuit.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["h", "cx", "barrier"]);
        assert_eq!(circuit.len(), 3);
    }

    #[test]
    fn test_append_does_not_validate() {
        let mut circuit = Circuit::with_size(1, 0);
        circuit.append(Instruction::single_qubit_gate(StandardGate::X, QubitId(7)));
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn test_count_ops() {
        let mut circuit = Circuit::with_size(2, 2);
        for q in 0..2 {
            circuit.append(Instruction::single_qubit_gate(StandardGate::H, QubitId(q)));
        }
        circuit.append(Instruction::measure_all());

        let counts = circuit.count_ops();
        assert_eq!(counts["h"], 2);
        assert_eq!(counts["measure"], 1);
        assert!(!counts.contains_key("cx"));
    }

    #[test]
    fn test_json_roundtrip_keeps_program() {
        let mut circuit = Circuit::with_size(1, 1);
        circuit.append(Instruction::single_qubit_gate(
            StandardGate::U(1.5, 0.0, 0.0),
            QubitId(0),
        ));
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back.num_qubits(), 1);
        assert_eq!(back.instructions(), circuit.instructions());
    }
}
