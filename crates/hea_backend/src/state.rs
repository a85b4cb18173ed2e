//! Common interface of simulated quantum states
//!
//! Gantree: L4_Backend → QuantumState

use hea_core::circuit::Circuit;
use hea_core::error::{HeaError, HeaResult};
use hea_core::gate::Gate;
use hea_core::pauli::QubitOperator;

/// A state that gates act on and that can be measured
/// Gantree: QuantumState // 상태 trait
pub trait QuantumState: Clone {
    /// Register size
    fn num_qubits(&self) -> usize;

    /// Apply one ideal gate
    fn apply_gate(&mut self, gate: &Gate) -> HeaResult<()>;

    /// Computational-basis probabilities, indexed little-endian
    fn probabilities(&self) -> Vec<f64>;

    /// `<O>` of a Hermitian operator (real part)
    fn expectation(&self, op: &QubitOperator) -> HeaResult<f64>;

    /// Apply every gate of `circuit` in order
    fn apply_circuit(&mut self, circuit: &Circuit) -> HeaResult<()> {
        check_register(self.num_qubits(), circuit.num_qubits())?;
        for gate in circuit.gates() {
            self.apply_gate(gate)?;
        }
        Ok(())
    }
}

/// A circuit must fit on the simulated register
pub(crate) fn check_register(state_qubits: usize, other_qubits: usize) -> HeaResult<()> {
    if other_qubits > state_qubits {
        return Err(HeaError::GateQubitMismatch {
            qubit: other_qubits - 1,
            num_qubits: state_qubits,
        });
    }
    Ok(())
}

/// Gate qubits must lie on the register
pub(crate) fn check_gate_qubits(gate: &Gate, num_qubits: usize) -> HeaResult<()> {
    match gate.qubits().into_iter().find(|&q| q >= num_qubits) {
        Some(qubit) => Err(HeaError::GateQubitMismatch { qubit, num_qubits }),
        None => Ok(()),
    }
}
