//! Bound quantum circuit
//!
//! Gantree: L1_Circuit → Circuit
//!
//! A fixed gate sequence on `num_qubits` qubits. Produced by binding a
//! [`ParamCircuit`](crate::param_circuit::ParamCircuit) or built directly.

use crate::error::{HeaError, HeaResult};
use crate::gate::Gate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantum circuit
/// Gantree: Circuit // 회로 구조체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Gantree: num_qubits: usize // 큐비트 수
    num_qubits: usize,

    /// Gantree: gates: Vec<Gate> // 게이트 목록
    gates: Vec<Gate>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Create from a vector of gates, validating qubit indices
    pub fn from_gates(num_qubits: usize, gates: Vec<Gate>) -> HeaResult<Self> {
        let mut circuit = Self::new(num_qubits);
        circuit.add_gates(gates)?;
        Ok(circuit)
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Add a gate to the circuit
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> HeaResult<()> {
        check_gate(&gate, self.num_qubits)?;
        self.gates.push(gate);
        Ok(())
    }

    /// Add multiple gates
    pub fn add_gates(&mut self, gates: impl IntoIterator<Item = Gate>) -> HeaResult<()> {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gate sequence
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    // ========================================================================
    // Circuit Analysis
    // ========================================================================

    /// Circuit depth (longest path through the qubit wires)
    /// Gantree: depth(&self) -> usize // 깊이 계산
    pub fn depth(&self) -> usize {
        let mut qubit_depths = vec![0usize; self.num_qubits];
        for gate in &self.gates {
            let qubits = gate.qubits();
            let level = qubits.iter().map(|&q| qubit_depths[q]).max().unwrap_or(0) + 1;
            for q in qubits {
                qubit_depths[q] = level;
            }
        }
        qubit_depths.into_iter().max().unwrap_or(0)
    }

    /// Total gate count
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Count single-qubit gates
    pub fn count_1q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_single_qubit()).count()
    }

    /// Count two-qubit gates
    /// Gantree: count_2q(&self) -> usize // 2Q 수
    pub fn count_2q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    // ========================================================================
    // QASM Conversion
    // ========================================================================

    /// Convert to OpenQASM 2.0 string
    /// Gantree: to_qasm(&self) -> String // QASM2 출력
    pub fn to_qasm(&self) -> String {
        let mut lines = vec![
            "OPENQASM 2.0;".to_string(),
            "include \"qelib1.inc\";".to_string(),
            format!("qreg q[{}];", self.num_qubits),
        ];
        lines.extend(self.gates.iter().map(Gate::to_qasm));
        lines.join("\n")
    }
}

/// Reject gates addressing qubits beyond the register or repeating a qubit
pub(crate) fn check_gate(gate: &Gate, num_qubits: usize) -> HeaResult<()> {
    let qubits = gate.qubits();
    for &qubit in &qubits {
        if qubit >= num_qubits {
            return Err(HeaError::GateQubitMismatch { qubit, num_qubits });
        }
    }
    if qubits.len() == 2 && qubits[0] == qubits[1] {
        return Err(HeaError::InvalidConfig {
            field: "gate",
            reason: format!("{} acts twice on qubit {}", gate.name(), qubits[0]),
        });
    }
    Ok(())
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} gates)",
            self.num_qubits,
            self.gates.len()
        )?;
        writeln!(f, "  Depth: {}", self.depth())?;
        writeln!(f, "  1Q gates: {}", self.count_1q())?;
        writeln!(f, "  2Q gates: {}", self.count_2q())?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_gate_out_of_range() {
        let mut circuit = Circuit::new(3);
        assert!(circuit.add_gate(Gate::H(2)).is_ok());
        assert!(matches!(
            circuit.add_gate(Gate::H(5)),
            Err(HeaError::GateQubitMismatch { qubit: 5, .. })
        ));
        assert!(circuit.add_gate(Gate::Cnot(1, 1)).is_err());
    }

    #[test]
    fn test_circuit_depth() {
        let circuit = Circuit::from_gates(
            3,
            vec![Gate::H(0), Gate::H(1), Gate::Cnot(0, 1), Gate::H(2)],
        )
        .unwrap();
        assert_eq!(circuit.depth(), 2);
        assert_eq!(Circuit::new(2).depth(), 0);
    }

    #[test]
    fn test_gate_counts() {
        let circuit = Circuit::from_gates(
            3,
            vec![Gate::Ry(0, 0.1), Gate::Ry(1, 0.2), Gate::Cnot(0, 1), Gate::S(2)],
        )
        .unwrap();
        assert_eq!(circuit.count_1q(), 3);
        assert_eq!(circuit.count_2q(), 1);
    }

    #[test]
    fn test_to_qasm() {
        let circuit = Circuit::from_gates(2, vec![Gate::H(0), Gate::Cnot(0, 1)]).unwrap();
        let qasm = circuit.to_qasm();
        assert!(qasm.contains("OPENQASM 2.0"));
        assert!(qasm.contains("qreg q[2]"));
        assert!(qasm.contains("cx q[0],q[1]"));
    }
}
