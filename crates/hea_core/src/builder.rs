//! Parameterized circuit builder
//!
//! Gantree: L1_Circuit → ParamCircuitBuilder
//!
//! Fluent consuming builder. The first invalid gate is remembered and
//! reported by [`ParamCircuitBuilder::build`].

use crate::error::{HeaError, HeaResult};
use crate::gate::{Gate, RotationAxis};
use crate::param_circuit::ParamCircuit;
use crate::types::QubitId;

/// Fluent builder for [`ParamCircuit`] (consuming self pattern)
/// Gantree: ParamCircuitBuilder // 빌더 패턴
pub struct ParamCircuitBuilder {
    circuit: ParamCircuit,
    error: Option<HeaError>,
}

impl ParamCircuitBuilder {
    /// Create a new builder
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: ParamCircuit::new(num_qubits),
            error: None,
        }
    }

    fn record(&mut self, result: HeaResult<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    fn gate(mut self, gate: Gate) -> Self {
        let r = self.circuit.push_gate(gate);
        self.record(r);
        self
    }

    // ========================================================================
    // Fixed Gates
    // ========================================================================

    /// Add Hadamard gate
    pub fn h(self, qubit: QubitId) -> Self {
        self.gate(Gate::H(qubit))
    }

    /// Add Pauli-X gate
    /// Gantree: x(self, q) -> Self // X 추가
    pub fn x(self, qubit: QubitId) -> Self {
        self.gate(Gate::X(qubit))
    }

    /// Add S gate
    pub fn s(self, qubit: QubitId) -> Self {
        self.gate(Gate::S(qubit))
    }

    /// Add S-dagger gate
    pub fn sdg(self, qubit: QubitId) -> Self {
        self.gate(Gate::Sdg(qubit))
    }

    /// Add CNOT
    /// Gantree: cnot(self, c, t) -> Self // CNOT 추가
    pub fn cnot(self, control: QubitId, target: QubitId) -> Self {
        self.gate(Gate::Cnot(control, target))
    }

    /// Add CZ
    pub fn cz(self, a: QubitId, b: QubitId) -> Self {
        self.gate(Gate::Cz(a, b))
    }

    /// Add a fixed-angle rotation
    pub fn fixed(self, gate: Gate) -> Self {
        self.gate(gate)
    }

    // ========================================================================
    // Parameterized Rotations
    // ========================================================================

    /// Rotation on `qubit` reading a fresh parameter
    pub fn rotation(mut self, axis: RotationAxis, qubit: QubitId) -> Self {
        let r = self.circuit.push_new_rotation(axis, qubit).map(|_| ());
        self.record(r);
        self
    }

    /// Rotation on `qubit` reading an existing (or explicit) parameter index
    pub fn rotation_shared(mut self, axis: RotationAxis, qubit: QubitId, param: usize) -> Self {
        let r = self.circuit.push_rotation(axis, qubit, param);
        self.record(r);
        self
    }

    /// Ry with a fresh parameter
    /// Gantree: ry_param(self, q) -> Self // Ry(θ_k) 추가
    pub fn ry_param(self, qubit: QubitId) -> Self {
        self.rotation(RotationAxis::Y, qubit)
    }

    /// Rz with a fresh parameter
    pub fn rz_param(self, qubit: QubitId) -> Self {
        self.rotation(RotationAxis::Z, qubit)
    }

    // ========================================================================
    // Layers
    // ========================================================================

    /// Ry with a fresh parameter on every qubit, in qubit order
    /// Gantree: ry_layer(self) -> Self // Ry 레이어
    pub fn ry_layer(self) -> Self {
        let n = self.circuit.num_qubits();
        (0..n).fold(self, |b, q| b.ry_param(q))
    }

    /// CNOT(q, q+1) for q = 0..n-2
    /// Gantree: cnot_chain(self) -> Self // 선형 얽힘
    pub fn cnot_chain(self) -> Self {
        let n = self.circuit.num_qubits();
        (0..n.saturating_sub(1)).fold(self, |b, q| b.cnot(q, q + 1))
    }

    /// CNOT(i, j) for every pair i < j
    pub fn full_entangle(self) -> Self {
        let n = self.circuit.num_qubits();
        let mut b = self;
        for i in 0..n {
            for j in i + 1..n {
                b = b.cnot(i, j);
            }
        }
        b
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Finish, surfacing the first invalid operation
    /// Gantree: build(self) -> Result<ParamCircuit> // 완성
    pub fn build(self) -> HeaResult<ParamCircuit> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.circuit),
        }
    }

    /// Number of parameters allocated so far
    pub fn num_params(&self) -> usize {
        self.circuit.num_params()
    }
}

// ============================================================================
// Tests
// ============================================================================
