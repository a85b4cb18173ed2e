//! Parameterized circuits
//!
//! Gantree: L1_Circuit → ParamCircuit
//!
//! An ordered list of fixed gates and Pauli rotations whose angles are
//! read from a parameter vector. Several rotations may share a parameter.

use crate::circuit::{check_gate, Circuit};
use crate::error::{HeaError, HeaResult};
use crate::gate::{Gate, RotationAxis};
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One operation of a parameterized circuit
/// Gantree: ParamOp // 고정 게이트 | 회전
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParamOp {
    /// Gate with no free parameter
    Fixed(Gate),
    /// Rotation whose angle is `params[param]`
    Rotation {
        /// Rotation axis
        axis: RotationAxis,
        /// Target qubit
        qubit: QubitId,
        /// Index into the parameter vector
        param: usize,
    },
}

impl ParamOp {
    /// Qubits touched by the operation
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            ParamOp::Fixed(g) => g.qubits(),
            ParamOp::Rotation { qubit, .. } => vec![*qubit],
        }
    }
}

/// Parameterized quantum circuit
/// Gantree: ParamCircuit // 파라미터 회로
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamCircuit {
    num_qubits: usize,
    num_params: usize,
    ops: Vec<ParamOp>,
}

/// Result of binding a parameter vector
/// Gantree: BoundCircuit // circuit + param_map
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCircuit {
    /// Concrete gate sequence
    pub circuit: Circuit,
    /// For each gate of `circuit`, the parameter it reads (if any)
    pub param_map: Vec<Option<usize>>,
}

impl ParamCircuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty parameterized circuit
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            num_params: 0,
            ops: Vec::new(),
        }
    }

    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> HeaResult<Self> {
        let circuit: Self = serde_json::from_str(json)?;
        circuit.validate()?;
        Ok(circuit)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> HeaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Building
    // ========================================================================

    /// Append a fixed gate
    pub fn push_gate(&mut self, gate: Gate) -> HeaResult<()> {
        check_gate(&gate, self.num_qubits)?;
        self.ops.push(ParamOp::Fixed(gate));
        Ok(())
    }

    /// Append a rotation bound to parameter `param`
    /// Gantree: push_rotation(axis, q, idx) -> Result // 회전 추가
    pub fn push_rotation(&mut self, axis: RotationAxis, qubit: QubitId, param: usize) -> HeaResult<()> {
        if qubit >= self.num_qubits {
            return Err(HeaError::GateQubitMismatch {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        self.ops.push(ParamOp::Rotation { axis, qubit, param });
        self.num_params = self.num_params.max(param + 1);
        Ok(())
    }

    /// Append a rotation reading a fresh parameter; returns its index
    pub fn push_new_rotation(&mut self, axis: RotationAxis, qubit: QubitId) -> HeaResult<usize> {
        let param = self.num_params;
        self.push_rotation(axis, qubit, param)?;
        Ok(param)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of free parameters
    /// Gantree: num_params() -> usize // 파라미터 수
    pub fn num_params(&self) -> usize {
        self.num_params
    }

    /// Operation list
    pub fn ops(&self) -> &[ParamOp] {
        &self.ops
    }

    /// Number of rotations (counts shared parameters once per occurrence)
    pub fn num_rotations(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, ParamOp::Rotation { .. }))
            .count()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check qubit indices and that every parameter index is used
    pub fn validate(&self) -> HeaResult<()> {
        let mut used = vec![false; self.num_params];
        for op in &self.ops {
            match op {
                ParamOp::Fixed(g) => check_gate(g, self.num_qubits)?,
                ParamOp::Rotation { qubit, param, .. } => {
                    if *qubit >= self.num_qubits {
                        return Err(HeaError::GateQubitMismatch {
                            qubit: *qubit,
                            num_qubits: self.num_qubits,
                        });
                    }
                    if *param >= self.num_params {
                        return Err(HeaError::ShapeMismatch {
                            what: "parameter index",
                            expected: self.num_params,
                            actual: *param + 1,
                        });
                    }
                    used[*param] = true;
                }
            }
        }
        if let Some(unused) = used.iter().position(|u| !u) {
            return Err(HeaError::InvalidConfig {
                field: "circuit",
                reason: format!("parameter {} is never used", unused),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Binding
    // ========================================================================

    /// Substitute `params` into the rotations
    /// Gantree: bind(params) -> Result<BoundCircuit> // 파라미터 대입
    pub fn bind(&self, params: &[f64]) -> HeaResult<BoundCircuit> {
        if params.len() != self.num_params {
            return Err(HeaError::ShapeMismatch {
                what: "params",
                expected: self.num_params,
                actual: params.len(),
            });
        }
        let mut gates = Vec::with_capacity(self.ops.len());
        let mut param_map = Vec::with_capacity(self.ops.len());
        for op in &self.ops {
            match *op {
                ParamOp::Fixed(g) => {
                    gates.push(g);
                    param_map.push(None);
                }
                ParamOp::Rotation { axis, qubit, param } => {
                    gates.push(axis.gate(qubit, params[param]));
                    param_map.push(Some(param));
                }
            }
        }
        Ok(BoundCircuit {
            circuit: Circuit::from_gates(self.num_qubits, gates)?,
            param_map,
        })
    }
}

impl fmt::Display for ParamCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParamCircuit({} qubits, {} params, {} ops)",
            self.num_qubits,
            self.num_params,
            self.ops.len()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParamCircuit {
        let mut pc = ParamCircuit::new(2);
        pc.push_new_rotation(RotationAxis::Y, 0).unwrap();
        pc.push_new_rotation(RotationAxis::Y, 1).unwrap();
        pc.push_gate(Gate::Cnot(0, 1)).unwrap();
        pc.push_rotation(RotationAxis::Z, 1, 0).unwrap();
        pc
    }

    #[test]
    fn test_num_params_counts_shared_once() {
        let pc = sample();
        assert_eq!(pc.num_params(), 2);
        assert_eq!(pc.num_rotations(), 3);
        assert!(pc.validate().is_ok());
    }

    #[test]
    fn test_bind_maps_parameters() {
        let bound = sample().bind(&[0.3, -0.2]).unwrap();
        assert_eq!(
            bound.circuit.gates(),
            &[Gate::Ry(0, 0.3), Gate::Ry(1, -0.2), Gate::Cnot(0, 1), Gate::Rz(1, 0.3)]
        );
        assert_eq!(bound.param_map, vec![Some(0), Some(1), None, Some(0)]);
    }

    #[test]
    fn test_bind_wrong_length() {
        let err = sample().bind(&[0.1]).unwrap_err();
        assert_eq!(
            err,
            HeaError::ShapeMismatch {
                what: "params",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let pc = sample();
        let back = ParamCircuit::from_json(&pc.to_json().unwrap()).unwrap();
        assert_eq!(pc, back);

        let bad = r#"{"num_qubits":1,"num_params":2,"ops":[{"Rotation":{"axis":"Y","qubit":0,"param":0}}]}"#;
        assert!(ParamCircuit::from_json(bad).is_err());
    }

    #[test]
    fn test_rotation_out_of_range() {
        let mut pc = ParamCircuit::new(1);
        assert!(pc.push_rotation(RotationAxis::X, 3, 0).is_err());
        assert_eq!(pc.num_params(), 0);
    }
}
