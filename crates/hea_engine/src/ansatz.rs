//! Hardware-efficient ansatz families
//!
//! Gantree: L6_Engine → Ansatz
//!
//! - `ry`: an Ry layer, then `n_layers` × (CNOT chain, Ry layer)
//! - `real_amplitudes`: the same with all-to-all CNOTs between layers
//! - external: any validated [`ParamCircuit`]

use hea_core::error::{HeaError, HeaResult};
use hea_core::{BoundCircuit, ParamCircuit, ParamCircuitBuilder};
use std::fmt;

/// Parameterized circuit plus a short description
/// Gantree: Ansatz // 회로 + 이름
#[derive(Debug, Clone, PartialEq)]
pub struct Ansatz {
    name: String,
    circuit: ParamCircuit,
}

impl Ansatz {
    /// Linear-entangling Ry ansatz with `(n_layers + 1) · n_qubits` parameters
    /// Gantree: ry(n_qubits, n_layers) -> Result<Self> // Ry 앤자츠
    pub fn ry(n_qubits: usize, n_layers: usize) -> HeaResult<Self> {
        check_width(n_qubits)?;
        let circuit = (0..n_layers)
            .fold(ParamCircuitBuilder::new(n_qubits).ry_layer(), |b, _| {
                b.cnot_chain().ry_layer()
            })
            .build()?;
        Ok(Self {
            name: format!("ry(n_layers={})", n_layers),
            circuit,
        })
    }

    /// Fully-entangling Ry ansatz with `(reps + 1) · n_qubits` parameters
    pub fn real_amplitudes(n_qubits: usize, reps: usize) -> HeaResult<Self> {
        check_width(n_qubits)?;
        let circuit = (0..reps)
            .fold(ParamCircuitBuilder::new(n_qubits).ry_layer(), |b, _| {
                b.full_entangle().ry_layer()
            })
            .build()?;
        Ok(Self {
            name: format!("real_amplitudes(reps={})", reps),
            circuit,
        })
    }

    /// Wrap an externally built circuit
    /// Gantree: from_circuit(circuit) -> Result<Self> // 외부 회로
    pub fn from_circuit(circuit: ParamCircuit) -> HeaResult<Self> {
        check_width(circuit.num_qubits())?;
        circuit.validate()?;
        Ok(Self {
            name: "external".to_string(),
            circuit,
        })
    }

    /// Short description
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Underlying circuit
    pub fn circuit(&self) -> &ParamCircuit {
        &self.circuit
    }

    /// Qubit count
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }

    /// Free parameter count
    pub fn num_params(&self) -> usize {
        self.circuit.num_params()
    }

    /// Check a parameter vector's length
    /// Gantree: validate_params(params) -> Result<()> // 길이 검증
    pub fn validate_params(&self, params: &[f64]) -> HeaResult<()> {
        if params.len() != self.num_params() {
            return Err(HeaError::ShapeMismatch {
                what: "params",
                expected: self.num_params(),
                actual: params.len(),
            });
        }
        Ok(())
    }

    /// Bind a parameter vector
    pub fn bind(&self, params: &[f64]) -> HeaResult<BoundCircuit> {
        self.validate_params(params)?;
        self.circuit.bind(params)
    }
}

fn check_width(n_qubits: usize) -> HeaResult<()> {
    if n_qubits == 0 {
        return Err(HeaError::InvalidConfig {
            field: "n_qubits",
            reason: "ansatz needs at least one qubit".to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for Ansatz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} qubits, {} parameters",
            self.name,
            self.num_qubits(),
            self.num_params()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
