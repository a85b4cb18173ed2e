//! Quantum gate definitions for HEA
//!
//! Gantree: L1_Circuit → Gate
//!
//! The gate set needed by hardware-efficient ansätze and by measurement
//! basis changes. Rotations follow `R_a(θ) = exp(-i θ a / 2)`.

use crate::types::{Angle, Basis, QubitId};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 2x2 complex matrix, row-major
pub type Matrix2 = [[Complex64; 2]; 2];

/// Quantum gate enumeration
/// Gantree: Gate // 게이트 enum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // ========================================================================
    // Single-Qubit Gates (Non-Parameterized)
    // ========================================================================
    /// Hadamard gate
    /// Gantree: H(QubitId) // 하다마드
    H(QubitId),

    /// Pauli-X gate
    X(QubitId),

    /// Pauli-Y gate
    Y(QubitId),

    /// Pauli-Z gate
    Z(QubitId),

    /// S gate (sqrt(Z))
    S(QubitId),

    /// S-dagger gate
    /// Gantree: Sdg(QubitId) // S†
    Sdg(QubitId),

    // ========================================================================
    // Single-Qubit Rotations
    // ========================================================================
    /// Rotation around X-axis
    /// Gantree: Rx(QubitId, Angle) // X 회전
    Rx(QubitId, Angle),

    /// Rotation around Y-axis
    /// Gantree: Ry(QubitId, Angle) // Y 회전
    Ry(QubitId, Angle),

    /// Rotation around Z-axis
    /// Gantree: Rz(QubitId, Angle) // Z 회전
    Rz(QubitId, Angle),

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Controlled-NOT (control, target)
    /// Gantree: Cnot(QubitId, QubitId) // ctrl, tgt
    Cnot(QubitId, QubitId),

    /// Controlled-Z
    Cz(QubitId, QubitId),

    /// SWAP gate
    Swap(QubitId, QubitId),
}

impl Gate {
    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Qubits touched by this gate
    /// Gantree: qubits(&self) -> Vec<QubitId> // 관련 큐비트
    pub fn qubits(&self) -> Vec<QubitId> {
        match *self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::Rx(q, _)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _) => vec![q],
            Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Swap(a, b) => vec![a, b],
        }
    }

    /// Check if gate is single-qubit
    pub fn is_single_qubit(&self) -> bool {
        !self.is_two_qubit()
    }

    /// Check if gate is two-qubit
    /// Gantree: is_two_qubit(&self) -> bool // 2Q 판별
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Gate::Cnot(..) | Gate::Cz(..) | Gate::Swap(..))
    }

    /// Check if gate is a rotation
    pub fn is_parameterized(&self) -> bool {
        self.angle().is_some()
    }

    /// Rotation angle, if any
    pub fn angle(&self) -> Option<Angle> {
        match *self {
            Gate::Rx(_, t) | Gate::Ry(_, t) | Gate::Rz(_, t) => Some(t),
            _ => None,
        }
    }

    /// Same gate with a new rotation angle (non-rotations unchanged)
    /// Gantree: with_angle(self, θ) -> Self // 각도 교체
    pub fn with_angle(self, theta: Angle) -> Self {
        match self {
            Gate::Rx(q, _) => Gate::Rx(q, theta),
            Gate::Ry(q, _) => Gate::Ry(q, theta),
            Gate::Rz(q, _) => Gate::Rz(q, theta),
            other => other,
        }
    }

    /// Rotation axis, if any
    pub fn axis(&self) -> Option<RotationAxis> {
        match self {
            Gate::Rx(..) => Some(RotationAxis::X),
            Gate::Ry(..) => Some(RotationAxis::Y),
            Gate::Rz(..) => Some(RotationAxis::Z),
            _ => None,
        }
    }

    /// Inverse gate
    /// Gantree: inverse(&self) -> Gate // 역게이트
    pub fn inverse(&self) -> Gate {
        match *self {
            Gate::S(q) => Gate::Sdg(q),
            Gate::Sdg(q) => Gate::S(q),
            Gate::Rx(q, t) => Gate::Rx(q, -t),
            Gate::Ry(q, t) => Gate::Ry(q, -t),
            Gate::Rz(q, t) => Gate::Rz(q, -t),
            other => other,
        }
    }

    /// Gate name (QASM mnemonic)
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H(_) => "h",
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::S(_) => "s",
            Gate::Sdg(_) => "sdg",
            Gate::Rx(..) => "rx",
            Gate::Ry(..) => "ry",
            Gate::Rz(..) => "rz",
            Gate::Cnot(..) => "cx",
            Gate::Cz(..) => "cz",
            Gate::Swap(..) => "swap",
        }
    }

    /// Convert to OpenQASM 2.0 statement
    /// Gantree: to_qasm(&self) -> String // QASM 변환
    pub fn to_qasm(&self) -> String {
        match *self {
            Gate::Rx(q, t) | Gate::Ry(q, t) | Gate::Rz(q, t) => {
                format!("{}({}) q[{}];", self.name(), t, q)
            }
            Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Swap(a, b) => {
                format!("{} q[{}],q[{}];", self.name(), a, b)
            }
            _ => format!("{} q[{}];", self.name(), self.qubits()[0]),
        }
    }

    // ========================================================================
    // Matrices
    // ========================================================================

    /// Unitary of a single-qubit gate; `None` for two-qubit gates
    /// Gantree: matrix_1q(&self) -> Option<Matrix2> // 2x2 행렬
    pub fn matrix_1q(&self) -> Option<Matrix2> {
        let c = |re: f64, im: f64| Complex64::new(re, im);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let m = match *self {
            Gate::H(_) => [[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]],
            Gate::X(_) => [[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]],
            Gate::Y(_) => [[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]],
            Gate::Z(_) => [[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]],
            Gate::S(_) => [[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, 1.0)]],
            Gate::Sdg(_) => [[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, -1.0)]],
            Gate::Rx(_, t) => {
                let (sn, cs) = (t / 2.0).sin_cos();
                [[c(cs, 0.0), c(0.0, -sn)], [c(0.0, -sn), c(cs, 0.0)]]
            }
            Gate::Ry(_, t) => {
                let (sn, cs) = (t / 2.0).sin_cos();
                [[c(cs, 0.0), c(-sn, 0.0)], [c(sn, 0.0), c(cs, 0.0)]]
            }
            Gate::Rz(_, t) => {
                let (sn, cs) = (t / 2.0).sin_cos();
                [[c(cs, -sn), c(0.0, 0.0)], [c(0.0, 0.0), c(cs, sn)]]
            }
            Gate::Cnot(..) | Gate::Cz(..) | Gate::Swap(..) => return None,
        };
        Some(m)
    }

    // ========================================================================
    // Basis Transformation Helpers
    // ========================================================================

    /// Gates rotating `basis` onto the computational basis
    /// X basis: H; Y basis: Sdg, H; Z basis: none
    pub fn basis_transform(qubit: QubitId, basis: Basis) -> Vec<Gate> {
        match basis {
            Basis::X => vec![Gate::H(qubit)],
            Basis::Y => vec![Gate::Sdg(qubit), Gate::H(qubit)],
            Basis::Z => vec![],
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_qasm())
    }
}

// ============================================================================
// Rotation Axis
// ============================================================================

/// Axis of a Pauli rotation
/// Gantree: RotationAxis // X/Y/Z 회전축
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationAxis {
    /// Rx
    X,
    /// Ry
    Y,
    /// Rz
    Z,
}

impl RotationAxis {
    /// Rotation gate on `qubit` by `theta`
    pub fn gate(&self, qubit: QubitId, theta: Angle) -> Gate {
        match self {
            RotationAxis::X => Gate::Rx(qubit, theta),
            RotationAxis::Y => Gate::Ry(qubit, theta),
            RotationAxis::Z => Gate::Rz(qubit, theta),
        }
    }
}

impl FromStr for RotationAxis {
    type Err = crate::error::HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x" | "rx" => Ok(RotationAxis::X),
            "y" | "ry" => Ok(RotationAxis::Y),
            "z" | "rz" => Ok(RotationAxis::Z),
            other => Err(crate::error::HeaError::unknown("rotation axis", other)),
        }
    }
}

impl fmt::Display for RotationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationAxis::X => write!(f, "rx"),
            RotationAxis::Y => write!(f, "ry"),
            RotationAxis::Z => write!(f, "rz"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
