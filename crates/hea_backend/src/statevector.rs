//! Statevector simulation
//!
//! Gantree: L4_Backend → StateVector
//!
//! Dense amplitude vector; qubit `q` is bit `q` of the basis index.

use crate::state::{check_gate_qubits, QuantumState};
use hea_core::error::{HeaError, HeaResult};
use hea_core::gate::{Gate, Matrix2};
use hea_core::pauli::{PauliString, QubitOperator};
use hea_core::sim;
use num_complex::Complex64;

/// Pure state of `n` qubits
/// Gantree: StateVector // 상태 벡터
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amps: Vec<Complex64>,
}

impl StateVector {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// `|0...0>`
    /// Gantree: new(n) -> Result<Self> // 초기 상태
    pub fn new(num_qubits: usize) -> HeaResult<Self> {
        Self::check_size(num_qubits, sim::MAX_QUBITS_STATEVECTOR, "statevector")?;
        let mut amps = vec![Complex64::new(0.0, 0.0); 1usize << num_qubits];
        amps[0] = Complex64::new(1.0, 0.0);
        Ok(Self { num_qubits, amps })
    }

    /// Wrap an amplitude vector of length `2^n`
    pub fn from_amplitudes(amps: Vec<Complex64>) -> HeaResult<Self> {
        if !amps.len().is_power_of_two() {
            return Err(HeaError::ShapeMismatch {
                what: "amplitudes",
                expected: amps.len().next_power_of_two(),
                actual: amps.len(),
            });
        }
        let num_qubits = amps.len().trailing_zeros() as usize;
        Self::check_size(num_qubits, sim::MAX_QUBITS_STATEVECTOR, "statevector")?;
        Ok(Self { num_qubits, amps })
    }

    pub(crate) fn check_size(n: usize, max: usize, engine: &'static str) -> HeaResult<()> {
        if n > max {
            return Err(HeaError::TooManyQubits {
                engine,
                qubits: n,
                max,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Amplitudes
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amps
    }

    /// Consume into the amplitude vector
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amps
    }

    /// Squared norm
    pub fn norm_sqr(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum()
    }

    /// `<self|other>`
    pub fn inner(&self, other: &StateVector) -> HeaResult<Complex64> {
        if self.amps.len() != other.amps.len() {
            return Err(HeaError::ShapeMismatch {
                what: "statevector",
                expected: self.amps.len(),
                actual: other.amps.len(),
            });
        }
        Ok(self
            .amps
            .iter()
            .zip(&other.amps)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// `O|psi>` as a new state (not normalized)
    pub fn apply_operator(&self, op: &QubitOperator) -> HeaResult<StateVector> {
        Ok(Self {
            num_qubits: self.num_qubits,
            amps: op.apply(&self.amps)?,
        })
    }

    // ========================================================================
    // Gate Kernels
    // ========================================================================

    /// Apply a 2x2 unitary to qubit `q`
    pub fn apply_matrix(&mut self, q: usize, m: &Matrix2) {
        self.apply_single_qubit_gate(q, |a, b| {
            (m[0][0] * a + m[0][1] * b, m[1][0] * a + m[1][1] * b)
        });
    }

    /// Apply a Pauli string in place (phase included)
    pub fn apply_pauli(&mut self, p: &PauliString) {
        let mut out = vec![Complex64::new(0.0, 0.0); self.amps.len()];
        for (i, &a) in self.amps.iter().enumerate() {
            let (phase, j) = p.apply_basis(i);
            out[j] = phase * a;
        }
        self.amps = out;
    }

    fn apply_single_qubit_gate<F>(&mut self, q: usize, f: F)
    where
        F: Fn(Complex64, Complex64) -> (Complex64, Complex64),
    {
        let mask = 1usize << q;
        for i in 0..self.amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let (new_i, new_j) = f(self.amps[i], self.amps[j]);
                self.amps[i] = new_i;
                self.amps[j] = new_j;
            }
        }
    }

    fn apply_cnot(&mut self, control: usize, target: usize) {
        let (cm, tm) = (1usize << control, 1usize << target);
        for i in 0..self.amps.len() {
            if i & cm != 0 && i & tm == 0 {
                self.amps.swap(i, i | tm);
            }
        }
    }

    fn apply_cz(&mut self, q1: usize, q2: usize) {
        let mask = (1usize << q1) | (1usize << q2);
        for (i, a) in self.amps.iter_mut().enumerate() {
            if i & mask == mask {
                *a = -*a;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let (m1, m2) = (1usize << q1, 1usize << q2);
        for i in 0..self.amps.len() {
            if i & m1 != 0 && i & m2 == 0 {
                self.amps.swap(i, i ^ m1 ^ m2);
            }
        }
    }
}

impl QuantumState for StateVector {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gantree: apply_gate(gate) -> Result<()> // 게이트 적용
    fn apply_gate(&mut self, gate: &Gate) -> HeaResult<()> {
        check_gate_qubits(gate, self.num_qubits)?;
        match *gate {
            Gate::Cnot(c, t) => self.apply_cnot(c, t),
            Gate::Cz(a, b) => self.apply_cz(a, b),
            Gate::Swap(a, b) => self.apply_swap(a, b),
            g => {
                let m = g
                    .matrix_1q()
                    .ok_or_else(|| HeaError::InternalError(format!("no matrix for {}", g)))?;
                self.apply_matrix(g.qubits()[0], &m);
            }
        }
        Ok(())
    }

    fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }

    fn expectation(&self, op: &QubitOperator) -> HeaResult<f64> {
        Ok(op.expectation(&self.amps)?.re)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hea_core::circuit::Circuit;
    use std::f64::consts::PI;

    fn run(n: usize, gates: Vec<Gate>) -> StateVector {
        let mut sv = StateVector::new(n).unwrap();
        sv.apply_circuit(&Circuit::from_gates(n, gates).unwrap())
            .unwrap();
        sv
    }

    #[test]
    fn test_bell_state() {
        let sv = run(2, vec![Gate::H(0), Gate::Cnot(0, 1)]);
        let p = sv.probabilities();
        assert_abs_diff_eq!(p[0b00], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p[0b11], 0.5, epsilon = 1e-12);
        let zz = QubitOperator::from("Z0 Z1".parse::<PauliString>().unwrap());
        assert_abs_diff_eq!(sv.expectation(&zz).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_gates() {
        // Ry(pi)|0> = |1>, and H Rz(pi) H acts as X up to phase
        let sv = run(1, vec![Gate::Ry(0, PI)]);
        assert_abs_diff_eq!(sv.probabilities()[1], 1.0, epsilon = 1e-12);
        let sv = run(1, vec![Gate::H(0), Gate::Rz(0, PI), Gate::H(0)]);
        assert_abs_diff_eq!(sv.probabilities()[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ry_expectation_is_cosine() {
        let theta = 0.7;
        let sv = run(1, vec![Gate::Ry(0, theta)]);
        let z = QubitOperator::from("Z0".parse::<PauliString>().unwrap());
        let x = QubitOperator::from("X0".parse::<PauliString>().unwrap());
        assert_abs_diff_eq!(sv.expectation(&z).unwrap(), theta.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(sv.expectation(&x).unwrap(), theta.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_swap_and_cz() {
        let sv = run(2, vec![Gate::X(0), Gate::Swap(0, 1)]);
        assert_abs_diff_eq!(sv.probabilities()[0b10], 1.0, epsilon = 1e-12);
        let sv = run(2, vec![Gate::X(0), Gate::X(1), Gate::Cz(0, 1)]);
        assert_abs_diff_eq!(sv.amplitudes()[3].re, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pauli_matches_gate() {
        let mut a = run(2, vec![Gate::H(0), Gate::Ry(1, 0.4)]);
        let mut b = a.clone();
        a.apply_pauli(&"Y0 X1".parse().unwrap());
        b.apply_gate(&Gate::Y(0)).unwrap();
        b.apply_gate(&Gate::X(1)).unwrap();
        assert_abs_diff_eq!(a.inner(&b).unwrap().re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_limits() {
        assert!(matches!(
            StateVector::new(sim::MAX_QUBITS_STATEVECTOR + 1),
            Err(HeaError::TooManyQubits { .. })
        ));
        let mut sv = StateVector::new(2).unwrap();
        assert!(matches!(
            sv.apply_gate(&Gate::H(2)),
            Err(HeaError::GateQubitMismatch { qubit: 2, .. })
        ));
        assert!(StateVector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 3]).is_err());
    }
}
