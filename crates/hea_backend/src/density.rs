//! Density-matrix simulation
//!
//! Gantree: L4_Backend → DensityMatrix
//!
//! `ρ` on `n` qubits is stored as a vector over `2n` qubits with
//! `ρ[r][c]` at index `c | (r << n)`. A gate `U` on qubit `q` then acts as
//! `U` on vector qubit `q + n` and `U*` on vector qubit `q`. The same
//! layout holds observables propagated backwards for reverse-mode gradients.

use crate::state::{check_gate_qubits, QuantumState};
use crate::statevector::StateVector;
use hea_core::error::{HeaError, HeaResult};
use hea_core::gate::{Gate, Matrix2};
use hea_core::pauli::{PauliString, QubitOperator};
use hea_core::sim;
use hea_noise::Channel;
use num_complex::Complex64;

/// Mixed state (or operator) on `n` qubits
/// Gantree: DensityMatrix // 밀도 행렬
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    num_qubits: usize,
    vec: StateVector,
}

impl DensityMatrix {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// `|0...0><0...0|`
    /// Gantree: new(n) -> Result<Self> // 초기 상태
    pub fn new(num_qubits: usize) -> HeaResult<Self> {
        StateVector::check_size(num_qubits, sim::MAX_QUBITS_DENSITY, "density matrix")?;
        Ok(Self {
            num_qubits,
            vec: StateVector::new(2 * num_qubits)?,
        })
    }

    /// `|psi><psi|`
    pub fn from_pure(psi: &StateVector) -> HeaResult<Self> {
        let n = psi.num_qubits();
        StateVector::check_size(n, sim::MAX_QUBITS_DENSITY, "density matrix")?;
        let a = psi.amplitudes();
        let dim = a.len();
        let mut v = vec![Complex64::new(0.0, 0.0); dim * dim];
        for r in 0..dim {
            for c in 0..dim {
                v[c | (r << n)] = a[r] * a[c].conj();
            }
        }
        Ok(Self {
            num_qubits: n,
            vec: StateVector::from_amplitudes(v)?,
        })
    }

    /// Matrix of a qubit operator in the same layout
    /// Gantree: from_operator(op, n) -> Result<Self> // 연산자 행렬
    pub fn from_operator(op: &QubitOperator, num_qubits: usize) -> HeaResult<Self> {
        StateVector::check_size(num_qubits, sim::MAX_QUBITS_DENSITY, "density matrix")?;
        if op.num_qubits() > num_qubits {
            return Err(HeaError::QubitCountMismatch {
                hamiltonian: op.num_qubits(),
                circuit: num_qubits,
            });
        }
        let dim = 1usize << num_qubits;
        let mut v = vec![Complex64::new(0.0, 0.0); dim * dim];
        for (p, coeff) in op.iter() {
            for c in 0..dim {
                let (phase, r) = p.apply_basis(c);
                v[c | (r << num_qubits)] += coeff * phase;
            }
        }
        Ok(Self {
            num_qubits,
            vec: StateVector::from_amplitudes(v)?,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Matrix element `ρ[r][c]`
    pub fn element(&self, r: usize, c: usize) -> Complex64 {
        self.vec.amplitudes()[c | (r << self.num_qubits)]
    }

    /// `Tr ρ`
    pub fn trace(&self) -> f64 {
        (0..1usize << self.num_qubits)
            .map(|i| self.element(i, i).re)
            .sum()
    }

    /// `Tr ρ²`
    pub fn purity(&self) -> f64 {
        self.vec.norm_sqr()
    }

    // ========================================================================
    // Evolution
    // ========================================================================

    fn apply_matrix(&mut self, q: usize, m: &Matrix2) {
        let conj = [
            [m[0][0].conj(), m[0][1].conj()],
            [m[1][0].conj(), m[1][1].conj()],
        ];
        self.vec.apply_matrix(q + self.num_qubits, m);
        self.vec.apply_matrix(q, &conj);
    }

    /// `ρ -> Σ_k w_k P_k ρ P_k`
    /// Gantree: apply_channel(ch) -> Result<()> // 노이즈 채널
    pub fn apply_channel(&mut self, channel: &Channel) -> HeaResult<()> {
        for &q in channel.qubits() {
            if q >= self.num_qubits {
                return Err(HeaError::GateQubitMismatch {
                    qubit: q,
                    num_qubits: self.num_qubits,
                });
            }
        }
        let n = self.num_qubits;
        let dim = 1usize << n;
        let src = self.vec.amplitudes();
        let mut out = vec![Complex64::new(0.0, 0.0); src.len()];
        for (w, p) in channel.pauli_mixture()? {
            for r in 0..dim {
                let (pr, r2) = p.apply_basis(r);
                for c in 0..dim {
                    let (pc, c2) = p.apply_basis(c);
                    out[c2 | (r2 << n)] += w * pr * pc.conj() * src[c | (r << n)];
                }
            }
        }
        self.vec = StateVector::from_amplitudes(out)?;
        Ok(())
    }

    /// `Tr(ρ P)`
    pub fn pauli_expectation(&self, p: &PauliString) -> Complex64 {
        // P|r> = phase |r ^ x>, so Tr(ρP) = Σ_r ρ[r][r ^ x] · phase
        (0..1usize << self.num_qubits)
            .map(|r| {
                let (phase, c) = p.apply_basis(r);
                self.element(r, c) * phase
            })
            .sum()
    }

    /// `Tr(A G B)` for operators `A`, `B` and a Pauli string `G`
    pub fn trace_product(a: &DensityMatrix, g: &PauliString, b: &DensityMatrix) -> Complex64 {
        // (G B)[c ^ x][s] = phase_c · B[c][s]
        let dim = 1usize << a.num_qubits;
        let mut acc = Complex64::new(0.0, 0.0);
        for c in 0..dim {
            let (phase, cx) = g.apply_basis(c);
            for s in 0..dim {
                acc += a.element(s, cx) * phase * b.element(c, s);
            }
        }
        acc
    }
}

impl QuantumState for DensityMatrix {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Gantree: apply_gate(gate) -> Result<()> // U ρ U†
    fn apply_gate(&mut self, gate: &Gate) -> HeaResult<()> {
        check_gate_qubits(gate, self.num_qubits)?;
        let n = self.num_qubits;
        match *gate {
            // real permutation / diagonal gates act identically on both halves
            Gate::Cnot(a, b) | Gate::Cz(a, b) | Gate::Swap(a, b) => {
                let shifted = match *gate {
                    Gate::Cnot(..) => Gate::Cnot(a + n, b + n),
                    Gate::Cz(..) => Gate::Cz(a + n, b + n),
                    _ => Gate::Swap(a + n, b + n),
                };
                self.vec.apply_gate(&shifted)?;
                self.vec.apply_gate(gate)?;
            }
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
        (0..1usize << self.num_qubits)
            .map(|i| self.element(i, i).re.max(0.0))
            .collect()
    }

    fn expectation(&self, op: &QubitOperator) -> HeaResult<f64> {
        if op.num_qubits() > self.num_qubits {
            return Err(HeaError::QubitCountMismatch {
                hamiltonian: op.num_qubits(),
                circuit: self.num_qubits,
            });
        }
        Ok(op
            .iter()
            .map(|(p, c)| (c * self.pauli_expectation(p)).re)
            .sum())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn op(s: &str) -> QubitOperator {
        QubitOperator::from(s.parse::<PauliString>().unwrap())
    }

    #[test]
    fn test_matches_statevector_without_noise() {
        let gates = [
            Gate::H(0),
            Gate::Ry(1, 0.3),
            Gate::Cnot(0, 1),
            Gate::Rx(2, 1.1),
            Gate::Cz(1, 2),
            Gate::S(0),
            Gate::Swap(0, 2),
        ];
        let mut sv = StateVector::new(3).unwrap();
        let mut dm = DensityMatrix::new(3).unwrap();
        for g in &gates {
            sv.apply_gate(g).unwrap();
            dm.apply_gate(g).unwrap();
        }
        let pure = DensityMatrix::from_pure(&sv).unwrap();
        for r in 0..8 {
            for c in 0..8 {
                let d = dm.element(r, c) - pure.element(r, c);
                assert!(d.norm() < 1e-12, "({}, {})", r, c);
            }
        }
        assert_abs_diff_eq!(dm.purity(), 1.0, epsilon = 1e-12);
        for s in ["Z0", "X0 Y1", "Y1 Z2", "X0 X1 X2"] {
            assert_abs_diff_eq!(
                dm.expectation(&op(s)).unwrap(),
                sv.expectation(&op(s)).unwrap(),
                epsilon = 1e-12
            );
        }
        assert_abs_diff_eq!(dm.trace(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_depolarizing_shrinks_correlations() {
        // Bell state: <Z0 Z1> = 1 -> 1 - 16p/15 after a two-qubit depolarizing channel
        let p = 0.15;
        let mut dm = DensityMatrix::new(2).unwrap();
        dm.apply_gate(&Gate::H(0)).unwrap();
        dm.apply_gate(&Gate::Cnot(0, 1)).unwrap();
        dm.apply_channel(&Channel::Depolarizing {
            qubits: vec![0, 1],
            p,
        })
        .unwrap();
        let zz = dm.expectation(&op("Z0 Z1")).unwrap();
        assert_abs_diff_eq!(zz, 1.0 - 16.0 * p / 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dm.trace(), 1.0, epsilon = 1e-12);
        assert!(dm.purity() < 1.0);
    }

    #[test]
    fn test_from_operator_trace_product() {
        // Tr(I · Z0 · ρ) for ρ = |0><0| is 1
        let rho = DensityMatrix::new(1).unwrap();
        let ident = DensityMatrix::from_operator(&QubitOperator::constant(1.0), 1).unwrap();
        let z: PauliString = "Z0".parse().unwrap();
        let t = DensityMatrix::trace_product(&ident, &z, &rho);
        assert_abs_diff_eq!(t.re, 1.0, epsilon = 1e-12);
        let x = DensityMatrix::from_operator(&op("X0"), 1).unwrap();
        assert_abs_diff_eq!(x.element(0, 1).re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_channel_qubit_range() {
        let mut dm = DensityMatrix::new(1).unwrap();
        let ch = Channel::Depolarizing {
            qubits: vec![0, 1],
            p: 0.1,
        };
        assert!(dm.apply_channel(&ch).is_err());
    }
}
