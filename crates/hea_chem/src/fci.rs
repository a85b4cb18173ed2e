//! Exact (full configuration interaction) reference solver
//!
//! Gantree: L2_Chemistry → FciSolver
//!
//! Diagonalizes the electronic Hamiltonian in the determinant sector with
//! fixed `(Nα, Nβ)`. A determinant is an occupation bitmask with α orbitals
//! in the low `n_orb` bits, which is also its Jordan-Wigner basis index.

use crate::electrons::ElectronCount;
use crate::fermion::FermionOperator;
use crate::integrals::MolecularIntegrals;
use crate::linalg::symmetric_eigen;
use hea_core::error::{HeaError, HeaResult};
use log::debug;
use ndarray::{Array2, Array4};
use num_complex::Complex64;
use std::collections::HashMap;
use std::fmt;

/// Largest orbital space the dense FCI solver accepts
pub const MAX_FCI_ORBITALS: usize = 6;

/// Outcome of an FCI calculation
/// Gantree: FciResult // energy, state, rdm1, rdm2
#[derive(Debug, Clone)]
pub struct FciResult {
    /// Ground-state energy (including `e_core`)
    pub energy: f64,
    /// Ground state as a Jordan-Wigner amplitude vector over `2 n_orb` qubits
    pub ground_state: Vec<Complex64>,
    /// Spin-traced one-body RDM
    pub rdm1: Array2<f64>,
    /// Spin-traced two-body RDM
    pub rdm2: Array4<f64>,
    /// Number of determinants in the sector
    pub sector_dim: usize,
}

impl fmt::Display for FciResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FCI energy = {:.12} ({} determinants)",
            self.energy, self.sector_dim
        )
    }
}

/// Exact diagonalization in a fixed electron sector
/// Gantree: FciSolver // 정확 대각화
#[derive(Debug, Clone)]
pub struct FciSolver {
    integrals: MolecularIntegrals,
    electrons: ElectronCount,
    hamiltonian: FermionOperator,
    determinants: Vec<u64>,
}

impl FciSolver {
    /// Prepare the determinant basis
    /// Gantree: new(ints, electrons) -> Result<Self> // 생성
    pub fn new(integrals: &MolecularIntegrals, electrons: ElectronCount) -> HeaResult<Self> {
        let n = integrals.n_orb();
        if n > MAX_FCI_ORBITALS {
            return Err(HeaError::TooManyQubits {
                engine: "fci",
                qubits: 2 * n,
                max: 2 * MAX_FCI_ORBITALS,
            });
        }
        electrons.validate(n)?;
        let alpha = strings(n, electrons.alpha);
        let beta = strings(n, electrons.beta);
        let determinants = beta
            .iter()
            .flat_map(|&b| alpha.iter().map(move |&a| a | (b << n)))
            .collect();
        Ok(Self {
            integrals: integrals.clone(),
            electrons,
            hamiltonian: FermionOperator::from_integrals(integrals),
            determinants,
        })
    }

    /// Sector dimension
    pub fn sector_dim(&self) -> usize {
        self.determinants.len()
    }

    /// Electron sector
    pub fn electrons(&self) -> ElectronCount {
        self.electrons
    }

    /// Solve for the ground state
    /// Gantree: kernel() -> Result<FciResult> // 계산
    pub fn kernel(&self) -> HeaResult<FciResult> {
        let dim = self.determinants.len();
        let index: HashMap<u64, usize> = self
            .determinants
            .iter()
            .enumerate()
            .map(|(i, &d)| (d, i))
            .collect();

        let mut h = Array2::<f64>::zeros((dim, dim));
        for (col, &det) in self.determinants.iter().enumerate() {
            for (amp, out) in self.hamiltonian.apply_to_determinant(det) {
                let row = index.get(&out).copied().ok_or_else(|| {
                    HeaError::InternalError(format!("determinant {:b} left the sector", out))
                })?;
                h[[row, col]] += amp;
            }
        }
        let (values, vectors) = symmetric_eigen(&h)?;
        let coeffs: Vec<f64> = vectors.column(0).to_vec();
        debug!("FCI: {} determinants, E0 = {:.12}", dim, values[0]);

        let n = self.integrals.n_orb();
        let mut ground_state = vec![Complex64::new(0.0, 0.0); 1usize << (2 * n)];
        for (&det, &c) in self.determinants.iter().zip(&coeffs) {
            ground_state[det as usize] = Complex64::new(c, 0.0);
        }

        let expect = |op: &FermionOperator| -> f64 {
            let mut acc = 0.0;
            for (&det, &c) in self.determinants.iter().zip(&coeffs) {
                for (amp, out) in op.apply_to_determinant(det) {
                    if let Some(&row) = index.get(&out) {
                        acc += coeffs[row] * amp * c;
                    }
                }
            }
            acc
        };

        let mut rdm1 = Array2::<f64>::zeros((n, n));
        for p in 0..n {
            for q in 0..n {
                rdm1[[p, q]] = expect(&FermionOperator::one_body_density(n, p, q));
            }
        }
        let mut rdm2 = Array4::<f64>::zeros((n, n, n, n));
        for p in 0..n {
            for q in 0..n {
                for r in 0..n {
                    for s in 0..n {
                        rdm2[[p, q, r, s]] =
                            expect(&FermionOperator::two_body_density(n, p, q, r, s));
                    }
                }
            }
        }

        Ok(FciResult {
            energy: values[0],
            ground_state,
            rdm1,
            rdm2,
            sector_dim: dim,
        })
    }
}

/// Bitmasks over `n` bits with exactly `k` ones, ascending
fn strings(n: usize, k: usize) -> Vec<u64> {
    (0u64..(1u64 << n))
        .filter(|s| s.count_ones() as usize == k)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecules;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_strings() {
        assert_eq!(strings(3, 2), vec![0b011, 0b101, 0b110]);
        assert_eq!(strings(2, 0), vec![0]);
    }

    #[test]
    fn test_h2_energy() {
        let mol = molecules::h2();
        let fci = FciSolver::new(&mol.integrals, mol.electrons).unwrap();
        assert_eq!(fci.sector_dim(), 4);
        let res = fci.kernel().unwrap();
        assert_abs_diff_eq!(res.energy, mol.fci_energy, epsilon = 1e-10);
        assert_abs_diff_eq!(res.rdm1.diag().sum(), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_h3_rdms_reproduce_energy() {
        let mol = molecules::h3_chain();
        let res = FciSolver::new(&mol.integrals, mol.electrons)
            .unwrap()
            .kernel()
            .unwrap();
        assert_eq!(res.sector_dim, 9);
        assert_abs_diff_eq!(res.energy, mol.fci_energy, epsilon = 1e-10);
        assert_abs_diff_eq!(res.rdm1.diag().sum(), 3.0, epsilon = 1e-10);
        let e = mol.integrals.energy_from_rdms(&res.rdm1, &res.rdm2).unwrap();
        assert_abs_diff_eq!(e, res.energy, epsilon = 1e-10);
        let norm: f64 = res.ground_state.iter().map(|z| z.norm_sqr()).sum();
        assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fci_below_hf() {
        let mol = molecules::h2();
        let hf = mol.integrals.hf_energy(&mol.electrons).unwrap();
        let fci = FciSolver::new(&mol.integrals, mol.electrons)
            .unwrap()
            .kernel()
            .unwrap();
        assert!(fci.energy < hf);
    }
}
