//! Reduced density matrix operators
//!
//! Gantree: L2_Chemistry → RdmOperators
//!
//! Qubit images of the spin-traced density operators, mapped with the
//! same [`QubitMapper`] as the Hamiltonian. Only the Hermitian part of
//! each operator is kept, so every entry is the expectation value of a
//! real-coefficient operator and the resulting matrices are symmetric:
//!
//! - `rdm1[p,q] = Σσ <a†_pσ a_qσ>`
//! - `rdm2[p,q,r,s] = Σστ <a†_pσ a†_rτ a_sτ a_qσ>`

use crate::fermion::FermionOperator;
use crate::mapping::QubitMapper;
use hea_core::error::{HeaError, HeaResult};
use hea_core::pauli::QubitOperator;
use hea_core::tol;
use log::debug;
use ndarray::{Array2, Array4};
use num_complex::Complex64;
use std::collections::BTreeMap;

type Index4 = (usize, usize, usize, usize);

/// Mapped density operators for one orbital space
/// Gantree: RdmOperators // rdm1/rdm2 연산자
#[derive(Debug, Clone)]
pub struct RdmOperators {
    n_orb: usize,
    rdm1: BTreeMap<(usize, usize), QubitOperator>,
    rdm2: BTreeMap<Index4, QubitOperator>,
}

impl RdmOperators {
    /// Map every independent density operator
    /// Gantree: new(mapper, n_orb) -> Result<Self> // 생성
    pub fn new(mapper: &QubitMapper, n_orb: usize) -> HeaResult<Self> {
        if 2 * n_orb != mapper.n_modes() {
            return Err(HeaError::ShapeMismatch {
                what: "n_orb",
                expected: mapper.n_modes() / 2,
                actual: n_orb,
            });
        }
        let mut rdm1 = BTreeMap::new();
        for p in 0..n_orb {
            for q in p..n_orb {
                let op = FermionOperator::one_body_density(n_orb, p, q);
                rdm1.insert((p, q), hermitian_part(&mapper.map(&op)?)?);
            }
        }
        let mut rdm2 = BTreeMap::new();
        for p in 0..n_orb {
            for q in 0..n_orb {
                for r in 0..n_orb {
                    for s in 0..n_orb {
                        let key = canonical((p, q, r, s));
                        if rdm2.contains_key(&key) {
                            continue;
                        }
                        let op = FermionOperator::two_body_density(n_orb, p, q, r, s);
                        rdm2.insert(key, hermitian_part(&mapper.map(&op)?)?);
                    }
                }
            }
        }
        debug!(
            "RDM operators: {} one-body, {} two-body on {} qubits",
            rdm1.len(),
            rdm2.len(),
            mapper.n_qubits()
        );
        Ok(Self { n_orb, rdm1, rdm2 })
    }

    /// Number of spatial orbitals
    pub fn n_orb(&self) -> usize {
        self.n_orb
    }

    /// Operator whose expectation is `rdm1[p,q]`
    pub fn rdm1_op(&self, p: usize, q: usize) -> Option<&QubitOperator> {
        self.rdm1.get(&(p.min(q), p.max(q)))
    }

    /// Operator whose expectation is `rdm2[p,q,r,s]`
    pub fn rdm2_op(&self, p: usize, q: usize, r: usize, s: usize) -> Option<&QubitOperator> {
        self.rdm2.get(&canonical((p, q, r, s)))
    }

    /// Number of distinct operators that [`Self::evaluate`] measures
    pub fn num_operators(&self) -> usize {
        self.rdm1.len() + self.rdm2.len()
    }

    /// Fill both RDMs from an expectation-value callback
    /// Gantree: evaluate(f) -> Result<(rdm1, rdm2)> // RDM 계산
    pub fn evaluate<F>(&self, mut expect: F) -> HeaResult<(Array2<f64>, Array4<f64>)>
    where
        F: FnMut(&QubitOperator) -> HeaResult<f64>,
    {
        let n = self.n_orb;
        let mut value = |op: &QubitOperator| if op.is_empty() { Ok(0.0) } else { expect(op) };

        let mut rdm1 = Array2::<f64>::zeros((n, n));
        for (&(p, q), op) in &self.rdm1 {
            let v = value(op)?;
            rdm1[[p, q]] = v;
            rdm1[[q, p]] = v;
        }

        let mut rdm2 = Array4::<f64>::zeros((n, n, n, n));
        for (&key, op) in &self.rdm2 {
            let v = value(op)?;
            for (p, q, r, s) in equivalents(key) {
                rdm2[[p, q, r, s]] = v;
            }
        }
        Ok((rdm1, rdm2))
    }
}

/// `(O + O†) / 2` with real coefficients
fn hermitian_part(op: &QubitOperator) -> HeaResult<QubitOperator> {
    let sum = op + &op.dagger();
    sum.scale(Complex64::new(0.5, 0.0))
        .simplify(tol::COEFF_TOL)
        .to_hermitian()
}

/// Index orderings sharing one Hermitian-part operator
fn equivalents((p, q, r, s): Index4) -> [Index4; 4] {
    [(p, q, r, s), (r, s, p, q), (q, p, s, r), (s, r, q, p)]
}

fn canonical(idx: Index4) -> Index4 {
    equivalents(idx).into_iter().min().unwrap_or(idx)
}

// ============================================================================
// Tests
// ============================================================================
