//! Molecular integral data
//!
//! Gantree: L2_Chemistry → Integrals
//!
//! One-electron integrals `h[p,q]`, two-electron integrals in chemists'
//! notation `(pq|rs)`, and the core (nuclear repulsion + frozen core)
//! energy, all in an orthonormal molecular-orbital basis. Immutable once
//! constructed.

use crate::electrons::ElectronCount;
use hea_core::error::{HeaError, HeaResult};
use hea_core::tol;
use ndarray::{Array2, Array4};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Molecular integrals in the MO basis
/// Gantree: MolecularIntegrals // int1e, int2e, e_core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIntegrals")]
pub struct MolecularIntegrals {
    int1e: Array2<f64>,
    int2e: Array4<f64>,
    e_core: f64,
}

#[derive(Deserialize)]
struct RawIntegrals {
    int1e: Array2<f64>,
    int2e: Array4<f64>,
    e_core: f64,
}

impl TryFrom<RawIntegrals> for MolecularIntegrals {
    type Error = HeaError;

    fn try_from(raw: RawIntegrals) -> Result<Self, Self::Error> {
        Self::new(raw.int1e, raw.int2e, raw.e_core)
    }
}

impl MolecularIntegrals {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create and validate
    /// Gantree: new(h1, h2, e_core) -> Result<Self> // 생성+검증
    pub fn new(int1e: Array2<f64>, int2e: Array4<f64>, e_core: f64) -> HeaResult<Self> {
        let ints = Self {
            int1e,
            int2e,
            e_core,
        };
        ints.validate()?;
        Ok(ints)
    }

    /// Build from the unique entries of an 8-fold symmetric ERI tensor
    ///
    /// Every `((p, q, r, s), value)` is expanded to all index orderings
    /// related by `(pq|rs) = (qp|rs) = (pq|sr) = (rs|pq)`.
    pub fn from_unique_eri(
        int1e: Array2<f64>,
        eri: &[((usize, usize, usize, usize), f64)],
        e_core: f64,
    ) -> HeaResult<Self> {
        let n = int1e.nrows();
        let out_of_range = eri
            .iter()
            .find(|&&((p, q, r, s), _)| p.max(q).max(r).max(s) >= n);
        if let Some(&((p, q, r, s), _)) = out_of_range {
            return Err(HeaError::InvalidIntegrals(format!(
                "ERI index ({},{},{},{}) outside {} orbitals",
                p, q, r, s, n
            )));
        }
        let int2e = expand_unique_eri(n, eri);
        Self::new(int1e, int2e, e_core)
    }

    /// Assemble fixture data known to satisfy [`Self::validate`]
    pub(crate) fn new_unchecked(int1e: Array2<f64>, int2e: Array4<f64>, e_core: f64) -> Self {
        Self {
            int1e,
            int2e,
            e_core,
        }
    }

    /// Parse from JSON (validated)
    pub fn from_json(json: &str) -> HeaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> HeaResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of spatial orbitals
    /// Gantree: n_orb() -> usize // 오비탈 수
    pub fn n_orb(&self) -> usize {
        self.int1e.nrows()
    }

    /// One-electron integrals
    pub fn int1e(&self) -> &Array2<f64> {
        &self.int1e
    }

    /// Two-electron integrals `(pq|rs)`
    pub fn int2e(&self) -> &Array4<f64> {
        &self.int2e
    }

    /// Core energy
    pub fn e_core(&self) -> f64 {
        self.e_core
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check shapes and permutational symmetry
    /// Gantree: validate() -> Result<()> // 검증
    pub fn validate(&self) -> HeaResult<()> {
        let n = self.int1e.nrows();
        if n == 0 || self.int1e.ncols() != n {
            return Err(HeaError::InvalidIntegrals(format!(
                "int1e must be square and non-empty, got {:?}",
                self.int1e.shape()
            )));
        }
        if self.int2e.shape() != [n, n, n, n] {
            return Err(HeaError::ShapeMismatch {
                what: "int2e",
                expected: n,
                actual: self.int2e.shape()[0],
            });
        }
        let finite = self.e_core.is_finite()
            && self.int1e.iter().chain(self.int2e.iter()).all(|v| v.is_finite());
        if !finite {
            return Err(HeaError::InvalidIntegrals("non-finite value".into()));
        }
        let eps = tol::INTEGRAL_SYMMETRY_TOL;
        for p in 0..n {
            for q in 0..n {
                if (self.int1e[[p, q]] - self.int1e[[q, p]]).abs() > eps {
                    return Err(HeaError::InvalidIntegrals(format!(
                        "int1e not symmetric at ({},{})",
                        p, q
                    )));
                }
                for r in 0..n {
                    for s in 0..n {
                        let v = self.int2e[[p, q, r, s]];
                        if (v - self.int2e[[q, p, r, s]]).abs() > eps
                            || (v - self.int2e[[r, s, p, q]]).abs() > eps
                        {
                            return Err(HeaError::InvalidIntegrals(format!(
                                "int2e lacks (pq|rs) symmetry at ({},{},{},{})",
                                p, q, r, s
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Reference Energies
    // ========================================================================

    /// Energy of the determinant occupying the lowest `Nα` / `Nβ` orbitals
    /// Gantree: hf_energy(electrons) -> Result<f64> // 기준 행렬식 에너지
    pub fn hf_energy(&self, electrons: &ElectronCount) -> HeaResult<f64> {
        electrons.validate(self.n_orb())?;
        let (h, g) = (&self.int1e, &self.int2e);
        let occ = [electrons.alpha, electrons.beta];
        let mut e = self.e_core;
        for &ns in &occ {
            for i in 0..ns {
                e += h[[i, i]];
            }
        }
        for &na in &occ {
            for &nb in &occ {
                for i in 0..na {
                    for j in 0..nb {
                        e += 0.5 * g[[i, i, j, j]];
                    }
                }
            }
        }
        for &ns in &occ {
            for i in 0..ns {
                for j in 0..ns {
                    e -= 0.5 * g[[i, j, j, i]];
                }
            }
        }
        Ok(e)
    }

    /// `e_core + Σ h·rdm1 + ½ Σ (pq|rs)·rdm2`
    /// Gantree: energy_from_rdms(rdm1, rdm2) -> Result<f64> // RDM 에너지
    pub fn energy_from_rdms(&self, rdm1: &Array2<f64>, rdm2: &Array4<f64>) -> HeaResult<f64> {
        let n = self.n_orb();
        if rdm1.shape() != [n, n] {
            return Err(HeaError::ShapeMismatch {
                what: "rdm1",
                expected: n,
                actual: rdm1.nrows(),
            });
        }
        if rdm2.shape() != [n, n, n, n] {
            return Err(HeaError::ShapeMismatch {
                what: "rdm2",
                expected: n,
                actual: rdm2.shape()[0],
            });
        }
        let one: f64 = (&self.int1e * rdm1).sum();
        let two: f64 = (&self.int2e * rdm2).sum();
        Ok(self.e_core + one + 0.5 * two)
    }
}

/// Fill all eight `(pq|rs)` orderings of each unique entry
pub(crate) fn expand_unique_eri(n: usize, eri: &[((usize, usize, usize, usize), f64)]) -> Array4<f64> {
    let mut int2e = Array4::<f64>::zeros((n, n, n, n));
    for &((p, q, r, s), v) in eri {
        for (a, b, c, d) in [
            (p, q, r, s),
            (q, p, r, s),
            (p, q, s, r),
            (q, p, s, r),
            (r, s, p, q),
            (s, r, p, q),
            (r, s, q, p),
            (s, r, q, p),
        ] {
            int2e[[a, b, c, d]] = v;
        }
    }
    int2e
}

impl fmt::Display for MolecularIntegrals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MolecularIntegrals({} orbitals, e_core = {:.10})",
            self.n_orb(),
            self.e_core
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_unique_eri_expansion() {
        let h = array![[-1.0, 0.1], [0.1, -0.5]];
        let ints = MolecularIntegrals::from_unique_eri(h, &[((0, 1, 1, 1), 0.3)], 0.7).unwrap();
        let g = ints.int2e();
        assert_eq!(g[[1, 0, 1, 1]], 0.3);
        assert_eq!(g[[1, 1, 0, 1]], 0.3);
        assert_eq!(g[[1, 1, 1, 0]], 0.3);
        assert_eq!(g[[0, 0, 0, 0]], 0.0);
        assert_eq!(ints.n_orb(), 2);
    }

    #[test]
    fn test_rejects_asymmetric_int1e() {
        let h = array![[-1.0, 0.1], [0.2, -0.5]];
        let g = Array4::zeros((2, 2, 2, 2));
        assert!(matches!(
            MolecularIntegrals::new(h, g, 0.0),
            Err(HeaError::InvalidIntegrals(_))
        ));
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let h = Array2::zeros((2, 2));
        let g = Array4::zeros((3, 3, 3, 3));
        assert!(matches!(
            MolecularIntegrals::new(h, g, 0.0),
            Err(HeaError::ShapeMismatch { what: "int2e", .. })
        ));
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let h = array![[-1.0]];
        let ints = MolecularIntegrals::from_unique_eri(h, &[((0, 0, 0, 0), 0.6)], 0.5).unwrap();
        let back = MolecularIntegrals::from_json(&ints.to_json().unwrap()).unwrap();
        assert_eq!(ints, back);

        let bad = r#"{"int1e":{"v":1,"dim":[1,2],"data":[1.0,2.0]},"int2e":{"v":1,"dim":[1,1,1,1],"data":[0.0]},"e_core":0.0}"#;
        assert!(MolecularIntegrals::from_json(bad).is_err());
    }

    #[test]
    fn test_one_orbital_two_electrons() {
        // Single orbital doubly occupied: E = e_core + 2h + (00|00)
        let ints =
            MolecularIntegrals::from_unique_eri(array![[-1.0]], &[((0, 0, 0, 0), 0.6)], 0.5).unwrap();
        let e = ints.hf_energy(&ElectronCount::new(1, 1)).unwrap();
        assert_abs_diff_eq!(e, 0.5 - 2.0 + 0.6, epsilon = 1e-14);
    }
}
