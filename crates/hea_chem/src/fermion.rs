//! Second-quantized fermion operators
//!
//! Gantree: L2_Chemistry → FermionOperator
//!
//! Spin-orbital `p` (α) is mode `p`, `p` (β) is mode `p + n_orb`.
//! Words are products of ladder operators read left to right, so the
//! rightmost operator acts first.

use crate::integrals::MolecularIntegrals;
use hea_core::tol;
use std::collections::BTreeMap;
use std::fmt;

/// Single creation or annihilation operator
/// Gantree: Ladder // (mode, dagger)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ladder {
    /// Spin-orbital index
    pub mode: usize,
    /// `true` for a creation operator
    pub dagger: bool,
}

impl Ladder {
    /// `a†_mode`
    pub fn create(mode: usize) -> Self {
        Self { mode, dagger: true }
    }

    /// `a_mode`
    pub fn annihilate(mode: usize) -> Self {
        Self {
            mode,
            dagger: false,
        }
    }

    /// Act on an occupation bitmask; `None` when the result vanishes
    #[inline]
    fn act(&self, det: u64) -> Option<(f64, u64)> {
        let bit = 1u64 << self.mode;
        let occupied = det & bit != 0;
        if occupied == self.dagger {
            return None;
        }
        let sign = if (det & (bit - 1)).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        };
        Some((sign, det ^ bit))
    }
}

impl fmt::Display for Ladder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dagger {
            write!(f, "{}^", self.mode)
        } else {
            write!(f, "{}", self.mode)
        }
    }
}

/// Apply a ladder word to a determinant
/// Gantree: apply_word(word, det) -> Option<(sign, det)> // 행렬식 작용
pub fn apply_word(word: &[Ladder], det: u64) -> Option<(f64, u64)> {
    word.iter()
        .rev()
        .try_fold((1.0, det), |(sign, d), op| {
            op.act(d).map(|(s, nd)| (sign * s, nd))
        })
}

/// Spin-orbital index of spatial orbital `p` with spin `sigma` (0 = α, 1 = β)
#[inline]
pub fn spin_orbital(p: usize, sigma: usize, n_orb: usize) -> usize {
    p + sigma * n_orb
}

/// Linear combination of ladder words with real coefficients
/// Gantree: FermionOperator // BTreeMap<Vec<Ladder>, f64>
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FermionOperator {
    terms: BTreeMap<Vec<Ladder>, f64>,
}

impl FermionOperator {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Zero operator
    pub fn zero() -> Self {
        Self::default()
    }

    /// Constant `c` (empty word)
    pub fn constant(c: f64) -> Self {
        let mut op = Self::zero();
        op.add_term(Vec::new(), c);
        op
    }

    /// Electronic Hamiltonian
    /// `e_core + Σ h_pq a†_pσ a_qσ + ½ Σ (pq|rs) a†_pσ a†_rτ a_sτ a_qσ`
    /// Gantree: from_integrals(ints) -> Self // 해밀토니안
    pub fn from_integrals(ints: &MolecularIntegrals) -> Self {
        let n = ints.n_orb();
        let (h, g) = (ints.int1e(), ints.int2e());
        let mut op = Self::constant(ints.e_core());
        for sigma in 0..2 {
            for p in 0..n {
                for q in 0..n {
                    let v = h[[p, q]];
                    if v.abs() > tol::COEFF_TOL {
                        op.add_term(
                            vec![
                                Ladder::create(spin_orbital(p, sigma, n)),
                                Ladder::annihilate(spin_orbital(q, sigma, n)),
                            ],
                            v,
                        );
                    }
                }
            }
        }
        for p in 0..n {
            for q in 0..n {
                for r in 0..n {
                    for s in 0..n {
                        let v = g[[p, q, r, s]];
                        if v.abs() <= tol::COEFF_TOL {
                            continue;
                        }
                        op += &Self::pair_term(n, p, q, r, s, 0.5 * v);
                    }
                }
            }
        }
        op
    }

    /// Spin-summed one-body density operator `Σσ a†_pσ a_qσ`
    /// Gantree: one_body_density(n, p, q) -> Self // 1-RDM 연산자
    pub fn one_body_density(n_orb: usize, p: usize, q: usize) -> Self {
        let mut op = Self::zero();
        for sigma in 0..2 {
            op.add_term(
                vec![
                    Ladder::create(spin_orbital(p, sigma, n_orb)),
                    Ladder::annihilate(spin_orbital(q, sigma, n_orb)),
                ],
                1.0,
            );
        }
        op
    }

    /// Spin-summed two-body density operator `Σστ a†_pσ a†_rτ a_sτ a_qσ`
    /// Gantree: two_body_density(n, p, q, r, s) -> Self // 2-RDM 연산자
    pub fn two_body_density(n_orb: usize, p: usize, q: usize, r: usize, s: usize) -> Self {
        Self::pair_term(n_orb, p, q, r, s, 1.0)
    }

    fn pair_term(n: usize, p: usize, q: usize, r: usize, s: usize, coeff: f64) -> Self {
        let mut op = Self::zero();
        for sigma in 0..2 {
            for tau in 0..2 {
                let (pp, qq) = (spin_orbital(p, sigma, n), spin_orbital(q, sigma, n));
                let (rr, ss) = (spin_orbital(r, tau, n), spin_orbital(s, tau, n));
                if pp == rr || qq == ss {
                    continue;
                }
                op.add_term(
                    vec![
                        Ladder::create(pp),
                        Ladder::create(rr),
                        Ladder::annihilate(ss),
                        Ladder::annihilate(qq),
                    ],
                    coeff,
                );
            }
        }
        op
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Accumulate `coeff · word`
    pub fn add_term(&mut self, word: Vec<Ladder>, coeff: f64) {
        *self.terms.entry(word).or_insert(0.0) += coeff;
    }

    /// Iterate `(word, coefficient)`
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<Ladder>, &f64)> {
        self.terms.iter()
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check for an empty sum
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// One past the highest mode index
    pub fn n_modes(&self) -> usize {
        self.terms
            .keys()
            .flat_map(|w| w.iter().map(|l| l.mode + 1))
            .max()
            .unwrap_or(0)
    }

    /// Coefficient of the empty word
    pub fn constant_term(&self) -> f64 {
        self.terms.get(&Vec::new()).copied().unwrap_or(0.0)
    }

    // ========================================================================
    // Determinant Action
    // ========================================================================

    /// `O|det>` as a list of `(amplitude, determinant)` contributions
    /// Gantree: apply_to_determinant(det) -> Vec<(f64, u64)> // 작용
    pub fn apply_to_determinant(&self, det: u64) -> Vec<(f64, u64)> {
        self.terms
            .iter()
            .filter_map(|(w, c)| apply_word(w, det).map(|(s, d)| (c * s, d)))
            .collect()
    }
}

impl std::ops::AddAssign<&FermionOperator> for FermionOperator {
    fn add_assign(&mut self, rhs: &FermionOperator) {
        for (w, c) in &rhs.terms {
            self.add_term(w.clone(), *c);
        }
    }
}

impl fmt::Display for FermionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, (w, c)) in self.terms.iter().enumerate() {
            if k > 0 {
                writeln!(f, " +")?;
            }
            let word: Vec<String> = w.iter().map(Ladder::to_string).collect();
            write!(f, "{:.10} [{}]", c, word.join(" "))?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_ladder_signs() {
        // a†_1 on |mode0 occupied> picks up one sign
        assert_eq!(Ladder::create(1).act(0b01), Some((-1.0, 0b11)));
        assert_eq!(Ladder::create(0).act(0b10), Some((1.0, 0b11)));
        assert_eq!(Ladder::create(0).act(0b01), None);
        assert_eq!(Ladder::annihilate(1).act(0b01), None);
    }

    #[test]
    fn test_number_operator_word() {
        let n0 = [Ladder::create(0), Ladder::annihilate(0)];
        assert_eq!(apply_word(&n0, 0b101), Some((1.0, 0b101)));
        assert_eq!(apply_word(&n0, 0b100), None);
    }

    #[test]
    fn test_anticommutation() {
        // a†_0 a†_1 = -a†_1 a†_0
        let ab = [Ladder::create(0), Ladder::create(1)];
        let ba = [Ladder::create(1), Ladder::create(0)];
        let (s1, d1) = apply_word(&ab, 0).unwrap();
        let (s2, d2) = apply_word(&ba, 0).unwrap();
        assert_eq!(d1, d2);
        assert_eq!(s1, -s2);
    }

    #[test]
    fn test_hamiltonian_single_orbital() {
        let ints = MolecularIntegrals::from_unique_eri(array![[-1.0]], &[((0, 0, 0, 0), 0.6)], 0.5)
            .unwrap();
        let h = FermionOperator::from_integrals(&ints);
        assert_eq!(h.n_modes(), 2);
        assert_eq!(h.constant_term(), 0.5);
        // doubly occupied determinant: 2h + (00|00)
        let diag: f64 = h
            .apply_to_determinant(0b11)
            .into_iter()
            .filter(|&(_, d)| d == 0b11)
            .map(|(c, _)| c)
            .sum();
        assert!((diag - (0.5 - 2.0 + 0.6)).abs() < 1e-14);
    }

    #[test]
    fn test_two_body_density_skips_pauli_blocked() {
        // p = r, same spin vanishes; opposite spins remain
        let op = FermionOperator::two_body_density(2, 0, 0, 0, 0);
        assert_eq!(op.len(), 2);
    }
}
