//! Fermion-to-qubit mappings
//!
//! Gantree: L2_Chemistry → QubitMapper
//!
//! Jordan-Wigner, parity and Bravyi-Kitaev are all binary encodings
//! `b = A n (mod 2)` with `A` lower triangular and unit diagonal:
//!
//! * Jordan-Wigner: `A = I`
//! * parity: `A[i][j] = 1` for `j <= i`
//! * Bravyi-Kitaev: Fenwick tree, `b_i` is the parity of modes
//!   `i + 1 - lowbit(i + 1) ..= i`
//!
//! From `A` and its GF(2) inverse come the update set `U(j)`, the parity
//! set `P(j)` and the flip set `F(j)`, and with them the Majorana strings
//! `c_j = X_{U(j) ∪ j} Z_{P(j)}` and `d_j = X_{U(j)} Y_j Z_{P(j) Δ F(j)}`.
//! Ladder operators follow as `a_j = (c_j + i d_j) / 2`.

use crate::electrons::ElectronCount;
use crate::fermion::{FermionOperator, Ladder};
use crate::integrals::MolecularIntegrals;
use hea_core::error::{HeaError, HeaResult};
use hea_core::pauli::{PauliString, QubitOperator};
use hea_core::{sim, tol};
use log::debug;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Mapping
// ============================================================================

/// Fermion-to-qubit encoding
/// Gantree: Mapping // JW / Parity / BK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Mapping {
    /// Occupation of mode `j` on qubit `j`
    #[default]
    JordanWigner,
    /// Prefix parities, with the two-qubit symmetry reduction
    Parity,
    /// Fenwick-tree partial parities
    BravyiKitaev,
}

impl Mapping {
    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            Mapping::JordanWigner => "jordan-wigner",
            Mapping::Parity => "parity",
            Mapping::BravyiKitaev => "bravyi-kitaev",
        }
    }

    /// Qubits needed for `n_modes` spin orbitals
    /// Gantree: num_qubits(n_modes) -> usize // 큐비트 수
    pub fn num_qubits(&self, n_modes: usize) -> usize {
        match self {
            Mapping::Parity => n_modes.saturating_sub(2),
            _ => n_modes,
        }
    }
}

impl FromStr for Mapping {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "jordan-wigner" | "jw" => Ok(Mapping::JordanWigner),
            "parity" => Ok(Mapping::Parity),
            "bravyi-kitaev" | "bk" => Ok(Mapping::BravyiKitaev),
            _ => Err(HeaError::InvalidMapping(s.to_string())),
        }
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Binary Encoding
// ============================================================================

/// Encoding matrix over GF(2), rows stored as bit masks
/// Gantree: BinaryEncoding // A, A^-1
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryEncoding {
    rows: Vec<u64>,
    inv_rows: Vec<u64>,
}

impl BinaryEncoding {
    /// Encoding matrix of `mapping` on `n` modes (no reduction)
    /// Gantree: new(mapping, n) -> Result<Self> // 인코딩 행렬
    pub fn new(mapping: Mapping, n: usize) -> HeaResult<Self> {
        if n > sim::MAX_QUBITS_PAULI {
            return Err(HeaError::TooManyQubits {
                engine: "fermion mapping",
                qubits: n,
                max: sim::MAX_QUBITS_PAULI,
            });
        }
        let rows: Vec<u64> = (0..n)
            .map(|i| match mapping {
                Mapping::JordanWigner => 1u64 << i,
                Mapping::Parity => low_mask(i + 1),
                Mapping::BravyiKitaev => {
                    let k = i + 1;
                    let lowbit = k & k.wrapping_neg();
                    low_mask(i + 1) & !low_mask(k - lowbit)
                }
            })
            .collect();
        let inv_rows = invert_lower_unit(&rows);
        Ok(Self { rows, inv_rows })
    }

    /// Number of modes
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check for zero modes
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Encode an occupation bitmask
    pub fn encode(&self, occupation: u64) -> u64 {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| (*row & occupation).count_ones() % 2 == 1)
            .fold(0u64, |acc, (i, _)| acc | (1u64 << i))
    }

    /// Qubits whose value flips when mode `j` changes
    pub fn update_set(&self, j: usize) -> u64 {
        self.rows
            .iter()
            .enumerate()
            .filter(|&(i, row)| i != j && (row >> j) & 1 == 1)
            .fold(0u64, |acc, (i, _)| acc | (1u64 << i))
    }

    /// Qubits whose parity equals the parity of modes `< j`
    pub fn parity_set(&self, j: usize) -> u64 {
        self.inv_rows[..j].iter().fold(0u64, |acc, r| acc ^ r)
    }

    /// Qubits whose parity gives the occupation of `j` relative to qubit `j`
    pub fn flip_set(&self, j: usize) -> u64 {
        self.inv_rows[j] & !(1u64 << j)
    }

    /// Majorana pair `(c_j, d_j)` as phase-free Pauli strings
    /// Gantree: majoranas(j) -> (PauliString, PauliString) // 마요라나
    pub fn majoranas(&self, j: usize) -> (PauliString, PauliString) {
        let bit = 1u64 << j;
        let x = self.update_set(j) | bit;
        let p = self.parity_set(j);
        let c = PauliString::new(x, p);
        let d = PauliString::new(x, bit | (p ^ self.flip_set(j)));
        (c, d)
    }

    /// Qubit image of a single ladder operator
    pub fn ladder(&self, op: Ladder) -> QubitOperator {
        let (c, d) = self.majoranas(op.mode);
        let im = if op.dagger { -0.5 } else { 0.5 };
        QubitOperator::from(vec![
            (c, Complex64::new(0.5, 0.0)),
            (d, Complex64::new(0.0, im)),
        ])
    }
}

#[inline]
fn low_mask(k: usize) -> u64 {
    if k >= 64 {
        u64::MAX
    } else {
        (1u64 << k) - 1
    }
}

/// Inverse of a unit lower-triangular GF(2) matrix by forward substitution
fn invert_lower_unit(rows: &[u64]) -> Vec<u64> {
    let mut inv: Vec<u64> = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        // A[i][i] = 1, so inv row i = e_i + Σ_{k<i, A[i][k]=1} inv row k
        let mut r = 1u64 << i;
        for (k, inv_k) in inv.iter().enumerate() {
            if (row >> k) & 1 == 1 {
                r ^= inv_k;
            }
        }
        inv.push(r);
    }
    inv
}

// ============================================================================
// Qubit Mapper
// ============================================================================

/// Two-qubit reduction of the parity encoding
#[derive(Debug, Clone, Copy, PartialEq)]
struct Reduction {
    /// Qubit carrying the α-parity (`n_orb - 1`)
    alpha_qubit: usize,
    /// Qubit carrying the total parity (`2 n_orb - 1`)
    total_qubit: usize,
    alpha_sign: f64,
    total_sign: f64,
}

impl Reduction {
    fn apply(&self, op: &QubitOperator) -> HeaResult<QubitOperator> {
        let mut out = QubitOperator::zero();
        for (p, c) in op.iter() {
            let (a, t) = (1u64 << self.alpha_qubit, 1u64 << self.total_qubit);
            if p.x_mask() & (a | t) != 0 {
                return Err(HeaError::incompatible(
                    "mapping",
                    "parity",
                    format!("term [{}] does not conserve particle number per spin", p),
                ));
            }
            let mut coeff = *c;
            if p.z_mask() & a != 0 {
                coeff *= self.alpha_sign;
            }
            if p.z_mask() & t != 0 {
                coeff *= self.total_sign;
            }
            let reduced = PauliString::new(
                self.compress(p.x_mask()),
                self.compress(p.z_mask() & !(a | t)),
            );
            out.add_term(reduced, coeff);
        }
        Ok(out.simplify(tol::COEFF_TOL))
    }

    /// Drop the removed qubit positions, shifting higher bits down
    fn compress(&self, mask: u64) -> u64 {
        let low = mask & low_mask(self.alpha_qubit);
        let mid = (mask >> (self.alpha_qubit + 1)) & low_mask(self.total_qubit - self.alpha_qubit - 1);
        low | (mid << self.alpha_qubit)
    }
}

/// Maps fermion operators of a fixed (n_orb, electrons) problem to qubits
/// Gantree: QubitMapper // 매핑 + 축약
#[derive(Debug, Clone)]
pub struct QubitMapper {
    mapping: Mapping,
    n_modes: usize,
    electrons: ElectronCount,
    encoding: BinaryEncoding,
    ladders: Vec<[QubitOperator; 2]>,
    reduction: Option<Reduction>,
}

impl QubitMapper {
    /// Build a mapper for `n_modes = 2 n_orb` spin orbitals
    /// Gantree: new(mapping, n_modes, electrons) -> Result<Self> // 생성
    pub fn new(mapping: Mapping, n_modes: usize, electrons: ElectronCount) -> HeaResult<Self> {
        if n_modes == 0 || n_modes % 2 != 0 {
            return Err(HeaError::InvalidConfig {
                field: "n_modes",
                reason: format!("{} spin orbitals is not an even, positive count", n_modes),
            });
        }
        let n_orb = n_modes / 2;
        electrons.validate(n_orb)?;
        let encoding = BinaryEncoding::new(mapping, n_modes)?;
        let ladders = (0..n_modes)
            .map(|j| {
                [
                    encoding.ladder(Ladder::annihilate(j)),
                    encoding.ladder(Ladder::create(j)),
                ]
            })
            .collect();
        let parity_sign = |n: usize| if n % 2 == 0 { 1.0 } else { -1.0 };
        let reduction = (mapping == Mapping::Parity).then(|| Reduction {
            alpha_qubit: n_orb - 1,
            total_qubit: n_modes - 1,
            alpha_sign: parity_sign(electrons.alpha),
            total_sign: parity_sign(electrons.total()),
        });
        Ok(Self {
            mapping,
            n_modes,
            electrons,
            encoding,
            ladders,
            reduction,
        })
    }

    /// Encoding in use
    pub fn mapping(&self) -> Mapping {
        self.mapping
    }

    /// Number of spin orbitals
    pub fn n_modes(&self) -> usize {
        self.n_modes
    }

    /// Electron sector of the reduction
    pub fn electrons(&self) -> ElectronCount {
        self.electrons
    }

    /// Encoding matrix
    pub fn encoding(&self) -> &BinaryEncoding {
        &self.encoding
    }

    /// Qubits of the mapped operators
    /// Gantree: n_qubits() -> usize // 큐비트 수
    pub fn n_qubits(&self) -> usize {
        self.mapping.num_qubits(self.n_modes)
    }

    /// Map a fermion operator (reduction included)
    /// Gantree: map(&FermionOperator) -> Result<QubitOperator> // 매핑
    pub fn map(&self, op: &FermionOperator) -> HeaResult<QubitOperator> {
        let full = map_with(op, self.n_modes, |l| &self.ladders[l.mode][l.dagger as usize])?;
        match &self.reduction {
            Some(r) => r.apply(&full),
            None => Ok(full),
        }
    }

    /// Map the electronic Hamiltonian; the result has real coefficients
    /// Gantree: map_hamiltonian(ints) -> Result<QubitOperator> // 해밀토니안 매핑
    pub fn map_hamiltonian(&self, ints: &MolecularIntegrals) -> HeaResult<QubitOperator> {
        if 2 * ints.n_orb() != self.n_modes {
            return Err(HeaError::ShapeMismatch {
                what: "n_orb",
                expected: self.n_modes / 2,
                actual: ints.n_orb(),
            });
        }
        let ferm = FermionOperator::from_integrals(ints);
        let h = self.map(&ferm)?.to_hermitian()?;
        debug!(
            "{} mapping: {} fermion words -> {} Pauli terms on {} qubits",
            self.mapping,
            ferm.len(),
            h.len(),
            self.n_qubits()
        );
        Ok(h)
    }
}

fn map_with<'a, F>(op: &FermionOperator, n_modes: usize, ladder: F) -> HeaResult<QubitOperator>
where
    F: Fn(Ladder) -> &'a QubitOperator,
{
    let mut out = QubitOperator::zero();
    for (word, coeff) in op.iter() {
        let mut prod = QubitOperator::constant(1.0);
        for &l in word {
            if l.mode >= n_modes {
                return Err(HeaError::QubitOutOfRange {
                    qubit: l.mode,
                    max: n_modes.saturating_sub(1),
                });
            }
            prod = &prod * ladder(l);
        }
        out += &prod.scale(Complex64::new(*coeff, 0.0));
    }
    Ok(out.simplify(tol::COEFF_TOL))
}

fn map_standalone(op: &FermionOperator, mapping: Mapping) -> HeaResult<QubitOperator> {
    let n = op.n_modes();
    let encoding = BinaryEncoding::new(mapping, n)?;
    let ladders: Vec<[QubitOperator; 2]> = (0..n)
        .map(|j| {
            [
                encoding.ladder(Ladder::annihilate(j)),
                encoding.ladder(Ladder::create(j)),
            ]
        })
        .collect();
    map_with(op, n, |l| &ladders[l.mode][l.dagger as usize])
}

/// Jordan-Wigner image of `op` on `op.n_modes()` qubits
pub fn jordan_wigner(op: &FermionOperator) -> HeaResult<QubitOperator> {
    map_standalone(op, Mapping::JordanWigner)
}

/// Parity image of `op` (no symmetry reduction)
pub fn parity(op: &FermionOperator) -> HeaResult<QubitOperator> {
    map_standalone(op, Mapping::Parity)
}

/// Bravyi-Kitaev image of `op`
pub fn bravyi_kitaev(op: &FermionOperator) -> HeaResult<QubitOperator> {
    map_standalone(op, Mapping::BravyiKitaev)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ps(s: &str) -> PauliString {
        s.parse().unwrap()
    }

    #[test]
    fn test_mapping_parse() {
        assert_eq!("jw".parse::<Mapping>().unwrap(), Mapping::JordanWigner);
        assert_eq!("Bravyi_Kitaev".parse::<Mapping>().unwrap(), Mapping::BravyiKitaev);
        assert_eq!("parity".parse::<Mapping>().unwrap(), Mapping::Parity);
        assert!(matches!(
            "gray".parse::<Mapping>(),
            Err(HeaError::InvalidMapping(_))
        ));
        assert_eq!(Mapping::Parity.num_qubits(4), 2);
        assert_eq!(Mapping::BravyiKitaev.num_qubits(4), 4);
    }

    #[test]
    fn test_encoding_matrices() {
        let bk = BinaryEncoding::new(Mapping::BravyiKitaev, 4).unwrap();
        // b0 = n0, b1 = n0+n1, b2 = n2, b3 = n0+n1+n2+n3
        assert_eq!(bk.rows, vec![0b0001, 0b0011, 0b0100, 0b1111]);
        let par = BinaryEncoding::new(Mapping::Parity, 3).unwrap();
        assert_eq!(par.rows, vec![0b001, 0b011, 0b111]);
        assert_eq!(par.inv_rows, vec![0b001, 0b011, 0b110]);
        assert_eq!(par.encode(0b101), 0b011);
    }

    #[test]
    fn test_inverse_is_inverse() {
        for mapping in [Mapping::JordanWigner, Mapping::Parity, Mapping::BravyiKitaev] {
            let enc = BinaryEncoding::new(mapping, 8).unwrap();
            for i in 0..8 {
                // (A · A^-1) row i = XOR of A^-1 rows selected by A row i
                let row: u64 = (0..8)
                    .filter(|k| (enc.rows[i] >> k) & 1 == 1)
                    .fold(0, |acc, k| acc ^ enc.inv_rows[k]);
                assert_eq!(row, 1u64 << i, "{} row {}", mapping, i);
            }
        }
    }

    #[test]
    fn test_jordan_wigner_ladder() {
        let enc = BinaryEncoding::new(Mapping::JordanWigner, 3).unwrap();
        let (c, d) = enc.majoranas(2);
        assert_eq!(c, ps("Z0 Z1 X2"));
        assert_eq!(d, ps("Z0 Z1 Y2"));
    }

    #[test]
    fn test_number_operator_all_mappings() {
        // n_j has eigenvalue equal to the occupation for every encoding
        for mapping in [Mapping::JordanWigner, Mapping::Parity, Mapping::BravyiKitaev] {
            let enc = BinaryEncoding::new(mapping, 4).unwrap();
            for j in 0..4 {
                let n = &enc.ladder(Ladder::create(j)) * &enc.ladder(Ladder::annihilate(j));
                for occ in 0u64..16 {
                    let b = enc.encode(occ) as usize;
                    let mut state = vec![Complex64::new(0.0, 0.0); 16];
                    state[b] = Complex64::new(1.0, 0.0);
                    let e = n.expectation(&state).unwrap();
                    assert_abs_diff_eq!(e.re, ((occ >> j) & 1) as f64, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_anticommutator_identity() {
        // {a_i, a_j†} = δ_ij for Bravyi-Kitaev
        let enc = BinaryEncoding::new(Mapping::BravyiKitaev, 6).unwrap();
        for i in 0..6 {
            for j in 0..6 {
                let a = enc.ladder(Ladder::annihilate(i));
                let b = enc.ladder(Ladder::create(j));
                let anti = (&(&a * &b) + &(&b * &a)).simplify(1e-12);
                if i == j {
                    assert_eq!(anti.len(), 1);
                    assert_abs_diff_eq!(anti.constant_term(), 1.0, epsilon = 1e-12);
                } else {
                    assert!(anti.is_empty(), "{{a_{}, a_{}^}} = {}", i, j, anti);
                }
            }
        }
    }

    #[test]
    fn test_parity_reduction_qubit_count() {
        let mapper = QubitMapper::new(Mapping::Parity, 4, ElectronCount::new(1, 1)).unwrap();
        assert_eq!(mapper.n_qubits(), 2);
        let mut n_tot = FermionOperator::one_body_density(2, 0, 0);
        n_tot += &FermionOperator::one_body_density(2, 1, 1);
        let q = mapper.map(&n_tot).unwrap();
        // particle number is a constant in the tapered sector
        assert_abs_diff_eq!(q.constant_term(), 2.0, epsilon = 1e-12);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_reduction_rejects_non_conserving() {
        let mapper = QubitMapper::new(Mapping::Parity, 4, ElectronCount::new(1, 1)).unwrap();
        let mut op = FermionOperator::zero();
        op.add_term(vec![Ladder::create(0)], 1.0);
        assert!(matches!(
            mapper.map(&op),
            Err(HeaError::IncompatibleConfiguration { .. })
        ));
    }

    #[test]
    fn test_mapper_rejects_odd_modes() {
        assert!(QubitMapper::new(Mapping::JordanWigner, 3, ElectronCount::new(1, 0)).is_err());
        assert!(QubitMapper::new(Mapping::JordanWigner, 4, ElectronCount::new(3, 0)).is_err());
    }

    #[test]
    fn test_standalone_helpers_agree_with_mapper() {
        let op = FermionOperator::one_body_density(2, 0, 1);
        let mapper = QubitMapper::new(Mapping::BravyiKitaev, 4, ElectronCount::new(1, 1)).unwrap();
        assert_eq!(bravyi_kitaev(&op).unwrap(), mapper.map(&op).unwrap());
        assert_eq!(jordan_wigner(&op).unwrap().num_qubits(), 4);
        let par = parity(&op).unwrap();
        assert!(!par.is_empty() && par.num_qubits() <= 4);
    }
}
