//! Pauli strings and qubit operators
//!
//! Gantree: L1_Operator → Pauli
//!
//! A Pauli string is stored in symplectic form: bit `q` of `x` / `z`
//! marks an X / Z factor on qubit `q`, both bits together mark Y.
//! Qubit `q` is bit `q` of a basis-state index (little-endian).

use crate::constants::{sim, tol};
use crate::error::{HeaError, HeaResult};
use crate::types::{Basis, QubitId};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use std::str::FromStr;

const I_POW: [Complex64; 4] = [
    Complex64::new(1.0, 0.0),
    Complex64::new(0.0, 1.0),
    Complex64::new(-1.0, 0.0),
    Complex64::new(0.0, -1.0),
];

// ============================================================================
// Single-qubit Pauli
// ============================================================================

/// Single-qubit Pauli operator
/// Gantree: Pauli // I/X/Y/Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity
    I,
    /// Pauli-X
    X,
    /// Pauli-Y
    Y,
    /// Pauli-Z
    Z,
}

impl Pauli {
    fn from_bits(x: bool, z: bool) -> Self {
        match (x, z) {
            (false, false) => Pauli::I,
            (true, false) => Pauli::X,
            (true, true) => Pauli::Y,
            (false, true) => Pauli::Z,
        }
    }

    fn bits(self) -> (bool, bool) {
        match self {
            Pauli::I => (false, false),
            Pauli::X => (true, false),
            Pauli::Y => (true, true),
            Pauli::Z => (false, true),
        }
    }

    /// Measurement basis diagonalizing this Pauli
    pub fn basis(self) -> Option<Basis> {
        match self {
            Pauli::I => None,
            Pauli::X => Some(Basis::X),
            Pauli::Y => Some(Basis::Y),
            Pauli::Z => Some(Basis::Z),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        };
        write!(f, "{}", c)
    }
}

// ============================================================================
// Pauli String
// ============================================================================

/// Tensor product of single-qubit Paulis (phase-free)
/// Gantree: PauliString // x/z 비트마스크
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PauliString {
    x: u64,
    z: u64,
}

impl PauliString {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Build from raw symplectic masks
    pub const fn new(x: u64, z: u64) -> Self {
        Self { x, z }
    }

    /// Identity string
    pub const fn identity() -> Self {
        Self { x: 0, z: 0 }
    }

    /// Single Pauli on one qubit
    /// Gantree: single(q, P) -> Self // 단일 파울리
    pub fn single(qubit: QubitId, pauli: Pauli) -> HeaResult<Self> {
        Self::from_ops(&[(qubit, pauli)])
    }

    /// Build from `(qubit, pauli)` pairs; repeated qubits are rejected
    pub fn from_ops(ops: &[(QubitId, Pauli)]) -> HeaResult<Self> {
        let mut s = Self::identity();
        let mut seen = 0u64;
        for &(q, p) in ops {
            if q >= sim::MAX_QUBITS_PAULI {
                return Err(HeaError::QubitOutOfRange {
                    qubit: q,
                    max: sim::MAX_QUBITS_PAULI - 1,
                });
            }
            let bit = 1u64 << q;
            if seen & bit != 0 {
                return Err(HeaError::InvalidConfig {
                    field: "pauli string",
                    reason: format!("qubit {} appears twice", q),
                });
            }
            seen |= bit;
            let (xb, zb) = p.bits();
            if xb {
                s.x |= bit;
            }
            if zb {
                s.z |= bit;
            }
        }
        Ok(s)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// X mask
    #[inline]
    pub fn x_mask(&self) -> u64 {
        self.x
    }

    /// Z mask
    #[inline]
    pub fn z_mask(&self) -> u64 {
        self.z
    }

    /// Qubits carrying a non-identity factor
    #[inline]
    pub fn support(&self) -> u64 {
        self.x | self.z
    }

    /// Number of non-identity factors
    pub fn weight(&self) -> usize {
        self.support().count_ones() as usize
    }

    /// Check for the identity string
    pub fn is_identity(&self) -> bool {
        self.support() == 0
    }

    /// Check that only I/Z factors appear
    pub fn is_diagonal(&self) -> bool {
        self.x == 0
    }

    /// Factor on `qubit`
    pub fn get(&self, qubit: QubitId) -> Pauli {
        if qubit >= 64 {
            return Pauli::I;
        }
        Pauli::from_bits((self.x >> qubit) & 1 == 1, (self.z >> qubit) & 1 == 1)
    }

    /// One past the highest non-identity qubit
    pub fn min_qubits(&self) -> usize {
        64 - self.support().leading_zeros() as usize
    }

    /// Non-identity factors in qubit order
    pub fn ops(&self) -> Vec<(QubitId, Pauli)> {
        let mut out = Vec::with_capacity(self.weight());
        let mut s = self.support();
        while s != 0 {
            let q = s.trailing_zeros() as usize;
            out.push((q, self.get(q)));
            s &= s - 1;
        }
        out
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// Product `self · other = phase · result`
    /// Gantree: mul(&self, &other) -> (Complex64, PauliString) // 곱
    pub fn mul(&self, other: &PauliString) -> (Complex64, PauliString) {
        // i^k from the Y factors of each side and the reordering Z^z1 X^x2
        let ny_a = (self.x & self.z).count_ones();
        let ny_b = (other.x & other.z).count_ones();
        let x = self.x ^ other.x;
        let z = self.z ^ other.z;
        let ny_c = (x & z).count_ones();
        let swap = (self.z & other.x).count_ones();
        let k = (ny_a + ny_b + 2 * swap + 4 * 64 - ny_c) % 4;
        (I_POW[k as usize], PauliString { x, z })
    }

    /// Full commutation
    pub fn commutes(&self, other: &PauliString) -> bool {
        ((self.x & other.z).count_ones() + (self.z & other.x).count_ones()) % 2 == 0
    }

    /// Qubit-wise commutation: equal factors wherever both act
    /// Gantree: commutes_qubitwise(&self, &other) -> bool // QWC
    pub fn commutes_qubitwise(&self, other: &PauliString) -> bool {
        let overlap = self.support() & other.support();
        ((self.x ^ other.x) | (self.z ^ other.z)) & overlap == 0
    }

    /// Action on a basis state: `P|i> = phase |j>`
    /// Gantree: apply_basis(i) -> (Complex64, usize) // 기저 작용
    #[inline]
    pub fn apply_basis(&self, index: usize) -> (Complex64, usize) {
        let ny = (self.x & self.z).count_ones();
        let sign = (index as u64 & self.z).count_ones() * 2;
        (I_POW[((ny + sign) % 4) as usize], index ^ self.x as usize)
    }
}

impl Default for PauliString {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return write!(f, "I");
        }
        let parts: Vec<String> = self
            .ops()
            .into_iter()
            .map(|(q, p)| format!("{}{}", p, q))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl FromStr for PauliString {
    type Err = HeaError;

    /// Parse `"X0 Y2 Z3"`; `"I"` or an empty string is the identity
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ops = Vec::new();
        for tok in s.split_whitespace() {
            if tok == "I" {
                continue;
            }
            let mut chars = tok.chars();
            let pauli = match chars.next() {
                Some('X') => Pauli::X,
                Some('Y') => Pauli::Y,
                Some('Z') => Pauli::Z,
                _ => return Err(HeaError::unknown("pauli string", s)),
            };
            let qubit: QubitId = chars
                .as_str()
                .parse()
                .map_err(|_| HeaError::unknown("pauli string", s))?;
            ops.push((qubit, pauli));
        }
        Self::from_ops(&ops)
    }
}

// ============================================================================
// Qubit Operator
// ============================================================================

/// Linear combination of Pauli strings
/// Gantree: QubitOperator // BTreeMap<PauliString, Complex64>
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(PauliString, Complex64)>", into = "Vec<(PauliString, Complex64)>")]
pub struct QubitOperator {
    terms: BTreeMap<PauliString, Complex64>,
}

impl QubitOperator {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Zero operator
    pub fn zero() -> Self {
        Self::default()
    }

    /// `c · I`
    pub fn constant(c: f64) -> Self {
        Self::term(PauliString::identity(), Complex64::new(c, 0.0))
    }

    /// Single term
    /// Gantree: term(P, c) -> Self // 단일 항
    pub fn term(pauli: PauliString, coeff: Complex64) -> Self {
        let mut op = Self::zero();
        op.add_term(pauli, coeff);
        op
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of stored terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check for an empty sum
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate `(string, coefficient)` in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&PauliString, &Complex64)> {
        self.terms.iter()
    }

    /// Coefficient of `pauli` (zero when absent)
    pub fn coefficient(&self, pauli: &PauliString) -> Complex64 {
        self.terms.get(pauli).copied().unwrap_or_default()
    }

    /// Coefficient of the identity string
    pub fn constant_term(&self) -> f64 {
        self.coefficient(&PauliString::identity()).re
    }

    /// Smallest register the operator fits on
    /// Gantree: num_qubits() -> usize // 큐비트 수
    pub fn num_qubits(&self) -> usize {
        self.terms.keys().map(PauliString::min_qubits).max().unwrap_or(0)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Accumulate `coeff · pauli`
    pub fn add_term(&mut self, pauli: PauliString, coeff: Complex64) {
        *self.terms.entry(pauli).or_default() += coeff;
    }

    /// Multiply every coefficient by `c`
    pub fn scale(mut self, c: Complex64) -> Self {
        for v in self.terms.values_mut() {
            *v *= c;
        }
        self
    }

    /// Drop terms with `|c| <= tol`
    /// Gantree: simplify(tol) -> Self // 정리
    pub fn simplify(mut self, tol: f64) -> Self {
        self.terms.retain(|_, c| c.norm() > tol);
        self
    }

    /// Adjoint (Pauli strings are Hermitian, so coefficients are conjugated)
    pub fn dagger(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(p, c)| (*p, c.conj())).collect(),
        }
    }

    /// Check that every coefficient is real within `tol`
    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.terms.values().all(|c| c.im.abs() <= tol)
    }

    /// Real projection of a Hermitian operator
    /// Gantree: to_hermitian(&self) -> Result<Self> // 실수 계수화
    pub fn to_hermitian(&self) -> HeaResult<Self> {
        let mut out = Self::zero();
        for (p, c) in &self.terms {
            if c.im.abs() > tol::HERMITIAN_TOL {
                return Err(HeaError::NonHermitian {
                    term: p.to_string(),
                    imag: c.im,
                });
            }
            out.add_term(*p, Complex64::new(c.re, 0.0));
        }
        Ok(out.simplify(tol::COEFF_TOL))
    }

    // ========================================================================
    // Measurement Grouping
    // ========================================================================

    /// Greedy partition of the non-identity strings into qubit-wise
    /// commuting groups, in canonical term order
    /// Gantree: qubitwise_groups() -> Vec<Vec<PauliString>> // QWC 그룹
    pub fn qubitwise_groups(&self) -> Vec<Vec<PauliString>> {
        let mut groups: Vec<(u64, u64, Vec<PauliString>)> = Vec::new();
        for p in self.terms.keys().filter(|p| !p.is_identity()) {
            let slot = groups.iter_mut().find(|(gx, gz, _)| {
                p.commutes_qubitwise(&PauliString::new(*gx, *gz))
            });
            match slot {
                Some((gx, gz, members)) => {
                    *gx |= p.x;
                    *gz |= p.z;
                    members.push(*p);
                }
                None => groups.push((p.x, p.z, vec![*p])),
            }
        }
        groups.into_iter().map(|(_, _, m)| m).collect()
    }

    // ========================================================================
    // Dense Action
    // ========================================================================

    /// `O|ψ>` on a dense amplitude vector
    /// Gantree: apply(&self, ψ) -> Vec<Complex64> // 상태 작용
    pub fn apply(&self, state: &[Complex64]) -> HeaResult<Vec<Complex64>> {
        self.check_len(state.len())?;
        let mut out = vec![Complex64::new(0.0, 0.0); state.len()];
        for (p, c) in &self.terms {
            for (i, amp) in state.iter().enumerate() {
                let (phase, j) = p.apply_basis(i);
                out[j] += c * phase * amp;
            }
        }
        Ok(out)
    }

    /// `<ψ|O|ψ>` on a dense amplitude vector
    /// Gantree: expectation(&self, ψ) -> Complex64 // 기대값
    pub fn expectation(&self, state: &[Complex64]) -> HeaResult<Complex64> {
        self.check_len(state.len())?;
        let mut total = Complex64::new(0.0, 0.0);
        for (p, c) in &self.terms {
            total += c * pauli_expectation(p, state);
        }
        Ok(total)
    }

    fn check_len(&self, len: usize) -> HeaResult<()> {
        let n = self.num_qubits();
        if !len.is_power_of_two() || (1usize << n) > len {
            return Err(HeaError::ShapeMismatch {
                what: "state vector",
                expected: 1usize << n,
                actual: len,
            });
        }
        Ok(())
    }
}

/// `<ψ|P|ψ>` for a single Pauli string
pub fn pauli_expectation(p: &PauliString, state: &[Complex64]) -> Complex64 {
    let mut acc = Complex64::new(0.0, 0.0);
    for (i, amp) in state.iter().enumerate() {
        let (phase, j) = p.apply_basis(i);
        acc += state[j].conj() * phase * amp;
    }
    acc
}

// ============================================================================
// Conversions
// ============================================================================

impl From<Vec<(PauliString, Complex64)>> for QubitOperator {
    fn from(terms: Vec<(PauliString, Complex64)>) -> Self {
        let mut op = Self::zero();
        for (p, c) in terms {
            op.add_term(p, c);
        }
        op
    }
}

impl From<QubitOperator> for Vec<(PauliString, Complex64)> {
    fn from(op: QubitOperator) -> Self {
        op.terms.into_iter().collect()
    }
}

impl From<PauliString> for QubitOperator {
    fn from(p: PauliString) -> Self {
        Self::term(p, Complex64::new(1.0, 0.0))
    }
}

// ============================================================================
// Operators
// ============================================================================

impl AddAssign<&QubitOperator> for QubitOperator {
    fn add_assign(&mut self, rhs: &QubitOperator) {
        for (p, c) in &rhs.terms {
            self.add_term(*p, *c);
        }
    }
}

impl Add for &QubitOperator {
    type Output = QubitOperator;

    fn add(self, rhs: &QubitOperator) -> QubitOperator {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Neg for &QubitOperator {
    type Output = QubitOperator;

    fn neg(self) -> QubitOperator {
        self.clone().scale(Complex64::new(-1.0, 0.0))
    }
}

impl Sub for &QubitOperator {
    type Output = QubitOperator;

    fn sub(self, rhs: &QubitOperator) -> QubitOperator {
        self + &(-rhs)
    }
}

impl Mul for &QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: &QubitOperator) -> QubitOperator {
        let mut out = QubitOperator::zero();
        for (pa, ca) in &self.terms {
            for (pb, cb) in &rhs.terms {
                let (phase, p) = pa.mul(pb);
                out.add_term(p, ca * cb * phase);
            }
        }
        out.simplify(tol::COEFF_TOL)
    }
}

impl fmt::Display for QubitOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (k, (p, c)) in self.terms.iter().enumerate() {
            if k > 0 {
                writeln!(f, " +")?;
            }
            write!(f, "({:.10}{:+.10}j) [{}]", c.re, c.im, p)?;
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
    use approx::assert_abs_diff_eq;

    fn ps(s: &str) -> PauliString {
        s.parse().unwrap()
    }

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_parse_and_display() {
        let p = ps("X0 Y2 Z3");
        assert_eq!(p.get(0), Pauli::X);
        assert_eq!(p.get(1), Pauli::I);
        assert_eq!(p.get(2), Pauli::Y);
        assert_eq!(p.weight(), 3);
        assert_eq!(p.min_qubits(), 4);
        assert_eq!(p.to_string(), "X0 Y2 Z3");
        assert!(ps("I").is_identity());
        assert!("X0 X0".parse::<PauliString>().is_err());
        assert!("Q1".parse::<PauliString>().is_err());
    }

    #[test]
    fn test_single_qubit_products() {
        let cases = [
            ("X0", "Y0", c(0.0, 1.0), "Z0"),
            ("Y0", "Z0", c(0.0, 1.0), "X0"),
            ("Z0", "X0", c(0.0, 1.0), "Y0"),
            ("Y0", "X0", c(0.0, -1.0), "Z0"),
            ("Z0", "Y0", c(0.0, -1.0), "X0"),
            ("X0", "Z0", c(0.0, -1.0), "Y0"),
            ("Y0", "Y0", c(1.0, 0.0), "I"),
        ];
        for (a, b, phase, res) in cases {
            let (ph, p) = ps(a).mul(&ps(b));
            assert_eq!(p, ps(res), "{} * {}", a, b);
            assert_abs_diff_eq!(ph.re, phase.re, epsilon = 1e-15);
            assert_abs_diff_eq!(ph.im, phase.im, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_multi_qubit_product() {
        // (X0 Y1)(Y0 Y1) = (XY)(YY) = iZ0
        let (ph, p) = ps("X0 Y1").mul(&ps("Y0 Y1"));
        assert_eq!(p, ps("Z0"));
        assert_abs_diff_eq!(ph.im, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_commutation() {
        assert!(ps("X0 X1").commutes(&ps("Y0 Y1")));
        assert!(!ps("X0 X1").commutes_qubitwise(&ps("Y0 Y1")));
        assert!(ps("Z0 Z1").commutes_qubitwise(&ps("Z1 X2")));
        assert!(!ps("X0").commutes(&ps("Z0")));
    }

    #[test]
    fn test_apply_basis_y() {
        // Y|0> = i|1>, Y|1> = -i|0>
        let y = ps("Y0");
        let (ph, j) = y.apply_basis(0);
        assert_eq!(j, 1);
        assert_abs_diff_eq!(ph.im, 1.0, epsilon = 1e-15);
        let (ph, j) = y.apply_basis(1);
        assert_eq!(j, 0);
        assert_abs_diff_eq!(ph.im, -1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_operator_product_and_hermitian() {
        // (X0 + iY0)(X0 - iY0) = 2I + 2Z0
        let a = QubitOperator::from(vec![(ps("X0"), c(1.0, 0.0)), (ps("Y0"), c(0.0, 1.0))]);
        let prod = &a * &a.dagger();
        assert_abs_diff_eq!(prod.constant_term(), 2.0, epsilon = 1e-14);
        assert_abs_diff_eq!(prod.coefficient(&ps("Z0")).re, 2.0, epsilon = 1e-14);
        assert_eq!(prod.len(), 2);
        assert!(prod.is_hermitian(1e-12));
        assert!(!a.is_hermitian(1e-12));
        assert!(a.to_hermitian().is_err());
    }

    #[test]
    fn test_sub_cancels() {
        let a = QubitOperator::from(ps("Z0 Z1"));
        let zero = (&a - &a).simplify(1e-12);
        assert!(zero.is_empty());
    }

    #[test]
    fn test_expectation_bell_state() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let state = vec![c(s, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(s, 0.0)];
        let op = QubitOperator::from(vec![
            (ps("Z0 Z1"), c(1.0, 0.0)),
            (ps("X0 X1"), c(0.5, 0.0)),
            (ps("Y0 Y1"), c(0.25, 0.0)),
            (ps("Z0"), c(3.0, 0.0)),
        ]);
        // <ZZ>=1, <XX>=1, <YY>=-1, <Z0>=0
        let e = op.expectation(&state).unwrap();
        assert_abs_diff_eq!(e.re, 1.25, epsilon = 1e-12);
        assert_abs_diff_eq!(e.im, 0.0, epsilon = 1e-12);

        let applied = op.apply(&state).unwrap();
        let direct: Complex64 = state.iter().zip(&applied).map(|(a, b)| a.conj() * b).sum();
        assert_abs_diff_eq!(direct.re, 1.25, epsilon = 1e-12);
    }

    #[test]
    fn test_expectation_shape_error() {
        let op = QubitOperator::from(ps("Z2"));
        let state = vec![c(1.0, 0.0), c(0.0, 0.0)];
        assert!(matches!(
            op.expectation(&state),
            Err(HeaError::ShapeMismatch { what: "state vector", .. })
        ));
    }

    #[test]
    fn test_qubitwise_groups() {
        let op = QubitOperator::from(vec![
            (ps("I"), c(-1.0, 0.0)),
            (ps("Z0"), c(1.0, 0.0)),
            (ps("Z1"), c(1.0, 0.0)),
            (ps("Z0 Z1"), c(1.0, 0.0)),
            (ps("X0 X1"), c(1.0, 0.0)),
            (ps("Y0 Y1"), c(1.0, 0.0)),
        ]);
        let groups = op.qubitwise_groups();
        assert_eq!(groups.len(), 3);
        let total: usize = groups.iter().map(Vec::len).sum();
        assert_eq!(total, 5);
        for g in &groups {
            for a in g {
                for b in g {
                    assert!(a.commutes_qubitwise(b));
                }
            }
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let op = QubitOperator::from(vec![(ps("X0 Z3"), c(0.5, 0.0)), (ps("I"), c(-0.1, 0.0))]);
        let json = serde_json::to_string(&op).unwrap();
        let back: QubitOperator = serde_json::from_str(&json).unwrap();
        assert_eq!(op, back);
        assert_eq!(back.num_qubits(), 4);
    }
}
