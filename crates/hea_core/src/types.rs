//! Core types for HEA
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Type aliases and validated wrappers shared by the simulator, the
//! chemistry front-end and the solver.

use crate::error::{HeaError, HeaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed, little-endian in basis-state indices)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Rotation angle in radians
/// Gantree: Angle // pub type Angle = f64
pub type Angle = f64;

/// Parameter vector for variational circuits
/// Gantree: ParamVec // pub type ParamVec = Vec<f64>
pub type ParamVec = Vec<f64>;

/// Sampled measurement counts: bitstring -> count
/// Gantree: Counts // pub type Counts = HashMap<Bitstring, u64>
pub type Counts = HashMap<Bitstring, u64>;

// ============================================================================
// Probability (Validated Wrapper)
// ============================================================================

/// Probability value in range [0, 1]
/// Gantree: Probability // 범위 검증 구조체
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probability(f64);

impl Probability {
    /// Create a new Probability with validation
    /// Gantree: new(f64) -> Result<Self> // 생성+검증
    pub fn new(value: f64) -> HeaResult<Self> {
        if !(0.0..=1.0).contains(&value) || value.is_nan() {
            return Err(HeaError::InvalidProbability(value));
        }
        Ok(Self(value))
    }

    /// Get the probability value
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

// ============================================================================
// Basis
// ============================================================================

/// Single-qubit measurement basis
/// Gantree: Basis // X/Y/Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Pauli-X eigenbasis
    X,
    /// Pauli-Y eigenbasis
    Y,
    /// Computational basis
    Z,
}

impl FromStr for Basis {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Basis::X),
            "Y" | "y" => Ok(Basis::Y),
            "Z" | "z" => Ok(Basis::Z),
            other => Err(HeaError::unknown("basis", other)),
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Basis::X => 'X',
            Basis::Y => 'Y',
            Basis::Z => 'Z',
        };
        write!(f, "{}", c)
    }
}

// ============================================================================
// Bitstring
// ============================================================================

/// Measurement outcome; bit `q` belongs to qubit `q`
/// Gantree: Bitstring // 비트열 타입
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bitstring {
    bits: Vec<bool>,
}

impl Bitstring {
    /// Create from per-qubit bits
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Create from a little-endian basis-state index
    /// Gantree: from_index(idx, n) -> Self // 인덱스 변환
    pub fn from_index(index: usize, num_qubits: usize) -> Self {
        Self {
            bits: (0..num_qubits).map(|q| (index >> q) & 1 == 1).collect(),
        }
    }

    /// Parse a printed bitstring (highest qubit first, e.g. "0110")
    /// Gantree: parse(s) -> Result<Self> // 파싱
    pub fn parse(s: &str) -> HeaResult<Self> {
        let bits = s
            .chars()
            .rev()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(HeaError::unknown("bitstring", s)),
            })
            .collect::<HeaResult<Vec<bool>>>()?;
        Ok(Self { bits })
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit of qubit `q`
    pub fn get(&self, q: QubitId) -> Option<bool> {
        self.bits.get(q).copied()
    }

    /// Hamming weight
    pub fn popcount(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Basis-state index (little-endian)
    /// Gantree: to_index() -> usize // 인덱스
    pub fn to_index(&self) -> usize {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(i, _)| 1usize << i)
            .sum()
    }

    /// +1 / -1 parity of the bits selected by `mask`
    pub fn parity_sign(&self, mask: u64) -> f64 {
        let ones = (self.to_index() as u64 & mask).count_ones();
        if ones % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.bits.iter().rev() {
            write!(f, "{}", if b { '1' } else { '0' })?;
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

    #[test]
    fn test_probability_range() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(Probability::new(-0.01).is_err());
        assert!(Probability::new(f64::NAN).is_err());
        assert_eq!(Probability::new(0.25).unwrap().value(), 0.25);
    }

    #[test]
    fn test_bitstring_index_order() {
        // qubit 0 set, qubit 2 set
        let b = Bitstring::from_index(0b101, 4);
        assert_eq!(b.to_string(), "0101");
        assert_eq!(b.get(0), Some(true));
        assert_eq!(b.get(1), Some(false));
        assert_eq!(b.to_index(), 5);
        assert_eq!(Bitstring::parse("0101").unwrap(), b);
    }

    #[test]
    fn test_bitstring_parity_sign() {
        let b = Bitstring::from_index(0b011, 3);
        assert_eq!(b.parity_sign(0b011), 1.0);
        assert_eq!(b.parity_sign(0b001), -1.0);
        assert_eq!(b.parity_sign(0b100), 1.0);
    }

    #[test]
    fn test_basis_parse() {
        assert_eq!("x".parse::<Basis>().unwrap(), Basis::X);
        assert!("w".parse::<Basis>().is_err());
        assert_eq!(Basis::Y.to_string(), "Y");
    }
}
