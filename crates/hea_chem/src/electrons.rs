//! Electron counts per spin
//!
//! Gantree: L2_Chemistry → ElectronCount

use hea_core::error::{HeaError, HeaResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of α and β electrons
/// Gantree: ElectronCount // (n_alpha, n_beta)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElectronCount {
    /// α (spin-up) electrons
    pub alpha: usize,
    /// β (spin-down) electrons
    pub beta: usize,
}

impl ElectronCount {
    /// Explicit counts
    pub fn new(alpha: usize, beta: usize) -> Self {
        Self { alpha, beta }
    }

    /// Singlet with `n` electrons (`n` must be even)
    /// Gantree: closed_shell(n) -> Result<Self> // 닫힌 껍질
    pub fn closed_shell(n: usize) -> HeaResult<Self> {
        Self::open_shell(n, 0)
    }

    /// `n` electrons with `spin = Nα - Nβ`
    /// Gantree: open_shell(n, spin) -> Result<Self> // 열린 껍질
    pub fn open_shell(n: usize, spin: usize) -> HeaResult<Self> {
        if spin > n || (n - spin) % 2 != 0 {
            return Err(HeaError::InvalidElectronCount(format!(
                "{} electrons cannot have spin {}",
                n, spin
            )));
        }
        Ok(Self {
            alpha: (n + spin) / 2,
            beta: (n - spin) / 2,
        })
    }

    /// Total electron count
    pub fn total(&self) -> usize {
        self.alpha + self.beta
    }

    /// `Nα - Nβ`
    pub fn spin(&self) -> isize {
        self.alpha as isize - self.beta as isize
    }

    /// Check the counts fit into `n_orb` spatial orbitals
    pub fn validate(&self, n_orb: usize) -> HeaResult<()> {
        if self.alpha > n_orb || self.beta > n_orb {
            return Err(HeaError::InvalidElectronCount(format!(
                "({}, {}) electrons exceed {} orbitals per spin",
                self.alpha, self.beta, n_orb
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ElectronCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}α, {}β)", self.alpha, self.beta)
    }
}
