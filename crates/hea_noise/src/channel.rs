//! Quantum error channels
//!
//! Gantree: L3_Noise → Channel
//!
//! A depolarizing channel on `k` qubits with probability `p` applies each
//! of the `4^k - 1` non-identity Pauli strings with probability
//! `p / (4^k - 1)`.

use hea_core::error::{HeaError, HeaResult};
use hea_core::pauli::PauliString;
use hea_core::types::QubitId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error channel attached to a gate
/// Gantree: Channel // 노이즈 채널
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Channel {
    /// Symmetric Pauli depolarizing channel
    Depolarizing {
        /// Affected qubits (one or two)
        qubits: Vec<QubitId>,
        /// Total probability of a non-identity error
        p: f64,
    },
}

impl Channel {
    /// Qubits the channel acts on
    pub fn qubits(&self) -> &[QubitId] {
        match self {
            Channel::Depolarizing { qubits, .. } => qubits,
        }
    }

    /// Total error probability
    pub fn probability(&self) -> f64 {
        match self {
            Channel::Depolarizing { p, .. } => *p,
        }
    }

    /// Pauli mixture `[(weight, P)]`, identity first; weights sum to one
    /// Gantree: pauli_mixture() -> Result<Vec<(f64, PauliString)>> // 파울리 혼합
    pub fn pauli_mixture(&self) -> HeaResult<Vec<(f64, PauliString)>> {
        let Channel::Depolarizing { qubits, p } = self;
        let k = qubits.len();
        if !(1..=2).contains(&k) {
            return Err(HeaError::InvalidConfig {
                field: "channel",
                reason: format!("depolarizing channel on {} qubits", k),
            });
        }
        let n_strings = (1usize << (2 * k)) - 1;
        let w = p / n_strings as f64;
        let mut out = Vec::with_capacity(n_strings + 1);
        out.push((1.0 - p, PauliString::identity()));
        for code in 1..=n_strings {
            let (mut x, mut z) = (0u64, 0u64);
            for (slot, &q) in qubits.iter().enumerate() {
                // two bits per qubit: bit 0 -> X, bit 1 -> Z
                let bits = (code >> (2 * slot)) & 3;
                if bits & 1 == 1 {
                    x |= 1u64 << q;
                }
                if bits & 2 == 2 {
                    z |= 1u64 << q;
                }
            }
            out.push((w, PauliString::new(x, z)));
        }
        Ok(out)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Depolarizing { qubits, p } => {
                write!(f, "depolarizing(p={:.4}) on {:?}", p, qubits)
            }
        }
    }
}
